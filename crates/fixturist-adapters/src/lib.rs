//! # fixturist-adapters
//!
//! Mock adapters for the Fixturist workspace.
//!
//! This crate provides implementations of the `MockAdapter` contract:
//! - `SpaceAdapter` over the in-process expectation [`Space`]
//! - `NullAdapter` for handlers that need no mocking
//!
//! ## Selection
//!
//! Exactly one adapter is active per configuration. When the configuration
//! names its framework (`mock_framework: space`), [`adapter_for`] resolves the
//! name to an instance.

mod null_adapter;
mod select;
mod space;
mod space_adapter;

pub use null_adapter::NullAdapter;
pub use select::{KNOWN_FRAMEWORKS, UnknownAdapterError, adapter_for};
pub use space::{CallCount, Expectation, Space};
pub use space_adapter::SpaceAdapter;
