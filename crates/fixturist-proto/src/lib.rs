//! # fixturist-proto
//!
//! Shared types, error definitions, and traits for the Fixturist workspace.
//!
//! This crate provides the foundational abstractions used across all Fixturist crates,
//! including:
//! - The `Handler` contract for the unit under test
//! - The `MockAdapter` capability contract for mocking backends
//! - Request and response types captured into fixtures
//! - The run lifecycle states and common error types

mod adapter;
mod error;
mod handler;
mod request;
mod response;
mod state;

pub use adapter::MockAdapter;
pub use error::{Error, Result};
pub use handler::Handler;
pub use request::{Method, Params, Request};
pub use response::{Body, Response};
pub use state::RunState;
