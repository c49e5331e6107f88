//! # fixturist-core
//!
//! Scenario execution engine for the Fixturist workspace.
//!
//! This crate provides:
//! - Configuration loading and the runtime registry (adapter, global setups, store)
//! - The request executor that brackets a handler call with the mock lifecycle
//! - Scenario definitions and a sequential batch runner
//! - The fixture store that persists captured responses deterministically
//!
//! # Example
//!
//! ```
//! use fixturist_adapters::NullAdapter;
//! use fixturist_core::{Configuration, Scenario};
//! use fixturist_core::testing::EchoHandler;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let config = Configuration::builder()
//!     .fixture_path(dir.path())
//!     .mock_with(NullAdapter)
//!     .build()
//!     .unwrap();
//!
//! let mut scenario = Scenario::new("Admin Permissions")
//!     .with_handler(EchoHandler)
//!     .with_action("index");
//! let path = scenario.run(&config).unwrap();
//!
//! assert!(path.ends_with("admin_permissions.json"));
//! assert_eq!(scenario.response().unwrap().status, 200);
//! ```

mod config;
mod context;
mod executor;
mod fixture_store;
mod identity;
mod runner;
mod scenario;
pub mod testing;

pub use config::{
    ConfigError, ConfigWarning, Configuration, ConfigurationBuilder, FixturistConfig,
};
pub use context::{RequestContext, Setup, setup};
pub use executor::RequestExecutor;
pub use fixture_store::{FixtureKey, FixtureRecord, FixtureStore};
pub use identity::{handler_namespace, identifier};
pub use runner::{RunSummary, ScenarioFailure, ScenarioRunner};
pub use scenario::Scenario;
