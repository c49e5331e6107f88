//! Testing utilities for deterministic scenario tests.

pub mod handlers;
pub mod recording_adapter;

pub use handlers::{EchoHandler, FailingHandler, FnHandler};
pub use recording_adapter::{Lifecycle, RecordingAdapter};
