//! Adapter for runs that use no mocking backend.

use fixturist_proto::{MockAdapter, Result};
use std::any::Any;

/// A no-op adapter: setup, verification and teardown always succeed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAdapter;

impl MockAdapter for NullAdapter {
    fn framework_name(&self) -> &'static str {
        "none"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn setup_mocks(&self) -> Result<()> {
        Ok(())
    }

    fn verify_mocks(&self) -> Result<()> {
        Ok(())
    }

    fn teardown_mocks(&self) -> Result<()> {
        Ok(())
    }
}
