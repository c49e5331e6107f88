//! Adapter over the in-process expectation space.

use crate::Space;
use fixturist_proto::{Error, MockAdapter, Result};
use std::any::Any;
use std::sync::Arc;
use tracing::debug;

/// Bridges a [`Space`] to the scenario lifecycle.
///
/// Setup and teardown both reset the space; verification reports every unmet
/// expectation and unexpected call.
///
/// # Example
///
/// ```
/// use fixturist_adapters::{Space, SpaceAdapter};
/// use fixturist_proto::MockAdapter;
/// use std::sync::Arc;
///
/// let space = Arc::new(Space::new());
/// let adapter = SpaceAdapter::new(Arc::clone(&space));
///
/// adapter.setup_mocks().unwrap();
/// space.expect("billing.charge");
/// assert!(adapter.verify_mocks().is_err());
/// adapter.teardown_mocks().unwrap();
/// assert!(space.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct SpaceAdapter {
    space: Arc<Space>,
}

impl SpaceAdapter {
    /// Creates an adapter over the given space.
    pub fn new(space: Arc<Space>) -> Self {
        Self { space }
    }

    /// Creates an adapter over the process-wide space.
    pub fn global() -> Self {
        Self::new(Space::global())
    }

    /// Returns the space setups register expectations on.
    pub fn space(&self) -> &Arc<Space> {
        &self.space
    }
}

impl MockAdapter for SpaceAdapter {
    fn framework_name(&self) -> &'static str {
        "space"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn setup_mocks(&self) -> Result<()> {
        debug!(doubles = self.space.len(), "Resetting mock space for setup");
        self.space.reset();
        Ok(())
    }

    fn verify_mocks(&self) -> Result<()> {
        self.space
            .verify()
            .map_err(|unmet| Error::AdapterVerification {
                framework: self.framework_name().to_string(),
                unmet,
            })
    }

    fn teardown_mocks(&self) -> Result<()> {
        debug!(doubles = self.space.len(), "Resetting mock space for teardown");
        self.space.reset();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn isolated() -> (Arc<Space>, SpaceAdapter) {
        let space = Arc::new(Space::new());
        let adapter = SpaceAdapter::new(Arc::clone(&space));
        (space, adapter)
    }

    #[test]
    fn test_setup_discards_leftover_expectations() {
        let (space, adapter) = isolated();
        space.expect("left.over");

        adapter.setup_mocks().unwrap();

        assert!(space.is_empty());
        assert!(adapter.verify_mocks().is_ok());
    }

    #[test]
    fn test_verify_reports_unmet_expectations() {
        let (space, adapter) = isolated();
        adapter.setup_mocks().unwrap();
        space.expect("billing.charge").times(2);
        space.call("billing.charge");

        let err = adapter.verify_mocks().unwrap_err();
        match err {
            Error::AdapterVerification { framework, unmet } => {
                assert_eq!(framework, "space");
                assert_eq!(unmet, vec!["billing.charge expected exactly 2 calls, got 1"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_teardown_resets_even_when_unverified() {
        let (space, adapter) = isolated();
        adapter.setup_mocks().unwrap();
        space.expect("billing.charge");

        adapter.teardown_mocks().unwrap();

        assert!(space.is_empty());
        assert!(adapter.verify_mocks().is_ok());
    }

    #[test]
    fn test_global_adapters_share_space() {
        let a = SpaceAdapter::global();
        let b = SpaceAdapter::global();
        assert!(Arc::ptr_eq(a.space(), b.space()));
    }
}
