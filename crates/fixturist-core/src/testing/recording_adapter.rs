//! A mock adapter that records its own lifecycle calls.

use fixturist_proto::{Error, MockAdapter, Result};
use std::any::Any;
use std::sync::Mutex;

/// A lifecycle call received by a [`RecordingAdapter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Setup,
    Verify,
    Teardown,
}

/// Adapter that logs every lifecycle call and can be scripted to fail.
///
/// Use it to assert teardown counts and ordering without a real backend.
#[derive(Debug, Default)]
pub struct RecordingAdapter {
    events: Mutex<Vec<Lifecycle>>,
    fail_setup: bool,
    fail_teardown: bool,
    unmet: Vec<String>,
}

impl RecordingAdapter {
    /// Creates an adapter whose calls all succeed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `setup_mocks` fail.
    pub fn fail_setup(mut self) -> Self {
        self.fail_setup = true;
        self
    }

    /// Makes `teardown_mocks` fail (the call is still recorded).
    pub fn fail_teardown(mut self) -> Self {
        self.fail_teardown = true;
        self
    }

    /// Makes `verify_mocks` report an unmet expectation.
    pub fn with_unmet(mut self, description: impl Into<String>) -> Self {
        self.unmet.push(description.into());
        self
    }

    /// Returns every lifecycle call so far, in order.
    pub fn events(&self) -> Vec<Lifecycle> {
        self.lock().clone()
    }

    /// Returns how many times teardown was called.
    pub fn teardown_count(&self) -> usize {
        self.count(Lifecycle::Teardown)
    }

    /// Returns how many times setup was called.
    pub fn setup_count(&self) -> usize {
        self.count(Lifecycle::Setup)
    }

    fn count(&self, kind: Lifecycle) -> usize {
        self.lock().iter().filter(|e| **e == kind).count()
    }

    fn record(&self, event: Lifecycle) {
        self.lock().push(event);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Lifecycle>> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl MockAdapter for RecordingAdapter {
    fn framework_name(&self) -> &'static str {
        "recording"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn setup_mocks(&self) -> Result<()> {
        self.record(Lifecycle::Setup);
        if self.fail_setup {
            return Err(Error::MockSetup {
                framework: self.framework_name().to_string(),
                message: "scripted setup failure".to_string(),
            });
        }
        Ok(())
    }

    fn verify_mocks(&self) -> Result<()> {
        self.record(Lifecycle::Verify);
        if self.unmet.is_empty() {
            Ok(())
        } else {
            Err(Error::AdapterVerification {
                framework: self.framework_name().to_string(),
                unmet: self.unmet.clone(),
            })
        }
    }

    fn teardown_mocks(&self) -> Result<()> {
        self.record(Lifecycle::Teardown);
        if self.fail_teardown {
            return Err(Error::MockTeardown {
                framework: self.framework_name().to_string(),
                message: "scripted teardown failure".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_calls_in_order() {
        let adapter = RecordingAdapter::new();
        adapter.setup_mocks().unwrap();
        adapter.verify_mocks().unwrap();
        adapter.teardown_mocks().unwrap();

        assert_eq!(
            adapter.events(),
            vec![Lifecycle::Setup, Lifecycle::Verify, Lifecycle::Teardown]
        );
        assert_eq!(adapter.setup_count(), 1);
        assert_eq!(adapter.teardown_count(), 1);
    }

    #[test]
    fn test_scripted_failures() {
        let adapter = RecordingAdapter::new()
            .fail_setup()
            .fail_teardown()
            .with_unmet("billing.charge expected exactly 1 call, got 0");

        assert!(matches!(adapter.setup_mocks(), Err(Error::MockSetup { .. })));
        assert!(matches!(
            adapter.verify_mocks(),
            Err(Error::AdapterVerification { .. })
        ));
        assert!(matches!(
            adapter.teardown_mocks(),
            Err(Error::MockTeardown { .. })
        ));
        assert_eq!(adapter.events().len(), 3);
    }
}
