//! An in-process expectation space for test doubles.
//!
//! The space is the mutable state a mock adapter coordinates. Setups register
//! expectations and stubs on it, handler code reports calls through
//! [`Space::call`], and verification compares the two.

use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};
use tracing::debug;

/// The process-wide space shared by every [`SpaceAdapter::global`](crate::SpaceAdapter::global).
static GLOBAL_SPACE: OnceLock<Arc<Space>> = OnceLock::new();

/// How many calls an expectation allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallCount {
    /// Exactly `n` calls.
    Exactly(u32),
    /// `n` or more calls.
    AtLeast(u32),
    /// Any number of calls, including none.
    Any,
}

impl CallCount {
    fn is_satisfied_by(self, calls: u32) -> bool {
        match self {
            CallCount::Exactly(n) => calls == n,
            CallCount::AtLeast(n) => calls >= n,
            CallCount::Any => true,
        }
    }

    fn describe(self) -> String {
        match self {
            CallCount::Exactly(0) => "never".to_string(),
            CallCount::Exactly(1) => "exactly 1 call".to_string(),
            CallCount::Exactly(n) => format!("exactly {n} calls"),
            CallCount::AtLeast(n) => format!("at least {n} calls"),
            CallCount::Any => "any number of calls".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
struct Double {
    expected: CallCount,
    returns: Value,
    calls: u32,
    // Stubs answer calls but are never reported by verification.
    verified: bool,
}

#[derive(Debug, Default)]
struct SpaceState {
    doubles: BTreeMap<String, Double>,
    unexpected: Vec<String>,
}

/// A thread-safe registry of mock expectations and stubs.
#[derive(Debug, Default)]
pub struct Space {
    state: Mutex<SpaceState>,
}

impl Space {
    /// Creates an empty, isolated space.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide space.
    pub fn global() -> Arc<Space> {
        Arc::clone(GLOBAL_SPACE.get_or_init(|| Arc::new(Space::new())))
    }

    /// Starts an expectation on `subject`, defaulting to exactly one call.
    pub fn expect(&self, subject: impl Into<String>) -> Expectation<'_> {
        let subject = subject.into();
        self.insert(
            &subject,
            Double {
                expected: CallCount::Exactly(1),
                returns: Value::Null,
                calls: 0,
                verified: true,
            },
        );
        Expectation {
            space: self,
            subject,
        }
    }

    /// Registers a stub that answers calls to `subject` with `value`.
    pub fn stub(&self, subject: impl Into<String>, value: Value) {
        let subject = subject.into();
        self.insert(
            &subject,
            Double {
                expected: CallCount::Any,
                returns: value,
                calls: 0,
                verified: false,
            },
        );
    }

    /// Records a call to `subject` and returns its stubbed value.
    ///
    /// Calls to subjects with no registered double return `None` and are
    /// reported by [`Space::verify`].
    pub fn call(&self, subject: &str) -> Option<Value> {
        let mut state = self.lock();
        match state.doubles.get_mut(subject) {
            Some(double) => {
                double.calls += 1;
                debug!(subject = subject, calls = double.calls, "Mock call recorded");
                Some(double.returns.clone())
            }
            None => {
                debug!(subject = subject, "Unexpected mock call");
                state.unexpected.push(subject.to_string());
                None
            }
        }
    }

    /// Returns how many calls `subject` received since the last reset.
    pub fn calls(&self, subject: &str) -> u32 {
        self.lock().doubles.get(subject).map_or(0, |d| d.calls)
    }

    /// Returns the number of registered doubles.
    pub fn len(&self) -> usize {
        self.lock().doubles.len()
    }

    /// Returns true if nothing is registered and no calls were recorded.
    pub fn is_empty(&self) -> bool {
        let state = self.lock();
        state.doubles.is_empty() && state.unexpected.is_empty()
    }

    /// Lists every unmet expectation and unexpected call, in subject order.
    pub fn verify(&self) -> Result<(), Vec<String>> {
        let state = self.lock();
        let mut unmet: Vec<String> = state
            .doubles
            .iter()
            .filter(|(_, d)| d.verified && !d.expected.is_satisfied_by(d.calls))
            .map(|(subject, d)| {
                format!(
                    "{subject} expected {}, got {}",
                    d.expected.describe(),
                    d.calls
                )
            })
            .collect();
        unmet.extend(
            state
                .unexpected
                .iter()
                .map(|subject| format!("{subject} called without an expectation")),
        );

        if unmet.is_empty() { Ok(()) } else { Err(unmet) }
    }

    /// Drops all doubles and recorded calls.
    pub fn reset(&self) {
        let mut state = self.lock();
        state.doubles.clear();
        state.unexpected.clear();
    }

    fn insert(&self, subject: &str, double: Double) {
        self.lock().doubles.insert(subject.to_string(), double);
    }

    fn update(&self, subject: &str, f: impl FnOnce(&mut Double)) {
        if let Some(double) = self.lock().doubles.get_mut(subject) {
            f(double);
        }
    }

    // A panic while holding the lock must not wedge later runs; the state is
    // reset at the next setup anyway.
    fn lock(&self) -> MutexGuard<'_, SpaceState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Builder returned by [`Space::expect`] to refine an expectation.
#[derive(Debug)]
pub struct Expectation<'a> {
    space: &'a Space,
    subject: String,
}

impl Expectation<'_> {
    /// Expects exactly `n` calls.
    pub fn times(self, n: u32) -> Self {
        self.space
            .update(&self.subject, |d| d.expected = CallCount::Exactly(n));
        self
    }

    /// Expects `n` or more calls.
    pub fn at_least(self, n: u32) -> Self {
        self.space
            .update(&self.subject, |d| d.expected = CallCount::AtLeast(n));
        self
    }

    /// Expects no calls at all.
    pub fn never(self) -> Self {
        self.times(0)
    }

    /// Sets the value returned to callers.
    pub fn returns(self, value: Value) -> Self {
        self.space.update(&self.subject, |d| d.returns = value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_expectation_defaults_to_one_call() {
        let space = Space::new();
        space.expect("billing.charge");

        assert_eq!(
            space.verify().unwrap_err(),
            vec!["billing.charge expected exactly 1 call, got 0".to_string()]
        );

        space.call("billing.charge");
        assert!(space.verify().is_ok());
    }

    #[test]
    fn test_expectation_returns_value() {
        let space = Space::new();
        space
            .expect("users.find")
            .times(2)
            .returns(json!({"id": 7}));

        assert_eq!(space.call("users.find"), Some(json!({"id": 7})));
        assert_eq!(space.call("users.find"), Some(json!({"id": 7})));
        assert_eq!(space.calls("users.find"), 2);
        assert!(space.verify().is_ok());
    }

    #[test]
    fn test_never_and_at_least() {
        let space = Space::new();
        space.expect("mailer.deliver").never();
        space.expect("audit.log").at_least(2);

        space.call("mailer.deliver");
        space.call("audit.log");

        let unmet = space.verify().unwrap_err();
        assert_eq!(unmet.len(), 2);
        assert_eq!(unmet[0], "audit.log expected at least 2 calls, got 1");
        assert_eq!(unmet[1], "mailer.deliver expected never, got 1");
    }

    #[test]
    fn test_stubs_are_not_verified() {
        let space = Space::new();
        space.stub("clock.now", json!("2020-01-01T00:00:00Z"));

        assert!(space.verify().is_ok());
        assert_eq!(space.call("clock.now"), Some(json!("2020-01-01T00:00:00Z")));
        assert!(space.verify().is_ok());
    }

    #[test]
    fn test_unexpected_calls_fail_verification() {
        let space = Space::new();
        assert_eq!(space.call("cache.flush"), None);

        let unmet = space.verify().unwrap_err();
        assert_eq!(unmet, vec!["cache.flush called without an expectation"]);
    }

    #[test]
    fn test_reset_clears_everything() {
        let space = Space::new();
        space.expect("billing.charge");
        space.call("unknown");
        assert!(!space.is_empty());

        space.reset();
        assert!(space.is_empty());
        assert_eq!(space.len(), 0);
        assert!(space.verify().is_ok());
    }

    #[test]
    fn test_global_space_is_shared() {
        let a = Space::global();
        let b = Space::global();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
