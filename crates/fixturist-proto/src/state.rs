//! Lifecycle states of a single scenario run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The furthest point a scenario run has reached.
///
/// States advance strictly in declaration order. Mock teardown is not a
/// state: it runs after whichever state was last reached, on every exit path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// Scenario built, nothing executed yet.
    Created,
    /// The adapter reset the mock space.
    MocksInitialized,
    /// Global and scenario setups have all been applied.
    SetupsApplied,
    /// The handler returned.
    HandlerInvoked,
    /// The response is stored on the scenario.
    ResponseCaptured,
    /// The fixture is on disk.
    Persisted,
}

impl RunState {
    /// Returns the snake_case name used in logs and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            RunState::Created => "created",
            RunState::MocksInitialized => "mocks_initialized",
            RunState::SetupsApplied => "setups_applied",
            RunState::HandlerInvoked => "handler_invoked",
            RunState::ResponseCaptured => "response_captured",
            RunState::Persisted => "persisted",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
