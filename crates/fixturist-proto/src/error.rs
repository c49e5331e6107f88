//! Error types shared across Fixturist crates.

use crate::RunState;
use std::path::PathBuf;

/// Result alias using the shared [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while running a scenario or persisting its fixture.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Mock expectations registered during a run were not satisfied.
    #[error("{framework} mock verification failed: {}", .unmet.join("; "))]
    AdapterVerification {
        framework: String,
        unmet: Vec<String>,
    },

    /// A setup or the handler itself failed.
    ///
    /// `state` is the last lifecycle state reached before the failure.
    /// `source` is the original error, untouched.
    #[error("handler execution failed after {state}: {source}")]
    HandlerExecution {
        state: RunState,
        #[source]
        source: anyhow::Error,
    },

    /// The adapter could not reset the mock space before the run.
    #[error("{framework} failed to set up mocks: {message}")]
    MockSetup { framework: String, message: String },

    /// The adapter could not release the mock space after the run.
    #[error("{framework} failed to tear down mocks: {message}")]
    MockTeardown { framework: String, message: String },

    /// The fixture could not be written.
    #[error("failed to write fixture {}: {source}", .path.display())]
    FixtureWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The fixture could not be read back.
    #[error("failed to read fixture {}: {source}", .path.display())]
    FixtureRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The fixture exists but is not a valid fixture document.
    #[error("invalid fixture {}: {source}", .path.display())]
    FixtureDecode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A key segment would escape or collapse the fixture tree.
    #[error("invalid fixture key segment {segment:?} in {field}")]
    InvalidFixtureKey { field: &'static str, segment: String },

    /// The scenario is missing a handler or an action.
    #[error("scenario '{scenario}' is missing its {missing}")]
    IncompleteScenario {
        scenario: String,
        missing: &'static str,
    },

    /// The scenario already produced its fixture.
    #[error("scenario '{0}' has already been run")]
    ScenarioAlreadyRun(String),
}

impl Error {
    /// Returns the original handler or setup error, if this wraps one.
    pub fn handler_cause(&self) -> Option<&anyhow::Error> {
        match self {
            Error::HandlerExecution { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_message_lists_unmet() {
        let err = Error::AdapterVerification {
            framework: "space".to_string(),
            unmet: vec![
                "billing.charge expected 1 call, got 0".to_string(),
                "mailer.deliver expected never, got 2".to_string(),
            ],
        };

        let msg = err.to_string();
        assert!(msg.starts_with("space mock verification failed"));
        assert!(msg.contains("billing.charge"));
        assert!(msg.contains("mailer.deliver"));
    }

    #[test]
    fn test_handler_cause_preserves_original() {
        #[derive(Debug, thiserror::Error)]
        #[error("record not found")]
        struct NotFound;

        let err = Error::HandlerExecution {
            state: RunState::SetupsApplied,
            source: anyhow::Error::new(NotFound),
        };

        let cause = err.handler_cause().unwrap();
        assert!(cause.downcast_ref::<NotFound>().is_some());
        assert!(err.to_string().contains("setups_applied"));
    }

    #[test]
    fn test_handler_cause_none_for_io() {
        let err = Error::FixtureWrite {
            path: PathBuf::from("fixtures/a.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.handler_cause().is_none());
        assert!(err.to_string().contains("fixtures/a.json"));
    }
}
