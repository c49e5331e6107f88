//! Name-based adapter selection.
//!
//! Configuration names the mocking backend once; this module turns that name
//! into the single adapter instance shared by every scenario run.

use crate::{NullAdapter, SpaceAdapter};
use fixturist_proto::MockAdapter;
use std::sync::Arc;
use tracing::debug;

/// Framework names accepted by [`adapter_for`].
pub const KNOWN_FRAMEWORKS: &[&str] = &["space", "none"];

/// Error returned when a configured framework name is not recognized.
#[derive(Debug, Clone)]
pub struct UnknownAdapterError {
    /// The name that was requested.
    pub requested: String,
}

impl std::fmt::Display for UnknownAdapterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Unknown mock framework '{}'. Supported: {}",
            self.requested,
            KNOWN_FRAMEWORKS.join(", ")
        )
    }
}

impl std::error::Error for UnknownAdapterError {}

/// Resolves a framework name to an adapter instance.
///
/// `"space"` resolves to an adapter over the process-wide [`Space`](crate::Space).
/// Names are matched case-insensitively.
pub fn adapter_for(name: &str) -> Result<Arc<dyn MockAdapter>, UnknownAdapterError> {
    let normalized = name.trim().to_ascii_lowercase();
    let adapter: Arc<dyn MockAdapter> = match normalized.as_str() {
        "space" => Arc::new(SpaceAdapter::global()),
        "none" => Arc::new(NullAdapter),
        _ => {
            return Err(UnknownAdapterError {
                requested: name.to_string(),
            });
        }
    };
    debug!(framework = adapter.framework_name(), "Mock adapter selected");
    Ok(adapter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapter_for_known_names() {
        assert_eq!(adapter_for("space").unwrap().framework_name(), "space");
        assert_eq!(adapter_for("none").unwrap().framework_name(), "none");
        assert_eq!(adapter_for(" Space ").unwrap().framework_name(), "space");
    }

    #[test]
    fn test_every_known_framework_resolves() {
        for name in KNOWN_FRAMEWORKS {
            assert_eq!(adapter_for(name).unwrap().framework_name(), *name);
        }
    }

    #[test]
    fn test_unknown_adapter_error() {
        let err = adapter_for("rr").err().unwrap();
        assert_eq!(err.requested, "rr");
        let msg = err.to_string();
        assert!(msg.contains("Unknown mock framework 'rr'"));
        assert!(msg.contains("space, none"));
    }
}
