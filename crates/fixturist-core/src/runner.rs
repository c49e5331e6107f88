//! Sequential batch execution of scenarios.

use crate::config::Configuration;
use crate::fixture_store::FixtureKey;
use crate::scenario::Scenario;
use fixturist_proto::Error;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{info, warn};

/// Runs scenarios one after another against a single configuration.
///
/// Runs never overlap: the mock space behind the adapter is shared, so each
/// scenario finishes (teardown included) before the next one starts. A failed
/// scenario does not stop the batch.
pub struct ScenarioRunner<'a> {
    config: &'a Configuration,
}

impl<'a> ScenarioRunner<'a> {
    /// Creates a runner over the given configuration.
    pub fn new(config: &'a Configuration) -> Self {
        Self { config }
    }

    /// Runs every scenario in order and reports what was persisted and what failed.
    pub fn run_all(&self, scenarios: impl IntoIterator<Item = Scenario>) -> RunSummary {
        let mut summary = RunSummary::default();
        let mut written: HashMap<FixtureKey, String> = HashMap::new();

        for mut scenario in scenarios {
            if let Ok(key) = scenario.fixture_key()
                && let Some(previous) = written.get(&key)
            {
                warn!(
                    key = %key,
                    previous = %previous,
                    scenario = %scenario.name(),
                    "Two scenarios in this batch share a fixture key, the later one overwrites"
                );
            }

            match scenario.run(self.config) {
                Ok(path) => {
                    if let Ok(key) = scenario.fixture_key() {
                        written.insert(key, scenario.name().to_string());
                    }
                    summary.persisted.push((scenario.name().to_string(), path));
                }
                Err(error) => {
                    warn!(scenario = %scenario.name(), error = %error, "Scenario failed");
                    summary.failures.push(ScenarioFailure {
                        scenario: scenario.name().to_string(),
                        error,
                    });
                }
            }
        }

        info!(
            persisted = summary.persisted.len(),
            failed = summary.failures.len(),
            "Scenario batch finished"
        );
        summary
    }
}

/// A scenario that did not produce its fixture.
#[derive(Debug)]
pub struct ScenarioFailure {
    /// Scenario name as given.
    pub scenario: String,
    /// The error the run returned.
    pub error: Error,
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct RunSummary {
    persisted: Vec<(String, PathBuf)>,
    failures: Vec<ScenarioFailure>,
}

impl RunSummary {
    /// Returns true if every scenario persisted its fixture.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Scenario names and the fixture paths they wrote, in run order.
    pub fn persisted(&self) -> &[(String, PathBuf)] {
        &self.persisted
    }

    /// Failed scenarios, in run order.
    pub fn failures(&self) -> &[ScenarioFailure] {
        &self.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{EchoHandler, FailingHandler, RecordingAdapter};
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn test_run_all_continues_after_failure() {
        let dir = TempDir::new().unwrap();
        let adapter = Arc::new(RecordingAdapter::new());
        let config = Configuration::builder()
            .fixture_path(dir.path())
            .mock_with_shared(adapter.clone())
            .build()
            .unwrap();

        let scenarios = vec![
            Scenario::new("first").with_handler(EchoHandler).with_action("index"),
            Scenario::new("broken")
                .with_handler(FailingHandler::new("nope"))
                .with_action("index"),
            Scenario::new("third").with_handler(EchoHandler).with_action("index"),
        ];

        let summary = ScenarioRunner::new(&config).run_all(scenarios);

        assert!(!summary.is_success());
        assert_eq!(summary.persisted().len(), 2);
        assert_eq!(summary.persisted()[0].0, "first");
        assert_eq!(summary.persisted()[1].0, "third");
        assert_eq!(summary.failures().len(), 1);
        assert_eq!(summary.failures()[0].scenario, "broken");
        assert_eq!(adapter.teardown_count(), 3);
    }

    #[test]
    fn test_empty_batch_is_success() {
        let dir = TempDir::new().unwrap();
        let config = Configuration::builder()
            .fixture_path(dir.path())
            .mock_with(RecordingAdapter::new())
            .build()
            .unwrap();

        let summary = ScenarioRunner::new(&config).run_all(Vec::new());
        assert!(summary.is_success());
        assert!(summary.persisted().is_empty());
    }
}
