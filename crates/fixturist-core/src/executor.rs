//! Executes one handler invocation inside the mock lifecycle.
//!
//! The executor owns the ordering guarantees of a run:
//! - mocks are set up before anything else touches the request
//! - global setups run before scenario setups, each tier in insertion order
//! - mocks are torn down exactly once on every exit path, panics included

use crate::context::{RequestContext, Setup};
use fixturist_proto::{
    Error, Handler, Method, MockAdapter, Params, Request, Response, Result, RunState,
};
use scopeguard::ScopeGuard;
use tracing::{debug, warn};

/// Runs a handler action with ordered setups, bracketed by the adapter lifecycle.
///
/// An executor is built fresh for each run and records how far the run got
/// in [`RequestExecutor::state`].
pub struct RequestExecutor<'a> {
    adapter: &'a dyn MockAdapter,
    handler: &'a dyn Handler,
    method: Method,
    action: &'a str,
    params: &'a Params,
    verify_mocks: bool,
    state: RunState,
}

impl<'a> RequestExecutor<'a> {
    /// Creates an executor bound to a handler, action and params.
    pub fn new(
        adapter: &'a dyn MockAdapter,
        handler: &'a dyn Handler,
        method: Method,
        action: &'a str,
        params: &'a Params,
    ) -> Self {
        Self {
            adapter,
            handler,
            method,
            action,
            params,
            verify_mocks: false,
            state: RunState::Created,
        }
    }

    /// Verifies mock expectations after the handler returns, before teardown.
    ///
    /// Off by default: an unverified run succeeds even with unmet expectations.
    pub fn verify_mocks(mut self, verify: bool) -> Self {
        self.verify_mocks = verify;
        self
    }

    /// Returns the last lifecycle state this executor reached.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Executes the handler and returns its response.
    ///
    /// `global` setups are applied first, then `scenario` setups. When the run
    /// fails and teardown fails too, the run's error is returned and the
    /// teardown error is only logged.
    pub fn execute(&mut self, global: &[Setup], scenario: &[Setup]) -> Result<Response> {
        let adapter = self.adapter;

        // Only fires when `drive` unwinds; every other path tears down below.
        let armed = scopeguard::guard(adapter, |adapter| {
            if let Err(e) = adapter.teardown_mocks() {
                warn!(
                    framework = adapter.framework_name(),
                    error = %e,
                    "Mock teardown failed during unwind"
                );
            }
        });

        let outcome = self.drive(global, scenario);

        let adapter = ScopeGuard::into_inner(armed);
        let released = adapter.teardown_mocks();
        debug!(
            framework = adapter.framework_name(),
            state = %self.state,
            ok = outcome.is_ok(),
            "Mocks torn down"
        );

        match (outcome, released) {
            (Ok(response), Ok(())) => Ok(response),
            (Ok(_), Err(teardown)) => Err(teardown),
            (Err(original), Ok(())) => Err(original),
            (Err(original), Err(teardown)) => {
                warn!(
                    framework = adapter.framework_name(),
                    error = %teardown,
                    "Mock teardown failed while the run was already failing, keeping the original error"
                );
                Err(original)
            }
        }
    }

    fn drive(&mut self, global: &[Setup], scenario: &[Setup]) -> Result<Response> {
        self.adapter.setup_mocks()?;
        self.state = RunState::MocksInitialized;

        let request = Request {
            params: self.params.clone(),
            ..Request::new(self.method, self.action)
        };
        let mut ctx = RequestContext::new(self.adapter, request);

        for (index, setup) in global.iter().chain(scenario).enumerate() {
            debug!(index, global = index < global.len(), "Applying setup");
            setup(&mut ctx).map_err(|source| Error::HandlerExecution {
                state: self.state,
                source,
            })?;
        }
        self.state = RunState::SetupsApplied;

        let request = ctx.into_request();
        let response = self
            .handler
            .invoke(&request)
            .map_err(|source| Error::HandlerExecution {
                state: self.state,
                source,
            })?;
        self.state = RunState::HandlerInvoked;
        debug!(action = self.action, status = response.status, "Handler invoked");

        if self.verify_mocks {
            self.adapter.verify_mocks()?;
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::setup;
    use crate::testing::{EchoHandler, FailingHandler, Lifecycle, RecordingAdapter};
    use fixturist_adapters::{Space, SpaceAdapter};
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    fn journal_setup(journal: &Arc<Mutex<Vec<String>>>, label: &str) -> Setup {
        let journal = Arc::clone(journal);
        let label = label.to_string();
        setup(move |_ctx| {
            journal.lock().unwrap().push(label.clone());
            Ok(())
        })
    }

    #[test]
    fn test_setups_run_global_then_scenario_in_order() {
        let adapter = RecordingAdapter::new();
        let journal = Arc::new(Mutex::new(Vec::new()));
        let global = vec![journal_setup(&journal, "g1"), journal_setup(&journal, "g2")];
        let scenario = vec![journal_setup(&journal, "s1"), journal_setup(&journal, "s2")];
        let params = Params::new();

        let mut executor =
            RequestExecutor::new(&adapter, &EchoHandler, Method::Get, "index", &params);
        executor.execute(&global, &scenario).unwrap();

        assert_eq!(*journal.lock().unwrap(), vec!["g1", "g2", "s1", "s2"]);
        assert_eq!(executor.state(), RunState::HandlerInvoked);
    }

    #[test]
    fn test_lifecycle_brackets_success() {
        let adapter = RecordingAdapter::new();
        let params = Params::new();

        let mut executor =
            RequestExecutor::new(&adapter, &EchoHandler, Method::Get, "index", &params);
        executor.execute(&[], &[]).unwrap();

        assert_eq!(adapter.events(), vec![Lifecycle::Setup, Lifecycle::Teardown]);
    }

    #[test]
    fn test_setup_failure_tears_down_and_keeps_error() {
        let adapter = RecordingAdapter::new();
        let params = Params::new();
        let failing = vec![setup(|_ctx| anyhow::bail!("seed data missing"))];

        let mut executor =
            RequestExecutor::new(&adapter, &EchoHandler, Method::Get, "index", &params);
        let err = executor.execute(&[], &failing).unwrap_err();

        assert_eq!(adapter.teardown_count(), 1);
        assert_eq!(executor.state(), RunState::MocksInitialized);
        match err {
            Error::HandlerExecution { state, source } => {
                assert_eq!(state, RunState::MocksInitialized);
                assert_eq!(source.to_string(), "seed data missing");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_handler_failure_tears_down_and_keeps_error() {
        let adapter = RecordingAdapter::new();
        let params = Params::new();

        let handler = FailingHandler::new("boom");
        let mut executor = RequestExecutor::new(&adapter, &handler, Method::Get, "index", &params);
        let err = executor.execute(&[], &[]).unwrap_err();

        assert_eq!(adapter.teardown_count(), 1);
        assert_eq!(executor.state(), RunState::SetupsApplied);
        assert_eq!(err.handler_cause().unwrap().to_string(), "boom");
    }

    #[test]
    fn test_original_error_wins_over_teardown_error() {
        let adapter = RecordingAdapter::new().fail_teardown();
        let params = Params::new();

        let handler = FailingHandler::new("boom");
        let mut executor = RequestExecutor::new(&adapter, &handler, Method::Get, "index", &params);
        let err = executor.execute(&[], &[]).unwrap_err();

        assert!(matches!(err, Error::HandlerExecution { .. }));
        assert_eq!(adapter.teardown_count(), 1);
    }

    #[test]
    fn test_teardown_error_surfaces_on_success() {
        let adapter = RecordingAdapter::new().fail_teardown();
        let params = Params::new();

        let mut executor =
            RequestExecutor::new(&adapter, &EchoHandler, Method::Get, "index", &params);
        let err = executor.execute(&[], &[]).unwrap_err();

        assert!(matches!(err, Error::MockTeardown { .. }));
    }

    #[test]
    fn test_setup_mocks_failure_still_tears_down() {
        let adapter = RecordingAdapter::new().fail_setup();
        let params = Params::new();

        let mut executor =
            RequestExecutor::new(&adapter, &EchoHandler, Method::Get, "index", &params);
        let err = executor.execute(&[], &[]).unwrap_err();

        assert!(matches!(err, Error::MockSetup { .. }));
        assert_eq!(executor.state(), RunState::Created);
        assert_eq!(adapter.teardown_count(), 1);
    }

    #[test]
    fn test_panicking_setup_still_tears_down() {
        let adapter = RecordingAdapter::new();
        let params = Params::new();
        let panicking = vec![setup(|_ctx| panic!("setup exploded"))];

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let mut executor =
                RequestExecutor::new(&adapter, &EchoHandler, Method::Get, "index", &params);
            executor.execute(&[], &panicking)
        }));

        assert!(result.is_err());
        assert_eq!(adapter.teardown_count(), 1);
    }

    #[test]
    fn test_verification_only_when_requested() {
        let space = Arc::new(Space::new());
        let adapter = SpaceAdapter::new(Arc::clone(&space));
        let params = Params::new();
        let expect_charge = vec![setup(|ctx| {
            if let Some(adapter) = ctx.adapter_as::<SpaceAdapter>() {
                adapter.space().expect("billing.charge");
            }
            Ok(())
        })];

        let mut unverified =
            RequestExecutor::new(&adapter, &EchoHandler, Method::Get, "index", &params);
        assert!(unverified.execute(&[], &expect_charge).is_ok());

        let mut verified =
            RequestExecutor::new(&adapter, &EchoHandler, Method::Get, "index", &params)
                .verify_mocks(true);
        let err = verified.execute(&[], &expect_charge).unwrap_err();
        assert!(matches!(err, Error::AdapterVerification { .. }));

        // Teardown ran despite the verification failure.
        assert!(space.is_empty());
    }

    #[test]
    fn test_setups_shape_the_request() {
        let adapter = RecordingAdapter::new();
        let mut params = Params::new();
        params.insert("id".to_string(), json!(7));
        let setups = vec![setup(|ctx| {
            ctx.set_header("Accept", "application/json");
            ctx.set_session("admin", json!(true));
            Ok(())
        })];

        let mut executor =
            RequestExecutor::new(&adapter, &EchoHandler, Method::Put, "update", &params);
        let response = executor.execute(&[], &setups).unwrap();

        let fixturist_proto::Body::Json(body) = response.body else {
            panic!("expected a JSON body");
        };
        assert_eq!(body["method"], json!("PUT"));
        assert_eq!(body["action"], json!("update"));
        assert_eq!(body["params"]["id"], json!(7));
        assert_eq!(body["headers"]["Accept"], json!("application/json"));
        assert_eq!(body["session"]["admin"], json!(true));
    }
}
