//! Scenario definitions.

use crate::config::Configuration;
use crate::context::{RequestContext, Setup};
use crate::executor::RequestExecutor;
use crate::fixture_store::{FixtureKey, FixtureRecord};
use crate::identity::{handler_namespace, identifier};
use fixturist_proto::{Error, Handler, Method, Params, Response, Result, RunState};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// A named handler call that produces exactly one fixture.
///
/// Build it with the `with_*` methods, then call [`Scenario::run`] once.
///
/// ```
/// use fixturist_core::Scenario;
/// use fixturist_core::testing::EchoHandler;
/// use serde_json::json;
///
/// let scenario = Scenario::new("Admin Permissions")
///     .with_handler(EchoHandler)
///     .with_action("show")
///     .with_param("id", json!(1))
///     .with_setup(|ctx| {
///         ctx.set_session("role", json!("admin"));
///         Ok(())
///     });
///
/// assert_eq!(scenario.identifier(), "admin_permissions");
/// assert_eq!(scenario.fixture_key().unwrap().action, "show");
/// ```
pub struct Scenario {
    name: String,
    identifier: String,
    setups: Vec<Setup>,
    handler: Option<Arc<dyn Handler>>,
    method: Method,
    action: Option<String>,
    params: Params,
    response: Option<Response>,
    state: RunState,
}

impl Scenario {
    /// Creates a scenario. The identifier is derived here, once.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            identifier: identifier(&name),
            name,
            setups: Vec::new(),
            handler: None,
            method: Method::default(),
            action: None,
            params: Params::new(),
            response: None,
            state: RunState::Created,
        }
    }

    /// Sets the handler under test.
    pub fn with_handler(self, handler: impl Handler + 'static) -> Self {
        self.with_shared_handler(Arc::new(handler))
    }

    /// Sets a handler shared with other scenarios.
    pub fn with_shared_handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Sets the action to invoke.
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Sets the request method (GET by default).
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Replaces all params.
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Adds one param.
    pub fn with_param(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.params.insert(key.into(), value);
        self
    }

    /// Appends a setup. Scenario setups run after global setups, in the
    /// order they were added.
    pub fn with_setup<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut RequestContext<'_>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.setups.push(Arc::new(f));
        self
    }

    /// Appends an already wrapped setup.
    pub fn with_shared_setup(mut self, setup: Setup) -> Self {
        self.setups.push(setup);
        self
    }

    /// The name as given.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The normalized identifier used in the fixture key.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Number of scenario-specific setups.
    pub fn setup_count(&self) -> usize {
        self.setups.len()
    }

    /// The captured response, once a run got that far.
    pub fn response(&self) -> Option<&Response> {
        self.response.as_ref()
    }

    /// The last lifecycle state reached.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// The handler's on-disk namespace, if a handler is set.
    pub fn handler_namespace(&self) -> Option<String> {
        self.handler
            .as_ref()
            .map(|handler| handler_namespace(&handler.qualified_name()))
    }

    /// The key this scenario's fixture is stored under.
    pub fn fixture_key(&self) -> Result<FixtureKey> {
        let namespace = self.handler_namespace().ok_or_else(|| self.missing("handler"))?;
        let action = self.action.as_deref().ok_or_else(|| self.missing("action"))?;
        FixtureKey::new(namespace, action, self.identifier.as_str())
    }

    /// Runs the scenario and persists its fixture.
    ///
    /// Mocks are torn down before this returns, whatever the outcome. A
    /// scenario runs at most once; later calls fail with
    /// [`Error::ScenarioAlreadyRun`].
    pub fn run(&mut self, config: &Configuration) -> Result<PathBuf> {
        if self.state != RunState::Created {
            return Err(Error::ScenarioAlreadyRun(self.name.clone()));
        }

        let key = self.fixture_key()?;
        let handler = self.handler.clone().ok_or_else(|| self.missing("handler"))?;
        info!(scenario = %self.name, key = %key, "Running scenario");

        let mut executor = RequestExecutor::new(
            config.adapter(),
            handler.as_ref(),
            self.method,
            &key.action,
            &self.params,
        )
        .verify_mocks(config.verify_mocks());
        let result = executor.execute(config.global_setups(), &self.setups);
        self.state = executor.state();
        let response = result?;

        self.response = Some(response.clone());
        self.state = RunState::ResponseCaptured;

        let record = FixtureRecord {
            key,
            method: self.method,
            params: self.params.clone(),
            response,
        };
        let path = config.store().save(&record)?;
        self.state = RunState::Persisted;

        Ok(path)
    }

    fn missing(&self, what: &'static str) -> Error {
        Error::IncompleteScenario {
            scenario: self.name.clone(),
            missing: what,
        }
    }
}

impl std::fmt::Debug for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scenario")
            .field("name", &self.name)
            .field("identifier", &self.identifier)
            .field("method", &self.method)
            .field("action", &self.action)
            .field("params", &self.params)
            .field("setups", &self.setups.len())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
