//! Deterministic handlers for scenario tests.

use fixturist_proto::{Handler, Request, Response};
use serde_json::json;

/// Responds with a JSON echo of the request it received.
///
/// The body lists method, action, params, headers and session, so tests can
/// see exactly what setups did to the request.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoHandler;

impl Handler for EchoHandler {
    fn qualified_name(&self) -> String {
        "fixturist_core::testing::handlers::EchoHandler".to_string()
    }

    fn invoke(&self, request: &Request) -> anyhow::Result<Response> {
        Ok(Response::json(json!({
            "method": request.method,
            "action": request.action,
            "params": request.params,
            "headers": request.headers,
            "session": request.session,
        })))
    }
}

/// Fails every invocation with a fixed message.
#[derive(Debug, Clone)]
pub struct FailingHandler {
    message: String,
}

impl FailingHandler {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Handler for FailingHandler {
    fn qualified_name(&self) -> String {
        "fixturist_core::testing::handlers::FailingHandler".to_string()
    }

    fn invoke(&self, _request: &Request) -> anyhow::Result<Response> {
        anyhow::bail!("{}", self.message)
    }
}

/// A handler built from a closure, with an explicit qualified name.
pub struct FnHandler<F> {
    name: String,
    f: F,
}

impl<F> FnHandler<F>
where
    F: Fn(&Request) -> anyhow::Result<Response> + Send + Sync,
{
    /// Creates a handler that reports `name` as its qualified name.
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> Handler for FnHandler<F>
where
    F: Fn(&Request) -> anyhow::Result<Response> + Send + Sync,
{
    fn qualified_name(&self) -> String {
        self.name.clone()
    }

    fn invoke(&self, request: &Request) -> anyhow::Result<Response> {
        (self.f)(request)
    }
}
