//! The request context setups run against.

use fixturist_proto::{Method, MockAdapter, Request};
use std::sync::Arc;

/// A setup action applied to the request context before the handler runs.
///
/// Setups are shared (global setups are reused by every scenario), so they are
/// reference-counted and must be callable more than once.
pub type Setup = Arc<dyn Fn(&mut RequestContext<'_>) -> anyhow::Result<()> + Send + Sync>;

/// Wraps a closure as a [`Setup`].
pub fn setup<F>(f: F) -> Setup
where
    F: Fn(&mut RequestContext<'_>) -> anyhow::Result<()> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A fresh request under construction, plus the active mock adapter.
///
/// One context is created per run, after the mock space is initialized.
/// Setups mutate it; the handler then receives the finished [`Request`].
pub struct RequestContext<'a> {
    adapter: &'a dyn MockAdapter,
    request: Request,
}

impl<'a> RequestContext<'a> {
    pub(crate) fn new(adapter: &'a dyn MockAdapter, request: Request) -> Self {
        Self { adapter, request }
    }

    /// Returns the active mock adapter.
    pub fn adapter(&self) -> &'a dyn MockAdapter {
        self.adapter
    }

    /// Returns the active adapter as a concrete type, if it is one.
    pub fn adapter_as<T: MockAdapter + 'static>(&self) -> Option<&'a T> {
        self.adapter.as_any().downcast_ref::<T>()
    }

    /// Returns the request built so far.
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Returns the request method.
    pub fn method(&self) -> Method {
        self.request.method
    }

    /// Returns the action the handler will be invoked with.
    pub fn action(&self) -> &str {
        &self.request.action
    }

    /// Sets a request header.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.request.headers.insert(name.into(), value.into());
    }

    /// Sets a session entry.
    pub fn set_session(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.request.session.insert(key.into(), value);
    }

    /// Adds or overrides a request param.
    pub fn set_param(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.request.params.insert(key.into(), value);
    }

    pub(crate) fn into_request(self) -> Request {
        self.request
    }
}
