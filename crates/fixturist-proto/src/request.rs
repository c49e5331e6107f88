//! Request types handed to a handler.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Named request parameters.
///
/// Ordered so that fixtures embedding them serialize identically every run.
pub type Params = BTreeMap<String, serde_json::Value>;

/// Request method used to invoke a handler action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    /// Returns the uppercase method name.
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully prepared request, built after all setups have run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Request method.
    pub method: Method,

    /// Handler action to invoke (e.g. "index", "show").
    pub action: String,

    /// Scenario params merged with params added by setups.
    #[serde(default)]
    pub params: Params,

    /// Request headers set by setups.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// Session entries set by setups.
    #[serde(default)]
    pub session: BTreeMap<String, serde_json::Value>,
}

impl Request {
    /// Creates a request with no params, headers or session.
    pub fn new(method: Method, action: impl Into<String>) -> Self {
        Self {
            method,
            action: action.into(),
            ..Self::default()
        }
    }

    /// Returns a param by name.
    pub fn param(&self, name: &str) -> Option<&serde_json::Value> {
        self.params.get(name)
    }

    /// Returns a header by name, ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}
