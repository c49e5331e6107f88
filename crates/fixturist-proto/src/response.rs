//! Response types captured from a handler.
//!
//! Everything here serializes deterministically: headers are kept in a
//! `BTreeMap` and binary bodies are stored as base64 so fixtures stay
//! valid UTF-8 JSON.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A handler response as it is written into a fixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Status code (e.g. 200, 404).
    pub status: u16,

    /// Response headers.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// Response payload.
    #[serde(default)]
    pub body: Body,
}

impl Response {
    /// Creates a response with the given status and an empty body.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            body: Body::Empty,
        }
    }

    /// Creates a 200 response with a JSON body and matching content type.
    pub fn json(value: serde_json::Value) -> Self {
        Self::new(200)
            .with_header("Content-Type", "application/json")
            .with_body(Body::Json(value))
    }

    /// Creates a 200 response with a text body.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(200)
            .with_header("Content-Type", "text/plain")
            .with_body(Body::Text(text.into()))
    }

    /// Sets the status code.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Sets a header, replacing any previous value.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets the body.
    pub fn with_body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }

    /// Returns true for 2xx status codes.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Response payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum Body {
    /// No payload.
    #[default]
    Empty,

    /// UTF-8 text.
    Text(String),

    /// Structured JSON payload.
    Json(serde_json::Value),

    /// Raw bytes, stored base64-encoded.
    Binary(String),
}

impl Body {
    /// Creates a binary body from raw bytes.
    pub fn binary(raw: &[u8]) -> Self {
        use base64::Engine;
        Body::Binary(base64::engine::general_purpose::STANDARD.encode(raw))
    }

    /// Returns the payload as raw bytes.
    ///
    /// JSON bodies are rendered compactly.
    pub fn to_bytes(&self) -> Result<Vec<u8>, base64::DecodeError> {
        use base64::Engine;
        match self {
            Body::Empty => Ok(Vec::new()),
            Body::Text(text) => Ok(text.as_bytes().to_vec()),
            Body::Json(value) => Ok(value.to_string().into_bytes()),
            Body::Binary(encoded) => base64::engine::general_purpose::STANDARD.decode(encoded),
        }
    }

    /// Returns true if there is no payload.
    pub fn is_empty(&self) -> bool {
        match self {
            Body::Empty => true,
            Body::Text(text) => text.is_empty(),
            Body::Json(_) => false,
            Body::Binary(encoded) => encoded.is_empty(),
        }
    }
}
