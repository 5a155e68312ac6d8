//! Error types surfaced by the resource client and the route resolver.
//!
//! `TransportError` is returned unchanged from every `RuleClient` operation. When it
//! crosses the console's HTTP boundary it becomes either the upstream status + body
//! (for `Status`) or a 502 carrying `{ "kind": "...", "message": "..." }`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::ser::SerializeStruct;
use serde_json::Value;

/// Failure of a single upstream request.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection refused, DNS failure, timeout, or any other failure before a status arrived.
    #[error("{0}")]
    Network(String),

    /// The upstream answered with a non-2xx status. `body` is the upstream payload,
    /// decoded as JSON when possible. A body that is not JSON is kept as its text and
    /// replayed as `text/plain`.
    #[error("upstream responded with status {status}")]
    Status { status: u16, body: Value },

    /// A 2xx response whose body was not valid JSON.
    #[error("{0}")]
    Decode(String),

    /// The base URL and request path did not form a valid URL.
    #[error("{0}")]
    InvalidUrl(String),
}

impl TransportError {
    pub fn kind(&self) -> &'static str {
        match self {
            TransportError::Network(_) => "Network",
            TransportError::Status { .. } => "Status",
            TransportError::Decode(_) => "Decode",
            TransportError::InvalidUrl(_) => "InvalidUrl",
        }
    }

    /// The upstream status code, when the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl serde::Serialize for TransportError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut s = serializer.serialize_struct("TransportError", 2)?;
        s.serialize_field("kind", self.kind())?;
        s.serialize_field("message", &self.to_string())?;
        s.end()
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            TransportError::Decode(err.to_string())
        } else {
            TransportError::Network(err.to_string())
        }
    }
}

impl IntoResponse for TransportError {
    fn into_response(self) -> Response {
        match self {
            TransportError::Status { status, body } => {
                let code = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                match body {
                    Value::String(text) => (code, text).into_response(),
                    body => (code, Json(body)).into_response(),
                }
            }
            other => (StatusCode::BAD_GATEWAY, Json(other)).into_response(),
        }
    }
}

/// Failure of route resolution. Only reachable with a malformed route table.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("too many redirects while resolving {0}")]
    RedirectLoop(String),
}
