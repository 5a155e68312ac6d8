use async_trait::async_trait;
use reqwest::{Method, Url};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::TransportError;

/// ApiRequest
///
/// A request descriptor built by the resource client. `path` is relative to the
/// transport's base URL and always starts with `/`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Bearer token forwarded as `Authorization: Bearer <token>`.
    pub bearer: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            bearer: None,
        }
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_bearer(mut self, token: Option<String>) -> Self {
        self.bearer = token;
        self
    }
}

// 1. Transport Contract
/// Transport
///
/// The single seam between the resource client and the network. Implementations perform
/// exactly one HTTP exchange per call: no retry, no caching. Any failure is returned as-is.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends the request and resolves with the decoded JSON body of a 2xx response.
    async fn send(&self, request: ApiRequest) -> Result<Value, TransportError>;
}

/// TransportState
///
/// The concrete type used to share the transport across the application state.
pub type TransportState = Arc<dyn Transport>;

// 2. The Real Implementation (reqwest)
/// HttpTransport
///
/// Sends requests to the upstream panel API with a shared `reqwest::Client`.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Builds a transport rooted at `base_url` (e.g. `http://127.0.0.1:8080/api/v1`).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Joins the base URL with a request path. `Url::join` would drop the last base segment
    /// (`/api/v1` + `rules` -> `/api/rules`), so the path is appended as text instead.
    pub fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        let joined = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        Url::parse(&joined).map_err(|e| TransportError::InvalidUrl(format!("{joined}: {e}")))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value, TransportError> {
        let url = self.endpoint(&request.path)?;
        tracing::debug!(method = %request.method, %url, "upstream request");

        let mut builder = self.client.request(request.method.clone(), url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(method = %request.method, path = %request.path, error = %e, "upstream unreachable");
            TransportError::from(e)
        })?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            tracing::warn!(
                method = %request.method,
                path = %request.path,
                status = status.as_u16(),
                "upstream rejected request"
            );
            let body = serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| TransportError::Decode(e.to_string()))
    }
}

// 3. The Mock Implementation (For Tests)
/// MockTransport
///
/// Records every request it receives and answers with a canned response. Used to assert
/// the exact method/path/body the resource client produces without a network.
#[derive(Default)]
pub struct MockTransport {
    requests: Mutex<Vec<ApiRequest>>,
    response: Option<Value>,
    failure: Option<fn() -> TransportError>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers every request with `body`.
    pub fn responding(body: Value) -> Self {
        Self {
            response: Some(body),
            ..Self::default()
        }
    }

    /// Fails every request with the error produced by `make_error`.
    pub fn failing(make_error: fn() -> TransportError) -> Self {
        Self {
            failure: Some(make_error),
            ..Self::default()
        }
    }

    /// Snapshot of the requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        self.requests().pop()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value, TransportError> {
        if let Ok(mut guard) = self.requests.lock() {
            guard.push(request);
        }
        if let Some(make_error) = self.failure {
            return Err(make_error());
        }
        Ok(self.response.clone().unwrap_or(Value::Null))
    }
}
