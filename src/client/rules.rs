use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::transport::{ApiRequest, TransportState};
use crate::{error::TransportError, models::RuleListQuery};

/// Opaque identifier of a rule on the upstream panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId(pub u64);

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RuleId {
    fn from(id: u64) -> Self {
        RuleId(id)
    }
}

/// RuleClient
///
/// Maps the rule operations onto the upstream `/rules` endpoints. Every method builds one
/// `ApiRequest` and hands it to the transport; the transport's result is returned untouched.
#[derive(Clone)]
pub struct RuleClient {
    transport: TransportState,
    token: Option<String>,
}

impl RuleClient {
    pub fn new(transport: TransportState) -> Self {
        Self {
            transport,
            token: None,
        }
    }

    /// Returns a client whose requests carry `token` as a bearer credential.
    pub fn authorized(&self, token: impl Into<String>) -> Self {
        Self {
            transport: self.transport.clone(),
            token: Some(token.into()),
        }
    }

    fn request(&self, method: Method, path: String) -> ApiRequest {
        ApiRequest::new(method, path).with_bearer(self.token.clone())
    }

    /// GET /rules
    pub async fn list_rules(&self, query: &RuleListQuery) -> Result<Value, TransportError> {
        let request = self
            .request(Method::GET, "/rules".to_string())
            .with_query(query.to_pairs());
        self.transport.send(request).await
    }

    /// GET /rules/{id}
    pub async fn get_rule(&self, id: RuleId) -> Result<Value, TransportError> {
        let request = self.request(Method::GET, format!("/rules/{}", id));
        self.transport.send(request).await
    }

    /// POST /rules
    pub async fn create_rule<B: Serialize + ?Sized>(&self, data: &B) -> Result<Value, TransportError> {
        let request = self
            .request(Method::POST, "/rules".to_string())
            .with_body(to_body(data)?);
        self.transport.send(request).await
    }

    /// PUT /rules/{id}
    pub async fn update_rule<B: Serialize + ?Sized>(
        &self,
        id: RuleId,
        data: &B,
    ) -> Result<Value, TransportError> {
        let request = self
            .request(Method::PUT, format!("/rules/{}", id))
            .with_body(to_body(data)?);
        self.transport.send(request).await
    }

    /// DELETE /rules/{id}
    pub async fn delete_rule(&self, id: RuleId) -> Result<Value, TransportError> {
        let request = self.request(Method::DELETE, format!("/rules/{}", id));
        self.transport.send(request).await
    }

    /// POST /rules/{id}/start
    pub async fn start_rule(&self, id: RuleId) -> Result<Value, TransportError> {
        let request = self.request(Method::POST, format!("/rules/{}/start", id));
        self.transport.send(request).await
    }

    /// POST /rules/{id}/stop
    pub async fn stop_rule(&self, id: RuleId) -> Result<Value, TransportError> {
        let request = self.request(Method::POST, format!("/rules/{}/stop", id));
        self.transport.send(request).await
    }

    /// GET /rules/stats
    pub async fn rule_stats(&self) -> Result<Value, TransportError> {
        let request = self.request(Method::GET, "/rules/stats".to_string());
        self.transport.send(request).await
    }
}

// The payload is an untyped record; a value that cannot become JSON never reaches the wire.
fn to_body<B: Serialize + ?Sized>(data: &B) -> Result<Value, TransportError> {
    serde_json::to_value(data).map_err(|e| TransportError::Decode(e.to_string()))
}
