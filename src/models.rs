use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::{IntoParams, ToSchema};

// --- Rule Resource (mirrors the upstream panel's JSON) ---

/// RuleStatus
///
/// Lifecycle state reported by the upstream panel. Rules are created `stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum RuleStatus {
    Running,
    #[default]
    Stopped,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum RuleProtocol {
    #[default]
    Tcp,
    Udp,
}

/// RuleType
///
/// `Forward` rules listen on an entry node and dial the targets directly.
/// `Tunnel` rules listen on the entry node of a tunnel and dial through its chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum RuleType {
    #[default]
    Forward,
    Tunnel,
}

/// Rule
///
/// A forwarding rule as returned by `GET /rules/{id}` and inside list pages.
/// Unknown upstream fields (e.g. the embedded node/tunnel) are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct Rule {
    pub id: u64,
    pub node_id: Option<u64>,
    pub tunnel_id: Option<u64>,
    pub name: String,
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    pub protocol: RuleProtocol,
    pub listen_port: u16,
    #[serde(default)]
    pub targets: Vec<String>,
    #[serde(default)]
    pub strategy: String,
    #[serde(default)]
    pub enable_tls: bool,
    pub status: RuleStatus,
    #[serde(default)]
    pub service_id: String,
    #[serde(default)]
    pub observer_id: String,

    // Traffic counters, updated upstream by the observer.
    #[serde(default)]
    pub input_bytes: i64,
    #[serde(default)]
    pub output_bytes: i64,
    #[serde(default)]
    pub total_bytes: i64,
    #[serde(default)]
    pub total_requests: i64,

    #[serde(default)]
    pub remark: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

// --- Request Payloads ---

/// CreateRuleRequest
///
/// Body of `POST /rules`. Exactly one of `node_id` (forward) or `tunnel_id` (tunnel)
/// is expected; the upstream enforces it, this crate forwards whatever it is given.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateRuleRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tunnel_id: Option<u64>,
    #[schema(example = "web-8080")]
    pub name: String,
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    pub protocol: RuleProtocol,
    #[schema(example = 8080)]
    pub listen_port: u16,
    #[serde(default)]
    pub targets: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub strategy: String,
    #[serde(default)]
    pub enable_tls: bool,
    #[serde(default)]
    pub remark: String,
}

/// Body of `PUT /rules/{id}`. The rule type and entry cannot change after creation.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateRuleRequest {
    pub name: String,
    pub protocol: RuleProtocol,
    pub listen_port: u16,
    #[serde(default)]
    pub targets: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub strategy: String,
    #[serde(default)]
    pub enable_tls: bool,
    #[serde(default)]
    pub remark: String,
}

/// RuleListQuery
///
/// Query parameters accepted by `GET /rules`. Unset fields are omitted from the
/// query string; the upstream defaults to page 1, 10 per page.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, IntoParams, Default, PartialEq)]
#[into_params(parameter_in = Query)]
#[ts(export)]
pub struct RuleListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(rename = "pageSize", skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tunnel_id: Option<u64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub rule_type: Option<RuleType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RuleStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
}

impl RuleListQuery {
    /// Flattens the set fields into query pairs, in declaration order.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        let mut push = |key: &str, value: Option<String>| {
            if let Some(value) = value {
                pairs.push((key.to_string(), value));
            }
        };

        push("page", self.page.map(|v| v.to_string()));
        push("pageSize", self.page_size.map(|v| v.to_string()));
        push("node_id", self.node_id.map(|v| v.to_string()));
        push("tunnel_id", self.tunnel_id.map(|v| v.to_string()));
        push("type", self.rule_type.map(|t| t.as_str().to_string()));
        push("status", self.status.map(|s| s.as_str().to_string()));
        push("keyword", self.keyword.clone());
        pairs
    }
}

impl RuleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleType::Forward => "forward",
            RuleType::Tunnel => "tunnel",
        }
    }
}

impl RuleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleStatus::Running => "running",
            RuleStatus::Stopped => "stopped",
            RuleStatus::Error => "error",
        }
    }
}

// --- Output Schemas ---

/// RuleStats
///
/// Payload of `GET /rules/stats`. `stopped` is derived upstream as `total - running`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default, PartialEq, Eq)]
#[ts(export)]
pub struct RuleStats {
    pub total: i64,
    pub running: i64,
    pub stopped: i64,
    pub forward_type: i64,
    pub tunnel_type: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_query_omits_unset_fields() {
        let query = RuleListQuery {
            page: Some(2),
            rule_type: Some(RuleType::Tunnel),
            keyword: Some("web".into()),
            ..Default::default()
        };

        assert_eq!(
            query.to_pairs(),
            vec![
                ("page".to_string(), "2".to_string()),
                ("type".to_string(), "tunnel".to_string()),
                ("keyword".to_string(), "web".to_string()),
            ]
        );
        assert!(RuleListQuery::default().to_pairs().is_empty());
    }

    #[test]
    fn rule_decodes_upstream_payload_with_extra_fields() {
        let rule: Rule = serde_json::from_value(json!({
            "id": 7,
            "node_id": 1,
            "tunnel_id": null,
            "name": "ssh",
            "type": "forward",
            "protocol": "tcp",
            "listen_port": 2222,
            "targets": ["10.0.0.2:22"],
            "status": "running",
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-01-02T00:00:00Z",
            "node": { "id": 1, "name": "edge" }
        }))
        .unwrap();

        assert_eq!(rule.id, 7);
        assert_eq!(rule.rule_type, RuleType::Forward);
        assert_eq!(rule.status, RuleStatus::Running);
        assert_eq!(rule.targets, vec!["10.0.0.2:22".to_string()]);
        assert_eq!(rule.total_bytes, 0);
    }

    #[test]
    fn create_request_uses_upstream_field_names() {
        let req = CreateRuleRequest {
            node_id: Some(3),
            name: "dns".into(),
            protocol: RuleProtocol::Udp,
            listen_port: 53,
            ..Default::default()
        };
        let body = serde_json::to_value(&req).unwrap();

        assert_eq!(body["type"], "forward");
        assert_eq!(body["protocol"], "udp");
        assert_eq!(body["node_id"], 3);
        assert!(body.get("tunnel_id").is_none());
        assert!(body.get("strategy").is_none());
    }
}
