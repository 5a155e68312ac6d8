use gost_console::{
    MockTransport, RuleClient,
    client::{ApiRequest, RuleId},
    error::TransportError,
    models::{CreateRuleRequest, RuleListQuery, RuleProtocol, RuleStatus},
};
use reqwest::Method;
use serde_json::json;
use std::sync::Arc;

fn client_with(mock: &Arc<MockTransport>) -> RuleClient {
    RuleClient::new(mock.clone())
}

#[tokio::test]
async fn test_create_rule_posts_body_unchanged() {
    let mock = Arc::new(MockTransport::new());
    let client = client_with(&mock);

    client.create_rule(&json!({ "name": "x" })).await.unwrap();

    let request = mock.last_request().unwrap();
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.path, "/rules");
    assert_eq!(request.body, Some(json!({ "name": "x" })));
    assert!(request.query.is_empty());
}

#[tokio::test]
async fn test_get_rule_uses_id_in_path() {
    let mock = Arc::new(MockTransport::new());
    let client = client_with(&mock);

    client.get_rule(RuleId(42)).await.unwrap();

    assert_eq!(
        mock.last_request().unwrap(),
        ApiRequest::new(Method::GET, "/rules/42")
    );
}

#[tokio::test]
async fn test_every_operation_maps_to_its_endpoint() {
    let mock = Arc::new(MockTransport::new());
    let client = client_with(&mock);
    let id = RuleId(7);

    client.list_rules(&RuleListQuery::default()).await.unwrap();
    client.get_rule(id).await.unwrap();
    client.create_rule(&json!({})).await.unwrap();
    client.update_rule(id, &json!({ "name": "y" })).await.unwrap();
    client.delete_rule(id).await.unwrap();
    client.start_rule(id).await.unwrap();
    client.stop_rule(id).await.unwrap();
    client.rule_stats().await.unwrap();

    let sent: Vec<(Method, String)> = mock
        .requests()
        .into_iter()
        .map(|r| (r.method, r.path))
        .collect();

    assert_eq!(
        sent,
        vec![
            (Method::GET, "/rules".to_string()),
            (Method::GET, "/rules/7".to_string()),
            (Method::POST, "/rules".to_string()),
            (Method::PUT, "/rules/7".to_string()),
            (Method::DELETE, "/rules/7".to_string()),
            (Method::POST, "/rules/7/start".to_string()),
            (Method::POST, "/rules/7/stop".to_string()),
            (Method::GET, "/rules/stats".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_bodies_only_on_create_and_update() {
    let mock = Arc::new(MockTransport::new());
    let client = client_with(&mock);

    client.update_rule(RuleId(3), &json!({ "name": "y" })).await.unwrap();
    client.start_rule(RuleId(3)).await.unwrap();

    let requests = mock.requests();
    assert_eq!(requests[0].body, Some(json!({ "name": "y" })));
    assert_eq!(requests[1].body, None);
}

#[tokio::test]
async fn test_list_rules_sends_filters_as_query() {
    let mock = Arc::new(MockTransport::new());
    let client = client_with(&mock);

    let query = RuleListQuery {
        page: Some(1),
        page_size: Some(20),
        status: Some(RuleStatus::Running),
        ..Default::default()
    };
    client.list_rules(&query).await.unwrap();

    let request = mock.last_request().unwrap();
    assert_eq!(
        request.query,
        vec![
            ("page".to_string(), "1".to_string()),
            ("pageSize".to_string(), "20".to_string()),
            ("status".to_string(), "running".to_string()),
        ]
    );
    assert_eq!(request.body, None);
}

#[tokio::test]
async fn test_typed_payload_serializes_like_upstream_expects() {
    let mock = Arc::new(MockTransport::new());
    let client = client_with(&mock);

    let req = CreateRuleRequest {
        node_id: Some(1),
        name: "web".into(),
        protocol: RuleProtocol::Tcp,
        listen_port: 8080,
        targets: vec!["10.0.0.5:80".into()],
        ..Default::default()
    };
    client.create_rule(&req).await.unwrap();

    let body = mock.last_request().unwrap().body.unwrap();
    assert_eq!(body["name"], "web");
    assert_eq!(body["type"], "forward");
    assert_eq!(body["listen_port"], 8080);
    assert_eq!(body["targets"], json!(["10.0.0.5:80"]));
}

#[tokio::test]
async fn test_authorized_client_attaches_token() {
    let mock = Arc::new(MockTransport::new());
    let client = client_with(&mock);

    client.rule_stats().await.unwrap();
    client.authorized("abc").rule_stats().await.unwrap();

    let requests = mock.requests();
    assert_eq!(requests[0].bearer, None);
    assert_eq!(requests[1].bearer.as_deref(), Some("abc"));
}

#[tokio::test]
async fn test_response_is_returned_untouched() {
    let payload = json!({ "code": 0, "message": "success", "data": { "total": 3 } });
    let mock = Arc::new(MockTransport::responding(payload.clone()));

    let result = client_with(&mock).rule_stats().await.unwrap();
    assert_eq!(result, payload);
}

#[tokio::test]
async fn test_transport_failure_surfaces_unchanged() {
    let mock = Arc::new(MockTransport::failing(|| TransportError::Status {
        status: 404,
        body: json!({ "code": 10101, "message": "rule not found" }),
    }));

    let err = client_with(&mock).delete_rule(RuleId(99)).await.unwrap_err();

    match err {
        TransportError::Status { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body["code"], 10101);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    // The request was still attempted exactly once.
    assert_eq!(mock.requests().len(), 1);
}
