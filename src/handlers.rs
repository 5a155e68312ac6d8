use crate::{
    AppState,
    auth::{AuthenticatedSession, Session},
    client::{RuleClient, RuleId},
    error::TransportError,
    models::{CreateRuleRequest, Rule, RuleListQuery, RuleStats, UpdateRuleRequest},
    navigation::{
        self, MenuItem, NavigationDecision, ResolvedRoute, RouteTable, menu_items, page_icon,
        page_title,
    },
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;
use utoipa::{IntoParams, ToSchema};

// --- Navigation Schemas ---

/// PageView
///
/// What the console answers for an allowed page: the resolved route and its display metadata.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct PageView {
    pub name: Option<String>,
    pub path: String,
    pub full_path: String,
    pub title: Option<String>,
    pub icon: Option<String>,
}

impl From<&ResolvedRoute> for PageView {
    fn from(route: &ResolvedRoute) -> Self {
        Self {
            name: route.name.map(str::to_string),
            path: route.path.clone(),
            full_path: route.full_path.clone(),
            title: page_title(route).map(str::to_string),
            icon: page_icon(route).map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum NavigationOutcome {
    Allow,
    Redirect,
}

/// NavigationResponse
///
/// Result of `GET /api/navigation`. `location` is where the browser should end up:
/// the redirect href, or the resolved full path when navigation is allowed.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct NavigationResponse {
    pub outcome: NavigationOutcome,
    pub location: String,
    pub route: PageView,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NavigationQuery {
    /// Requested location, e.g. `/rules?page=2`.
    pub to: String,
}

/// Runs resolution and the guard for one location.
fn navigate_to(
    table: &RouteTable,
    session: &Session,
    location: &str,
) -> Result<(ResolvedRoute, NavigationDecision), StatusCode> {
    let route = table.resolve(location).map_err(|e| {
        tracing::error!(error = %e, location, "route resolution failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    let decision = navigation::decide(&route, session);

    if let NavigationDecision::Redirect(target) = &decision {
        tracing::debug!(
            from = %route.full_path,
            to = target.name,
            logged_in = session.claims.is_some(),
            "navigation redirected"
        );
    }
    Ok((route, decision))
}

// --- Navigation Handlers ---

/// navigate
///
/// [Fallback Route] Every page load goes through here. The requested location is resolved
/// against the route table and checked by the guard: a redirect answers `307`, an allowed
/// page answers its `PageView`. Record redirects followed during resolution also answer
/// `307`, so the browser address shows the page actually served.
pub async fn navigate(
    session: Session,
    State(table): State<RouteTable>,
    uri: Uri,
) -> Result<Response, StatusCode> {
    let location = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());

    let (route, decision) = navigate_to(&table, &session, &location)?;

    let response = match decision {
        NavigationDecision::Redirect(target) => {
            Redirect::temporary(&target.href(&table)).into_response()
        }
        NavigationDecision::Allow if route.redirected_from.is_some() => {
            Redirect::temporary(&route.full_path).into_response()
        }
        NavigationDecision::Allow => Json(PageView::from(&route)).into_response(),
    };
    Ok(response)
}

/// get_navigation
///
/// [Public Route] Same decision as a page load, returned as JSON for client-side routing.
#[utoipa::path(
    get,
    path = "/api/navigation",
    params(NavigationQuery),
    responses((status = 200, description = "Navigation decision", body = NavigationResponse))
)]
pub async fn get_navigation(
    session: Session,
    State(table): State<RouteTable>,
    Query(query): Query<NavigationQuery>,
) -> Result<Json<NavigationResponse>, StatusCode> {
    let (route, decision) = navigate_to(&table, &session, &query.to)?;

    let (outcome, location) = match decision {
        NavigationDecision::Redirect(target) => (NavigationOutcome::Redirect, target.href(&table)),
        NavigationDecision::Allow => (NavigationOutcome::Allow, route.full_path.clone()),
    };

    Ok(Json(NavigationResponse {
        outcome,
        location,
        route: PageView::from(&route),
    }))
}

/// get_menu
///
/// [Public Route] Sidebar entries of the console layout.
#[utoipa::path(
    get,
    path = "/api/menu",
    responses((status = 200, description = "Sidebar entries", body = [MenuItem]))
)]
pub async fn get_menu(State(table): State<RouteTable>) -> Json<Vec<MenuItem>> {
    Json(menu_items(&table))
}

// --- Rule Proxy Handlers ---

// Each handler forwards the caller's token so the upstream applies its own authorization.
fn rules_for(state: &AppState, session: AuthenticatedSession) -> RuleClient {
    RuleClient::new(state.transport.clone()).authorized(session.token)
}

/// list_rules
///
/// [Authenticated Route] Paged rule list, filters passed through to the upstream.
#[utoipa::path(
    get,
    path = "/api/rules",
    params(RuleListQuery),
    responses(
        (status = 200, description = "Rule page", body = [Rule]),
        (status = 401, description = "No valid session"),
        (status = 502, description = "Upstream unreachable")
    )
)]
pub async fn list_rules(
    session: AuthenticatedSession,
    State(state): State<AppState>,
    Query(query): Query<RuleListQuery>,
) -> Result<Json<Value>, TransportError> {
    let page = rules_for(&state, session).list_rules(&query).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/rules/{id}",
    params(("id" = u64, Path, description = "Rule ID")),
    responses((status = 200, description = "Found", body = Rule))
)]
pub async fn get_rule(
    session: AuthenticatedSession,
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, TransportError> {
    let rule = rules_for(&state, session).get_rule(RuleId(id)).await?;
    Ok(Json(rule))
}

/// create_rule
///
/// [Authenticated Route] The payload is forwarded untouched; validation happens upstream.
#[utoipa::path(
    post,
    path = "/api/rules",
    request_body = CreateRuleRequest,
    responses((status = 200, description = "Created", body = Rule))
)]
pub async fn create_rule(
    session: AuthenticatedSession,
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, TransportError> {
    let created = rules_for(&state, session).create_rule(&payload).await?;
    Ok(Json(created))
}

#[utoipa::path(
    put,
    path = "/api/rules/{id}",
    params(("id" = u64, Path, description = "Rule ID")),
    request_body = UpdateRuleRequest,
    responses((status = 200, description = "Updated", body = Rule))
)]
pub async fn update_rule(
    session: AuthenticatedSession,
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, TransportError> {
    let updated = rules_for(&state, session)
        .update_rule(RuleId(id), &payload)
        .await?;
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/api/rules/{id}",
    params(("id" = u64, Path, description = "Rule ID")),
    responses((status = 200, description = "Deleted"))
)]
pub async fn delete_rule(
    session: AuthenticatedSession,
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, TransportError> {
    let result = rules_for(&state, session).delete_rule(RuleId(id)).await?;
    Ok(Json(result))
}

/// start_rule
///
/// [Authenticated Route] Asks the upstream to start the rule's forwarding service.
/// Starting a running rule is a no-op upstream.
#[utoipa::path(
    post,
    path = "/api/rules/{id}/start",
    params(("id" = u64, Path, description = "Rule ID")),
    responses((status = 200, description = "Started"))
)]
pub async fn start_rule(
    session: AuthenticatedSession,
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, TransportError> {
    let result = rules_for(&state, session).start_rule(RuleId(id)).await?;
    Ok(Json(result))
}

#[utoipa::path(
    post,
    path = "/api/rules/{id}/stop",
    params(("id" = u64, Path, description = "Rule ID")),
    responses((status = 200, description = "Stopped"))
)]
pub async fn stop_rule(
    session: AuthenticatedSession,
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, TransportError> {
    let result = rules_for(&state, session).stop_rule(RuleId(id)).await?;
    Ok(Json(result))
}

#[utoipa::path(
    get,
    path = "/api/rules/stats",
    responses((status = 200, description = "Rule counters", body = RuleStats))
)]
pub async fn get_rule_stats(
    session: AuthenticatedSession,
    State(state): State<AppState>,
) -> Result<Json<Value>, TransportError> {
    let stats = rules_for(&state, session).rule_stats().await?;
    Ok(Json(stats))
}
