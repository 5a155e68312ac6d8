use axum::{Router, extract::FromRef, http::HeaderName};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod navigation;

// HTTP surface, split by access level (public, authenticated, pages).
pub mod routes;
use routes::{authenticated, pages, public};

// --- Public Re-exports ---

pub use client::{HttpTransport, MockTransport, RuleClient, TransportState};
pub use config::ConsoleConfig;
pub use navigation::RouteTable;

/// ApiDoc
///
/// OpenAPI document for the console's JSON endpoints, served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::get_navigation, handlers::get_menu,
        handlers::list_rules, handlers::get_rule, handlers::create_rule,
        handlers::update_rule, handlers::delete_rule, handlers::start_rule,
        handlers::stop_rule, handlers::get_rule_stats
    ),
    components(
        schemas(
            models::Rule, models::RuleStatus, models::RuleProtocol, models::RuleType,
            models::CreateRuleRequest, models::UpdateRuleRequest, models::RuleStats,
            navigation::MenuItem, handlers::PageView, handlers::NavigationResponse,
            handlers::NavigationOutcome,
        )
    ),
    tags(
        (name = "gost-console", description = "Gost panel console API")
    )
)]
pub struct ApiDoc;

/// AppState
///
/// Shared, immutable state handed to every handler. Cloning is cheap: the transport is
/// behind an `Arc` and the route table is a static slice.
#[derive(Clone)]
pub struct AppState {
    /// Transport to the upstream panel API; the rule client is built on top of it per request.
    pub transport: TransportState,
    pub config: ConsoleConfig,
    pub routes: RouteTable,
}

impl AppState {
    pub fn new(transport: TransportState, config: ConsoleConfig) -> Self {
        Self {
            transport,
            config,
            routes: RouteTable::console(),
        }
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for TransportState {
    fn from_ref(app_state: &AppState) -> TransportState {
        app_state.transport.clone()
    }
}

impl FromRef<AppState> for ConsoleConfig {
    fn from_ref(app_state: &AppState) -> ConsoleConfig {
        app_state.config.clone()
    }
}

impl FromRef<AppState> for RouteTable {
    fn from_ref(app_state: &AppState) -> RouteTable {
        app_state.routes
    }
}

/// create_router
///
/// Assembles the console's routes, the request-id and tracing layers, and CORS.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(authenticated::authenticated_routes())
        // Contributes only the fallback; every route above takes precedence.
        .merge(pages::page_routes())
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Opens the per-request span, tagged with the `x-request-id` set by the layer above.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
