use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Authenticated Router Module
///
/// The rule proxy. Each handler takes an `AuthenticatedSession`, so a request without a
/// valid token is rejected with 401 before anything is sent upstream. The caller's token
/// is forwarded, and the upstream's answer (or failure status) is returned unchanged.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET/POST /api/rules
        .route(
            "/api/rules",
            get(handlers::list_rules).post(handlers::create_rule),
        )
        // GET /api/rules/stats
        // Registered as a static segment, so it wins over `{id}`.
        .route("/api/rules/stats", get(handlers::get_rule_stats))
        // GET/PUT/DELETE /api/rules/{id}
        .route(
            "/api/rules/{id}",
            get(handlers::get_rule)
                .put(handlers::update_rule)
                .delete(handlers::delete_rule),
        )
        // POST /api/rules/{id}/start, /api/rules/{id}/stop
        .route("/api/rules/{id}/start", post(handlers::start_rule))
        .route("/api/rules/{id}/stop", post(handlers::stop_rule))
}
