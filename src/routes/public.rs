use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Public Router Module
///
/// Endpoints reachable without a session. The navigation endpoint still reads the
/// session (when present) so it can answer the same decision a page load would get.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for load balancers and the process supervisor.
        .route("/health", get(|| async { "ok" }))
        // GET /api/navigation?to=/rules
        // Resolves a location and runs the guard without performing the navigation.
        .route("/api/navigation", get(handlers::get_navigation))
        // GET /api/menu
        // Sidebar entries (title + icon) of the pages under the console layout.
        .route("/api/menu", get(handlers::get_menu))
}
