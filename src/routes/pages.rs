use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Pages Router Module
///
/// Catch-all for console pages. Mounted as the router's fallback so every path the
/// API does not claim is resolved against the route table and guarded.
pub fn page_routes() -> Router<AppState> {
    Router::new().fallback(get(handlers::navigate))
}
