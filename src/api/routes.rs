//! API route configuration.
//!
//! Routes are split by exposure so the top-level router can attach rate
//! limiting and authentication per group.

use crate::api::handlers::{
    click_handler, create_link_handler, go_handler, health_handler, list_links_handler,
    stats_handler, update_link_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, patch, post},
};

/// Click tracking routes, subject to per-IP rate limiting.
///
/// # Endpoints
///
/// - `POST /click/{link_id}` - Track a click, return the redirect target as JSON
/// - `GET  /go/{link_id}`    - Track a click, answer with a 307 redirect
pub fn click_routes() -> Router<AppState> {
    Router::new()
        .route("/click/{link_id}", post(click_handler))
        .route("/go/{link_id}", get(go_handler))
}

/// Public read-only routes.
///
/// # Endpoints
///
/// - `GET /links`  - Active links in display order
/// - `GET /health` - Health check
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/links", get(list_links_handler))
        .route("/health", get(health_handler))
}

/// Administrative routes, protected when an admin token is configured.
///
/// # Endpoints
///
/// - `POST  /links`      - Create a link
/// - `PATCH /links/{id}` - Partially update a link
/// - `GET   /stats`      - Click analytics
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/links", post(create_link_handler))
        .route("/links/{id}", patch(update_link_handler))
        .route("/stats", get(stats_handler))
}
