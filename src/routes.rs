//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `POST /click/{link_id}`, `GET /go/{link_id}` - Click tracking (rate limited)
//! - `GET  /links`, `GET /health`                 - Public
//! - `POST /links`, `PATCH /links/{id}`, `GET /stats` - Admin (Bearer token when configured)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Permissive, the public page is served from another origin
//! - **Rate limiting** - Per-IP token bucket on click routes
//! - **Authentication** - Bearer token on admin routes
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::middleware::rate_limit::{self, RateLimit};
use crate::api::middleware::{auth, tracing};
use crate::state::AppState;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Router construction options derived from configuration.
#[derive(Debug, Clone, Copy)]
pub struct RouterOptions {
    /// When `true`, rate limiting reads the client IP from forwarding
    /// headers instead of the peer socket address. Enable only behind a
    /// trusted reverse proxy.
    pub behind_proxy: bool,
    pub rate_limit: RateLimit,
}

/// Builds the router with all routes and middleware, without path
/// normalization.
///
/// Click routes rely on connect info for rate limiting, so the server must
/// be started with `into_make_service_with_connect_info`.
pub fn router(state: AppState, options: &RouterOptions) -> Router {
    let click_routes = api::routes::click_routes();
    let click_routes = if options.behind_proxy {
        match rate_limit::proxy_layer(options.rate_limit) {
            Some(layer) => click_routes.layer(layer),
            None => click_routes,
        }
    } else {
        match rate_limit::peer_layer(options.rate_limit) {
            Some(layer) => click_routes.layer(layer),
            None => click_routes,
        }
    };

    let admin_routes = api::routes::admin_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    Router::new()
        .merge(click_routes)
        .merge(api::routes::public_routes())
        .merge(admin_routes)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(tracing::layer())
}

/// Constructs the application router, trimming trailing slashes before routing.
pub fn app_router(state: AppState, options: &RouterOptions) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state, options))
}
