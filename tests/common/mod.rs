#![allow(dead_code)]

use axum::Router;
use axum::extract::ConnectInfo;
use chrono::{DateTime, Utc};
use linktree_backend::api::middleware::rate_limit::RateLimit;
use linktree_backend::infrastructure::conversions::{ConversionConfig, MetaCapiDispatcher};
use linktree_backend::routes::{RouterOptions, router};
use linktree_backend::state::AppState;
use sqlx::PgPool;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::Layer;

pub const TEST_PIXEL_ID: &str = "123456";
pub const TEST_ACCESS_TOKEN: &str = "test-access-token";
pub const TEST_ADMIN_TOKEN: &str = "test-admin-token";

/// Conversion settings pointing at `graph_url`; `None` disables dispatch.
pub fn conversion_config(graph_url: Option<&str>) -> ConversionConfig {
    ConversionConfig {
        pixel_id: graph_url.map(|_| TEST_PIXEL_ID.to_string()),
        access_token: graph_url.map(|_| TEST_ACCESS_TOKEN.to_string()),
        graph_url: graph_url.unwrap_or("http://127.0.0.1:9").to_string(),
        api_version: "v17.0".to_string(),
        default_source_url: "https://yourdomain.com".to_string(),
        timeout: Duration::from_secs(2),
        forward_client_data: true,
    }
}

pub fn build_state(pool: PgPool, conversions: ConversionConfig, admin_token: Option<&str>) -> AppState {
    let dispatcher = MetaCapiDispatcher::new(conversions).unwrap();
    AppState::new(Arc::new(pool), dispatcher, admin_token, "test")
}

/// State with conversion dispatch disabled and no admin token.
pub fn create_test_state(pool: PgPool) -> AppState {
    build_state(pool, conversion_config(None), None)
}

/// State dispatching conversion events to a mock Graph API.
pub fn create_test_state_with_graph(pool: PgPool, graph_url: &str) -> AppState {
    build_state(pool, conversion_config(Some(graph_url)), None)
}

pub fn create_test_state_with_admin(pool: PgPool) -> AppState {
    build_state(pool, conversion_config(None), Some(TEST_ADMIN_TOKEN))
}

/// Full application router with a fixed peer address.
pub fn test_router(state: AppState) -> Router {
    let options = RouterOptions {
        behind_proxy: false,
        rate_limit: RateLimit {
            requests_per_second: 100,
            burst_size: 1000,
        },
    };

    router(state, &options).layer(MockConnectInfoLayer)
}

#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

pub async fn create_test_link(pool: &PgPool, title: &str, url: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO links (title, url) VALUES ($1, $2) RETURNING id")
        .bind(title)
        .bind(url)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn create_inactive_link(pool: &PgPool, title: &str, url: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO links (title, url, is_active) VALUES ($1, $2, FALSE) RETURNING id",
    )
    .bind(title)
    .bind(url)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_ordered_link(pool: &PgPool, title: &str, display_order: i32) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO links (title, url, display_order) VALUES ($1, 'https://example.com', $2) RETURNING id",
    )
    .bind(title)
    .bind(display_order)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn set_click_count(pool: &PgPool, link_id: i64, count: i64) {
    sqlx::query("UPDATE links SET click_count = $2 WHERE id = $1")
        .bind(link_id)
        .bind(count)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn get_click_count(pool: &PgPool, link_id: i64) -> i64 {
    sqlx::query_scalar("SELECT click_count FROM links WHERE id = $1")
        .bind(link_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn count_click_events(pool: &PgPool, link_id: i64) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM click_events WHERE link_id = $1")
        .bind(link_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Inserts a click event directly, bypassing the pipeline.
pub async fn insert_click_at(pool: &PgPool, link_id: i64, clicked_at: DateTime<Utc>) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO click_events (link_id, clicked_at) VALUES ($1, $2) RETURNING id",
    )
    .bind(link_id)
    .bind(clicked_at)
    .fetch_one(pool)
    .await
    .unwrap()
}
