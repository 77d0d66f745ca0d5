//! Per-IP rate limiting for the click endpoints.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use std::time::Duration;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

/// Token bucket parameters.
#[derive(Debug, Clone, Copy)]
pub struct RateLimit {
    /// Sustained requests per second per client.
    pub requests_per_second: u32,
    pub burst_size: u32,
}

pub type ClickGovernorLayer<K> = GovernorLayer<K, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Creates a rate limiter keyed by the socket peer address.
///
/// Requires the server to run with connect info. Requests exceeding the
/// limit receive `429 Too Many Requests`.
pub fn peer_layer(limit: RateLimit) -> Option<ClickGovernorLayer<PeerIpKeyExtractor>> {
    build(limit, PeerIpKeyExtractor)
}

/// Creates a rate limiter keyed by `X-Forwarded-For`, `X-Real-IP` or
/// `Forwarded`, falling back to the peer address.
///
/// Only safe behind a trusted reverse proxy that overwrites these headers.
pub fn proxy_layer(limit: RateLimit) -> Option<ClickGovernorLayer<SmartIpKeyExtractor>> {
    build(limit, SmartIpKeyExtractor)
}

/// Returns `None` when the parameters are rejected by governor (zero values).
fn build<K>(limit: RateLimit, key_extractor: K) -> Option<ClickGovernorLayer<K>>
where
    K: KeyExtractor,
{
    if limit.requests_per_second == 0 {
        return None;
    }

    let governor_conf = GovernorConfigBuilder::default()
        .period(Duration::from_secs(1) / limit.requests_per_second)
        .burst_size(limit.burst_size)
        .key_extractor(key_extractor)
        .finish()?;

    Some(GovernorLayer::new(Arc::new(governor_conf)))
}
