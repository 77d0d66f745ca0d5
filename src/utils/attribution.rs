//! Attribution context extraction from HTTP request headers.

use std::net::SocketAddr;
use std::sync::LazyLock;

use axum::http::{HeaderMap, HeaderName, header};
use regex::Regex;

use crate::domain::entities::AttributionContext;

static X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");

/// `_fbp=` token at the start of the header or after a `;`, up to the next `;`.
static FBP_COOKIE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|;)\s*_fbp=([^;]*)").unwrap());

static FBC_COOKIE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|;)\s*_fbc=([^;]*)").unwrap());

/// Builds the [`AttributionContext`] for a click from its request headers.
///
/// # Resolution Rules
///
/// - **IP address**: first entry of `X-Forwarded-For`, else the peer socket
///   address, else `None`
/// - **User agent / referer**: `User-Agent` and `Referer` headers verbatim
/// - **fbp / fbc**: values of the `_fbp` and `_fbc` cookies, found by scanning
///   the raw `Cookie` header(s) up to the next `;`
///
/// Values are whitespace-trimmed. Empty or non-UTF-8 values become `None`.
/// Nothing here fails: a request with no headers yields an empty context.
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert(header::COOKIE, "_fbp=abc123; _fbc=xyz789".parse().unwrap());
///
/// let ctx = extract_attribution(&headers, None);
/// assert_eq!(ctx.fbp.as_deref(), Some("abc123"));
/// assert_eq!(ctx.fbc.as_deref(), Some("xyz789"));
/// ```
pub fn extract_attribution(headers: &HeaderMap, peer: Option<SocketAddr>) -> AttributionContext {
    let cookies = raw_cookie_header(headers);

    AttributionContext {
        ip_address: client_ip(headers, peer),
        user_agent: header_string(headers, &header::USER_AGENT),
        referer: header_string(headers, &header::REFERER),
        fbp: cookie_token(&FBP_COOKIE_REGEX, &cookies),
        fbc: cookie_token(&FBC_COOKIE_REGEX, &cookies),
    }
}

fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<String> {
    header_string(headers, &X_FORWARDED_FOR)
        .and_then(|forwarded| non_empty(forwarded.split(',').next().unwrap_or_default()))
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
}

fn header_string(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(non_empty)
}

/// Joins every `Cookie` header; HTTP/2 clients may split cookies across several.
fn raw_cookie_header(headers: &HeaderMap) -> String {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect::<Vec<_>>()
        .join("; ")
}

fn cookie_token(regex: &Regex, cookies: &str) -> Option<String> {
    regex
        .captures(cookies)
        .and_then(|caps| caps.get(1))
        .and_then(|m| non_empty(m.as_str()))
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
