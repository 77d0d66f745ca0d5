//! Handlers for click tracking: JSON and redirect variants.

use axum::{
    Json,
    extract::{ConnectInfo, Path, Request, State},
    response::Redirect,
};
use serde_json::json;
use std::net::SocketAddr;

use crate::api::dto::click::ClickResponse;
use crate::domain::entities::AttributionContext;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::attribution::extract_attribution;

/// Records a click and returns the redirect target.
///
/// # Endpoint
///
/// `POST /click/{link_id}`
///
/// # Response
///
/// ```json
/// {
///   "success": true,
///   "redirectUrl": "https://example.com",
///   "metaCapiSent": false,
///   "data": { "linkId": 1, "title": "Shop", "url": "https://example.com", "clickCount": 6 }
/// }
/// ```
///
/// `metaCapiSent` is false whenever the conversion event was skipped or
/// failed; the click is recorded either way.
///
/// # Errors
///
/// Returns 404 Not Found if the link does not exist, is inactive, or the id
/// is not numeric.
/// Returns 500 Internal Server Error if the click could not be recorded.
pub async fn click_handler(
    State(state): State<AppState>,
    Path(link_id): Path<String>,
    request: Request,
) -> Result<Json<ClickResponse>, AppError> {
    let link_id = parse_link_id(&link_id)?;
    let attribution = request_attribution(&request);

    let tracked = state.click_service.track_click(link_id, attribution).await?;
    Ok(Json(tracked.into()))
}

/// Records a click and redirects the browser to the target.
///
/// # Endpoint
///
/// `GET /go/{link_id}`
///
/// Returns 307 Temporary Redirect so every visit passes through tracking.
///
/// # Errors
///
/// Same as [`click_handler`].
pub async fn go_handler(
    State(state): State<AppState>,
    Path(link_id): Path<String>,
    request: Request,
) -> Result<Redirect, AppError> {
    let link_id = parse_link_id(&link_id)?;
    let attribution = request_attribution(&request);

    let tracked = state.click_service.track_click(link_id, attribution).await?;
    Ok(Redirect::temporary(tracked.redirect_url()))
}

/// The peer address is only present when the server runs with connect info.
fn request_attribution(request: &Request) -> AttributionContext {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    extract_attribution(request.headers(), peer)
}

/// Unparseable ids name no link, so they are reported as not found.
fn parse_link_id(raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>().map_err(|_| {
        AppError::not_found("Link not found or inactive", json!({ "link_id": raw }))
    })
}
