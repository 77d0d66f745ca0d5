//! Handlers for link administration endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::envelope::ApiResponse;
use crate::api::dto::links::{CreateLinkRequest, UpdateLinkRequest};
use crate::domain::entities::Link;
use crate::error::AppError;
use crate::state::AppState;

/// Lists active links for the public page.
///
/// # Endpoint
///
/// `GET /links`
///
/// Links are ordered by display order, newest first within the same order.
pub async fn list_links_handler(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Link>>>, AppError> {
    let links = state.link_service.list_active_links().await?;
    Ok(Json(ApiResponse::ok(links)))
}

/// Creates a new link.
///
/// # Endpoint
///
/// `POST /links`
///
/// # Request Body
///
/// ```json
/// { "title": "Shop", "url": "https://example.com", "description": "optional", "order": 1 }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if validation fails.
pub async fn create_link_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Link>>), AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .create_link(
            payload.title,
            payload.url,
            payload.description,
            payload.display_order,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Link created", link)),
    ))
}

/// Partially updates a link.
///
/// # Endpoint
///
/// `PATCH /links/{id}`
///
/// The click counter cannot be changed through this endpoint.
///
/// # Errors
///
/// Returns 400 Bad Request if validation fails.
/// Returns 404 Not Found if the link does not exist.
pub async fn update_link_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateLinkRequest>,
) -> Result<Json<ApiResponse<Link>>, AppError> {
    let id = id
        .parse::<i64>()
        .map_err(|_| AppError::not_found("Link not found", json!({ "id": id })))?;

    payload.validate()?;

    let link = state.link_service.update_link(id, payload.into()).await?;

    Ok(Json(ApiResponse::with_message("Link updated", link)))
}
