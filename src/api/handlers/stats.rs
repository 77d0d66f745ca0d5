//! Handler for click analytics.

use axum::{Json, extract::State};

use crate::api::dto::envelope::ApiResponse;
use crate::api::dto::stats::StatsData;
use crate::error::AppError;
use crate::state::AppState;

/// Returns totals, per-link counters, recent clicks and the 7-day histogram.
///
/// # Endpoint
///
/// `GET /stats`
///
/// # Response
///
/// ```json
/// {
///   "success": true,
///   "data": {
///     "totalClicks": 12,
///     "totalEvents": 12,
///     "totalLinks": 3,
///     "activeLinks": 2,
///     "inactiveLinks": 1,
///     "links": [ ... ],
///     "recentClicks": [ ... ],
///     "dailyClicks": [ { "date": "2024-05-01", "clicks": 2 } ]
///   }
/// }
/// ```
pub async fn stats_handler(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<StatsData>>, AppError> {
    let snapshot = state.stats_service.compute_stats().await?;
    Ok(Json(ApiResponse::ok(snapshot.into())))
}
