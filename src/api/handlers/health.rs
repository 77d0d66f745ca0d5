//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: Database reachable
/// - **503 Service Unavailable**: Database probe failed
///
/// Conversion dispatch without credentials is reported as `disabled` and
/// does not degrade the service.
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "uptimeSeconds": 42,
///   "environment": "development",
///   "checks": {
///     "database": { "status": "ok", "message": "Connected" },
///     "conversions": { "status": "disabled", "message": "Meta pixel id or access token not configured" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let db_check = check_database(&state).await;
    let healthy = db_check.status == "ok";

    let response = HealthResponse {
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        environment: state.environment.clone(),
        checks: HealthChecks {
            database: db_check,
            conversions: check_conversions(&state),
        },
    };

    if healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_database(state: &AppState) -> CheckStatus {
    match sqlx::query("SELECT 1").execute(state.db.as_ref()).await {
        Ok(_) => CheckStatus::new("ok", "Connected"),
        Err(e) => CheckStatus::new("error", format!("Database error: {}", e)),
    }
}

fn check_conversions(state: &AppState) -> CheckStatus {
    if state.click_service.conversions_enabled() {
        CheckStatus::new("ok", "Meta Conversions API configured")
    } else {
        CheckStatus::new("disabled", "Meta pixel id or access token not configured")
    }
}
