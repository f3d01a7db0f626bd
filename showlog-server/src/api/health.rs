//! Health and diagnostic endpoints

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use showlog_common::db;
use tracing::{error, info};

use super::ApiResponse;
use crate::error::ApiResult;
use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "showlog-server".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// GET /api/status
pub async fn service_status() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running",
    }))
}

/// GET /api/test
pub async fn test_api() -> Json<serde_json::Value> {
    Json(json!({
        "message": "API is working",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// GET /api/test-db
///
/// Runs `SELECT 1` against the pool. Never cached.
pub async fn test_database(State(state): State<AppState>) -> Response {
    let no_cache = [
        (header::CACHE_CONTROL, "no-store, no-cache, must-revalidate, private"),
        (header::PRAGMA, "no-cache"),
        (header::EXPIRES, "-1"),
    ];
    let timestamp = chrono::Utc::now().to_rfc3339();
    let database = state.config.database_path.display().to_string();

    match db::ping(&state.db).await {
        Ok(test) => {
            info!("Database connection test succeeded");
            (
                no_cache,
                Json(json!({
                    "success": true,
                    "message": "Database connection OK",
                    "test": test,
                    "timestamp": timestamp,
                    "database": database,
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!("Database connection test failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                no_cache,
                Json(json!({
                    "success": false,
                    "message": "Database connection failed",
                    "error": e.to_string(),
                    "timestamp": timestamp,
                    "database": database,
                })),
            )
                .into_response()
        }
    }
}

/// GET /api/check-schema
pub async fn check_schema(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<db::ColumnInfo>>>> {
    let columns = db::table_columns(&state.db).await?;
    Ok(Json(ApiResponse::data(columns)))
}
