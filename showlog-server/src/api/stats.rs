//! Statistics dashboard endpoints
//!
//! Each request loads the full record set once and runs the aggregation
//! engine over that snapshot.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;
use showlog_common::db;
use showlog_common::stats::{select_drill_down, Dashboard, DrillDownKind, DrillDownSelection};
use tracing::debug;

use super::ApiResponse;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Query parameters for the dashboard
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    /// Ranking length; defaults to `[stats] top_n`
    pub top: Option<usize>,
}

/// Query parameters for a drill-down
#[derive(Debug, Deserialize)]
pub struct DrillDownQuery {
    pub kind: String,
    pub key: String,
}

/// GET /api/stats?top=N
pub async fn get_dashboard(
    State(state): State<AppState>,
    query: Result<Query<DashboardQuery>, QueryRejection>,
) -> ApiResult<Json<ApiResponse<Dashboard>>> {
    let Query(query) = query?;
    let records = db::list_performances(&state.db).await?;
    let top_n = query.top.unwrap_or(state.config.stats.top_n);

    let dashboard = Dashboard::compute(&records, top_n, state.config.stats.month_locale);
    debug!(
        "Dashboard over {} records: {} dated, {} artists, {} provinces",
        dashboard.record_count,
        dashboard.monthly.total,
        dashboard.artists.len(),
        dashboard.provinces.len()
    );
    Ok(Json(ApiResponse::data(dashboard)))
}

/// GET /api/stats/drill-down?kind=month|artist|province&key=K
pub async fn get_drill_down(
    State(state): State<AppState>,
    query: Result<Query<DrillDownQuery>, QueryRejection>,
) -> ApiResult<Json<ApiResponse<DrillDownSelection>>> {
    let Query(query) = query?;
    let kind: DrillDownKind = query.kind.parse().map_err(ApiError::BadRequest)?;
    let records = db::list_performances(&state.db).await?;

    let selection = select_drill_down(kind, &query.key, &records, state.config.stats.month_locale);
    Ok(Json(ApiResponse::data(selection)))
}
