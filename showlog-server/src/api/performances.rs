//! Performance record CRUD endpoints

use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::PathRejection,
        Multipart, Path, State,
    },
    Json,
};
use serde::Serialize;
use showlog_common::db::{self, PerformanceInput, PerformanceRecord};
use tracing::info;

use super::form::{PerformanceForm, StoredPoster};
use super::ApiResponse;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Body of a successful create/update
#[derive(Debug, Serialize)]
pub struct WriteResult {
    pub id: i64,
    pub poster: Option<String>,
}

/// Store the form's poster (if any) and attach its URL to the input
async fn attach_poster(
    state: &AppState,
    form: PerformanceForm,
) -> ApiResult<(PerformanceInput, Option<StoredPoster>)> {
    let mut input = form.input;
    let stored = match form.poster {
        Some(upload) => {
            let stored = upload.store(&state.config.upload_dir).await?;
            input.poster = Some(stored.url.clone());
            Some(stored)
        }
        None => None,
    };
    Ok((input, stored))
}

/// POST /api/performances
pub async fn create_performance(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<ApiResponse<WriteResult>>> {
    let multipart = multipart?;
    let form = PerformanceForm::from_multipart(multipart, state.config.max_upload_bytes).await?;
    let (input, stored) = attach_poster(&state, form).await?;

    match db::insert_performance(&state.db, &input).await {
        Ok(id) => Ok(Json(ApiResponse::with_message(
            "Performance saved",
            WriteResult {
                id,
                poster: input.poster,
            },
        ))),
        Err(e) => {
            if let Some(stored) = stored {
                stored.discard().await;
            }
            Err(e.into())
        }
    }
}

/// PUT /api/performances/:id
///
/// Replaces the text fields; the poster is kept unless a new one is uploaded.
pub async fn update_performance(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<ApiResponse<WriteResult>>> {
    let Path(id) = id?;
    let multipart = multipart?;
    let form = PerformanceForm::from_multipart(multipart, state.config.max_upload_bytes).await?;
    let (input, stored) = attach_poster(&state, form).await?;

    let outcome = db::update_performance(&state.db, id, &input).await;
    match outcome {
        Ok(true) => Ok(Json(ApiResponse::with_message(
            "Performance updated",
            WriteResult {
                id,
                poster: input.poster,
            },
        ))),
        Ok(false) => {
            if let Some(stored) = stored {
                stored.discard().await;
            }
            Err(ApiError::NotFound(format!("Performance {} not found", id)))
        }
        Err(e) => {
            if let Some(stored) = stored {
                stored.discard().await;
            }
            Err(e.into())
        }
    }
}

/// DELETE /api/performances/:id
pub async fn delete_performance(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<ApiResponse<()>>> {
    let Path(id) = id?;
    if db::delete_performance(&state.db, id).await? {
        Ok(Json(ApiResponse::message("Performance deleted")))
    } else {
        Err(ApiError::NotFound(format!("Performance {} not found", id)))
    }
}

/// GET /api/performances
pub async fn list_performances(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<PerformanceRecord>>>> {
    let records = db::list_performances(&state.db).await?;
    info!("Returning {} performances", records.len());
    Ok(Json(ApiResponse::data(records)))
}

/// GET /api/performances/:id
pub async fn get_performance(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<ApiResponse<PerformanceRecord>>> {
    let Path(id) = id?;
    match db::get_performance(&state.db, id).await? {
        Some(record) => Ok(Json(ApiResponse::data(record))),
        None => Err(ApiError::NotFound(format!("Performance {} not found", id))),
    }
}

/// GET /api/performances/province/:province
pub async fn performances_by_province(
    State(state): State<AppState>,
    province: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<ApiResponse<Vec<PerformanceRecord>>>> {
    let Path(province) = province?;
    let records = db::performances_by_province(&state.db, &province).await?;
    Ok(Json(ApiResponse::data(records)))
}

/// GET /api/performances/artist/:artist
pub async fn performances_by_artist(
    State(state): State<AppState>,
    artist: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<ApiResponse<Vec<PerformanceRecord>>>> {
    let Path(artist) = artist?;
    let records = db::performances_by_artist(&state.db, &artist).await?;
    Ok(Json(ApiResponse::data(records)))
}

/// GET /api/artists
pub async fn list_artists(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<String>>>> {
    let artists = db::list_artists(&state.db).await?;
    Ok(Json(ApiResponse::data(artists)))
}
