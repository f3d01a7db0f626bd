//! Record-entry form decoding and poster storage
//!
//! Create and update both submit `multipart/form-data` with the text fields
//! of a performance plus an optional `poster` image file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use axum::body::Bytes;
use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use showlog_common::db::{parse_performance_date, PerformanceInput};
use tracing::{debug, warn};

use crate::error::{ApiError, ApiResult};

/// URL prefix under which stored posters are served
pub const UPLOAD_URL_PREFIX: &str = "/api/uploads";

const POSTER_FIELD: &str = "poster";
const ALLOWED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

/// Uploaded poster held in memory until the form validates
#[derive(Debug)]
pub struct PosterUpload {
    pub extension: String,
    pub bytes: Bytes,
}

/// Decoded form: validated text fields and the optional poster
#[derive(Debug)]
pub struct PerformanceForm {
    pub input: PerformanceInput,
    pub poster: Option<PosterUpload>,
}

/// Poster written to the upload directory
#[derive(Debug)]
pub struct StoredPoster {
    pub path: PathBuf,
    pub url: String,
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(err.body_text())
    } else {
        ApiError::BadRequest(err.body_text())
    }
}

/// Lowercased extension of an accepted image file name
fn poster_extension(file_name: &str) -> ApiResult<String> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .filter(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
        .ok_or_else(|| {
            ApiError::BadRequest(
                "Only image files (jpg, jpeg, png, gif) may be uploaded".to_string(),
            )
        })
}

/// Empty form strings count as absent
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl PerformanceForm {
    /// Read every multipart field.
    ///
    /// Fails with 400 for a non-image poster, a malformed date or a missing
    /// artist/type/province, and with 413 for a poster over `max_poster_bytes`.
    pub async fn from_multipart(
        mut multipart: Multipart,
        max_poster_bytes: usize,
    ) -> ApiResult<Self> {
        let mut text: HashMap<String, String> = HashMap::new();
        let mut poster = None;

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or_default().to_string();

            if name == POSTER_FIELD {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;

                // Browsers send an empty file part when no file was chosen
                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }

                let extension = poster_extension(&file_name)?;
                if bytes.len() > max_poster_bytes {
                    return Err(ApiError::PayloadTooLarge(format!(
                        "Poster exceeds the {} byte limit",
                        max_poster_bytes
                    )));
                }

                debug!("Received poster {} ({} bytes)", file_name, bytes.len());
                poster = Some(PosterUpload { extension, bytes });
            } else {
                let value = field.text().await.map_err(multipart_error)?;
                text.insert(name, value);
            }
        }

        let date = match non_empty(text.remove("date")) {
            Some(raw) => Some(parse_performance_date(&raw).ok_or_else(|| {
                ApiError::BadRequest(format!("Invalid date '{}', expected YYYY-MM-DD", raw))
            })?),
            None => None,
        };

        let input = PerformanceInput {
            artist: text.remove("artist").unwrap_or_default(),
            kind: text.remove("type").unwrap_or_default(),
            province: text.remove("province").unwrap_or_default(),
            city: non_empty(text.remove("city")),
            venue: non_empty(text.remove("venue")),
            notes: non_empty(text.remove("notes")),
            date,
            poster: None,
        };
        input.validate()?;

        if !text.is_empty() {
            debug!("Ignoring unknown form fields: {:?}", text.keys().collect::<Vec<_>>());
        }

        Ok(Self { input, poster })
    }
}

impl PosterUpload {
    /// Write the poster as `<unix-millis>-<random>.<ext>` under `upload_dir`
    pub async fn store(&self, upload_dir: &Path) -> ApiResult<StoredPoster> {
        tokio::fs::create_dir_all(upload_dir).await?;

        let file_name = format!(
            "{}-{}.{}",
            chrono::Utc::now().timestamp_millis(),
            uuid::Uuid::new_v4().simple(),
            self.extension
        );
        let path = upload_dir.join(&file_name);
        tokio::fs::write(&path, &self.bytes).await?;

        Ok(StoredPoster {
            path,
            url: format!("{}/{}", UPLOAD_URL_PREFIX, file_name),
        })
    }
}

impl StoredPoster {
    /// Remove a poster whose database write did not go through
    pub async fn discard(self) {
        if let Err(e) = tokio::fs::remove_file(&self.path).await {
            warn!("Failed to remove orphaned poster {}: {}", self.path.display(), e);
        }
    }
}
