//! showlog-server library - HTTP transport for the performance log
//!
//! Routes map verbs onto the record store, accept poster uploads, serve the
//! stored posters and expose the statistics dashboard.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use showlog_common::config::ServerConfig;
use sqlx::SqlitePool;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::warn;

pub mod api;
pub mod error;

/// Headroom on top of the poster limit for the text fields of the form
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Resolved configuration
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, config: ServerConfig) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_credentials(true)
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    let body_limit = state
        .config
        .max_upload_bytes
        .saturating_add(FORM_OVERHEAD_BYTES);
    let uploads = ServeDir::new(&state.config.upload_dir);
    let cors = cors_layer(&state.config.cors_origins);

    let api = Router::new()
        .route(
            "/api/performances",
            get(api::list_performances).post(api::create_performance),
        )
        .route(
            "/api/performances/:id",
            get(api::get_performance)
                .put(api::update_performance)
                .delete(api::delete_performance),
        )
        .route(
            "/api/performances/province/:province",
            get(api::performances_by_province),
        )
        .route("/api/performances/artist/:artist", get(api::performances_by_artist))
        .route("/api/artists", get(api::list_artists))
        .route("/api/stats", get(api::get_dashboard))
        .route("/api/stats/drill-down", get(api::get_drill_down))
        .route("/api/status", get(api::service_status))
        .route("/api/test", get(api::test_api))
        .route("/api/test-db", get(api::test_database))
        .route("/api/check-schema", get(api::check_schema))
        .layer(DefaultBodyLimit::max(body_limit));

    Router::new()
        .merge(api)
        .merge(api::health_routes())
        .nest_service(api::form::UPLOAD_URL_PREFIX, uploads)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
