//! HTTP API handlers for showlog

pub mod form;
pub mod health;
pub mod performances;
pub mod stats;

use serde::Serialize;

pub use health::{check_schema, health_routes, service_status, test_api, test_database};
pub use performances::{
    create_performance, delete_performance, get_performance, list_artists, list_performances,
    performances_by_artist, performances_by_province, update_performance,
};
pub use stats::{get_dashboard, get_drill_down};

/// Success envelope shared by all `/api` routes
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }
}
