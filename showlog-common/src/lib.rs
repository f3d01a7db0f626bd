//! # showlog common library
//!
//! Shared code for the showlog service:
//! - Performance record model and SQLite record store
//! - Aggregation engine behind the statistics dashboard
//! - Configuration loading
//! - Error types

pub mod config;
pub mod db;
pub mod error;
pub mod stats;

pub use db::PerformanceRecord;
pub use error::{Error, Result};
