//! Axum HTTP API server.
//!
//! This crate provides:
//! - The analysis REST surface (analyze, fetch, list, delete, health)
//! - The end-to-end processing pipeline behind `POST /analyze/video/{id}`
//! - Environment-driven configuration

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod services;
pub mod state;

pub use config::{ApiConfig, ProcessingConfig};
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use services::{AnalysisSummary, VideoProcessor};
pub use state::AppState;
