//! Shared data models for the PoseTrack backend.
//!
//! This crate provides Serde-serializable types for:
//! - Pose landmarks and the fixed 33-point vocabulary
//! - Per-frame landmark records and the aggregate analysis document
//! - Frame timestamp formatting

pub mod analysis;
pub mod landmark;
pub mod timestamp;

// Re-export common types
pub use analysis::{FrameRecord, VideoAnalysis};
pub use landmark::{LandmarkPoint, LANDMARK_COUNT, POSE_CONNECTIONS, POSE_LANDMARK_NAMES};
pub use timestamp::format_frame_timestamp;
