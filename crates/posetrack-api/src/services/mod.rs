//! Business logic services.

pub mod processor;

pub use processor::{AnalysisSummary, VideoProcessor};
