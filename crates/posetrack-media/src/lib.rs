//! Frame sampling and pose landmark extraction.
//!
//! This crate owns the media half of the analysis pipeline:
//! - [`FrameSampler`]: fixed-interval frame selection over OpenCV capture
//! - [`PoseDetector`] / [`OrtPoseDetector`]: per-frame landmark inference
//! - [`run_frame_loop`]: the detect-and-aggregate loop
//! - [`PoseVisualizer`]: optional annotated-frame debug output

pub mod detector;
pub mod error;
pub mod pipeline;
pub mod sampler;
pub mod visualize;

pub use detector::{DetectorConfig, OrtPoseDetector, PoseDetector};
pub use error::{MediaError, MediaResult};
pub use pipeline::{run_frame_loop, LoopStats};
pub use sampler::{compute_skip, duration_exceeds, FrameSampler, SampledFrame};
pub use visualize::PoseVisualizer;
