//! End-to-end video processing.
//!
//! One call to [`VideoProcessor::process`] runs the full pipeline:
//! resolve the video source, sample frames, extract landmarks, aggregate,
//! and persist — in that order, with persistence happening exactly once
//! after the frame loop completes. Any stage failure surfaces as a
//! structured error and leaves nothing in the store.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use tracing::{info, warn};

use posetrack_media::{
    run_frame_loop, FrameSampler, LoopStats, MediaError, OrtPoseDetector, PoseVisualizer,
};
use posetrack_models::VideoAnalysis;
use posetrack_store::parse_object_id;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Summary of a completed analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSummary {
    pub analysis_id: String,
    pub frames_processed: u64,
    pub frames_with_no_detection: u64,
    pub total_frames: u64,
    pub duration: f64,
    pub max_x: f64,
    pub max_y: f64,
}

/// Runs one analysis job per invocation.
pub struct VideoProcessor {
    state: AppState,
}

impl VideoProcessor {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Process a video end to end and return the stored analysis summary.
    pub async fn process(&self, video_id: &str) -> ApiResult<AnalysisSummary> {
        // Admit at most one running job per video id.
        {
            let mut in_flight = lock_in_flight(&self.state.in_flight);
            if !in_flight.insert(video_id.to_string()) {
                return Err(ApiError::conflict(
                    "Analysis already in progress for this video",
                ));
            }
        }
        let in_flight = Arc::clone(&self.state.in_flight);
        let _release = scopeguard::guard(video_id.to_string(), move |key| {
            lock_in_flight(&in_flight).remove(&key);
        });

        let path = self.resolve_video_path(video_id).await?;
        info!(video_id, path = %path.display(), "resolved video source");

        let processing = self.state.config.processing.clone();
        let detector_config = self.state.config.detector.clone();
        let job_video_id = video_id.to_string();

        type LoopOutput = (VideoAnalysis, LoopStats, f64, u64);
        let (analysis, stats, duration, total_frames) =
            tokio::task::spawn_blocking(move || -> Result<LoopOutput, MediaError> {
                let mut sampler = FrameSampler::open(
                    &path,
                    processing.frame_interval_secs,
                    processing.max_duration_secs,
                )?;
                let duration = sampler.duration_secs();
                info!(
                    video_id = %job_video_id,
                    fps = sampler.fps(),
                    duration,
                    skip = sampler.skip(),
                    "sampling video"
                );

                let mut detector = OrtPoseDetector::load(&detector_config)?;
                let visualizer = if processing.debug_visualization {
                    Some(PoseVisualizer::for_video(
                        &processing.debug_output_dir,
                        &job_video_id,
                    )?)
                } else {
                    None
                };

                let mut analysis = VideoAnalysis::new(job_video_id);
                let stats =
                    run_frame_loop(&mut sampler, &mut detector, &mut analysis, visualizer.as_ref())?;
                let total_frames = sampler.frames_read();

                Ok((analysis, stats, duration, total_frames))
            })
            .await
            .map_err(|e| ApiError::internal(format!("analysis task failed: {e}")))??;

        info!(
            video_id,
            frames = stats.frames_processed,
            skipped = stats.frames_with_no_detection,
            total = total_frames,
            max_x = analysis.max_x,
            max_y = analysis.max_y,
            "frame loop complete"
        );

        let id = self.state.store.analyses().insert(&analysis).await?;

        Ok(AnalysisSummary {
            analysis_id: id.to_hex(),
            frames_processed: stats.frames_processed,
            frames_with_no_detection: stats.frames_with_no_detection,
            total_frames,
            duration,
            max_x: analysis.max_x,
            max_y: analysis.max_y,
        })
    }

    /// Map a video id to a readable file under the storage root.
    ///
    /// Every miss — unknown id, record without a filename, file absent on
    /// disk — reports the same caller-facing "Video not found"; the
    /// distinction is logged.
    async fn resolve_video_path(&self, video_id: &str) -> ApiResult<PathBuf> {
        let oid = parse_object_id(video_id)?;

        let Some(record) = self.state.store.videos().get(&oid).await? else {
            warn!(video_id, "video id not present in metadata store");
            return Err(ApiError::processing_failed("Video not found"));
        };

        let Some(filename) = record.filename else {
            warn!(video_id, "video record has no filename");
            return Err(ApiError::processing_failed("Video not found"));
        };

        let path = self.state.config.processing.storage_root.join(&filename);
        if !path.exists() {
            warn!(video_id, path = %path.display(), "video file missing from storage");
            return Err(ApiError::processing_failed("Video not found"));
        }

        Ok(path)
    }
}

/// Lock the in-flight set, recovering the inner value if a prior holder
/// panicked.
fn lock_in_flight<'a>(
    set: &'a Arc<Mutex<HashSet<String>>>,
) -> MutexGuard<'a, HashSet<String>> {
    set.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
