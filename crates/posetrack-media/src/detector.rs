//! Pose landmark inference over single frames.
//!
//! [`OrtPoseDetector`] wraps a BlazePose-family landmark model through ONNX
//! Runtime. The detector is acquired once per processing job, reused for
//! every sampled frame, and dropped when the job ends; it is never shared
//! between jobs.
//!
//! Notes:
//! - OpenCV delivers frames as BGR; we convert to RGB before normalization.
//! - The model emits 39 landmark rows of (x, y, z, visibility, presence);
//!   only the first 33 are body keypoints and only those are returned.
//! - Output is atomic: all 33 landmarks, or `None` when the pose presence
//!   score falls below the configured confidence.

use std::path::{Path, PathBuf};

use opencv::core::Size;
use opencv::imgproc;
use opencv::prelude::*;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::{Tensor, Value};
use tracing::info;

use posetrack_models::{LandmarkPoint, LANDMARK_COUNT};

use crate::error::{MediaError, MediaResult};

/// Side length of the model's square input.
const INPUT_SIZE: i32 = 256;

/// Landmark rows emitted by the model (33 body + 6 auxiliary).
const MODEL_LANDMARK_ROWS: usize = 39;

/// Values per landmark row: x, y, z, visibility, presence.
const ROW_STRIDE: usize = 5;

/// Model file names by complexity level (0 = lite, 1 = full, 2 = heavy).
const MODEL_FILES: [&str; 3] = [
    "pose_landmark_lite.onnx",
    "pose_landmark_full.onnx",
    "pose_landmark_heavy.onnx",
];

/// Model directories searched when no explicit directory is configured.
const MODEL_DIR_CANDIDATES: &[&str] = &[
    "./models/pose",
    "/app/models/pose",
    "/usr/share/posetrack/models",
];

/// Detector construction parameters.
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Minimum pose presence score for a frame to count as detected.
    pub min_detection_confidence: f32,
    /// Model complexity level, 0..=2. Higher is slower and more accurate.
    pub model_complexity: u8,
    /// Explicit model directory; when `None` the candidate paths are
    /// searched in order.
    pub model_dir: Option<PathBuf>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_detection_confidence: 0.5,
            model_complexity: 1,
            model_dir: None,
        }
    }
}

/// Maps one frame to either a full set of 33 landmarks or no detection.
pub trait PoseDetector {
    /// Run pose estimation on a BGR frame.
    ///
    /// Returns `Ok(Some(points))` with exactly [`LANDMARK_COUNT`] entries
    /// in vocabulary order, or `Ok(None)` when no pose is present.
    fn detect(&mut self, frame_bgr: &Mat) -> MediaResult<Option<Vec<LandmarkPoint>>>;
}

/// ONNX Runtime-backed pose landmark detector.
pub struct OrtPoseDetector {
    session: Session,
    output_names: Vec<String>,
    min_confidence: f32,
}

impl OrtPoseDetector {
    /// Load the model selected by `config`.
    pub fn load(config: &DetectorConfig) -> MediaResult<Self> {
        let model_path = find_model_path(config)?;
        info!(model = %model_path.display(), "loading pose landmark model");

        let model_bytes = std::fs::read(&model_path)
            .map_err(|e| MediaError::detection_failed(format!("ORT read model file: {e}")))?;

        let session = Session::builder()
            .map_err(|e| MediaError::detection_failed(format!("ORT session builder: {e}")))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| MediaError::detection_failed(format!("ORT opt level: {e}")))?
            .commit_from_memory(model_bytes.as_slice())
            .map_err(|e| MediaError::detection_failed(format!("ORT load model: {e}")))?;

        let output_names = session.outputs.iter().map(|o| o.name.clone()).collect();

        Ok(Self {
            session,
            output_names,
            min_confidence: config.min_detection_confidence,
        })
    }
}

impl PoseDetector for OrtPoseDetector {
    fn detect(&mut self, frame_bgr: &Mat) -> MediaResult<Option<Vec<LandmarkPoint>>> {
        let tensor = preprocess(frame_bgr)?;

        let outputs = self
            .session
            .run(ort::inputs![tensor])
            .map_err(|e| MediaError::detection_failed(format!("ORT run failed: {e}")))?;

        // Exported BlazePose graphs disagree on output names, so classify
        // the outputs by element count: a single scalar is the pose
        // presence score, and the landmark tensor holds exactly 33 or 39
        // five-value rows. Segmentation and heatmap outputs, when present,
        // match neither size and are ignored.
        let landmark_sizes = [
            LANDMARK_COUNT * ROW_STRIDE,
            MODEL_LANDMARK_ROWS * ROW_STRIDE,
        ];
        let mut score: Option<f32> = None;
        let mut rows: Option<Vec<f32>> = None;
        for name in &self.output_names {
            let Some(value) = outputs.get(name.as_str()) else {
                continue;
            };
            let Ok((_, data)) = value.try_extract_tensor::<f32>() else {
                continue;
            };
            if data.len() == 1 {
                score = Some(data[0]);
            } else if landmark_sizes.contains(&data.len()) {
                rows = Some(data.to_vec());
            }
        }

        let score = score.ok_or_else(|| {
            MediaError::detection_failed("model emitted no pose presence score")
        })?;
        if score < self.min_confidence {
            return Ok(None);
        }

        let rows = rows.ok_or_else(|| {
            MediaError::detection_failed("model emitted no landmark tensor")
        })?;
        Ok(Some(extract_landmarks(&rows)?))
    }
}

/// Locate the model file for the configured complexity level.
fn find_model_path(config: &DetectorConfig) -> MediaResult<PathBuf> {
    let file = MODEL_FILES
        .get(config.model_complexity as usize)
        .copied()
        .unwrap_or(MODEL_FILES[1]);

    if let Some(dir) = &config.model_dir {
        let path = dir.join(file);
        if path.exists() {
            return Ok(path);
        }
        return Err(MediaError::model_not_found(format!(
            "{} (configured model dir)",
            path.display()
        )));
    }

    for dir in MODEL_DIR_CANDIDATES {
        let path = Path::new(dir).join(file);
        if path.exists() {
            return Ok(path);
        }
    }
    Err(MediaError::model_not_found(format!(
        "{} not present in any of {:?}",
        file, MODEL_DIR_CANDIDATES
    )))
}

/// Convert a BGR frame to the model's NHWC float input.
fn preprocess(frame_bgr: &Mat) -> MediaResult<Value> {
    let mut rgb = Mat::default();
    imgproc::cvt_color(
        frame_bgr,
        &mut rgb,
        imgproc::COLOR_BGR2RGB,
        0,
        opencv::core::AlgorithmHint::ALGO_HINT_DEFAULT,
    )?;

    let mut resized = Mat::default();
    imgproc::resize(
        &rgb,
        &mut resized,
        Size::new(INPUT_SIZE, INPUT_SIZE),
        0.0,
        0.0,
        imgproc::INTER_LINEAR,
    )?;

    let data = resized
        .data_typed::<u8>()
        .map_err(|e| MediaError::detection_failed(format!("Mat data: {e}")))?;

    let mut nhwc = Vec::with_capacity(data.len());
    for &v in data {
        nhwc.push(v as f32 / 255.0);
    }

    let shape = vec![1usize, INPUT_SIZE as usize, INPUT_SIZE as usize, 3];
    Tensor::from_array((shape, nhwc.into_boxed_slice()))
        .map(Value::from)
        .map_err(|e| MediaError::detection_failed(format!("ORT tensor: {e}")))
}

/// Convert raw landmark rows to normalized [`LandmarkPoint`]s.
fn extract_landmarks(rows: &[f32]) -> MediaResult<Vec<LandmarkPoint>> {
    if rows.len() < LANDMARK_COUNT * ROW_STRIDE {
        return Err(MediaError::detection_failed(format!(
            "landmark tensor too small: {} values",
            rows.len()
        )));
    }

    let scale = INPUT_SIZE as f64;
    let mut points = Vec::with_capacity(LANDMARK_COUNT);
    for i in 0..LANDMARK_COUNT {
        let base = i * ROW_STRIDE;
        points.push(LandmarkPoint::new(
            rows[base] as f64 / scale,
            rows[base + 1] as f64 / scale,
            rows[base + 2] as f64 / scale,
            sigmoid(rows[base + 3]) as f64,
        ));
    }
    Ok(points)
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sigmoid_bounds() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-6);
        assert!(sigmoid(10.0) > 0.99);
        assert!(sigmoid(-10.0) < 0.01);
    }

    #[test]
    fn test_extract_landmarks_normalizes_by_input_size() {
        let mut rows = vec![0.0f32; MODEL_LANDMARK_ROWS * ROW_STRIDE];
        // nose at pixel (128, 64), depth 32, raw visibility 0.
        rows[0] = 128.0;
        rows[1] = 64.0;
        rows[2] = 32.0;
        rows[3] = 0.0;

        let points = extract_landmarks(&rows).unwrap();
        assert_eq!(points.len(), LANDMARK_COUNT);
        assert!((points[0].x - 0.5).abs() < 1e-9);
        assert!((points[0].y - 0.25).abs() < 1e-9);
        assert!((points[0].z - 0.125).abs() < 1e-9);
        assert!((points[0].visibility - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_extract_landmarks_rejects_short_tensor() {
        let rows = vec![0.0f32; 10];
        assert!(extract_landmarks(&rows).is_err());
    }

    #[test]
    fn test_model_file_selection_clamps_complexity() {
        let config = DetectorConfig {
            model_complexity: 9,
            model_dir: Some(PathBuf::from("/nonexistent")),
            ..Default::default()
        };
        // Unknown complexity falls back to the full model; the missing
        // directory still surfaces as ModelNotFound.
        let err = find_model_path(&config).unwrap_err();
        assert!(matches!(err, MediaError::ModelNotFound(msg) if msg.contains("pose_landmark_full")));
    }
}
