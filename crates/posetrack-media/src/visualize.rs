//! Debug visualization sink.
//!
//! When enabled, each detected frame is annotated with its landmarks and
//! skeleton edges and written to disk. This is a pure side effect: every
//! failure is logged and swallowed so rendering can never change the
//! outcome of an analysis run.

use std::path::{Path, PathBuf};

use opencv::core::{Point, Scalar, Vector};
use opencv::imgcodecs;
use opencv::imgproc;
use opencv::prelude::*;
use tracing::{debug, warn};

use posetrack_models::{LandmarkPoint, POSE_CONNECTIONS};

use crate::error::MediaResult;

/// Writes annotated frames under `<root>/<video_id>/frame_NNNN.png`.
pub struct PoseVisualizer {
    out_dir: PathBuf,
}

impl PoseVisualizer {
    /// Create the per-video output directory.
    pub fn for_video(root: impl AsRef<Path>, video_id: &str) -> MediaResult<Self> {
        let out_dir = root.as_ref().join(video_id);
        std::fs::create_dir_all(&out_dir)?;
        Ok(Self { out_dir })
    }

    /// Annotate and write one frame. Never fails the caller.
    pub fn save(&self, frame_bgr: &Mat, points: &[LandmarkPoint], processed_index: u64) {
        match self.render(frame_bgr, points, processed_index) {
            Ok(path) => debug!(path = %path.display(), "wrote debug frame"),
            Err(e) => warn!(error = %e, "debug visualization failed"),
        }
    }

    fn render(
        &self,
        frame_bgr: &Mat,
        points: &[LandmarkPoint],
        processed_index: u64,
    ) -> MediaResult<PathBuf> {
        let mut annotated = frame_bgr.try_clone()?;
        let width = annotated.cols() as f64;
        let height = annotated.rows() as f64;

        let to_pixel = |p: &LandmarkPoint| {
            Point::new((p.x * width).round() as i32, (p.y * height).round() as i32)
        };

        // BGR: skeleton edges in blue, keypoints in green.
        let edge_color = Scalar::new(255.0, 0.0, 0.0, 0.0);
        let point_color = Scalar::new(0.0, 255.0, 0.0, 0.0);

        for (a, b) in POSE_CONNECTIONS {
            let (Some(pa), Some(pb)) = (points.get(a), points.get(b)) else {
                continue;
            };
            imgproc::line(
                &mut annotated,
                to_pixel(pa),
                to_pixel(pb),
                edge_color,
                2,
                imgproc::LINE_8,
                0,
            )?;
        }

        for point in points {
            imgproc::circle(
                &mut annotated,
                to_pixel(point),
                3,
                point_color,
                2,
                imgproc::LINE_8,
                0,
            )?;
        }

        let path = self.out_dir.join(format!("frame_{:04}.png", processed_index));
        imgcodecs::imwrite(&path.to_string_lossy(), &annotated, &Vector::<i32>::new())?;
        Ok(path)
    }
}
