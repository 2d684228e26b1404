//! Fixed-interval frame sampling over a video stream.
//!
//! [`FrameSampler`] opens a video with OpenCV, probes its frame rate and
//! frame count, fail-fasts on over-long inputs, and then yields every
//! `skip`-th decoded frame as a lazy, finite, non-restartable iterator.
//! The capture handle is released when the sampler is dropped, on every
//! exit path.

use std::path::{Path, PathBuf};

use opencv::prelude::*;
use opencv::videoio::{self, VideoCapture};
use tracing::debug;

use crate::error::{MediaError, MediaResult};

/// A decoded frame selected by the sampler.
pub struct SampledFrame {
    /// Zero-based index of this frame in the source stream.
    pub index: u64,
    /// Offset from video start in seconds (`index / fps`).
    pub timestamp_secs: f64,
    /// The decoded frame, BGR channel order.
    pub image: Mat,
}

/// Number of source frames to advance between samples.
///
/// One sample per `interval_secs` of wall-clock video time, never less
/// than one frame.
pub fn compute_skip(fps: f64, interval_secs: f64) -> u64 {
    let skip = (fps * interval_secs).round();
    if skip < 1.0 {
        1
    } else {
        skip as u64
    }
}

/// Duration gate used by the fail-fast pre-check: only durations strictly
/// greater than the ceiling are rejected.
pub fn duration_exceeds(duration_secs: f64, max_secs: f64) -> bool {
    duration_secs > max_secs
}

/// Samples frames from a video file at a fixed wall-clock interval.
pub struct FrameSampler {
    capture: VideoCapture,
    fps: f64,
    duration_secs: f64,
    skip: u64,
    frames_read: u64,
    finished: bool,
}

impl FrameSampler {
    /// Open `path` and prepare to sample every `interval_secs` of video.
    ///
    /// Fails with [`MediaError::OpenFailed`] when the stream cannot be
    /// opened and [`MediaError::DurationExceeded`] when the computed
    /// duration is strictly greater than `max_duration_secs`. The duration
    /// check runs before any frame is decoded.
    pub fn open(
        path: impl AsRef<Path>,
        interval_secs: f64,
        max_duration_secs: f64,
    ) -> MediaResult<Self> {
        let path = path.as_ref();
        let capture = VideoCapture::from_file(&path.to_string_lossy(), videoio::CAP_ANY)?;
        if !capture.is_opened()? {
            return Err(MediaError::OpenFailed(PathBuf::from(path)));
        }

        let fps = capture.get(videoio::CAP_PROP_FPS)?;
        let frame_count = capture.get(videoio::CAP_PROP_FRAME_COUNT)?;
        let duration_secs = if fps > 0.0 { frame_count / fps } else { 0.0 };

        if duration_exceeds(duration_secs, max_duration_secs) {
            return Err(MediaError::DurationExceeded {
                duration: duration_secs,
                max: max_duration_secs,
            });
        }

        let skip = compute_skip(fps, interval_secs);
        debug!(
            path = %path.display(),
            fps,
            frame_count,
            duration_secs,
            skip,
            "opened video for sampling"
        );

        Ok(Self {
            capture,
            fps,
            duration_secs,
            skip,
            frames_read: 0,
            finished: false,
        })
    }

    /// Source frame rate reported by the container.
    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Computed video duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    /// Frame stride between samples.
    pub fn skip(&self) -> u64 {
        self.skip
    }

    /// Total frames decoded so far, sampled or not.
    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }
}

impl Iterator for FrameSampler {
    type Item = MediaResult<SampledFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            let mut frame = Mat::default();
            match self.capture.read(&mut frame) {
                Ok(true) => {}
                Ok(false) => {
                    self.finished = true;
                    return None;
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(MediaError::ReadFailed(e.to_string())));
                }
            }
            if frame.empty() {
                self.finished = true;
                return None;
            }

            let index = self.frames_read;
            self.frames_read += 1;

            if index % self.skip == 0 {
                let timestamp_secs = if self.fps > 0.0 {
                    index as f64 / self.fps
                } else {
                    0.0
                };
                return Some(Ok(SampledFrame {
                    index,
                    timestamp_secs,
                    image: frame,
                }));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_skip_one_second_at_30fps() {
        assert_eq!(compute_skip(30.0, 1.0), 30);
    }

    #[test]
    fn test_compute_skip_rounds() {
        assert_eq!(compute_skip(29.97, 1.0), 30);
        assert_eq!(compute_skip(23.976, 0.5), 12);
    }

    #[test]
    fn test_compute_skip_clamps_to_one_frame() {
        // Sub-frame intervals still advance by at least one frame.
        assert_eq!(compute_skip(30.0, 0.01), 1);
        assert_eq!(compute_skip(0.0, 1.0), 1);
    }

    #[test]
    fn test_duration_gate_is_strictly_greater() {
        // Exactly at the ceiling passes; only strictly longer fails.
        assert!(!duration_exceeds(300.0, 300.0));
        assert!(!duration_exceeds(299.99, 300.0));
        assert!(duration_exceeds(300.01, 300.0));
    }

    #[test]
    fn test_open_missing_file_fails() {
        let err = FrameSampler::open("/nonexistent/video.mp4", 1.0, 300.0).unwrap_err();
        assert!(matches!(
            err,
            MediaError::OpenFailed(_) | MediaError::OpenCv(_)
        ));
    }
}
