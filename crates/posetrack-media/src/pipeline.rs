//! The per-frame extraction and aggregation loop.

use tracing::info;

use posetrack_models::{format_frame_timestamp, FrameRecord, VideoAnalysis};

use crate::detector::PoseDetector;
use crate::error::MediaResult;
use crate::sampler::SampledFrame;
use crate::visualize::PoseVisualizer;

/// Counters produced by one run of the frame loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    /// Sampled frames with a detected pose, recorded into the document.
    pub frames_processed: u64,
    /// Sampled frames where no pose was detected; skipped by policy.
    pub frames_with_no_detection: u64,
}

/// Drive `detector` over every sampled frame, appending detected frames to
/// `analysis` in sampling order.
///
/// Frames without a detection are not recorded; they are only counted.
/// The optional visualizer is a pure side effect and cannot fail the loop.
pub fn run_frame_loop<I, D>(
    frames: I,
    detector: &mut D,
    analysis: &mut VideoAnalysis,
    visualizer: Option<&PoseVisualizer>,
) -> MediaResult<LoopStats>
where
    I: IntoIterator<Item = MediaResult<SampledFrame>>,
    D: PoseDetector + ?Sized,
{
    let mut stats = LoopStats::default();

    for item in frames {
        let frame = item?;
        match detector.detect(&frame.image)? {
            Some(points) => {
                let timestamp = format_frame_timestamp(frame.timestamp_secs);
                analysis.push_frame(FrameRecord::from_points(timestamp, &points));

                if let Some(viz) = visualizer {
                    viz.save(&frame.image, &points, stats.frames_processed);
                }

                stats.frames_processed += 1;
                if stats.frames_processed % 10 == 0 {
                    info!(frames = stats.frames_processed, "processed sampled frames");
                }
            }
            None => stats.frames_with_no_detection += 1,
        }
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MediaError;
    use opencv::core::Mat;
    use posetrack_models::{LandmarkPoint, LANDMARK_COUNT};

    fn frame(index: u64, fps: f64) -> MediaResult<SampledFrame> {
        Ok(SampledFrame {
            index,
            timestamp_secs: index as f64 / fps,
            image: Mat::default(),
        })
    }

    fn points(x: f64, y: f64) -> Vec<LandmarkPoint> {
        vec![LandmarkPoint::new(x, y, 0.0, 1.0); LANDMARK_COUNT]
    }

    /// Detects a fixed pose on every frame.
    struct AlwaysDetect(Vec<LandmarkPoint>);

    impl PoseDetector for AlwaysDetect {
        fn detect(&mut self, _frame: &Mat) -> MediaResult<Option<Vec<LandmarkPoint>>> {
            Ok(Some(self.0.clone()))
        }
    }

    /// Never detects a pose.
    struct NeverDetect;

    impl PoseDetector for NeverDetect {
        fn detect(&mut self, _frame: &Mat) -> MediaResult<Option<Vec<LandmarkPoint>>> {
            Ok(None)
        }
    }

    /// Detects on every other call, starting with a detection.
    struct AlternatingDetect {
        calls: u64,
        points: Vec<LandmarkPoint>,
    }

    impl PoseDetector for AlternatingDetect {
        fn detect(&mut self, _frame: &Mat) -> MediaResult<Option<Vec<LandmarkPoint>>> {
            let hit = self.calls % 2 == 0;
            self.calls += 1;
            Ok(hit.then(|| self.points.clone()))
        }
    }

    #[test]
    fn test_thirty_fps_one_second_interval_scenario() {
        // 90 source frames at 30 fps sampled every second -> indices 0, 30, 60.
        let frames = vec![frame(0, 30.0), frame(30, 30.0), frame(60, 30.0)];
        let mut detector = AlwaysDetect(points(0.5, 0.5));
        let mut analysis = VideoAnalysis::new("video-1");

        let stats = run_frame_loop(frames, &mut detector, &mut analysis, None).unwrap();

        assert_eq!(stats.frames_processed, 3);
        assert_eq!(stats.frames_with_no_detection, 0);
        assert_eq!(analysis.total_frames, 3);
        let timestamps: Vec<_> = analysis.frames.iter().map(|f| f.timestamp.as_str()).collect();
        assert_eq!(timestamps, ["00:00:00", "00:00:01", "00:00:02"]);
    }

    #[test]
    fn test_no_detection_frames_are_counted_not_recorded() {
        let frames = vec![frame(0, 30.0), frame(30, 30.0), frame(60, 30.0)];
        let mut detector = NeverDetect;
        let mut analysis = VideoAnalysis::new("video-1");

        let stats = run_frame_loop(frames, &mut detector, &mut analysis, None).unwrap();

        assert_eq!(stats.frames_processed, 0);
        assert_eq!(stats.frames_with_no_detection, 3);
        assert_eq!(analysis.total_frames, 0);
        assert!(analysis.frames.is_empty());
    }

    #[test]
    fn test_partial_detection_preserves_order_and_maxima() {
        let frames = (0..4).map(|i| frame(i * 30, 30.0)).collect::<Vec<_>>();
        let mut detector = AlternatingDetect {
            calls: 0,
            points: points(0.8, 0.6),
        };
        let mut analysis = VideoAnalysis::new("video-1");

        let stats = run_frame_loop(frames, &mut detector, &mut analysis, None).unwrap();

        assert_eq!(stats.frames_processed, 2);
        assert_eq!(stats.frames_with_no_detection, 2);
        let timestamps: Vec<_> = analysis.frames.iter().map(|f| f.timestamp.as_str()).collect();
        assert_eq!(timestamps, ["00:00:00", "00:00:02"]);
        assert_eq!(analysis.max_x, 0.8);
        assert_eq!(analysis.max_y, 0.6);
    }

    #[test]
    fn test_frame_source_error_stops_the_loop() {
        let frames = vec![
            frame(0, 30.0),
            Err(MediaError::ReadFailed("decoder gone".into())),
            frame(60, 30.0),
        ];
        let mut detector = AlwaysDetect(points(0.5, 0.5));
        let mut analysis = VideoAnalysis::new("video-1");

        let err = run_frame_loop(frames, &mut detector, &mut analysis, None).unwrap_err();
        assert!(matches!(err, MediaError::ReadFailed(_)));
        // The frame before the failure was already aggregated; the caller
        // discards the whole analysis on error, so no partial persistence.
        assert_eq!(analysis.total_frames, 1);
    }

    #[test]
    fn test_detector_error_propagates() {
        struct FailingDetect;
        impl PoseDetector for FailingDetect {
            fn detect(&mut self, _frame: &Mat) -> MediaResult<Option<Vec<LandmarkPoint>>> {
                Err(MediaError::detection_failed("session lost"))
            }
        }

        let frames = vec![frame(0, 30.0)];
        let mut analysis = VideoAnalysis::new("video-1");
        let err = run_frame_loop(frames, &mut FailingDetect, &mut analysis, None).unwrap_err();
        assert!(matches!(err, MediaError::DetectionFailed(_)));
    }
}
