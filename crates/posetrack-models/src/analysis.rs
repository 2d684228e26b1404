//! Analysis document types.
//!
//! A [`VideoAnalysis`] is the single stored record of one complete analysis
//! run over one video: the ordered per-frame landmark records plus running
//! coordinate maxima. Frames are only ever appended through
//! [`VideoAnalysis::push_frame`], which keeps `total_frames` and the maxima
//! consistent with the frame list.

use std::collections::BTreeMap;

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::landmark::{LandmarkPoint, LANDMARK_COUNT, POSE_LANDMARK_NAMES};

/// Landmark records for a single sampled frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    /// Offset from video start, `HH:MM:SS(.ffffff)`.
    pub timestamp: String,
    /// Keypoint name to detected point. Keys are drawn from
    /// [`POSE_LANDMARK_NAMES`].
    pub landmarks: BTreeMap<String, LandmarkPoint>,
}

impl FrameRecord {
    /// Build a record from the detector's full 33-point output, pairing
    /// points with the fixed vocabulary in model order.
    ///
    /// # Panics
    /// Panics if `points` does not hold exactly [`LANDMARK_COUNT`] entries;
    /// the detector contract is all-or-nothing, so a partial slice here is
    /// a programming error.
    pub fn from_points(timestamp: impl Into<String>, points: &[LandmarkPoint]) -> Self {
        assert_eq!(
            points.len(),
            LANDMARK_COUNT,
            "detector must yield all {} landmarks",
            LANDMARK_COUNT
        );

        let landmarks = POSE_LANDMARK_NAMES
            .iter()
            .zip(points)
            .map(|(name, point)| (name.to_string(), *point))
            .collect();

        Self {
            timestamp: timestamp.into(),
            landmarks,
        }
    }
}

/// The aggregate analysis document for one video.
///
/// Serialized field names match the persisted document shape: the frame
/// list is stored under `data`, and the store-generated id under `_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoAnalysis {
    /// Store-generated id; `None` until the document is persisted.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// Id of the source video.
    pub video_id: String,
    /// Per-frame records in chronological sampling order.
    #[serde(rename = "data")]
    pub frames: Vec<FrameRecord>,
    pub created_at: DateTime<Utc>,
    /// Always equals `frames.len()`.
    pub total_frames: u64,
    /// Running maximum over all landmark x values, starting at 0.0.
    pub max_x: f64,
    /// Running maximum over all landmark y values, starting at 0.0.
    pub max_y: f64,
}

impl VideoAnalysis {
    /// Start an empty analysis for `video_id`.
    pub fn new(video_id: impl Into<String>) -> Self {
        Self {
            id: None,
            video_id: video_id.into(),
            frames: Vec::new(),
            created_at: Utc::now(),
            total_frames: 0,
            max_x: 0.0,
            max_y: 0.0,
        }
    }

    /// Append a frame record, folding its landmark coordinates into the
    /// running maxima. Records are kept in append order.
    pub fn push_frame(&mut self, record: FrameRecord) {
        for point in record.landmarks.values() {
            self.max_x = self.max_x.max(point.x);
            self.max_y = self.max_y.max(point.y);
        }
        self.frames.push(record);
        self.total_frames = self.frames.len() as u64;
    }

    /// Hex string form of the store-generated id, if persisted.
    pub fn id_hex(&self) -> Option<String> {
        self.id.map(|id| id.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::POSE_CONNECTIONS;

    fn uniform_points(x: f64, y: f64) -> Vec<LandmarkPoint> {
        vec![LandmarkPoint::new(x, y, 0.0, 1.0); LANDMARK_COUNT]
    }

    fn varied_points(base: f64) -> Vec<LandmarkPoint> {
        (0..LANDMARK_COUNT)
            .map(|i| LandmarkPoint::new(base + i as f64 * 0.01, base - i as f64 * 0.005, -0.02, 0.9))
            .collect()
    }

    #[test]
    fn test_from_points_pairs_vocabulary_in_order() {
        let record = FrameRecord::from_points("00:00:00", &varied_points(0.1));
        assert_eq!(record.landmarks.len(), LANDMARK_COUNT);
        assert!(record.landmarks.contains_key("nose"));
        assert!(record.landmarks.contains_key("right_foot_index"));
        // nose is model index 0
        assert!((record.landmarks["nose"].x - 0.1).abs() < 1e-12);
        // right_foot_index is model index 32
        assert!((record.landmarks["right_foot_index"].x - 0.42).abs() < 1e-12);
    }

    #[test]
    #[should_panic(expected = "all 33 landmarks")]
    fn test_from_points_rejects_partial_output() {
        let points = uniform_points(0.5, 0.5);
        FrameRecord::from_points("00:00:00", &points[..10]);
    }

    #[test]
    fn test_push_frame_keeps_count_and_order() {
        let mut analysis = VideoAnalysis::new("video-1");
        assert_eq!(analysis.total_frames, 0);

        for ts in ["00:00:00", "00:00:01", "00:00:02"] {
            analysis.push_frame(FrameRecord::from_points(ts, &uniform_points(0.4, 0.4)));
        }

        assert_eq!(analysis.total_frames, 3);
        assert_eq!(analysis.total_frames as usize, analysis.frames.len());
        let timestamps: Vec<_> = analysis.frames.iter().map(|f| f.timestamp.as_str()).collect();
        assert_eq!(timestamps, ["00:00:00", "00:00:01", "00:00:02"]);
    }

    #[test]
    fn test_maxima_are_monotonic_and_exact() {
        let mut analysis = VideoAnalysis::new("video-1");
        analysis.push_frame(FrameRecord::from_points("00:00:00", &uniform_points(0.7, 0.2)));
        assert_eq!(analysis.max_x, 0.7);
        assert_eq!(analysis.max_y, 0.2);

        // A lower frame must not pull the maxima back down.
        analysis.push_frame(FrameRecord::from_points("00:00:01", &uniform_points(0.3, 0.1)));
        assert_eq!(analysis.max_x, 0.7);
        assert_eq!(analysis.max_y, 0.2);

        analysis.push_frame(FrameRecord::from_points("00:00:02", &uniform_points(0.5, 0.95)));
        assert_eq!(analysis.max_x, 0.7);
        assert_eq!(analysis.max_y, 0.95);

        // Every stored landmark is bounded by the document maxima.
        for frame in &analysis.frames {
            for point in frame.landmarks.values() {
                assert!(point.x <= analysis.max_x);
                assert!(point.y <= analysis.max_y);
            }
        }
    }

    #[test]
    fn test_serde_shape_matches_persisted_document() {
        let mut analysis = VideoAnalysis::new("abcdefabcdefabcdefabcdef");
        analysis.push_frame(FrameRecord::from_points("00:00:00", &varied_points(0.2)));

        let json = serde_json::to_value(&analysis).unwrap();
        // Unsaved documents carry no _id.
        assert!(json.get("_id").is_none());
        // The frame list is persisted under "data".
        assert!(json.get("data").is_some());
        assert!(json.get("frames").is_none());
        assert_eq!(json["total_frames"], 1);

        let back: VideoAnalysis = serde_json::from_value(json).unwrap();
        assert_eq!(back.frames, analysis.frames);
        assert_eq!(back.total_frames, analysis.total_frames);
        assert!((back.max_x - analysis.max_x).abs() < 1e-12);
        assert!((back.max_y - analysis.max_y).abs() < 1e-12);
    }

    #[test]
    fn test_connections_stay_within_record() {
        let record = FrameRecord::from_points("00:00:00", &uniform_points(0.5, 0.5));
        for (a, b) in POSE_CONNECTIONS {
            assert!(a < record.landmarks.len());
            assert!(b < record.landmarks.len());
        }
    }
}
