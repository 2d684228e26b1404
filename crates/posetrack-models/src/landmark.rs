//! Pose landmark types and the fixed 33-point vocabulary.

use serde::{Deserialize, Serialize};

/// Number of keypoints produced by the pose landmark model.
pub const LANDMARK_COUNT: usize = 33;

/// Anatomical names for the 33 pose keypoints, in model output order.
///
/// The detector returns either all 33 points or none, so every stored
/// frame carries keys drawn from exactly this set.
pub const POSE_LANDMARK_NAMES: [&str; LANDMARK_COUNT] = [
    "nose",
    "left_eye_inner",
    "left_eye",
    "left_eye_outer",
    "right_eye_inner",
    "right_eye",
    "right_eye_outer",
    "left_ear",
    "right_ear",
    "mouth_left",
    "mouth_right",
    "left_shoulder",
    "right_shoulder",
    "left_elbow",
    "right_elbow",
    "left_wrist",
    "right_wrist",
    "left_pinky",
    "right_pinky",
    "left_index",
    "right_index",
    "left_thumb",
    "right_thumb",
    "left_hip",
    "right_hip",
    "left_knee",
    "right_knee",
    "left_ankle",
    "right_ankle",
    "left_heel",
    "right_heel",
    "left_foot_index",
    "right_foot_index",
];

/// Skeleton edges between keypoint indices, used for debug rendering.
pub const POSE_CONNECTIONS: [(usize, usize); 35] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 7),
    (0, 4),
    (4, 5),
    (5, 6),
    (6, 8),
    (9, 10),
    (11, 12),
    (11, 13),
    (13, 15),
    (15, 17),
    (15, 19),
    (15, 21),
    (17, 19),
    (12, 14),
    (14, 16),
    (16, 18),
    (16, 20),
    (16, 22),
    (18, 20),
    (11, 23),
    (12, 24),
    (23, 24),
    (23, 25),
    (24, 26),
    (25, 27),
    (26, 28),
    (27, 29),
    (28, 30),
    (29, 31),
    (30, 32),
    (27, 31),
    (28, 32),
];

/// A single detected keypoint.
///
/// Coordinates are in normalized image space (typically `[0, 1]`, but the
/// model may place occluded points slightly outside it). `visibility` is
/// the model's confidence that the point is present and unoccluded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandmarkPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub visibility: f64,
}

impl LandmarkPoint {
    pub fn new(x: f64, y: f64, z: f64, visibility: f64) -> Self {
        Self { x, y, z, visibility }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_vocabulary_has_33_unique_names() {
        let unique: HashSet<_> = POSE_LANDMARK_NAMES.iter().collect();
        assert_eq!(unique.len(), LANDMARK_COUNT);
    }

    #[test]
    fn test_connections_reference_valid_indices() {
        for (a, b) in POSE_CONNECTIONS {
            assert!(a < LANDMARK_COUNT, "connection start {} out of range", a);
            assert!(b < LANDMARK_COUNT, "connection end {} out of range", b);
            assert_ne!(a, b);
        }
    }

    #[test]
    fn test_landmark_point_serde_field_names() {
        let point = LandmarkPoint::new(0.5, 0.25, -0.1, 0.99);
        let json = serde_json::to_value(point).unwrap();
        assert_eq!(json["x"], 0.5);
        assert_eq!(json["y"], 0.25);
        assert_eq!(json["z"], -0.1);
        assert_eq!(json["visibility"], 0.99);
    }
}
