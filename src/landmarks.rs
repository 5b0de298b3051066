//! Landmark types produced by the pose and hand detectors.
//!
//! Body poses are stored in a fixed array indexed by [`Joint`], filled once
//! per frame from the detector's named keypoints. Hands keep the detector's
//! point order, which follows the 21-point hand convention in [`hand`].

use crate::constants::{NUM_HAND_LANDMARKS, NUM_POSE_JOINTS};
use serde::{Deserialize, Serialize};

fn default_score() -> f32 {
    1.0
}

/// A single tracked point with a confidence score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Horizontal coordinate
    pub x: f32,
    /// Vertical coordinate, growing downward
    pub y: f32,
    /// Depth, when the detector reports one
    #[serde(default)]
    pub z: f32,
    /// Detection confidence in `[0, 1]`
    #[serde(default = "default_score")]
    pub score: f32,
}

impl Landmark {
    /// Create a 2D landmark with the given score
    #[must_use]
    pub const fn new(x: f32, y: f32, score: f32) -> Self {
        Self { x, y, z: 0.0, score }
    }

    /// Placeholder for a joint the detector did not report
    #[must_use]
    pub const fn missing() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// True when the score is strictly above `min_score`
    #[must_use]
    pub fn is_confident(&self, min_score: f32) -> bool {
        self.score > min_score
    }
}

impl Default for Landmark {
    fn default() -> Self {
        Self::missing()
    }
}

/// Canonical body joints, in the order pose models report them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    Nose,
    LeftEye,
    RightEye,
    LeftEar,
    RightEar,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl Joint {
    /// All joints in index order
    pub const ALL: [Self; NUM_POSE_JOINTS] = [
        Self::Nose,
        Self::LeftEye,
        Self::RightEye,
        Self::LeftEar,
        Self::RightEar,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
    ];

    /// Position of this joint in [`Pose`] storage
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Keypoint name as emitted by pose models
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftEye => "left_eye",
            Self::RightEye => "right_eye",
            Self::LeftEar => "left_ear",
            Self::RightEar => "right_ear",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
        }
    }

    /// Look a joint up by keypoint name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|joint| joint.name() == name)
    }
}

/// A keypoint as reported by a pose model, keyed by name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedKeypoint {
    /// Joint name, e.g. `left_shoulder`
    pub name: String,
    /// Horizontal pixel coordinate
    pub x: f32,
    /// Vertical pixel coordinate
    pub y: f32,
    /// Detection confidence
    #[serde(default = "default_score")]
    pub score: f32,
}

/// One detected body, indexed by joint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    joints: [Landmark; NUM_POSE_JOINTS],
}

impl Pose {
    /// Build a pose from a full joint array
    #[must_use]
    pub const fn new(joints: [Landmark; NUM_POSE_JOINTS]) -> Self {
        Self { joints }
    }

    /// Build a pose from named keypoints.
    ///
    /// Unknown names are skipped; joints absent from the input stay at score 0.
    #[must_use]
    pub fn from_keypoints<'a, I>(keypoints: I) -> Self
    where
        I: IntoIterator<Item = &'a NamedKeypoint>,
    {
        let mut joints = [Landmark::missing(); NUM_POSE_JOINTS];
        for keypoint in keypoints {
            match Joint::from_name(&keypoint.name) {
                Some(joint) => {
                    joints[joint.index()] = Landmark::new(keypoint.x, keypoint.y, keypoint.score);
                }
                None => log::debug!("Ignoring unknown keypoint '{}'", keypoint.name),
            }
        }
        Self { joints }
    }

    /// Landmark for a joint
    #[must_use]
    pub const fn joint(&self, joint: Joint) -> &Landmark {
        &self.joints[joint.index()]
    }

    /// Replace the landmark for a joint
    pub fn set_joint(&mut self, joint: Joint, landmark: Landmark) {
        self.joints[joint.index()] = landmark;
    }

    /// All joints in index order
    #[must_use]
    pub const fn joints(&self) -> &[Landmark; NUM_POSE_JOINTS] {
        &self.joints
    }

    /// Iterate `(joint, landmark)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (Joint, &Landmark)> {
        Joint::ALL.iter().copied().zip(self.joints.iter())
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::new([Landmark::missing(); NUM_POSE_JOINTS])
    }
}

/// Hand landmark indices (21-point hand convention)
pub mod hand {
    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_MCP: usize = 5;
    pub const INDEX_PIP: usize = 6;
    pub const INDEX_DIP: usize = 7;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_MCP: usize = 9;
    pub const MIDDLE_PIP: usize = 10;
    pub const MIDDLE_DIP: usize = 11;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_MCP: usize = 13;
    pub const RING_PIP: usize = 14;
    pub const RING_DIP: usize = 15;
    pub const RING_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;
}

/// Landmarks for one detected hand
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HandLandmarks {
    /// Points in hand-convention order, normalized to the frame
    pub points: Vec<Landmark>,
    /// "Left" or "Right" when the detector reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handedness: Option<String>,
}

impl HandLandmarks {
    /// Wrap detector points
    #[must_use]
    pub fn new(points: Vec<Landmark>) -> Self {
        Self { points, handedness: None }
    }

    /// True when all 21 points are present
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.points.len() >= NUM_HAND_LANDMARKS
    }

    /// Point at a hand-convention index
    #[must_use]
    pub fn point(&self, index: usize) -> Option<&Landmark> {
        self.points.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joint_names_round_trip() {
        for joint in Joint::ALL {
            assert_eq!(Joint::from_name(joint.name()), Some(joint));
        }
        assert_eq!(Joint::from_name("left_thumb"), None);
    }

    #[test]
    fn test_joint_indices_match_order() {
        for (i, joint) in Joint::ALL.iter().enumerate() {
            assert_eq!(joint.index(), i);
        }
    }

    #[test]
    fn test_pose_from_keypoints_fills_missing() {
        let keypoints = vec![
            NamedKeypoint { name: "nose".to_string(), x: 320.0, y: 40.0, score: 0.9 },
            NamedKeypoint { name: "tail".to_string(), x: 1.0, y: 1.0, score: 1.0 },
        ];
        let pose = Pose::from_keypoints(&keypoints);

        assert_eq!(pose.joint(Joint::Nose).x, 320.0);
        assert_eq!(pose.joint(Joint::Nose).score, 0.9);
        assert_eq!(pose.joint(Joint::LeftAnkle).score, 0.0);
    }

    #[test]
    fn test_landmark_score_defaults_to_one() {
        let landmark: Landmark = serde_json::from_str(r#"{"x": 0.5, "y": 0.25}"#).unwrap();
        assert_eq!(landmark.score, 1.0);
        assert_eq!(landmark.z, 0.0);
    }

    #[test]
    fn test_is_confident_is_strict() {
        assert!(!Landmark::new(0.0, 0.0, 0.5).is_confident(0.5));
        assert!(Landmark::new(0.0, 0.0, 0.51).is_confident(0.5));
    }
}
