//! Skeleton overlay geometry for presentation code.
//!
//! This module only decides what to draw; pixels are the renderer's job.

use crate::{
    constants::DEFAULT_OVERLAY_MIN_SCORE,
    landmarks::{hand, HandLandmarks, Joint, Landmark, Pose},
};

/// Body skeleton edges
pub const POSE_CONNECTIONS: [(Joint, Joint); 16] = [
    (Joint::Nose, Joint::LeftEye),
    (Joint::Nose, Joint::RightEye),
    (Joint::LeftEye, Joint::LeftEar),
    (Joint::RightEye, Joint::RightEar),
    (Joint::LeftShoulder, Joint::RightShoulder),
    (Joint::LeftShoulder, Joint::LeftElbow),
    (Joint::LeftElbow, Joint::LeftWrist),
    (Joint::RightShoulder, Joint::RightElbow),
    (Joint::RightElbow, Joint::RightWrist),
    (Joint::LeftShoulder, Joint::LeftHip),
    (Joint::RightShoulder, Joint::RightHip),
    (Joint::LeftHip, Joint::RightHip),
    (Joint::LeftHip, Joint::LeftKnee),
    (Joint::LeftKnee, Joint::LeftAnkle),
    (Joint::RightHip, Joint::RightKnee),
    (Joint::RightKnee, Joint::RightAnkle),
];

/// Hand skeleton edges, by hand landmark index
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (hand::WRIST, hand::THUMB_CMC),
    (hand::THUMB_CMC, hand::THUMB_MCP),
    (hand::THUMB_MCP, hand::THUMB_IP),
    (hand::THUMB_IP, hand::THUMB_TIP),
    (hand::WRIST, hand::INDEX_MCP),
    (hand::INDEX_MCP, hand::INDEX_PIP),
    (hand::INDEX_PIP, hand::INDEX_DIP),
    (hand::INDEX_DIP, hand::INDEX_TIP),
    (hand::INDEX_MCP, hand::MIDDLE_MCP),
    (hand::MIDDLE_MCP, hand::MIDDLE_PIP),
    (hand::MIDDLE_PIP, hand::MIDDLE_DIP),
    (hand::MIDDLE_DIP, hand::MIDDLE_TIP),
    (hand::MIDDLE_MCP, hand::RING_MCP),
    (hand::RING_MCP, hand::RING_PIP),
    (hand::RING_PIP, hand::RING_DIP),
    (hand::RING_DIP, hand::RING_TIP),
    (hand::RING_MCP, hand::PINKY_MCP),
    (hand::WRIST, hand::PINKY_MCP),
    (hand::PINKY_MCP, hand::PINKY_PIP),
    (hand::PINKY_PIP, hand::PINKY_DIP),
    (hand::PINKY_DIP, hand::PINKY_TIP),
];

/// A line between two points in frame pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: (f32, f32),
    pub to: (f32, f32),
}

/// Everything to draw for one skeleton
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Overlay {
    pub points: Vec<(f32, f32)>,
    pub segments: Vec<Segment>,
}

impl Overlay {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.segments.is_empty()
    }
}

/// Presentation-side sink for overlays
pub trait OverlayRenderer {
    /// Draw the body skeleton
    fn draw_pose(&mut self, overlay: &Overlay);

    /// Draw a hand skeleton
    fn draw_hand(&mut self, overlay: &Overlay);
}

/// Joints and edges of a pose whose scores are above `min_score`
#[must_use]
pub fn pose_overlay(pose: &Pose, min_score: f32) -> Overlay {
    let visible = |landmark: &Landmark| landmark.is_confident(min_score);

    let points = pose
        .joints()
        .iter()
        .filter(|landmark| visible(landmark))
        .map(|landmark| (landmark.x, landmark.y))
        .collect();

    let segments = POSE_CONNECTIONS
        .iter()
        .map(|&(a, b)| (pose.joint(a), pose.joint(b)))
        .filter(|(a, b)| visible(a) && visible(b))
        .map(|(a, b)| Segment {
            from: (a.x, a.y),
            to: (b.x, b.y),
        })
        .collect();

    Overlay { points, segments }
}

/// Pose overlay with the default score cutoff
#[must_use]
pub fn default_pose_overlay(pose: &Pose) -> Overlay {
    pose_overlay(pose, DEFAULT_OVERLAY_MIN_SCORE)
}

/// Hand landmarks scaled from normalized to frame pixels.
///
/// Edges referring to points the hand does not have are skipped.
#[must_use]
#[allow(clippy::cast_precision_loss)] // Frame sizes fit f32
pub fn hand_overlay(hand: &HandLandmarks, width: u32, height: u32) -> Overlay {
    let (w, h) = (width as f32, height as f32);
    let to_pixels = |landmark: &Landmark| (landmark.x * w, landmark.y * h);

    let points = hand.points.iter().map(to_pixels).collect();
    let segments = HAND_CONNECTIONS
        .iter()
        .filter_map(|&(a, b)| Some((hand.point(a)?, hand.point(b)?)))
        .map(|(a, b)| Segment {
            from: to_pixels(a),
            to: to_pixels(b),
        })
        .collect();

    Overlay { points, segments }
}
