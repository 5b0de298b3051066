//! Hand gesture classification from 21-point hand landmarks.
//!
//! Several predicates can hold for the same hand (a thumbs-up with a curled
//! ring finger is also neither a fist nor a point). Gestures are tested in
//! [`Gesture::PRIORITY`] order and the first match wins.

use crate::{
    constants::{
        GESTURE_BASE_CONFIDENCE, GESTURE_IN_RANGE_BONUS, GESTURE_MAX_CONFIDENCE, GESTURE_POINT_PEACE_BONUS,
        GESTURE_THUMB_BONUS, NUM_HAND_LANDMARKS,
    },
    geometry::{is_finger_extended, is_thumb_down, is_thumb_up, within_unit_range},
    landmarks::{hand, Landmark},
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Discrete hand shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gesture {
    Point,
    OpenPalm,
    Fist,
    Peace,
    ThumbsUp,
    ThumbsDown,
}

impl Gesture {
    /// Evaluation order; the first matching gesture is reported
    pub const PRIORITY: [Self; 6] = [
        Self::Point,
        Self::OpenPalm,
        Self::Fist,
        Self::Peace,
        Self::ThumbsUp,
        Self::ThumbsDown,
    ];

    /// Label used in configuration and logs
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Point => "point",
            Self::OpenPalm => "open_palm",
            Self::Fist => "fist",
            Self::Peace => "peace",
            Self::ThumbsUp => "thumbs_up",
            Self::ThumbsDown => "thumbs_down",
        }
    }

    /// Bonus added on top of the base confidence, in hundredths
    const fn bonus(self) -> u32 {
        match self {
            Self::Point | Self::Peace => GESTURE_POINT_PEACE_BONUS,
            Self::ThumbsUp | Self::ThumbsDown => GESTURE_THUMB_BONUS,
            Self::OpenPalm | Self::Fist => 0,
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A gesture recognized on one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassifiedGesture {
    pub gesture: Gesture,
    pub confidence: f32,
}

/// A classified gesture stamped with the frame time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureEvent {
    pub gesture: Gesture,
    pub confidence: f32,
    pub timestamp: Duration,
}

impl ClassifiedGesture {
    /// Stamp this classification with a frame time
    #[must_use]
    pub const fn at(self, timestamp: Duration) -> GestureEvent {
        GestureEvent {
            gesture: self.gesture,
            confidence: self.confidence,
            timestamp,
        }
    }
}

/// Which fingers are extended on a hand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FingerState {
    index: bool,
    middle: bool,
    ring: bool,
    pinky: bool,
    thumb_up: bool,
    thumb_down: bool,
}

impl FingerState {
    fn from_points(points: &[Landmark]) -> Self {
        let wrist = &points[hand::WRIST];
        let extended = |tip: usize, pip: usize| is_finger_extended(&points[tip], &points[pip], wrist);
        let thumb_tip = &points[hand::THUMB_TIP];
        let thumb_mcp = &points[hand::THUMB_MCP];

        Self {
            index: extended(hand::INDEX_TIP, hand::INDEX_PIP),
            middle: extended(hand::MIDDLE_TIP, hand::MIDDLE_PIP),
            ring: extended(hand::RING_TIP, hand::RING_PIP),
            pinky: extended(hand::PINKY_TIP, hand::PINKY_PIP),
            thumb_up: is_thumb_up(thumb_tip, thumb_mcp, wrist),
            thumb_down: is_thumb_down(thumb_tip, thumb_mcp, wrist),
        }
    }

    const fn matches(self, gesture: Gesture) -> bool {
        let Self {
            index,
            middle,
            ring,
            pinky,
            thumb_up,
            thumb_down,
        } = self;
        match gesture {
            Gesture::Point => index && !middle && !ring && !pinky,
            Gesture::OpenPalm => index && middle && ring && pinky,
            Gesture::Fist => !index && !middle && !ring && !pinky,
            Gesture::Peace => index && middle && !ring && !pinky,
            Gesture::ThumbsUp => thumb_up && !index && !middle,
            Gesture::ThumbsDown => thumb_down && !index && !middle,
        }
    }
}

/// Stateless classifier over hand landmarks
#[derive(Debug, Clone, Copy, Default)]
pub struct GestureClassifier;

impl GestureClassifier {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Classify one hand; `None` when fewer than 21 points or no gesture matches
    #[must_use]
    pub fn classify(&self, points: &[Landmark]) -> Option<ClassifiedGesture> {
        if points.len() < NUM_HAND_LANDMARKS {
            return None;
        }

        let fingers = FingerState::from_points(points);
        Gesture::PRIORITY
            .into_iter()
            .find(|&gesture| fingers.matches(gesture))
            .map(|gesture| ClassifiedGesture {
                gesture,
                confidence: Self::confidence(points, gesture),
            })
    }

    /// Heuristic confidence: base, plus a bonus when every point is inside
    /// the frame, plus a per-gesture bonus. Summed in hundredths so that
    /// 0.7 + 0.1 lands exactly on 0.8.
    #[allow(clippy::cast_precision_loss)] // Values are at most 100
    fn confidence(points: &[Landmark], gesture: Gesture) -> f32 {
        let mut hundredths = GESTURE_BASE_CONFIDENCE;
        if within_unit_range(points) {
            hundredths += GESTURE_IN_RANGE_BONUS;
        }
        hundredths += gesture.bonus();
        hundredths.min(GESTURE_MAX_CONFIDENCE) as f32 / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Hand with the wrist at the bottom, every PIP 0.1 above the wrist and
    /// each tip either at its PIP (curled) or 0.2 above the wrist (extended)
    fn hand_with(extended: [bool; 4], thumb_tip_y: f32) -> Vec<Landmark> {
        let mut points = vec![Landmark::new(0.5, 0.9, 1.0); NUM_HAND_LANDMARKS];
        points[hand::THUMB_MCP] = Landmark::new(0.4, 0.8, 1.0);
        points[hand::THUMB_TIP] = Landmark::new(0.35, thumb_tip_y, 1.0);

        let fingers = [
            (hand::INDEX_PIP, hand::INDEX_TIP, 0.45),
            (hand::MIDDLE_PIP, hand::MIDDLE_TIP, 0.5),
            (hand::RING_PIP, hand::RING_TIP, 0.55),
            (hand::PINKY_PIP, hand::PINKY_TIP, 0.6),
        ];
        for ((pip, tip, x), is_extended) in fingers.into_iter().zip(extended) {
            points[pip] = Landmark::new(x, 0.8, 1.0);
            points[tip] = if is_extended {
                Landmark::new(x, 0.6, 1.0)
            } else {
                Landmark::new(x, 0.8, 1.0)
            };
        }
        points
    }

    fn classify(points: &[Landmark]) -> Option<Gesture> {
        GestureClassifier::new().classify(points).map(|c| c.gesture)
    }

    #[test]
    fn test_point() {
        let c = GestureClassifier::new()
            .classify(&hand_with([true, false, false, false], 0.85))
            .unwrap();
        assert_eq!(c.gesture, Gesture::Point);
        assert_eq!(c.confidence, 1.0);
    }

    #[test]
    fn test_open_palm() {
        assert_eq!(classify(&hand_with([true; 4], 0.85)), Some(Gesture::OpenPalm));
    }

    #[test]
    fn test_fist_wins_over_thumbs_up() {
        // all four fingers curled with the thumb raised still reads as a fist
        assert_eq!(classify(&hand_with([false; 4], 0.5)), Some(Gesture::Fist));
    }

    #[test]
    fn test_peace() {
        assert_eq!(classify(&hand_with([true, true, false, false], 0.85)), Some(Gesture::Peace));
    }

    #[test]
    fn test_thumbs_up_and_down() {
        // ring extended keeps it from reading as a fist
        assert_eq!(classify(&hand_with([false, false, true, false], 0.5)), Some(Gesture::ThumbsUp));
        assert_eq!(
            classify(&hand_with([false, false, true, false], 0.95)),
            Some(Gesture::ThumbsDown)
        );
    }

    #[test]
    fn test_unmatched_shape() {
        // middle only, thumb level with its joint
        assert_eq!(classify(&hand_with([false, true, false, false], 0.85)), None);
    }

    #[test]
    fn test_too_few_points() {
        let mut points = hand_with([true; 4], 0.85);
        points.truncate(20);
        assert_eq!(classify(&points), None);
        assert_eq!(classify(&[]), None);
    }

    #[test]
    fn test_confidence_terms() {
        let inside = hand_with([true; 4], 0.85);
        assert_eq!(GestureClassifier::confidence(&inside, Gesture::OpenPalm), 0.9);
        assert_eq!(GestureClassifier::confidence(&inside, Gesture::ThumbsUp), 1.0);

        let mut outside = inside;
        outside[hand::PINKY_TIP].x = 1.2;
        assert_eq!(GestureClassifier::confidence(&outside, Gesture::Fist), 0.7);
        assert_eq!(GestureClassifier::confidence(&outside, Gesture::Point), 0.8);
        assert_eq!(GestureClassifier::confidence(&outside, Gesture::ThumbsDown), 0.85);
    }

    #[test]
    fn test_gesture_labels() {
        assert_eq!(Gesture::OpenPalm.to_string(), "open_palm");
        let parsed: Gesture = serde_yaml::from_str("thumbs_down").unwrap();
        assert_eq!(parsed, Gesture::ThumbsDown);
    }
}
