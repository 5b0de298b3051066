//! Touch gestures on the mirror's screen: swipe, double tap and pinch.

use crate::{
    actions::{ActionEvent, ActionSource, GestureAction},
    config::TouchConfig,
};
use serde::{Deserialize, Serialize};
use std::{fmt, time::Duration};

/// A touch contact in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub x: f64,
    pub y: f64,
}

impl TouchPoint {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn distance_to(self, other: Self) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Dominant direction of a swipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    Left,
    Right,
    Up,
    Down,
}

impl SwipeDirection {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

/// A recognized touch gesture
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchGesture {
    Swipe(SwipeDirection),
    DoubleTap,
    /// Current finger spread relative to the spread when the pinch began
    Pinch { scale: f64 },
}

impl fmt::Display for TouchGesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Swipe(direction) => write!(f, "swipe_{}", direction.label()),
            Self::DoubleTap => f.write_str("double_tap"),
            Self::Pinch { scale } => write!(f, "pinch({scale:.2})"),
        }
    }
}

impl TouchGesture {
    /// Action the mirror performs for this gesture, if any
    #[must_use]
    pub const fn action(self) -> Option<GestureAction> {
        match self {
            Self::Swipe(SwipeDirection::Left) => Some(GestureAction::Next),
            Self::Swipe(SwipeDirection::Right) => Some(GestureAction::Back),
            Self::Swipe(SwipeDirection::Up) | Self::DoubleTap => Some(GestureAction::Photo),
            Self::Swipe(SwipeDirection::Down) => Some(GestureAction::SwitchCamera),
            Self::Pinch { .. } => None,
        }
    }

    /// Wrap as an action event at `timestamp`
    #[must_use]
    pub fn to_action_event(self, timestamp: Duration) -> Option<ActionEvent> {
        self.action().map(|action| ActionEvent {
            source: ActionSource::Touch(self),
            action,
            confidence: 1.0,
            timestamp,
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct TouchStart {
    point: TouchPoint,
    at: Duration,
}

/// Tracks touch events and reports gestures
#[derive(Debug, Clone)]
pub struct TouchGestureRecognizer {
    min_swipe_distance: f64,
    max_swipe_time: Duration,
    double_tap_window: Duration,
    start: Option<TouchStart>,
    last_tap: Option<Duration>,
    pinch_start_distance: Option<f64>,
}

impl Default for TouchGestureRecognizer {
    fn default() -> Self {
        Self::new(&TouchConfig::default())
    }
}

impl TouchGestureRecognizer {
    #[must_use]
    pub fn new(config: &TouchConfig) -> Self {
        Self {
            min_swipe_distance: config.min_swipe_distance,
            max_swipe_time: Duration::from_millis(config.max_swipe_time_ms),
            double_tap_window: Duration::from_millis(config.double_tap_window_ms),
            start: None,
            last_tap: None,
            pinch_start_distance: None,
        }
    }

    /// Fingers went down; `touches` holds every active contact
    pub fn touch_start(&mut self, touches: &[TouchPoint], now: Duration) -> Option<TouchGesture> {
        match touches {
            [first, second] => {
                self.pinch_start_distance = Some(first.distance_to(*second));
                None
            }
            [first, ..] => {
                self.start = Some(TouchStart { point: *first, at: now });
                let double_tap = self
                    .last_tap
                    .is_some_and(|last| now.saturating_sub(last) < self.double_tap_window);
                self.last_tap = Some(now);
                double_tap.then_some(TouchGesture::DoubleTap)
            }
            [] => None,
        }
    }

    /// Fingers moved; reports the pinch scale while two fingers are down
    pub fn touch_move(&mut self, touches: &[TouchPoint]) -> Option<TouchGesture> {
        match (touches, self.pinch_start_distance) {
            ([first, second], Some(start)) if start > 0.0 => Some(TouchGesture::Pinch {
                scale: first.distance_to(*second) / start,
            }),
            _ => None,
        }
    }

    /// A finger lifted at `lifted`; `remaining` contacts stay down
    pub fn touch_end(&mut self, lifted: TouchPoint, remaining: usize, now: Duration) -> Option<TouchGesture> {
        if remaining < 2 {
            self.pinch_start_distance = None;
        }

        let start = self.start.take()?;
        let dx = lifted.x - start.point.x;
        let dy = lifted.y - start.point.y;
        let elapsed = now.saturating_sub(start.at);

        if elapsed >= self.max_swipe_time
            || (dx.abs() <= self.min_swipe_distance && dy.abs() <= self.min_swipe_distance)
        {
            return None;
        }

        let direction = if dx.abs() > dy.abs() {
            if dx > 0.0 {
                SwipeDirection::Right
            } else {
                SwipeDirection::Left
            }
        } else if dy > 0.0 {
            SwipeDirection::Down
        } else {
            SwipeDirection::Up
        };
        Some(TouchGesture::Swipe(direction))
    }

    /// Forget any gesture in progress
    pub fn reset(&mut self) {
        self.start = None;
        self.last_tap = None;
        self.pinch_start_distance = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_swipe_directions() {
        let cases = [
            (TouchPoint::new(100.0, 10.0), SwipeDirection::Left),
            (TouchPoint::new(300.0, 10.0), SwipeDirection::Right),
            (TouchPoint::new(200.0, -60.0), SwipeDirection::Up),
            (TouchPoint::new(210.0, 100.0), SwipeDirection::Down),
        ];
        for (end, expected) in cases {
            let mut recognizer = TouchGestureRecognizer::default();
            recognizer.touch_start(&[TouchPoint::new(200.0, 0.0)], ms(0));
            assert_eq!(
                recognizer.touch_end(end, 0, ms(150)),
                Some(TouchGesture::Swipe(expected))
            );
        }
    }

    #[test]
    fn test_slow_or_short_swipe_ignored() {
        let mut recognizer = TouchGestureRecognizer::default();
        recognizer.touch_start(&[TouchPoint::new(0.0, 0.0)], ms(0));
        assert_eq!(recognizer.touch_end(TouchPoint::new(200.0, 0.0), 0, ms(300)), None);

        recognizer.touch_start(&[TouchPoint::new(0.0, 0.0)], ms(1000));
        assert_eq!(recognizer.touch_end(TouchPoint::new(50.0, 50.0), 0, ms(1100)), None);
    }

    #[test]
    fn test_double_tap() {
        let mut recognizer = TouchGestureRecognizer::default();
        let tap = [TouchPoint::new(10.0, 10.0)];
        assert_eq!(recognizer.touch_start(&tap, ms(0)), None);
        recognizer.touch_end(tap[0], 0, ms(50));
        assert_eq!(recognizer.touch_start(&tap, ms(250)), Some(TouchGesture::DoubleTap));
        // a third tap 400ms after the second is a fresh single tap
        assert_eq!(recognizer.touch_start(&tap, ms(650)), None);
    }

    #[test]
    fn test_pinch_scale() {
        let mut recognizer = TouchGestureRecognizer::default();
        recognizer.touch_start(&[TouchPoint::new(0.0, 0.0), TouchPoint::new(100.0, 0.0)], ms(0));

        assert_eq!(
            recognizer.touch_move(&[TouchPoint::new(0.0, 0.0), TouchPoint::new(150.0, 0.0)]),
            Some(TouchGesture::Pinch { scale: 1.5 })
        );

        recognizer.touch_end(TouchPoint::new(150.0, 0.0), 1, ms(200));
        assert_eq!(
            recognizer.touch_move(&[TouchPoint::new(0.0, 0.0), TouchPoint::new(150.0, 0.0)]),
            None
        );
    }

    #[test]
    fn test_touch_actions() {
        assert_eq!(TouchGesture::Swipe(SwipeDirection::Left).action(), Some(GestureAction::Next));
        assert_eq!(TouchGesture::Swipe(SwipeDirection::Right).action(), Some(GestureAction::Back));
        assert_eq!(TouchGesture::Swipe(SwipeDirection::Up).action(), Some(GestureAction::Photo));
        assert_eq!(
            TouchGesture::Swipe(SwipeDirection::Down).action(),
            Some(GestureAction::SwitchCamera)
        );
        assert_eq!(TouchGesture::DoubleTap.action(), Some(GestureAction::Photo));
        assert!(TouchGesture::Pinch { scale: 2.0 }.to_action_event(ms(0)).is_none());
        assert_eq!(TouchGesture::Swipe(SwipeDirection::Up).to_string(), "swipe_up");
    }
}
