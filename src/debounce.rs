//! Debouncing of per-frame gesture classifications.
//!
//! A gesture is confirmed once it has been observed continuously for the
//! hold time, and no two confirmations happen closer than the cooldown.
//!
//! ```text
//! Idle --valid event--> Pending --hold elapsed--> Cooldown --cooldown elapsed--> Idle
//!                       Pending --different valid gesture--> Pending (timer restarts)
//! ```
//!
//! Time is supplied by the caller as a [`Duration`] on the session clock, so
//! the hold timer fires on the first `observe` or `poll` call at or after its
//! deadline rather than on a wall-clock callback.

use crate::{
    config::GestureConfig,
    gesture::{Gesture, GestureEvent},
};
use serde::Serialize;
use std::time::Duration;

/// A gesture that survived the hold and cooldown checks
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfirmedGesture {
    pub gesture: Gesture,
    pub confidence: f32,
    /// When the hold timer expired
    pub confirmed_at: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingGesture {
    gesture: Gesture,
    confidence: f32,
    since: Duration,
}

/// Observable debouncer state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    /// Nothing pending, not cooling down
    Idle,
    /// A candidate is being held
    Pending(Gesture),
    /// A confirmation happened less than the cooldown ago
    Cooldown,
}

/// Hold-time and cooldown state machine
#[derive(Debug, Clone)]
pub struct GestureDebouncer {
    cooldown: Duration,
    hold: Duration,
    display: Duration,
    confidence_threshold: f32,
    last_confirmed: Option<Duration>,
    pending: Option<PendingGesture>,
    displayed: Option<ConfirmedGesture>,
}

impl Default for GestureDebouncer {
    fn default() -> Self {
        Self::new(&GestureConfig::default())
    }
}

impl GestureDebouncer {
    /// Create a debouncer from configuration
    #[must_use]
    pub fn new(config: &GestureConfig) -> Self {
        Self {
            cooldown: Duration::from_millis(config.cooldown_ms),
            hold: Duration::from_millis(config.hold_ms),
            display: Duration::from_millis(config.display_ms),
            confidence_threshold: config.confidence_threshold,
            last_confirmed: None,
            pending: None,
            displayed: None,
        }
    }

    fn in_cooldown(&self, now: Duration) -> bool {
        self.last_confirmed
            .is_some_and(|last| now.saturating_sub(last) < self.cooldown)
    }

    /// Feed one classified gesture.
    ///
    /// Returns a confirmation if a previously pending gesture's hold time
    /// elapsed at or before this event.
    pub fn observe(&mut self, event: GestureEvent) -> Option<ConfirmedGesture> {
        let confirmed = self.poll(event.timestamp);

        if self.in_cooldown(event.timestamp) {
            log::trace!("Ignoring {} during cooldown", event.gesture);
            return confirmed;
        }
        if event.confidence < self.confidence_threshold {
            log::trace!(
                "Ignoring {} at confidence {:.2} below {:.2}",
                event.gesture,
                event.confidence,
                self.confidence_threshold
            );
            return confirmed;
        }

        match self.pending {
            Some(ref mut pending) if pending.gesture == event.gesture => {
                pending.confidence = event.confidence;
            }
            _ => {
                log::debug!("Holding {} from {:?}", event.gesture, event.timestamp);
                self.pending = Some(PendingGesture {
                    gesture: event.gesture,
                    confidence: event.confidence,
                    since: event.timestamp,
                });
            }
        }

        confirmed
    }

    /// Fire the hold timer if it has expired by `now`
    pub fn poll(&mut self, now: Duration) -> Option<ConfirmedGesture> {
        let pending = self.pending?;
        let deadline = pending.since + self.hold;
        if now < deadline {
            return None;
        }

        self.pending = None;
        self.last_confirmed = Some(deadline);
        let confirmed = ConfirmedGesture {
            gesture: pending.gesture,
            confidence: pending.confidence,
            confirmed_at: deadline,
        };
        self.displayed = Some(confirmed);
        log::info!(
            "Confirmed {} (confidence {:.2})",
            confirmed.gesture,
            confirmed.confidence
        );
        Some(confirmed)
    }

    /// The most recent confirmation while it is still on display
    #[must_use]
    pub fn displayed(&self, now: Duration) -> Option<&ConfirmedGesture> {
        self.displayed
            .as_ref()
            .filter(|shown| now.saturating_sub(shown.confirmed_at) < self.display)
    }

    /// Current state at `now`
    #[must_use]
    pub fn state(&self, now: Duration) -> DebounceState {
        if let Some(pending) = self.pending {
            DebounceState::Pending(pending.gesture)
        } else if self.in_cooldown(now) {
            DebounceState::Cooldown
        } else {
            DebounceState::Idle
        }
    }

    /// Time of the last confirmation
    #[must_use]
    pub const fn last_confirmed(&self) -> Option<Duration> {
        self.last_confirmed
    }

    /// Drop pending and displayed gestures and forget the cooldown
    pub fn reset(&mut self) {
        self.pending = None;
        self.displayed = None;
        self.last_confirmed = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(gesture: Gesture, confidence: f32, ms: u64) -> GestureEvent {
        GestureEvent {
            gesture,
            confidence,
            timestamp: Duration::from_millis(ms),
        }
    }

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_hold_then_confirm() {
        let mut debouncer = GestureDebouncer::default();

        assert!(debouncer.observe(event(Gesture::Point, 1.0, 0)).is_none());
        assert_eq!(debouncer.state(ms(100)), DebounceState::Pending(Gesture::Point));
        assert!(debouncer.poll(ms(799)).is_none());

        let confirmed = debouncer.poll(ms(850)).expect("hold elapsed");
        assert_eq!(confirmed.gesture, Gesture::Point);
        assert_eq!(confirmed.confirmed_at, ms(800));
        assert_eq!(debouncer.state(ms(900)), DebounceState::Cooldown);
        assert_eq!(debouncer.state(ms(2300)), DebounceState::Idle);
    }

    #[test]
    fn test_low_confidence_ignored() {
        let mut debouncer = GestureDebouncer::default();
        debouncer.observe(event(Gesture::OpenPalm, 0.79, 0));
        assert_eq!(debouncer.state(ms(0)), DebounceState::Idle);
        assert!(debouncer.poll(ms(5000)).is_none());
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let mut debouncer = GestureDebouncer::default();
        debouncer.observe(event(Gesture::Point, 0.8, 0));
        assert_eq!(debouncer.state(ms(0)), DebounceState::Pending(Gesture::Point));
    }

    #[test]
    fn test_different_gesture_restarts_hold() {
        let mut debouncer = GestureDebouncer::default();
        debouncer.observe(event(Gesture::Point, 1.0, 0));
        debouncer.observe(event(Gesture::Peace, 1.0, 500));

        assert!(debouncer.poll(ms(1000)).is_none());
        let confirmed = debouncer.poll(ms(1300)).unwrap();
        assert_eq!(confirmed.gesture, Gesture::Peace);
        assert_eq!(confirmed.confirmed_at, ms(1300));
    }

    #[test]
    fn test_same_gesture_keeps_timer() {
        let mut debouncer = GestureDebouncer::default();
        debouncer.observe(event(Gesture::Fist, 0.9, 0));
        debouncer.observe(event(Gesture::Fist, 0.95, 400));

        let confirmed = debouncer.observe(event(Gesture::Fist, 0.9, 800)).unwrap();
        assert_eq!(confirmed.confirmed_at, ms(800));
        // latest confidence is published
        assert_eq!(confirmed.confidence, 0.95);
    }

    #[test]
    fn test_display_window() {
        let mut debouncer = GestureDebouncer::default();
        debouncer.observe(event(Gesture::ThumbsUp, 1.0, 0));
        debouncer.poll(ms(800));

        assert!(debouncer.displayed(ms(1000)).is_some());
        assert!(debouncer.displayed(ms(1799)).is_some());
        assert!(debouncer.displayed(ms(1800)).is_none());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut debouncer = GestureDebouncer::default();
        debouncer.observe(event(Gesture::Point, 1.0, 0));
        debouncer.poll(ms(800));
        debouncer.observe(event(Gesture::Peace, 1.0, 3000));

        debouncer.reset();

        assert_eq!(debouncer.state(ms(3100)), DebounceState::Idle);
        assert!(debouncer.last_confirmed().is_none());
        assert!(debouncer.displayed(ms(3100)).is_none());
        assert!(debouncer.poll(ms(10_000)).is_none());
    }
}
