//! Mapping of confirmed gestures to abstract UI actions.

use crate::{debounce::ConfirmedGesture, gesture::Gesture};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, time::Duration};

/// Actions the mirror UI can perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GestureAction {
    /// Select the current outfit or start a body analysis
    Select,
    /// Next outfit
    Next,
    /// Previous outfit
    Back,
    /// Capture a photo
    Photo,
    /// Like the current outfit
    Approve,
    /// Dislike the current outfit
    Reject,
    /// Toggle between front and back cameras
    SwitchCamera,
}

impl GestureAction {
    /// Upper-case action name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::Next => "NEXT",
            Self::Back => "BACK",
            Self::Photo => "PHOTO",
            Self::Approve => "APPROVE",
            Self::Reject => "REJECT",
            Self::SwitchCamera => "SWITCH_CAMERA",
        }
    }
}

impl fmt::Display for GestureAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Gesture to action table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionMap {
    table: BTreeMap<Gesture, GestureAction>,
}

impl Default for ActionMap {
    fn default() -> Self {
        Self {
            table: BTreeMap::from([
                (Gesture::Point, GestureAction::Select),
                (Gesture::OpenPalm, GestureAction::Next),
                (Gesture::Fist, GestureAction::Back),
                (Gesture::Peace, GestureAction::Photo),
                (Gesture::ThumbsUp, GestureAction::Approve),
                (Gesture::ThumbsDown, GestureAction::Reject),
            ]),
        }
    }
}

impl ActionMap {
    /// A table with no mappings
    #[must_use]
    pub fn empty() -> Self {
        Self { table: BTreeMap::new() }
    }

    /// Action for a gesture; `None` if unmapped
    #[must_use]
    pub fn action_for(&self, gesture: Gesture) -> Option<GestureAction> {
        self.table.get(&gesture).copied()
    }

    /// Map a gesture, replacing any previous mapping
    pub fn set(&mut self, gesture: Gesture, action: GestureAction) {
        self.table.insert(gesture, action);
    }

    /// Remove a gesture's mapping
    pub fn unset(&mut self, gesture: Gesture) -> Option<GestureAction> {
        self.table.remove(&gesture)
    }

    /// Build the event for a confirmation, if the gesture is mapped
    #[must_use]
    pub fn resolve(&self, confirmed: &ConfirmedGesture) -> Option<ActionEvent> {
        self.action_for(confirmed.gesture).map(|action| ActionEvent {
            source: ActionSource::Hand(confirmed.gesture),
            action,
            confidence: confirmed.confidence,
            timestamp: confirmed.confirmed_at,
        })
    }
}

/// What triggered an action
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionSource {
    /// A confirmed hand gesture
    Hand(Gesture),
    /// A touch gesture on the mirror screen
    Touch(crate::touch::TouchGesture),
}

impl fmt::Display for ActionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hand(gesture) => write!(f, "{gesture}"),
            Self::Touch(touch) => write!(f, "{touch}"),
        }
    }
}

/// An action ready for the application to perform
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActionEvent {
    pub source: ActionSource,
    pub action: GestureAction,
    pub confidence: f32,
    #[serde(serialize_with = "serialize_millis")]
    pub timestamp: Duration,
}

fn serialize_millis<S: serde::Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    let millis = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
    serializer.serialize_u64(millis)
}

/// Application-side consumer of actions
pub trait ActionDispatcher {
    /// Perform or record an action
    fn dispatch(&mut self, event: &ActionEvent);
}

/// Dispatcher that keeps every event, for tests and summaries
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    pub events: Vec<ActionEvent>,
}

impl ActionDispatcher for RecordingDispatcher {
    fn dispatch(&mut self, event: &ActionEvent) {
        self.events.push(*event);
    }
}
