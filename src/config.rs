//! Configuration management for the body gesture analysis pipeline

use crate::{
    actions::ActionMap,
    constants::{
        DEFAULT_DOUBLE_TAP_WINDOW_MS, DEFAULT_GESTURE_CONFIDENCE_THRESHOLD, DEFAULT_GESTURE_COOLDOWN_MS,
        DEFAULT_GESTURE_DISPLAY_MS, DEFAULT_GESTURE_HOLD_MS, DEFAULT_HIGH_CONFIDENCE_SCORE, DEFAULT_MAX_SWIPE_TIME_MS,
        DEFAULT_MIN_JOINT_SCORE, DEFAULT_MIN_SWIPE_DISTANCE, DEFAULT_MIN_VALID_JOINTS, DEFAULT_OVERLAY_MIN_SCORE,
        DEFAULT_TILT_THRESHOLD_PX,
    },
    filters::{create_filter, MeasurementSmoother},
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Gesture debounce timing
    pub gesture: GestureConfig,

    /// Body measurement thresholds
    pub measurement: MeasurementConfig,

    /// Measurement smoothing
    pub smoothing: SmoothingConfig,

    /// Touch gesture recognition
    pub touch: TouchConfig,

    /// Skeleton overlay
    pub overlay: OverlayConfig,

    /// Gesture to action table
    pub actions: ActionMap,
}

/// Gesture debounce parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Minimum time between two confirmed gestures in milliseconds
    pub cooldown_ms: u64,

    /// Time a gesture must be held before it is confirmed, in milliseconds
    pub hold_ms: u64,

    /// How long a confirmed gesture stays on display, in milliseconds
    pub display_ms: u64,

    /// Minimum classifier confidence for a gesture to count (0.0-1.0)
    pub confidence_threshold: f32,
}

/// Body measurement parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasurementConfig {
    /// Score a key joint must exceed to be used (0.0-1.0)
    pub min_joint_score: f32,

    /// Minimum number of valid key joints (out of 7)
    pub min_valid_joints: usize,

    /// Score counted as high confidence in the quality report (0.0-1.0)
    pub high_confidence_score: f32,

    /// Vertical shoulder or hip offset, in pixels, reported as tilted
    pub tilt_threshold_px: f64,
}

/// Measurement smoothing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Filter spec, e.g. `none`, `moving_average:5`, `exponential:0.3`
    pub filter: String,
}

/// Touch gesture parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TouchConfig {
    /// Travel along one axis needed for a swipe, in pixels
    pub min_swipe_distance: f64,

    /// Swipes must finish within this many milliseconds
    pub max_swipe_time_ms: u64,

    /// Two taps closer than this many milliseconds are a double tap
    pub double_tap_window_ms: u64,
}

/// Overlay parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Joints at or below this score are not drawn (0.0-1.0)
    pub min_score: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: DEFAULT_GESTURE_COOLDOWN_MS,
            hold_ms: DEFAULT_GESTURE_HOLD_MS,
            display_ms: DEFAULT_GESTURE_DISPLAY_MS,
            confidence_threshold: DEFAULT_GESTURE_CONFIDENCE_THRESHOLD,
        }
    }
}

impl Default for MeasurementConfig {
    fn default() -> Self {
        Self {
            min_joint_score: DEFAULT_MIN_JOINT_SCORE,
            min_valid_joints: DEFAULT_MIN_VALID_JOINTS,
            high_confidence_score: DEFAULT_HIGH_CONFIDENCE_SCORE,
            tilt_threshold_px: DEFAULT_TILT_THRESHOLD_PX,
        }
    }
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            filter: "none".to_string(),
        }
    }
}

impl Default for TouchConfig {
    fn default() -> Self {
        Self {
            min_swipe_distance: DEFAULT_MIN_SWIPE_DISTANCE,
            max_swipe_time_ms: DEFAULT_MAX_SWIPE_TIME_MS,
            double_tap_window_ms: DEFAULT_DOUBLE_TAP_WINDOW_MS,
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            min_score: DEFAULT_OVERLAY_MIN_SCORE,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        serde_yaml::from_str(&content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Create the measurement smoother, or `None` when smoothing is off
    pub fn create_smoother(&self) -> Result<Option<MeasurementSmoother>> {
        let spec = self.smoothing.filter.trim();
        if spec.eq_ignore_ascii_case("none") {
            return Ok(None);
        }
        MeasurementSmoother::new(spec).map(Some)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let unit = 0.0..=1.0;

        if !unit.contains(&self.gesture.confidence_threshold) {
            return Err(Error::ConfigError(
                "Gesture confidence threshold must be between 0.0 and 1.0".to_string(),
            ));
        }
        if self.gesture.hold_ms == 0 {
            return Err(Error::ConfigError("Gesture hold time must be greater than 0".to_string()));
        }

        if !unit.contains(&self.measurement.min_joint_score) {
            return Err(Error::ConfigError(
                "Minimum joint score must be between 0.0 and 1.0".to_string(),
            ));
        }
        if !unit.contains(&self.measurement.high_confidence_score) {
            return Err(Error::ConfigError(
                "High confidence score must be between 0.0 and 1.0".to_string(),
            ));
        }
        if self.measurement.min_valid_joints == 0 || self.measurement.min_valid_joints > 7 {
            return Err(Error::ConfigError(
                "Minimum valid joints must be between 1 and 7".to_string(),
            ));
        }
        if self.measurement.tilt_threshold_px.is_nan() || self.measurement.tilt_threshold_px < 0.0 {
            return Err(Error::ConfigError(
                "Tilt threshold must be a non-negative number of pixels".to_string(),
            ));
        }

        if self.touch.min_swipe_distance.is_nan() || self.touch.min_swipe_distance < 0.0 {
            return Err(Error::ConfigError(
                "Minimum swipe distance must be a non-negative number of pixels".to_string(),
            ));
        }

        if !unit.contains(&self.overlay.min_score) {
            return Err(Error::ConfigError(
                "Overlay minimum score must be between 0.0 and 1.0".to_string(),
            ));
        }

        create_filter(&self.smoothing.filter)
            .map_err(|e| Error::ConfigError(format!("Invalid smoothing filter: {e}")))?;

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Body Gesture Analysis Configuration

# Gesture debounce
gesture:
  cooldown_ms: 1500
  hold_ms: 800
  display_ms: 1000
  confidence_threshold: 0.8

# Body measurement
measurement:
  min_joint_score: 0.5
  min_valid_joints: 5
  high_confidence_score: 0.7
  tilt_threshold_px: 20.0

# Measurement smoothing: none, moving_average[:N], median[:N], exponential[:alpha]
smoothing:
  filter: "none"

# Touch gestures
touch:
  min_swipe_distance: 50.0
  max_swipe_time_ms: 300
  double_tap_window_ms: 300

# Skeleton overlay
overlay:
  min_score: 0.3

# Gesture to action table; remove a line to disable that gesture
actions:
  point: SELECT
  open_palm: NEXT
  fist: BACK
  peace: PHOTO
  thumbs_up: APPROVE
  thumbs_down: REJECT
"#;
