//! Constants used throughout the application
//!
//! The measurement multipliers and gesture confidence bonuses are empirical
//! tuning values. They have no biometric or statistical derivation and are
//! kept as-is until someone recalibrates them against ground truth.

/// Number of canonical body joints in a pose
pub const NUM_POSE_JOINTS: usize = 17;

/// Number of landmarks in a tracked hand
pub const NUM_HAND_LANDMARKS: usize = 21;

/// Maximum number of hands reported per frame
pub const MAX_TRACKED_HANDS: usize = 2;

/// A joint counts as detected for measurement above this score
pub const DEFAULT_MIN_JOINT_SCORE: f32 = 0.5;

/// Minimum number of valid key joints before measuring
pub const DEFAULT_MIN_VALID_JOINTS: usize = 5;

/// Score above which a joint counts as high confidence in quality reports
pub const DEFAULT_HIGH_CONFIDENCE_SCORE: f32 = 0.7;

/// Shoulder or hip vertical difference (pixels) that flags a tilted pose
pub const DEFAULT_TILT_THRESHOLD_PX: f64 = 20.0;

/// Average confidence below which lighting advice is given
pub const LOW_AVERAGE_CONFIDENCE: f64 = 0.6;

/// Fewer high-confidence joints than this triggers visibility advice
pub const MIN_HIGH_CONFIDENCE_POINTS: usize = 10;

/// Frame height is assumed to span this many inches
pub const FRAME_HEIGHT_INCHES: f64 = 72.0;

/// Shoulder width multiplier for the shoulders estimate
pub const SHOULDER_MULTIPLIER: f64 = 2.5;

/// Shoulder width multiplier for the chest estimate
pub const CHEST_MULTIPLIER: f64 = 2.8;

/// Hip width multiplier for the waist estimate
pub const WAIST_MULTIPLIER: f64 = 1.8;

/// Hip width multiplier for the hips estimate
pub const HIPS_MULTIPLIER: f64 = 2.2;

/// Inches per foot
pub const INCHES_PER_FOOT: i64 = 12;

/// Tip must be this much farther from the wrist than the PIP joint
pub const FINGER_EXTENSION_RATIO: f32 = 1.2;

/// Gesture confidence terms, in hundredths
pub const GESTURE_BASE_CONFIDENCE: u32 = 70;
pub const GESTURE_IN_RANGE_BONUS: u32 = 20;
pub const GESTURE_POINT_PEACE_BONUS: u32 = 10;
pub const GESTURE_THUMB_BONUS: u32 = 15;
pub const GESTURE_MAX_CONFIDENCE: u32 = 100;

/// Debounce defaults in milliseconds
pub const DEFAULT_GESTURE_COOLDOWN_MS: u64 = 1500;
pub const DEFAULT_GESTURE_HOLD_MS: u64 = 800;
pub const DEFAULT_GESTURE_DISPLAY_MS: u64 = 1000;

/// Minimum classifier confidence for a gesture to be considered
pub const DEFAULT_GESTURE_CONFIDENCE_THRESHOLD: f32 = 0.8;

/// Touch gesture defaults
pub const DEFAULT_MIN_SWIPE_DISTANCE: f64 = 50.0;
pub const DEFAULT_MAX_SWIPE_TIME_MS: u64 = 300;
pub const DEFAULT_DOUBLE_TAP_WINDOW_MS: u64 = 300;

/// Joints at or below this score are not drawn
pub const DEFAULT_OVERLAY_MIN_SCORE: f32 = 0.3;

/// Default filter window sizes and factors
pub const DEFAULT_MOVING_AVERAGE_WINDOW: usize = 5;
pub const DEFAULT_MEDIAN_WINDOW: usize = 5;
pub const DEFAULT_EXPONENTIAL_ALPHA: f64 = 0.5;

/// Exponential filter bounds
pub const EXPONENTIAL_ALPHA_MIN: f64 = 0.0;
pub const EXPONENTIAL_ALPHA_MAX: f64 = 1.0;

/// Numeric precision epsilon
pub const EPSILON: f64 = 1e-10;
