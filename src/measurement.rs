//! Body measurement estimation from pose landmarks.
//!
//! Pixel distances between key joints are converted to inches by assuming
//! the frame height spans six feet, then scaled by per-garment multipliers.
//! Both the scale assumption and the multipliers are empirical heuristics
//! (see [`crate::constants`]); the output is a rough sizing hint, not a
//! biometric measurement.

use crate::{
    config::MeasurementConfig,
    constants::{
        CHEST_MULTIPLIER, FRAME_HEIGHT_INCHES, HIPS_MULTIPLIER, LOW_AVERAGE_CONFIDENCE, MIN_HIGH_CONFIDENCE_POINTS,
        SHOULDER_MULTIPLIER, WAIST_MULTIPLIER,
    },
    detection::FrameDimensions,
    geometry::{distance, midpoint},
    landmarks::{Joint, Landmark, Pose},
    utils::{format_feet_inches, format_inches, to_percent},
};
use serde::Serialize;

/// Placeholder for an estimate whose joints were not confidently detected
pub const NOT_AVAILABLE: &str = "N/A";

/// Joints a measurement needs
const KEY_JOINTS: [Joint; 7] = [
    Joint::LeftShoulder,
    Joint::RightShoulder,
    Joint::LeftHip,
    Joint::RightHip,
    Joint::LeftAnkle,
    Joint::RightAnkle,
    Joint::Nose,
];

/// Error text for a pose that cannot be measured
pub const INSUFFICIENT_POSE_ERROR: &str = "Insufficient pose detection quality";

/// Guidance shown when a pose cannot be measured
pub const INSUFFICIENT_POSE_SUGGESTIONS: [&str; 3] = [
    "Stand directly facing the camera",
    "Ensure good lighting",
    "Keep full body visible",
];

/// Pixel distances measured on the frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RawMeasurements {
    /// Shoulder to shoulder
    pub shoulder_width: Option<f64>,
    /// Hip to hip
    pub hip_width: Option<f64>,
    /// Shoulder midpoint to hip midpoint
    pub torso_length: Option<f64>,
    /// Vertical distance from nose to the more confident ankle
    pub approximate_height: Option<f64>,
}

/// Human-scale estimate for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyMeasurement {
    pub shoulders: String,
    pub chest: String,
    pub waist: String,
    pub hips: String,
    pub height: String,
    /// Mean score of the valid key joints, in percent
    pub confidence: u32,
    /// The pixel distances the estimates were derived from
    pub raw: RawMeasurements,
}

fn scaled_inches(pixels: Option<f64>, pixels_per_inch: f64, multiplier: f64) -> String {
    pixels
        .and_then(|px| format_inches(px / pixels_per_inch * multiplier).ok())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

impl BodyMeasurement {
    /// Convert pixel distances to display estimates for a frame of the given height
    #[must_use]
    pub fn from_raw(raw: RawMeasurements, confidence: u32, frame_height: u32) -> Self {
        let pixels_per_inch = f64::from(frame_height) / FRAME_HEIGHT_INCHES;

        Self {
            shoulders: scaled_inches(raw.shoulder_width, pixels_per_inch, SHOULDER_MULTIPLIER),
            chest: scaled_inches(raw.shoulder_width, pixels_per_inch, CHEST_MULTIPLIER),
            waist: scaled_inches(raw.hip_width, pixels_per_inch, WAIST_MULTIPLIER),
            hips: scaled_inches(raw.hip_width, pixels_per_inch, HIPS_MULTIPLIER),
            height: raw
                .approximate_height
                .and_then(|px| format_feet_inches(px / pixels_per_inch).ok())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            confidence,
            raw,
        }
    }
}

/// Structured guidance for a pose that could not be measured
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsufficientPose {
    pub error: String,
    /// Always zero
    pub confidence: u32,
    pub suggestions: Vec<String>,
}

impl Default for InsufficientPose {
    fn default() -> Self {
        Self {
            error: INSUFFICIENT_POSE_ERROR.to_string(),
            confidence: 0,
            suggestions: INSUFFICIENT_POSE_SUGGESTIONS.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Result of measuring one pose
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MeasurementOutcome {
    Measured(BodyMeasurement),
    Insufficient(InsufficientPose),
}

impl MeasurementOutcome {
    /// The measurement, if the pose was good enough
    #[must_use]
    pub const fn measurement(&self) -> Option<&BodyMeasurement> {
        match self {
            Self::Measured(m) => Some(m),
            Self::Insufficient(_) => None,
        }
    }

    /// Confidence percentage; zero when insufficient
    #[must_use]
    pub const fn confidence(&self) -> u32 {
        match self {
            Self::Measured(m) => m.confidence,
            Self::Insufficient(i) => i.confidence,
        }
    }
}

/// Body alignment relative to the camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Good,
    Tilted,
}

/// Per-frame pose quality report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoseQuality {
    /// Mean score across all joints, in percent
    pub average_confidence: u32,
    pub high_confidence_points: usize,
    pub total_points: usize,
    pub alignment: Alignment,
    pub recommendations: Vec<String>,
}

/// Turns poses into measurements and quality reports
#[derive(Debug, Clone)]
pub struct BodyMeasurementEstimator {
    min_joint_score: f32,
    min_valid_joints: usize,
    high_confidence_score: f32,
    tilt_threshold_px: f64,
}

impl Default for BodyMeasurementEstimator {
    fn default() -> Self {
        Self::new(&MeasurementConfig::default())
    }
}

impl BodyMeasurementEstimator {
    /// Create an estimator from configuration
    #[must_use]
    pub fn new(config: &MeasurementConfig) -> Self {
        Self {
            min_joint_score: config.min_joint_score,
            min_valid_joints: config.min_valid_joints,
            high_confidence_score: config.high_confidence_score,
            tilt_threshold_px: config.tilt_threshold_px,
        }
    }

    fn valid(&self, pose: &Pose, joint: Joint) -> Option<Landmark> {
        let landmark = pose.joint(joint);
        landmark.is_confident(self.min_joint_score).then_some(*landmark)
    }

    /// Measure a pose, or explain why it cannot be measured
    #[must_use]
    pub fn measure(&self, pose: &Pose, frame: FrameDimensions) -> MeasurementOutcome {
        let valid_scores: Vec<f64> = KEY_JOINTS
            .iter()
            .filter_map(|&joint| self.valid(pose, joint))
            .map(|landmark| f64::from(landmark.score))
            .collect();

        if valid_scores.len() < self.min_valid_joints {
            log::debug!(
                "Only {} of {} key joints above {}, skipping measurement",
                valid_scores.len(),
                KEY_JOINTS.len(),
                self.min_joint_score
            );
            return MeasurementOutcome::Insufficient(InsufficientPose::default());
        }

        #[allow(clippy::cast_precision_loss)] // At most seven joints
        let mean = valid_scores.iter().sum::<f64>() / valid_scores.len() as f64;

        MeasurementOutcome::Measured(BodyMeasurement::from_raw(
            self.raw_measurements(pose),
            to_percent(mean),
            frame.height,
        ))
    }

    /// Pixel distances for every measurement whose joints are valid
    #[must_use]
    pub fn raw_measurements(&self, pose: &Pose) -> RawMeasurements {
        let left_shoulder = self.valid(pose, Joint::LeftShoulder);
        let right_shoulder = self.valid(pose, Joint::RightShoulder);
        let left_hip = self.valid(pose, Joint::LeftHip);
        let right_hip = self.valid(pose, Joint::RightHip);
        let nose = self.valid(pose, Joint::Nose);

        let shoulder_width = left_shoulder
            .zip(right_shoulder)
            .map(|(l, r)| f64::from(distance(&l, &r)));
        let hip_width = left_hip.zip(right_hip).map(|(l, r)| f64::from(distance(&l, &r)));

        let torso_length = match (left_shoulder, right_shoulder, left_hip, right_hip) {
            (Some(ls), Some(rs), Some(lh), Some(rh)) => {
                Some(f64::from(distance(&midpoint(&ls, &rs), &midpoint(&lh, &rh))))
            }
            _ => None,
        };

        let left_ankle = pose.joint(Joint::LeftAnkle);
        let right_ankle = pose.joint(Joint::RightAnkle);
        let ankle = if left_ankle.score > right_ankle.score {
            left_ankle
        } else {
            right_ankle
        };
        let approximate_height = nose
            .filter(|_| ankle.is_confident(self.min_joint_score))
            .map(|nose| f64::from((ankle.y - nose.y).abs()));

        RawMeasurements {
            shoulder_width,
            hip_width,
            torso_length,
            approximate_height,
        }
    }

    /// Rate how well the pose supports measurement and suggest fixes
    #[must_use]
    pub fn assess_quality(&self, pose: &Pose) -> PoseQuality {
        let joints = pose.joints();
        #[allow(clippy::cast_precision_loss)] // Seventeen joints
        let average = joints.iter().map(|j| f64::from(j.score)).sum::<f64>() / joints.len() as f64;
        let high_confidence_points = joints
            .iter()
            .filter(|j| j.is_confident(self.high_confidence_score))
            .count();

        let alignment = self.alignment(pose);

        PoseQuality {
            average_confidence: to_percent(average),
            high_confidence_points,
            total_points: joints.len(),
            alignment,
            recommendations: recommendations(average, alignment, high_confidence_points),
        }
    }

    fn alignment(&self, pose: &Pose) -> Alignment {
        let detected = |joint| {
            let landmark = pose.joint(joint);
            (landmark.score > 0.0).then_some(*landmark)
        };

        match (
            detected(Joint::LeftShoulder),
            detected(Joint::RightShoulder),
            detected(Joint::LeftHip),
            detected(Joint::RightHip),
        ) {
            (Some(ls), Some(rs), Some(lh), Some(rh)) => {
                let shoulder_slope = f64::from((ls.y - rs.y).abs());
                let hip_slope = f64::from((lh.y - rh.y).abs());
                if shoulder_slope > self.tilt_threshold_px || hip_slope > self.tilt_threshold_px {
                    Alignment::Tilted
                } else {
                    Alignment::Good
                }
            }
            _ => Alignment::Good,
        }
    }
}

fn recommendations(average: f64, alignment: Alignment, high_confidence_points: usize) -> Vec<String> {
    let mut advice = Vec::new();

    if average < LOW_AVERAGE_CONFIDENCE {
        advice.push("Improve lighting conditions");
        advice.push("Move closer to the camera");
    }
    if alignment == Alignment::Tilted {
        advice.push("Stand straight and face the camera directly");
    }
    if high_confidence_points < MIN_HIGH_CONFIDENCE_POINTS {
        advice.push("Ensure your full body is visible");
        advice.push("Remove any obstructions");
    }
    if advice.is_empty() {
        advice.push("Great pose! Measurements are accurate");
    }

    advice.into_iter().map(ToString::to_string).collect()
}
