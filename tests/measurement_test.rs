//! Body measurement and pose quality tests


use body_gesture_analysis::{
    config::MeasurementConfig,
    detection::FrameDimensions,
    landmarks::{Joint, Landmark, Pose},
    measurement::{Alignment, BodyMeasurementEstimator, MeasurementOutcome, NOT_AVAILABLE},
};
use proptest::prelude::*;
use test_helpers::standing_pose;

const FRAME: FrameDimensions = FrameDimensions {
    width: 640,
    height: 480,
};

#[test]
fn test_full_confidence_pose_is_deterministic() {
    let estimator = BodyMeasurementEstimator::default();
    let pose = standing_pose(1.0);

    let first = estimator.measure(&pose, FRAME);
    let second = estimator.measure(&pose, FRAME);
    assert_eq!(first, second);

    let m = first.measurement().unwrap();
    assert_eq!(m.raw.shoulder_width, Some(120.0));
    assert_eq!(m.raw.hip_width, Some(80.0));
    assert_eq!(m.raw.torso_length, Some(140.0));
    assert_eq!(m.raw.approximate_height, Some(420.0));
    assert_eq!(m.shoulders, "45\"");
    assert_eq!(m.height, "5'3\"");
    assert_eq!(m.confidence, 100);
}

#[test]
fn test_scale_follows_frame_height() {
    // 720px / 72in = 10 px per inch
    let m = BodyMeasurementEstimator::default()
        .measure(&standing_pose(1.0), FrameDimensions::new(960, 720))
        .measurement()
        .cloned()
        .unwrap();
    assert_eq!(m.height, "3'6\"");
    assert_eq!(m.shoulders, "30\"");
    assert_eq!(m.hips, "18\""); // 80 / 10 * 2.2 = 17.6
}

#[test]
fn test_tilted_hips_flagged() {
    let mut pose = standing_pose(0.9);
    pose.set_joint(Joint::LeftShoulder, Landmark::new(380.0, 100.0, 0.9));
    pose.set_joint(Joint::RightShoulder, Landmark::new(260.0, 100.0, 0.9));
    pose.set_joint(Joint::LeftHip, Landmark::new(360.0, 300.0, 0.9));
    pose.set_joint(Joint::RightHip, Landmark::new(280.0, 350.0, 0.9));

    let quality = BodyMeasurementEstimator::default().assess_quality(&pose);
    assert_eq!(quality.alignment, Alignment::Tilted);
    assert_eq!(serde_json::to_value(quality.alignment).unwrap(), "tilted");
}

#[test]
fn test_low_confidence_pose_recommendations() {
    let quality = BodyMeasurementEstimator::default().assess_quality(&standing_pose(0.55));

    assert_eq!(quality.average_confidence, 55);
    assert_eq!(quality.high_confidence_points, 0);
    assert!(quality
        .recommendations
        .contains(&"Improve lighting conditions".to_string()));
    assert!(quality
        .recommendations
        .contains(&"Ensure your full body is visible".to_string()));
}

#[test]
fn test_stricter_config_rejects_pose() {
    let config = MeasurementConfig {
        min_joint_score: 0.95,
        ..MeasurementConfig::default()
    };
    let outcome = BodyMeasurementEstimator::new(&config).measure(&standing_pose(0.9), FRAME);
    assert!(matches!(outcome, MeasurementOutcome::Insufficient(_)));
    assert_eq!(outcome.confidence(), 0);
}

#[test]
fn test_missing_nose_drops_height_only() {
    let mut pose = standing_pose(0.9);
    pose.set_joint(Joint::Nose, Landmark::missing());

    let m = BodyMeasurementEstimator::default()
        .measure(&pose, FRAME)
        .measurement()
        .cloned()
        .unwrap();
    assert_eq!(m.height, NOT_AVAILABLE);
    assert_ne!(m.chest, NOT_AVAILABLE);
}

#[test]
fn test_insufficient_pose_json_shape() {
    let outcome = BodyMeasurementEstimator::default().measure(&Pose::default(), FRAME);
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["error"], "Insufficient pose detection quality");
    assert_eq!(json["confidence"], 0);
    assert_eq!(json["suggestions"].as_array().map(Vec::len), Some(3));
}

const KEY_JOINTS: [Joint; 7] = [
    Joint::LeftShoulder,
    Joint::RightShoulder,
    Joint::LeftHip,
    Joint::RightHip,
    Joint::LeftAnkle,
    Joint::RightAnkle,
    Joint::Nose,
];

proptest! {
    #[test]
    fn prop_fewer_than_five_valid_joints_is_insufficient(
        scores in prop::array::uniform7(0.0f32..=1.0),
        xs in prop::array::uniform7(0.0f32..640.0),
        ys in prop::array::uniform7(0.0f32..480.0),
    ) {
        let mut pose = Pose::default();
        for (i, joint) in KEY_JOINTS.iter().enumerate() {
            pose.set_joint(*joint, Landmark::new(xs[i], ys[i], scores[i]));
        }
        let valid = scores.iter().filter(|&&s| s > 0.5).count();

        let outcome = BodyMeasurementEstimator::default().measure(&pose, FRAME);
        if valid < 5 {
            prop_assert!(matches!(outcome, MeasurementOutcome::Insufficient(_)));
        } else {
            prop_assert!(outcome.measurement().is_some());
        }
    }
}
