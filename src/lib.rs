//! Smart mirror body-pose and hand-gesture analysis.
//!
//! Per video frame, a pose model and a hand landmark model report
//! landmarks. This library turns them into:
//! - rough body measurements and a pose quality report
//! - discrete hand gestures (point, open palm, fist, peace, thumbs up/down)
//! - debounced UI actions with hold time and cooldown
//!
//! The models themselves live outside the crate behind the
//! [`detection::PoseDetector`] and [`detection::HandDetector`] traits.
//! Recorded model output can be replayed with the [`replay`] module.
//!
//! # Examples
//!
//! ## Classifying a Hand
//!
//! ```no_run
//! use body_gesture_analysis::{gesture::GestureClassifier, landmarks::Landmark};
//!
//! // 21 normalized hand landmarks from the hand model
//! let points = vec![Landmark::new(0.5, 0.5, 1.0); 21];
//!
//! if let Some(classified) = GestureClassifier::new().classify(&points) {
//!     println!("{} ({:.2})", classified.gesture, classified.confidence);
//! }
//! ```
//!
//! ## Measuring a Body
//!
//! ```no_run
//! use body_gesture_analysis::{
//!     detection::FrameDimensions,
//!     landmarks::{Joint, Landmark, Pose},
//!     measurement::{BodyMeasurementEstimator, MeasurementOutcome},
//! };
//!
//! let mut pose = Pose::default();
//! pose.set_joint(Joint::LeftShoulder, Landmark::new(380.0, 150.0, 0.9));
//! pose.set_joint(Joint::RightShoulder, Landmark::new(260.0, 150.0, 0.9));
//! // ... remaining joints from the pose model
//!
//! let estimator = BodyMeasurementEstimator::default();
//! match estimator.measure(&pose, FrameDimensions::new(640, 480)) {
//!     MeasurementOutcome::Measured(m) => println!("Shoulders {} Height {}", m.shoulders, m.height),
//!     MeasurementOutcome::Insufficient(i) => println!("{}: {:?}", i.error, i.suggestions),
//! }
//! ```
//!
//! ## Complete Pipeline Example
//!
//! ```no_run
//! use body_gesture_analysis::{
//!     config::Config,
//!     replay::{Recording, ReplayHandDetector, ReplayPoseDetector, ReplaySource},
//!     session::MirrorSession,
//! };
//! use std::rc::Rc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let recording = Rc::new(Recording::from_file("session.json")?);
//! let mut session = MirrorSession::new(
//!     &Config::default(),
//!     Box::new(ReplayPoseDetector::new(Rc::clone(&recording))),
//!     Box::new(ReplayHandDetector::new(Rc::clone(&recording))),
//! )?
//! .with_source(Box::new(ReplaySource::new(Rc::clone(&recording))));
//!
//! session.start()?;
//! while let Some(frame) = session.next_frame()? {
//!     let outcome = session.analyze_frame(&frame, frame.timestamp);
//!     if let Some(event) = outcome.analysis().and_then(|a| a.action) {
//!         println!("{} at {:?}", event.action, event.timestamp);
//!     }
//! }
//! session.stop();
//! # Ok(())
//! # }
//! ```

/// Landmark, joint and hand data model
pub mod landmarks;

/// Pure geometric predicates over landmarks
pub mod geometry;

/// Body measurement estimation and pose quality
pub mod measurement;

/// Signal filtering algorithms for smoothing measurements
pub mod filters;

/// Hand gesture classification
pub mod gesture;

/// Hold-time and cooldown debouncing of gestures
pub mod debounce;

/// Gesture to action mapping
pub mod actions;

/// Touch gesture recognition
pub mod touch;

/// Skeleton overlay geometry
pub mod overlay;

/// Detector and frame source traits
pub mod detection;

/// Analysis session lifecycle
pub mod session;

/// Recorded landmark streams
pub mod replay;

/// Rounding and display formatting helpers
pub mod utils;

/// Error types and result handling
pub mod error;

/// Main application module
pub mod app;

/// Constants used throughout the application
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
