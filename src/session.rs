//! Analysis session lifecycle.
//!
//! A [`MirrorSession`] owns the detector backends, the frame source and
//! every per-session piece of state: the debouncer, the measurement
//! smoother, the touch recognizer and a generation counter. At most one
//! inference is in flight at a time; a frame that arrives while one is
//! outstanding is dropped, not queued.
//!
//! The frame path is split in three steps so that the detector call can run
//! wherever the caller likes:
//!
//! ```text
//! begin_frame -> FrameTicket -> run_detectors -> Detections -> complete_frame
//! ```
//!
//! Every `start` and `stop` bumps the generation. A ticket issued under an
//! older generation is stale and its detections are discarded. Dropping a
//! ticket without completing it frees the inference slot.
//!
//! Camera and models are shared by the whole mirror, so only one session is
//! active per thread. Starting a session tears down the detectors and frame
//! source of the previously active one, which then reports itself stopped.

use crate::{
    actions::{ActionEvent, ActionMap},
    config::Config,
    constants::MAX_TRACKED_HANDS,
    debounce::{ConfirmedGesture, DebounceState, GestureDebouncer},
    detection::{Detections, Frame, FrameDimensions, FrameSource, HandDetector, PoseDetector},
    filters::MeasurementSmoother,
    gesture::{ClassifiedGesture, GestureClassifier},
    landmarks::Pose,
    measurement::{BodyMeasurement, BodyMeasurementEstimator, MeasurementOutcome, PoseQuality},
    overlay::{self, Overlay},
    touch::{TouchGesture, TouchGestureRecognizer, TouchPoint},
    Error, Result,
};
use log::{debug, info, warn};
use serde::Serialize;
use std::{
    cell::{Cell, RefCell},
    rc::{Rc, Weak},
    time::Duration,
};

thread_local! {
    static ACTIVE_SESSION: RefCell<Weak<RefCell<Backends>>> = RefCell::new(Weak::new());
}

/// Register `backends` as the active session and tear down the previous one
fn claim_active(backends: &Rc<RefCell<Backends>>) {
    let Ok(previous) = ACTIVE_SESSION.try_with(|active| active.replace(Rc::downgrade(backends))) else {
        return;
    };
    let Some(previous) = previous.upgrade() else {
        return;
    };
    if Rc::ptr_eq(&previous, backends) {
        return;
    }

    match previous.try_borrow_mut() {
        Ok(mut previous) => {
            info!("Tearing down the previously active session");
            previous.release();
            previous.superseded = true;
        }
        Err(_) => warn!("Previously active session is mid-frame and could not be torn down"),
    };
}

/// Clear the registry if `backends` is still the active session
fn release_active(backends: &Rc<RefCell<Backends>>) {
    let _ = ACTIVE_SESSION.try_with(|active| {
        let mut active = active.borrow_mut();
        if std::ptr::eq(active.as_ptr(), Rc::as_ptr(backends)) {
            *active = Weak::new();
        }
    });
}

/// The shared resources of a session
struct Backends {
    pose_detector: Box<dyn PoseDetector>,
    hand_detector: Box<dyn HandDetector>,
    source: Option<Box<dyn FrameSource>>,
    pose_loaded: bool,
    hand_loaded: bool,
    source_open: bool,
    superseded: bool,
}

impl Backends {
    fn open_source(&mut self) -> Result<()> {
        if let Some(source) = self.source.as_mut() {
            source.open()?;
            self.source_open = true;
        }
        Ok(())
    }

    fn load(&mut self) {
        self.pose_loaded = match self.pose_detector.load() {
            Ok(()) => true,
            Err(e) => {
                warn!("Pose detector failed to load, body analysis disabled: {e}");
                false
            }
        };
        self.hand_loaded = match self.hand_detector.load() {
            Ok(()) => true,
            Err(e) => {
                warn!("Hand detector failed to load, gesture control disabled: {e}");
                false
            }
        };
    }

    fn release(&mut self) {
        if self.pose_loaded {
            self.pose_detector.release();
            self.pose_loaded = false;
        }
        if self.hand_loaded {
            self.hand_detector.release();
            self.hand_loaded = false;
        }
        if self.source_open {
            if let Some(source) = self.source.as_mut() {
                source.close();
            }
            self.source_open = false;
        }
    }
}

/// Permission to analyze one frame.
///
/// Holds the session's inference slot until it is passed to
/// [`MirrorSession::complete_frame`] or dropped.
#[derive(Debug)]
pub struct FrameTicket {
    id: u64,
    generation: u64,
    frame_index: u64,
    dimensions: FrameDimensions,
    slot: Rc<Cell<Option<u64>>>,
}

impl FrameTicket {
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub const fn frame_index(&self) -> u64 {
        self.frame_index
    }
}

impl Drop for FrameTicket {
    fn drop(&mut self) {
        if self.slot.get() == Some(self.id) {
            debug!("Frame {} abandoned before completion", self.frame_index);
            self.slot.set(None);
        }
    }
}

/// Measurement and quality report for the detected body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoseAnalysis {
    pub measurement: MeasurementOutcome,
    pub quality: PoseQuality,
}

/// Everything derived from one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameAnalysis {
    pub frame_index: u64,
    /// `None` when no body was detected
    pub pose: Option<PoseAnalysis>,
    /// Raw classification of the primary hand on this frame
    pub gesture: Option<ClassifiedGesture>,
    /// Set on the frame where a held gesture was confirmed
    pub confirmed: Option<ConfirmedGesture>,
    /// The action for `confirmed`, if the gesture is mapped
    pub action: Option<ActionEvent>,
}

/// Why a frame produced no analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The session is not running
    Stopped,
    /// A previous frame is still being analyzed
    Busy,
    /// The session was restarted or stopped while the frame was in flight
    Stale,
}

/// Result of submitting a frame
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    Skipped(SkipReason),
    Analyzed(Box<FrameAnalysis>),
}

impl FrameOutcome {
    /// The analysis, if the frame was not skipped
    #[must_use]
    pub fn analysis(&self) -> Option<&FrameAnalysis> {
        match self {
            Self::Analyzed(analysis) => Some(analysis),
            Self::Skipped(_) => None,
        }
    }
}

/// One smart-mirror analysis session
pub struct MirrorSession {
    backends: Rc<RefCell<Backends>>,
    estimator: BodyMeasurementEstimator,
    classifier: GestureClassifier,
    debouncer: GestureDebouncer,
    actions: ActionMap,
    smoother: Option<MeasurementSmoother>,
    touch: TouchGestureRecognizer,
    overlay_min_score: f32,
    generation: u64,
    running: bool,
    in_flight: Rc<Cell<Option<u64>>>,
    next_ticket: u64,
}

impl MirrorSession {
    /// Create a stopped session around the given detectors
    ///
    /// # Errors
    ///
    /// Returns `FilterError` if the configured smoothing filter is invalid
    pub fn new(
        config: &Config,
        pose_detector: Box<dyn PoseDetector>,
        hand_detector: Box<dyn HandDetector>,
    ) -> Result<Self> {
        Ok(Self {
            backends: Rc::new(RefCell::new(Backends {
                pose_detector,
                hand_detector,
                source: None,
                pose_loaded: false,
                hand_loaded: false,
                source_open: false,
                superseded: false,
            })),
            estimator: BodyMeasurementEstimator::new(&config.measurement),
            classifier: GestureClassifier::new(),
            debouncer: GestureDebouncer::new(&config.gesture),
            actions: config.actions.clone(),
            smoother: config.create_smoother()?,
            touch: TouchGestureRecognizer::new(&config.touch),
            overlay_min_score: config.overlay.min_score,
            generation: 0,
            running: false,
            in_flight: Rc::new(Cell::new(None)),
            next_ticket: 0,
        })
    }

    /// Attach the frame source the session opens on `start` and closes on `stop`
    #[must_use]
    pub fn with_source(self, source: Box<dyn FrameSource>) -> Self {
        self.backends.borrow_mut().source = Some(source);
        self
    }

    /// Start analysis, tearing down a running session first.
    ///
    /// Any other active session is torn down as well. A detector that fails
    /// to load is left unloaded and its half of the analysis is skipped on
    /// every frame.
    ///
    /// # Errors
    ///
    /// Returns the frame source's error if it cannot be opened; the session
    /// stays stopped.
    pub fn start(&mut self) -> Result<()> {
        self.sync_active();
        if self.running {
            info!("Restarting running session");
            self.stop();
        }

        claim_active(&self.backends);
        self.backends.borrow_mut().superseded = false;
        let opened = self.backends.borrow_mut().open_source();
        if let Err(e) = opened {
            release_active(&self.backends);
            return Err(e);
        }

        self.generation += 1;
        self.running = true;

        let mut backends = self.backends.borrow_mut();
        backends.load();
        info!(
            "Session {} started (pose: {}, hands: {})",
            self.generation, backends.pose_loaded, backends.hand_loaded
        );
        Ok(())
    }

    /// Stop locally once another session has taken over
    fn sync_active(&mut self) {
        if self.running && self.backends.borrow().superseded {
            info!("Session {} superseded by a newer session", self.generation);
            self.stop();
        }
    }

    /// Read the next frame from the attached source.
    ///
    /// Returns `Ok(None)` at the end of the stream or once the session is stopped.
    ///
    /// # Errors
    ///
    /// Returns `FrameSourceError` if no source is attached, or the source's
    /// own read error.
    pub fn next_frame(&mut self) -> Result<Option<Frame>> {
        self.sync_active();
        if !self.running {
            return Ok(None);
        }
        match self.backends.borrow_mut().source.as_mut() {
            Some(source) => source.next_frame(),
            None => Err(Error::FrameSourceError("No frame source attached".to_string())),
        }
    }

    /// Claim the inference slot for a frame.
    ///
    /// Returns `None` when the session is stopped or another frame is in flight.
    pub fn begin_frame(&mut self, frame: &Frame) -> Option<FrameTicket> {
        self.sync_active();
        if !self.running {
            return None;
        }
        if self.in_flight.get().is_some() {
            debug!("Dropping frame {}: inference in flight", frame.index);
            return None;
        }

        self.next_ticket += 1;
        self.in_flight.set(Some(self.next_ticket));
        Some(FrameTicket {
            id: self.next_ticket,
            generation: self.generation,
            frame_index: frame.index,
            dimensions: frame.dimensions(),
            slot: Rc::clone(&self.in_flight),
        })
    }

    /// Run the loaded detectors on a frame.
    ///
    /// Detector errors are logged and read as "nothing detected".
    pub fn run_detectors(&mut self, ticket: &FrameTicket, frame: &Frame) -> Detections {
        let mut guard = self.backends.borrow_mut();
        let backends = &mut *guard;

        let pose = if backends.pose_loaded {
            backends.pose_detector.estimate(frame).unwrap_or_else(|e| {
                warn!("Pose detection failed on frame {}: {e}", ticket.frame_index);
                None
            })
        } else {
            None
        };

        let mut hands = if backends.hand_loaded {
            backends.hand_detector.detect(frame).unwrap_or_else(|e| {
                warn!("Hand detection failed on frame {}: {e}", ticket.frame_index);
                Vec::new()
            })
        } else {
            Vec::new()
        };
        hands.truncate(MAX_TRACKED_HANDS);

        Detections { pose, hands }
    }

    /// Finish a frame: measure the body, classify the primary hand and
    /// feed the debouncer.
    pub fn complete_frame(&mut self, ticket: FrameTicket, detections: Detections, now: Duration) -> FrameOutcome {
        self.sync_active();
        if ticket.generation != self.generation || !self.running {
            debug!(
                "Discarding frame {} from generation {} (current {})",
                ticket.frame_index, ticket.generation, self.generation
            );
            return FrameOutcome::Skipped(SkipReason::Stale);
        }
        self.in_flight.set(None);

        let pose = detections
            .pose
            .as_ref()
            .map(|pose| self.analyze_pose(pose, ticket.dimensions));

        let gesture = detections
            .primary_hand()
            .filter(|hand| hand.is_complete())
            .and_then(|hand| self.classifier.classify(&hand.points));

        let confirmed = match gesture {
            Some(classified) => self.debouncer.observe(classified.at(now)),
            None => self.debouncer.poll(now),
        };
        let action = self.resolve(confirmed.as_ref());

        FrameOutcome::Analyzed(Box::new(FrameAnalysis {
            frame_index: ticket.frame_index,
            pose,
            gesture,
            confirmed,
            action,
        }))
    }

    /// Begin, detect and complete in one call
    pub fn analyze_frame(&mut self, frame: &Frame, now: Duration) -> FrameOutcome {
        self.sync_active();
        if !self.running {
            return FrameOutcome::Skipped(SkipReason::Stopped);
        }
        let Some(ticket) = self.begin_frame(frame) else {
            return FrameOutcome::Skipped(SkipReason::Busy);
        };
        let detections = self.run_detectors(&ticket, frame);
        self.complete_frame(ticket, detections, now)
    }

    /// Fire the hold timer when no frames are arriving
    pub fn tick(&mut self, now: Duration) -> Option<ActionEvent> {
        self.sync_active();
        if !self.running {
            return None;
        }
        let confirmed = self.debouncer.poll(now);
        self.resolve(confirmed.as_ref())
    }

    fn resolve(&self, confirmed: Option<&ConfirmedGesture>) -> Option<ActionEvent> {
        let confirmed = confirmed?;
        let action = self.actions.resolve(confirmed);
        if action.is_none() {
            debug!("No action mapped for {}", confirmed.gesture);
        }
        action
    }

    fn analyze_pose(&mut self, pose: &Pose, dimensions: FrameDimensions) -> PoseAnalysis {
        let measurement = match (self.smoother.as_mut(), self.estimator.measure(pose, dimensions)) {
            (Some(smoother), MeasurementOutcome::Measured(measured)) => MeasurementOutcome::Measured(
                BodyMeasurement::from_raw(smoother.apply(&measured.raw), measured.confidence, dimensions.height),
            ),
            (_, outcome) => outcome,
        };

        PoseAnalysis {
            measurement,
            quality: self.estimator.assess_quality(pose),
        }
    }

    /// Skeleton overlay for a body, drawn with the configured score cutoff
    #[must_use]
    pub fn pose_overlay(&self, pose: &Pose) -> Overlay {
        overlay::pose_overlay(pose, self.overlay_min_score)
    }

    /// Fingers touched the screen
    pub fn touch_start(&mut self, touches: &[TouchPoint], now: Duration) -> Option<ActionEvent> {
        self.sync_active();
        if !self.running {
            return None;
        }
        self.touch
            .touch_start(touches, now)
            .and_then(|gesture| gesture.to_action_event(now))
    }

    /// Fingers moved; returns the pinch in progress, if any
    pub fn touch_move(&mut self, touches: &[TouchPoint]) -> Option<TouchGesture> {
        self.sync_active();
        if !self.running {
            return None;
        }
        self.touch.touch_move(touches)
    }

    /// A finger lifted
    pub fn touch_end(&mut self, lifted: TouchPoint, remaining: usize, now: Duration) -> Option<ActionEvent> {
        self.sync_active();
        if !self.running {
            return None;
        }
        self.touch
            .touch_end(lifted, remaining, now)
            .and_then(|gesture| gesture.to_action_event(now))
    }

    /// Stop analysis, release the detectors and close the frame source.
    ///
    /// Pending gestures are dropped and any in-flight frame becomes stale.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }

        self.running = false;
        self.in_flight.set(None);
        self.generation += 1;
        self.debouncer.reset();
        self.touch.reset();
        if let Some(smoother) = self.smoother.as_mut() {
            smoother.reset();
        }

        self.backends.borrow_mut().release();
        release_active(&self.backends);

        info!("Session stopped");
    }

    /// False once stopped or superseded by another session
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running && !self.backends.borrow().superseded
    }

    /// Current generation; bumped by every start and stop
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn is_pose_loaded(&self) -> bool {
        self.backends.borrow().pose_loaded
    }

    #[must_use]
    pub fn is_hand_loaded(&self) -> bool {
        self.backends.borrow().hand_loaded
    }

    /// True while a ticket is outstanding
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight.get().is_some()
    }

    #[must_use]
    pub fn debounce_state(&self, now: Duration) -> DebounceState {
        self.debouncer.state(now)
    }

    /// The confirmed gesture currently on display
    #[must_use]
    pub fn displayed_gesture(&self, now: Duration) -> Option<&ConfirmedGesture> {
        self.debouncer.displayed(now)
    }
}

impl Drop for MirrorSession {
    fn drop(&mut self) {
        self.stop();
    }
}
