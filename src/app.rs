//! Replay application: drives a session over a recorded landmark stream.

use crate::{
    actions::{ActionDispatcher, ActionEvent},
    config::Config,
    error::Result,
    measurement::MeasurementOutcome,
    replay::{Recording, ReplayHandDetector, ReplayPoseDetector, ReplaySource, TouchRecord},
    session::{FrameAnalysis, FrameOutcome, MirrorSession, PoseAnalysis},
};
use log::{info, warn};
use serde::Serialize;
use std::{path::PathBuf, rc::Rc, time::Duration};

/// How results are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable log lines
    Text,
    /// One JSON object per line on stdout
    Json,
}

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Recording to replay
    pub recording: PathBuf,
    /// Report measurements every N analyzed frames (0 disables)
    pub measure_every: u64,
    /// Output format for actions and measurements
    pub output: OutputFormat,
}

/// Logs each action
#[derive(Debug, Default)]
pub struct LogDispatcher;

impl ActionDispatcher for LogDispatcher {
    fn dispatch(&mut self, event: &ActionEvent) {
        info!(
            "{} from {} at {} ms (confidence {:.2})",
            event.action,
            event.source,
            event.timestamp.as_millis(),
            event.confidence
        );
    }
}

/// Prints each action as a JSON line
#[derive(Debug, Default)]
pub struct JsonDispatcher;

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum JsonLine<'a> {
    Action(&'a ActionEvent),
    Measurement {
        frame: u64,
        #[serde(flatten)]
        analysis: &'a PoseAnalysis,
    },
    Summary(&'a RunSummary),
}

fn print_json(line: &JsonLine<'_>) {
    match serde_json::to_string(line) {
        Ok(json) => println!("{json}"),
        Err(e) => warn!("Failed to serialize output: {e}"),
    }
}

impl ActionDispatcher for JsonDispatcher {
    fn dispatch(&mut self, event: &ActionEvent) {
        print_json(&JsonLine::Action(event));
    }
}

/// Counters for one replay
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub frames: u64,
    pub analyzed: u64,
    pub skipped: u64,
    pub actions: u64,
}

/// Main application struct
pub struct MirrorApp {
    config: AppConfig,
    recording: Rc<Recording>,
    session: MirrorSession,
    dispatcher: Box<dyn ActionDispatcher>,
}

impl MirrorApp {
    /// Load the recording and build a session over it
    pub fn new(config: AppConfig, settings: &Config) -> Result<Self> {
        info!("Initializing smart mirror replay");

        let recording = Rc::new(Recording::from_file(&config.recording)?);
        let session = MirrorSession::new(
            settings,
            Box::new(ReplayPoseDetector::new(Rc::clone(&recording))),
            Box::new(ReplayHandDetector::new(Rc::clone(&recording))),
        )?
        .with_source(Box::new(ReplaySource::new(Rc::clone(&recording))));

        Ok(Self::with_session(config, recording, session))
    }

    /// Build the app around a prepared session; `recording` supplies the touch events
    #[must_use]
    pub fn with_session(config: AppConfig, recording: Rc<Recording>, session: MirrorSession) -> Self {
        let dispatcher: Box<dyn ActionDispatcher> = match config.output {
            OutputFormat::Text => Box::new(LogDispatcher),
            OutputFormat::Json => Box::new(JsonDispatcher),
        };

        Self {
            config,
            recording,
            session,
            dispatcher,
        }
    }

    #[must_use]
    pub const fn session(&self) -> &MirrorSession {
        &self.session
    }

    /// Run the main replay loop.
    ///
    /// The session is stopped and the frame source closed even when reading
    /// a frame fails.
    pub fn run(&mut self) -> Result<RunSummary> {
        info!("Starting replay");

        let mut summary = RunSummary::default();
        self.session.start()?;
        let replayed = self.replay_frames(&mut summary);
        self.session.stop();
        replayed?;

        info!(
            "Replay finished: {} frames, {} analyzed, {} actions",
            summary.frames, summary.analyzed, summary.actions
        );
        if self.config.output == OutputFormat::Json {
            print_json(&JsonLine::Summary(&summary));
        }
        Ok(summary)
    }

    fn replay_frames(&mut self, summary: &mut RunSummary) -> Result<()> {
        while let Some(frame) = self.session.next_frame()? {
            summary.frames += 1;
            summary.actions += self.replay_touches(frame.index, frame.timestamp);

            match self.session.analyze_frame(&frame, frame.timestamp) {
                FrameOutcome::Analyzed(analysis) => {
                    summary.analyzed += 1;
                    if let Some(event) = &analysis.action {
                        self.dispatcher.dispatch(event);
                        summary.actions += 1;
                    }
                    if self.config.measure_every > 0 && summary.analyzed % self.config.measure_every == 0 {
                        self.report(&analysis);
                    }
                }
                FrameOutcome::Skipped(reason) => {
                    summary.skipped += 1;
                    warn!("Frame {} skipped: {reason:?}", frame.index);
                }
            }
        }
        Ok(())
    }

    /// Feed a frame's recorded touch events; returns the number of actions
    fn replay_touches(&mut self, index: u64, now: Duration) -> u64 {
        let mut dispatched = 0;
        for touch in self.recording.touches(index) {
            let event = match touch {
                TouchRecord::Start { points } => self.session.touch_start(points, now),
                TouchRecord::Move { points } => {
                    if let Some(pinch) = self.session.touch_move(points) {
                        log::debug!("Touch {pinch}");
                    }
                    None
                }
                TouchRecord::End { point, remaining } => self.session.touch_end(*point, *remaining, now),
            };
            if let Some(event) = event {
                self.dispatcher.dispatch(&event);
                dispatched += 1;
            }
        }
        dispatched
    }

    fn report(&self, analysis: &FrameAnalysis) {
        let Some(pose) = &analysis.pose else {
            info!("Frame {}: no body detected", analysis.frame_index);
            return;
        };

        match self.config.output {
            OutputFormat::Json => print_json(&JsonLine::Measurement {
                frame: analysis.frame_index,
                analysis: pose,
            }),
            OutputFormat::Text => match &pose.measurement {
                MeasurementOutcome::Measured(m) => info!(
                    "Frame {}: shoulders {} chest {} waist {} hips {} height {} ({}%, {:?}, quality {}%)",
                    analysis.frame_index,
                    m.shoulders,
                    m.chest,
                    m.waist,
                    m.hips,
                    m.height,
                    m.confidence,
                    pose.quality.alignment,
                    pose.quality.average_confidence
                ),
                MeasurementOutcome::Insufficient(insufficient) => info!(
                    "Frame {}: {} ({})",
                    analysis.frame_index,
                    insufficient.error,
                    insufficient.suggestions.join("; ")
                ),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        detection::{Frame, FrameSource},
        landmarks::{hand, Landmark},
        replay::RecordedFrame,
        touch::TouchPoint,
        Error,
    };
    use std::cell::Cell;

    fn peace_sign() -> Vec<Landmark> {
        let mut points = vec![Landmark::new(0.5, 0.9, 1.0); 21];
        points[hand::THUMB_MCP] = Landmark::new(0.4, 0.8, 1.0);
        points[hand::THUMB_TIP] = Landmark::new(0.35, 0.85, 1.0);
        for (pip, tip, up) in [
            (hand::INDEX_PIP, hand::INDEX_TIP, true),
            (hand::MIDDLE_PIP, hand::MIDDLE_TIP, true),
            (hand::RING_PIP, hand::RING_TIP, false),
            (hand::PINKY_PIP, hand::PINKY_TIP, false),
        ] {
            points[pip] = Landmark::new(0.5, 0.8, 1.0);
            points[tip] = Landmark::new(0.5, if up { 0.6 } else { 0.8 }, 1.0);
        }
        points
    }

    /// 40 frames of a held peace sign with a left swipe over the first frames
    fn peace_recording() -> Recording {
        let mut frames: Vec<RecordedFrame> = (0..40)
            .map(|i| RecordedFrame {
                timestamp_ms: i * 33,
                pose: None,
                hands: vec![peace_sign()],
                touches: Vec::new(),
            })
            .collect();
        frames[0].touches.push(TouchRecord::Start {
            points: vec![TouchPoint::new(400.0, 200.0)],
        });
        frames[2].touches.push(TouchRecord::End {
            point: TouchPoint::new(250.0, 210.0),
            remaining: 0,
        });

        Recording {
            width: 640,
            height: 480,
            frames,
        }
    }

    fn app_config(recording: PathBuf) -> AppConfig {
        AppConfig {
            recording,
            measure_every: 10,
            output: OutputFormat::Text,
        }
    }

    /// Serves a few blank frames, then fails like an unplugged camera
    struct FailingSource {
        served: u64,
        fail_after: u64,
        closed: Rc<Cell<bool>>,
    }

    impl FrameSource for FailingSource {
        fn open(&mut self) -> Result<()> {
            Ok(())
        }

        fn next_frame(&mut self) -> Result<Option<Frame>> {
            if self.served == self.fail_after {
                return Err(Error::FrameSourceError("camera unplugged".to_string()));
            }
            let frame = Frame::empty(self.served, Duration::from_millis(self.served * 33), 640, 480);
            self.served += 1;
            Ok(Some(frame))
        }

        fn close(&mut self) {
            self.closed.set(true);
        }
    }

    #[test]
    fn test_run_counts_frames_and_actions() {
        let path = std::env::temp_dir().join(format!("mirror_app_{}_run.json", std::process::id()));
        peace_recording().to_file(&path).unwrap();
        let mut app = MirrorApp::new(app_config(path.clone()), &Config::default()).unwrap();
        let summary = app.run();
        std::fs::remove_file(&path).ok();

        // one swipe plus one held peace sign
        assert_eq!(
            summary.unwrap(),
            RunSummary {
                frames: 40,
                analyzed: 40,
                skipped: 0,
                actions: 2,
            }
        );
        assert!(!app.session().is_running());
    }

    #[test]
    fn test_source_failure_still_tears_down() {
        let recording = Rc::new(peace_recording());
        let closed = Rc::new(Cell::new(false));
        let session = MirrorSession::new(
            &Config::default(),
            Box::new(ReplayPoseDetector::new(Rc::clone(&recording))),
            Box::new(ReplayHandDetector::new(Rc::clone(&recording))),
        )
        .unwrap()
        .with_source(Box::new(FailingSource {
            served: 0,
            fail_after: 3,
            closed: Rc::clone(&closed),
        }));
        let mut app = MirrorApp::with_session(app_config(PathBuf::new()), recording, session);

        match app.run() {
            Err(Error::FrameSourceError(msg)) => assert!(msg.contains("unplugged")),
            other => panic!("Expected FrameSourceError, got {other:?}"),
        }
        assert!(closed.get());
        assert!(!app.session().is_running());
        assert!(!app.session().is_hand_loaded());
    }

    #[test]
    fn test_missing_recording() {
        let config = AppConfig {
            recording: PathBuf::from("/nonexistent/recording.json"),
            measure_every: 0,
            output: OutputFormat::Json,
        };
        assert!(MirrorApp::new(config, &Config::default()).is_err());
    }

    #[test]
    fn test_json_lines() {
        let summary = RunSummary {
            frames: 3,
            analyzed: 3,
            skipped: 0,
            actions: 1,
        };
        let json = serde_json::to_string(&JsonLine::Summary(&summary)).unwrap();
        assert_eq!(json, r#"{"type":"summary","frames":3,"analyzed":3,"skipped":0,"actions":1}"#);
    }
}
