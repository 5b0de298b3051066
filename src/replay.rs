//! Recorded landmark streams.
//!
//! A recording is the JSON dump of what the pose and hand models reported
//! for each frame of a session, plus any touch events. Replaying it drives
//! a [`crate::session::MirrorSession`] exactly as the live models would.
//!
//! ```json
//! {
//!   "width": 640,
//!   "height": 480,
//!   "frames": [
//!     {
//!       "timestamp_ms": 0,
//!       "pose": { "keypoints": [{ "name": "nose", "x": 320, "y": 60, "score": 0.9 }] },
//!       "hands": [[{ "x": 0.5, "y": 0.9 }]],
//!       "touches": [{ "kind": "start", "points": [{ "x": 10, "y": 10 }] }]
//!     }
//!   ]
//! }
//! ```

use crate::{
    detection::{Frame, FrameSource, HandDetector, PoseDetector},
    landmarks::{HandLandmarks, Landmark, NamedKeypoint, Pose},
    touch::TouchPoint,
    Error, Result,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::{path::Path, rc::Rc, time::Duration};

/// Pose model output for one frame
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RecordedPose {
    pub keypoints: Vec<NamedKeypoint>,
}

/// A touch event captured alongside a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TouchRecord {
    Start { points: Vec<TouchPoint> },
    Move { points: Vec<TouchPoint> },
    End { point: TouchPoint, remaining: usize },
}

/// Everything recorded for one frame
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RecordedFrame {
    pub timestamp_ms: u64,
    #[serde(default)]
    pub pose: Option<RecordedPose>,
    #[serde(default)]
    pub hands: Vec<Vec<Landmark>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub touches: Vec<TouchRecord>,
}

impl RecordedFrame {
    #[must_use]
    pub const fn timestamp(&self) -> Duration {
        Duration::from_millis(self.timestamp_ms)
    }
}

/// A whole recorded session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    pub width: u32,
    pub height: u32,
    pub frames: Vec<RecordedFrame>,
}

impl Recording {
    /// Parse and validate a recording
    pub fn from_json(json: &str) -> Result<Self> {
        let recording: Self = serde_json::from_str(json)?;
        recording.validate()?;
        Ok(recording)
    }

    /// Load a recording from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::ReplayError(format!("Failed to read {}: {e}", path.display())))?;
        let recording = Self::from_json(&content)?;
        info!(
            "Loaded recording {} ({} frames, {}x{})",
            path.display(),
            recording.frames.len(),
            recording.width,
            recording.height
        );
        Ok(recording)
    }

    /// Write the recording as pretty JSON
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check frame size and timestamp order
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::ReplayError(format!(
                "Frame size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }

        if let Some(pair) = self
            .frames
            .windows(2)
            .find(|pair| pair[1].timestamp_ms < pair[0].timestamp_ms)
        {
            return Err(Error::ReplayError(format!(
                "Timestamps go backwards: {} ms after {} ms",
                pair[1].timestamp_ms, pair[0].timestamp_ms
            )));
        }

        Ok(())
    }

    fn frame(&self, index: u64) -> Option<&RecordedFrame> {
        usize::try_from(index).ok().and_then(|i| self.frames.get(i))
    }

    /// Touch events recorded with a frame
    #[must_use]
    pub fn touches(&self, index: u64) -> &[TouchRecord] {
        self.frame(index).map_or(&[], |frame| frame.touches.as_slice())
    }
}

/// Frame source that yields the recording's frames in order
pub struct ReplaySource {
    recording: Rc<Recording>,
    next: u64,
    open: bool,
}

impl ReplaySource {
    #[must_use]
    pub fn new(recording: Rc<Recording>) -> Self {
        Self {
            recording,
            next: 0,
            open: false,
        }
    }
}

impl FrameSource for ReplaySource {
    fn open(&mut self) -> Result<()> {
        self.next = 0;
        self.open = true;
        Ok(())
    }

    fn next_frame(&mut self) -> Result<Option<Frame>> {
        if !self.open {
            return Err(Error::FrameSourceError("Replay source is not open".to_string()));
        }

        let index = self.next;
        let Some(recorded) = self.recording.frame(index) else {
            debug!("End of recording after {index} frames");
            return Ok(None);
        };
        self.next += 1;

        Ok(Some(Frame::empty(
            index,
            recorded.timestamp(),
            self.recording.width,
            self.recording.height,
        )))
    }

    fn close(&mut self) {
        self.open = false;
    }
}

/// Pose detector that returns the recorded keypoints for each frame
pub struct ReplayPoseDetector {
    recording: Rc<Recording>,
}

impl ReplayPoseDetector {
    #[must_use]
    pub fn new(recording: Rc<Recording>) -> Self {
        Self { recording }
    }
}

impl PoseDetector for ReplayPoseDetector {
    fn load(&mut self) -> Result<()> {
        Ok(())
    }

    fn estimate(&mut self, frame: &Frame) -> Result<Option<Pose>> {
        let recorded = self
            .recording
            .frame(frame.index)
            .ok_or_else(|| Error::DetectorError(format!("No recorded pose for frame {}", frame.index)))?;
        Ok(recorded
            .pose
            .as_ref()
            .map(|pose| Pose::from_keypoints(&pose.keypoints)))
    }

    fn release(&mut self) {}
}

/// Hand detector that returns the recorded hands for each frame
pub struct ReplayHandDetector {
    recording: Rc<Recording>,
}

impl ReplayHandDetector {
    #[must_use]
    pub fn new(recording: Rc<Recording>) -> Self {
        Self { recording }
    }
}

impl HandDetector for ReplayHandDetector {
    fn load(&mut self) -> Result<()> {
        Ok(())
    }

    fn detect(&mut self, frame: &Frame) -> Result<Vec<HandLandmarks>> {
        let recorded = self
            .recording
            .frame(frame.index)
            .ok_or_else(|| Error::DetectorError(format!("No recorded hands for frame {}", frame.index)))?;
        Ok(recorded
            .hands
            .iter()
            .map(|points| HandLandmarks::new(points.clone()))
            .collect())
    }

    fn release(&mut self) {}
}
