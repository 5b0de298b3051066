//! Seams to the external landmark models and video input.
//!
//! Pose and hand models run outside this crate (on device, in a browser, or
//! replayed from disk). They are reached through [`PoseDetector`] and
//! [`HandDetector`]; frames come from a [`FrameSource`].

use crate::{
    landmarks::{HandLandmarks, Pose},
    Result,
};
use std::time::Duration;

/// Width and height of a frame in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameDimensions {
    pub width: u32,
    pub height: u32,
}

impl FrameDimensions {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// One video frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Sequence number from the source
    pub index: u64,
    /// Capture time on the session clock
    pub timestamp: Duration,
    pub width: u32,
    pub height: u32,
    /// Packed RGB pixels; empty when the source only carries landmarks
    pub pixels: Vec<u8>,
}

impl Frame {
    /// A frame with no pixel payload
    #[must_use]
    pub const fn empty(index: u64, timestamp: Duration, width: u32, height: u32) -> Self {
        Self {
            index,
            timestamp,
            width,
            height,
            pixels: Vec::new(),
        }
    }

    #[must_use]
    pub const fn dimensions(&self) -> FrameDimensions {
        FrameDimensions::new(self.width, self.height)
    }
}

/// Video input
pub trait FrameSource {
    /// Acquire the device or file
    fn open(&mut self) -> Result<()>;

    /// Next frame, or `None` at end of stream
    fn next_frame(&mut self) -> Result<Option<Frame>>;

    /// Release the device or file
    fn close(&mut self);
}

/// Single-person body pose model
pub trait PoseDetector {
    /// Load model weights
    fn load(&mut self) -> Result<()>;

    /// Body landmarks in frame pixels, or `None` when nobody is visible
    fn estimate(&mut self, frame: &Frame) -> Result<Option<Pose>>;

    /// Free model resources
    fn release(&mut self);
}

/// Hand landmark model, up to two hands
pub trait HandDetector {
    /// Load model weights
    fn load(&mut self) -> Result<()>;

    /// Landmarks of each detected hand in normalized coordinates
    fn detect(&mut self, frame: &Frame) -> Result<Vec<HandLandmarks>>;

    /// Free model resources
    fn release(&mut self);
}

/// Raw detector output for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Detections {
    pub pose: Option<Pose>,
    pub hands: Vec<HandLandmarks>,
}

impl Detections {
    /// The hand used for gesture control
    #[must_use]
    pub fn primary_hand(&self) -> Option<&HandLandmarks> {
        self.hands.first()
    }
}
