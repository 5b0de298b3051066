//! Signal filters for smoothing per-frame body measurements.
//!
//! Raw pixel measurements jitter from frame to frame as the pose model
//! re-localizes joints. Each measurement channel gets its own filter.

/// Moving average filter for simple smoothing
pub mod moving_average;

/// Median filter for outlier rejection
pub mod median;

/// Exponential filter for responsive smoothing
pub mod exponential;

use crate::{
    constants::{
        DEFAULT_EXPONENTIAL_ALPHA, DEFAULT_MEDIAN_WINDOW, DEFAULT_MOVING_AVERAGE_WINDOW, EXPONENTIAL_ALPHA_MAX,
        EXPONENTIAL_ALPHA_MIN,
    },
    measurement::RawMeasurements,
    Error, Result,
};

/// Trait for all scalar signal filters
pub trait SignalFilter: Send + Sync {
    /// Feed one sample and get the filtered value
    fn apply(&mut self, value: f64) -> f64;

    /// Reset filter state
    fn reset(&mut self);

    /// Get filter name
    fn name(&self) -> &str;
}

/// No-op filter that passes through values unchanged
pub struct NoFilter;

impl SignalFilter for NoFilter {
    fn apply(&mut self, value: f64) -> f64 {
        value
    }

    fn reset(&mut self) {}

    fn name(&self) -> &str {
        "NoFilter"
    }
}

fn parse_window(filter_type: &str, param: Option<&str>, default: usize) -> Result<usize> {
    let window = match param {
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| Error::FilterError(format!("Invalid window size '{raw}' for {filter_type}")))?,
        None => default,
    };
    if window == 0 {
        return Err(Error::FilterError(format!(
            "Window size must be greater than 0 for {filter_type}"
        )));
    }
    Ok(window)
}

fn parse_alpha(param: Option<&str>) -> Result<f64> {
    let alpha = match param {
        Some(raw) => raw
            .parse::<f64>()
            .map_err(|_| Error::FilterError(format!("Invalid alpha '{raw}' for exponential")))?,
        None => DEFAULT_EXPONENTIAL_ALPHA,
    };
    if alpha <= EXPONENTIAL_ALPHA_MIN || alpha > EXPONENTIAL_ALPHA_MAX {
        return Err(Error::FilterError(format!("Alpha must be in (0, 1], got {alpha}")));
    }
    Ok(alpha)
}

/// Create a filter from a spec string such as `moving_average:5`,
/// `exponential:0.3`, `median` or `none`
///
/// # Errors
///
/// Returns `FilterError` for unknown filter names or invalid parameters
pub fn create_filter(spec: &str) -> Result<Box<dyn SignalFilter>> {
    let lowered = spec.trim().to_lowercase();
    let mut parts = lowered.splitn(2, ':');
    let filter_type = parts.next().unwrap_or_default();
    let param = parts.next();

    match filter_type {
        "none" | "nofilter" => Ok(Box::new(NoFilter)),
        "moving_average" | "movingaverage" => Ok(Box::new(moving_average::MovingAverageFilter::new(
            parse_window(filter_type, param, DEFAULT_MOVING_AVERAGE_WINDOW)?,
        ))),
        "median" => Ok(Box::new(median::MedianFilter::new(parse_window(
            filter_type,
            param,
            DEFAULT_MEDIAN_WINDOW,
        )?))),
        "exponential" => Ok(Box::new(exponential::ExponentialFilter::new(parse_alpha(param)?))),
        _ => Err(Error::FilterError(format!("Unknown filter type: {spec}"))),
    }
}

/// One filter per raw measurement channel
pub struct MeasurementSmoother {
    shoulder_width: Box<dyn SignalFilter>,
    hip_width: Box<dyn SignalFilter>,
    torso_length: Box<dyn SignalFilter>,
    approximate_height: Box<dyn SignalFilter>,
}

impl MeasurementSmoother {
    /// Build a smoother with a fresh filter of the given spec per channel
    ///
    /// # Errors
    ///
    /// Returns `FilterError` if the spec is invalid
    pub fn new(spec: &str) -> Result<Self> {
        Ok(Self {
            shoulder_width: create_filter(spec)?,
            hip_width: create_filter(spec)?,
            torso_length: create_filter(spec)?,
            approximate_height: create_filter(spec)?,
        })
    }

    /// Smooth the channels present in `raw`; absent channels stay absent
    /// and do not advance their filter.
    pub fn apply(&mut self, raw: &RawMeasurements) -> RawMeasurements {
        RawMeasurements {
            shoulder_width: raw.shoulder_width.map(|v| self.shoulder_width.apply(v)),
            hip_width: raw.hip_width.map(|v| self.hip_width.apply(v)),
            torso_length: raw.torso_length.map(|v| self.torso_length.apply(v)),
            approximate_height: raw.approximate_height.map(|v| self.approximate_height.apply(v)),
        }
    }

    /// Reset all channels
    pub fn reset(&mut self) {
        self.shoulder_width.reset();
        self.hip_width.reset();
        self.torso_length.reset();
        self.approximate_height.reset();
    }

    /// Name of the underlying filter
    #[must_use]
    pub fn name(&self) -> &str {
        self.shoulder_width.name()
    }
}
