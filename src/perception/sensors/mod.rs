//! Sensor interfaces for the survey robot

use crate::common::types::{Voltage, Wheel};
use crate::error::Result;

/// One rangefinder reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSample {
    /// Distance in centimeters
    pub cm: i32,
    /// False when the device reported a reading it does not trust
    pub valid: bool,
}

impl RangeSample {
    pub fn valid(cm: i32) -> Self {
        RangeSample { cm, valid: true }
    }

    pub fn invalid(cm: i32) -> Self {
        RangeSample { cm, valid: false }
    }
}

/// Cumulative wheel rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderSample {
    pub degrees: i64,
}

impl EncoderSample {
    pub fn new(degrees: i64) -> Self {
        EncoderSample { degrees }
    }

    /// Rotation folded into [0, 360) for display
    pub fn display_degrees(&self) -> i64 {
        self.degrees.rem_euclid(360)
    }
}

/// Read surface of the robot hardware.
///
/// Any call may fail; the survey never retries within a tick.
pub trait SensorGateway {
    fn read_range(&mut self) -> Result<RangeSample>;

    fn read_encoder(&mut self, wheel: Wheel) -> Result<EncoderSample>;

    fn read_battery(&mut self) -> Result<Voltage>;
}
