//! Proximity controller
//!
//! Maps a range reading onto a motion command, an inter-tick delay and an
//! indicator color. All three come from configured bands: the delay is a
//! staircase rather than a continuous gain.

use super::MotionCommand;
use crate::common::types::Rgb;
use crate::config::{DelayStep, IndicatorBand, ProximityConfig};
use std::time::Duration;

/// Controller output for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProximityDecision {
    pub motion: MotionCommand,
    pub delay: Duration,
    pub indicator: Rgb,
}

/// Banded response to range readings
#[derive(Debug, Clone)]
pub struct ProximityController {
    stop_distance_cm: i32,
    corner_threshold_cm: i32,
    nominal_speed_dps: i32,
    base_delay: Duration,
    delay_steps: Vec<DelayStep>,
    indicator_bands: Vec<IndicatorBand>,
    indicator_fallback: Rgb,
}

impl ProximityController {
    /// Create a new controller
    pub fn new(config: &ProximityConfig) -> Self {
        ProximityController {
            stop_distance_cm: config.stop_distance_cm,
            corner_threshold_cm: config.corner_threshold_cm,
            nominal_speed_dps: config.nominal_speed_dps,
            base_delay: Duration::from_millis(config.base_delay_ms),
            delay_steps: config.delay_steps.clone(),
            indicator_bands: config.indicator_bands.clone(),
            indicator_fallback: config.indicator_fallback,
        }
    }

    /// Evaluate a range reading. With no valid reading yet the robot holds still.
    pub fn evaluate(&self, range_cm: Option<i32>) -> ProximityDecision {
        match range_cm {
            Some(range) => ProximityDecision {
                motion: self.motion(range),
                delay: self.delay(range),
                indicator: self.indicator(range),
            },
            None => ProximityDecision {
                motion: MotionCommand::Stop,
                delay: self.base_delay,
                indicator: self.indicator_fallback,
            },
        }
    }

    pub fn motion(&self, range_cm: i32) -> MotionCommand {
        if range_cm <= self.stop_distance_cm {
            MotionCommand::Stop
        } else if range_cm < self.corner_threshold_cm {
            MotionCommand::Forward(self.nominal_speed_dps)
        } else {
            MotionCommand::CornerDetected
        }
    }

    /// Base delay plus the last step whose threshold the range reaches
    pub fn delay(&self, range_cm: i32) -> Duration {
        let extra = self
            .delay_steps
            .iter()
            .take_while(|step| step.from_cm <= range_cm)
            .last()
            .map_or(0, |step| step.extra_ms);
        self.base_delay + Duration::from_millis(extra)
    }

    pub fn indicator(&self, range_cm: i32) -> Rgb {
        self.indicator_bands
            .iter()
            .find(|band| range_cm <= band.up_to_cm)
            .map_or(self.indicator_fallback, |band| band.color)
    }

    pub fn corner_threshold_cm(&self) -> i32 {
        self.corner_threshold_cm
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> ProximityController {
        ProximityController::new(&ProximityConfig::default())
    }

    #[test]
    fn motion_bands_include_their_edges() {
        let c = controller();
        assert_eq!(c.motion(-5), MotionCommand::Stop);
        assert_eq!(c.motion(10), MotionCommand::Stop);
        assert_eq!(c.motion(11), MotionCommand::Forward(180));
        assert_eq!(c.motion(69), MotionCommand::Forward(180));
        assert_eq!(c.motion(70), MotionCommand::CornerDetected);
        assert_eq!(c.motion(300), MotionCommand::CornerDetected);
    }

    #[test]
    fn delay_is_a_staircase() {
        let c = controller();
        assert_eq!(c.delay(5), Duration::from_millis(100));
        assert_eq!(c.delay(29), Duration::from_millis(100));
        assert_eq!(c.delay(30), Duration::from_millis(150));
        assert_eq!(c.delay(49), Duration::from_millis(150));
        assert_eq!(c.delay(50), Duration::from_millis(200));
        assert_eq!(c.delay(500), Duration::from_millis(200));
        assert_eq!(c.delay(-3), Duration::from_millis(100));
    }

    #[test]
    fn indicator_first_matching_band_wins() {
        let c = controller();
        assert_eq!(c.indicator(0), Rgb::ORANGE);
        assert_eq!(c.indicator(20), Rgb::ORANGE);
        assert_eq!(c.indicator(21), Rgb::GREEN);
        assert_eq!(c.indicator(50), Rgb::GREEN);
        assert_eq!(c.indicator(51), Rgb::YELLOW);
    }

    #[test]
    fn no_reading_holds_still() {
        let decision = controller().evaluate(None);
        assert_eq!(decision.motion, MotionCommand::Stop);
        assert_eq!(decision.delay, Duration::from_millis(100));
    }
}
