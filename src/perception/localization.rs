//! Dead-reckoning side length estimation
//!
//! While the robot follows a wall it counts ticks whose encoder reading
//! satisfies a periodicity predicate (the tally) and ticks whose range
//! reading left the on-wall band (the error tally). When the side ends the
//! [`DistanceEstimator`] turns both counts into a [`SideRecord`].

use super::filters::MovingAverageFilter;
use super::sensors::EncoderSample;
use crate::config::SurveyConfig;
use std::ops::RangeInclusive;

/// Which way the robot drifted while following a side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriftDirection {
    /// Drifted toward the wall, correction is subtracted
    TowardWall,
    /// Drifted away from the wall, correction is added
    AwayFromWall,
}

/// One measured side
#[derive(Debug, Clone, PartialEq)]
pub struct SideRecord {
    pub index: usize,
    pub tally: u32,
    pub error_tally: u32,
    /// `tally * calibration_factor`
    pub raw_length: f64,
    pub correction: f64,
    /// `None` when no correction was applied
    pub direction: Option<DriftDirection>,
    pub corrected_length: f64,
    /// No tallied sample at all; the length is not a measurement
    pub degenerate: bool,
}

/// Per-side counters, reset on every entry into the following phase
#[derive(Debug, Clone)]
pub struct SideTally {
    tally: u32,
    error_tally: u32,
    period: i64,
    on_wall: RangeInclusive<i32>,
    recent: MovingAverageFilter,
}

impl SideTally {
    pub fn new(period: u32, on_wall: RangeInclusive<i32>, drift_window: usize) -> Self {
        SideTally {
            tally: 0,
            error_tally: 0,
            period: i64::from(period.max(1)),
            on_wall,
            recent: MovingAverageFilter::new(drift_window),
        }
    }

    pub fn from_config(config: &SurveyConfig) -> Self {
        let m = &config.survey;
        Self::new(
            m.tally_period,
            m.on_wall_min_cm..=m.on_wall_max_cm,
            m.drift_window,
        )
    }

    pub fn reset(&mut self) {
        self.tally = 0;
        self.error_tally = 0;
        self.recent.clear();
    }

    /// Count one following tick with fresh encoder and range samples
    pub fn observe(&mut self, encoder: EncoderSample, range_cm: i32) {
        if self.is_tally_tick(encoder) {
            self.tally += 1;
        }
        if !self.on_wall.contains(&range_cm) {
            self.error_tally += 1;
        }
        self.recent.push(f64::from(range_cm));
    }

    pub fn is_tally_tick(&self, encoder: EncoderSample) -> bool {
        encoder.degrees.rem_euclid(self.period) == 0
    }

    pub fn tally(&self) -> u32 {
        self.tally
    }

    pub fn error_tally(&self) -> u32 {
        self.error_tally
    }

    /// Average of the most recent following readings
    pub fn average_range(&self) -> Option<f64> {
        self.recent.average()
    }
}

/// Converts tallies into side lengths
#[derive(Debug, Clone)]
pub struct DistanceEstimator {
    calibration_factor: f64,
    setpoint_cm: f64,
}

impl DistanceEstimator {
    pub fn new(calibration_factor: f64, setpoint_cm: f64) -> Self {
        DistanceEstimator {
            calibration_factor,
            setpoint_cm,
        }
    }

    pub fn from_config(config: &SurveyConfig) -> Self {
        Self::new(config.survey.calibration_factor, config.wall_setpoint_cm())
    }

    /// Drift correction for a side.
    ///
    /// NOTE: the historical formula is `error_tally * calibration_factor / error_tally`,
    /// which collapses to `calibration_factor` for any non-zero error tally. It is kept
    /// as-is: the size of the error tally does not scale the correction.
    pub fn correction(&self, error_tally: u32) -> f64 {
        if error_tally == 0 {
            0.0
        } else {
            self.calibration_factor
        }
    }

    /// Readings below the setpoint mean the robot closed in on the wall.
    /// With no readings at all the robot is assumed to have drifted away.
    pub fn drift_direction(&self, average_range: Option<f64>) -> DriftDirection {
        match average_range {
            Some(avg) if avg < self.setpoint_cm => DriftDirection::TowardWall,
            _ => DriftDirection::AwayFromWall,
        }
    }

    /// Finalize the side from its counters
    pub fn estimate(&self, index: usize, counters: &SideTally) -> SideRecord {
        let tally = counters.tally();
        let error_tally = counters.error_tally();

        if tally == 0 {
            return SideRecord {
                index,
                tally,
                error_tally,
                raw_length: 0.0,
                correction: 0.0,
                direction: None,
                corrected_length: 0.0,
                degenerate: true,
            };
        }

        let raw_length = f64::from(tally) * self.calibration_factor;
        let correction = self.correction(error_tally);
        let (direction, corrected_length) = if correction == 0.0 {
            (None, raw_length)
        } else {
            match self.drift_direction(counters.average_range()) {
                DriftDirection::TowardWall => {
                    (Some(DriftDirection::TowardWall), raw_length - correction)
                }
                DriftDirection::AwayFromWall => {
                    (Some(DriftDirection::AwayFromWall), raw_length + correction)
                }
            }
        };

        SideRecord {
            index,
            tally,
            error_tally,
            raw_length,
            correction,
            direction,
            corrected_length,
            degenerate: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn counters() -> SideTally {
        SideTally::new(2, 20..=50, 5)
    }

    fn tally_with(ticks: u32, off_wall_range: Option<i32>) -> SideTally {
        let mut t = counters();
        for i in 0..ticks {
            t.observe(EncoderSample::new(i64::from(i) * 2), 35);
        }
        if let Some(range) = off_wall_range {
            // odd encoder value: error tally only
            t.observe(EncoderSample::new(1), range);
        }
        t
    }

    #[test]
    fn side_length_law() {
        let estimator = DistanceEstimator::new(1.11, 35.0);
        let record = estimator.estimate(0, &tally_with(180, None));
        assert_eq!(record.tally, 180);
        assert_eq!(record.correction, 0.0);
        assert_eq!(record.direction, None);
        assert_relative_eq!(record.corrected_length, 199.8, epsilon = 1e-9);
        assert!(!record.degenerate);
    }

    #[test]
    fn correction_ignores_error_tally_magnitude() {
        let estimator = DistanceEstimator::new(1.11, 35.0);
        for errors in [1, 2, 7, 1000] {
            assert_eq!(estimator.correction(errors), 1.11);
        }
        assert_eq!(estimator.correction(0), 0.0);
    }

    #[test]
    fn drift_toward_wall_subtracts() {
        let estimator = DistanceEstimator::new(1.0, 35.0);
        // 4 readings at 35 and one at 5: average 29 < 35
        let record = estimator.estimate(1, &tally_with(4, Some(5)));
        assert_eq!(record.error_tally, 1);
        assert_eq!(record.direction, Some(DriftDirection::TowardWall));
        assert_relative_eq!(record.corrected_length, 3.0);
    }

    #[test]
    fn drift_away_from_wall_adds() {
        let estimator = DistanceEstimator::new(1.0, 35.0);
        let record = estimator.estimate(1, &tally_with(4, Some(65)));
        assert_eq!(record.direction, Some(DriftDirection::AwayFromWall));
        assert_relative_eq!(record.corrected_length, 5.0);
    }

    #[test]
    fn zero_tally_is_degenerate_not_zero_length() {
        let estimator = DistanceEstimator::new(1.11, 35.0);
        let mut t = counters();
        t.observe(EncoderSample::new(3), 90);
        let record = estimator.estimate(0, &t);
        assert!(record.degenerate);
        assert_eq!(record.corrected_length, 0.0);
        assert_eq!(record.correction, 0.0);
    }

    #[test]
    fn periodicity_and_band_rules() {
        let mut t = counters();
        t.observe(EncoderSample::new(4), 20);
        t.observe(EncoderSample::new(5), 50);
        t.observe(EncoderSample::new(-2), 51);
        t.observe(EncoderSample::new(7), 19);
        assert_eq!(t.tally(), 2);
        assert_eq!(t.error_tally(), 2);

        t.reset();
        assert_eq!((t.tally(), t.error_tally()), (0, 0));
        assert_eq!(t.average_range(), None);
    }
}
