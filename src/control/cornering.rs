//! Open-loop corner turns
//!
//! The pivot is timed, not measured: nothing confirms the achieved angle, so
//! heading error accumulates from corner to corner.

use super::{drive, pivot, stop, ActuatorGateway};
use crate::config::{CorneringConfig, SurveyConfig};
use crate::error::{FaultLog, Result};
use crate::runtime::{sleep_cancellable, CancelToken, Clock};
use std::time::Duration;

/// How a turn ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    Completed,
    Cancelled,
}

/// Executes the clearance, pivot and settle sequence
#[derive(Debug, Clone)]
pub struct CornerSequencer {
    config: CorneringConfig,
    clearance_speed_dps: i32,
    cancel_poll: Duration,
}

impl CornerSequencer {
    pub fn new(config: CorneringConfig, clearance_speed_dps: i32, cancel_poll: Duration) -> Self {
        CornerSequencer {
            config,
            clearance_speed_dps,
            cancel_poll,
        }
    }

    pub fn from_config(config: &SurveyConfig) -> Self {
        Self::new(
            config.cornering.clone(),
            config.proximity.nominal_speed_dps,
            config.runtime.cancel_poll(),
        )
    }

    /// Stop, optionally clear the corner, pivot for the fixed duration, stop and settle.
    ///
    /// Blocks for the whole sequence. Cancellation stops the wheels and returns early.
    pub fn execute<A, C>(
        &self,
        actuators: &mut A,
        clock: &C,
        cancel: &CancelToken,
        faults: &mut FaultLog,
    ) -> Result<TurnOutcome>
    where
        A: ActuatorGateway + ?Sized,
        C: Clock + ?Sized,
    {
        stop(actuators, faults)?;

        if !self.config.clearance().is_zero() {
            drive(actuators, self.clearance_speed_dps, faults)?;
            if !self.hold(clock, self.config.clearance(), cancel) {
                return self.abort(actuators, faults);
            }
            stop(actuators, faults)?;
        }

        tracing::debug!(
            "Pivoting on {} wheel at {} deg/s for {:?}",
            self.config.pivot_wheel,
            self.config.pivot_speed_dps,
            self.config.pivot_duration()
        );
        pivot(
            actuators,
            self.config.pivot_wheel,
            self.config.pivot_speed_dps,
            faults,
        )?;
        if !self.hold(clock, self.config.pivot_duration(), cancel) {
            return self.abort(actuators, faults);
        }
        stop(actuators, faults)?;

        if !self.hold(clock, self.config.settle(), cancel) {
            return Ok(TurnOutcome::Cancelled);
        }
        Ok(TurnOutcome::Completed)
    }

    pub fn config(&self) -> &CorneringConfig {
        &self.config
    }

    fn hold<C: Clock + ?Sized>(&self, clock: &C, duration: Duration, cancel: &CancelToken) -> bool {
        sleep_cancellable(clock, duration, self.cancel_poll, cancel)
    }

    fn abort<A: ActuatorGateway + ?Sized>(
        &self,
        actuators: &mut A,
        faults: &mut FaultLog,
    ) -> Result<TurnOutcome> {
        tracing::info!("Corner turn cancelled");
        stop(actuators, faults)?;
        Ok(TurnOutcome::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::Wheel;
    use crate::error::FaultPolicy;
    use crate::runtime::ManualClock;
    use crate::sim::{Actuation, ScriptedRobot};

    fn sequencer() -> CornerSequencer {
        CornerSequencer::from_config(&SurveyConfig::default())
    }

    #[test]
    fn pivots_on_one_wheel_then_stops() {
        let mut robot = ScriptedRobot::new();
        let clock = ManualClock::new();
        let mut faults = FaultLog::new(FaultPolicy::FailFast);

        let outcome = sequencer()
            .execute(&mut robot, &clock, &CancelToken::new(), &mut faults)
            .unwrap();

        assert_eq!(outcome, TurnOutcome::Completed);
        assert_eq!(
            robot.wheel_calls(),
            vec![
                (Wheel::Left, 0),
                (Wheel::Right, 0),
                (Wheel::Left, 180),
                (Wheel::Right, 180),
                (Wheel::Left, 0),
                (Wheel::Right, 0),
                (Wheel::Left, 0),
                (Wheel::Right, 180),
                (Wheel::Left, 0),
                (Wheel::Right, 0),
            ]
        );
        // clearance + pivot + settle
        assert_eq!(clock.now(), Duration::from_millis(2800 + 1760 + 500));
    }

    #[test]
    fn zero_clearance_skips_the_advance() {
        let mut config = SurveyConfig::default();
        config.cornering.clearance_ms = 0;
        let mut robot = ScriptedRobot::new();
        let clock = ManualClock::new();
        let mut faults = FaultLog::new(FaultPolicy::FailFast);

        CornerSequencer::from_config(&config)
            .execute(&mut robot, &clock, &CancelToken::new(), &mut faults)
            .unwrap();

        assert!(!robot.wheel_calls().contains(&(Wheel::Left, 180)));
        assert_eq!(clock.now(), Duration::from_millis(1760 + 500));
    }

    #[test]
    fn cancellation_stops_the_wheels() {
        let mut robot = ScriptedRobot::new();
        let clock = ManualClock::new();
        let cancel = CancelToken::new();
        cancel.cancel();
        let mut faults = FaultLog::new(FaultPolicy::SoftFail);

        let outcome = sequencer()
            .execute(&mut robot, &clock, &cancel, &mut faults)
            .unwrap();

        assert_eq!(outcome, TurnOutcome::Cancelled);
        assert_eq!(
            robot.calls().last(),
            Some(&Actuation::Wheel(Wheel::Right, 0))
        );
        assert_eq!(clock.now(), Duration::ZERO);
    }

    #[test]
    fn actuator_faults_are_soft_by_default() {
        let mut robot = ScriptedRobot::new().with_failing_actuators();
        let clock = ManualClock::new();
        let mut faults = FaultLog::new(FaultPolicy::SoftFail);

        let outcome = sequencer()
            .execute(&mut robot, &clock, &CancelToken::new(), &mut faults)
            .unwrap();
        assert_eq!(outcome, TurnOutcome::Completed);
        assert_eq!(faults.faults().len(), 10);
    }
}
