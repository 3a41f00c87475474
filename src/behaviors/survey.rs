//! Survey state machine
//!
//! Sequences approach, wall following, cornering and completion one tick at
//! a time: sense, decide, act. The caller sleeps for the returned delay.
//!
//! ```text
//! Starting -> Approaching -> Following -> Turning -> Creeping
//!     |                       ^  |  ^                   |  |
//!     |_______________________|  |  |___________________|  |
//!                                v                         v
//!                            Complete           Halted(CreepTimeout)
//! ```

use super::state::{HaltReason, Phase, SurveyResult, SurveySnapshot, SurveyState};
use crate::common::types::Voltage;
use crate::config::SurveyConfig;
use crate::control::controllers::ProximityController;
use crate::control::cornering::{CornerSequencer, TurnOutcome};
use crate::control::{self, ActuatorGateway, MotionCommand};
use crate::error::{FaultLog, FaultPolicy, Result, SurveyError};
use crate::perception::localization::{DistanceEstimator, SideTally};
use crate::perception::sensors::SensorGateway;
use crate::perception::{SensorFrame, SensorSampler};
use crate::runtime::{sleep_cancellable, CancelToken, Clock};
use std::time::Duration;
use tracing::{debug, info, warn};

/// What a tick did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    /// Phase after the tick
    pub phase: Phase,
    /// Last motion issued to the wheels
    pub command: MotionCommand,
    /// How long to wait before the next tick
    pub delay: Duration,
    /// Set only on the tick the survey completed
    pub completed: Option<SurveyResult>,
}

/// Drives one survey from first range reading to result
#[derive(Debug)]
pub struct SurveyStateMachine {
    config: SurveyConfig,
    controller: ProximityController,
    estimator: DistanceEstimator,
    sequencer: CornerSequencer,
    sampler: SensorSampler,
    state: SurveyState,
    last_faults: Vec<SurveyError>,
    battery_warned: bool,
}

impl SurveyStateMachine {
    pub fn new(config: SurveyConfig) -> Result<Self> {
        config.validate()?;

        Ok(SurveyStateMachine {
            controller: ProximityController::new(&config.proximity),
            estimator: DistanceEstimator::from_config(&config),
            sequencer: CornerSequencer::from_config(&config),
            sampler: SensorSampler::new(config.survey.tally_wheel),
            state: SurveyState::new(SideTally::from_config(&config)),
            last_faults: Vec::new(),
            battery_warned: false,
            config,
        })
    }

    pub fn state(&self) -> &SurveyState {
        &self.state
    }

    pub fn config(&self) -> &SurveyConfig {
        &self.config
    }

    /// Run one sense-decide-act cycle.
    ///
    /// A `Turning` tick blocks for the whole pivot and creep. A hardware error
    /// stops the wheels; a tick that failed while creeping resumes the creep
    /// rather than pivoting again.
    pub fn tick<R, C>(
        &mut self,
        robot: &mut R,
        clock: &C,
        cancel: &CancelToken,
    ) -> Result<TickOutcome>
    where
        R: SensorGateway + ActuatorGateway + ?Sized,
        C: Clock + ?Sized,
    {
        let mut faults = FaultLog::new(self.config.survey.fault_policy);
        self.state.tick_count += 1;

        let outcome = match self.state.phase {
            Phase::Turning | Phase::Creeping => self.turn(robot, clock, cancel, &mut faults),
            _ => self.step(robot, &mut faults),
        };

        if outcome.is_err() {
            let mut quiet = FaultLog::new(FaultPolicy::SoftFail);
            // soft policy never returns an error for hardware faults
            let _ = control::stop(robot, &mut quiet);
        }

        self.last_faults = faults.take();
        outcome
    }

    /// Force a terminal halt. A completed survey stays complete.
    pub fn halt(&mut self, reason: HaltReason) {
        if !self.state.phase.is_terminal() {
            self.set_phase(Phase::Halted(reason));
        }
    }

    /// Read-only view for telemetry
    pub fn snapshot(&self) -> SurveySnapshot {
        let battery = self.sampler.battery();
        SurveySnapshot {
            tick: self.state.tick_count,
            phase: self.state.phase,
            side_index: self.state.side_index(),
            side_lengths: self
                .state
                .side_records
                .iter()
                .map(|r| r.corrected_length)
                .collect(),
            tally: self.state.tally(),
            error_tally: self.state.error_tally(),
            range_cm: self.sampler.range_cm(),
            encoder: self.sampler.encoder(),
            battery,
            battery_low: self.is_battery_low(battery),
            faults: self.last_faults.clone(),
        }
    }

    fn step<R>(&mut self, robot: &mut R, faults: &mut FaultLog) -> Result<TickOutcome>
    where
        R: SensorGateway + ActuatorGateway + ?Sized,
    {
        let frame = self.sampler.sample(robot, faults)?;
        self.note_battery(&frame);

        if self.state.phase.is_terminal() {
            control::stop(robot, faults)?;
            let delay = self.controller.base_delay();
            return Ok(self.outcome(MotionCommand::Stop, delay, None));
        }

        let decision = self.controller.evaluate(frame.range_cm);
        let corner = self.controller.corner_threshold_cm();
        let mut completed = None;

        let command = match (self.state.phase, frame.range_cm) {
            (Phase::Starting, None) => MotionCommand::Stop,
            (Phase::Starting, Some(range)) if range >= corner => {
                self.set_phase(Phase::Approaching);
                self.approach_command()
            }
            (Phase::Starting, Some(_)) => {
                self.enter_following();
                decision.motion
            }
            (Phase::Approaching, Some(range)) if range < corner => {
                self.enter_following();
                decision.motion
            }
            (Phase::Approaching, _) => self.approach_command(),
            (Phase::Following, _) => match decision.motion {
                MotionCommand::CornerDetected => {
                    completed = self.finish_side();
                    MotionCommand::Stop
                }
                motion => {
                    if let (true, Some(encoder), Some(range)) =
                        (frame.is_fresh(), frame.encoder, frame.range_cm)
                    {
                        self.state.counters.observe(encoder, range);
                    }
                    motion
                }
            },
            // handled by turn() and the terminal early return
            (Phase::Turning | Phase::Creeping, _) => MotionCommand::Stop,
            (Phase::Complete | Phase::Halted(_), _) => MotionCommand::Stop,
        };

        control::apply(robot, command, faults)?;
        control::indicate(robot, decision.indicator, faults)?;

        Ok(self.outcome(command, decision.delay, completed))
    }

    fn turn<R, C>(
        &mut self,
        robot: &mut R,
        clock: &C,
        cancel: &CancelToken,
        faults: &mut FaultLog,
    ) -> Result<TickOutcome>
    where
        R: SensorGateway + ActuatorGateway + ?Sized,
        C: Clock + ?Sized,
    {
        if self.state.phase == Phase::Turning {
            if self.sequencer.execute(robot, clock, cancel, faults)? == TurnOutcome::Cancelled {
                self.halt(HaltReason::Cancelled);
                return Ok(self.outcome(MotionCommand::Stop, Duration::ZERO, None));
            }
            self.state.creep_steps = 0;
            self.set_phase(Phase::Creeping);
        }
        self.creep(robot, clock, cancel, faults)
    }

    /// Edge forward until the wall is back in range or the step budget is spent
    fn creep<R, C>(
        &mut self,
        robot: &mut R,
        clock: &C,
        cancel: &CancelToken,
        faults: &mut FaultLog,
    ) -> Result<TickOutcome>
    where
        R: SensorGateway + ActuatorGateway + ?Sized,
        C: Clock + ?Sized,
    {
        let cornering = self.sequencer.config().clone();
        let creep = MotionCommand::Forward(cornering.creep_speed_dps);
        let poll = self.config.runtime.cancel_poll();

        while self.state.creep_steps < cornering.creep_max_steps {
            self.state.creep_steps += 1;
            control::apply(robot, creep, faults)?;
            if !sleep_cancellable(clock, cornering.creep_step(), poll, cancel) {
                control::stop(robot, faults)?;
                self.halt(HaltReason::Cancelled);
                return Ok(self.outcome(MotionCommand::Stop, Duration::ZERO, None));
            }

            if let Some(range) = self.sampler.sample_range(robot, faults)? {
                if range < self.controller.corner_threshold_cm() {
                    debug!(
                        "Wall reacquired at {} cm after {} creep steps",
                        range, self.state.creep_steps
                    );
                    self.enter_following();
                    return Ok(self.outcome(creep, self.controller.delay(range), None));
                }
            }
        }

        warn!(
            "Wall not reacquired after {} creep steps, halting",
            cornering.creep_max_steps
        );
        control::stop(robot, faults)?;
        self.halt(HaltReason::CreepTimeout);
        let delay = self.controller.base_delay();
        Ok(self.outcome(MotionCommand::Stop, delay, None))
    }

    /// Close the current side; returns the result if that was the last one
    fn finish_side(&mut self) -> Option<SurveyResult> {
        let record = self
            .estimator
            .estimate(self.state.side_index(), &self.state.counters);

        if record.degenerate {
            warn!("Side {} finished without any tally", record.index);
        }
        info!(
            "Side {} measured: raw {:.2}, correction {:.2} ({:?}), length {:.2}",
            record.index,
            record.raw_length,
            record.correction,
            record.direction,
            record.corrected_length
        );
        self.state.side_records.push(record);

        if self.state.side_index() >= self.config.survey.target_side_count {
            Some(self.complete())
        } else {
            self.set_phase(Phase::Turning);
            None
        }
    }

    fn complete(&mut self) -> SurveyResult {
        let sides = &self.state.side_records;
        let result = SurveyResult::from_sides(&sides[0], &sides[1]);
        let note = if result.degenerate {
            " (degenerate)"
        } else {
            ""
        };
        info!(
            "Survey complete: perimeter {:.2}, area {:.2}{}",
            result.perimeter, result.area, note
        );
        self.state.result = Some(result);
        self.set_phase(Phase::Complete);
        result
    }

    fn enter_following(&mut self) {
        self.state.counters.reset();
        self.set_phase(Phase::Following);
    }

    fn approach_command(&self) -> MotionCommand {
        MotionCommand::Forward(self.config.proximity.nominal_speed_dps)
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.state.phase != phase {
            info!(
                "Phase {} -> {} (side {})",
                self.state.phase,
                phase,
                self.state.side_index()
            );
            self.state.phase = phase;
        }
    }

    fn note_battery(&mut self, frame: &SensorFrame) {
        self.state.battery_last = frame.battery;
        if self.is_battery_low(frame.battery) && !self.battery_warned {
            if let Some(volts) = frame.battery {
                warn!("Battery low: {}", volts);
            }
            self.battery_warned = true;
        }
    }

    fn is_battery_low(&self, battery: Option<Voltage>) -> bool {
        battery.map_or(false, |v| v.0 <= self.config.survey.low_battery_volts)
    }

    fn outcome(
        &self,
        command: MotionCommand,
        delay: Duration,
        completed: Option<SurveyResult>,
    ) -> TickOutcome {
        TickOutcome {
            phase: self.state.phase,
            command,
            delay,
            completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::Wheel;
    use crate::error::SensorKind;
    use crate::perception::localization::DriftDirection;
    use crate::runtime::ManualClock;
    use crate::sim::ScriptedRobot;
    use approx::assert_relative_eq;

    struct Rig {
        machine: SurveyStateMachine,
        robot: ScriptedRobot,
        clock: ManualClock,
        cancel: CancelToken,
    }

    impl Rig {
        fn new(robot: ScriptedRobot) -> Self {
            Self::with_config(SurveyConfig::default(), robot)
        }

        fn with_config(config: SurveyConfig, robot: ScriptedRobot) -> Self {
            Rig {
                machine: SurveyStateMachine::new(config).unwrap(),
                robot,
                clock: ManualClock::new(),
                cancel: CancelToken::new(),
            }
        }

        fn tick(&mut self) -> TickOutcome {
            self.machine
                .tick(&mut self.robot, &self.clock, &self.cancel)
                .unwrap()
        }

        fn ticks(&mut self, n: usize) -> TickOutcome {
            let mut last = None;
            for _ in 0..n {
                last = Some(self.tick());
            }
            last.unwrap()
        }

        fn phase(&self) -> Phase {
            self.machine.state().phase()
        }
    }

    #[test]
    fn starts_approaching_when_wall_out_of_range() {
        let mut rig = Rig::new(ScriptedRobot::new().with_ranges([90]));
        let outcome = rig.tick();
        assert_eq!(outcome.phase, Phase::Approaching);
        assert_eq!(outcome.command, MotionCommand::Forward(180));
        assert_eq!(rig.robot.wheel_speeds(), (180, 180));
    }

    #[test]
    fn starts_following_when_wall_in_range() {
        let mut rig = Rig::new(ScriptedRobot::new().with_ranges([40]));
        assert_eq!(rig.tick().phase, Phase::Following);
        assert_eq!(rig.machine.state().tally(), 0);
    }

    #[test]
    fn waits_for_a_valid_reading_before_choosing() {
        let mut rig = Rig::new(ScriptedRobot::new().with_range_failure().with_ranges([40]));
        let outcome = rig.tick();
        assert_eq!(outcome.phase, Phase::Starting);
        assert_eq!(outcome.command, MotionCommand::Stop);
        assert_eq!(rig.tick().phase, Phase::Following);
    }

    #[test]
    fn approach_drives_forward_until_range_below_threshold() {
        let mut rig = Rig::new(ScriptedRobot::new().with_ranges([90, 70, 69]));
        rig.tick();
        let outcome = rig.tick();
        assert_eq!(outcome.phase, Phase::Approaching);
        assert_eq!(outcome.command, MotionCommand::Forward(180));
        assert_eq!(rig.machine.state().tally(), 0);
        assert_eq!(rig.tick().phase, Phase::Following);
    }

    #[test]
    fn following_tallies_and_turns_only_at_threshold() {
        let mut rig = Rig::new(ScriptedRobot::new().with_ranges([40, 45, 69, 10, 70]));
        rig.tick();
        let outcome = rig.ticks(3);
        assert_eq!(outcome.phase, Phase::Following);
        // 10 cm is inside the stop band and outside the on-wall band
        assert_eq!(outcome.command, MotionCommand::Stop);
        assert_eq!(rig.machine.state().tally(), 3);
        assert_eq!(rig.machine.state().error_tally(), 2);

        let outcome = rig.tick();
        assert_eq!(outcome.phase, Phase::Turning);
        assert_eq!(outcome.command, MotionCommand::Stop);
        let sides = rig.machine.state().side_records();
        assert_eq!(sides.len(), 1);
        assert_eq!(sides[0].tally, 3);
        assert_eq!(rig.machine.state().side_index(), 1);
    }

    #[test]
    fn tally_requires_periodic_encoder_reading() {
        let mut rig = Rig::new(
            ScriptedRobot::new()
                .with_ranges([40, 40, 40, 40, 40])
                .with_encoder_step(1),
        );
        // entry tick reads 0, then 1, 2, 3, 4
        rig.ticks(5);
        assert_eq!(rig.machine.state().tally(), 2);
    }

    #[test]
    fn turn_creeps_back_to_the_wall_and_resets_counters() {
        let robot = ScriptedRobot::new().with_ranges([40, 45, 45, 75, 90, 90, 40]);
        let mut rig = Rig::new(robot);
        rig.ticks(4);
        assert_eq!(rig.machine.state().tally(), 2);
        rig.robot.clear_calls();

        let before = rig.clock.now();
        let outcome = rig.tick();
        assert_eq!(outcome.phase, Phase::Following);
        assert_eq!(outcome.command, MotionCommand::Forward(180));
        assert_eq!(rig.machine.state().tally(), 0);
        assert_eq!(rig.machine.state().error_tally(), 0);
        // clearance + pivot + settle + three creep steps
        assert_eq!(
            rig.clock.now() - before,
            Duration::from_millis(2800 + 1760 + 500 + 3 * 250)
        );
        assert!(rig.robot.wheel_calls().contains(&(Wheel::Right, 180)));
    }

    #[test]
    fn completes_after_target_sides_and_stays_complete() {
        let robot = ScriptedRobot::new().with_ranges([40, 45, 45, 75, 40, 45, 45, 80]);
        let mut rig = Rig::new(robot);
        rig.ticks(7);
        assert_eq!(rig.phase(), Phase::Following);

        let outcome = rig.tick();
        assert_eq!(outcome.phase, Phase::Complete);
        let result = outcome.completed.unwrap();
        assert_relative_eq!(result.perimeter, 2.0 * (2.22 + 2.22), epsilon = 1e-9);
        assert_relative_eq!(result.area, 2.22 * 2.22, epsilon = 1e-9);
        assert!(!result.degenerate);

        let sides = rig.machine.state().side_records().to_vec();
        let (tally, errors) = (rig.machine.state().tally(), rig.machine.state().error_tally());
        rig.robot.clear_calls();

        for _ in 0..5 {
            let outcome = rig.tick();
            assert_eq!(outcome.phase, Phase::Complete);
            assert_eq!(outcome.command, MotionCommand::Stop);
            assert_eq!(outcome.completed, None);
        }
        assert_eq!(rig.machine.state().side_records(), sides.as_slice());
        assert_eq!(rig.machine.state().side_index(), 2);
        assert_eq!(rig.machine.state().tally(), tally);
        assert_eq!(rig.machine.state().error_tally(), errors);
        assert!(rig.robot.wheel_calls().iter().all(|(_, speed)| *speed == 0));
        assert_eq!(rig.machine.state().result(), Some(result));
    }

    #[test]
    fn sensor_failure_skips_tally_and_keeps_going() {
        let mut rig = Rig::new(
            ScriptedRobot::new()
                .with_ranges([40, 45])
                .with_range_failure()
                .with_ranges([45]),
        );
        rig.ticks(2);
        assert_eq!(rig.machine.state().tally(), 1);

        let outcome = rig.tick();
        assert_eq!(outcome.phase, Phase::Following);
        assert_eq!(outcome.command, MotionCommand::Forward(180));
        assert_eq!(rig.machine.state().tally(), 1);
        assert_eq!(rig.machine.state().error_tally(), 0);
        let snapshot = rig.machine.snapshot();
        assert_eq!(snapshot.range_cm, Some(45));
        assert_eq!(snapshot.faults.len(), 1);

        rig.tick();
        assert_eq!(rig.machine.state().tally(), 2);
        assert!(rig.machine.snapshot().faults.is_empty());
    }

    #[test]
    fn encoder_failure_skips_tally() {
        let mut rig = Rig::new(
            ScriptedRobot::new()
                .with_ranges([40, 45, 45, 45])
                .with_encoder_failures([false, false, true, false]),
        );
        rig.ticks(4);
        assert_eq!(rig.machine.state().tally(), 2);
    }

    #[test]
    fn fail_fast_surfaces_sensor_errors() {
        let mut config = SurveyConfig::default();
        config.survey.fault_policy = FaultPolicy::FailFast;
        let mut rig = Rig::with_config(
            config,
            ScriptedRobot::new().with_ranges([40]).with_range_failure(),
        );
        rig.tick();

        let err = rig
            .machine
            .tick(&mut rig.robot, &rig.clock, &rig.cancel)
            .unwrap_err();
        assert!(matches!(
            err,
            SurveyError::SensorRead {
                sensor: SensorKind::Range,
                ..
            }
        ));
    }

    #[test]
    fn failed_creep_read_stops_wheels_and_resumes_without_pivoting() {
        let mut config = SurveyConfig::default();
        config.survey.fault_policy = FaultPolicy::FailFast;
        let mut rig = Rig::with_config(
            config,
            ScriptedRobot::new()
                .with_ranges([40, 45, 75, 90])
                .with_range_failure()
                .with_ranges([90, 40]),
        );
        rig.ticks(3);
        assert_eq!(rig.phase(), Phase::Turning);

        let err = rig
            .machine
            .tick(&mut rig.robot, &rig.clock, &rig.cancel)
            .unwrap_err();
        assert!(matches!(err, SurveyError::SensorRead { .. }));
        assert_eq!(rig.phase(), Phase::Creeping);
        assert_eq!(rig.machine.state().creep_steps(), 2);
        assert_eq!(rig.robot.wheel_speeds(), (0, 0));
        rig.robot.clear_calls();

        let before = rig.clock.now();
        let outcome = rig.tick();
        assert_eq!(outcome.phase, Phase::Following);
        // only creep commands, no second clearance or pivot
        assert!(rig
            .robot
            .wheel_calls()
            .iter()
            .all(|(_, speed)| *speed == 180));
        assert_eq!(rig.clock.now() - before, Duration::from_millis(2 * 250));
        assert_eq!(rig.machine.state().side_index(), 1);
    }

    #[test]
    fn creep_budget_spans_retried_ticks() {
        let mut config = SurveyConfig::default();
        config.survey.fault_policy = FaultPolicy::FailFast;
        config.cornering.creep_max_steps = 3;
        let mut rig = Rig::with_config(
            config,
            ScriptedRobot::new()
                .with_ranges([40, 45, 75, 90])
                .with_range_failure()
                .with_ranges([90]),
        );
        rig.ticks(3);
        assert!(rig
            .machine
            .tick(&mut rig.robot, &rig.clock, &rig.cancel)
            .is_err());

        let outcome = rig.tick();
        assert_eq!(outcome.phase, Phase::Halted(HaltReason::CreepTimeout));
        assert_eq!(rig.machine.state().creep_steps(), 3);
    }

    #[test]
    fn drift_direction_ignores_the_corner_reading() {
        // following readings 15, 30, 30 average 25, below the 35 cm midpoint;
        // counting the 200 cm corner reading would flip the direction
        let mut rig = Rig::new(ScriptedRobot::new().with_ranges([40, 15, 30, 30, 200]));
        rig.ticks(5);

        let side = &rig.machine.state().side_records()[0];
        assert_eq!(side.tally, 3);
        assert_eq!(side.error_tally, 1);
        assert_eq!(side.direction, Some(DriftDirection::TowardWall));
        assert_relative_eq!(side.corrected_length, 3.0 * 1.11 - 1.11, epsilon = 1e-9);
    }

    #[test]
    fn drift_direction_uses_only_the_recent_window() {
        let mut config = SurveyConfig::default();
        config.survey.drift_window = 2;
        let mut rig = Rig::with_config(
            config,
            ScriptedRobot::new().with_ranges([40, 15, 15, 15, 45, 45, 200]),
        );
        rig.ticks(7);

        // the whole side averages 27 cm, the last two readings 45 cm
        let side = &rig.machine.state().side_records()[0];
        assert_eq!(side.tally, 5);
        assert_eq!(side.error_tally, 3);
        assert_eq!(side.direction, Some(DriftDirection::AwayFromWall));
        assert_relative_eq!(side.corrected_length, 5.0 * 1.11 + 1.11, epsilon = 1e-9);
    }

    #[test]
    fn creep_gives_up_after_bounded_steps() {
        let mut rig = Rig::new(ScriptedRobot::new().with_ranges([40, 45, 75]));
        rig.ticks(3);
        assert_eq!(rig.phase(), Phase::Turning);

        let outcome = rig.tick();
        assert_eq!(outcome.phase, Phase::Halted(HaltReason::CreepTimeout));
        assert_eq!(rig.robot.range_reads(), 3 + 40);
        assert_eq!(rig.robot.wheel_speeds(), (0, 0));

        // halted is terminal
        let outcome = rig.tick();
        assert_eq!(outcome.phase, Phase::Halted(HaltReason::CreepTimeout));
        assert_eq!(outcome.command, MotionCommand::Stop);
    }

    #[test]
    fn cancellation_during_turn_halts() {
        let mut rig = Rig::new(ScriptedRobot::new().with_ranges([40, 45, 75]));
        rig.ticks(3);
        rig.cancel.cancel();
        let outcome = rig.tick();
        assert_eq!(outcome.phase, Phase::Halted(HaltReason::Cancelled));
        assert_eq!(rig.robot.wheel_speeds(), (0, 0));
    }

    #[test]
    fn zero_tally_side_is_flagged_degenerate() {
        let mut config = SurveyConfig::default();
        config.survey.tally_period = 1000;
        let mut rig = Rig::with_config(
            config,
            ScriptedRobot::new()
                .with_ranges([40, 45, 45, 75])
                .with_encoder_step(1),
        );
        rig.ticks(4);
        let side = &rig.machine.state().side_records()[0];
        assert!(side.degenerate);
        assert_eq!(side.corrected_length, 0.0);
    }

    #[test]
    fn low_battery_is_flagged_in_snapshot() {
        let mut rig = Rig::new(ScriptedRobot::new().with_ranges([40]).with_battery(8.5));
        rig.tick();
        let snapshot = rig.machine.snapshot();
        assert!(snapshot.battery_low);
        assert_eq!(rig.machine.state().battery_last().map(|v| v.0), Some(8.5));
    }
}
