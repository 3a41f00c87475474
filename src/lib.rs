pub mod behaviors;
pub mod common;
pub mod config;
pub mod control;
pub mod error;
pub mod lifecycle;
pub mod perception;
pub mod runtime;
pub mod sim;
pub mod telemetry;

use crate::behaviors::{HaltReason, Phase, SurveyReport, SurveyStateMachine};
use crate::common::types::Rgb;
use crate::config::SurveyConfig;
use crate::control::ActuatorGateway;
use crate::error::{FaultLog, FaultPolicy, Result};
use crate::lifecycle::LifecycleNode;
use crate::perception::sensors::SensorGateway;
use crate::runtime::{sleep_cancellable, CancelToken, Clock};
use crate::telemetry::Reporter;
use tracing::{info, warn};

pub use crate::error::SurveyError;

/// Everything the survey needs from a robot backend
pub trait Robot: SensorGateway + ActuatorGateway + LifecycleNode {}

impl<T: SensorGateway + ActuatorGateway + LifecycleNode + ?Sized> Robot for T {}

/// Core of the survey robot: owns the backend, the clock and the state machine
pub struct PerimeterCore<R: Robot, C: Clock> {
    machine: SurveyStateMachine,
    robot: R,
    clock: C,
}

impl<R: Robot, C: Clock> PerimeterCore<R, C> {
    /// Create a new core; fails if the configuration is inconsistent
    pub fn new(config: SurveyConfig, robot: R, clock: C) -> Result<Self> {
        Ok(PerimeterCore {
            machine: SurveyStateMachine::new(config)?,
            robot,
            clock,
        })
    }

    /// Bring the backend up and show the ready color
    pub fn init(&mut self) -> Result<()> {
        self.robot.on_configure()?;
        self.robot.on_activate()?;

        let mut faults = FaultLog::new(self.machine.config().survey.fault_policy);
        control::indicate(&mut self.robot, Rgb::BLUE, &mut faults)?;
        info!("Survey robot ready");
        Ok(())
    }

    /// Tick until the survey ends, the tick budget runs out or `cancel` fires
    pub fn run(
        &mut self,
        cancel: &CancelToken,
        reporter: &mut dyn Reporter,
    ) -> Result<SurveyReport> {
        let runtime = self.machine.config().runtime.clone();
        info!("Starting perimeter survey");

        loop {
            if cancel.is_cancelled() {
                info!("Survey cancelled");
                self.machine.halt(HaltReason::Cancelled);
                self.stop_quietly();
                break;
            }
            if let Some(max) = runtime.max_ticks {
                if self.machine.state().tick_count() >= max {
                    warn!("Tick limit of {} reached", max);
                    self.machine.halt(HaltReason::TickLimit);
                    self.stop_quietly();
                    break;
                }
            }

            let outcome = match self.machine.tick(&mut self.robot, &self.clock, cancel) {
                Ok(outcome) => outcome,
                Err(e) => {
                    self.stop_quietly();
                    return Err(e);
                }
            };
            reporter.report(&self.machine.snapshot());

            let halted = matches!(outcome.phase, Phase::Halted(_));
            if halted || (outcome.phase == Phase::Complete && runtime.exit_on_complete) {
                break;
            }

            // a cut-short sleep is handled at the top of the loop
            sleep_cancellable(&self.clock, outcome.delay, runtime.cancel_poll(), cancel);
        }

        let report = self.report();
        reporter.finish(&report);
        Ok(report)
    }

    /// Stop the wheels, clear the indicator and take the backend down
    pub fn shutdown(&mut self) -> Result<()> {
        let mut faults = FaultLog::new(FaultPolicy::SoftFail);
        control::stop(&mut self.robot, &mut faults)?;
        control::indicate(&mut self.robot, Rgb::OFF, &mut faults)?;
        self.robot.on_deactivate()?;
        self.robot.on_cleanup()?;
        info!("Survey robot shut down");
        Ok(())
    }

    pub fn report(&self) -> SurveyReport {
        let state = self.machine.state();
        SurveyReport {
            phase: state.phase(),
            ticks: state.tick_count(),
            sides: state.side_records().to_vec(),
            result: state.result(),
        }
    }

    pub fn machine(&self) -> &SurveyStateMachine {
        &self.machine
    }

    pub fn robot(&self) -> &R {
        &self.robot
    }

    fn stop_quietly(&mut self) {
        let mut faults = FaultLog::new(FaultPolicy::SoftFail);
        // soft policy never returns an error for hardware faults
        let _ = control::stop(&mut self.robot, &mut faults);
    }
}
