//! Scripted robot for deterministic tests
//!
//! Range readings come from a script, encoders advance by a fixed step per
//! read, and every actuator command is logged.

use crate::common::types::{Rgb, Voltage, Wheel};
use crate::control::ActuatorGateway;
use crate::error::{ActuatorKind, Result, SensorKind, SurveyError};
use crate::lifecycle::{LifecycleNode, LifecycleNodeBase, State};
use crate::perception::sensors::{EncoderSample, RangeSample, SensorGateway};
use std::collections::VecDeque;

/// One logged actuator command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actuation {
    Wheel(Wheel, i32),
    Indicator(Rgb),
}

/// Robot double driven by a script of range readings
#[derive(Debug)]
pub struct ScriptedRobot {
    base: LifecycleNodeBase,
    ranges: VecDeque<Option<i32>>,
    last_range: i32,
    encoders: [i64; 2],
    encoder_step: i64,
    encoder_failures: VecDeque<bool>,
    battery: f64,
    fail_actuators: bool,
    calls: Vec<Actuation>,
    range_reads: usize,
}

impl ScriptedRobot {
    pub fn new() -> Self {
        ScriptedRobot {
            base: LifecycleNodeBase::new("scripted_robot"),
            ranges: VecDeque::new(),
            last_range: 0,
            encoders: [0, 0],
            encoder_step: 2,
            encoder_failures: VecDeque::new(),
            battery: 11.1,
            fail_actuators: false,
            calls: Vec::new(),
            range_reads: 0,
        }
    }

    /// Append readings to the range script. Once the script runs out the
    /// last successful reading repeats.
    pub fn with_ranges(mut self, ranges: impl IntoIterator<Item = i32>) -> Self {
        self.ranges.extend(ranges.into_iter().map(Some));
        self
    }

    /// Append a failing range read to the script
    pub fn with_range_failure(mut self) -> Self {
        self.ranges.push_back(None);
        self
    }

    /// Degrees each encoder advances per read (default 2, so every read tallies)
    pub fn with_encoder_step(mut self, step: i64) -> Self {
        self.encoder_step = step;
        self
    }

    /// Script encoder read outcomes; `true` fails the read
    pub fn with_encoder_failures(mut self, failures: impl IntoIterator<Item = bool>) -> Self {
        self.encoder_failures.extend(failures);
        self
    }

    pub fn with_battery(mut self, volts: f64) -> Self {
        self.battery = volts;
        self
    }

    pub fn with_failing_actuators(mut self) -> Self {
        self.fail_actuators = true;
        self
    }

    pub fn calls(&self) -> &[Actuation] {
        &self.calls
    }

    pub fn wheel_calls(&self) -> Vec<(Wheel, i32)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Actuation::Wheel(wheel, speed) => Some((*wheel, *speed)),
                Actuation::Indicator(_) => None,
            })
            .collect()
    }

    /// Last speed commanded to each wheel
    pub fn wheel_speeds(&self) -> (i32, i32) {
        let last = |w: Wheel| {
            self.wheel_calls()
                .iter()
                .rev()
                .find(|(wheel, _)| *wheel == w)
                .map_or(0, |(_, speed)| *speed)
        };
        (last(Wheel::Left), last(Wheel::Right))
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn range_reads(&self) -> usize {
        self.range_reads
    }

    pub fn lifecycle_state(&self) -> State {
        self.base.get_state()
    }

    fn wheel_index(wheel: Wheel) -> usize {
        match wheel {
            Wheel::Left => 0,
            Wheel::Right => 1,
        }
    }
}

impl Default for ScriptedRobot {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorGateway for ScriptedRobot {
    fn read_range(&mut self) -> Result<RangeSample> {
        self.range_reads += 1;
        match self.ranges.pop_front() {
            Some(Some(cm)) => {
                self.last_range = cm;
                Ok(RangeSample::valid(cm))
            }
            Some(None) => Err(SurveyError::sensor(SensorKind::Range, "scripted failure")),
            None => Ok(RangeSample::valid(self.last_range)),
        }
    }

    fn read_encoder(&mut self, wheel: Wheel) -> Result<EncoderSample> {
        if self.encoder_failures.pop_front().unwrap_or(false) {
            return Err(SurveyError::sensor(
                SensorKind::Encoder(wheel),
                "scripted failure",
            ));
        }
        let idx = Self::wheel_index(wheel);
        let sample = EncoderSample::new(self.encoders[idx]);
        self.encoders[idx] += self.encoder_step;
        Ok(sample)
    }

    fn read_battery(&mut self) -> Result<Voltage> {
        Ok(Voltage(self.battery))
    }
}

impl ActuatorGateway for ScriptedRobot {
    fn set_wheel_speed(&mut self, wheel: Wheel, deg_per_sec: i32) -> Result<()> {
        if self.fail_actuators {
            return Err(SurveyError::actuator(
                ActuatorKind::Wheel(wheel),
                "scripted failure",
            ));
        }
        self.calls.push(Actuation::Wheel(wheel, deg_per_sec));
        Ok(())
    }

    fn set_indicator(&mut self, color: Rgb) -> Result<()> {
        if self.fail_actuators {
            return Err(SurveyError::actuator(
                ActuatorKind::Indicator,
                "scripted failure",
            ));
        }
        self.calls.push(Actuation::Indicator(color));
        Ok(())
    }
}

impl LifecycleNode for ScriptedRobot {
    fn on_configure(&mut self) -> Result<()> {
        self.base.transition(State::Unconfigured, State::Inactive)
    }

    fn on_activate(&mut self) -> Result<()> {
        self.base.transition(State::Inactive, State::Active)
    }

    fn on_deactivate(&mut self) -> Result<()> {
        self.base.transition(State::Active, State::Inactive)
    }

    fn on_cleanup(&mut self) -> Result<()> {
        self.base.transition(State::Inactive, State::Unconfigured)
    }
}
