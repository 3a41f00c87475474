//! Simulated robots
//!
//! [`SimulatedRobot`] drives a differential-drive body around a rectangular
//! obstacle in a shared clock's time, so a whole survey can run without
//! hardware. [`ScriptedRobot`] replays canned readings for unit tests.

pub mod scripted;

pub use self::scripted::{Actuation, ScriptedRobot};

use crate::common::types::{Rgb, Voltage, Wheel};
use crate::control::ActuatorGateway;
use crate::error::{ActuatorKind, Result, SensorKind, SurveyError};
use crate::lifecycle::{LifecycleNode, LifecycleNodeBase, State};
use crate::perception::sensors::{EncoderSample, RangeSample, SensorGateway};
use crate::runtime::Clock;
use nalgebra::{Point2, Rotation2, Vector2};
use serde::Deserialize;
use std::time::Duration;

/// World and body parameters for the simulation
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    /// Lower-left corner of the obstacle (cm)
    pub obstacle_min: [f64; 2],
    /// Upper-right corner of the obstacle (cm)
    pub obstacle_max: [f64; 2],

    /// Start position (cm)
    pub start: [f64; 2],
    /// Start heading, CCW from +x (degrees)
    pub start_heading_deg: f64,

    pub wheel_diameter_cm: f64,
    /// Distance between the wheels (cm)
    pub wheel_base_cm: f64,

    /// Rangefinder direction relative to the heading, CCW (degrees)
    pub range_bearing_deg: f64,
    /// Reported when nothing is hit
    pub max_range_cm: f64,

    pub battery_start_volts: f64,
    pub battery_drain_per_sec: f64,

    /// Every nth range read comes back flagged invalid
    pub range_dropout_every: Option<u32>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            obstacle_min: [0.0, 0.0],
            obstacle_max: [120.0, 80.0],
            start: [-30.0, -35.0],
            start_heading_deg: 0.0,
            wheel_diameter_cm: 6.65,
            wheel_base_cm: 11.7,
            range_bearing_deg: 90.0,
            max_range_cm: 300.0,
            battery_start_volts: 11.1,
            battery_drain_per_sec: 0.002,
            range_dropout_every: None,
        }
    }
}

/// Axis-aligned rectangular obstacle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub min: Point2<f64>,
    pub max: Point2<f64>,
}

impl Obstacle {
    /// Distance along `direction` to the first face hit, within `max_range`.
    ///
    /// Slab test; `direction` must be a unit vector.
    pub fn ray_cast(
        &self,
        origin: &Point2<f64>,
        direction: &Vector2<f64>,
        max_range: f64,
    ) -> Option<f64> {
        let mut t_near = 0.0_f64;
        let mut t_far = max_range;

        for axis in 0..2 {
            let (o, d) = (origin[axis], direction[axis]);
            let (lo, hi) = (self.min[axis], self.max[axis]);
            if d.abs() < 1e-12 {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let (t1, t2) = ((lo - o) / d, (hi - o) / d);
            t_near = t_near.max(t1.min(t2));
            t_far = t_far.min(t1.max(t2));
            if t_near > t_far {
                return None;
            }
        }
        Some(t_near)
    }
}

/// Differential-drive robot circling a single obstacle
pub struct SimulatedRobot<C: Clock> {
    base: LifecycleNodeBase,
    config: SimConfig,
    obstacle: Obstacle,
    clock: C,
    position: Point2<f64>,
    heading: f64,
    /// Commanded speeds, left then right (deg/s)
    speeds: [i32; 2],
    /// Cumulative wheel rotation (deg)
    encoders: [f64; 2],
    indicator: Rgb,
    last_update: Duration,
    range_reads: u32,
}

impl<C: Clock> SimulatedRobot<C> {
    pub fn new(config: SimConfig, clock: C) -> Self {
        let obstacle = Obstacle {
            min: Point2::from(config.obstacle_min),
            max: Point2::from(config.obstacle_max),
        };
        let last_update = clock.now();
        SimulatedRobot {
            base: LifecycleNodeBase::new("simulated_robot"),
            position: Point2::from(config.start),
            heading: config.start_heading_deg.to_radians(),
            obstacle,
            clock,
            speeds: [0, 0],
            encoders: [0.0, 0.0],
            indicator: Rgb::OFF,
            last_update,
            range_reads: 0,
            config,
        }
    }

    pub fn position(&self) -> Point2<f64> {
        self.position
    }

    /// Heading in radians, CCW from +x
    pub fn heading(&self) -> f64 {
        self.heading
    }

    pub fn indicator(&self) -> Rgb {
        self.indicator
    }

    pub fn wheel_speeds(&self) -> (i32, i32) {
        (self.speeds[0], self.speeds[1])
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

    /// Surface speed of a wheel turning at `deg_per_sec` (cm/s)
    fn surface_speed(&self, deg_per_sec: i32) -> f64 {
        (deg_per_sec as f64).to_radians() * self.config.wheel_diameter_cm / 2.0
    }

    /// Integrate motion up to the clock's current time
    fn advance(&mut self) {
        let now = self.clock.now();
        let dt = now.saturating_sub(self.last_update).as_secs_f64();
        self.last_update = now;
        if dt <= 0.0 {
            return;
        }

        let v_left = self.surface_speed(self.speeds[0]);
        let v_right = self.surface_speed(self.speeds[1]);
        let linear = (v_left + v_right) / 2.0;
        let angular = (v_right - v_left) / self.config.wheel_base_cm;

        if angular.abs() < 1e-9 {
            let forward = Rotation2::new(self.heading) * Vector2::x();
            self.position += forward * linear * dt;
        } else {
            let radius = linear / angular;
            let next = self.heading + angular * dt;
            self.position += Vector2::new(
                radius * (next.sin() - self.heading.sin()),
                radius * (self.heading.cos() - next.cos()),
            );
            self.heading = next;
        }

        for (encoder, speed) in self.encoders.iter_mut().zip(self.speeds) {
            *encoder += speed as f64 * dt;
        }
    }

    fn ensure_active_for_read(&self, sensor: SensorKind) -> Result<()> {
        if self.base.is_active() {
            Ok(())
        } else {
            Err(SurveyError::sensor(sensor, "robot not active"))
        }
    }

    fn ensure_active_for_command(&self, actuator: ActuatorKind) -> Result<()> {
        if self.base.is_active() {
            Ok(())
        } else {
            Err(SurveyError::actuator(actuator, "robot not active"))
        }
    }
}

impl<C: Clock> SensorGateway for SimulatedRobot<C> {
    fn read_range(&mut self) -> Result<RangeSample> {
        self.ensure_active_for_read(SensorKind::Range)?;
        self.advance();
        self.range_reads += 1;

        let bearing = Rotation2::new(self.heading + self.config.range_bearing_deg.to_radians());
        let direction = bearing * Vector2::x();
        let distance = self
            .obstacle
            .ray_cast(&self.position, &direction, self.config.max_range_cm)
            .unwrap_or(self.config.max_range_cm);
        let cm = distance.round() as i32;

        match self.config.range_dropout_every {
            Some(n) if n > 0 && self.range_reads % n == 0 => Ok(RangeSample::invalid(cm)),
            _ => Ok(RangeSample::valid(cm)),
        }
    }

    fn read_encoder(&mut self, wheel: Wheel) -> Result<EncoderSample> {
        self.ensure_active_for_read(SensorKind::Encoder(wheel))?;
        self.advance();
        let degrees = self.encoders[Self::wheel_index(wheel)].round() as i64;
        Ok(EncoderSample::new(degrees))
    }

    fn read_battery(&mut self) -> Result<Voltage> {
        self.ensure_active_for_read(SensorKind::Battery)?;
        let elapsed = self.clock.now().as_secs_f64();
        let volts = self.config.battery_start_volts - self.config.battery_drain_per_sec * elapsed;
        Ok(Voltage(volts.max(0.0)))
    }
}

impl<C: Clock> ActuatorGateway for SimulatedRobot<C> {
    fn set_wheel_speed(&mut self, wheel: Wheel, deg_per_sec: i32) -> Result<()> {
        self.ensure_active_for_command(ActuatorKind::Wheel(wheel))?;
        self.advance();
        self.speeds[Self::wheel_index(wheel)] = deg_per_sec;
        Ok(())
    }

    fn set_indicator(&mut self, color: Rgb) -> Result<()> {
        self.ensure_active_for_command(ActuatorKind::Indicator)?;
        self.indicator = color;
        Ok(())
    }
}

impl<C: Clock> LifecycleNode for SimulatedRobot<C> {
    fn on_configure(&mut self) -> Result<()> {
        self.base.transition(State::Unconfigured, State::Inactive)?;
        tracing::info!(
            "Simulated obstacle {:.0}x{:.0} cm, start ({:.0}, {:.0})",
            self.obstacle.max.x - self.obstacle.min.x,
            self.obstacle.max.y - self.obstacle.min.y,
            self.position.x,
            self.position.y
        );
        Ok(())
    }

    fn on_activate(&mut self) -> Result<()> {
        self.base.transition(State::Inactive, State::Active)?;
        self.last_update = self.clock.now();
        self.indicator = Rgb::BLUE;
        Ok(())
    }

    fn on_deactivate(&mut self) -> Result<()> {
        self.base.transition(State::Active, State::Inactive)?;
        self.advance();
        self.speeds = [0, 0];
        Ok(())
    }

    fn on_cleanup(&mut self) -> Result<()> {
        self.base.transition(State::Inactive, State::Unconfigured)?;
        self.indicator = Rgb::OFF;
        Ok(())
    }
}
