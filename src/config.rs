//! Configuration for the perimeter survey
//!
//! All tuned constants live here. The hand-tuned program variants the robot
//! used to ship as are expressed as [`Preset`]s.

use crate::common::types::{Rgb, Wheel};
use crate::error::{FaultPolicy, Result, SurveyError};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Main configuration structure
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SurveyConfig {
    pub survey: MeasurementConfig,
    pub proximity: ProximityConfig,
    pub cornering: CorneringConfig,
    pub runtime: RuntimeConfig,
}

/// Side measurement and tallying
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct MeasurementConfig {
    /// Number of sides to measure before finishing
    pub target_side_count: usize,

    /// Length units per tally unit
    pub calibration_factor: f64,

    /// A tick tallies when `encoder_degrees % tally_period == 0`
    pub tally_period: u32,

    /// Wheel whose encoder feeds the tally
    pub tally_wheel: Wheel,

    /// Closest range (cm) still considered on the wall
    pub on_wall_min_cm: i32,

    /// Farthest range (cm) still considered on the wall
    pub on_wall_max_cm: i32,

    /// Recent following readings averaged to decide the drift direction
    pub drift_window: usize,

    /// Battery voltage at or below which telemetry flags the battery
    pub low_battery_volts: f64,

    pub fault_policy: FaultPolicy,
}

/// One step of the inter-tick delay staircase
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct DelayStep {
    /// Step applies to ranges at or above this value (cm)
    pub from_cm: i32,
    /// Delay added on top of the base delay
    pub extra_ms: u64,
}

/// Indicator color for ranges up to and including `up_to_cm`
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct IndicatorBand {
    pub up_to_cm: i32,
    pub color: Rgb,
}

/// Range banding for the proximity controller
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProximityConfig {
    /// Ranges at or below this stop the robot (cm)
    pub stop_distance_cm: i32,

    /// Ranges at or above this mean the wall is gone (cm)
    pub corner_threshold_cm: i32,

    /// Wheel speed while following (deg/s)
    pub nominal_speed_dps: i32,

    pub base_delay_ms: u64,

    /// Ordered by `from_cm`; the last step not above the range wins
    pub delay_steps: Vec<DelayStep>,

    /// Ordered near to far; first match wins
    pub indicator_bands: Vec<IndicatorBand>,

    /// Color beyond the last band
    pub indicator_fallback: Rgb,
}

/// Open-loop corner turn and wall reacquisition
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct CorneringConfig {
    /// Wheel that drives the pivot, the other one holds still
    pub pivot_wheel: Wheel,
    pub pivot_speed_dps: i32,
    pub pivot_duration_ms: u64,

    /// Forward drive after losing the wall, before pivoting
    pub clearance_ms: u64,

    /// Hold after the pivot
    pub settle_ms: u64,

    pub creep_speed_dps: i32,
    pub creep_step_ms: u64,

    /// Creep steps allowed before giving up on the wall
    pub creep_max_steps: u32,
}

/// Tick loop behaviour
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Stop the loop after this many ticks
    pub max_ticks: Option<u64>,

    /// Leave the loop once the survey completes instead of holding
    pub exit_on_complete: bool,

    /// Per hardware call deadline; no watchdog when unset
    pub call_deadline_ms: Option<u64>,

    /// Granularity of cancellable sleeps
    pub cancel_poll_ms: u64,
}

/// Tuned constant sets
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
    Standard,
    Cautious,
    Brisk,
}

impl FromStr for Preset {
    type Err = SurveyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "standard" => Ok(Preset::Standard),
            "cautious" => Ok(Preset::Cautious),
            "brisk" => Ok(Preset::Brisk),
            other => Err(SurveyError::Config(format!("unknown preset '{}'", other))),
        }
    }
}

impl Default for MeasurementConfig {
    fn default() -> Self {
        Self {
            target_side_count: 2,
            calibration_factor: 1.11,
            tally_period: 2,
            tally_wheel: Wheel::Left,
            on_wall_min_cm: 20,
            on_wall_max_cm: 50,
            drift_window: 5,
            low_battery_volts: 9.0,
            fault_policy: FaultPolicy::SoftFail,
        }
    }
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            stop_distance_cm: 10,
            corner_threshold_cm: 70,
            nominal_speed_dps: 180,
            base_delay_ms: 100,
            delay_steps: vec![
                DelayStep {
                    from_cm: 0,
                    extra_ms: 0,
                },
                DelayStep {
                    from_cm: 30,
                    extra_ms: 50,
                },
                DelayStep {
                    from_cm: 50,
                    extra_ms: 100,
                },
            ],
            indicator_bands: vec![
                IndicatorBand {
                    up_to_cm: 20,
                    color: Rgb::ORANGE,
                },
                IndicatorBand {
                    up_to_cm: 50,
                    color: Rgb::GREEN,
                },
            ],
            indicator_fallback: Rgb::YELLOW,
        }
    }
}

impl Default for CorneringConfig {
    fn default() -> Self {
        // Pivot is ~90 degrees for 66.5mm wheels on a 117mm track
        Self {
            pivot_wheel: Wheel::Right,
            pivot_speed_dps: 180,
            pivot_duration_ms: 1760,
            clearance_ms: 2800,
            settle_ms: 500,
            creep_speed_dps: 180,
            creep_step_ms: 250,
            creep_max_steps: 40,
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_ticks: None,
            exit_on_complete: true,
            call_deadline_ms: None,
            cancel_poll_ms: 50,
        }
    }
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self::preset(Preset::Standard)
    }
}

impl SurveyConfig {
    /// Build one of the tuned constant sets
    pub fn preset(preset: Preset) -> Self {
        let mut config = SurveyConfig {
            survey: MeasurementConfig::default(),
            proximity: ProximityConfig::default(),
            cornering: CorneringConfig::default(),
            runtime: RuntimeConfig::default(),
        };

        match preset {
            Preset::Standard => {}
            Preset::Cautious => {
                config.proximity.stop_distance_cm = 15;
                config.proximity.corner_threshold_cm = 65;
                config.proximity.nominal_speed_dps = 90;
                config.proximity.base_delay_ms = 150;
                config.cornering.pivot_speed_dps = 90;
                config.cornering.pivot_duration_ms = 3520;
                config.cornering.clearance_ms = 5600;
                config.cornering.settle_ms = 1000;
                config.cornering.creep_speed_dps = 90;
                config.cornering.creep_step_ms = 500;
            }
            Preset::Brisk => {
                config.proximity.nominal_speed_dps = 360;
                config.proximity.base_delay_ms = 50;
                config.cornering.pivot_speed_dps = 360;
                config.cornering.pivot_duration_ms = 880;
                config.cornering.clearance_ms = 1400;
                config.cornering.settle_ms = 250;
                config.cornering.creep_speed_dps = 360;
                config.cornering.creep_step_ms = 125;
            }
        }

        config
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: SurveyConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check band ordering and value ranges
    pub fn validate(&self) -> Result<()> {
        let m = &self.survey;
        let p = &self.proximity;
        let c = &self.cornering;

        if m.target_side_count < 2 {
            return Err(invalid("target_side_count must be at least 2"));
        }
        if !(m.calibration_factor.is_finite() && m.calibration_factor > 0.0) {
            return Err(invalid("calibration_factor must be positive"));
        }
        if m.tally_period == 0 {
            return Err(invalid("tally_period must be at least 1"));
        }
        if m.drift_window == 0 {
            return Err(invalid("drift_window must be at least 1"));
        }
        if m.on_wall_min_cm >= m.on_wall_max_cm {
            return Err(invalid("on_wall_min_cm must be below on_wall_max_cm"));
        }
        if m.on_wall_max_cm > p.corner_threshold_cm {
            return Err(invalid("on-wall band must lie below the corner threshold"));
        }
        if p.stop_distance_cm < 0 || p.stop_distance_cm >= p.corner_threshold_cm {
            return Err(invalid(
                "stop_distance_cm must be non-negative and below corner_threshold_cm",
            ));
        }
        if p.nominal_speed_dps <= 0 || c.pivot_speed_dps <= 0 || c.creep_speed_dps <= 0 {
            return Err(invalid("wheel speeds must be positive"));
        }
        if p
            .delay_steps
            .windows(2)
            .any(|w| w[1].from_cm <= w[0].from_cm || w[1].extra_ms < w[0].extra_ms)
        {
            return Err(invalid("delay_steps must increase with range"));
        }
        if p
            .indicator_bands
            .windows(2)
            .any(|w| w[1].up_to_cm <= w[0].up_to_cm)
        {
            return Err(invalid("indicator_bands must be ordered near to far"));
        }
        if c.pivot_duration_ms == 0 || c.creep_step_ms == 0 || c.creep_max_steps == 0 {
            return Err(invalid("pivot and creep timings must be non-zero"));
        }
        if self.runtime.cancel_poll_ms == 0 || self.runtime.call_deadline_ms == Some(0) {
            return Err(invalid("runtime intervals must be non-zero"));
        }
        Ok(())
    }

    /// Midpoint of the on-wall band
    pub fn wall_setpoint_cm(&self) -> f64 {
        (self.survey.on_wall_min_cm + self.survey.on_wall_max_cm) as f64 / 2.0
    }
}

impl CorneringConfig {
    pub fn pivot_duration(&self) -> Duration {
        Duration::from_millis(self.pivot_duration_ms)
    }

    pub fn clearance(&self) -> Duration {
        Duration::from_millis(self.clearance_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn creep_step(&self) -> Duration {
        Duration::from_millis(self.creep_step_ms)
    }
}

impl RuntimeConfig {
    pub fn call_deadline(&self) -> Option<Duration> {
        self.call_deadline_ms.map(Duration::from_millis)
    }

    pub fn cancel_poll(&self) -> Duration {
        Duration::from_millis(self.cancel_poll_ms)
    }
}

fn invalid(msg: &str) -> SurveyError {
    SurveyError::Config(msg.to_string())
}
