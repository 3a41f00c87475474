//! Error types for the perimeter survey
//!
//! Sensor and actuator failures are "soft": by default the survey keeps
//! running on the last good values and records the fault for telemetry.
//! [`FaultLog`] applies that policy in one place.

use crate::common::types::Wheel;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// Which sensor a failed read came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorKind {
    Range,
    Encoder(Wheel),
    Battery,
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorKind::Range => write!(f, "rangefinder"),
            SensorKind::Encoder(wheel) => write!(f, "{} encoder", wheel),
            SensorKind::Battery => write!(f, "battery"),
        }
    }
}

/// Which actuator a failed command was addressed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorKind {
    Wheel(Wheel),
    Indicator,
}

impl fmt::Display for ActuatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActuatorKind::Wheel(wheel) => write!(f, "{} wheel", wheel),
            ActuatorKind::Indicator => write!(f, "indicator"),
        }
    }
}

/// Survey error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SurveyError {
    #[error("{sensor} read failed: {reason}")]
    SensorRead { sensor: SensorKind, reason: String },

    #[error("{actuator} command failed: {reason}")]
    ActuatorCommand {
        actuator: ActuatorKind,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Lifecycle error: {0}")]
    Lifecycle(String),
}

impl SurveyError {
    /// Shorthand for a sensor read failure
    pub fn sensor(sensor: SensorKind, reason: impl Into<String>) -> Self {
        SurveyError::SensorRead {
            sensor,
            reason: reason.into(),
        }
    }

    /// Shorthand for an actuator command failure
    pub fn actuator(actuator: ActuatorKind, reason: impl Into<String>) -> Self {
        SurveyError::ActuatorCommand {
            actuator,
            reason: reason.into(),
        }
    }

    /// Hardware faults the survey may ride through
    pub fn is_soft(&self) -> bool {
        matches!(
            self,
            SurveyError::SensorRead { .. } | SurveyError::ActuatorCommand { .. }
        )
    }
}

impl From<toml::de::Error> for SurveyError {
    fn from(e: toml::de::Error) -> Self {
        SurveyError::Config(e.to_string())
    }
}

impl From<std::io::Error> for SurveyError {
    fn from(e: std::io::Error) -> Self {
        SurveyError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SurveyError>;

/// How hardware faults are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultPolicy {
    /// Log, keep the last good value and carry on
    #[default]
    SoftFail,
    /// Abort the tick with the error
    FailFast,
}

/// Faults recorded during one tick
#[derive(Debug, Clone)]
pub struct FaultLog {
    policy: FaultPolicy,
    faults: Vec<SurveyError>,
}

impl FaultLog {
    pub fn new(policy: FaultPolicy) -> Self {
        FaultLog {
            policy,
            faults: Vec::new(),
        }
    }

    /// Apply the fault policy to a hardware call result.
    ///
    /// Returns `Ok(None)` when a soft fault was swallowed.
    pub fn absorb<T>(&mut self, result: Result<T>) -> Result<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_soft() && self.policy == FaultPolicy::SoftFail => {
                tracing::warn!("{}; continuing with last known value", e);
                self.faults.push(e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub fn faults(&self) -> &[SurveyError] {
        &self.faults
    }

    pub fn is_empty(&self) -> bool {
        self.faults.is_empty()
    }

    /// Hand over the recorded faults, leaving the log empty
    pub fn take(&mut self) -> Vec<SurveyError> {
        std::mem::take(&mut self.faults)
    }
}
