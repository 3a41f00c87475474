//! Survey state and the read-only views handed to telemetry

use crate::common::types::Voltage;
use crate::error::SurveyError;
use crate::perception::localization::{SideRecord, SideTally};
use crate::perception::sensors::EncoderSample;
use std::fmt;

/// Why a survey stopped short
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltReason {
    /// The wall was not found again after a corner
    CreepTimeout,
    Cancelled,
    /// The tick budget ran out
    TickLimit,
}

/// Survey phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No valid range reading yet
    Starting,
    /// Driving toward a wall that is not yet in range
    Approaching,
    Following,
    /// Clearing the corner and pivoting
    Turning,
    /// Pivot done, edging forward until the wall is back in range
    Creeping,
    Complete,
    Halted(HaltReason),
}

impl Phase {
    /// Nothing but Stop is ever issued again
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Complete | Phase::Halted(_))
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Starting => write!(f, "starting"),
            Phase::Approaching => write!(f, "approaching"),
            Phase::Following => write!(f, "following"),
            Phase::Turning => write!(f, "turning"),
            Phase::Creeping => write!(f, "creeping"),
            Phase::Complete => write!(f, "complete"),
            Phase::Halted(reason) => write!(f, "halted ({:?})", reason),
        }
    }
}

/// Perimeter and area of the rectangle spanned by the first two sides
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurveyResult {
    pub perimeter: f64,
    pub area: f64,
    /// One of the sides had no tally, so the figures are not measurements
    pub degenerate: bool,
}

impl SurveyResult {
    pub fn from_sides(first: &SideRecord, second: &SideRecord) -> Self {
        let (a, b) = (first.corrected_length, second.corrected_length);
        SurveyResult {
            perimeter: 2.0 * (a + b),
            area: a * b,
            degenerate: first.degenerate || second.degenerate,
        }
    }
}

/// Everything the survey loop owns. Only the state machine mutates it.
#[derive(Debug, Clone)]
pub struct SurveyState {
    pub(crate) phase: Phase,
    pub(crate) side_records: Vec<SideRecord>,
    pub(crate) counters: SideTally,
    pub(crate) battery_last: Option<Voltage>,
    pub(crate) tick_count: u64,
    /// Creep steps taken since the last pivot
    pub(crate) creep_steps: u32,
    pub(crate) result: Option<SurveyResult>,
}

impl SurveyState {
    pub(crate) fn new(counters: SideTally) -> Self {
        SurveyState {
            phase: Phase::Starting,
            side_records: Vec::new(),
            counters,
            battery_last: None,
            tick_count: 0,
            creep_steps: 0,
            result: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of completed sides
    pub fn side_index(&self) -> usize {
        self.side_records.len()
    }

    pub fn side_records(&self) -> &[SideRecord] {
        &self.side_records
    }

    pub fn tally(&self) -> u32 {
        self.counters.tally()
    }

    pub fn error_tally(&self) -> u32 {
        self.counters.error_tally()
    }

    pub fn battery_last(&self) -> Option<Voltage> {
        self.battery_last
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn creep_steps(&self) -> u32 {
        self.creep_steps
    }

    pub fn result(&self) -> Option<SurveyResult> {
        self.result
    }
}

/// Per-tick view for telemetry
#[derive(Debug, Clone, PartialEq)]
pub struct SurveySnapshot {
    pub tick: u64,
    pub phase: Phase,
    pub side_index: usize,
    pub side_lengths: Vec<f64>,
    pub tally: u32,
    pub error_tally: u32,
    pub range_cm: Option<i32>,
    pub encoder: Option<EncoderSample>,
    pub battery: Option<Voltage>,
    pub battery_low: bool,
    /// Hardware faults absorbed during the tick
    pub faults: Vec<SurveyError>,
}

/// Final outcome of a run
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyReport {
    pub phase: Phase,
    pub ticks: u64,
    pub sides: Vec<SideRecord>,
    pub result: Option<SurveyResult>,
}

impl SurveyReport {
    pub fn halt_reason(&self) -> Option<HaltReason> {
        match self.phase {
            Phase::Halted(reason) => Some(reason),
            _ => None,
        }
    }
}
