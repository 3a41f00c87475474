//! Behaviors module for the survey robot
//!
//! Holds the perimeter survey: the state machine that follows an obstacle's
//! walls, turns its corners and reports its size.
pub mod state;
pub mod survey;

pub use self::state::{HaltReason, Phase, SurveyReport, SurveyResult, SurveySnapshot, SurveyState};
pub use self::survey::{SurveyStateMachine, TickOutcome};
