//! Lifecycle management for robot backends

use crate::error::{Result, SurveyError};

/// Trait for components that follow a lifecycle pattern
pub trait LifecycleNode: Send + Sync {
    /// Configure the node
    fn on_configure(&mut self) -> Result<()>;

    /// Activate the node
    fn on_activate(&mut self) -> Result<()>;

    /// Deactivate the node
    fn on_deactivate(&mut self) -> Result<()>;

    /// Clean up the node
    fn on_cleanup(&mut self) -> Result<()>;
}

/// Base implementation for lifecycle nodes
#[derive(Debug, Clone)]
pub struct LifecycleNodeBase {
    pub name: String,
    state: State,
}

/// State of a lifecycle node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Unconfigured,
    Inactive,
    Active,
}

impl LifecycleNodeBase {
    /// Create a new lifecycle node base
    pub fn new(name: &str) -> Self {
        LifecycleNodeBase {
            name: name.to_string(),
            state: State::Unconfigured,
        }
    }

    /// Get the current state
    pub fn get_state(&self) -> State {
        self.state
    }

    /// Move to `to`, provided the node is currently in `from`
    pub fn transition(&mut self, from: State, to: State) -> Result<()> {
        if self.state != from {
            return Err(SurveyError::Lifecycle(format!(
                "{}: cannot go {:?} -> {:?} from {:?}",
                self.name, from, to, self.state
            )));
        }
        tracing::debug!("{}: {:?} -> {:?}", self.name, from, to);
        self.state = to;
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.state == State::Active
    }
}
