//! Client-observed stack lifecycle

use crate::errors::PortainerError;

/// What this invocation knows about a stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackState {
    /// Not looked up yet
    Unknown,

    /// Found on the server
    Known,

    /// Looked up and not found
    Absent,

    /// Created by this invocation
    Created,

    /// Deleted by this invocation
    Deleted,
}

/// Lifecycle event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackEvent {
    /// Lookup by name matched an entry
    Found,

    /// Lookup by name matched nothing
    NotFound,

    /// Create request accepted
    Create,

    /// Delete request accepted
    Delete,
}

/// Per-stack lifecycle tracker
#[derive(Debug, Clone)]
pub struct StackLifecycle {
    name: String,
    state: StackState,
}

impl StackLifecycle {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: StackState::Unknown,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> StackState {
        self.state
    }

    /// Process an event and transition state
    pub fn process(&mut self, event: StackEvent) -> Result<StackState, PortainerError> {
        let new_state = match (self.state, event) {
            (StackState::Unknown, StackEvent::Found) => StackState::Known,
            (StackState::Unknown, StackEvent::NotFound) => StackState::Absent,
            (StackState::Absent, StackEvent::Create) => StackState::Created,
            (StackState::Known, StackEvent::Delete) => StackState::Deleted,

            (state, event) => {
                return Err(PortainerError::InvalidTransition(format!(
                    "stack {}: {:?} -> {:?}",
                    self.name, state, event
                )));
            }
        };

        self.state = new_state;
        Ok(new_state)
    }
}
