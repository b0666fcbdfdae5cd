//! Common state machine error types

use thiserror::Error;

/// Errors that can occur during state transitions
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StateError {
    #[error("Invalid transition: cannot transition from {from} via {event}")]
    InvalidTransition { from: String, event: String },
}

impl From<StateError> for crate::Error {
    fn from(err: StateError) -> Self {
        crate::Error::BadRequest(err.to_string())
    }
}
