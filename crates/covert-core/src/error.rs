//! Centralized error types for the covert workspace.

use thiserror::Error;

/// Top-level error enum.
///
/// Policy denials are never errors: a denied or redundant operation is an
/// `Ok(0)` from the monitor. Everything here is a caller bug or an I/O
/// problem at the edges.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CovertError {
    #[error("Subject not registered with the reference monitor: {0}")]
    UnregisteredSubject(String),

    #[error("Object store and level table disagree about object: {0}")]
    UnregisteredObject(String),

    #[error("Subject already registered: {0}")]
    DuplicateSubject(String),

    #[error("SLEEP instruction from {0} reached the reference monitor")]
    MisroutedSleep(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Actor failed: {0}")]
    Actor(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type CovertResult<T> = Result<T, CovertError>;
