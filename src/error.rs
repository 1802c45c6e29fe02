//! Error types surfaced by the timer store and the pomodoro manager

use thiserror::Error;

/// Errors returned by timer operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// The operation targets a user with no active timer
    #[error("no timer associated with given user")]
    NotFound,

    /// Missing or malformed input
    #[error("{0}")]
    InvalidArgument(String),

    /// Lock poisoning or a missing scheduling runtime
    #[error("internal error: {0}")]
    Internal(String),
}

impl TimerError {
    pub(crate) fn missing_user_id() -> Self {
        Self::InvalidArgument("no user ID provided".to_string())
    }
}

pub type Result<T> = std::result::Result<T, TimerError>;
