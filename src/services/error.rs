//! Error types for the repository boundary and the planner controllers.

use thiserror::Error;

use crate::models::plan::PlanId;

/// Failures talking to the planner backend
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("API base URL is not configured")]
    MissingBaseUrl,

    #[error("{operation} failed with HTTP status {status}")]
    Status { operation: &'static str, status: u16 },

    #[error("network error: {0}")]
    Transport(String),

    #[error("unexpected response body: {0}")]
    Decode(String),

    #[error("server returned a {0} without an identity")]
    MissingIdentity(&'static str),
}

/// Errors surfaced by the grid and plan form
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlannerError {
    #[error("No signed-in user")]
    NoSession,

    #[error("Task title is required")]
    TaskTitleRequired,

    #[error("You must select a task")]
    TaskSelectionRequired,

    #[error("Invalid time '{0}', expected HH:MM")]
    InvalidTime(String),

    #[error("Invalid due date '{0}', expected YYYY-MM-DD")]
    InvalidDueDate(String),

    #[error("End time must be after start time")]
    EndBeforeStart,

    #[error("Day must be between 0 and 6, got {0}")]
    InvalidDay(u8),

    #[error("Plan {0} is not loaded")]
    UnknownPlan(PlanId),

    #[error("A submit is already in progress")]
    SubmitInProgress,

    #[error("The plan form is not open")]
    FormClosed,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl PlannerError {
    /// Validation failures are raised before any request is sent.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            PlannerError::TaskTitleRequired
                | PlannerError::TaskSelectionRequired
                | PlannerError::InvalidTime(_)
                | PlannerError::InvalidDueDate(_)
                | PlannerError::EndBeforeStart
                | PlannerError::InvalidDay(_)
        )
    }
}
