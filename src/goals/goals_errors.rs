use diesel::result::Error as DieselError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Custom error type for goal-related operations
#[derive(Debug, Error)]
pub enum GoalError {
    #[error("Goal not found: {0}")]
    NotFound(String),
    #[error("An identical goal already exists for this owner")]
    DuplicateGoal,
    #[error("Goal already has funding of {0} and can no longer be edited")]
    AlreadyFunded(Decimal),
    #[error("A goal cannot be copied into its own owner's list")]
    SelfCopy,
    #[error("Owner already holds a copy of this goal")]
    AlreadyCopied,
    #[error("Not allowed: {0}")]
    NotAllowed(String),
    #[error("Goal is being modified concurrently, retries exhausted")]
    Busy,
    #[error("Timed out waiting for the goal lock")]
    Timeout,
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Database error: {0}")]
    Database(DieselError),
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),
}

impl From<DieselError> for GoalError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => GoalError::NotFound("record not found".to_string()),
            _ => GoalError::Database(err),
        }
    }
}

/// Result type for goal operations
pub type Result<T> = std::result::Result<T, GoalError>;
