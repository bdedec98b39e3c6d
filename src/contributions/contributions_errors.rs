use diesel::result::Error as DieselError;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::users::UserLookupError;

/// Custom error type for ledger operations
#[derive(Debug, Error)]
pub enum ContributionError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Contributors cannot fund their own goal")]
    SelfFunding,
    #[error("Goal is already fully funded")]
    AlreadyFunded,
    #[error("Amount exceeds the remaining fundable {remaining}")]
    ExceedsRemaining { remaining: Decimal },
    #[error("Not allowed: {0}")]
    NotAllowed(String),
    #[error("Goal is receiving concurrent contributions, retries exhausted")]
    Busy,
    #[error("Timed out waiting for the goal lock")]
    Timeout,
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Identity lookup failed: {0}")]
    Identity(String),
    #[error("Database error: {0}")]
    Database(DieselError),
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),
}

impl From<DieselError> for ContributionError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => ContributionError::NotFound("record not found".to_string()),
            _ => ContributionError::Database(err),
        }
    }
}

impl From<UserLookupError> for ContributionError {
    fn from(err: UserLookupError) -> Self {
        match err {
            UserLookupError::NotFound(user_id) => {
                ContributionError::NotFound(format!("user {}", user_id))
            }
            UserLookupError::Lookup(msg) => ContributionError::Identity(msg),
        }
    }
}

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, ContributionError>;
