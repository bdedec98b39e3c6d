use thiserror::Error;

/// Custom error type for identity lookups.
///
/// A missing referenced user is the only expected failure; everything else
/// (transport, backend) is surfaced distinctly instead of being folded into
/// "not found".
#[derive(Debug, Error)]
pub enum UserLookupError {
    #[error("User not found: {0}")]
    NotFound(String),
    #[error("Identity lookup failed: {0}")]
    Lookup(String),
}

/// Result type for identity lookups
pub type Result<T> = std::result::Result<T, UserLookupError>;
