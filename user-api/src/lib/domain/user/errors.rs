use thiserror::Error;

use crate::domain::user::validation::ValidationErrors;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username is empty")]
    Empty,

    #[error("Username must be a valid email address: {0}")]
    InvalidFormat(String),
}

/// Error for User Record Store operations
#[derive(Debug, Clone, Error)]
pub enum UserError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid user ID: {0}")]
    InvalidUserId(#[from] UserIdError),

    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    // Domain-level errors
    #[error("Username already exists: {0}")]
    UsernameAlreadyExists(String),

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Storage deadline exceeded: {0}")]
    Timeout(String),
}

/// Outcome taxonomy of the login and registration flows.
///
/// Carries no transport semantics; the HTTP adapter decides status codes.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// Credentials did not match a live account. Deliberately says nothing
    /// about which part was wrong.
    #[error("Invalid credentials")]
    Unauthorized,

    #[error("Username already exists: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
