//! The module contains the errors the engine can return.
//!
//! Callers (the HTTP server) map each variant to a status code and an error
//! code; the engine itself never decides how an error is presented.
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Malformed or out-of-range input, rejected before touching storage.
    #[error("{0}")]
    Validation(String),
    /// The resource exists but belongs to another user.
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    KeyNotFound(String),
    #[error("{0}")]
    ExistingKey(String),
    #[error("{0}")]
    InsufficientFunds(String),
    #[error("{0}")]
    GoalCompleted(String),
    /// Any other domain rule violation (e.g. deleting a funded wallet).
    #[error("{0}")]
    BusinessRule(String),
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("{0}")]
    InvalidId(String),
    #[error("password hashing failed: {0}")]
    Password(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::Unauthorized(a), Self::Unauthorized(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InsufficientFunds(a), Self::InsufficientFunds(b)) => a == b,
            (Self::GoalCompleted(a), Self::GoalCompleted(b)) => a == b,
            (Self::BusinessRule(a), Self::BusinessRule(b)) => a == b,
            (Self::InvalidCredentials, Self::InvalidCredentials) => true,
            (Self::InvalidId(a), Self::InvalidId(b)) => a == b,
            (Self::Password(a), Self::Password(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

impl From<bcrypt::BcryptError> for EngineError {
    fn from(value: bcrypt::BcryptError) -> Self {
        Self::Password(value.to_string())
    }
}
