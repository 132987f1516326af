//! The module contains the errors the engine can throw.
//!
//! The errors are:
//!
//! - [`InvalidInput`] thrown when a required field is missing or malformed.
//! - [`DuplicateUsername`] thrown when registering an already taken username.
//! - [`PasswordHash`] thrown when the password hasher fails.
//! - [`Database`] wraps any storage failure.
//!
//!  [`InvalidInput`]: EngineError::InvalidInput
//!  [`DuplicateUsername`]: EngineError::DuplicateUsername
//!  [`PasswordHash`]: EngineError::PasswordHash
//!  [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("\"{0}\" already present!")]
    DuplicateUsername(String),
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidInput(a), Self::InvalidInput(b)) => a == b,
            (Self::DuplicateUsername(a), Self::DuplicateUsername(b)) => a == b,
            (Self::PasswordHash(a), Self::PasswordHash(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
