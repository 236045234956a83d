//! The module contains the errors the engine can throw.
//!
//! The variants map one-to-one onto the HTTP statuses the server layer
//! answers with:
//!
//! - [`InvalidInput`] / [`InvalidAmount`] / [`ExistingKey`] are rejected input.
//! - [`Unauthorized`] covers bad credentials and missing sessions.
//! - [`Forbidden`] covers non-admin access to admin operations.
//! - [`KeyNotFound`] covers lookups of ids that no longer exist.
//! - [`Session`] and [`Database`] are backing-store failures.
//!
//! [`InvalidInput`]: EngineError::InvalidInput
//! [`InvalidAmount`]: EngineError::InvalidAmount
//! [`ExistingKey`]: EngineError::ExistingKey
//! [`Unauthorized`]: EngineError::Unauthorized
//! [`Forbidden`]: EngineError::Forbidden
//! [`KeyNotFound`]: EngineError::KeyNotFound
//! [`Session`]: EngineError::Session
//! [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Session store failure: {0}")]
    Session(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Unauthorized(a), Self::Unauthorized(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidInput(a), Self::InvalidInput(b)) => a == b,
            (Self::Session(a), Self::Session(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
