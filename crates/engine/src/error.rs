//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`KeyNotFound`] thrown when an expense does not exist.
//! - [`InvalidAmount`] thrown when an amount does not parse as money.
//! - [`InvalidCategory`] thrown when a category label is outside the closed set.
//!
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`InvalidCategory`]: EngineError::InvalidCategory
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid category: {0}")]
    InvalidCategory(String),
    #[error("Missing database connection")]
    MissingDatabase,
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidCategory(a), Self::InvalidCategory(b)) => a == b,
            (Self::MissingDatabase, Self::MissingDatabase) => true,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
