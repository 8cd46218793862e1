// Central Error Type for the Application

use thiserror::Error;

/// Text the store uses for type mismatches; also used for unparseable bookkeeping values
pub const WRONGTYPE_MESSAGE: &str =
    "WRONGTYPE Operation against a key holding the wrong kind of value";

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] crate::domain::DomainError),

    /// A reserved hash or a queue key exists with the wrong shape
    #[error("WRONGTYPE Operation against a key holding the wrong kind of value")]
    WrongType { key: String },

    /// A stored interval or timestamp is not a non-negative integer
    #[error("WRONGTYPE Operation against a key holding the wrong kind of value")]
    Corruption { key: String, field: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    pub fn wrong_type(key: &[u8]) -> Self {
        AppError::WrongType {
            key: String::from_utf8_lossy(key).into_owned(),
        }
    }

    pub fn corruption(key: &[u8], field: &[u8]) -> Self {
        AppError::Corruption {
            key: String::from_utf8_lossy(key).into_owned(),
            field: String::from_utf8_lossy(field).into_owned(),
        }
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

// Note: sqlx::Error conversion is handled in infra-sqlite crate
// by converting to AppError::Database(String)
