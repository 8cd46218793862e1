// Domain Error Types

use thiserror::Error;

/// Failures detected while parsing or validating a command, before any store access
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("ERR: invalid command and/or args")]
    UnknownCommand(String),

    #[error("ERR wrong number of arguments for '{0}' command")]
    WrongArity(String),

    #[error("ERR: one or more intervals is invalid")]
    InvalidInterval(String),

    #[error("Invalid variant: {0} (expected 'dual' or 'dequeue')")]
    InvalidVariant(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
