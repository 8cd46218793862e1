//! RPC Error Types
//!
//! Maps application errors to JSON-RPC error codes. Messages keep the store's reply texts.

use jsonrpsee::types::ErrorObjectOwned;
use ratelist_core::domain::DomainError;
use ratelist_core::error::AppError;

/// RPC Error Codes
pub mod code {
    pub const VALIDATION_ERROR: i32 = 4000;
    pub const UNKNOWN_COMMAND: i32 = 4004;
    pub const WRONG_ARITY: i32 = 4005;
    pub const WRONG_TYPE: i32 = 4006;
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const DB_ERROR: i32 = 5001;
}

/// Convert AppError to JSON-RPC ErrorObject
pub fn to_rpc_error(err: AppError) -> ErrorObjectOwned {
    let code = match &err {
        AppError::Domain(DomainError::UnknownCommand(_)) => code::UNKNOWN_COMMAND,
        AppError::Domain(DomainError::WrongArity(_)) => code::WRONG_ARITY,
        AppError::Domain(_) => code::VALIDATION_ERROR,
        AppError::WrongType { .. } | AppError::Corruption { .. } => code::WRONG_TYPE,
        AppError::Database(_) => code::DB_ERROR,
        AppError::Config(_) => code::INTERNAL_ERROR,
    };
    ErrorObjectOwned::owned(code, err.to_string(), None::<()>)
}
