// Ratelist Core - Admission Control, Domain & Ports
// NO infrastructure dependencies: storage and transport are adapters behind ports

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use error::{AppError, Result};
