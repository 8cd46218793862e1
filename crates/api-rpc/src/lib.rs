//! JSON-RPC API Layer
//!
//! Exposes the rate-limited queue command surface as JSON-RPC 2.0 methods.

pub mod error;
pub mod handler;
pub mod server;
pub mod types;

pub use server::{RpcServer, RpcServerConfig, DEFAULT_RPC_HOST, DEFAULT_RPC_PORT};
