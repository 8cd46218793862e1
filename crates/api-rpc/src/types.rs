//! RPC Request/Response Types
//!
//! Defines the JSON-RPC method parameters and results.

use ratelist_core::domain::{Arity, CommandName, Reply};
use serde::{Deserialize, Serialize};

/// rl.command.v1 - Execute one command
#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    /// Command name followed by its arguments, e.g. `["RL.LPOP", "jobs"]`
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommandResponse {
    pub reply: Reply,
    /// Set when the throttle refused the action; `reply` is then nil
    pub denied: bool,
}

/// rl.commands.v1 - List the registered command table
#[derive(Debug, Deserialize)]
pub struct CommandsRequest {
    // No parameters needed
}

#[derive(Debug, Clone, Serialize)]
pub struct CommandInfo {
    pub name: &'static str,
    pub arity: Arity,
}

impl From<CommandName> for CommandInfo {
    fn from(command: CommandName) -> Self {
        Self {
            name: command.as_str(),
            arity: command.arity(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CommandsResponse {
    pub variant: String,
    pub commands: Vec<CommandInfo>,
}
