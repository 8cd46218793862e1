//! RPC Method Handlers

use crate::error::to_rpc_error;
use crate::types::{CommandRequest, CommandResponse, CommandsRequest, CommandsResponse};
use jsonrpsee::types::ErrorObjectOwned;
use ratelist_core::application::ThrottleService;
use std::sync::Arc;
use tracing::debug;

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    service: Arc<ThrottleService>,
}

impl RpcHandler {
    pub fn new(service: Arc<ThrottleService>) -> Self {
        Self { service }
    }

    /// rl.command.v1
    pub async fn command(
        &self,
        params: CommandRequest,
    ) -> Result<CommandResponse, ErrorObjectOwned> {
        debug!(args = ?params.args, "rl.command.v1");

        let argv: Vec<Vec<u8>> = params.args.into_iter().map(String::into_bytes).collect();
        let execution = self.service.execute(&argv).await.map_err(to_rpc_error)?;

        Ok(CommandResponse {
            reply: execution.reply,
            denied: execution.denied,
        })
    }

    /// rl.commands.v1
    pub async fn commands(
        &self,
        _params: CommandsRequest,
    ) -> Result<CommandsResponse, ErrorObjectOwned> {
        Ok(CommandsResponse {
            variant: self.service.variant().to_string(),
            commands: self.service.commands().into_iter().map(Into::into).collect(),
        })
    }
}
