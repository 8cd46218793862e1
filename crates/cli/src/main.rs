//! Ratelist CLI - Command-line client for the ratelist daemon

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:9637";

#[derive(Parser)]
#[command(name = "ratelist")]
#[command(about = "Rate-limited queue commands over JSON-RPC", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "RATELIST_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one command, e.g. `ratelist call RL.LPOP jobs`
    Call {
        /// Command name followed by its arguments
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// List the commands the daemon registered
    Commands,
}

#[derive(Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: Value,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    result: Option<Value>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

async fn call_rpc(url: &str, method: &str, params: Value) -> Result<Value> {
    let request = JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        method: method.to_string(),
        params,
        id: 1,
    };

    let client = reqwest::Client::new();
    let response: JsonRpcResponse = client
        .post(url)
        .json(&request)
        .send()
        .await
        .context("Failed to connect to daemon")?
        .json()
        .await
        .context("Failed to parse response")?;

    if let Some(error) = response.error {
        anyhow::bail!("({}) {}", error.code, error.message);
    }

    response
        .result
        .ok_or_else(|| anyhow::anyhow!("No result in response"))
}

/// Render a reply the way a key-value shell prints it
fn render_reply(result: &Value) -> String {
    let reply = &result["reply"];
    let rendered = match reply["type"].as_str() {
        Some("integer") => format!("(integer) {}", reply["value"]),
        Some("bulk") => format!("\"{}\"", reply["value"].as_str().unwrap_or_default()),
        _ => "(nil)".to_string(),
    };

    if result["denied"].as_bool().unwrap_or(false) {
        format!("{} {}", rendered, "(throttled)".yellow())
    } else {
        rendered
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Call { args } => {
            match call_rpc(&cli.rpc_url, "rl.command.v1", json!({ "args": args })).await {
                Ok(result) => println!("{}", render_reply(&result)),
                Err(e) => {
                    eprintln!("{} {}", "(error)".red().bold(), e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Commands => {
            let result = call_rpc(&cli.rpc_url, "rl.commands.v1", json!({})).await?;

            println!(
                "{} {}",
                "Variant:".bold(),
                result["variant"].as_str().unwrap_or("unknown").cyan()
            );
            println!();

            for command in result["commands"].as_array().into_iter().flatten() {
                let arity = match command["arity"]["kind"].as_str() {
                    Some("pairs") => "queue interval [queue interval ...]".to_string(),
                    _ => format!("{} args", command["arity"]["count"]),
                };
                println!(
                    "  {:<20} {}",
                    command["name"].as_str().unwrap_or_default().green(),
                    arity
                );
            }
        }
    }

    Ok(())
}
