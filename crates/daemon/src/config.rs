// Daemon configuration (environment variables)

use ratelist_api_rpc::{DEFAULT_RPC_HOST, DEFAULT_RPC_PORT};
use ratelist_core::domain::{ReservedKeys, Variant, DEFAULT_KEY_PREFIX};
use ratelist_core::error::{AppError, Result};

const DEFAULT_DB_PATH: &str = "~/.ratelist/store.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonConfig {
    pub db_path: String,
    pub rpc_host: String,
    pub rpc_port: u16,
    pub variant: Variant,
    pub key_prefix: String,
}

impl DaemonConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve every setting through `lookup`; unset variables fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = lookup("RATELIST_DB_PATH")
            .unwrap_or_else(|| DEFAULT_DB_PATH.to_string());
        let db_path = shellexpand::tilde(&db_path).into_owned();

        let rpc_host = lookup("RATELIST_RPC_HOST").unwrap_or_else(|| DEFAULT_RPC_HOST.to_string());

        let rpc_port = match lookup("RATELIST_RPC_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| {
                AppError::Config(format!("RATELIST_RPC_PORT is not a valid port: {}", raw))
            })?,
            None => DEFAULT_RPC_PORT,
        };

        let variant = match lookup("RATELIST_VARIANT") {
            Some(raw) => raw
                .parse::<Variant>()
                .map_err(|e| AppError::Config(format!("RATELIST_VARIANT: {}", e)))?,
            None => Variant::default(),
        };

        let key_prefix =
            lookup("RATELIST_KEY_PREFIX").unwrap_or_else(|| DEFAULT_KEY_PREFIX.to_string());
        if key_prefix.is_empty() {
            return Err(AppError::Config(
                "RATELIST_KEY_PREFIX must not be empty".to_string(),
            ));
        }

        Ok(Self {
            db_path,
            rpc_host,
            rpc_port,
            variant,
            key_prefix,
        })
    }

    pub fn reserved_keys(&self) -> ReservedKeys {
        ReservedKeys::new(&self.key_prefix, self.variant)
    }

    /// SQLite connection URL for `db_path`
    pub fn database_url(&self) -> String {
        if self.db_path.starts_with("sqlite:") {
            self.db_path.clone()
        } else {
            format!("sqlite://{}?mode=rwc", self.db_path)
        }
    }
}
