//! RPC connection configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const RPC_URL_ENV: &str = "CHAINCALL_RPC_URL";
pub const FROM_ENV: &str = "CHAINCALL_FROM";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("no RPC URL configured. Set CHAINCALL_RPC_URL or pass --rpc <url>")]
    MissingRpcUrl,
}

/// How to reach the node and which account sends transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcConfig {
    /// HTTP JSON-RPC endpoint, e.g. "http://127.0.0.1:8545"
    pub rpc_url: String,
    /// Node-managed account used for `eth_sendTransaction`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Receipt polling interval
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Give up waiting for a receipt after this long
    #[serde(default = "default_confirmation_timeout_ms")]
    pub confirmation_timeout_ms: u64,
    /// Per-request HTTP timeout
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_poll_interval_ms() -> u64 { 1_000 }
fn default_confirmation_timeout_ms() -> u64 { 120_000 }
fn default_request_timeout_ms() -> u64 { 30_000 }

impl RpcConfig {
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            from: None,
            poll_interval_ms: default_poll_interval_ms(),
            confirmation_timeout_ms: default_confirmation_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }

    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    /// Load a YAML or JSON file (JSON is valid YAML).
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Build from `CHAINCALL_RPC_URL` and `CHAINCALL_FROM`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let url = lookup(RPC_URL_ENV)
            .filter(|u| !u.trim().is_empty())
            .ok_or(ConfigError::MissingRpcUrl)?;
        let mut config = Self::new(url.trim());
        config.from = lookup(FROM_ENV).filter(|f| !f.trim().is_empty());
        Ok(config)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_millis(self.confirmation_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
