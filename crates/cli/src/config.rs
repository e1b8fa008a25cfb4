// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

/// Connect client for the integrations hub.
#[derive(Debug, Parser)]
#[command(name = "integ", version, about)]
pub struct Config {
    #[command(subcommand)]
    pub command: Command,

    /// Base URL of the integrations hub.
    #[arg(long, env = "INTEG_HUB_URL", default_value = "http://localhost:8000")]
    pub hub_url: String,

    /// Bearer token for the hub API.
    #[arg(long, env = "INTEG_HUB_TOKEN")]
    pub hub_token: Option<String>,

    /// User identifier passed to the hub.
    #[arg(long, env = "INTEG_USER")]
    pub user: String,

    /// Organization identifier passed to the hub.
    #[arg(long, env = "INTEG_ORG")]
    pub org: String,

    /// Path to the shared integration params file.
    #[arg(long, env = "INTEG_PARAMS_PATH")]
    pub params_path: Option<PathBuf>,

    /// Credential poll interval in milliseconds.
    #[arg(long, default_value_t = 200, env = "INTEG_POLL_INTERVAL_MS")]
    pub poll_interval_ms: u64,

    /// Overall poll deadline in seconds. 0 polls until cancelled.
    #[arg(long, default_value_t = 300, env = "INTEG_POLL_TIMEOUT_SECS")]
    pub poll_timeout_secs: u64,

    /// Log format (json or text).
    #[arg(long, env = "INTEG_LOG_FORMAT", default_value = "text")]
    pub log_format: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, env = "INTEG_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum Command {
    /// Connect HubSpot through the authorization popup flow.
    Connect,
    /// Show the current connection state.
    Status,
    /// List CRM items for the connected integration.
    Items,
}

impl Config {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// `None` means poll until cancelled.
    pub fn poll_timeout(&self) -> Option<Duration> {
        (self.poll_timeout_secs > 0).then(|| Duration::from_secs(self.poll_timeout_secs))
    }

    /// Resolved location of the shared params file.
    pub fn params_file(&self) -> PathBuf {
        match &self.params_path {
            Some(path) => path.clone(),
            None => state_dir().join("integrations.json"),
        }
    }
}

/// Resolve the state directory for integ data.
///
/// Checks `INTEG_STATE_DIR`, then `$XDG_STATE_HOME/integ`,
/// then `$HOME/.local/state/integ`.
pub fn state_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("INTEG_STATE_DIR") {
        return PathBuf::from(dir);
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return PathBuf::from(xdg).join("integ");
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".local/state/integ");
    }
    PathBuf::from(".integ")
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
