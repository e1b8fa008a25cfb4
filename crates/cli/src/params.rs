// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared integration state, persisted as a JSON params file.
//!
//! The file is owned by the surrounding tooling; the connect flow only ever
//! merges into it, preserving fields it does not understand.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which provider (if any) is connected, and its credential payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntegrationParams {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub integration_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Value>,
    /// Fields owned by other tools, carried through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl IntegrationParams {
    /// Whether this state carries a usable connection for `integration_type`.
    pub fn connected_to(&self, integration_type: &str) -> bool {
        self.integration_type.as_deref() == Some(integration_type)
            && self.credentials.as_ref().is_some_and(truthy)
    }

    /// Shallow-merge a completed connection, preserving unrelated fields.
    pub fn merge_connected(&mut self, credentials: Value, integration_type: &str) {
        self.credentials = Some(credentials);
        self.integration_type = Some(integration_type.to_owned());
    }
}

/// Credential payloads are opaque; presence means any non-empty value.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Load params from `path`. A missing file is an empty state, not an error.
pub fn load(path: &Path) -> anyhow::Result<IntegrationParams> {
    if !path.exists() {
        return Ok(IntegrationParams::default());
    }
    let contents = std::fs::read_to_string(path)?;
    let params: IntegrationParams = serde_json::from_str(&contents)?;
    Ok(params)
}

/// Save params to `path` atomically (write tmp + rename).
///
/// Uses a unique temp filename (PID + counter) so concurrent saves cannot
/// corrupt each other through a shared `.tmp` file.
pub fn save(path: &Path, params: &IntegrationParams) -> anyhow::Result<()> {
    use std::sync::atomic::{AtomicU32, Ordering};
    static COUNTER: AtomicU32 = AtomicU32::new(0);

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_string_pretty(params)?;
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
    let tmp_name = format!(
        "{}.{}.{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy(),
        std::process::id(),
        seq,
    );
    let tmp_path = path.with_file_name(tmp_name);
    std::fs::write(&tmp_path, json)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
#[path = "params_tests.rs"]
mod tests;
