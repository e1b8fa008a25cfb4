// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Expiring key-value store for pending authorizations and credentials.
//!
//! Entries carry a TTL and are treated as absent once it elapses, whether or
//! not the background sweeper has reclaimed them yet.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::state::HubState;

struct Entry {
    value: serde_json::Value,
    expires_at: Instant,
}

impl Entry {
    fn live(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// In-memory TTL store.
#[derive(Default)]
pub struct TtlStore {
    entries: RwLock<HashMap<String, Entry>>,
}

impl TtlStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value under `key`, expiring after `ttl`.
    pub async fn insert(&self, key: &str, value: serde_json::Value, ttl: Duration) {
        let entry = Entry { value, expires_at: Instant::now() + ttl };
        self.entries.write().await.insert(key.to_owned(), entry);
    }

    /// Read a value. Expired entries are treated as absent.
    pub async fn get(&self, key: &str) -> Option<serde_json::Value> {
        let entries = self.entries.read().await;
        entries.get(key).filter(|e| e.live()).map(|e| e.value.clone())
    }

    /// Remove a value, returning it if it was still live.
    pub async fn remove(&self, key: &str) -> Option<serde_json::Value> {
        let mut entries = self.entries.write().await;
        entries.remove(key).filter(|e| e.live()).map(|e| e.value)
    }

    /// Number of live entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.values().filter(|e| e.live()).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop expired entries, returning how many were reclaimed.
    pub async fn sweep(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, e| e.live());
        before - entries.len()
    }
}

/// Spawn the background sweeper. Runs until shutdown is cancelled.
pub fn spawn_sweeper(state: Arc<HubState>) {
    let interval = state.config.sweep_interval();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = state.shutdown.cancelled() => break,
                _ = tokio::time::sleep(interval) => {
                    let reclaimed = state.store.sweep().await;
                    if reclaimed > 0 {
                        tracing::debug!(reclaimed, "swept expired store entries");
                    }
                }
            }
        }
    });
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
