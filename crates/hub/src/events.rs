// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hub event types and the logging subscriber.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Events emitted as connection flows progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HubEvent {
    /// An authorization URL was issued and a pending flow recorded.
    AuthorizationStarted { user: String, org: String, provider: String },
    /// A callback completed the code exchange and credentials were stored.
    Connected { user: String, org: String, provider: String },
    /// A flow failed after the authorization URL was issued.
    AuthorizationFailed { user: String, org: String, provider: String, error: String },
}

/// Spawn a task that logs every hub event.
pub fn spawn_event_logger(mut rx: broadcast::Receiver<HubEvent>) {
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(HubEvent::AuthorizationStarted { user, org, provider }) => {
                    tracing::info!(user = %user, org = %org, provider = %provider, "authorization started");
                }
                Ok(HubEvent::Connected { user, org, provider }) => {
                    tracing::info!(user = %user, org = %org, provider = %provider, "integration connected");
                }
                Ok(HubEvent::AuthorizationFailed { user, org, provider, error }) => {
                    tracing::warn!(user = %user, org = %org, provider = %provider, err = %error, "authorization failed");
                }
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}
