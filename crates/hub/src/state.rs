// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::config::HubConfig;
use crate::events::HubEvent;
use crate::store::TtlStore;

/// Shared hub state.
pub struct HubState {
    pub config: HubConfig,
    pub store: TtlStore,
    pub http: reqwest::Client,
    pub event_tx: broadcast::Sender<HubEvent>,
    pub shutdown: CancellationToken,
}

impl HubState {
    pub fn new(config: HubConfig, shutdown: CancellationToken) -> Self {
        let (event_tx, _) = broadcast::channel(64);
        Self {
            config,
            store: TtlStore::new(),
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            event_tx,
            shutdown,
        }
    }
}
