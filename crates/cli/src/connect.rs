// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The HubSpot connect flow: a three-state connect button and the
//! authorization popup + credential poll behind it.
//!
//! The popup (system browser) is an external process the flow cannot
//! observe directly; completion is detected purely by polling the hub's
//! credentials endpoint at a fixed interval. The poll is scoped to the
//! flow: cancellation and the deadline both stop it, so no interval can
//! outlive the command.

use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::hub_client::HubClient;
use crate::params::{self, IntegrationParams};

/// Integration type tag recorded in shared params.
pub const INTEGRATION_TYPE: &str = "Hubspot";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectState {
    Idle,
    Connecting,
    Connected,
}

/// Connect-button state machine.
///
/// `Connected` and `Connecting` are disjoint by construction: every path
/// out of `Connecting` lands in exactly one of the other two states.
#[derive(Debug)]
pub struct ConnectButton {
    state: ConnectState,
}

impl ConnectButton {
    /// Derive the initial state from the shared params.
    pub fn from_params(params: &IntegrationParams) -> Self {
        let state = if params.connected_to(INTEGRATION_TYPE) {
            ConnectState::Connected
        } else {
            ConnectState::Idle
        };
        Self { state }
    }

    pub fn state(&self) -> ConnectState {
        self.state
    }

    /// Start a flow. Returns false, changing nothing, while a flow is
    /// already in progress or the integration is connected.
    pub fn begin(&mut self) -> bool {
        if self.state == ConnectState::Idle {
            self.state = ConnectState::Connecting;
            true
        } else {
            false
        }
    }

    /// Record the outcome of a credential fetch. An empty payload is an
    /// explicit failure: the button returns to Idle, never stays Connecting.
    pub fn finish(&mut self, credentials_present: bool) {
        if self.state == ConnectState::Connecting {
            self.state = if credentials_present {
                ConnectState::Connected
            } else {
                ConnectState::Idle
            };
        }
    }

    /// Abort an in-progress flow, making the button clickable again.
    pub fn fail(&mut self) {
        if self.state == ConnectState::Connecting {
            self.state = ConnectState::Idle;
        }
    }

    /// The render contract: exactly one of three labels.
    pub fn label(&self) -> &'static str {
        match self.state {
            ConnectState::Idle => "Connect to HubSpot",
            ConnectState::Connecting => "Connecting…",
            ConnectState::Connected => "HubSpot Connected",
        }
    }

    pub fn is_clickable(&self) -> bool {
        self.state == ConnectState::Idle
    }
}

/// Run the full connect flow.
pub async fn run(
    config: &Config,
    client: &HubClient,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let params_path = config.params_file();
    let mut params = params::load(&params_path)?;
    let mut button = ConnectButton::from_params(&params);

    if !button.begin() {
        // Already connected: a click is a no-op.
        println!("{}", button.label());
        return Ok(());
    }

    let auth_url = match client.authorize(&config.user, &config.org).await {
        Ok(url) => url,
        Err(e) => {
            button.fail();
            return Err(e);
        }
    };

    tracing::info!(user = %config.user, org = %config.org, "opening authorization popup");
    println!("Opening authorization popup:\n  {auth_url}");
    if let Err(e) = webbrowser::open(&auth_url) {
        tracing::warn!(err = %e, "could not open a browser; open the URL manually");
    }
    println!("{} (complete the authorization in your browser)", button.label());

    match poll_credentials(client, config, &shutdown).await {
        Ok(Some(credentials)) => {
            button.finish(true);
            params.merge_connected(credentials, INTEGRATION_TYPE);
            params::save(&params_path, &params)?;
            tracing::info!(path = %params_path.display(), "credentials stored");
            println!("{}", button.label());
            Ok(())
        }
        Ok(None) => {
            button.finish(false);
            anyhow::bail!("Failed to fetch credentials")
        }
        Err(e) => {
            button.fail();
            Err(e)
        }
    }
}

/// Poll the credentials endpoint at a fixed interval until the popup flow
/// completes, the deadline passes, or the flow is cancelled.
///
/// `Ok(None)` means credentials never appeared: the user closed the popup
/// without authorizing, or cancelled the wait.
async fn poll_credentials(
    client: &HubClient,
    config: &Config,
    shutdown: &CancellationToken,
) -> anyhow::Result<Option<Value>> {
    let interval = config.poll_interval();
    let deadline = config.poll_timeout().map(|t| tokio::time::Instant::now() + t);

    loop {
        if let Some(deadline) = deadline {
            if tokio::time::Instant::now() >= deadline {
                return Ok(None);
            }
        }

        tokio::select! {
            _ = shutdown.cancelled() => return Ok(None),
            _ = tokio::time::sleep(interval) => {}
        }

        if let Some(credentials) = client.credentials(&config.user, &config.org).await? {
            return Ok(Some(credentials));
        }
    }
}

#[cfg(test)]
#[path = "connect_tests.rs"]
mod tests;
