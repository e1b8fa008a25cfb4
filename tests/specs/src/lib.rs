// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test harness for end-to-end binary smoke tests.
//!
//! Spawns the real `integhub` binary as a subprocess, plus a mock provider
//! standing in for HubSpot's token and CRM endpoints.

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::Once;
use std::time::Duration;

static CRYPTO_INIT: Once = Once::new();

/// Install the ring crypto provider for reqwest/rustls.
/// Safe to call multiple times — only the first call has effect.
pub fn ensure_crypto() {
    CRYPTO_INIT.call_once(|| {
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}

fn workspace_root() -> PathBuf {
    let manifest = Path::new(env!("CARGO_MANIFEST_DIR"));
    // tests/specs → tests → workspace root
    manifest.parent().and_then(|p| p.parent()).unwrap_or(manifest).to_path_buf()
}

/// Resolve the path to the compiled `integhub` binary.
pub fn hub_binary() -> PathBuf {
    workspace_root().join("target").join("debug").join("integhub")
}

/// Resolve the path to the compiled `integ` binary.
pub fn cli_binary() -> PathBuf {
    workspace_root().join("target").join("debug").join("integ")
}

/// Find a free TCP port by binding to :0 then releasing.
pub fn free_port() -> anyhow::Result<u16> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    Ok(listener.local_addr()?.port())
}

/// A mock provider serving the token and contacts endpoints.
pub struct MockProvider {
    pub base_url: String,
}

impl MockProvider {
    /// Serve fixed token and contacts payloads on an ephemeral port.
    pub async fn start(
        token: serde_json::Value,
        contacts: serde_json::Value,
    ) -> anyhow::Result<Self> {
        use axum::extract::State;
        use axum::routing::{get, post};
        use axum::{Json, Router};

        #[derive(Clone)]
        struct Payloads {
            token: serde_json::Value,
            contacts: serde_json::Value,
        }

        async fn token_handler(State(p): State<Payloads>) -> Json<serde_json::Value> {
            Json(p.token.clone())
        }
        async fn contacts_handler(State(p): State<Payloads>) -> Json<serde_json::Value> {
            Json(p.contacts.clone())
        }

        let router = Router::new()
            .route("/oauth/v1/token", post(token_handler))
            .route("/crm/v3/objects/contacts", get(contacts_handler))
            .with_state(Payloads { token, contacts });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        Ok(Self { base_url: format!("http://{addr}") })
    }
}

/// A running `integhub` process that is killed on drop.
pub struct HubProcess {
    child: Child,
    port: u16,
}

impl HubProcess {
    /// Spawn the hub against a mock provider base URL.
    pub fn start(provider_base: &str) -> anyhow::Result<Self> {
        ensure_crypto();
        let port = free_port()?;
        let redirect = format!("http://127.0.0.1:{port}/integrations/hubspot/oauth2callback");
        let child = Command::new(hub_binary())
            .args([
                "--host",
                "127.0.0.1",
                "--port",
                &port.to_string(),
                "--hubspot-client-id",
                "smoke-client-id",
                "--hubspot-client-secret",
                "smoke-client-secret",
                "--hubspot-redirect-uri",
                &redirect,
                "--hubspot-token-url",
                &format!("{provider_base}/oauth/v1/token"),
                "--hubspot-api-base",
                provider_base,
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        Ok(Self { child, port })
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Poll the health endpoint until the hub responds.
    pub async fn wait_healthy(&self, timeout: Duration) -> anyhow::Result<()> {
        let url = format!("{}/api/v1/health", self.base_url());
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if tokio::time::Instant::now() > deadline {
                anyhow::bail!("hub never became healthy");
            }
            if let Ok(resp) = reqwest::get(&url).await {
                if resp.status().is_success() {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }
}

impl Drop for HubProcess {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
