// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end smoke tests that spawn the real `integhub` binary and drive
//! the authorization popup flow over real HTTP, with a mock provider
//! standing in for HubSpot.

use std::process::{Command, Stdio};
use std::time::Duration;

use integ_specs::{cli_binary, ensure_crypto, HubProcess, MockProvider};

const TIMEOUT: Duration = Duration::from_secs(10);

fn token_payload() -> serde_json::Value {
    serde_json::json!({
        "access_token": "abc",
        "refresh_token": "def",
        "expires_in": 1800,
        "token_type": "bearer",
    })
}

async fn start_hub() -> anyhow::Result<HubProcess> {
    ensure_crypto();
    let provider = MockProvider::start(
        token_payload(),
        serde_json::json!({
            "results": [
                { "id": "7", "properties": { "firstname": "Ada", "lastname": "Lovelace" } },
            ]
        }),
    )
    .await?;
    let hub = HubProcess::start(&provider.base_url)?;
    hub.wait_healthy(TIMEOUT).await?;
    Ok(hub)
}

/// Pull the `state` query parameter out of an authorization URL.
fn state_param(url: &str) -> anyhow::Result<String> {
    let start = url
        .find("state=")
        .ok_or_else(|| anyhow::anyhow!("no state parameter in: {url}"))?
        + "state=".len();
    let rest = &url[start..];
    let end = rest.find('&').unwrap_or(rest.len());
    Ok(rest[..end].to_owned())
}

#[tokio::test]
async fn http_health() -> anyhow::Result<()> {
    let hub = start_hub().await?;

    let resp: serde_json::Value =
        reqwest::get(format!("{}/api/v1/health", hub.base_url())).await?.json().await?;

    assert_eq!(resp["status"], "running");
    assert!(resp["entries"].is_number());
    Ok(())
}

#[tokio::test]
async fn credentials_before_connect_returns_404() -> anyhow::Result<()> {
    let hub = start_hub().await?;

    let client = reqwest::Client::new();
    let resp = client
        .post(format!("{}/integrations/hubspot/credentials", hub.base_url()))
        .form(&[("user_id", "user-1"), ("org_id", "org-1")])
        .send()
        .await?;

    assert_eq!(resp.status().as_u16(), 404);
    let body: serde_json::Value = resp.json().await?;
    assert_eq!(body["error"]["detail"], "No credentials found. Please reauthorize.");
    Ok(())
}

#[tokio::test]
async fn authorize_callback_credentials_roundtrip() -> anyhow::Result<()> {
    let hub = start_hub().await?;
    let client = reqwest::Client::new();

    // Authorize: the hub issues a popup URL carrying a fresh state token.
    let auth_url: String = client
        .post(format!("{}/integrations/hubspot/authorize", hub.base_url()))
        .form(&[("user_id", "user-1"), ("org_id", "org-1")])
        .send()
        .await?
        .json()
        .await?;
    assert!(auth_url.contains("client_id=smoke-client-id"));
    let state = state_param(&auth_url)?;

    // Complete the callback like the provider redirect would.
    let resp = client
        .get(format!(
            "{}/integrations/hubspot/oauth2callback?code=auth-code&state={state}",
            hub.base_url()
        ))
        .send()
        .await?;
    assert!(resp.status().is_success());
    assert!(resp.text().await?.contains("You can close this window now."));

    // Credentials are now retrievable for the same user/org pair.
    let creds: serde_json::Value = client
        .post(format!("{}/integrations/hubspot/credentials", hub.base_url()))
        .form(&[("user_id", "user-1"), ("org_id", "org-1")])
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(creds["access_token"], "abc");

    // Items come back mapped through the stored credentials.
    let items: serde_json::Value = client
        .post(format!("{}/integrations/hubspot/items", hub.base_url()))
        .form(&[("user_id", "user-1"), ("org_id", "org-1")])
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(items[0]["name"], "Ada Lovelace");
    Ok(())
}

#[tokio::test]
async fn callback_with_unknown_state_returns_400() -> anyhow::Result<()> {
    let hub = start_hub().await?;

    let resp = reqwest::get(format!(
        "{}/integrations/hubspot/oauth2callback?code=c&state=never-issued",
        hub.base_url()
    ))
    .await?;

    assert_eq!(resp.status().as_u16(), 400);
    let body: serde_json::Value = resp.json().await?;
    assert_eq!(body["error"]["detail"], "Invalid state parameter");
    Ok(())
}

/// The full widget scenario: `integ connect` opens the popup flow, the user
/// completes consent (simulated by hitting the callback), and the shared
/// params file ends up with `{credentials, type: "Hubspot"}` merged in.
#[tokio::test]
async fn connect_cli_end_to_end() -> anyhow::Result<()> {
    let hub = start_hub().await?;

    let dir = tempfile::tempdir()?;
    let params_path = dir.path().join("integrations.json");
    std::fs::write(&params_path, r#"{ "workspace": "acme" }"#)?;
    let stdout_path = dir.path().join("stdout.log");

    let mut child = Command::new(cli_binary())
        .args([
            "--hub-url",
            &hub.base_url(),
            "--user",
            "user-1",
            "--org",
            "org-1",
            "--params-path",
            &params_path.display().to_string(),
            "--poll-timeout-secs",
            "30",
            "connect",
        ])
        // Keep webbrowser from touching the environment's real browser.
        .env("BROWSER", "/bin/true")
        .stdin(Stdio::null())
        .stdout(Stdio::from(std::fs::File::create(&stdout_path)?))
        .stderr(Stdio::null())
        .spawn()?;

    // The connect flow prints the popup URL; read the state token from it.
    let deadline = tokio::time::Instant::now() + TIMEOUT;
    let state = loop {
        if tokio::time::Instant::now() > deadline {
            let _ = child.kill();
            anyhow::bail!("connect never printed the authorization URL");
        }
        let out = std::fs::read_to_string(&stdout_path).unwrap_or_default();
        if let Some(line) = out.lines().find(|l| l.contains("state=")) {
            break state_param(line.trim())?;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    };

    // Simulate the user completing consent in the popup.
    let resp = reqwest::get(format!(
        "{}/integrations/hubspot/oauth2callback?code=auth-code&state={state}",
        hub.base_url()
    ))
    .await?;
    assert!(resp.status().is_success());

    // The poll loop should observe the credentials and exit cleanly.
    let deadline = tokio::time::Instant::now() + TIMEOUT;
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if tokio::time::Instant::now() > deadline {
            let _ = child.kill();
            anyhow::bail!("connect never exited");
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    };
    assert!(status.success(), "connect exited with {status}");

    let out = std::fs::read_to_string(&stdout_path)?;
    assert!(out.contains("HubSpot Connected"), "missing connected label in: {out}");

    // Shared state got the shallow merge, preserving unrelated fields.
    let params = integ::params::load(&params_path)?;
    assert!(params.connected_to("Hubspot"));
    assert_eq!(
        params.credentials.as_ref().and_then(|c| c.get("access_token")),
        Some(&serde_json::json!("abc")),
    );
    assert_eq!(params.extra.get("workspace"), Some(&serde_json::json!("acme")));
    Ok(())
}
