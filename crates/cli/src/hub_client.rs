// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP client for the hub API.

use serde_json::Value;

/// Client for one hub instance.
pub struct HubClient {
    base: String,
    auth_token: Option<String>,
    client: reqwest::Client,
}

impl HubClient {
    pub fn new(base_url: &str, auth_token: Option<String>) -> Self {
        Self {
            base: base_url.trim_end_matches('/').to_owned(),
            auth_token,
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .unwrap_or_default(),
        }
    }

    /// `GET /api/v1/health`
    pub async fn health(&self) -> anyhow::Result<Value> {
        let resp = self.client.get(format!("{}/api/v1/health", self.base)).send().await?;
        Ok(resp.error_for_status()?.json().await?)
    }

    /// `POST /integrations/hubspot/authorize` — returns the popup URL.
    pub async fn authorize(&self, user_id: &str, org_id: &str) -> anyhow::Result<String> {
        let resp = self.post_form("/integrations/hubspot/authorize", user_id, org_id).await?;
        expect_json(resp, "Authorization failed").await
    }

    /// `POST /integrations/hubspot/credentials` — returns `None` while the
    /// flow has not completed (or the stored payload expired).
    pub async fn credentials(&self, user_id: &str, org_id: &str) -> anyhow::Result<Option<Value>> {
        let resp = self.post_form("/integrations/hubspot/credentials", user_id, org_id).await?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(expect_json(resp, "Failed to fetch credentials").await?))
    }

    /// `POST /integrations/hubspot/items`
    pub async fn items(&self, user_id: &str, org_id: &str) -> anyhow::Result<Value> {
        let resp = self.post_form("/integrations/hubspot/items", user_id, org_id).await?;
        expect_json(resp, "Failed to fetch items").await
    }

    async fn post_form(
        &self,
        path: &str,
        user_id: &str,
        org_id: &str,
    ) -> anyhow::Result<reqwest::Response> {
        let mut req = self
            .client
            .post(format!("{}{path}", self.base))
            .form(&[("user_id", user_id), ("org_id", org_id)]);
        if let Some(ref token) = self.auth_token {
            req = req.bearer_auth(token);
        }
        Ok(req.send().await?)
    }
}

/// Decode a success body, or surface the server's `error.detail` when
/// present and the fallback message otherwise.
async fn expect_json<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
    fallback: &str,
) -> anyhow::Result<T> {
    if !resp.status().is_success() {
        let text = resp.text().await.unwrap_or_default();
        anyhow::bail!("{}", error_detail(&text).unwrap_or_else(|| fallback.to_owned()));
    }
    Ok(resp.json().await?)
}

/// Extract `error.detail` from a hub error envelope.
fn error_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value.get("error")?.get("detail")?.as_str().map(str::to_owned)
}

#[cfg(test)]
#[path = "hub_client_tests.rs"]
mod tests;
