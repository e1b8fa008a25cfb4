// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HubSpot CRM provider: authorization, code exchange, credential lookup,
//! and contact listing.

use serde_json::Value;

use crate::events::HubEvent;
use crate::integration::items::IntegrationItem;
use crate::integration::{credentials_key, oauth, state_key, PendingAuth};
use crate::state::HubState;

pub const PROVIDER: &str = "hubspot";

/// Base URL for contact profile links shown to users.
const CONTACT_URL_BASE: &str = "https://app.hubspot.com/contacts";

/// Start an authorization flow: record the requester under a fresh `state`
/// token and return the URL the connect client opens in a popup.
pub async fn authorize(state: &HubState, user_id: &str, org_id: &str) -> anyhow::Result<String> {
    let token = oauth::generate_state();
    let pending = PendingAuth { user_id: user_id.to_owned(), org_id: org_id.to_owned() };
    let key = state_key(PROVIDER, &token);
    state.store.insert(&key, serde_json::to_value(&pending)?, state.config.state_ttl()).await;

    let url = oauth::build_authorize_url(
        &state.config.hubspot_authorize_url,
        &state.config.hubspot_client_id,
        &state.config.hubspot_redirect_uri,
        &state.config.hubspot_scope,
        &token,
    );

    let _ = state.event_tx.send(HubEvent::AuthorizationStarted {
        user: user_id.to_owned(),
        org: org_id.to_owned(),
        provider: PROVIDER.to_owned(),
    });
    Ok(url)
}

/// Consume the pending flow recorded for `auth_state`.
///
/// Returns `None` for unknown or expired states. Each state token is
/// redeemable at most once.
pub async fn take_pending(state: &HubState, auth_state: &str) -> Option<PendingAuth> {
    let value = state.store.remove(&state_key(PROVIDER, auth_state)).await?;
    serde_json::from_value(value).ok()
}

/// Exchange the authorization code and store the full token payload under
/// the requester's credentials key.
pub async fn exchange_and_store(
    state: &HubState,
    pending: &PendingAuth,
    code: &str,
) -> anyhow::Result<()> {
    let exchanged = oauth::exchange_code(
        &state.http,
        &state.config.hubspot_token_url,
        &state.config.hubspot_client_id,
        &state.config.hubspot_client_secret,
        &state.config.hubspot_redirect_uri,
        code,
    )
    .await;

    let token = match exchanged {
        Ok(token) => token,
        Err(e) => {
            let _ = state.event_tx.send(HubEvent::AuthorizationFailed {
                user: pending.user_id.clone(),
                org: pending.org_id.clone(),
                provider: PROVIDER.to_owned(),
                error: e.to_string(),
            });
            return Err(e);
        }
    };

    state
        .store
        .insert(
            &credentials_key(PROVIDER, &pending.org_id, &pending.user_id),
            serde_json::to_value(&token)?,
            state.config.credential_ttl(),
        )
        .await;

    let _ = state.event_tx.send(HubEvent::Connected {
        user: pending.user_id.clone(),
        org: pending.org_id.clone(),
        provider: PROVIDER.to_owned(),
    });
    Ok(())
}

/// Read the stored credentials for an org + user pair, if still live.
///
/// The read is non-destructive; expiry is the TTL's job.
pub async fn credentials(state: &HubState, user_id: &str, org_id: &str) -> Option<Value> {
    state.store.get(&credentials_key(PROVIDER, org_id, user_id)).await
}

/// Fetch CRM contacts with the stored credentials and map them to items.
pub async fn list_items(state: &HubState, credentials: &Value) -> anyhow::Result<Vec<IntegrationItem>> {
    let access_token = credentials
        .get("access_token")
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow::anyhow!("missing access token"))?;

    let url = format!("{}/crm/v3/objects/contacts", state.config.hubspot_api_base);
    let resp = state.http.get(&url).bearer_auth(access_token).send().await?;

    if !resp.status().is_success() {
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        anyhow::bail!("failed to fetch contacts ({status}): {text}");
    }

    let body: Value = resp.json().await?;
    Ok(contact_items(&body))
}

/// Map a contacts API response to [`IntegrationItem`]s.
pub fn contact_items(body: &Value) -> Vec<IntegrationItem> {
    let results = body.get("results").and_then(Value::as_array);
    let Some(results) = results else {
        return Vec::new();
    };

    results
        .iter()
        .map(|contact| {
            let id = contact.get("id").and_then(Value::as_str).map(str::to_owned);
            let props = contact.get("properties");
            let prop = |key: &str| -> Option<String> {
                props
                    .and_then(|p| p.get(key))
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty())
                    .map(str::to_owned)
            };

            let first = prop("firstname").unwrap_or_default();
            let last = prop("lastname").unwrap_or_default();
            let full = format!("{first} {last}");
            let name = match full.trim() {
                "" => "Unnamed Contact".to_owned(),
                trimmed => trimmed.to_owned(),
            };

            IntegrationItem {
                url: id.as_deref().map(|id| format!("{CONTACT_URL_BASE}/{id}")),
                id,
                name,
                creation_time: prop("createdate"),
                last_modified_time: prop("lastmodifieddate"),
                visibility: true,
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "hubspot_tests.rs"]
mod tests;
