// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Third-party integration providers.
//!
//! Each provider module owns its authorization flow, token exchange, and
//! item listing. Pending flows and exchanged credentials live in the TTL
//! store under provider-scoped keys.

pub mod hubspot;
pub mod items;
pub mod oauth;

use serde::{Deserialize, Serialize};

/// Store key for a pending authorization, keyed by the OAuth `state` parameter.
pub fn state_key(provider: &str, state: &str) -> String {
    format!("{provider}_state:{state}")
}

/// Store key for exchanged credentials, scoped to an org + user pair.
pub fn credentials_key(provider: &str, org_id: &str, user_id: &str) -> String {
    format!("{provider}_credentials:{org_id}:{user_id}")
}

/// The requester recorded while the user completes the consent screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingAuth {
    pub user_id: String,
    pub org_id: String,
}
