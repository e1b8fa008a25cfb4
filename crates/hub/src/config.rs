// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

/// Configuration for the integrations hub.
#[derive(Debug, Clone, clap::Parser)]
#[command(name = "integhub", version, about = "OAuth connection hub for CRM integrations")]
pub struct HubConfig {
    /// Host to bind on.
    #[arg(long, default_value = "127.0.0.1", env = "INTEG_HUB_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 8000, env = "INTEG_HUB_PORT")]
    pub port: u16,

    /// Bearer token for API auth. If unset, auth is disabled.
    #[arg(long, env = "INTEG_HUB_AUTH_TOKEN")]
    pub auth_token: Option<String>,

    /// HubSpot OAuth client ID.
    #[arg(long, env = "INTEG_HUBSPOT_CLIENT_ID")]
    pub hubspot_client_id: String,

    /// HubSpot OAuth client secret.
    #[arg(long, env = "INTEG_HUBSPOT_CLIENT_SECRET")]
    pub hubspot_client_secret: String,

    /// Redirect URI registered with HubSpot for the OAuth callback.
    #[arg(
        long,
        env = "INTEG_HUBSPOT_REDIRECT_URI",
        default_value = "http://localhost:8000/integrations/hubspot/oauth2callback"
    )]
    pub hubspot_redirect_uri: String,

    /// Scopes requested during authorization.
    #[arg(long, env = "INTEG_HUBSPOT_SCOPE", default_value = "oauth crm.objects.contacts.read")]
    pub hubspot_scope: String,

    /// HubSpot authorization endpoint.
    #[arg(
        long,
        env = "INTEG_HUBSPOT_AUTHORIZE_URL",
        default_value = "https://app.hubspot.com/oauth/authorize"
    )]
    pub hubspot_authorize_url: String,

    /// HubSpot token endpoint.
    #[arg(
        long,
        env = "INTEG_HUBSPOT_TOKEN_URL",
        default_value = "https://api.hubapi.com/oauth/v1/token"
    )]
    pub hubspot_token_url: String,

    /// HubSpot API base URL (contact listing).
    #[arg(long, env = "INTEG_HUBSPOT_API_BASE", default_value = "https://api.hubapi.com")]
    pub hubspot_api_base: String,

    /// Pending authorization TTL in seconds.
    #[arg(long, default_value_t = 600, env = "INTEG_HUB_STATE_TTL_SECS")]
    pub state_ttl_secs: u64,

    /// Stored credential TTL in seconds.
    #[arg(long, default_value_t = 600, env = "INTEG_HUB_CREDENTIAL_TTL_SECS")]
    pub credential_ttl_secs: u64,

    /// Expired-entry sweep interval in milliseconds.
    #[arg(long, default_value_t = 30000, env = "INTEG_HUB_SWEEP_MS")]
    pub sweep_ms: u64,

    /// Log format (json or text).
    #[arg(long, default_value = "text", env = "INTEG_HUB_LOG_FORMAT")]
    pub log_format: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "INTEG_HUB_LOG_LEVEL")]
    pub log_level: String,
}

impl HubConfig {
    pub fn state_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.state_ttl_secs)
    }

    pub fn credential_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.credential_ttl_secs)
    }

    pub fn sweep_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.sweep_ms)
    }
}
