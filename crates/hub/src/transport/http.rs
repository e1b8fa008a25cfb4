// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP handlers for the hub API.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse};
use axum::{Form, Json};
use serde::{Deserialize, Serialize};

use crate::error::HubError;
use crate::integration::hubspot;
use crate::state::HubState;

/// Page shown in the popup once the callback completes.
const CALLBACK_DONE_HTML: &str = "<html>\n  <h1>HubSpot Auth Complete!</h1>\n  <p>You can close this window now.</p>\n</html>\n";

// -- Request/Response types ---------------------------------------------------

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub entries: usize,
}

/// Form body shared by the authorize, credentials, and items endpoints.
#[derive(Debug, Deserialize)]
pub struct IntegrationForm {
    pub user_id: String,
    pub org_id: String,
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}

// -- Handlers -----------------------------------------------------------------

/// `GET /api/v1/health`
pub async fn health(State(s): State<Arc<HubState>>) -> impl IntoResponse {
    let entries = s.store.len().await;
    Json(HealthResponse { status: "running".to_owned(), entries })
}

/// `POST /integrations/hubspot/authorize` — issue an authorization URL.
pub async fn hubspot_authorize(
    State(s): State<Arc<HubState>>,
    Form(form): Form<IntegrationForm>,
) -> impl IntoResponse {
    match hubspot::authorize(&s, &form.user_id, &form.org_id).await {
        Ok(url) => Json(url).into_response(),
        Err(e) => {
            tracing::error!(err = %e, "failed to issue authorization url");
            HubError::Internal.to_http_response("Authorization failed").into_response()
        }
    }
}

/// `GET /integrations/hubspot/oauth2callback` — the provider's browser redirect.
pub async fn hubspot_oauth2callback(
    State(s): State<Arc<HubState>>,
    Query(query): Query<CallbackQuery>,
) -> axum::response::Response {
    // The provider reports consent-screen failures via `error` query params.
    if let Some(error) = query.error {
        let detail = query.error_description.unwrap_or(error);
        return HubError::BadRequest.to_http_response(detail).into_response();
    }

    let Some(auth_state) = query.state else {
        return HubError::BadRequest.to_http_response("Missing state").into_response();
    };
    let Some(code) = query.code else {
        return HubError::BadRequest.to_http_response("Missing code").into_response();
    };

    let Some(pending) = hubspot::take_pending(&s, &auth_state).await else {
        return HubError::BadRequest.to_http_response("Invalid state parameter").into_response();
    };

    match hubspot::exchange_and_store(&s, &pending, &code).await {
        Ok(()) => Html(CALLBACK_DONE_HTML).into_response(),
        Err(e) => HubError::ProviderError.to_http_response(e.to_string()).into_response(),
    }
}

/// `POST /integrations/hubspot/credentials` — retrieve stored credentials.
pub async fn hubspot_credentials(
    State(s): State<Arc<HubState>>,
    Form(form): Form<IntegrationForm>,
) -> impl IntoResponse {
    match hubspot::credentials(&s, &form.user_id, &form.org_id).await {
        Some(creds) => Json(creds).into_response(),
        None => HubError::CredentialsNotFound
            .to_http_response("No credentials found. Please reauthorize.")
            .into_response(),
    }
}

/// `POST /integrations/hubspot/items` — list CRM contacts as items.
pub async fn hubspot_items(
    State(s): State<Arc<HubState>>,
    Form(form): Form<IntegrationForm>,
) -> impl IntoResponse {
    let Some(creds) = hubspot::credentials(&s, &form.user_id, &form.org_id).await else {
        return HubError::CredentialsNotFound
            .to_http_response("No credentials found. Please reauthorize.")
            .into_response();
    };

    match hubspot::list_items(&s, &creds).await {
        Ok(items) => Json(items).into_response(),
        Err(e) => HubError::ProviderError.to_http_response(e.to_string()).into_response(),
    }
}
