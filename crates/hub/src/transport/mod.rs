// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP transport for the hub.

pub mod auth;
pub mod http;

use std::sync::Arc;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::state::HubState;

/// Build the axum `Router` with all hub routes.
pub fn build_router(state: Arc<HubState>) -> Router {
    Router::new()
        // Health (no auth)
        .route("/api/v1/health", get(http::health))
        // HubSpot integration
        .route("/integrations/hubspot/authorize", post(http::hubspot_authorize))
        .route("/integrations/hubspot/oauth2callback", get(http::hubspot_oauth2callback))
        .route("/integrations/hubspot/credentials", post(http::hubspot_credentials))
        .route("/integrations/hubspot/items", post(http::hubspot_items))
        // Middleware
        .layer(middleware::from_fn_with_state(state.clone(), auth::auth_layer))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
