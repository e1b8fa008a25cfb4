// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::error;

use integ::config::{Command, Config};
use integ::connect::{self, ConnectButton};
use integ::hub_client::HubClient;
use integ::params;

#[tokio::main]
async fn main() {
    let config = Config::parse();

    // reqwest is built without a bundled TLS provider; install ring explicitly.
    let _ = rustls::crypto::ring::default_provider().install_default();

    init_tracing(&config);

    let shutdown = CancellationToken::new();
    spawn_signal_handler(shutdown.clone());

    let client = HubClient::new(&config.hub_url, config.hub_token.clone());

    let result = match config.command {
        Command::Connect => connect::run(&config, &client, shutdown).await,
        Command::Status => status(&config),
        Command::Items => items(&config, &client).await,
    };

    if let Err(e) = result {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn init_tracing(config: &Config) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    match config.log_format.as_str() {
        "json" => {
            fmt::fmt().with_env_filter(filter).json().init();
        }
        _ => {
            fmt::fmt().with_env_filter(filter).init();
        }
    }
}

fn spawn_signal_handler(shutdown: CancellationToken) {
    tokio::spawn(async move {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()).ok();
        let mut sigint =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt()).ok();

        tokio::select! {
            _ = async {
                if let Some(ref mut s) = sigterm { s.recv().await } else { std::future::pending().await }
            } => {
                tracing::info!("received SIGTERM");
                shutdown.cancel();
            }
            _ = async {
                if let Some(ref mut s) = sigint { s.recv().await } else { std::future::pending().await }
            } => {
                tracing::info!("received SIGINT");
                shutdown.cancel();
            }
        }
    });
}

/// `integ status` — show the connection state from the shared params file.
fn status(config: &Config) -> anyhow::Result<()> {
    let params = params::load(&config.params_file())?;
    let button = ConnectButton::from_params(&params);
    println!("{}", button.label());

    if let Some(ref integration_type) = params.integration_type {
        tracing::debug!(integration = %integration_type, "params carry an integration type");
    }
    for key in params.extra.keys() {
        tracing::debug!(field = %key, "params carry an unrelated field");
    }
    Ok(())
}

/// `integ items` — list CRM items through the hub.
async fn items(config: &Config, client: &HubClient) -> anyhow::Result<()> {
    let params = params::load(&config.params_file())?;
    if !params.connected_to(connect::INTEGRATION_TYPE) {
        anyhow::bail!("not connected; run `integ connect` first");
    }

    let items = client.items(&config.user, &config.org).await?;
    let Some(list) = items.as_array() else {
        anyhow::bail!("unexpected items response");
    };

    for item in list {
        let name = item.get("name").and_then(|v| v.as_str()).unwrap_or("<unnamed>");
        match item.get("url").and_then(|v| v.as_str()) {
            Some(url) => println!("{name}\t{url}"),
            None => println!("{name}"),
        }
    }
    tracing::info!(count = list.len(), "items fetched");
    Ok(())
}
