//! routescout server binary
//!
//! Loads configuration, wires the JSON-RPC chain client into the quoting
//! engine, and serves the HTTP API.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use evm_client::RpcClient;
use quoter::QuoteEngine;
use routescout_api::{start_server, AppState};
use routescout_core::AppConfig;

/// Configuration file path override
const CONFIG_ENV: &str = "ROUTESCOUT_CONFIG";

fn load_config() -> anyhow::Result<AppConfig> {
    match std::env::var(CONFIG_ENV) {
        Ok(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config file {}", path))?;
            let config: AppConfig = serde_json::from_str(&raw)
                .with_context(|| format!("parsing config file {}", path))?;
            tracing::info!(path = %path, "loaded configuration");
            Ok(config)
        }
        Err(_) => {
            tracing::info!("no {} set, using built-in presets", CONFIG_ENV);
            Ok(AppConfig::default())
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("routescout=debug".parse().unwrap())
                .add_directive("quoter=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .init();

    tracing::info!("Starting routescout");

    let config = Arc::new(load_config()?);

    let endpoints: HashMap<_, _> = config
        .chains
        .iter()
        .map(|(&chain, chain_cfg)| (chain, chain_cfg.rpc_url.clone()))
        .collect();
    for (chain, url) in &endpoints {
        tracing::info!(chain = %chain, url = %url, "chain endpoint configured");
    }
    let client = Arc::new(RpcClient::new(
        endpoints,
        Duration::from_secs(config.policy.call_timeout_secs),
    ));

    let engine = QuoteEngine::new(client, config.clone());
    let state = AppState::new(engine, config.clone());

    start_server(state).await.context("API server failed")?;
    Ok(())
}
