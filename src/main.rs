use anyhow::{Context, Result};
use demogg::{CodapBridge, Config, Controller, PopulationFetcher, TerminalSurface};
use reqwest::Client;
use std::sync::Arc;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,demogg=info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();
    info!("startup");

    // ─── 2) configure ────────────────────────────────────────────────
    let config = Config::load().context("loading configuration")?;
    info!(api = %config.api_url, bridge = %config.bridge_url, policy = ?config.insert_failure_policy, "config");

    let client = Client::builder()
        .user_agent(concat!("demogg/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("building HTTP client")?;

    // ─── 3) handshake with the host ──────────────────────────────────
    let controller = Arc::new(Controller::new(
        PopulationFetcher::new(client.clone(), config.api_url.clone()),
        CodapBridge::new(client, config.bridge_url.clone()),
        TerminalSurface::stdout(),
        config.insert_failure_policy,
    ));
    let mut control = controller.initialize().await?;

    // ─── 4) every line on stdin is a button press ────────────────────
    let mut lines = BufReader::new(io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        if line.trim() == "q" {
            break;
        }
        control.press();
    }

    // ─── 5) let in-flight presses finish ─────────────────────────────
    let done = control.settle().await;
    if done.is_empty() {
        warn!("no activation completed");
    }
    info!(activations = done.len(), "all done");
    Ok(())
}
