//! waynebot-watch: follow a waynebot server's realtime events from a terminal.
//!
//! Connects with the same ticket handshake as the web client, stays
//! connected across drops, and logs every state change and routed event
//! until interrupted.

mod cli;
mod listeners;

use std::process::ExitCode;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;
use waynebot_common::ConfigError;
use waynebot_config::{validation, WaynebotConfig};
use waynebot_realtime::{ConnectionMonitor, EventRouter, RealtimeClient, RealtimeConfig, TokenStore};

use crate::cli::Args;

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();

    // Logging depends on the config file, so load it first and report
    // problems once the subscriber is up.
    let loaded = waynebot_config::load_config(args.config.as_deref());
    let directive = args.log_directive(loaded.as_ref().ok().map(|c| c.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&directive))
                .unwrap_or_else(|_| EnvFilter::new("waynebot=info")),
        )
        .init();

    tracing::info!("waynebot-watch v{} starting", env!("CARGO_PKG_VERSION"));

    match run(args, loaded).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(
    args: Args,
    loaded: Result<WaynebotConfig, ConfigError>,
) -> waynebot_common::Result<()> {
    let mut config = match loaded {
        Ok(config) => config,
        // An explicit path must load; the default location may fall back.
        Err(e) if args.config.is_some() => return Err(e.into()),
        Err(e) => {
            tracing::warn!("Config load failed, using defaults: {e}");
            WaynebotConfig::default()
        }
    };
    args.apply_overrides(&mut config);
    validation::validate(&config)?;

    let tokens = match config.auth.token.clone() {
        Some(token) => TokenStore::with_token(token),
        None => {
            tracing::info!("No token configured, requesting anonymous tickets");
            TokenStore::new()
        }
    };
    let realtime = RealtimeConfig::from(&config);
    tracing::info!(server = %realtime.base_url, "Config loaded");

    let client = RealtimeClient::new(realtime.clone(), Arc::new(tokens))?;
    let router = EventRouter::new(realtime.event_buffer);
    listeners::spawn_all(&router);

    let (state_tx, state_rx) = mpsc::unbounded_channel();
    let connection = client.connect_with_state(router.sink(), move |state| {
        let _ = state_tx.send(state);
    });

    let interrupted = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
        }
    };
    let mut monitor = ConnectionMonitor::new();
    listeners::follow_states(state_rx, &mut monitor, interrupted).await;

    tracing::info!("Shutting down");
    connection.shutdown().await;
    tracing::info!("Shutdown complete");
    Ok(())
}
