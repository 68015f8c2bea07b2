//! Relay Daemon - forwards log events to chat through registered sessions
//!
//! Loads a TOML configuration, registers the configured sessions, and relays
//! every log event at or above `chat_level` to the configured destination.
//! Each relayed event is also appended to a local log file.
//!
//! # Usage
//!
//! ```bash
//! # Run with the default configuration path
//! relayd
//!
//! # Run with an explicit configuration
//! relayd --config ./relay.toml
//!
//! # Configuration from the environment
//! RELAY_CONFIG=/etc/relay.toml relayd
//!
//! # Enable debug logging
//! RUST_LOG=relayd=debug relayd
//! ```
//!
//! # Signal Handling
//!
//! - SIGTERM/SIGINT: Graceful shutdown

use std::env;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::level_filters::LevelFilter;
use tracing::{error, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use relay_core::Identity;
use relayd::console::ConsoleSession;
use relayd::registry::SessionRegistry;
use relayd::relay::{spawn_relay, DaemonConfig, Layout, LogRelay, WriterSink};

/// Relay daemon - log events to chat
#[derive(Parser, Debug)]
#[command(name = "relayd", version, about)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Resolves the configuration path: flag, then `RELAY_CONFIG`, then the
/// user configuration directory.
fn config_path(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| env::var_os("RELAY_CONFIG").map(PathBuf::from))
        .unwrap_or_else(|| {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("/etc"))
                .join("relay")
                .join("relay.toml")
        })
}

/// Returns the path to the local relay log.
fn log_file_path() -> PathBuf {
    let state_dir = dirs::state_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("relay");
    state_dir.join("relay.log")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let path = config_path(args.config);
    let config = DaemonConfig::load(&path)?;

    let chat_level: LevelFilter = config
        .chat_level
        .parse()
        .with_context(|| format!("Invalid chat_level: {}", config.chat_level))?;

    let log_path = log_file_path();
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent).context("Failed to create state directory")?;
    }
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open {}", log_path.display()))?;

    let registry = Arc::new(SessionRegistry::new());
    let sink = Arc::new(WriterSink::new(log_file, Layout::default()));
    let relay = LogRelay::new(&config.relay, registry.clone(), sink)
        .context("Invalid relay configuration")?;

    let cancel_token = CancellationToken::new();
    let (relay_layer, worker) = spawn_relay(relay, cancel_token.clone());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer().with_filter(
                EnvFilter::from_default_env()
                    .add_directive("relayd=info".parse()?)
                    .add_directive("relay_core=info".parse()?),
            ),
        )
        .with(relay_layer.with_filter(chat_level))
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        pid = process::id(),
        config = %path.display(),
        "Relay daemon starting"
    );

    for session_config in &config.sessions {
        let session = ConsoleSession::new(&session_config.name, Identity::new(session_config.steam_id));
        session.set_connected(session_config.connected);

        if let Err(e) = registry.insert(Arc::new(session)).await {
            warn!(error = %e, "Skipping session");
        }
    }

    if let Err(e) = wait_for_shutdown_signal().await {
        error!(error = %e, "Error waiting for shutdown signal");
    }
    info!("Shutdown signal received");

    cancel_token.cancel();
    if let Err(e) = worker.await {
        error!(error = %e, "Relay worker failed");
    }

    info!("Relay daemon stopped");
    Ok(())
}

/// Waits for a shutdown signal (SIGTERM or SIGINT).
async fn wait_for_shutdown_signal() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;

        tokio::select! {
            _ = sigterm.recv() => {
                info!("Received SIGTERM");
            }
            _ = sigint.recv() => {
                info!("Received SIGINT");
            }
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        info!("Received Ctrl+C");
    }

    Ok(())
}
