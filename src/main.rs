//! Sockrelay - SOCKS5 proxy with hostname rewriting
//!
//! This is the main entry point for the Sockrelay application.

use anyhow::Result;
use clap::Parser;
use sockrelay::config::{Config, Verbosity, DEFAULT_LISTEN_ADDR};
use sockrelay::server::Server;
use tokio::sync::broadcast;
use tracing::{info, trace, warn};
use tracing_subscriber::FmtSubscriber;

/// Sockrelay - SOCKS5 CONNECT proxy with hostname rewriting
#[derive(Parser, Debug)]
#[command(name = "sockrelay")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// ip:port on which the proxy should listen
    #[arg(long, default_value = DEFAULT_LISTEN_ADDR)]
    listen: String,

    /// Hostname rewrites: hostfrom1:hostto1[,hostfrom2:hostto2[...]]
    #[arg(long, default_value = "")]
    rewrite: String,

    /// Verbosity level (0: off, 1: connections, 2: resolution, 3+: payloads)
    #[arg(long, default_value_t = 0)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::from_args(args.listen, &args.rewrite, args.verbose);

    // Setup logging
    setup_logging(config.socks.verbosity)?;

    info!("Sockrelay v{}", sockrelay::VERSION);
    trace!("Rewrite rules: {}", config.socks.rewrites);

    // Exits with status 1 if the address cannot be bound
    let server = Server::bind(&config).await?;

    // Setup shutdown signal
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

    // Handle Ctrl+C and termination signals (cross-platform)
    tokio::spawn(async move {
        wait_for_signal().await;
        let _ = shutdown_tx.send(true);
    });

    server.run(shutdown_rx).await
}

async fn wait_for_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {
                        info!("Received Ctrl+C, shutting down...");
                    }
                    _ = sigterm.recv() => {
                        info!("Received SIGTERM, shutting down...");
                    }
                }
                return;
            }
            Err(e) => warn!("Failed to setup SIGTERM handler: {}", e),
        }
    }

    let _ = tokio::signal::ctrl_c().await;
    info!("Received Ctrl+C, shutting down...");
}

/// Setup logging based on the verbosity level
fn setup_logging(verbosity: Verbosity) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(verbosity.level_filter())
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}
