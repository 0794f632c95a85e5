//! Solana wallet dashboard.
//!
//! ```text
//!                ┌──────────────────────────────────────────────────────┐
//!                │                     DASHBOARD                        │
//!                │                                                      │
//!   Browser /    │  ┌─────────┐   ┌──────────────┐   ┌──────────────┐   │
//!   dashboard-cli┼─▶│  http   │──▶│   wallet     │──▶│   poller     │───┼──▶ Solana
//!   ◀────────────┼──│ server  │   │   session    │   │  supervisor  │   │    JSON-RPC
//!                │  └────┬────┘   └──────────────┘   └──────┬───────┘   │
//!                │       │                                  │           │
//!                │       ▼                                  ▼           │
//!                │  ┌─────────┐   ┌──────────────┐   ┌──────────────┐   │
//!                │  │  view   │◀──│ notifications│◀──│   airdrop    │───┼──▶ faucet
//!                │  └─────────┘   └──────────────┘   └──────────────┘   │
//!                └──────────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use solana_dashboard::config::{load_config, validation::validate_config, DashboardConfig};
use solana_dashboard::ledger::mock::MockLedger;
use solana_dashboard::ledger::types::Cluster;
use solana_dashboard::lifecycle::{spawn_signal_listener, Dashboard, Shutdown};
use solana_dashboard::observability::{logging, metrics};
use solana_dashboard::HttpServer;

#[derive(Parser, Debug)]
#[command(name = "solana-dashboard", version)]
#[command(about = "Wallet balance, recent signatures and airdrops for a Solana cluster")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override server.bind_address
    #[arg(long)]
    bind: Option<String>,

    /// Override ledger.rpc_url
    #[arg(long)]
    rpc_url: Option<String>,

    /// Override ledger.cluster (devnet, testnet, mainnet-beta, localnet)
    #[arg(long)]
    cluster: Option<Cluster>,

    /// Use an in-memory ledger instead of JSON-RPC
    #[arg(long)]
    mock_ledger: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => DashboardConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.server.bind_address = bind;
    }
    if let Some(url) = args.rpc_url {
        config.ledger.rpc_url = Some(url);
    }
    if let Some(cluster) = args.cluster {
        config.ledger.cluster = cluster;
        if !cluster.supports_airdrop() {
            config.airdrop.enabled = false;
        }
    }

    logging::init_logging(&config.observability);
    tracing::info!("solana-dashboard v{} starting", env!("CARGO_PKG_VERSION"));

    if let Err(errors) = validate_config(&config) {
        for e in &errors {
            tracing::error!(error = %e, "Invalid configuration");
        }
        return Err(format!("{} configuration error(s)", errors.len()).into());
    }

    tracing::info!(
        bind_address = %config.server.bind_address,
        cluster = config.ledger.cluster.as_str(),
        interval_ms = config.poller.interval_ms,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics endpoint");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let dashboard = if args.mock_ledger {
        tracing::warn!("Using in-memory ledger; no RPC calls will be made");
        let ledger = MockLedger::with_cluster(config.ledger.cluster);
        Arc::new(Dashboard::new(config.clone(), Arc::new(ledger)))
    } else {
        Arc::new(Dashboard::from_config(config.clone())?)
    };

    let shutdown = Shutdown::new();
    spawn_signal_listener(shutdown.clone());

    let supervisor = dashboard.start(&shutdown).await;

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    let server = HttpServer::new(dashboard.clone(), &config.server);
    server.run(listener, shutdown.subscribe()).await?;

    shutdown.trigger();
    if let Err(e) = supervisor.await {
        tracing::error!(error = %e, "Poll supervisor task failed");
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
