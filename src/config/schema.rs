//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the dashboard.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ledger::types::{Cluster, Commitment, LAMPORTS_PER_SOL};
use crate::wallet::adapter::AdapterKind;

/// Root configuration for the dashboard.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DashboardConfig {
    /// HTTP server settings.
    pub server: ServerConfig,

    /// Remote ledger settings.
    pub ledger: LedgerConfig,

    /// Account polling settings.
    pub poller: PollerConfig,

    /// Faucet settings.
    pub airdrop: AirdropConfig,

    /// Wallet adapters and auto-connect.
    pub wallet: WalletConfig,

    /// Toast queue settings.
    pub notifications: NotificationConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:3000").
    pub bind_address: String,

    /// Request timeout in seconds. With airdrops enabled it must exceed
    /// `airdrop.confirm_timeout_secs + ledger.rpc_timeout_secs`.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".to_string(),
            request_timeout_secs: 90,
        }
    }
}

/// Ledger integration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Cluster whose public endpoint is used when `rpc_url` is unset.
    pub cluster: Cluster,

    /// Explicit JSON-RPC endpoint URL.
    pub rpc_url: Option<String>,

    /// Failover JSON-RPC endpoint URLs.
    pub failover_urls: Vec<String>,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Commitment used for reads and airdrop confirmation.
    pub commitment: Commitment,
}

impl LedgerConfig {
    /// Primary endpoint: `rpc_url` if set, else the cluster's public one.
    pub fn endpoint(&self) -> String {
        self.rpc_url
            .clone()
            .unwrap_or_else(|| self.cluster.endpoint().to_string())
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            cluster: Cluster::Devnet,
            rpc_url: None,
            failover_urls: Vec::new(),
            rpc_timeout_secs: 10,
            commitment: Commitment::Confirmed,
        }
    }
}

/// Account poller configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PollerConfig {
    /// Polling interval in milliseconds.
    pub interval_ms: u64,

    /// Number of recent signatures fetched per cycle.
    pub signature_limit: usize,

    /// Upper bound for the delay after consecutive failed polls.
    pub max_backoff_ms: u64,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            signature_limit: 10,
            max_backoff_ms: 30_000,
        }
    }
}

/// Airdrop configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AirdropConfig {
    /// Expose the airdrop action.
    pub enabled: bool,

    /// Amount requested per airdrop.
    pub lamports: u64,

    /// Maximum time to wait for the airdrop to confirm.
    pub confirm_timeout_secs: u64,

    /// Delay between confirmation status queries.
    pub confirm_poll_ms: u64,
}

impl Default for AirdropConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            lamports: LAMPORTS_PER_SOL,
            confirm_timeout_secs: 60,
            confirm_poll_ms: 1000,
        }
    }
}

/// Wallet session configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Silently reconnect the last-used adapter on startup.
    pub auto_connect: bool,

    /// Adapter used by auto-connect.
    pub last_used: Option<AdapterKind>,

    /// Where each adapter gets its identity from.
    pub adapters: BTreeMap<AdapterKind, AdapterSource>,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            auto_connect: true,
            last_used: None,
            adapters: BTreeMap::new(),
        }
    }
}

/// Identity source for one adapter.
///
/// `keypair_env` wins over `pubkey` when both are set. Private keys are only
/// ever read from the environment, never from the config file.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AdapterSource {
    /// Environment variable holding a base58 64-byte keypair.
    pub keypair_env: Option<String>,

    /// Watch-only public key.
    pub pubkey: Option<String>,
}

/// Notification (toast) queue configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Maximum number of notifications kept; oldest are evicted first.
    pub capacity: usize,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self { capacity: 20 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
