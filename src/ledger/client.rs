//! Ledger RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Define the [`Ledger`] seam the poller and airdrop requester call through
//! - Speak Solana JSON-RPC to the configured endpoint and failovers
//! - Handle timeouts and network errors gracefully
//! - Provide health check for ledger connectivity

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use url::Url;

use crate::ledger::rpc::{
    interpret_status, into_records, RpcRequest, RpcResponse, SignatureInfo, SignatureStatus,
    UiAccount, WithContext,
};
use crate::ledger::types::{
    AccountSnapshot, Cluster, Commitment, ConfirmationStatus, Identity, LedgerConfig, LedgerError,
    LedgerResult, TransactionRecord,
};
use crate::observability::metrics;

/// Remote ledger operations consumed by the dashboard.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Cluster this ledger belongs to.
    fn cluster(&self) -> Cluster;

    /// Fetch account state for an identity. A never-funded account is not an error.
    async fn get_account_info(&self, identity: &Identity) -> LedgerResult<AccountSnapshot>;

    /// Most recent confirmed signatures for an identity, newest first.
    async fn get_signatures_for_address(
        &self,
        identity: &Identity,
        limit: usize,
    ) -> LedgerResult<Vec<TransactionRecord>>;

    /// Ask the faucet for `lamports`; returns the airdrop transaction signature.
    async fn request_airdrop(&self, identity: &Identity, lamports: u64) -> LedgerResult<String>;

    /// Current status of one signature measured against `required`.
    async fn get_signature_status(
        &self,
        signature: &str,
        required: Commitment,
    ) -> LedgerResult<ConfirmationStatus>;

    /// Whether the ledger answers its health probe.
    async fn is_healthy(&self) -> bool;
}

/// JSON-RPC ledger client with failover support.
#[derive(Clone)]
pub struct RpcLedger {
    http: reqwest::Client,
    /// Primary endpoint first, then failovers.
    endpoints: Vec<Url>,
    config: LedgerConfig,
    timeout_duration: Duration,
    next_id: Arc<AtomicU64>,
}

impl RpcLedger {
    /// Create a new ledger client.
    ///
    /// The primary endpoint must parse; failover URLs that do not are skipped
    /// with a warning.
    pub fn new(config: LedgerConfig) -> LedgerResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);

        let primary = config.endpoint();
        let primary_url: Url = primary
            .parse()
            .map_err(|e| LedgerError::Rpc(format!("Invalid RPC URL '{}': {}", primary, e)))?;
        let mut endpoints = vec![primary_url];

        for url_str in &config.failover_urls {
            match url_str.parse() {
                Ok(url) => endpoints.push(url),
                Err(_) => tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL"),
            }
        }

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| LedgerError::Rpc(format!("Failed to build HTTP client: {}", e)))?;

        tracing::info!(
            rpc_url = %endpoints[0],
            cluster = %config.cluster,
            failovers = endpoints.len() - 1,
            "Ledger client initialized"
        );

        Ok(Self {
            http,
            endpoints,
            config,
            timeout_duration,
            next_id: Arc::new(AtomicU64::new(1)),
        })
    }

    /// Issue one JSON-RPC call, trying each endpoint in turn.
    ///
    /// Transport errors and timeouts move on to the next endpoint. A JSON-RPC
    /// error object is the node's answer and is returned as is.
    async fn call<R: DeserializeOwned>(&self, method: &str, params: Value) -> LedgerResult<R> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest::new(id, method, params);
        let mut last_error: Option<String> = None;

        for (i, endpoint) in self.endpoints.iter().enumerate() {
            let fut = async {
                let resp = self
                    .http
                    .post(endpoint.clone())
                    .json(&request)
                    .send()
                    .await?
                    .error_for_status()?;
                resp.json::<RpcResponse<R>>().await
            };

            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(resp)) => {
                    if let Some(err) = resp.error {
                        metrics::record_rpc(method, "remote_error");
                        return Err(LedgerError::Remote {
                            code: err.code,
                            message: err.message,
                        });
                    }
                    return match resp.result {
                        Some(result) => {
                            metrics::record_rpc(method, "ok");
                            Ok(result)
                        }
                        None => {
                            metrics::record_rpc(method, "invalid");
                            Err(LedgerError::InvalidResponse(format!(
                                "{} returned neither result nor error",
                                method
                            )))
                        }
                    };
                }
                Ok(Err(e)) => {
                    tracing::warn!(endpoint_idx = i, method, error = %e, "RPC error, trying next endpoint");
                    last_error = Some(e.to_string());
                }
                Err(_) => {
                    tracing::warn!(endpoint_idx = i, method, "RPC timeout, trying next endpoint");
                }
            }
        }

        metrics::record_rpc(method, "failed");
        match last_error {
            Some(e) => Err(LedgerError::Rpc(format!("All RPC endpoints failed: {}", e))),
            None => Err(LedgerError::Timeout(self.config.rpc_timeout_secs)),
        }
    }
}

#[async_trait]
impl Ledger for RpcLedger {
    fn cluster(&self) -> Cluster {
        self.config.cluster
    }

    async fn get_account_info(&self, identity: &Identity) -> LedgerResult<AccountSnapshot> {
        let result: WithContext<Option<UiAccount>> = self
            .call(
                "getAccountInfo",
                json!([
                    identity.as_str(),
                    { "encoding": "base64", "commitment": self.config.commitment.as_str() }
                ]),
            )
            .await?;
        Ok(AccountSnapshot::from(result.value))
    }

    async fn get_signatures_for_address(
        &self,
        identity: &Identity,
        limit: usize,
    ) -> LedgerResult<Vec<TransactionRecord>> {
        // getSignaturesForAddress rejects processed; confirmed is its floor.
        let commitment = self.config.commitment.max(Commitment::Confirmed);
        let infos: Vec<SignatureInfo> = self
            .call(
                "getSignaturesForAddress",
                json!([
                    identity.as_str(),
                    { "limit": limit, "commitment": commitment.as_str() }
                ]),
            )
            .await?;
        Ok(into_records(infos))
    }

    async fn request_airdrop(&self, identity: &Identity, lamports: u64) -> LedgerResult<String> {
        if !self.config.cluster.supports_airdrop() {
            return Err(LedgerError::AirdropUnsupported(self.config.cluster));
        }
        self.call(
            "requestAirdrop",
            json!([
                identity.as_str(),
                lamports,
                { "commitment": self.config.commitment.as_str() }
            ]),
        )
        .await
    }

    async fn get_signature_status(
        &self,
        signature: &str,
        required: Commitment,
    ) -> LedgerResult<ConfirmationStatus> {
        let result: WithContext<Vec<Option<SignatureStatus>>> = self
            .call(
                "getSignatureStatuses",
                json!([[signature], { "searchTransactionHistory": false }]),
            )
            .await?;
        let status = result.value.into_iter().next().flatten();
        Ok(interpret_status(status, required))
    }

    async fn is_healthy(&self) -> bool {
        let healthy = self.call::<String>("getHealth", json!([])).await.is_ok();
        metrics::record_ledger_health(healthy);
        healthy
    }
}

impl std::fmt::Debug for RpcLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcLedger")
            .field("rpc_url", &self.endpoints[0].as_str())
            .field("cluster", &self.config.cluster)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}
