//! Airdrop request flow.
//!
//! # States
//! ```text
//! Idle → Requesting: request() with a connected identity
//! Requesting → Confirmed: faucet signature reached the commitment
//! Requesting → Failed: any error (network, rejection, timeout, on-chain)
//! Confirmed | Failed → Idle: busy flag released
//! ```
//!
//! A request while another is in flight is refused before the ledger is
//! touched. Failures are never retried.

use arc_swap::ArcSwapOption;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;

use crate::airdrop::notify::NotificationCenter;
use crate::config::schema::AirdropConfig;
use crate::ledger::client::Ledger;
use crate::ledger::confirm::wait_for_confirmation;
use crate::ledger::types::{Commitment, Identity, LedgerError, LedgerResult};
use crate::observability::metrics;
use crate::wallet::session::WalletSession;

pub const FAILURE_TITLE: &str = "Airdrop failed";
pub const FAILURE_DESCRIPTION: &str = "unknown error";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AirdropState {
    #[default]
    Idle,
    Requesting,
    Confirmed { signature: String, slot: u64 },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AirdropReceipt {
    pub identity: Identity,
    pub signature: String,
    pub slot: u64,
    pub lamports: u64,
}

#[derive(Debug, Clone, Error)]
pub enum AirdropError {
    #[error("An airdrop is already in flight")]
    Busy,

    #[error("No wallet connected")]
    NotConnected,

    #[error("Airdrops are disabled")]
    Disabled,

    #[error("Airdrop failed: {0}")]
    Failed(#[from] LedgerError),
}

pub struct AirdropRequester {
    ledger: Arc<dyn Ledger>,
    session: Arc<WalletSession>,
    notifications: Arc<NotificationCenter>,
    config: AirdropConfig,
    commitment: Commitment,
    busy: AtomicBool,
    state: watch::Sender<AirdropState>,
    last: ArcSwapOption<AirdropState>,
}

impl AirdropRequester {
    pub fn new(
        ledger: Arc<dyn Ledger>,
        session: Arc<WalletSession>,
        notifications: Arc<NotificationCenter>,
        config: AirdropConfig,
        commitment: Commitment,
    ) -> Self {
        let (state, _) = watch::channel(AirdropState::Idle);
        Self {
            ledger,
            session,
            notifications,
            config,
            commitment,
            busy: AtomicBool::new(false),
            state,
            last: ArcSwapOption::empty(),
        }
    }

    pub fn enabled(&self) -> bool {
        self.config.enabled && self.ledger.cluster().supports_airdrop()
    }

    /// True from submission until confirmation or failure.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> AirdropState {
        self.state.borrow().clone()
    }

    /// Terminal state of the most recent request.
    pub fn last_outcome(&self) -> Option<AirdropState> {
        self.last.load_full().map(|s| (*s).clone())
    }

    /// Request the configured amount for the connected identity and wait
    /// for it to confirm.
    pub async fn request(&self) -> Result<AirdropReceipt, AirdropError> {
        if !self.enabled() {
            return Err(AirdropError::Disabled);
        }
        let identity = self.session.identity().ok_or(AirdropError::NotConnected)?;
        let _busy = BusyGuard::acquire(&self.busy, &self.state).ok_or_else(|| {
            metrics::record_airdrop("busy");
            AirdropError::Busy
        })?;

        tracing::info!(
            identity = %identity.short(),
            lamports = self.config.lamports,
            "Requesting airdrop"
        );

        match self.submit(&identity).await {
            Ok((signature, slot)) => {
                metrics::record_airdrop("confirmed");
                tracing::info!(identity = %identity.short(), %signature, slot, "Airdrop confirmed");
                self.finish(AirdropState::Confirmed {
                    signature: signature.clone(),
                    slot,
                });
                Ok(AirdropReceipt {
                    identity,
                    signature,
                    slot,
                    lamports: self.config.lamports,
                })
            }
            Err(e) => {
                metrics::record_airdrop("failed");
                tracing::error!(identity = %identity.short(), error = %e, "Airdrop failed");
                self.notifications.error(FAILURE_TITLE, FAILURE_DESCRIPTION);
                self.finish(AirdropState::Failed {
                    reason: e.to_string(),
                });
                Err(AirdropError::Failed(e))
            }
        }
    }

    async fn submit(&self, identity: &Identity) -> LedgerResult<(String, u64)> {
        let signature = self
            .ledger
            .request_airdrop(identity, self.config.lamports)
            .await?;
        tracing::debug!(%signature, "Airdrop submitted, awaiting confirmation");

        let slot = wait_for_confirmation(
            self.ledger.as_ref(),
            &signature,
            self.commitment,
            self.config.confirm_timeout_secs,
            Duration::from_millis(self.config.confirm_poll_ms),
        )
        .await?;
        Ok((signature, slot))
    }

    fn finish(&self, outcome: AirdropState) {
        self.last.store(Some(Arc::new(outcome.clone())));
        self.state.send_replace(outcome);
    }
}

impl std::fmt::Debug for AirdropRequester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AirdropRequester")
            .field("lamports", &self.config.lamports)
            .field("busy", &self.is_busy())
            .finish()
    }
}

/// Holds the busy flag; releasing it returns the state to Idle even if the
/// request future is dropped mid-flight.
struct BusyGuard<'a> {
    busy: &'a AtomicBool,
    state: &'a watch::Sender<AirdropState>,
}

impl<'a> BusyGuard<'a> {
    fn acquire(busy: &'a AtomicBool, state: &'a watch::Sender<AirdropState>) -> Option<Self> {
        busy.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()?;
        state.send_replace(AirdropState::Requesting);
        Some(Self { busy, state })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.state.send_replace(AirdropState::Idle);
        self.busy.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::AdapterSource;
    use crate::ledger::mock::{AirdropBehavior, MockLedger};
    use crate::ledger::types::{Cluster, LAMPORTS_PER_SOL};
    use crate::wallet::adapter::{AdapterKind, ConfiguredAdapter};
    use std::collections::BTreeMap;

    const KEY: &str = "11111111111111111111111111111111";

    async fn setup(ledger: &MockLedger, connect: bool) -> (Arc<AirdropRequester>, Arc<NotificationCenter>) {
        let mut sources = BTreeMap::new();
        sources.insert(
            AdapterKind::Phantom,
            AdapterSource {
                keypair_env: None,
                pubkey: Some(KEY.into()),
            },
        );
        let session = Arc::new(WalletSession::new(
            ConfiguredAdapter::all_from_config(&sources),
            None,
        ));
        if connect {
            session.connect_with(AdapterKind::Phantom).await.unwrap();
        }
        let notifications = Arc::new(NotificationCenter::new(10));
        let requester = Arc::new(AirdropRequester::new(
            Arc::new(ledger.clone()),
            session,
            notifications.clone(),
            AirdropConfig::default(),
            Commitment::Confirmed,
        ));
        (requester, notifications)
    }

    #[tokio::test]
    async fn test_confirmed_airdrop() {
        let ledger = MockLedger::new();
        let (requester, notifications) = setup(&ledger, true).await;

        let receipt = requester.request().await.unwrap();
        assert_eq!(receipt.lamports, LAMPORTS_PER_SOL);
        assert_eq!(receipt.identity.as_str(), KEY);
        assert!(!requester.is_busy());
        assert_eq!(requester.state(), AirdropState::Idle);
        assert!(matches!(
            requester.last_outcome(),
            Some(AirdropState::Confirmed { .. })
        ));
        // Success is silent.
        assert!(notifications.list().is_empty());
    }

    #[tokio::test]
    async fn test_busy_while_in_flight() {
        let ledger = MockLedger::new();
        ledger.set_airdrop_behavior(AirdropBehavior::Hold);
        let (requester, _) = setup(&ledger, true).await;

        let first = tokio::spawn({
            let requester = requester.clone();
            async move { requester.request().await }
        });
        while !requester.is_busy() {
            tokio::task::yield_now().await;
        }
        assert_eq!(requester.state(), AirdropState::Requesting);

        let second = requester.request().await;
        assert!(matches!(second, Err(AirdropError::Busy)));
        assert_eq!(ledger.airdrop_calls(), 1);

        ledger.release_airdrop();
        assert!(first.await.unwrap().is_ok());
        assert!(!requester.is_busy());
    }

    #[tokio::test]
    async fn test_rejection_notifies_and_releases() {
        let ledger = MockLedger::new();
        let identity = Identity::parse(KEY).unwrap();
        ledger.set_balance(&identity, 42);
        ledger.set_airdrop_behavior(AirdropBehavior::Reject(LedgerError::Remote {
            code: 429,
            message: "rate limited".into(),
        }));
        let (requester, notifications) = setup(&ledger, true).await;

        let err = requester.request().await.unwrap_err();
        assert!(matches!(err, AirdropError::Failed(_)));
        assert!(!requester.is_busy());

        let list = notifications.list();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].title, FAILURE_TITLE);
        assert_eq!(list[0].description, FAILURE_DESCRIPTION);

        assert_eq!(ledger.get_account_info(&identity).await.unwrap().lamports, 42);
    }

    #[tokio::test]
    async fn test_requires_identity() {
        let ledger = MockLedger::new();
        let (requester, _) = setup(&ledger, false).await;
        assert!(matches!(requester.request().await, Err(AirdropError::NotConnected)));
        assert_eq!(ledger.airdrop_calls(), 0);
    }

    #[tokio::test]
    async fn test_disabled_on_mainnet() {
        let ledger = MockLedger::with_cluster(Cluster::MainnetBeta);
        let (requester, _) = setup(&ledger, true).await;
        assert!(!requester.enabled());
        assert!(matches!(requester.request().await, Err(AirdropError::Disabled)));
    }
}
