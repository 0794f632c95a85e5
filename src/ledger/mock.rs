//! In-memory ledger for tests and offline demos.
//!
//! Balances and signature lists are set directly; airdrops can confirm,
//! be rejected, or be held until released so callers can observe the
//! in-flight state.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::Notify;

use crate::ledger::client::Ledger;
use crate::ledger::types::{
    AccountSnapshot, Cluster, Commitment, ConfirmationStatus, Identity, LedgerError, LedgerResult,
    TransactionRecord,
};

/// How the mock answers `requestAirdrop`.
#[derive(Debug, Clone)]
pub enum AirdropBehavior {
    /// Credit the account and confirm immediately.
    Confirm,
    /// Fail the request with the given error.
    Reject(LedgerError),
    /// Wait for [`MockLedger::release_airdrop`], then behave like `Confirm`.
    Hold,
}

#[derive(Debug)]
struct MockState {
    accounts: HashMap<Identity, AccountSnapshot>,
    signatures: HashMap<Identity, Vec<String>>,
    statuses: HashMap<String, VecDeque<ConfirmationStatus>>,
    account_error: Option<LedgerError>,
    signatures_error: Option<LedgerError>,
    airdrop: AirdropBehavior,
    healthy: bool,
    airdrop_seq: u64,
}

/// Signatures kept per identity; older airdrops are forgotten.
pub const MAX_SIGNATURE_HISTORY: usize = 1000;

#[derive(Clone)]
pub struct MockLedger {
    cluster: Cluster,
    state: Arc<Mutex<MockState>>,
    release: Arc<Notify>,
    account_calls: Arc<AtomicUsize>,
    signature_calls: Arc<AtomicUsize>,
    airdrop_calls: Arc<AtomicUsize>,
    status_calls: Arc<AtomicUsize>,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::with_cluster(Cluster::Devnet)
    }

    pub fn with_cluster(cluster: Cluster) -> Self {
        Self {
            cluster,
            state: Arc::new(Mutex::new(MockState {
                accounts: HashMap::new(),
                signatures: HashMap::new(),
                statuses: HashMap::new(),
                account_error: None,
                signatures_error: None,
                airdrop: AirdropBehavior::Confirm,
                healthy: true,
                airdrop_seq: 0,
            })),
            release: Arc::new(Notify::new()),
            account_calls: Arc::new(AtomicUsize::new(0)),
            signature_calls: Arc::new(AtomicUsize::new(0)),
            airdrop_calls: Arc::new(AtomicUsize::new(0)),
            status_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        // A panicking test thread must not cascade into every other caller.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn set_balance(&self, identity: &Identity, lamports: u64) {
        self.state()
            .accounts
            .insert(identity.clone(), AccountSnapshot::with_lamports(lamports));
    }

    /// Replace the signature list, newest first.
    pub fn set_signatures(&self, identity: &Identity, signatures: Vec<String>) {
        self.state().signatures.insert(identity.clone(), signatures);
    }

    /// Queue statuses for a signature; the last one repeats once reached.
    pub fn push_statuses(&self, signature: &str, statuses: Vec<ConfirmationStatus>) {
        self.state()
            .statuses
            .entry(signature.to_string())
            .or_default()
            .extend(statuses);
    }

    pub fn fail_account_info(&self, error: Option<LedgerError>) {
        self.state().account_error = error;
    }

    pub fn fail_signatures(&self, error: Option<LedgerError>) {
        self.state().signatures_error = error;
    }

    pub fn set_airdrop_behavior(&self, behavior: AirdropBehavior) {
        self.state().airdrop = behavior;
    }

    /// Let one held airdrop proceed.
    pub fn release_airdrop(&self) {
        self.release.notify_one();
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.state().healthy = healthy;
    }

    pub fn account_calls(&self) -> usize {
        self.account_calls.load(Ordering::SeqCst)
    }

    pub fn signature_calls(&self) -> usize {
        self.signature_calls.load(Ordering::SeqCst)
    }

    pub fn airdrop_calls(&self) -> usize {
        self.airdrop_calls.load(Ordering::SeqCst)
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    fn credit_airdrop(&self, identity: &Identity, lamports: u64) -> String {
        let mut state = self.state();
        state.airdrop_seq += 1;
        let seq = state.airdrop_seq;
        let signature = format!("mockAirdrop{}", seq);

        let account = state
            .accounts
            .entry(identity.clone())
            .or_insert_with(|| AccountSnapshot::with_lamports(0));
        account.lamports = account.lamports.saturating_add(lamports);
        account.exists = true;

        let history = state.signatures.entry(identity.clone()).or_default();
        history.insert(0, signature.clone());
        let evicted = history.split_off(history.len().min(MAX_SIGNATURE_HISTORY));
        for old in &evicted {
            state.statuses.remove(old);
        }
        state.statuses.insert(
            signature.clone(),
            VecDeque::from([ConfirmationStatus::Confirmed { slot: seq }]),
        );
        signature
    }
}

impl Default for MockLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MockLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockLedger")
            .field("cluster", &self.cluster)
            .field("account_calls", &self.account_calls())
            .field("airdrop_calls", &self.airdrop_calls())
            .finish()
    }
}

#[async_trait]
impl Ledger for MockLedger {
    fn cluster(&self) -> Cluster {
        self.cluster
    }

    async fn get_account_info(&self, identity: &Identity) -> LedgerResult<AccountSnapshot> {
        self.account_calls.fetch_add(1, Ordering::SeqCst);
        let state = self.state();
        if let Some(err) = &state.account_error {
            return Err(err.clone());
        }
        Ok(state
            .accounts
            .get(identity)
            .cloned()
            .unwrap_or_else(AccountSnapshot::missing))
    }

    async fn get_signatures_for_address(
        &self,
        identity: &Identity,
        limit: usize,
    ) -> LedgerResult<Vec<TransactionRecord>> {
        self.signature_calls.fetch_add(1, Ordering::SeqCst);
        let state = self.state();
        if let Some(err) = &state.signatures_error {
            return Err(err.clone());
        }
        let records = state
            .signatures
            .get(identity)
            .map(|sigs| {
                sigs.iter()
                    .take(limit)
                    .enumerate()
                    .map(|(ordinal, sig)| TransactionRecord {
                        signature: sig.clone(),
                        ordinal,
                        slot: 0,
                        block_time: None,
                        failed: false,
                        confirmation_status: Some(Commitment::Finalized),
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(records)
    }

    async fn request_airdrop(&self, identity: &Identity, lamports: u64) -> LedgerResult<String> {
        self.airdrop_calls.fetch_add(1, Ordering::SeqCst);
        if !self.cluster.supports_airdrop() {
            return Err(LedgerError::AirdropUnsupported(self.cluster));
        }

        let behavior = self.state().airdrop.clone();
        match behavior {
            AirdropBehavior::Confirm => Ok(self.credit_airdrop(identity, lamports)),
            AirdropBehavior::Reject(err) => Err(err),
            AirdropBehavior::Hold => {
                self.release.notified().await;
                Ok(self.credit_airdrop(identity, lamports))
            }
        }
    }

    async fn get_signature_status(
        &self,
        signature: &str,
        _required: Commitment,
    ) -> LedgerResult<ConfirmationStatus> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state();
        let Some(queue) = state.statuses.get_mut(signature) else {
            return Ok(ConfirmationStatus::Pending);
        };
        let status = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        Ok(status.unwrap_or(ConfirmationStatus::Pending))
    }

    async fn is_healthy(&self) -> bool {
        self.state().healthy
    }
}
