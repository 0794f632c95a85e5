//! Latest account data for the connected identity.
//!
//! Readers never block: the current view sits behind an `ArcSwapOption`.
//! Writers are tagged with the generation handed out by [`AccountStore::begin`];
//! a write carrying an older generation is dropped, so a poller that was
//! superseded mid-fetch cannot overwrite the new identity's data.

use arc_swap::ArcSwapOption;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use crate::ledger::types::{AccountSnapshot, Identity, TransactionRecord};

/// Outcome of the most recent poll cycles.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PollStatus {
    /// No cycle has completed yet.
    #[default]
    Pending,
    Healthy,
    /// Last good data is kept; retries back off.
    Degraded {
        consecutive_failures: u32,
        last_error: String,
    },
}

/// Everything known about one identity's account.
#[derive(Debug, Clone)]
pub struct AccountView {
    pub identity: Identity,
    pub generation: u64,
    /// `None` until the first successful account fetch.
    pub snapshot: Option<AccountSnapshot>,
    /// `None` until the first successful signature fetch.
    pub transactions: Option<Vec<TransactionRecord>>,
    pub status: PollStatus,
    pub updated_at: Option<SystemTime>,
}

impl AccountView {
    fn new(identity: Identity, generation: u64) -> Self {
        Self {
            identity,
            generation,
            snapshot: None,
            transactions: None,
            status: PollStatus::Pending,
            updated_at: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct AccountStore {
    current: ArcSwapOption<AccountView>,
    generation: AtomicU64,
    /// Serializes writers; readers go through `current` only.
    write_lock: Mutex<()>,
}

impl AccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking `identity` with empty data. Returns the generation
    /// that writes for it must carry.
    pub fn begin(&self, identity: Identity) -> u64 {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.current
            .store(Some(Arc::new(AccountView::new(identity, generation))));
        generation
    }

    /// Forget all account data.
    pub fn clear(&self) {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.current.store(None);
    }

    /// Apply `f` to the current view if it still belongs to `generation`.
    ///
    /// Returns false when the write was stale and dropped.
    pub fn update<F>(&self, generation: u64, f: F) -> bool
    where
        F: FnOnce(&mut AccountView),
    {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let Some(current) = self.current.load_full() else {
            return false;
        };
        if current.generation != generation {
            return false;
        }

        let mut next = (*current).clone();
        f(&mut next);
        self.current.store(Some(Arc::new(next)));
        true
    }

    pub fn load(&self) -> Option<Arc<AccountView>> {
        self.current.load_full()
    }

    /// Current view, but only if it belongs to `identity`.
    pub fn view_for(&self, identity: &Identity) -> Option<Arc<AccountView>> {
        self.load().filter(|view| &view.identity == identity)
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}
