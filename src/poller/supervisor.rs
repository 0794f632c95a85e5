//! Session-driven poller lifecycle.
//!
//! # States
//! - Disconnected: no identity, no poller, store empty
//! - Connected: identity known, poller about to start
//! - Polling: exactly one poller running for the identity
//!
//! # State Transitions
//! ```text
//! Disconnected → Connected: session reports an identity
//! Connected → Polling: fresh generation begun, poller spawned
//! Polling → Connected: identity changed (old poller stopped first)
//! Polling → Disconnected: session lost its identity
//! ```

use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, watch, Mutex};

use crate::config::schema::PollerConfig;
use crate::ledger::client::Ledger;
use crate::ledger::types::Identity;
use crate::poller::store::AccountStore;
use crate::poller::task::{AccountPoller, PollerHandle};
use crate::wallet::session::SessionState;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "phase", content = "identity", rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    Disconnected,
    Connected(Identity),
    Polling(Identity),
}

impl SessionPhase {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            SessionPhase::Disconnected => None,
            SessionPhase::Connected(id) | SessionPhase::Polling(id) => Some(id),
        }
    }
}

pub struct PollSupervisor {
    ledger: Arc<dyn Ledger>,
    store: Arc<AccountStore>,
    config: PollerConfig,
    phase: watch::Sender<SessionPhase>,
    handle: Mutex<Option<PollerHandle>>,
    active: Arc<AtomicUsize>,
    spawned: AtomicU64,
}

impl PollSupervisor {
    pub fn new(ledger: Arc<dyn Ledger>, store: Arc<AccountStore>, config: PollerConfig) -> Self {
        let (phase, _) = watch::channel(SessionPhase::Disconnected);
        Self {
            ledger,
            store,
            config,
            phase,
            handle: Mutex::new(None),
            active: Arc::new(AtomicUsize::new(0)),
            spawned: AtomicU64::new(0),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase.borrow().clone()
    }

    pub fn store(&self) -> &Arc<AccountStore> {
        &self.store
    }

    /// Poll loops currently alive.
    pub fn active_pollers(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Poll loops started since creation.
    pub fn pollers_spawned(&self) -> u64 {
        self.spawned.load(Ordering::SeqCst)
    }

    /// Apply one session event.
    pub async fn on_session(&self, state: &SessionState) {
        let mut slot = self.handle.lock().await;

        match state.identity() {
            Some(identity) => {
                if let Some(handle) = slot.as_ref() {
                    if handle.identity() == identity {
                        return;
                    }
                }
                if let Some(old) = slot.take() {
                    tracing::debug!(
                        identity = %old.identity().short(),
                        generation = old.generation(),
                        "Replacing account poller"
                    );
                    old.stop().await;
                }

                self.phase
                    .send_replace(SessionPhase::Connected(identity.clone()));
                let generation = self.store.begin(identity.clone());
                let handle = AccountPoller::new(
                    self.ledger.clone(),
                    self.store.clone(),
                    identity.clone(),
                    generation,
                    self.config.clone(),
                )
                .spawn(self.active.clone());
                self.spawned.fetch_add(1, Ordering::SeqCst);
                *slot = Some(handle);
                self.phase
                    .send_replace(SessionPhase::Polling(identity.clone()));
            }
            None => {
                if let Some(old) = slot.take() {
                    old.stop().await;
                }
                self.store.clear();
                self.phase.send_replace(SessionPhase::Disconnected);
            }
        }
    }

    /// Follow session changes until shutdown.
    pub async fn run(
        self: Arc<Self>,
        mut session: watch::Receiver<SessionState>,
        mut shutdown: broadcast::Receiver<()>,
    ) {
        let initial = session.borrow_and_update().clone();
        self.on_session(&initial).await;

        loop {
            tokio::select! {
                changed = session.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let state = session.borrow_and_update().clone();
                    self.on_session(&state).await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("Poll supervisor received shutdown signal, exiting loop");
                    break;
                }
            }
        }

        self.stop().await;
    }

    /// Stop the running poller, if any.
    pub async fn stop(&self) {
        if let Some(handle) = self.handle.lock().await.take() {
            handle.stop().await;
        }
    }
}

impl std::fmt::Debug for PollSupervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollSupervisor")
            .field("phase", &*self.phase.borrow())
            .field("active_pollers", &self.active_pollers())
            .finish()
    }
}
