//! Startup orchestration.
//!
//! [`Dashboard`] owns every long-lived component and is shared with the
//! HTTP handlers behind an `Arc`.

use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::airdrop::notify::NotificationCenter;
use crate::airdrop::requester::AirdropRequester;
use crate::config::schema::DashboardConfig;
use crate::ledger::client::{Ledger, RpcLedger};
use crate::ledger::types::LedgerError;
use crate::lifecycle::shutdown::Shutdown;
use crate::poller::store::AccountStore;
use crate::poller::supervisor::PollSupervisor;
use crate::view::model::{AirdropFacts, ViewModel};
use crate::wallet::adapter::ConfiguredAdapter;
use crate::wallet::session::WalletSession;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Ledger setup failed: {0}")]
    Ledger(#[from] LedgerError),
}

pub struct Dashboard {
    config: DashboardConfig,
    ledger: Arc<dyn Ledger>,
    session: Arc<WalletSession>,
    supervisor: Arc<PollSupervisor>,
    airdrop: Arc<AirdropRequester>,
    notifications: Arc<NotificationCenter>,
}

impl Dashboard {
    /// Wire the components around an existing ledger.
    pub fn new(config: DashboardConfig, ledger: Arc<dyn Ledger>) -> Self {
        let session = Arc::new(WalletSession::new(
            ConfiguredAdapter::all_from_config(&config.wallet.adapters),
            config.wallet.last_used,
        ));
        let store = Arc::new(AccountStore::new());
        let supervisor = Arc::new(PollSupervisor::new(
            ledger.clone(),
            store,
            config.poller.clone(),
        ));
        let notifications = Arc::new(NotificationCenter::new(config.notifications.capacity));
        let airdrop = Arc::new(AirdropRequester::new(
            ledger.clone(),
            session.clone(),
            notifications.clone(),
            config.airdrop.clone(),
            config.ledger.commitment,
        ));

        Self {
            config,
            ledger,
            session,
            supervisor,
            airdrop,
            notifications,
        }
    }

    /// Wire the components around a JSON-RPC ledger.
    pub fn from_config(config: DashboardConfig) -> Result<Self, StartupError> {
        let ledger = RpcLedger::new(config.ledger.clone())?;
        tracing::info!(
            cluster = config.ledger.cluster.as_str(),
            endpoint = %config.ledger.endpoint(),
            "Ledger client ready"
        );
        Ok(Self::new(config, Arc::new(ledger)))
    }

    /// Start the poll supervisor, then auto-connect if configured.
    ///
    /// Returns the supervisor task; it ends when `shutdown` triggers.
    pub async fn start(&self, shutdown: &Shutdown) -> JoinHandle<()> {
        let task = tokio::spawn(
            self.supervisor
                .clone()
                .run(self.session.subscribe(), shutdown.subscribe()),
        );

        if self.config.wallet.auto_connect {
            if let Some(identity) = self.session.auto_connect().await {
                tracing::info!(identity = %identity.short(), "Auto-connected wallet");
            }
        }

        task
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn ledger(&self) -> &Arc<dyn Ledger> {
        &self.ledger
    }

    pub fn session(&self) -> &Arc<WalletSession> {
        &self.session
    }

    pub fn supervisor(&self) -> &Arc<PollSupervisor> {
        &self.supervisor
    }

    pub fn store(&self) -> &Arc<AccountStore> {
        self.supervisor.store()
    }

    pub fn airdrop(&self) -> &Arc<AirdropRequester> {
        &self.airdrop
    }

    pub fn notifications(&self) -> &Arc<NotificationCenter> {
        &self.notifications
    }

    /// Snapshot of everything the page shows.
    pub fn view_model(&self) -> ViewModel {
        let session = self.session.state();
        let account = self.store().load();
        ViewModel::build(
            self.ledger.cluster().as_str(),
            &session,
            &self.session.adapters(),
            self.session.selected(),
            account.as_deref(),
            AirdropFacts {
                enabled: self.airdrop.enabled(),
                busy: self.airdrop.is_busy(),
                lamports: self.config.airdrop.lamports,
            },
            self.notifications.list(),
        )
    }
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("cluster", &self.ledger.cluster())
            .field("session", &self.session)
            .field("supervisor", &self.supervisor)
            .finish()
    }
}
