//! Wallet session state.
//!
//! # States
//! - Disconnected: no identity
//! - Connecting: an adapter handshake is in flight, still no identity
//! - Connected: identity (and possibly a signer) available
//!
//! # State Transitions
//! ```text
//! Disconnected → Connecting: connect() with a selected adapter
//! Connecting → Connected: adapter returned a connection
//! Connecting → Disconnected: adapter failed
//! Connected → Disconnected: disconnect(), or connect() to another adapter
//! ```
//!
//! Every transition is published on a watch channel; the poll supervisor is
//! the main subscriber.

use arc_swap::ArcSwapOption;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};

use crate::ledger::types::Identity;
use crate::wallet::adapter::{AdapterKind, WalletAdapter, WalletConnection};
use crate::wallet::WalletError;

/// Connection state of the session.
#[derive(Debug, Clone, Default)]
pub enum SessionState {
    #[default]
    Disconnected,
    Connecting(AdapterKind),
    Connected(WalletConnection),
}

impl SessionState {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            SessionState::Connected(conn) => Some(&conn.identity),
            _ => None,
        }
    }

    pub fn is_connecting(&self) -> bool {
        matches!(self, SessionState::Connecting(_))
    }
}

/// Holds the adapter list, the selected adapter and the live connection.
pub struct WalletSession {
    adapters: Vec<Arc<dyn WalletAdapter>>,
    selected: ArcSwapOption<AdapterKind>,
    last_used: ArcSwapOption<AdapterKind>,
    state: watch::Sender<SessionState>,
    /// Serializes connect/disconnect so transitions never interleave.
    transition: Mutex<()>,
}

impl WalletSession {
    /// Create a session over a fixed adapter list.
    ///
    /// `last_used` seeds both the selection and auto-connect.
    pub fn new(adapters: Vec<Arc<dyn WalletAdapter>>, last_used: Option<AdapterKind>) -> Self {
        let (state, _) = watch::channel(SessionState::Disconnected);
        Self {
            adapters,
            selected: ArcSwapOption::from(last_used.map(Arc::new)),
            last_used: ArcSwapOption::from(last_used.map(Arc::new)),
            state,
            transition: Mutex::new(()),
        }
    }

    /// Adapter kinds available, in display order.
    pub fn adapters(&self) -> Vec<AdapterKind> {
        self.adapters.iter().map(|a| a.kind()).collect()
    }

    fn adapter(&self, kind: AdapterKind) -> Result<&Arc<dyn WalletAdapter>, WalletError> {
        self.adapters
            .iter()
            .find(|a| a.kind() == kind)
            .ok_or_else(|| WalletError::UnknownAdapter(kind.to_string()))
    }

    /// Choose the adapter `connect()` will use.
    pub fn select(&self, kind: AdapterKind) -> Result<(), WalletError> {
        self.adapter(kind)?;
        self.selected.store(Some(Arc::new(kind)));
        tracing::debug!(adapter = %kind, "Wallet adapter selected");
        Ok(())
    }

    pub fn selected(&self) -> Option<AdapterKind> {
        self.selected.load().as_deref().copied()
    }

    /// Adapter of the last successful connection in this process.
    pub fn last_used(&self) -> Option<AdapterKind> {
        self.last_used.load().as_deref().copied()
    }

    /// Connect through the selected adapter.
    pub async fn connect(&self) -> Result<Identity, WalletError> {
        let kind = self.selected().ok_or(WalletError::NoAdapterSelected)?;
        self.open(kind).await
    }

    /// Select `kind` and connect through it.
    pub async fn connect_with(&self, kind: AdapterKind) -> Result<Identity, WalletError> {
        self.select(kind)?;
        self.open(kind).await
    }

    async fn open(&self, kind: AdapterKind) -> Result<Identity, WalletError> {
        let _guard = self.transition.lock().await;
        let adapter = self.adapter(kind)?.clone();

        // Identity is cleared before a new handshake starts.
        self.state.send_replace(SessionState::Connecting(kind));

        match adapter.connect().await {
            Ok(conn) => {
                let identity = conn.identity.clone();
                tracing::info!(
                    adapter = %kind,
                    identity = %identity.short(),
                    can_sign = conn.can_sign(),
                    "Wallet connected"
                );
                self.last_used.store(Some(Arc::new(kind)));
                self.state.send_replace(SessionState::Connected(conn));
                Ok(identity)
            }
            Err(e) => {
                self.state.send_replace(SessionState::Disconnected);
                Err(e)
            }
        }
    }

    /// Drop the connection. No-op when already disconnected.
    pub async fn disconnect(&self) {
        let _guard = self.transition.lock().await;
        let previous = self.state.send_replace(SessionState::Disconnected);
        if let Some(identity) = previous.identity() {
            tracing::info!(identity = %identity.short(), "Wallet disconnected");
        }
    }

    /// Silently reconnect the last-used adapter.
    ///
    /// Failure leaves the session disconnected and is only logged at debug
    /// level; nothing is surfaced to the user.
    pub async fn auto_connect(&self) -> Option<Identity> {
        let kind = self.last_used()?;
        match self.connect_with(kind).await {
            Ok(identity) => Some(identity),
            Err(e) => {
                tracing::debug!(adapter = %kind, error = %e, "Auto-connect failed");
                None
            }
        }
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.state.borrow().identity().cloned()
    }

    /// Watch session transitions.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }
}

impl std::fmt::Debug for WalletSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletSession")
            .field("adapters", &self.adapters())
            .field("selected", &self.selected())
            .field("state", &*self.state.borrow())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::AdapterSource;
    use crate::wallet::adapter::ConfiguredAdapter;
    use std::collections::BTreeMap;

    const KEY_A: &str = "11111111111111111111111111111111";
    const KEY_B: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";

    fn build_session(last_used: Option<AdapterKind>) -> WalletSession {
        let mut sources = BTreeMap::new();
        sources.insert(
            AdapterKind::Phantom,
            AdapterSource { keypair_env: None, pubkey: Some(KEY_A.into()) },
        );
        sources.insert(
            AdapterKind::Solflare,
            AdapterSource { keypair_env: None, pubkey: Some(KEY_B.into()) },
        );
        WalletSession::new(ConfiguredAdapter::all_from_config(&sources), last_used)
    }

    #[tokio::test]
    async fn test_connect_requires_selection() {
        let session = build_session(None);
        assert!(matches!(session.connect().await, Err(WalletError::NoAdapterSelected)));
        assert!(session.identity().is_none());
    }

    #[tokio::test]
    async fn test_connect_and_disconnect() {
        let session = build_session(None);
        let mut rx = session.subscribe();

        session.select(AdapterKind::Phantom).unwrap();
        let identity = session.connect().await.unwrap();
        assert_eq!(identity.as_str(), KEY_A);
        assert_eq!(session.identity(), Some(identity));
        assert_eq!(session.last_used(), Some(AdapterKind::Phantom));
        assert!(rx.has_changed().unwrap());
        rx.borrow_and_update();

        session.disconnect().await;
        assert!(session.identity().is_none());
        assert!(rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_switching_adapter_replaces_identity() {
        let session = build_session(None);
        session.connect_with(AdapterKind::Phantom).await.unwrap();
        let identity = session.connect_with(AdapterKind::Solflare).await.unwrap();
        assert_eq!(identity.as_str(), KEY_B);
        assert_eq!(session.selected(), Some(AdapterKind::Solflare));
    }

    #[tokio::test]
    async fn test_failed_connect_leaves_disconnected() {
        let session = build_session(None);
        session.connect_with(AdapterKind::Phantom).await.unwrap();

        // Sollet has no source configured.
        let err = session.connect_with(AdapterKind::Sollet).await.unwrap_err();
        assert!(matches!(err, WalletError::Unavailable(_)));
        assert!(session.identity().is_none());
        assert_eq!(session.last_used(), Some(AdapterKind::Phantom));
    }

    #[tokio::test]
    async fn test_auto_connect_success() {
        let session = build_session(Some(AdapterKind::Solflare));
        let identity = session.auto_connect().await.unwrap();
        assert_eq!(identity.as_str(), KEY_B);
    }

    #[tokio::test]
    async fn test_auto_connect_failure_is_silent() {
        let session = build_session(Some(AdapterKind::SolletExtension));
        assert!(session.auto_connect().await.is_none());
        assert!(matches!(session.state(), SessionState::Disconnected));

        // No last-used adapter: nothing attempted.
        assert!(build_session(None).auto_connect().await.is_none());
    }
}
