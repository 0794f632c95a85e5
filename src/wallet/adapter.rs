//! Wallet adapters.
//!
//! An adapter is the opaque capability "connect, and hand back an identity
//! plus (optionally) a signer". The set of adapter kinds is fixed; what each
//! one connects to is configured per kind.
//!
//! # Security
//! - Private keys are loaded ONLY from environment variables
//! - Keys are never logged or serialized

use async_trait::async_trait;
use ed25519_dalek::SigningKey;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::config::schema::AdapterSource;
use crate::ledger::types::Identity;
use crate::wallet::WalletError;

/// The four supported adapter kinds, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterKind {
    Solflare,
    Phantom,
    Sollet,
    SolletExtension,
}

impl AdapterKind {
    pub const ALL: [AdapterKind; 4] = [
        AdapterKind::Solflare,
        AdapterKind::Phantom,
        AdapterKind::Sollet,
        AdapterKind::SolletExtension,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AdapterKind::Solflare => "solflare",
            AdapterKind::Phantom => "phantom",
            AdapterKind::Sollet => "sollet",
            AdapterKind::SolletExtension => "sollet_extension",
        }
    }

    /// Human-readable name for the connect menu.
    pub fn label(&self) -> &'static str {
        match self {
            AdapterKind::Solflare => "Solflare",
            AdapterKind::Phantom => "Phantom",
            AdapterKind::Sollet => "Sollet",
            AdapterKind::SolletExtension => "Sollet (Extension)",
        }
    }
}

impl fmt::Display for AdapterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AdapterKind {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AdapterKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| WalletError::UnknownAdapter(s.to_string()))
    }
}

/// Signing half of a wallet connection.
pub struct WalletSigner {
    key: SigningKey,
}

impl WalletSigner {
    /// Decode a base58 64-byte keypair (secret ‖ public, Solana convention).
    pub fn from_keypair_base58(encoded: &str) -> Result<Self, WalletError> {
        let bytes = bs58::decode(encoded.trim())
            .into_vec()
            .map_err(|e| WalletError::InvalidKeypair(format!("base58 decode failed: {}", e)))?;
        if bytes.len() != 64 {
            return Err(WalletError::InvalidKeypair(format!(
                "expected 64 bytes, got {}",
                bytes.len()
            )));
        }

        let mut secret = [0u8; 32];
        secret.copy_from_slice(&bytes[..32]);
        let key = SigningKey::from_bytes(&secret);

        if key.verifying_key().as_bytes()[..] != bytes[32..] {
            return Err(WalletError::InvalidKeypair(
                "public half does not match secret key".to_string(),
            ));
        }

        Ok(Self { key })
    }

    pub fn identity(&self) -> Identity {
        Identity::from_bytes(self.key.verifying_key().as_bytes())
    }
}

impl fmt::Debug for WalletSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletSigner")
            .field("identity", &self.identity().short())
            .finish_non_exhaustive()
    }
}

/// Result of a successful connect.
#[derive(Debug, Clone)]
pub struct WalletConnection {
    pub adapter: AdapterKind,
    pub identity: Identity,
    /// `None` for watch-only connections.
    pub signer: Option<Arc<WalletSigner>>,
}

impl WalletConnection {
    pub fn can_sign(&self) -> bool {
        self.signer.is_some()
    }
}

/// A wallet adapter: connect and hand back an identity.
#[async_trait]
pub trait WalletAdapter: Send + Sync {
    fn kind(&self) -> AdapterKind;

    /// Open a connection. Any handshake is the adapter's business.
    async fn connect(&self) -> Result<WalletConnection, WalletError>;
}

/// Adapter backed by configuration: an env-provided keypair or a
/// watch-only public key.
#[derive(Debug, Clone)]
pub struct ConfiguredAdapter {
    kind: AdapterKind,
    source: AdapterSource,
}

impl ConfiguredAdapter {
    pub fn new(kind: AdapterKind, source: AdapterSource) -> Self {
        Self { kind, source }
    }

    /// One adapter per kind; kinds absent from the config get an empty
    /// source and fail to connect.
    pub fn all_from_config(
        sources: &std::collections::BTreeMap<AdapterKind, AdapterSource>,
    ) -> Vec<Arc<dyn WalletAdapter>> {
        AdapterKind::ALL
            .into_iter()
            .map(|kind| {
                let source = sources.get(&kind).cloned().unwrap_or_default();
                Arc::new(ConfiguredAdapter::new(kind, source)) as Arc<dyn WalletAdapter>
            })
            .collect()
    }
}

#[async_trait]
impl WalletAdapter for ConfiguredAdapter {
    fn kind(&self) -> AdapterKind {
        self.kind
    }

    async fn connect(&self) -> Result<WalletConnection, WalletError> {
        if let Some(var) = &self.source.keypair_env {
            let encoded = std::env::var(var).map_err(|_| {
                WalletError::Unavailable(format!("environment variable {} not set", var))
            })?;
            let signer = WalletSigner::from_keypair_base58(&encoded)?;
            let identity = signer.identity();
            return Ok(WalletConnection {
                adapter: self.kind,
                identity,
                signer: Some(Arc::new(signer)),
            });
        }

        if let Some(pubkey) = &self.source.pubkey {
            let identity =
                Identity::parse(pubkey).map_err(|e| WalletError::Unavailable(e.to_string()))?;
            return Ok(WalletConnection {
                adapter: self.kind,
                identity,
                signer: None,
            });
        }

        Err(WalletError::Unavailable(format!("{} is not configured", self.kind.label())))
    }
}
