//! Ledger-facing types and error definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// Re-export LedgerConfig from config module to avoid duplication
pub use crate::config::schema::LedgerConfig;

/// Lamports in one whole SOL.
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// A wallet's public key, base58 encoded.
///
/// Always decodes to exactly 32 bytes; construction goes through
/// [`Identity::parse`] so an invalid key never reaches the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl Identity {
    /// Parse and validate a base58 public key.
    pub fn parse(value: &str) -> Result<Self, LedgerError> {
        let trimmed = value.trim();
        let bytes = bs58::decode(trimmed)
            .into_vec()
            .map_err(|e| LedgerError::InvalidIdentity(format!("base58 decode failed: {e}")))?;

        if bytes.len() != 32 {
            return Err(LedgerError::InvalidIdentity(format!(
                "expected 32 bytes, got {}",
                bytes.len()
            )));
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Build an identity from raw ed25519 public key bytes.
    pub fn from_bytes(bytes: &[u8; 32]) -> Self {
        Self(bs58::encode(bytes).into_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shortened form for log lines (`AbCd…WxYz`).
    pub fn short(&self) -> String {
        if self.0.len() <= 8 {
            return self.0.clone();
        }
        format!("{}…{}", &self.0[..4], &self.0[self.0.len() - 4..])
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Identity {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Identity {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Identity> for String {
    fn from(id: Identity) -> Self {
        id.0
    }
}

/// Solana cluster the dashboard talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Cluster {
    #[default]
    Devnet,
    Testnet,
    MainnetBeta,
    Localnet,
}

impl Cluster {
    /// Public RPC endpoint for the cluster.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Cluster::Devnet => "https://api.devnet.solana.com",
            Cluster::Testnet => "https://api.testnet.solana.com",
            Cluster::MainnetBeta => "https://api.mainnet-beta.solana.com",
            Cluster::Localnet => "http://127.0.0.1:8899",
        }
    }

    /// Only test networks run a faucet.
    pub fn supports_airdrop(&self) -> bool {
        !matches!(self, Cluster::MainnetBeta)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Cluster::Devnet => "devnet",
            Cluster::Testnet => "testnet",
            Cluster::MainnetBeta => "mainnet-beta",
            Cluster::Localnet => "localnet",
        }
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cluster {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "devnet" => Ok(Cluster::Devnet),
            "testnet" => Ok(Cluster::Testnet),
            "mainnet-beta" | "mainnet" => Ok(Cluster::MainnetBeta),
            "localnet" | "localhost" => Ok(Cluster::Localnet),
            other => Err(format!("unknown cluster '{other}'")),
        }
    }
}

/// Commitment level, ordered from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    #[default]
    Confirmed,
    Finalized,
}

impl Commitment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Commitment::Processed => "processed",
            Commitment::Confirmed => "confirmed",
            Commitment::Finalized => "finalized",
        }
    }
}

/// Account state as last reported by the ledger.
///
/// A missing account (never funded) is reported with zero lamports and no
/// owner rather than as an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub lamports: u64,
    pub owner: Option<String>,
    pub executable: bool,
    pub rent_epoch: Option<u64>,
    pub space: Option<u64>,
    /// False when the ledger returned no account for the identity.
    pub exists: bool,
}

impl AccountSnapshot {
    pub fn missing() -> Self {
        Self {
            lamports: 0,
            owner: None,
            executable: false,
            rent_epoch: None,
            space: None,
            exists: false,
        }
    }

    pub fn with_lamports(lamports: u64) -> Self {
        Self {
            lamports,
            owner: Some(crate::ledger::SYSTEM_PROGRAM_ID.to_string()),
            executable: false,
            rent_epoch: None,
            space: Some(0),
            exists: true,
        }
    }
}

/// One entry of the recent-signatures list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub signature: String,
    /// Position in the list returned by the ledger, most recent first.
    pub ordinal: usize,
    pub slot: u64,
    pub block_time: Option<i64>,
    pub failed: bool,
    pub confirmation_status: Option<Commitment>,
}

/// Errors that can occur during ledger operations.
#[derive(Debug, Clone, Error)]
pub enum LedgerError {
    /// Transport-level failure (connect, HTTP status, body decode).
    #[error("RPC error: {0}")]
    Rpc(String),

    /// The node answered with a JSON-RPC error object.
    #[error("RPC error {code}: {message}")]
    Remote { code: i64, message: String },

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Transaction was not confirmed within the allotted time.
    #[error("Transaction not confirmed after {0} seconds")]
    ConfirmationTimeout(u64),

    /// Transaction landed but failed on-chain.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Response did not have the expected shape.
    #[error("Invalid RPC response: {0}")]
    InvalidResponse(String),

    /// Public key is not a 32-byte base58 string.
    #[error("Invalid identity: {0}")]
    InvalidIdentity(String),

    /// Faucet requested on a cluster that has none.
    #[error("Airdrops are not available on {0}")]
    AirdropUnsupported(Cluster),
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Signature status as reported by `getSignatureStatuses`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationStatus {
    /// The node has not seen the signature yet.
    Pending,
    /// Seen, but below the requested commitment.
    Confirming { reached: Commitment, required: Commitment },
    /// Reached the requested commitment.
    Confirmed { slot: u64 },
    /// Landed with an error.
    Failed(String),
}
