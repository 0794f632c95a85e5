//! Ledger integration subsystem.
//!
//! # Data Flow
//! ```text
//! LedgerConfig (cluster, RPC URL, failovers, commitment)
//!     → client.rs (JSON-RPC calls with timeouts and failover)
//!     → rpc.rs (wire shapes → AccountSnapshot / TransactionRecord)
//!     → confirm.rs (poll signature status until committed)
//! ```
//!
//! # Constraints
//! - The wire protocol is owned by the node; only the fields read are modelled
//! - All RPC calls have configurable timeouts
//! - Graceful degradation when the ledger is unreachable

pub mod client;
pub mod confirm;
pub mod mock;
pub mod rpc;
pub mod types;

pub use client::{Ledger, RpcLedger};
pub use types::{
    AccountSnapshot, Cluster, Commitment, ConfirmationStatus, Identity, LedgerConfig, LedgerError,
    LedgerResult, TransactionRecord, LAMPORTS_PER_SOL,
};

/// Owner of plain wallet accounts.
pub const SYSTEM_PROGRAM_ID: &str = "11111111111111111111111111111111";
