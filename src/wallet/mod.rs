//! Wallet session subsystem.
//!
//! # Data Flow
//! ```text
//! WalletConfig (per-kind sources, last-used adapter)
//!     → adapter.rs (four fixed adapter kinds; connect → identity + signer)
//!     → session.rs (selection, connect/disconnect, auto-connect)
//!     → watch channel of SessionState → poll supervisor
//! ```

pub mod adapter;
pub mod session;

use thiserror::Error;

pub use adapter::{AdapterKind, ConfiguredAdapter, WalletAdapter, WalletConnection, WalletSigner};
pub use session::{SessionState, WalletSession};

/// Errors that can occur while opening a wallet connection.
#[derive(Debug, Clone, Error)]
pub enum WalletError {
    /// No adapter of that kind is registered.
    #[error("Unknown wallet adapter: {0}")]
    UnknownAdapter(String),

    /// connect() called before an adapter was selected.
    #[error("No wallet adapter selected")]
    NoAdapterSelected,

    /// The adapter could not produce a connection.
    #[error("Wallet unavailable: {0}")]
    Unavailable(String),

    /// Keypair material is malformed.
    #[error("Invalid keypair: {0}")]
    InvalidKeypair(String),
}
