//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config → Ledger → Wallet session → Poll supervisor → Airdrop → HTTP
//!
//! Shutdown (shutdown.rs):
//!     Signal received → HTTP stops accepting → poller stopped → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: config and ledger setup errors are fatal
//! - Auto-connect runs after the supervisor subscribes, so its identity is
//!   picked up like any other transition

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use signals::{shutdown_signal, spawn_signal_listener};
pub use startup::{Dashboard, StartupError};
