//! Account polling subsystem.
//!
//! # Data Flow
//! ```text
//! WalletSession (watch of SessionState)
//!     → supervisor.rs (Disconnected → Connected → Polling)
//!     → task.rs (one cancellable loop per identity, 1 s cadence)
//!     → ledger: getAccountInfo + getSignaturesForAddress
//!     → store.rs (generation-tagged latest view)
//!     → view
//! ```
//!
//! # Design Decisions
//! - Identity change stops the old loop before the new one starts
//! - Failed cycles keep the last good data and back off

pub mod store;
pub mod supervisor;
pub mod task;

pub use store::{AccountStore, AccountView, PollStatus};
pub use supervisor::{PollSupervisor, SessionPhase};
pub use task::{AccountPoller, PollerHandle};
