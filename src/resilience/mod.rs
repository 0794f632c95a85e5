//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Failed poll cycle:
//!     → backoff.rs (delay grows with consecutive failures, capped)
//!     → next cycle retried after the delay
//! ```
//!
//! # Design Decisions
//! - Timeouts live on each RPC call (ledger client)
//! - Jittered backoff keeps many dashboards from retrying in lockstep
//! - Airdrops are never retried

pub mod backoff;

pub use backoff::PollBackoff;
