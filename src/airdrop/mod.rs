//! Airdrop subsystem.
//!
//! # Data Flow
//! ```text
//! POST /api/airdrop
//!     → requester.rs (busy flag, requestAirdrop, confirmation wait)
//!     → on failure: notify.rs ("Airdrop failed" / "unknown error")
//!     → on success: nothing; the next poll shows the new balance
//! ```

pub mod notify;
pub mod requester;

pub use notify::{Notification, NotificationCenter, NotificationLevel};
pub use requester::{AirdropError, AirdropReceipt, AirdropRequester, AirdropState};
