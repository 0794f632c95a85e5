//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Ledger client, poller, airdrop requester produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters and gauges)
//!
//! Consumers:
//!     → stdout (pretty or JSON-ish fmt layer)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every HTTP span
//! - Metric updates are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
