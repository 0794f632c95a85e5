//! Solana wallet dashboard library.
//!
//! Connects a wallet, polls its balance and recent signatures once a
//! second, requests devnet/testnet airdrops, and serves the result as a
//! page plus a JSON API.

pub mod airdrop;
pub mod config;
pub mod http;
pub mod ledger;
pub mod lifecycle;
pub mod observability;
pub mod poller;
pub mod resilience;
pub mod view;
pub mod wallet;

pub use config::schema::DashboardConfig;
pub use http::HttpServer;
pub use lifecycle::{Dashboard, Shutdown};
