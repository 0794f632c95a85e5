//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (intervals and timeouts > 0, limits bounded)
//! - Check addresses, URLs and watch-only keys parse
//! - Refuse airdrops on clusters without a faucet
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: DashboardConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::DashboardConfig;
use crate::ledger::types::Identity;

/// Upper bound accepted by getSignaturesForAddress.
pub const MAX_SIGNATURE_LIMIT: usize = 1000;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &DashboardConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "server.bind_address",
            format!("'{}' is not a socket address", config.server.bind_address),
        ));
    }
    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::new("server.request_timeout_secs", "must be greater than 0"));
    }

    let endpoint = config.ledger.endpoint();
    if endpoint.parse::<url::Url>().is_err() {
        errors.push(ValidationError::new(
            "ledger.rpc_url",
            format!("'{}' is not a valid URL", endpoint),
        ));
    }
    for (i, failover) in config.ledger.failover_urls.iter().enumerate() {
        if failover.parse::<url::Url>().is_err() {
            errors.push(ValidationError::new(
                &format!("ledger.failover_urls[{}]", i),
                format!("'{}' is not a valid URL", failover),
            ));
        }
    }
    if config.ledger.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("ledger.rpc_timeout_secs", "must be greater than 0"));
    }

    if config.poller.interval_ms == 0 {
        errors.push(ValidationError::new("poller.interval_ms", "must be greater than 0"));
    }
    if config.poller.signature_limit == 0 || config.poller.signature_limit > MAX_SIGNATURE_LIMIT {
        errors.push(ValidationError::new(
            "poller.signature_limit",
            format!("must be between 1 and {}", MAX_SIGNATURE_LIMIT),
        ));
    }
    if config.poller.max_backoff_ms < config.poller.interval_ms {
        errors.push(ValidationError::new(
            "poller.max_backoff_ms",
            "must not be smaller than poller.interval_ms",
        ));
    }

    if config.airdrop.enabled {
        if !config.ledger.cluster.supports_airdrop() {
            errors.push(ValidationError::new(
                "airdrop.enabled",
                format!("cluster {} has no faucet", config.ledger.cluster),
            ));
        }
        if config.airdrop.lamports == 0 {
            errors.push(ValidationError::new("airdrop.lamports", "must be greater than 0"));
        }
        if config.airdrop.confirm_timeout_secs == 0 {
            errors.push(ValidationError::new("airdrop.confirm_timeout_secs", "must be greater than 0"));
        }
        if config.airdrop.confirm_poll_ms == 0 {
            errors.push(ValidationError::new("airdrop.confirm_poll_ms", "must be greater than 0"));
        }
        // The request and its confirmation must finish inside one HTTP request.
        let airdrop_budget = config
            .airdrop
            .confirm_timeout_secs
            .saturating_add(config.ledger.rpc_timeout_secs);
        if config.server.request_timeout_secs <= airdrop_budget {
            errors.push(ValidationError::new(
                "server.request_timeout_secs",
                format!(
                    "must exceed airdrop.confirm_timeout_secs + ledger.rpc_timeout_secs ({})",
                    airdrop_budget
                ),
            ));
        }
    }

    for (kind, source) in &config.wallet.adapters {
        if let Some(pubkey) = &source.pubkey {
            if let Err(e) = Identity::parse(pubkey) {
                errors.push(ValidationError::new(
                    &format!("wallet.adapters.{}.pubkey", kind),
                    e.to_string(),
                ));
            }
        }
        if let Some(var) = &source.keypair_env {
            if var.trim().is_empty() {
                errors.push(ValidationError::new(
                    &format!("wallet.adapters.{}.keypair_env", kind),
                    "must not be empty",
                ));
            }
        }
    }

    if config.notifications.capacity == 0 {
        errors.push(ValidationError::new("notifications.capacity", "must be greater than 0"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
