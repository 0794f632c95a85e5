//! Transaction confirmation monitoring.

use std::time::Duration;
use tokio::time::{interval, timeout, MissedTickBehavior};

use crate::ledger::client::Ledger;
use crate::ledger::types::{Commitment, ConfirmationStatus, LedgerError, LedgerResult};

/// Wait for a signature to reach `required` commitment.
///
/// # Arguments
/// * `ledger` - Ledger to poll
/// * `signature` - Transaction signature to monitor
/// * `required` - Commitment level that counts as confirmed
/// * `timeout_secs` - Maximum time to wait for confirmation
/// * `poll_interval` - Delay between status queries
///
/// Returns the slot the transaction landed in. An on-chain error is
/// reported as [`LedgerError::TransactionFailed`].
pub async fn wait_for_confirmation(
    ledger: &dyn Ledger,
    signature: &str,
    required: Commitment,
    timeout_secs: u64,
    poll_interval: Duration,
) -> LedgerResult<u64> {
    let result = timeout(Duration::from_secs(timeout_secs), async {
        let mut ticker = interval(poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            match ledger.get_signature_status(signature, required).await? {
                ConfirmationStatus::Confirmed { slot } => return Ok(slot),
                ConfirmationStatus::Failed(reason) => {
                    return Err(LedgerError::TransactionFailed(reason));
                }
                ConfirmationStatus::Pending => {
                    tracing::debug!(signature, "Transaction pending");
                }
                ConfirmationStatus::Confirming { reached, required } => {
                    tracing::debug!(
                        signature,
                        reached = reached.as_str(),
                        required = required.as_str(),
                        "Waiting for commitment"
                    );
                }
            }
        }
    })
    .await;

    match result {
        Ok(status) => status,
        Err(_) => Err(LedgerError::ConfirmationTimeout(timeout_secs)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::mock::MockLedger;

    #[tokio::test(start_paused = true)]
    async fn test_confirms_after_pending() {
        let ledger = MockLedger::new();
        ledger.push_statuses(
            "sig1",
            vec![
                ConfirmationStatus::Pending,
                ConfirmationStatus::Confirming {
                    reached: Commitment::Processed,
                    required: Commitment::Confirmed,
                },
                ConfirmationStatus::Confirmed { slot: 42 },
            ],
        );

        let slot = wait_for_confirmation(
            &ledger,
            "sig1",
            Commitment::Confirmed,
            30,
            Duration::from_millis(500),
        )
        .await
        .unwrap();
        assert_eq!(slot, 42);
        assert_eq!(ledger.status_calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_on_chain_failure() {
        let ledger = MockLedger::new();
        ledger.push_statuses("sig2", vec![ConfirmationStatus::Failed("InsufficientFunds".into())]);

        let err = wait_for_confirmation(&ledger, "sig2", Commitment::Confirmed, 30, Duration::from_millis(500))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::TransactionFailed(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_when_never_seen() {
        let ledger = MockLedger::new();

        let err = wait_for_confirmation(&ledger, "ghost", Commitment::Confirmed, 5, Duration::from_millis(500))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::ConfirmationTimeout(5)));
    }
}
