//! The account poll loop for one identity.
//!
//! # Responsibilities
//! - Fetch account info and recent signatures on a fixed interval
//! - Publish results to the [`AccountStore`] under its generation
//! - Back off while the ledger keeps failing
//!
//! A poller is spawned into a [`PollerHandle`]; stopping or dropping the
//! handle ends the task, so one identity never has two loops.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::config::schema::PollerConfig;
use crate::ledger::client::Ledger;
use crate::ledger::types::Identity;
use crate::observability::metrics;
use crate::poller::store::{AccountStore, PollStatus};
use crate::resilience::backoff::PollBackoff;

pub struct AccountPoller {
    ledger: Arc<dyn Ledger>,
    store: Arc<AccountStore>,
    identity: Identity,
    generation: u64,
    config: PollerConfig,
}

impl AccountPoller {
    pub fn new(
        ledger: Arc<dyn Ledger>,
        store: Arc<AccountStore>,
        identity: Identity,
        generation: u64,
        config: PollerConfig,
    ) -> Self {
        Self {
            ledger,
            store,
            identity,
            generation,
            config,
        }
    }

    /// Spawn the loop. `active` counts live loops and is decremented when
    /// the task ends for any reason, including abort.
    pub fn spawn(self, active: Arc<AtomicUsize>) -> PollerHandle {
        let (stop_tx, stop_rx) = oneshot::channel();
        let identity = self.identity.clone();
        let generation = self.generation;

        let guard = ActiveGuard::new(active);
        let join = tokio::spawn(self.run(stop_rx, guard));

        PollerHandle {
            identity,
            generation,
            stop: Some(stop_tx),
            join: Some(join),
        }
    }

    async fn run(self, mut stop: oneshot::Receiver<()>, _active: ActiveGuard) {
        let backoff = PollBackoff::new(&self.config);
        let mut ticker = time::interval(backoff.period());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut failures: u32 = 0;

        tracing::info!(
            identity = %self.identity.short(),
            generation = self.generation,
            interval_ms = self.config.interval_ms,
            "Account poller started"
        );

        loop {
            if failures == 0 {
                tokio::select! {
                    _ = &mut stop => break,
                    _ = ticker.tick() => {}
                }
            } else {
                tokio::select! {
                    _ = &mut stop => break,
                    _ = time::sleep(backoff.delay(failures)) => {}
                }
                ticker.reset();
            }

            tokio::select! {
                _ = &mut stop => break,
                outcome = self.poll_once(failures) => {
                    failures = match outcome {
                        Ok(()) => 0,
                        Err(()) => failures.saturating_add(1),
                    };
                }
            }
        }

        tracing::info!(
            identity = %self.identity.short(),
            generation = self.generation,
            "Account poller stopped"
        );
    }

    /// One cycle: both fetches run concurrently, and each replaces its own
    /// slot only when it succeeds.
    async fn poll_once(&self, failures: u32) -> Result<(), ()> {
        let (account, signatures) = tokio::join!(
            self.ledger.get_account_info(&self.identity),
            self.ledger
                .get_signatures_for_address(&self.identity, self.config.signature_limit),
        );

        let mut errors = Vec::new();
        if let Err(e) = &account {
            errors.push(format!("account: {}", e));
        }
        if let Err(e) = &signatures {
            errors.push(format!("signatures: {}", e));
        }

        let status = if errors.is_empty() {
            PollStatus::Healthy
        } else {
            PollStatus::Degraded {
                consecutive_failures: failures.saturating_add(1),
                last_error: errors.join("; "),
            }
        };

        if let Ok(snapshot) = &account {
            metrics::record_balance(snapshot.lamports);
        }

        let applied = self.store.update(self.generation, |view| {
            if let Ok(snapshot) = account {
                view.snapshot = Some(snapshot);
            }
            if let Ok(records) = signatures {
                view.transactions = Some(records);
            }
            view.status = status.clone();
            view.updated_at = Some(SystemTime::now());
        });

        if !applied {
            tracing::debug!(generation = self.generation, "Discarded stale poll result");
        }

        match status {
            PollStatus::Degraded {
                consecutive_failures,
                last_error,
            } => {
                metrics::record_poll("degraded");
                tracing::warn!(
                    identity = %self.identity.short(),
                    consecutive_failures,
                    error = %last_error,
                    "Poll cycle failed"
                );
                Err(())
            }
            _ => {
                metrics::record_poll("ok");
                if failures > 0 {
                    tracing::info!(identity = %self.identity.short(), "Polling recovered");
                }
                Ok(())
            }
        }
    }
}

/// Owned handle to a running poller.
#[derive(Debug)]
pub struct PollerHandle {
    identity: Identity,
    generation: u64,
    stop: Option<oneshot::Sender<()>>,
    join: Option<JoinHandle<()>>,
}

impl PollerHandle {
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Signal the loop and wait for it to exit.
    pub async fn stop(mut self) {
        if let Some(tx) = self.stop.take() {
            let _ = tx.send(());
        }
        if let Some(join) = self.join.take() {
            if let Err(e) = join.await {
                if !e.is_cancelled() {
                    tracing::error!(error = %e, "Account poller task panicked");
                }
            }
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        if let Some(join) = self.join.take() {
            join.abort();
        }
    }
}

struct ActiveGuard(Arc<AtomicUsize>);

impl ActiveGuard {
    fn new(counter: Arc<AtomicUsize>) -> Self {
        let now = counter.fetch_add(1, Ordering::SeqCst) + 1;
        metrics::set_active_pollers(now);
        Self(counter)
    }
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        let now = self.0.fetch_sub(1, Ordering::SeqCst) - 1;
        metrics::set_active_pollers(now);
    }
}
