//! Retry delays for a failing poll loop.

use rand::Rng;
use std::time::Duration;

use crate::config::schema::PollerConfig;

/// Delay schedule for consecutive failed poll cycles.
///
/// The delay doubles per failure starting from the poll period, never drops
/// below one period and never exceeds `max_backoff_ms` plus jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollBackoff {
    period_ms: u64,
    max_ms: u64,
}

impl PollBackoff {
    pub fn new(config: &PollerConfig) -> Self {
        Self {
            period_ms: config.interval_ms,
            max_ms: config.max_backoff_ms.max(config.interval_ms),
        }
    }

    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }

    /// Delay before the next cycle after `failures` failed cycles in a row.
    ///
    /// Zero failures means the regular period.
    pub fn delay(&self, failures: u32) -> Duration {
        let base = self.base_ms(failures);
        // Up to 10% extra so dashboards sharing a node spread their retries.
        let spread = base / 10;
        let jitter = if failures > 0 && spread > 0 {
            rand::thread_rng().gen_range(0..spread)
        } else {
            0
        };
        Duration::from_millis(base + jitter)
    }

    fn base_ms(&self, failures: u32) -> u64 {
        let doublings = failures.saturating_sub(1).min(63);
        self.period_ms
            .saturating_mul(1u64 << doublings)
            .clamp(self.period_ms, self.max_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backoff(interval_ms: u64, max_backoff_ms: u64) -> PollBackoff {
        PollBackoff::new(&PollerConfig {
            interval_ms,
            max_backoff_ms,
            ..PollerConfig::default()
        })
    }

    #[test]
    fn test_no_failures_is_one_period() {
        assert_eq!(backoff(1000, 30_000).delay(0), Duration::from_secs(1));
    }

    #[test]
    fn test_delay_doubles_then_caps() {
        let b = backoff(1000, 30_000);
        let first = b.delay(1).as_millis();
        assert!((1000..1100).contains(&first));
        let third = b.delay(3).as_millis();
        assert!((4000..4400).contains(&third));
        let capped = b.delay(40).as_millis();
        assert!((30_000..33_000).contains(&capped));
    }

    #[test]
    fn test_never_shorter_than_period() {
        // A cap below the period is raised to the period.
        let b = backoff(1000, 200);
        for failures in 0..5 {
            assert!(b.delay(failures) >= Duration::from_secs(1));
        }
        assert_eq!(b.period(), Duration::from_secs(1));
    }
}
