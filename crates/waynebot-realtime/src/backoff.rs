//! Reconnect delay schedule.

use std::time::Duration;

/// Delay before the first reconnect attempt.
pub const INITIAL_RETRY: Duration = Duration::from_millis(1000);
/// Smallest delay [`Backoff`] will ever return.
pub const MIN_RETRY: Duration = Duration::from_millis(1);
/// Upper bound for the reconnect delay.
pub const MAX_RETRY: Duration = Duration::from_millis(30_000);

/// Doubling reconnect delay with a cap.
///
/// Consecutive failures escalate `initial, 2*initial, 4*initial, ...` up to
/// `max`. Only [`Backoff::reset`] brings the delay back down, which the
/// connection worker calls when a transport opens.
#[derive(Debug, Clone)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    current: Duration,
}

impl Backoff {
    /// `initial` is raised to at least [`MIN_RETRY`] and `max` to at least
    /// `initial`, so retries are always delay-gated.
    pub fn new(initial: Duration, max: Duration) -> Self {
        let initial = initial.max(MIN_RETRY);
        let max = max.max(initial);
        Self {
            initial,
            max,
            current: initial,
        }
    }

    /// The delay the next call to [`Backoff::next_delay`] will return.
    pub fn current(&self) -> Duration {
        self.current
    }

    /// Delay for the retry being scheduled now; the following one doubles.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = self.current.saturating_mul(2).min(self.max);
        delay
    }

    pub fn reset(&mut self) {
        self.current = self.initial;
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(INITIAL_RETRY, MAX_RETRY)
    }
}
