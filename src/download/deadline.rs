//! Wall-clock deadline shared by every hop of one download operation.

use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, error::Elapsed, timeout_at};

/// Absolute point in time after which no further network waiting is permitted.
///
/// Computed once when an operation starts and copied into each attempt; a
/// redirect never resets or extends it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    /// Creates a deadline `timeout_ms` milliseconds from now.
    ///
    /// Zero or negative budgets produce a deadline that is already expired.
    #[must_use]
    pub fn from_timeout_ms(timeout_ms: i64) -> Self {
        let now = Instant::now();
        let at = u64::try_from(timeout_ms)
            .ok()
            .and_then(|ms| now.checked_add(Duration::from_millis(ms)))
            .unwrap_or(now);
        Self { at }
    }

    /// Creates a deadline at the given instant.
    #[must_use]
    pub fn at(at: Instant) -> Self {
        Self { at }
    }

    /// Returns the instant this deadline fires.
    #[must_use]
    pub fn instant(&self) -> Instant {
        self.at
    }

    /// Returns the time left, or `None` once the deadline has passed.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        let left = self.at.saturating_duration_since(Instant::now());
        (!left.is_zero()).then_some(left)
    }

    /// Returns true when no budget is left.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.remaining().is_none()
    }

    /// Awaits `future`, giving up when the deadline fires.
    ///
    /// # Errors
    ///
    /// Returns [`Elapsed`] if the deadline passes first.
    pub async fn run<F>(&self, future: F) -> Result<F::Output, Elapsed>
    where
        F: Future,
    {
        timeout_at(self.at, future).await
    }
}
