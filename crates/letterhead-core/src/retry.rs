//! Retry policy for remote operations.

use crate::error::{LetterheadError, Result};
use std::time::Duration;

/// How a failure is surfaced once retries are settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryMode {
    /// Failures propagate to the caller as errors.
    #[default]
    Strict,
    /// Failures become a skip signal. Used for optional steps whose failure
    /// must not abort the document.
    Soft,
}

/// Bounded exponential backoff for one remote operation.
///
/// The delay slept before retry `i` is `min(initial_delay * multiplier^i,
/// max_delay)`: non-decreasing and capped. Only transient failures consume
/// the budget; fatal failures end the operation on the spot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
    pub mode: RetryMode,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
            mode: RetryMode::Strict,
        }
    }
}

impl RetryPolicy {
    /// Validates the policy invariants: at least one attempt, a multiplier
    /// that never shrinks the delay, and a cap no smaller than the initial
    /// delay.
    ///
    /// # Errors
    /// Returns [`LetterheadError::InvalidPolicy`] when an invariant is
    /// violated.
    pub fn validated(self) -> Result<Self> {
        if self.max_attempts == 0 {
            return Err(LetterheadError::InvalidPolicy(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        if !self.multiplier.is_finite() || self.multiplier < 1.0 {
            return Err(LetterheadError::InvalidPolicy(format!(
                "multiplier must be finite and >= 1.0, got {}",
                self.multiplier
            )));
        }
        if self.initial_delay > self.max_delay {
            return Err(LetterheadError::InvalidPolicy(
                "initial_delay must not exceed max_delay".to_string(),
            ));
        }
        Ok(self)
    }

    /// Same policy with the given mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: RetryMode) -> Self {
        self.mode = mode;
        self
    }

    /// Same policy in strict mode.
    #[must_use]
    pub const fn strict(self) -> Self {
        self.with_mode(RetryMode::Strict)
    }

    /// Same policy in soft mode.
    #[must_use]
    pub const fn soft(self) -> Self {
        self.with_mode(RetryMode::Soft)
    }

    /// The delay following `current` in the backoff sequence.
    #[must_use]
    pub fn next_delay(&self, current: Duration) -> Duration {
        current.mul_f64(self.multiplier).min(self.max_delay)
    }

    /// Backoff delays slept between attempts, in order. The iterator is
    /// unbounded; the executor takes at most `max_attempts - 1` of them.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        let mut delay = self.initial_delay;
        std::iter::from_fn(move || {
            let current = delay;
            delay = self.next_delay(delay);
            Some(current)
        })
    }
}
