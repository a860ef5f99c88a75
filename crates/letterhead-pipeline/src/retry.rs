//! Bounded-retry execution of remote operations.

use crate::cancel::CancelToken;
use letterhead_core::{LetterheadError, Result, RetryMode, RetryPolicy};
use std::future::Future;
use tracing::warn;

/// Outcome of an operation run under a retry policy.
#[derive(Debug)]
pub enum RetryOutcome<T> {
    /// The operation completed within the retry budget.
    Completed(T),
    /// Soft-mode failure: the step should be skipped. Carries the error that
    /// strict mode would have raised.
    Skipped(LetterheadError),
}

impl<T> RetryOutcome<T> {
    /// Converts the outcome back into a plain result.
    ///
    /// Strict policies never produce `Skipped`, so strict call sites chain
    /// this directly after [`execute`].
    ///
    /// # Errors
    /// Returns the carried error for a skipped outcome.
    pub fn into_result(self) -> Result<T> {
        match self {
            Self::Completed(value) => Ok(value),
            Self::Skipped(error) => Err(error),
        }
    }

    /// True if the operation was skipped.
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }
}

/// Runs `op` under `policy`, retrying transient failures with exponential
/// backoff.
///
/// Transient failures (backend status >= 500 and transport errors) sleep the
/// current delay, grow it by the policy multiplier capped at `max_delay`,
/// and retry while attempts remain. Fatal failures end the operation on the
/// first occurrence with zero sleeps: under [`RetryMode::Strict`] they are
/// returned as errors, under [`RetryMode::Soft`] they become
/// [`RetryOutcome::Skipped`]. An exhausted budget raises
/// [`LetterheadError::RetryLimitExceeded`] in strict mode and skips in soft
/// mode. Cancellation is checked before every attempt and sleep and always
/// surfaces as an error, regardless of mode.
///
/// # Errors
/// Returns the fatal or exhausted-budget error under strict mode, and
/// [`LetterheadError::Cancelled`] under either mode.
pub async fn execute<T, F, Fut>(
    label: &str,
    policy: &RetryPolicy,
    cancel: &CancelToken,
    mut op: F,
) -> Result<RetryOutcome<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let policy = policy.validated()?;
    let mut delay = policy.initial_delay;
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        cancel.ensure_active()?;

        let error = match op().await {
            Ok(value) => return Ok(RetryOutcome::Completed(value)),
            Err(error) => error,
        };

        if !error.is_transient() {
            return settle(label, policy.mode, error);
        }
        if attempt >= policy.max_attempts {
            let exhausted = LetterheadError::RetryLimitExceeded {
                attempts: attempt,
                source: Box::new(error),
            };
            return settle(label, policy.mode, exhausted);
        }

        warn!(
            "{label}: transient backend failure (status {:?}), attempt {attempt}/{}, {} attempt(s) left, retrying in {:?}: {error}",
            error.status(),
            policy.max_attempts,
            policy.max_attempts - attempt,
            delay
        );
        cancel.ensure_active()?;
        tokio::time::sleep(delay).await;
        delay = policy.next_delay(delay);
    }
}

/// Final disposition of a failed operation: raise under strict, skip under
/// soft. Cancellation is never converted into a skip.
fn settle<T>(label: &str, mode: RetryMode, error: LetterheadError) -> Result<RetryOutcome<T>> {
    if matches!(error, LetterheadError::Cancelled) {
        return Err(error);
    }
    match mode {
        RetryMode::Strict => Err(error),
        RetryMode::Soft => {
            warn!("{label}: skipping optional step: {error}");
            Ok(RetryOutcome::Skipped(error))
        }
    }
}
