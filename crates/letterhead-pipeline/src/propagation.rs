//! Bounded polling for structural visibility.
//!
//! Structural mutations are accepted synchronously by the backend but become
//! visible to subsequent reads only after a variable replication delay.
//! Polling with a fixed interval bounds the worst case and returns as early
//! as possible; the interval does not grow because the wait is for
//! data-plane replication, not failure recovery.

use crate::cancel::CancelToken;
use crate::retry;
use letterhead_backend::DocumentService;
use letterhead_core::{LetterheadError, Result, RetryPolicy, Snapshot};
use std::time::Duration;
use tracing::debug;

/// Fixed-interval polling settings for the propagation waiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            max_attempts: 10,
        }
    }
}

/// Polls the document snapshot until `predicate` holds.
///
/// Each fetch goes through the backoff executor with a strict policy, so
/// transient read failures are retried without consuming poll attempts.
/// Returns the first satisfying snapshot; never issues more than
/// `settings.max_attempts` polls.
///
/// # Errors
/// Returns [`LetterheadError::PropagationTimeout`] when the predicate never
/// holds within the budget, [`LetterheadError::Cancelled`] on cancellation,
/// and any strict-mode fetch error.
pub async fn wait_for<S, P>(
    service: &S,
    policy: &RetryPolicy,
    cancel: &CancelToken,
    document_id: &str,
    what: &str,
    settings: PollSettings,
    predicate: P,
) -> Result<Snapshot>
where
    S: DocumentService + ?Sized,
    P: Fn(&Snapshot) -> bool,
{
    if settings.max_attempts == 0 {
        return Err(LetterheadError::InvalidPolicy(
            "poll max_attempts must be at least 1".to_string(),
        ));
    }

    let fetch_policy = policy.strict();
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        cancel.ensure_active()?;

        let snapshot = retry::execute("fetch document snapshot", &fetch_policy, cancel, || {
            service.get_document(document_id)
        })
        .await
        .and_then(retry::RetryOutcome::into_result)?;

        if predicate(&snapshot) {
            debug!("{document_id}: {what} visible after {attempt} poll(s)");
            return Ok(snapshot);
        }
        if attempt >= settings.max_attempts {
            return Err(LetterheadError::PropagationTimeout { attempts: attempt });
        }

        debug!(
            "{document_id}: {what} not yet visible, poll {attempt}/{}",
            settings.max_attempts
        );
        cancel.ensure_active()?;
        tokio::time::sleep(settings.interval).await;
    }
}
