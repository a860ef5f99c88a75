//! Cooperative cancellation for pipeline runs.

use letterhead_core::{LetterheadError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cancellation token shared between a pipeline run and its controller.
///
/// The pipeline checks the token before every retry attempt, backoff sleep,
/// and propagation poll, so a run aborts between remote calls - never inside
/// a batch, which the backend applies atomically either way.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Errors with [`LetterheadError::Cancelled`] once [`cancel`](Self::cancel)
    /// has been called.
    ///
    /// # Errors
    /// Returns [`LetterheadError::Cancelled`] if the token is cancelled.
    pub fn ensure_active(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(LetterheadError::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_token_is_active() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
        assert!(token.ensure_active().is_ok());
    }

    #[test]
    fn test_cancel_is_sticky_and_shared() {
        let token = CancelToken::new();
        let clone = token.clone();

        clone.cancel();
        clone.cancel();

        assert!(token.is_cancelled());
        assert!(matches!(
            token.ensure_active(),
            Err(LetterheadError::Cancelled)
        ));
    }
}
