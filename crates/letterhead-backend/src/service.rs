//! Service trait for the remote word-processing backend.

use async_trait::async_trait;
use letterhead_core::{MutationBatch, Result, Snapshot};

/// Remote document backend consumed by the structuring pipeline.
///
/// Implementations perform one remote call per method and surface failures
/// as [`letterhead_core::LetterheadError::Backend`] (status >= 500 is
/// transient, everything else fatal) or
/// [`letterhead_core::LetterheadError::Transport`]. Retry and backoff live
/// above this trait, in the pipeline; implementations must not retry.
#[async_trait]
pub trait DocumentService: Send + Sync {
    /// Creates or reuses the named folder, returning its id.
    async fn resolve_folder(&self, name: &str) -> Result<String>;

    /// Creates a new document from rendered markup, returning its id.
    async fn create_document(
        &self,
        title: &str,
        html: &str,
        folder_id: Option<&str>,
    ) -> Result<String>;

    /// Fetches the full structural snapshot of a document.
    ///
    /// Structure created by a preceding [`batch_update`](Self::batch_update)
    /// may not be visible yet; callers that depend on it poll through the
    /// propagation waiter.
    async fn get_document(&self, document_id: &str) -> Result<Snapshot>;

    /// Applies an ordered batch of mutations atomically. The batch either
    /// fully applies or fails as a unit.
    async fn batch_update(&self, document_id: &str, batch: &MutationBatch) -> Result<()>;
}
