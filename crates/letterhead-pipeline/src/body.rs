//! Body-segment enrichment steps.
//!
//! These run before the header/footer layout and are fully contained: a
//! failed batch is logged and skipped, never aborting the document. Only
//! cancellation escapes.

use crate::cancel::CancelToken;
use crate::retry::{self, RetryOutcome};
use letterhead_backend::DocumentService;
use letterhead_core::{IndexRange, Mutation, MutationBatch, NamedStyle, Result, RetryPolicy};
use tracing::{debug, info, warn};

const TOC_HEADING: &str = "Table of Contents\n";

/// Inserts a native table of contents at the top of the body: the ToC
/// element, a heading styled with the heading-2 named style, and a page
/// break after it.
///
/// # Errors
/// Returns [`letterhead_core::LetterheadError::Cancelled`] on cancellation;
/// backend failures are contained.
pub async fn insert_table_of_contents<S: DocumentService + ?Sized>(
    service: &S,
    policy: &RetryPolicy,
    cancel: &CancelToken,
    document_id: &str,
) -> Result<()> {
    let batch = MutationBatch::new(vec![
        Mutation::InsertTableOfContents { index: 1 },
        Mutation::InsertText {
            segment_id: None,
            index: 1,
            text: TOC_HEADING.to_string(),
        },
        Mutation::SetParagraphNamedStyle {
            range: IndexRange {
                start_index: 1,
                end_index: 1 + TOC_HEADING.chars().count() as u32,
            },
            style: NamedStyle::Heading2,
        },
        Mutation::InsertPageBreak { index: 2 },
    ])?;

    let outcome = retry::execute("insert table of contents", &policy.soft(), cancel, || {
        service.batch_update(document_id, &batch)
    })
    .await?;
    match outcome {
        RetryOutcome::Completed(()) => info!("{document_id}: table of contents inserted"),
        RetryOutcome::Skipped(error) => {
            warn!("{document_id}: table of contents skipped: {error}");
        }
    }
    Ok(())
}

/// Marks the first row of every body table as a repeating header row, so
/// table headers carry across page breaks.
///
/// # Errors
/// Returns [`letterhead_core::LetterheadError::Cancelled`] on cancellation;
/// backend failures are contained.
pub async fn repeat_table_headers<S: DocumentService + ?Sized>(
    service: &S,
    policy: &RetryPolicy,
    cancel: &CancelToken,
    document_id: &str,
) -> Result<()> {
    let fetched = retry::execute("fetch body snapshot", &policy.soft(), cancel, || {
        service.get_document(document_id)
    })
    .await?;
    let snapshot = match fetched {
        RetryOutcome::Completed(snapshot) => snapshot,
        RetryOutcome::Skipped(error) => {
            warn!("{document_id}: table header repeat skipped: {error}");
            return Ok(());
        }
    };

    let starts = snapshot.body.table_start_indices();
    if starts.is_empty() {
        debug!("{document_id}: no body tables, header repeat not needed");
        return Ok(());
    }

    let mutations = starts
        .iter()
        .map(|&start| Mutation::SetTableHeaderRow {
            table_start_index: start,
            row_indices: vec![0],
        })
        .collect();
    let batch = MutationBatch::new(mutations)?;

    let outcome = retry::execute("enable repeating table headers", &policy.soft(), cancel, || {
        service.batch_update(document_id, &batch)
    })
    .await?;
    match outcome {
        RetryOutcome::Completed(()) => {
            info!(
                "{document_id}: repeating header row enabled for {} table(s)",
                starts.len()
            );
        }
        RetryOutcome::Skipped(error) => {
            warn!("{document_id}: table header repeat skipped: {error}");
        }
    }
    Ok(())
}
