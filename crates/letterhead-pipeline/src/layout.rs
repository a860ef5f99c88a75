//! Corporate layout pipeline for one remote document.
//!
//! The builder walks a strictly forward phase sequence: create the
//! header/footer containers, insert a 1x2 layout table into each, wait for
//! the tables to become visible, insert the reference/version/page-number
//! content with its styling, then brand the header with the logo. Each
//! phase is one atomically applied mutation batch with a strict data
//! dependency on the committed state of the phases before it.

use crate::asset::{self, ImageSizePt};
use crate::cancel::CancelToken;
use crate::offsets;
use crate::propagation::{self, PollSettings};
use crate::retry::{self, RetryOutcome};
use letterhead_backend::DocumentService;
use letterhead_core::{
    Alignment, CellBorders, IndexRange, LetterheadError, Mutation, MutationBatch, Result,
    RetryPolicy, Segment, SegmentKind, Snapshot,
};
use std::fmt;
use tracing::{debug, info, warn};

/// Literal token preceding the dynamic page-number field in the footer.
pub const PAGE_NUMBER_TOKEN: &str = "Page ";

/// Default fallback text when the logo cannot be inserted.
pub const FALLBACK_LOGO_TOKEN: &str = "[LOGO]";

/// Stage of the structuring pipeline for one document.
///
/// Transitions are strictly forward; each is gated on the prior phase's
/// mutation batch committing. Phase state is owned by one pipeline run and
/// never shared across documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum PipelinePhase {
    #[default]
    Init,
    StructureCreated,
    TablesInserted,
    ContentInserted,
    Styled,
    Branded,
    Done,
}

impl fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Init => "init",
            Self::StructureCreated => "structure-created",
            Self::TablesInserted => "tables-inserted",
            Self::ContentInserted => "content-inserted",
            Self::Styled => "styled",
            Self::Branded => "branded",
            Self::Done => "done",
        };
        write!(f, "{s}")
    }
}

/// How the branding step concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrandingOutcome {
    /// The logo image was inserted.
    Logo,
    /// Image insertion failed; the fallback token was inserted instead.
    FallbackText,
    /// Branding was disabled by configuration.
    Disabled,
}

/// Configuration for the layout pipeline.
///
/// One configurable builder replaces the per-revision script variants; the
/// former module-level constants (logo URL, labels, retry knobs) are all
/// explicit values here, passed in at construction.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Public URI of the logo asset inserted into the header's left cell.
    pub logo_uri: String,
    /// Pre-measured logo size. When `None`, the size is probed from the
    /// asset's header bytes at branding time.
    pub logo_size: Option<ImageSizePt>,
    /// Literal token inserted when the logo cannot be placed.
    pub fallback_token: String,
    /// Version string stamped into the footer's left cell.
    pub version_label: String,
    /// Whether the branding phase runs at all.
    pub branding: bool,
    /// Retry policy for remote batches. Structural phases force strict
    /// mode; branding forces soft mode.
    pub retry: RetryPolicy,
    /// Polling settings for structural propagation.
    pub polling: PollSettings,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            logo_uri: String::new(),
            logo_size: None,
            fallback_token: FALLBACK_LOGO_TOKEN.to_string(),
            version_label: "1.0".to_string(),
            branding: true,
            retry: RetryPolicy::default(),
            polling: PollSettings::default(),
        }
    }
}

/// Result of one document's completed pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutReport {
    pub phase: PipelinePhase,
    pub branding: BrandingOutcome,
}

/// Offsets carried from the content phase into branding.
struct ContentHandles {
    header_segment_id: String,
    header_left_offset: u32,
}

/// Drives the phase sequence for one document.
pub struct LayoutBuilder<'a, S: DocumentService + ?Sized> {
    service: &'a S,
    config: &'a LayoutConfig,
    cancel: CancelToken,
    phase: PipelinePhase,
}

impl<'a, S: DocumentService + ?Sized> LayoutBuilder<'a, S> {
    pub fn new(service: &'a S, config: &'a LayoutConfig, cancel: CancelToken) -> Self {
        Self {
            service,
            config,
            cancel,
            phase: PipelinePhase::Init,
        }
    }

    /// The phase the pipeline last completed.
    #[must_use]
    pub fn phase(&self) -> PipelinePhase {
        self.phase
    }

    /// Runs the full phase sequence against `document_id`.
    ///
    /// A failure in the structural phases aborts the run; committed batches
    /// are not rolled back, leaving the document partially formatted.
    /// Branding failures are contained inside the branding phase and never
    /// fail the run by themselves.
    ///
    /// # Errors
    /// Any structural-phase error, a propagation timeout, a failed fallback
    /// insert, or cancellation.
    pub async fn run(&mut self, document_id: &str, title: &str) -> Result<LayoutReport> {
        info!("{document_id}: applying corporate layout");
        self.create_containers(document_id).await?;
        self.insert_layout_tables(document_id).await?;
        let handles = self.insert_content(document_id, title).await?;
        let branding = self.brand_header(document_id, &handles).await?;
        self.advance(PipelinePhase::Done);
        info!("{document_id}: layout complete");
        Ok(LayoutReport {
            phase: self.phase,
            branding,
        })
    }

    fn advance(&mut self, next: PipelinePhase) {
        debug!("phase {} -> {next}", self.phase);
        self.phase = next;
    }

    /// Applies one strict-mode batch.
    async fn commit(&self, document_id: &str, label: &str, mutations: Vec<Mutation>) -> Result<()> {
        let batch = MutationBatch::new(mutations)?;
        retry::execute(label, &self.config.retry.strict(), &self.cancel, || {
            self.service.batch_update(document_id, &batch)
        })
        .await
        .and_then(RetryOutcome::into_result)
    }

    /// Phase 1: create the header and footer containers.
    ///
    /// Containers exist at most once per document; re-running against an
    /// already structured document yields a fatal "already exists" response
    /// that surfaces to the caller unmasked.
    async fn create_containers(&mut self, document_id: &str) -> Result<()> {
        self.commit(
            document_id,
            "create header/footer containers",
            vec![Mutation::CreateHeader, Mutation::CreateFooter],
        )
        .await?;
        self.advance(PipelinePhase::StructureCreated);
        Ok(())
    }

    /// Phase 2: insert a 1x2 layout table at position 0 of each container.
    async fn insert_layout_tables(&mut self, document_id: &str) -> Result<()> {
        let snapshot = propagation::wait_for(
            self.service,
            &self.config.retry,
            &self.cancel,
            document_id,
            "header/footer containers",
            self.config.polling,
            |s: &Snapshot| s.header().is_some() && s.footer().is_some(),
        )
        .await?;

        let header_id = segment_id(SegmentKind::Header, snapshot.header())?;
        let footer_id = segment_id(SegmentKind::Footer, snapshot.footer())?;

        self.commit(
            document_id,
            "insert layout tables",
            vec![
                Mutation::InsertTable {
                    segment_id: Some(header_id),
                    index: 0,
                    rows: 1,
                    columns: 2,
                },
                Mutation::InsertTable {
                    segment_id: Some(footer_id),
                    index: 0,
                    rows: 1,
                    columns: 2,
                },
            ],
        )
        .await?;
        self.advance(PipelinePhase::TablesInserted);
        Ok(())
    }

    /// Phase 3: wait for the layout tables to propagate, resolve cell
    /// offsets, and commit the content plus its styling in one batch.
    async fn insert_content(&mut self, document_id: &str, title: &str) -> Result<ContentHandles> {
        let snapshot = propagation::wait_for(
            self.service,
            &self.config.retry,
            &self.cancel,
            document_id,
            "layout tables",
            self.config.polling,
            |s: &Snapshot| {
                s.header().is_some_and(Segment::has_table)
                    && s.footer().is_some_and(Segment::has_table)
            },
        )
        .await?;

        let header = snapshot.header().ok_or(LetterheadError::StructureNotFound {
            segment: SegmentKind::Header,
        })?;
        let footer = snapshot.footer().ok_or(LetterheadError::StructureNotFound {
            segment: SegmentKind::Footer,
        })?;

        let (header_left, header_right) = offsets::resolve_cell_offsets(SegmentKind::Header, header)?;
        let (footer_left, footer_right) = offsets::resolve_cell_offsets(SegmentKind::Footer, footer)?;
        let header_table_start = table_start(SegmentKind::Header, header)?;
        let footer_table_start = table_start(SegmentKind::Footer, footer)?;

        let header_sid = Some(header.segment_id.clone());
        let footer_sid = Some(footer.segment_id.clone());

        let reference_text = format!("Ref: {title}");
        let version_text = format!(
            "Version: {} | Updated: {}",
            self.config.version_label,
            chrono::Local::now().format("%d-%b-%Y")
        );

        // The batch applies in order, and the version text lands before the
        // footer's right cell: every later footer offset shifts by its
        // length. Header entries live in a separate coordinate space.
        let shifted_footer_right = footer_right + text_len(&version_text);
        let field_index = shifted_footer_right + text_len(PAGE_NUMBER_TOKEN);

        let mutations = vec![
            Mutation::InsertText {
                segment_id: header_sid.clone(),
                index: header_right,
                text: reference_text,
            },
            Mutation::InsertText {
                segment_id: footer_sid.clone(),
                index: footer_left,
                text: version_text,
            },
            Mutation::InsertText {
                segment_id: footer_sid.clone(),
                index: shifted_footer_right,
                text: PAGE_NUMBER_TOKEN.to_string(),
            },
            Mutation::InsertPageNumberField {
                segment_id: footer_sid.clone(),
                index: field_index,
            },
            Mutation::SetParagraphAlignment {
                segment_id: header_sid.clone(),
                range: IndexRange {
                    start_index: header_right,
                    end_index: header_right + 1,
                },
                alignment: Alignment::End,
            },
            Mutation::SetParagraphAlignment {
                segment_id: footer_sid.clone(),
                range: IndexRange {
                    start_index: shifted_footer_right,
                    end_index: shifted_footer_right + 1,
                },
                alignment: Alignment::End,
            },
            Mutation::SetTableCellBorders {
                segment_id: header_sid,
                table_start_index: header_table_start,
                borders: CellBorders::hidden(),
            },
            Mutation::SetTableCellBorders {
                segment_id: footer_sid,
                table_start_index: footer_table_start,
                borders: CellBorders::hidden(),
            },
        ];
        self.commit(document_id, "insert header/footer content", mutations)
            .await?;
        self.advance(PipelinePhase::ContentInserted);
        // The styling mutations commit in the same atomic batch.
        self.advance(PipelinePhase::Styled);

        Ok(ContentHandles {
            header_segment_id: header.segment_id.clone(),
            header_left_offset: header_left,
        })
    }

    /// Phase 4: brand the header's left cell, falling back to a literal
    /// token when the image cannot be placed.
    async fn brand_header(
        &mut self,
        document_id: &str,
        handles: &ContentHandles,
    ) -> Result<BrandingOutcome> {
        if !self.config.branding {
            debug!("{document_id}: branding disabled");
            self.advance(PipelinePhase::Branded);
            return Ok(BrandingOutcome::Disabled);
        }
        self.cancel.ensure_active()?;

        let size = match self.config.logo_size {
            Some(size) => size,
            None => asset::probe_logo_size(&self.config.logo_uri).await,
        };

        // The left-cell offset resolved in the content phase is still valid
        // here: that batch only wrote at or after the right cell's boundary.
        let image = Mutation::InsertImage {
            segment_id: Some(handles.header_segment_id.clone()),
            index: handles.header_left_offset,
            uri: self.config.logo_uri.clone(),
            width_pt: size.width,
            height_pt: size.height,
        };

        let inserted = match MutationBatch::new(vec![image]) {
            Ok(batch) => {
                retry::execute(
                    "insert logo image",
                    &self.config.retry.soft(),
                    &self.cancel,
                    || self.service.batch_update(document_id, &batch),
                )
                .await?
            }
            Err(error) => {
                warn!("{document_id}: logo mutation rejected before send: {error}");
                RetryOutcome::Skipped(error)
            }
        };

        let outcome = match inserted {
            RetryOutcome::Completed(()) => {
                info!("{document_id}: logo inserted");
                BrandingOutcome::Logo
            }
            RetryOutcome::Skipped(error) => {
                warn!("{document_id}: logo insertion skipped, placing fallback text: {error}");
                self.commit(
                    document_id,
                    "insert branding fallback text",
                    vec![Mutation::InsertText {
                        segment_id: Some(handles.header_segment_id.clone()),
                        index: handles.header_left_offset,
                        text: self.config.fallback_token.clone(),
                    }],
                )
                .await?;
                BrandingOutcome::FallbackText
            }
        };
        self.advance(PipelinePhase::Branded);
        Ok(outcome)
    }
}

fn segment_id(kind: SegmentKind, segment: Option<&Segment>) -> Result<String> {
    segment
        .map(|s| s.segment_id.clone())
        .ok_or(LetterheadError::StructureNotFound { segment: kind })
}

fn table_start(kind: SegmentKind, segment: &Segment) -> Result<u32> {
    segment
        .first_table()
        .map(|(_, start)| start)
        .ok_or(LetterheadError::StructureNotFound { segment: kind })
}

/// Length of `text` in segment coordinate units (Unicode scalar values).
fn text_len(text: &str) -> u32 {
    text.chars().count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_order_is_strictly_forward() {
        let phases = [
            PipelinePhase::Init,
            PipelinePhase::StructureCreated,
            PipelinePhase::TablesInserted,
            PipelinePhase::ContentInserted,
            PipelinePhase::Styled,
            PipelinePhase::Branded,
            PipelinePhase::Done,
        ];
        for pair in phases.windows(2) {
            assert!(pair[0] < pair[1], "{} must precede {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(PipelinePhase::Init.to_string(), "init");
        assert_eq!(PipelinePhase::StructureCreated.to_string(), "structure-created");
        assert_eq!(PipelinePhase::Done.to_string(), "done");
    }

    #[test]
    fn test_default_config() {
        let config = LayoutConfig::default();
        assert_eq!(config.fallback_token, FALLBACK_LOGO_TOKEN);
        assert_eq!(config.version_label, "1.0");
        assert!(config.branding);
        assert!(config.logo_size.is_none());
    }

    #[test]
    fn test_text_len_counts_scalar_values() {
        assert_eq!(text_len(""), 0);
        assert_eq!(text_len("Page "), 5);
        assert_eq!(text_len("Stra\u{df}e"), 6);
    }
}
