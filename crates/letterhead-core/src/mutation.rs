//! Mutation variants applied to a remote document.
//!
//! The backend's batch endpoint takes loosely shaped per-request bodies;
//! this module replaces them with a closed set of typed variants, validated
//! at construction so malformed requests fail before any network call. The
//! wire encoding lives with the HTTP client in `letterhead-backend`.

use crate::error::{LetterheadError, Result};
use std::fmt;

/// Paragraph alignment values understood by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Start,
    Center,
    End,
}

impl Alignment {
    /// Wire name of this alignment.
    #[must_use]
    pub const fn wire_name(&self) -> &'static str {
        match self {
            Self::Start => "START",
            Self::Center => "CENTER",
            Self::End => "END",
        }
    }
}

/// Named paragraph styles used by the body enrichment steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedStyle {
    NormalText,
    Heading1,
    Heading2,
}

impl NamedStyle {
    /// Wire name of this named style.
    #[must_use]
    pub const fn wire_name(&self) -> &'static str {
        match self {
            Self::NormalText => "NORMAL_TEXT",
            Self::Heading1 => "HEADING_1",
            Self::Heading2 => "HEADING_2",
        }
    }
}

/// Half-open index range within one segment's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRange {
    pub start_index: u32,
    pub end_index: u32,
}

/// Border line style for table cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderStyle {
    None,
    Solid,
}

impl BorderStyle {
    /// Wire name of this border style.
    #[must_use]
    pub const fn wire_name(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Solid => "SOLID",
        }
    }
}

/// Border settings applied uniformly to every cell of a table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellBorders {
    pub style: BorderStyle,
    pub width_pt: f64,
}

impl CellBorders {
    /// Zero-width, invisible borders, as used on layout tables.
    #[must_use]
    pub const fn hidden() -> Self {
        Self {
            style: BorderStyle::None,
            width_pt: 0.0,
        }
    }
}

/// One structural or content mutation.
///
/// `segment_id: None` targets the body segment. Mutations without a segment
/// field only ever apply to the body.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Create the document's default header container. Rejected by the
    /// backend with a fatal error if one already exists.
    CreateHeader,
    /// Create the document's default footer container.
    CreateFooter,
    InsertTable {
        segment_id: Option<String>,
        index: u32,
        rows: u32,
        columns: u32,
    },
    InsertText {
        segment_id: Option<String>,
        index: u32,
        text: String,
    },
    InsertImage {
        segment_id: Option<String>,
        index: u32,
        uri: String,
        width_pt: f64,
        height_pt: f64,
    },
    /// Dynamic page-number field, rendered by the backend at display time.
    InsertPageNumberField {
        segment_id: Option<String>,
        index: u32,
    },
    SetParagraphAlignment {
        segment_id: Option<String>,
        range: IndexRange,
        alignment: Alignment,
    },
    SetTableCellBorders {
        segment_id: Option<String>,
        table_start_index: u32,
        borders: CellBorders,
    },
    InsertTableOfContents {
        index: u32,
    },
    InsertPageBreak {
        index: u32,
    },
    SetParagraphNamedStyle {
        range: IndexRange,
        style: NamedStyle,
    },
    /// Mark rows of a body table as repeating header rows.
    SetTableHeaderRow {
        table_start_index: u32,
        row_indices: Vec<u32>,
    },
}

impl Mutation {
    /// Short name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CreateHeader => "create_header",
            Self::CreateFooter => "create_footer",
            Self::InsertTable { .. } => "insert_table",
            Self::InsertText { .. } => "insert_text",
            Self::InsertImage { .. } => "insert_image",
            Self::InsertPageNumberField { .. } => "insert_page_number_field",
            Self::SetParagraphAlignment { .. } => "set_paragraph_alignment",
            Self::SetTableCellBorders { .. } => "set_table_cell_borders",
            Self::InsertTableOfContents { .. } => "insert_table_of_contents",
            Self::InsertPageBreak { .. } => "insert_page_break",
            Self::SetParagraphNamedStyle { .. } => "set_paragraph_named_style",
            Self::SetTableHeaderRow { .. } => "set_table_header_row",
        }
    }

    /// Validates this mutation's payload.
    ///
    /// # Errors
    /// Returns [`LetterheadError::InvalidMutation`] for payloads the backend
    /// would reject: empty text, zero-dimension tables, non-finite image
    /// sizes, inverted ranges.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::InsertTable { rows, columns, .. } => {
                if *rows == 0 || *columns == 0 {
                    return Err(invalid(format!(
                        "table must have at least one row and column, got {rows}x{columns}"
                    )));
                }
            }
            Self::InsertText { text, .. } => {
                if text.is_empty() {
                    return Err(invalid("inserted text must not be empty".to_string()));
                }
            }
            Self::InsertImage {
                uri,
                width_pt,
                height_pt,
                ..
            } => {
                if uri.is_empty() {
                    return Err(invalid("image uri must not be empty".to_string()));
                }
                if !(width_pt.is_finite() && *width_pt > 0.0)
                    || !(height_pt.is_finite() && *height_pt > 0.0)
                {
                    return Err(invalid(format!(
                        "image size must be positive and finite, got {width_pt}x{height_pt} pt"
                    )));
                }
            }
            Self::SetParagraphAlignment { range, .. } | Self::SetParagraphNamedStyle { range, .. } => {
                if range.start_index >= range.end_index {
                    return Err(invalid(format!(
                        "range must not be inverted or empty, got [{}, {})",
                        range.start_index, range.end_index
                    )));
                }
            }
            Self::SetTableCellBorders { borders, .. } => {
                if !(borders.width_pt.is_finite() && borders.width_pt >= 0.0) {
                    return Err(invalid(format!(
                        "border width must be non-negative and finite, got {} pt",
                        borders.width_pt
                    )));
                }
            }
            Self::SetTableHeaderRow { row_indices, .. } => {
                if row_indices.is_empty() {
                    return Err(invalid("at least one row index required".to_string()));
                }
            }
            Self::CreateHeader
            | Self::CreateFooter
            | Self::InsertPageNumberField { .. }
            | Self::InsertTableOfContents { .. }
            | Self::InsertPageBreak { .. } => {}
        }
        Ok(())
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

fn invalid(message: String) -> LetterheadError {
    LetterheadError::InvalidMutation(message)
}

/// Ordered set of mutations applied atomically by the backend.
///
/// A batch either fully applies or fails as a unit; partial application
/// within a batch does not occur. Requests apply in order, so indices in a
/// later request must account for content inserted by earlier ones in the
/// same segment.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationBatch {
    mutations: Vec<Mutation>,
}

impl MutationBatch {
    /// Builds a batch, validating every mutation.
    ///
    /// # Errors
    /// Returns [`LetterheadError::InvalidMutation`] for an empty batch or
    /// any invalid member.
    pub fn new(mutations: Vec<Mutation>) -> Result<Self> {
        if mutations.is_empty() {
            return Err(invalid("batch must contain at least one mutation".to_string()));
        }
        for mutation in &mutations {
            mutation.validate()?;
        }
        Ok(Self { mutations })
    }

    /// The mutations in application order.
    #[must_use]
    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    /// Number of mutations in the batch. Never zero.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mutations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }
}
