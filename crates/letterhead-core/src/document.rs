//! Typed model of the remote document snapshot.
//!
//! A document is divided into segments (body, header, footer), each with its
//! own monotonically increasing, segment-local content-offset space.
//! Inserting content shifts the indices of everything after it within the
//! same segment; segments never share coordinates.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Addressable region of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Body,
    Header,
    Footer,
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Body => "body",
            Self::Header => "header",
            Self::Footer => "footer",
        };
        write!(f, "{s}")
    }
}

/// Full structural snapshot of a remote document.
///
/// Header and footer segments are created lazily and exist at most once
/// each; the backend keys them by segment id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub document_id: String,
    #[serde(default)]
    pub title: String,
    pub body: Segment,
    #[serde(default)]
    pub headers: BTreeMap<String, Segment>,
    #[serde(default)]
    pub footers: BTreeMap<String, Segment>,
}

impl Snapshot {
    /// The document's header segment, if one has been created.
    #[must_use]
    pub fn header(&self) -> Option<&Segment> {
        self.headers.values().next()
    }

    /// The document's footer segment, if one has been created.
    #[must_use]
    pub fn footer(&self) -> Option<&Segment> {
        self.footers.values().next()
    }

    /// Segment of the given kind, if present in this snapshot.
    #[must_use]
    pub fn segment(&self, kind: SegmentKind) -> Option<&Segment> {
        match kind {
            SegmentKind::Body => Some(&self.body),
            SegmentKind::Header => self.header(),
            SegmentKind::Footer => self.footer(),
        }
    }
}

/// One segment's ordered content.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    #[serde(default)]
    pub segment_id: String,
    #[serde(default)]
    pub content: Vec<StructuralElement>,
}

impl Segment {
    /// First table element in this segment, with its start index.
    #[must_use]
    pub fn first_table(&self) -> Option<(&Table, u32)> {
        self.content
            .iter()
            .find_map(|element| element.table.as_ref().map(|table| (table, element.start_index)))
    }

    /// Whether the segment contains at least one table.
    #[must_use]
    pub fn has_table(&self) -> bool {
        self.first_table().is_some()
    }

    /// Start indices of every table in the segment, in document order.
    #[must_use]
    pub fn table_start_indices(&self) -> Vec<u32> {
        self.content
            .iter()
            .filter(|element| element.table.is_some())
            .map(|element| element.start_index)
            .collect()
    }
}

/// One content element within a segment.
///
/// Exactly one of the payload fields is set by the backend; the others are
/// absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralElement {
    pub start_index: u32,
    #[serde(default)]
    pub end_index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph: Option<Paragraph>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<Table>,
}

/// Paragraph payload. Its inner runs are opaque to this pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Paragraph {}

/// Table payload. Layout tables in this system are exactly 1 row x 2 cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub rows: u32,
    pub columns: u32,
    #[serde(default)]
    pub table_rows: Vec<TableRow>,
}

impl Table {
    /// Cells of the first row, in column order.
    #[must_use]
    pub fn first_row_cells(&self) -> &[TableCell] {
        self.table_rows
            .first()
            .map(|row| row.table_cells.as_slice())
            .unwrap_or(&[])
    }
}

/// One row of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub start_index: u32,
    #[serde(default)]
    pub table_cells: Vec<TableCell>,
}

/// One table cell. `start_index` is the cell boundary; the first insertable
/// content position inside the cell is `start_index + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCell {
    pub start_index: u32,
    #[serde(default)]
    pub end_index: u32,
}
