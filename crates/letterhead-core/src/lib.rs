//! # Letterhead Core - Remote Document Types
//!
//! Core types shared by the letterhead pipeline: the structural model of a
//! remote document snapshot, the closed set of mutation variants applied to
//! it, the retry policy for remote operations, and the error taxonomy.
//!
//! The remote backend exposes an eventually-consistent document model: a
//! structural mutation is accepted synchronously but becomes visible to
//! subsequent reads only after a variable delay. The types here carry the
//! information the pipeline needs to reason about that - segment-local
//! content offsets, lazily created header/footer segments, and atomic
//! mutation batches.

pub mod document;
pub mod error;
pub mod mutation;
pub mod retry;

pub use document::{Paragraph, Segment, SegmentKind, Snapshot, StructuralElement, Table, TableCell, TableRow};
pub use error::{LetterheadError, Result};
pub use mutation::{Alignment, BorderStyle, CellBorders, IndexRange, Mutation, MutationBatch, NamedStyle};
pub use retry::{RetryMode, RetryPolicy};
