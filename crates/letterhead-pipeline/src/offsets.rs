//! Content-insertion offsets for layout-table cells.

use letterhead_core::{LetterheadError, Result, Segment, SegmentKind};

/// Offset from a cell's boundary index to its first insertable content
/// position.
pub const CELL_CONTENT_OFFSET: u32 = 1;

/// Content-insertion offsets for the two cells of a segment's layout table,
/// as `(left, right)`.
///
/// Scans the segment for its first table and derives each cell's offset as
/// `start_index + 1`. Only call this after the propagation waiter has
/// confirmed the table is visible: a missing or malformed layout table here
/// is a precondition violation, never a retryable condition.
///
/// # Errors
/// Returns [`LetterheadError::StructureNotFound`] when the segment has no
/// table, or when the first table's first row does not have exactly two
/// cells.
pub fn resolve_cell_offsets(kind: SegmentKind, segment: &Segment) -> Result<(u32, u32)> {
    let Some((table, _)) = segment.first_table() else {
        return Err(LetterheadError::StructureNotFound { segment: kind });
    };
    let [left, right] = table.first_row_cells() else {
        return Err(LetterheadError::StructureNotFound { segment: kind });
    };
    Ok((
        left.start_index + CELL_CONTENT_OFFSET,
        right.start_index + CELL_CONTENT_OFFSET,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use letterhead_core::{Paragraph, StructuralElement, Table, TableCell, TableRow};

    fn two_cell_table(left_start: u32, right_start: u32) -> Table {
        Table {
            rows: 1,
            columns: 2,
            table_rows: vec![TableRow {
                start_index: left_start.saturating_sub(1),
                table_cells: vec![
                    TableCell {
                        start_index: left_start,
                        end_index: left_start + 2,
                    },
                    TableCell {
                        start_index: right_start,
                        end_index: right_start + 2,
                    },
                ],
            }],
        }
    }

    fn segment_with(table: Table) -> Segment {
        Segment {
            segment_id: "hdr-1".to_string(),
            content: vec![StructuralElement {
                start_index: 0,
                end_index: 10,
                paragraph: None,
                table: Some(table),
            }],
        }
    }

    #[test]
    fn test_offsets_are_start_index_plus_one() {
        for (left, right) in [(1, 3), (0, 2), (14, 29), (1000, 2000)] {
            let segment = segment_with(two_cell_table(left, right));
            let offsets = resolve_cell_offsets(SegmentKind::Header, &segment).unwrap();
            assert_eq!(offsets, (left + 1, right + 1));
        }
    }

    #[test]
    fn test_missing_table_is_precondition_violation() {
        let segment = Segment {
            segment_id: "ftr-1".to_string(),
            content: vec![StructuralElement {
                start_index: 0,
                end_index: 1,
                paragraph: Some(Paragraph {}),
                table: None,
            }],
        };
        let result = resolve_cell_offsets(SegmentKind::Footer, &segment);
        match result {
            Err(LetterheadError::StructureNotFound { segment }) => {
                assert_eq!(segment, SegmentKind::Footer);
            }
            other => panic!("expected StructureNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_cell_count_rejected() {
        let one_cell = Table {
            rows: 1,
            columns: 1,
            table_rows: vec![TableRow {
                start_index: 0,
                table_cells: vec![TableCell {
                    start_index: 1,
                    end_index: 3,
                }],
            }],
        };
        assert!(resolve_cell_offsets(SegmentKind::Header, &segment_with(one_cell)).is_err());

        let rowless = Table {
            rows: 1,
            columns: 2,
            table_rows: Vec::new(),
        };
        assert!(resolve_cell_offsets(SegmentKind::Header, &segment_with(rowless)).is_err());
    }

    #[test]
    fn test_first_table_wins_when_segment_has_several() {
        let mut segment = segment_with(two_cell_table(1, 3));
        segment.content.push(StructuralElement {
            start_index: 10,
            end_index: 20,
            paragraph: None,
            table: Some(two_cell_table(11, 15)),
        });

        let offsets = resolve_cell_offsets(SegmentKind::Header, &segment).unwrap();
        assert_eq!(offsets, (2, 4));
    }
}
