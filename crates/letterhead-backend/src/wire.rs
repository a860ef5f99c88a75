//! Wire encoding of mutation variants.
//!
//! The batch endpoint takes one request object per mutation, keyed by the
//! request kind. This module owns the mapping from the typed variants to
//! that shape; nothing outside the HTTP client sees it.

use letterhead_core::Mutation;
use serde_json::{json, Value};

/// Encodes one mutation as its wire request object.
pub(crate) fn encode_mutation(mutation: &Mutation) -> Value {
    match mutation {
        Mutation::CreateHeader => json!({
            "createHeader": {
                "type": "DEFAULT",
                "sectionBreakLocation": {"index": 1},
            }
        }),
        Mutation::CreateFooter => json!({
            "createFooter": {
                "type": "DEFAULT",
                "sectionBreakLocation": {"index": 1},
            }
        }),
        Mutation::InsertTable {
            segment_id,
            index,
            rows,
            columns,
        } => json!({
            "insertTable": {
                "location": location(segment_id.as_deref(), *index),
                "rows": rows,
                "columns": columns,
            }
        }),
        Mutation::InsertText {
            segment_id,
            index,
            text,
        } => json!({
            "insertText": {
                "location": location(segment_id.as_deref(), *index),
                "text": text,
            }
        }),
        Mutation::InsertImage {
            segment_id,
            index,
            uri,
            width_pt,
            height_pt,
        } => json!({
            "insertInlineImage": {
                "location": location(segment_id.as_deref(), *index),
                "uri": uri,
                "objectSize": {
                    "height": points(*height_pt),
                    "width": points(*width_pt),
                },
            }
        }),
        Mutation::InsertPageNumberField { segment_id, index } => json!({
            "insertPageNumber": {
                "location": location(segment_id.as_deref(), *index),
            }
        }),
        Mutation::SetParagraphAlignment {
            segment_id,
            range,
            alignment,
        } => {
            let mut request = json!({
                "range": {"startIndex": range.start_index, "endIndex": range.end_index},
                "paragraphStyle": {"alignment": alignment.wire_name()},
                "fields": "alignment",
            });
            if let Some(id) = segment_id {
                request["segmentId"] = json!(id);
            }
            json!({"updateParagraphStyle": request})
        }
        Mutation::SetTableCellBorders {
            segment_id,
            table_start_index,
            borders,
        } => {
            let border = json!({
                "style": borders.style.wire_name(),
                "width": points(borders.width_pt),
            });
            let mut start = json!({"index": table_start_index});
            if let Some(id) = segment_id {
                start["segmentId"] = json!(id);
            }
            json!({
                "updateTableCellStyle": {
                    "tableStartLocation": start,
                    "fields": "borderTop,borderBottom,borderLeft,borderRight",
                    "tableCellStyle": {
                        "borderTop": border,
                        "borderBottom": border,
                        "borderLeft": border,
                        "borderRight": border,
                    },
                }
            })
        }
        Mutation::InsertTableOfContents { index } => json!({
            "insertTableOfContents": {
                "location": {"index": index},
                "type": "DEFAULT",
            }
        }),
        Mutation::InsertPageBreak { index } => json!({
            "insertPageBreak": {
                "location": {"index": index},
            }
        }),
        Mutation::SetParagraphNamedStyle { range, style } => json!({
            "updateParagraphStyle": {
                "range": {"startIndex": range.start_index, "endIndex": range.end_index},
                "paragraphStyle": {"namedStyleType": style.wire_name()},
                "fields": "namedStyleType",
            }
        }),
        Mutation::SetTableHeaderRow {
            table_start_index,
            row_indices,
        } => json!({
            "updateTableRowStyle": {
                "tableStartLocation": {"index": table_start_index},
                "rowIndices": row_indices,
                "tableRowStyle": {"tableHeader": true},
                "fields": "tableHeader",
            }
        }),
    }
}

/// Location object: body when `segment_id` is absent.
fn location(segment_id: Option<&str>, index: u32) -> Value {
    match segment_id {
        Some(id) => json!({"segmentId": id, "index": index}),
        None => json!({"index": index}),
    }
}

fn points(magnitude: f64) -> Value {
    json!({"magnitude": magnitude, "unit": "PT"})
}
