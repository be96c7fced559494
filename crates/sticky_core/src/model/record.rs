//! Persisted segment records.
//!
//! # Responsibility
//! - Define the on-disk shape of every document segment.
//! - Carry documented defaults for optional fields.
//!
//! # Invariants
//! - Every record is tagged by `type` (`text|card|table`).
//! - A missing optional field decodes to its documented default, never an
//!   error.
//!
//! # See also
//! - `crate::persist` for array-level decoding and unknown-type tolerance.

use crate::model::card::{DEFAULT_CARD_BACKGROUND, DEFAULT_CARD_HEIGHT, DEFAULT_CARD_WIDTH};
use crate::model::table::{
    Alignment, ColumnWidths, DEFAULT_TABLE_BACKGROUND, DEFAULT_TABLE_COLS, DEFAULT_TABLE_HEIGHT,
    DEFAULT_TABLE_ROWS, DEFAULT_TABLE_WIDTH,
};
use serde::{Deserialize, Serialize};

/// Segment type tags understood by this version.
pub const KNOWN_SEGMENT_TYPES: &[&str] = &["text", "card", "table"];

/// One persisted document segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SegmentRecord {
    /// Contiguous run of plain text.
    Text {
        #[serde(default)]
        content: String,
    },
    Card(CardRecord),
    Table(TableRecord),
}

impl SegmentRecord {
    /// Builds a text record.
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }

    /// Type tag as written to disk.
    pub fn type_tag(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Card(_) => "card",
            Self::Table(_) => "table",
        }
    }
}

/// Persisted card fields.
///
/// Defaults: empty title/content, `#333333`, 200x120.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardRecord {
    pub title: String,
    /// Card body text.
    pub content: String,
    /// Opaque background color.
    pub bg: String,
    pub width: u32,
    pub height: u32,
}

impl Default for CardRecord {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            bg: DEFAULT_CARD_BACKGROUND.to_string(),
            width: DEFAULT_CARD_WIDTH,
            height: DEFAULT_CARD_HEIGHT,
        }
    }
}

/// Persisted table fields.
///
/// Defaults: 3x3, cell width 10, centered, `gray`, 300x150, no cell data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableRecord {
    pub rows: usize,
    pub cols: usize,
    /// Int for uniform widths, comma-separated string for per-column widths.
    pub cell_width: ColumnWidths,
    pub align: Alignment,
    pub width: u32,
    pub height: u32,
    pub bg: String,
    /// Row-major cell values; may be ragged or oversized on disk.
    pub data: Vec<Vec<String>>,
}

impl Default for TableRecord {
    fn default() -> Self {
        Self {
            rows: DEFAULT_TABLE_ROWS,
            cols: DEFAULT_TABLE_COLS,
            cell_width: ColumnWidths::default(),
            align: Alignment::default(),
            width: DEFAULT_TABLE_WIDTH,
            height: DEFAULT_TABLE_HEIGHT,
            bg: DEFAULT_TABLE_BACKGROUND.to_string(),
            data: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CardRecord, SegmentRecord, TableRecord};
    use crate::model::table::{Alignment, ColumnWidths};
    use serde_json::json;

    #[test]
    fn text_record_uses_type_tag() {
        let value = serde_json::to_value(SegmentRecord::text("hi")).unwrap();
        assert_eq!(value, json!({"type": "text", "content": "hi"}));
    }

    #[test]
    fn card_record_missing_fields_take_defaults() {
        let record: SegmentRecord =
            serde_json::from_value(json!({"type": "card", "title": "T"})).unwrap();
        assert_eq!(
            record,
            SegmentRecord::Card(CardRecord {
                title: "T".to_string(),
                ..CardRecord::default()
            })
        );
    }

    #[test]
    fn table_record_defaults_to_three_by_three_centered() {
        let record: SegmentRecord = serde_json::from_value(json!({"type": "table"})).unwrap();
        let SegmentRecord::Table(table) = record else {
            panic!("expected table record");
        };
        assert_eq!((table.rows, table.cols), (3, 3));
        assert_eq!(table.cell_width, ColumnWidths::Uniform(10));
        assert_eq!(table.align, Alignment::Center);
        assert_eq!((table.width, table.height), (300, 150));
        assert_eq!(table.bg, "gray");
    }

    #[test]
    fn table_record_accepts_every_width_shape() {
        let from_int: TableRecord = serde_json::from_value(json!({"cell_width": 12})).unwrap();
        assert_eq!(from_int.cell_width, ColumnWidths::Uniform(12));

        let from_text: TableRecord =
            serde_json::from_value(json!({"cell_width": "4, 8"})).unwrap();
        assert_eq!(from_text.cell_width, ColumnWidths::List(vec![4, 8]));

        let from_list: TableRecord =
            serde_json::from_value(json!({"cell_width": [6, 9]})).unwrap();
        assert_eq!(from_list.cell_width, ColumnWidths::List(vec![6, 9]));

        let malformed: TableRecord =
            serde_json::from_value(json!({"cell_width": "wide"})).unwrap();
        assert_eq!(malformed.cell_width, ColumnWidths::Uniform(10));
    }

    #[test]
    fn table_record_unknown_alignment_renders_centered() {
        let record: TableRecord = serde_json::from_value(json!({"align": "justify"})).unwrap();
        assert_eq!(record.align, Alignment::Center);
    }

    #[test]
    fn list_widths_are_written_as_text() {
        let record = TableRecord {
            cell_width: ColumnWidths::List(vec![5, 10]),
            ..TableRecord::default()
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["cell_width"], json!("5,10"));
        assert_eq!(value["align"], json!("center"));
    }
}
