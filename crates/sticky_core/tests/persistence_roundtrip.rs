use serde_json::json;
use sticky_core::{
    decode_document, decode_records, encode_document, load_into, records_from_str,
    records_to_string, Alignment, Card, ColumnWidths, DocumentBuffer, PersistError, SegmentRecord,
    Table, MAX_TABLE_DIMENSION, OBJECT_PLACEHOLDER,
};

fn rich_document() -> DocumentBuffer {
    let mut doc = DocumentBuffer::new();
    doc.insert_text("Plan:\n");
    let card = doc.insert_embedded(Card::new("Today", "write tests\nship"));
    doc.object_mut(card).unwrap().set_color("#123456");
    doc.insert_text(" then ");

    let mut table = Table::new(2, 3);
    table
        .apply_settings("2", "3", "4,8", "left")
        .expect("valid settings");
    table.set_cell(1, 2, "last").unwrap();
    table.resize(320, 180);
    doc.insert_embedded(table);
    doc.insert_text("\u{e9}nd");
    doc
}

#[test]
fn serialize_then_deserialize_preserves_document() {
    let original = rich_document();
    let value = encode_document(&original).unwrap();

    let restored = decode_document(&value).unwrap();
    assert_eq!(restored.serialize(), original.serialize());
    assert_eq!(
        restored.render(OBJECT_PLACEHOLDER),
        original.render(OBJECT_PLACEHOLDER)
    );
    assert_eq!(restored.object_count(), 2);
}

#[test]
fn file_text_round_trips_through_pretty_json() {
    let records = rich_document().serialize();
    let raw = records_to_string(&records).unwrap();
    assert!(raw.contains("\"cell_width\": \"4,8\""));
    assert_eq!(records_from_str(&raw).unwrap(), records);
}

#[test]
fn unknown_types_are_skipped_in_relative_order() {
    let value = json!([
        {"type": "text", "content": "one"},
        {"type": "sticker", "emoji": "star"},
        {"type": "text", "content": "two"},
        {"content": "no type"},
        42,
        {"type": "text", "content": "three"}
    ]);

    let doc = decode_document(&value).unwrap();
    assert_eq!(
        doc.serialize(),
        vec![
            SegmentRecord::text("one"),
            SegmentRecord::text("two"),
            SegmentRecord::text("three"),
        ]
    );
    assert_eq!(doc.plain_text(), "onetwothree");
}

#[test]
fn missing_fields_take_documented_defaults() {
    let value = json!([{"type": "card"}, {"type": "table"}, {"type": "text"}]);
    let doc = decode_document(&value).unwrap();
    let ids: Vec<_> = doc.embedded_ids().collect();

    let card = doc.card(ids[0]).unwrap();
    assert_eq!(card.title(), "");
    assert_eq!(card.body(), "");
    assert_eq!(card.frame().background(), "#333333");
    assert_eq!((card.frame().width(), card.frame().height()), (200, 120));

    let table = doc.table(ids[1]).unwrap();
    assert_eq!((table.rows(), table.cols()), (3, 3));
    assert_eq!(table.column_widths(), &ColumnWidths::Uniform(10));
    assert_eq!(table.alignment(), Alignment::Center);
    assert_eq!(table.frame().background(), "gray");
    assert_eq!((table.frame().width(), table.frame().height()), (300, 150));
    assert!(table.cells().iter().flatten().all(String::is_empty));

    assert_eq!(doc.len(), 2);
}

#[test]
fn saved_cell_data_is_clipped_to_declared_dimensions() {
    let value = json!([{
        "type": "table",
        "rows": 2,
        "cols": 2,
        "data": [["a", "b", "extra"], ["c"], ["ignored", "row"]]
    }]);

    let doc = decode_document(&value).unwrap();
    let id = doc.embedded_ids().next().unwrap();
    let table = doc.table(id).unwrap();
    assert_eq!(
        table.cells(),
        &[
            vec!["a".to_string(), "b".to_string()],
            vec!["c".to_string(), String::new()],
        ]
    );
}

#[test]
fn tolerant_table_fields_fall_back_on_load() {
    let value = json!([{
        "type": "table",
        "cell_width": "narrow",
        "align": "justify"
    }]);

    let records = decode_records(&value).unwrap();
    let SegmentRecord::Table(record) = &records[0] else {
        panic!("expected table record");
    };
    assert_eq!(record.cell_width, ColumnWidths::Uniform(10));
    assert_eq!(record.align, Alignment::Center);
}

#[test]
fn malformed_known_record_fails_without_touching_document() {
    let mut doc = rich_document();
    let before = doc.serialize();

    let value = json!([
        {"type": "text", "content": "fine"},
        {"type": "card", "width": "wide"}
    ]);
    let err = load_into(&mut doc, &value).unwrap_err();
    match err {
        PersistError::InvalidRecord { index, ref kind, .. } => {
            assert_eq!(index, 1);
            assert_eq!(kind, "card");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(doc.serialize(), before);
}

#[test]
fn top_level_shape_is_checked() {
    assert!(decode_records(&json!(null)).unwrap().is_empty());
    let err = decode_records(&json!({"type": "text"})).unwrap_err();
    assert!(matches!(err, PersistError::NotAnArray("object")));
    assert!(matches!(
        records_from_str("[{"),
        Err(PersistError::Json(_))
    ));
}

#[test]
fn load_replaces_content_and_resets_cursor() {
    let mut doc = rich_document();
    assert!(doc.cursor() > 0);

    load_into(&mut doc, &json!([{"type": "text", "content": "fresh"}])).unwrap();
    assert_eq!(doc.plain_text(), "fresh");
    assert_eq!(doc.object_count(), 0);
    assert_eq!(doc.cursor(), 0);
}

#[test]
fn oversized_table_record_is_rejected_on_load() {
    let mut doc = rich_document();
    let before = doc.serialize();

    let value = json!([
        {"type": "text", "content": "ok"},
        {"type": "table", "rows": 1_000_000_000_000_000u64, "cols": 0}
    ]);
    let err = load_into(&mut doc, &value).unwrap_err();
    assert!(matches!(
        err,
        PersistError::InvalidRecord { index: 1, .. }
    ));
    assert_eq!(doc.serialize(), before);

    let too_wide = json!([{"type": "table", "rows": 1, "cols": MAX_TABLE_DIMENSION + 1}]);
    assert!(decode_records(&too_wide).is_err());

    let widest = json!([{"type": "table", "rows": 1, "cols": MAX_TABLE_DIMENSION}]);
    let doc = decode_document(&widest).unwrap();
    let id = doc.embedded_ids().next().unwrap();
    assert_eq!(doc.table(id).unwrap().cols(), MAX_TABLE_DIMENSION);
}
