use serde_json::json;
use sticky_core::{
    encode_document, Card, DocumentBuffer, EmbeddedObject, Segment, SegmentRecord, Table,
    OBJECT_PLACEHOLDER,
};

fn sample_document() -> DocumentBuffer {
    let mut doc = DocumentBuffer::new();
    doc.insert_text("Shopping ");
    doc.insert_embedded(Card::new("Milk", "2 litres"));
    doc.insert_text(" and ");
    doc.insert_embedded(Table::new(2, 2));
    doc.insert_text(" done");
    doc
}

#[test]
fn empty_document_serializes_to_empty_sequence() {
    let doc = DocumentBuffer::new();
    assert!(doc.serialize().is_empty());
    assert_eq!(encode_document(&doc).unwrap(), json!([]));
}

#[test]
fn text_card_text_serializes_in_order() {
    let mut doc = DocumentBuffer::new();
    doc.insert_text("Hello ");
    doc.insert_embedded(Card::new("T", "B"));
    doc.insert_text(" World");

    let value = encode_document(&doc).unwrap();
    let items = value.as_array().expect("array");
    assert_eq!(items.len(), 3);
    assert_eq!(items[0], json!({"type": "text", "content": "Hello "}));
    assert_eq!(items[1]["type"], "card");
    assert_eq!(items[1]["title"], "T");
    assert_eq!(items[1]["content"], "B");
    assert_eq!(items[1]["bg"], "#333333");
    assert_eq!(items[1]["width"], 200);
    assert_eq!(items[1]["height"], 120);
    assert_eq!(items[2], json!({"type": "text", "content": " World"}));
}

#[test]
fn render_shows_placeholders_in_document_order() {
    let doc = sample_document();
    assert_eq!(
        doc.render(OBJECT_PLACEHOLDER),
        format!("Shopping {OBJECT_PLACEHOLDER} and {OBJECT_PLACEHOLDER} done")
    );
    assert_eq!(doc.plain_text(), "Shopping  and  done");
    assert_eq!(doc.len(), "Shopping ".len() + 1 + " and ".len() + 1 + " done".len());
}

#[test]
fn insert_then_delete_restores_segments() {
    let mut doc = sample_document();
    let before = doc.segments().to_vec();

    for position in [0, 4, 9, 10, 12, 15, doc.len()] {
        doc.insert_text_at(position, "XYZ");
        assert_ne!(doc.segments(), before.as_slice());
        doc.delete_range(position, position + 3);
        assert_eq!(doc.segments(), before.as_slice(), "position {position}");
    }
}

#[test]
fn insert_then_delete_restores_loaded_segments() {
    let mut doc = DocumentBuffer::from_records(vec![
        SegmentRecord::Card(Card::default().data()),
        SegmentRecord::text(""),
        SegmentRecord::Card(Card::default().data()),
    ]);
    assert_eq!(doc.segments().len(), 2);
    let before = doc.segments().to_vec();

    doc.insert_text_at(1, "abc");
    assert_eq!(doc.segments().len(), 3);
    doc.delete_range(1, 4);
    assert_eq!(doc.segments(), before.as_slice());
    assert!(doc.segments().iter().all(|segment| !segment.is_empty()));
}

#[test]
fn delete_not_covering_embedded_leaves_it_untouched() {
    let mut doc = DocumentBuffer::new();
    doc.insert_text("abc");
    let id = doc.insert_embedded(Card::new("keep", "me"));
    doc.insert_text("def");

    // Ends right before the card.
    doc.delete_range(1, 3);
    assert_eq!(doc.position_of(id), Some(1));
    // Starts right after the card.
    doc.delete_range(2, 4);
    assert_eq!(doc.position_of(id), Some(1));
    assert_eq!(doc.card(id).unwrap().title(), "keep");
    assert_eq!(doc.render('#'), "a#f");

    doc.delete_range(1, 2);
    assert_eq!(doc.position_of(id), None);
    assert!(doc.object(id).is_none());
}

#[test]
fn in_place_edits_are_visible_at_serialize_time() {
    let mut doc = DocumentBuffer::new();
    let card = doc.insert_card();
    let table = doc.insert_table();

    doc.card_mut(card).unwrap().set_title("Edited");
    doc.object_mut(card).unwrap().set_color("#abcdef");
    doc.table_mut(table).unwrap().set_cell(1, 2, "cell").unwrap();
    assert!(doc.object_mut(table).unwrap().resize(420, 220));

    let records = doc.serialize();
    let SegmentRecord::Card(card_record) = &records[0] else {
        panic!("expected card first");
    };
    assert_eq!(card_record.title, "Edited");
    assert_eq!(card_record.bg, "#abcdef");

    let SegmentRecord::Table(table_record) = &records[1] else {
        panic!("expected table second");
    };
    assert_eq!(table_record.data[1][2], "cell");
    assert_eq!((table_record.width, table_record.height), (420, 220));
}

#[test]
fn out_of_range_cell_edit_through_document_is_reported() {
    let mut doc = DocumentBuffer::new();
    let table = doc.insert_table();
    let before = doc.serialize();

    let err = doc.set_table_cell(table, 0, 3, "x").unwrap_err();
    assert!(err.to_string().contains("outside a 3x3 table"));
    assert_eq!(doc.serialize(), before);
}

#[test]
fn embedded_ids_follow_document_order() {
    let mut doc = DocumentBuffer::new();
    let second = doc.insert_card();
    doc.set_cursor(0);
    let first = doc.insert_table();

    let ids: Vec<_> = doc.embedded_ids().collect();
    assert_eq!(ids, vec![first, second]);
    assert!(matches!(doc.object(first), Some(EmbeddedObject::Table(_))));
    assert_eq!(
        doc.segments(),
        &[Segment::Embedded(first), Segment::Embedded(second)]
    );
}

#[test]
fn deserialize_replaces_previous_content() {
    let mut doc = sample_document();
    let old_ids: Vec<_> = doc.embedded_ids().collect();

    doc.deserialize(vec![SegmentRecord::text("fresh")]);
    assert_eq!(doc.plain_text(), "fresh");
    assert_eq!(doc.object_count(), 0);
    assert_eq!(doc.cursor(), 0);
    for id in old_ids {
        assert!(doc.object(id).is_none());
    }
}
