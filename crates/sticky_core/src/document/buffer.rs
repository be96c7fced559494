//! Document buffer over text runs and embedded object handles.
//!
//! # Responsibility
//! - Apply text/embedded insertions and range deletions at flattened
//!   positions.
//! - Track the insertion cursor across edits.
//! - Walk segments in order for serialization; rebuild from records.
//!
//! # Invariants
//! - Each operation either applies fully or leaves the buffer unchanged.
//! - Segment order is only changed by the operation's own insertion or
//!   removal; neighbours keep their relative order.
//! - `serialize()` reads embedded state live from the index.
//! - No text run is empty.

use super::{DocumentError, ObjectIndex, Segment};
use crate::model::card::Card;
use crate::model::embedded::{EmbeddedId, EmbeddedObject, ObjectKind};
use crate::model::record::SegmentRecord;
use crate::model::table::Table;
use log::{debug, error, info};

/// Character standing in for an embedded object in rendered text.
pub const OBJECT_PLACEHOLDER: char = '\u{FFFC}';

/// Ordered mixed-content document for one open note.
#[derive(Debug, Default)]
pub struct DocumentBuffer {
    segments: Vec<Segment>,
    objects: ObjectIndex,
    cursor: usize,
}

impl DocumentBuffer {
    /// Creates an empty document (new note).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a document from persisted records (open note).
    pub fn from_records(records: Vec<SegmentRecord>) -> Self {
        let mut buffer = Self::new();
        buffer.deserialize(records);
        buffer
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Total length in positions: text characters plus one per object.
    pub fn len(&self) -> usize {
        self.segments.iter().map(Segment::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(Segment::is_empty)
    }

    /// Returns whether the document holds no objects and only whitespace.
    pub fn is_blank(&self) -> bool {
        self.segments.iter().all(|segment| match segment {
            Segment::Text(content) => content.trim().is_empty(),
            Segment::Embedded(_) => false,
        })
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Moves the cursor, clamping to the document end.
    pub fn set_cursor(&mut self, position: usize) {
        self.cursor = position.min(self.len());
    }

    pub fn move_cursor_to_end(&mut self) {
        self.cursor = self.len();
    }

    /// Inserts text at the cursor and moves the cursor past it.
    pub fn insert_text(&mut self, text: &str) {
        self.insert_text_at(self.cursor, text);
    }

    /// Inserts text at `position` (clamped to the document end).
    ///
    /// Text landing inside or at the edge of a text run extends that run;
    /// text landing between two objects becomes a new run.
    pub fn insert_text_at(&mut self, position: usize, text: &str) {
        if text.is_empty() {
            return;
        }
        let position = position.min(self.len());
        let inserted = text.chars().count();

        let mut start = 0;
        let mut boundary = self.segments.len();
        let mut target = None;
        for (index, segment) in self.segments.iter().enumerate() {
            let len = segment.len();
            if matches!(segment, Segment::Text(_)) && position <= start + len {
                target = Some((index, position - start));
                break;
            }
            if position <= start {
                boundary = index;
                break;
            }
            start += len;
        }

        match target {
            Some((index, offset)) => {
                if let Segment::Text(content) = &mut self.segments[index] {
                    let at = byte_offset(content, offset);
                    content.insert_str(at, text);
                }
            }
            None => self
                .segments
                .insert(boundary, Segment::Text(text.to_string())),
        }

        if self.cursor >= position {
            self.cursor += inserted;
        }
        debug!(
            "event=doc_insert_text module=document status=ok position={} chars={}",
            position, inserted
        );
    }

    /// Inserts an embedded object at the cursor; returns its handle.
    pub fn insert_embedded(&mut self, object: impl Into<EmbeddedObject>) -> EmbeddedId {
        self.insert_embedded_at(self.cursor, object)
    }

    /// Inserts an embedded object at `position` (clamped to the document
    /// end), splitting a text run there into before/after runs.
    pub fn insert_embedded_at(
        &mut self,
        position: usize,
        object: impl Into<EmbeddedObject>,
    ) -> EmbeddedId {
        let object = object.into();
        let kind = object.kind();
        let position = position.min(self.len());
        let index = self.split_at(position);
        let id = self.objects.register(object);
        self.segments.insert(index, Segment::Embedded(id));

        if self.cursor >= position {
            self.cursor += 1;
        }
        debug!(
            "event=doc_insert_embedded module=document status=ok kind={} position={}",
            kind, position
        );
        id
    }

    /// Inserts a default card at the cursor.
    pub fn insert_card(&mut self) -> EmbeddedId {
        self.insert_embedded(Card::default())
    }

    /// Inserts a default 3x3 table at the cursor.
    pub fn insert_table(&mut self) -> EmbeddedId {
        self.insert_embedded(Table::default())
    }

    /// Deletes positions `start..end` (end clamped to the document end).
    ///
    /// Text runs are truncated; objects inside the range are removed and
    /// destroyed. Returns the number of positions removed.
    pub fn delete_range(&mut self, start: usize, end: usize) -> usize {
        let end = end.min(self.len());
        if start >= end {
            return 0;
        }

        let mut kept = Vec::with_capacity(self.segments.len());
        let mut dropped = Vec::new();
        let mut offset = 0;
        for segment in std::mem::take(&mut self.segments) {
            let seg_start = offset;
            let seg_end = offset + segment.len();
            offset = seg_end;

            match segment {
                Segment::Text(mut content) => {
                    let cut_start = start.max(seg_start);
                    let cut_end = end.min(seg_end);
                    if cut_start >= cut_end {
                        kept.push(Segment::Text(content));
                        continue;
                    }
                    let from = byte_offset(&content, cut_start - seg_start);
                    let to = byte_offset(&content, cut_end - seg_start);
                    content.replace_range(from..to, "");
                    if !content.is_empty() {
                        kept.push(Segment::Text(content));
                    }
                }
                Segment::Embedded(id) => {
                    if start <= seg_start && seg_end <= end {
                        dropped.push(id);
                    } else {
                        kept.push(Segment::Embedded(id));
                    }
                }
            }
        }

        self.segments = kept;
        for id in &dropped {
            self.objects.remove(*id);
        }

        let removed = end - start;
        if self.cursor >= end {
            self.cursor -= removed;
        } else if self.cursor > start {
            self.cursor = start;
        }
        debug!(
            "event=doc_delete_range module=document status=ok start={} end={} objects_removed={}",
            start,
            end,
            dropped.len()
        );
        removed
    }

    /// Removes one embedded object by handle and returns its final state.
    pub fn remove_embedded(&mut self, id: EmbeddedId) -> Result<EmbeddedObject, DocumentError> {
        let index = self
            .segments
            .iter()
            .position(|segment| *segment == Segment::Embedded(id))
            .ok_or(DocumentError::UnknownObject(id))?;
        let object = self
            .objects
            .remove(id)
            .ok_or(DocumentError::UnknownObject(id))?;

        let position: usize = self.segments[..index].iter().map(Segment::len).sum();
        self.segments.remove(index);
        if self.cursor > position {
            self.cursor -= 1;
        }
        debug!(
            "event=doc_remove_embedded module=document status=ok kind={} position={}",
            object.kind(),
            position
        );
        Ok(object)
    }

    /// Flattened position of an embedded object.
    pub fn position_of(&self, id: EmbeddedId) -> Option<usize> {
        let mut position = 0;
        for segment in &self.segments {
            if *segment == Segment::Embedded(id) {
                return Some(position);
            }
            position += segment.len();
        }
        None
    }

    /// Handles of all embedded objects in document order.
    pub fn embedded_ids(&self) -> impl Iterator<Item = EmbeddedId> + '_ {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Embedded(id) => Some(*id),
            Segment::Text(_) => None,
        })
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn object(&self, id: EmbeddedId) -> Option<&EmbeddedObject> {
        self.objects.get(id)
    }

    /// Live, mutable access to an object; edits show up in the next
    /// `serialize()` without any flush.
    pub fn object_mut(&mut self, id: EmbeddedId) -> Result<&mut EmbeddedObject, DocumentError> {
        self.objects
            .get_mut(id)
            .ok_or(DocumentError::UnknownObject(id))
    }

    pub fn card(&self, id: EmbeddedId) -> Result<&Card, DocumentError> {
        match self.objects.get(id) {
            Some(EmbeddedObject::Card(card)) => Ok(card),
            Some(other) => Err(kind_mismatch(id, ObjectKind::Card, other)),
            None => Err(DocumentError::UnknownObject(id)),
        }
    }

    pub fn card_mut(&mut self, id: EmbeddedId) -> Result<&mut Card, DocumentError> {
        match self.objects.get_mut(id) {
            Some(EmbeddedObject::Card(card)) => Ok(card),
            Some(other) => Err(kind_mismatch(id, ObjectKind::Card, other)),
            None => Err(DocumentError::UnknownObject(id)),
        }
    }

    pub fn table(&self, id: EmbeddedId) -> Result<&Table, DocumentError> {
        match self.objects.get(id) {
            Some(EmbeddedObject::Table(table)) => Ok(table),
            Some(other) => Err(kind_mismatch(id, ObjectKind::Table, other)),
            None => Err(DocumentError::UnknownObject(id)),
        }
    }

    pub fn table_mut(&mut self, id: EmbeddedId) -> Result<&mut Table, DocumentError> {
        match self.objects.get_mut(id) {
            Some(EmbeddedObject::Table(table)) => Ok(table),
            Some(other) => Err(kind_mismatch(id, ObjectKind::Table, other)),
            None => Err(DocumentError::UnknownObject(id)),
        }
    }

    /// Edits one cell of the table behind `id`.
    ///
    /// # Errors
    /// - `UnknownObject`/`KindMismatch` for a bad handle.
    /// - `Table(CellOutOfRange)` outside the grid; nothing changes.
    pub fn set_table_cell(
        &mut self,
        id: EmbeddedId,
        row: usize,
        col: usize,
        value: impl Into<String>,
    ) -> Result<(), DocumentError> {
        self.table_mut(id)?.set_cell(row, col, value)?;
        Ok(())
    }

    /// Merges adjacent text runs and drops empty ones.
    pub fn normalize(&mut self) {
        let mut merged: Vec<Segment> = Vec::with_capacity(self.segments.len());
        for segment in std::mem::take(&mut self.segments) {
            if segment.is_empty() {
                continue;
            }
            if let (Some(Segment::Text(previous)), Segment::Text(content)) =
                (merged.last_mut(), &segment)
            {
                previous.push_str(content);
                continue;
            }
            merged.push(segment);
        }
        self.segments = merged;
    }

    /// Concatenated text with `placeholder` standing in for each object.
    pub fn render(&self, placeholder: char) -> String {
        let mut rendered = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(content) => rendered.push_str(content),
                Segment::Embedded(_) => rendered.push(placeholder),
            }
        }
        rendered
    }

    /// Concatenated text of all runs, objects omitted.
    pub fn plain_text(&self) -> String {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Text(content) => Some(content.as_str()),
                Segment::Embedded(_) => None,
            })
            .collect()
    }

    /// Walks the document in order, one record per segment.
    pub fn serialize(&self) -> Vec<SegmentRecord> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Text(content) => Some(SegmentRecord::text(content.clone())),
                Segment::Embedded(id) => match self.objects.get(*id) {
                    Some(object) => Some(object.data()),
                    None => {
                        error!(
                            "event=doc_serialize module=document status=error error_code=dangling_handle id={}",
                            id
                        );
                        None
                    }
                },
            })
            .collect()
    }

    /// Replaces all content with segments rebuilt from `records`, in order.
    ///
    /// Objects get fresh handles; the cursor returns to the start. Empty text
    /// records are dropped.
    pub fn deserialize(&mut self, records: Vec<SegmentRecord>) {
        let mut segments = Vec::with_capacity(records.len());
        let mut objects = ObjectIndex::new();
        for record in records {
            let segment = match record {
                SegmentRecord::Text { content } if content.is_empty() => continue,
                SegmentRecord::Text { content } => Segment::Text(content),
                SegmentRecord::Card(card) => {
                    Segment::Embedded(objects.register(Card::from_record(card).into()))
                }
                SegmentRecord::Table(table) => {
                    Segment::Embedded(objects.register(Table::from_record(table).into()))
                }
            };
            segments.push(segment);
        }

        self.segments = segments;
        self.objects = objects;
        self.cursor = 0;
        info!(
            "event=doc_load module=document status=ok segments={} objects={}",
            self.segments.len(),
            self.objects.len()
        );
    }

    /// Discards all content and objects.
    pub fn clear(&mut self) {
        self.segments.clear();
        self.objects.clear();
        self.cursor = 0;
    }

    /// Split point for inserting a new segment at `position`.
    ///
    /// Splits a text run when `position` falls strictly inside it.
    fn split_at(&mut self, position: usize) -> usize {
        let mut start = 0;
        for index in 0..self.segments.len() {
            if position == start {
                return index;
            }
            let len = self.segments[index].len();
            if position < start + len {
                if let Segment::Text(content) = &mut self.segments[index] {
                    let at = byte_offset(content, position - start);
                    let tail = content.split_off(at);
                    self.segments.insert(index + 1, Segment::Text(tail));
                    return index + 1;
                }
            }
            start += len;
        }
        self.segments.len()
    }
}

fn kind_mismatch(id: EmbeddedId, expected: ObjectKind, actual: &EmbeddedObject) -> DocumentError {
    DocumentError::KindMismatch {
        id,
        expected,
        actual: actual.kind(),
    }
}

fn byte_offset(content: &str, chars: usize) -> usize {
    content
        .char_indices()
        .nth(chars)
        .map_or(content.len(), |(at, _)| at)
}

#[cfg(test)]
mod tests {
    use super::{byte_offset, DocumentBuffer, OBJECT_PLACEHOLDER};
    use crate::document::{DocumentError, Segment};
    use crate::model::card::Card;
    use crate::model::embedded::ObjectKind;
    use crate::model::table::{Table, TableError};

    fn text(value: &str) -> Segment {
        Segment::Text(value.to_string())
    }

    #[test]
    fn byte_offset_handles_multibyte_chars() {
        assert_eq!(byte_offset("héllo", 2), 3);
        assert_eq!(byte_offset("héllo", 5), 6);
        assert_eq!(byte_offset("héllo", 9), 6);
    }

    #[test]
    fn insert_text_extends_current_run() {
        let mut doc = DocumentBuffer::new();
        doc.insert_text("Hello");
        doc.insert_text(" World");
        assert_eq!(doc.segments(), &[text("Hello World")]);
        assert_eq!(doc.cursor(), 11);

        doc.insert_text_at(5, ",");
        assert_eq!(doc.plain_text(), "Hello, World");
        assert_eq!(doc.cursor(), 12);
    }

    #[test]
    fn insert_embedded_splits_run() {
        let mut doc = DocumentBuffer::new();
        doc.insert_text("abcd");
        let id = doc.insert_embedded_at(2, Card::default());

        assert_eq!(
            doc.segments(),
            &[text("ab"), Segment::Embedded(id), text("cd")]
        );
        assert_eq!(doc.len(), 5);
        assert_eq!(doc.position_of(id), Some(2));
        assert_eq!(doc.cursor(), 5);
    }

    #[test]
    fn text_between_objects_becomes_new_run() {
        let mut doc = DocumentBuffer::new();
        let first = doc.insert_card();
        let second = doc.insert_table();
        doc.insert_text_at(1, "mid");

        assert_eq!(
            doc.segments(),
            &[Segment::Embedded(first), text("mid"), Segment::Embedded(second)]
        );
        assert_eq!(doc.render('#'), "#mid#");
    }

    #[test]
    fn insert_before_cursor_shifts_cursor() {
        let mut doc = DocumentBuffer::new();
        doc.insert_text("tail");
        doc.insert_embedded_at(0, Table::default());
        assert_eq!(doc.cursor(), 5);
        doc.insert_text_at(0, "xy");
        assert_eq!(doc.cursor(), 7);
    }

    #[test]
    fn delete_range_truncates_runs_and_removes_contained_objects() {
        let mut doc = DocumentBuffer::new();
        doc.insert_text("abc");
        let id = doc.insert_card();
        doc.insert_text("def");

        let removed = doc.delete_range(2, 5);
        assert_eq!(removed, 3);
        assert_eq!(doc.segments(), &[text("ab"), text("ef")]);
        assert!(doc.object(id).is_none());
        assert_eq!(doc.object_count(), 0);
        assert_eq!(doc.cursor(), 4);
    }

    #[test]
    fn delete_range_clamps_and_ignores_empty_ranges() {
        let mut doc = DocumentBuffer::new();
        doc.insert_text("abc");
        assert_eq!(doc.delete_range(2, 2), 0);
        assert_eq!(doc.delete_range(3, 1), 0);
        assert_eq!(doc.delete_range(1, 99), 2);
        assert_eq!(doc.plain_text(), "a");
    }

    #[test]
    fn delete_range_moves_cursor_inside_range_to_start() {
        let mut doc = DocumentBuffer::new();
        doc.insert_text("abcdef");
        doc.set_cursor(4);
        doc.delete_range(2, 5);
        assert_eq!(doc.cursor(), 2);
    }

    #[test]
    fn set_table_cell_reports_table_and_handle_errors() {
        let mut doc = DocumentBuffer::new();
        let table = doc.insert_table();
        let card = doc.insert_card();

        doc.set_table_cell(table, 2, 2, "z").unwrap();
        assert_eq!(doc.table(table).unwrap().cell(2, 2), Some("z"));

        let err = doc.set_table_cell(table, 3, 0, "x").unwrap_err();
        assert!(matches!(
            err,
            DocumentError::Table(TableError::CellOutOfRange { row: 3, .. })
        ));
        assert!(matches!(
            doc.set_table_cell(card, 0, 0, "x"),
            Err(DocumentError::KindMismatch { .. })
        ));
    }

    #[test]
    fn remove_embedded_by_handle() {
        let mut doc = DocumentBuffer::new();
        doc.insert_text("ab");
        let id = doc.insert_card();
        doc.insert_text("cd");

        let removed = doc.remove_embedded(id).expect("object present");
        assert_eq!(removed.kind(), ObjectKind::Card);
        assert_eq!(doc.render(OBJECT_PLACEHOLDER), "abcd");
        assert_eq!(doc.cursor(), 4);
        assert_eq!(
            doc.remove_embedded(id).unwrap_err(),
            DocumentError::UnknownObject(id)
        );
    }

    #[test]
    fn typed_access_reports_kind_mismatch() {
        let mut doc = DocumentBuffer::new();
        let id = doc.insert_card();
        let err = doc.table_mut(id).unwrap_err();
        assert!(matches!(
            err,
            DocumentError::KindMismatch {
                expected: ObjectKind::Table,
                actual: ObjectKind::Card,
                ..
            }
        ));
        assert!(doc.card(id).is_ok());
    }

    #[test]
    fn normalize_merges_adjacent_runs() {
        let mut doc = DocumentBuffer::new();
        doc.insert_text("ab");
        let id = doc.insert_card();
        doc.insert_text("cd");
        doc.remove_embedded(id).expect("object present");
        assert_eq!(doc.segments().len(), 2);

        doc.normalize();
        assert_eq!(doc.segments(), &[text("abcd")]);
    }

    #[test]
    fn blank_documents() {
        let mut doc = DocumentBuffer::new();
        assert!(doc.is_empty());
        assert!(doc.is_blank());
        doc.insert_text("  \n");
        assert!(!doc.is_empty());
        assert!(doc.is_blank());
        doc.insert_card();
        assert!(!doc.is_blank());
    }

    #[test]
    fn set_cursor_clamps_to_end() {
        let mut doc = DocumentBuffer::new();
        doc.insert_text("abc");
        doc.set_cursor(42);
        assert_eq!(doc.cursor(), 3);
    }
}
