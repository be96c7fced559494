//! Embedded object identity and variants.
//!
//! # Invariants
//! - An `EmbeddedId` is generated once per object and never reused.
//! - Identity is independent of the object's position in a document.

use crate::model::card::Card;
use crate::model::frame::Frame;
use crate::model::record::SegmentRecord;
use crate::model::table::Table;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque handle to one embedded object's live state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EmbeddedId(Uuid);

impl EmbeddedId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Display for EmbeddedId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Discriminant of an embedded object, used in errors and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Card,
    Table,
}

impl ObjectKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Table => "table",
        }
    }
}

impl Display for ObjectKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured object placed inline in document text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbeddedObject {
    Card(Card),
    Table(Table),
}

impl EmbeddedObject {
    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::Card(_) => ObjectKind::Card,
            Self::Table(_) => ObjectKind::Table,
        }
    }

    pub fn frame(&self) -> &Frame {
        match self {
            Self::Card(card) => card.frame(),
            Self::Table(table) => table.frame(),
        }
    }

    pub fn set_color(&mut self, color: impl Into<String>) {
        match self {
            Self::Card(card) => card.set_color(color),
            Self::Table(table) => table.set_color(color),
        }
    }

    /// See [`Frame::resize`].
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        match self {
            Self::Card(card) => card.resize(width, height),
            Self::Table(table) => table.resize(width, height),
        }
    }

    /// Live snapshot in persisted shape.
    pub fn data(&self) -> SegmentRecord {
        match self {
            Self::Card(card) => SegmentRecord::Card(card.data()),
            Self::Table(table) => SegmentRecord::Table(table.data()),
        }
    }
}

impl From<Card> for EmbeddedObject {
    fn from(value: Card) -> Self {
        Self::Card(value)
    }
}

impl From<Table> for EmbeddedObject {
    fn from(value: Table) -> Self {
        Self::Table(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{EmbeddedId, EmbeddedObject, ObjectKind};
    use crate::model::card::Card;
    use crate::model::record::SegmentRecord;
    use crate::model::table::Table;

    #[test]
    fn generated_ids_are_distinct() {
        assert_ne!(EmbeddedId::generate(), EmbeddedId::generate());
    }

    #[test]
    fn data_is_tagged_by_variant() {
        let card = EmbeddedObject::from(Card::default());
        let table = EmbeddedObject::from(Table::default());
        assert_eq!(card.kind(), ObjectKind::Card);
        assert!(matches!(card.data(), SegmentRecord::Card(_)));
        assert!(matches!(table.data(), SegmentRecord::Table(_)));
    }

    #[test]
    fn color_and_resize_reach_the_frame() {
        let mut table = EmbeddedObject::from(Table::default());
        table.set_color("#112233");
        assert!(table.resize(400, 200));
        assert_eq!(table.frame().background(), "#112233");
        assert_eq!(table.frame().width(), 400);
    }
}
