//! Mixed-content document engine.
//!
//! # Responsibility
//! - Keep the ordered sequence of text runs and embedded object handles.
//! - Own embedded object state through an identity index.
//! - Linearize the document to persisted records and back.
//!
//! # Invariants
//! - Positions count characters of text plus one unit per embedded object.
//! - An embedded segment is removed whole or not at all.
//! - Every `Segment::Embedded` id resolves in the index, and vice versa.

use crate::model::embedded::{EmbeddedId, ObjectKind};
use crate::model::table::TableError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod buffer;
mod index;

pub use buffer::{DocumentBuffer, OBJECT_PLACEHOLDER};
pub use index::ObjectIndex;

/// One ordered element of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Contiguous run of plain text.
    Text(String),
    /// Reference to an embedded object owned by the document's index.
    Embedded(EmbeddedId),
}

impl Segment {
    /// Length in document positions.
    pub fn len(&self) -> usize {
        match self {
            Self::Text(content) => content.chars().count(),
            Self::Embedded(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(content) => content.is_empty(),
            Self::Embedded(_) => false,
        }
    }
}

/// Document-level operation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// Handle does not belong to an object in this document.
    UnknownObject(EmbeddedId),
    /// Handle refers to an object of another kind.
    KindMismatch {
        id: EmbeddedId,
        expected: ObjectKind,
        actual: ObjectKind,
    },
    /// Table edit failed.
    Table(TableError),
}

impl Display for DocumentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownObject(id) => write!(f, "embedded object not found: {id}"),
            Self::KindMismatch {
                id,
                expected,
                actual,
            } => write!(f, "embedded object {id} is a {actual}, expected a {expected}"),
            Self::Table(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DocumentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Table(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TableError> for DocumentError {
    fn from(value: TableError) -> Self {
        Self::Table(value)
    }
}
