//! Core domain logic for the sticky-notes editor.
//! This crate owns the mixed-content document model and its persisted form.

pub mod config;
pub mod document;
pub mod logging;
pub mod model;
pub mod persist;
pub mod service;
pub mod store;
pub mod theme;

pub use config::AppConfig;
pub use document::{DocumentBuffer, DocumentError, ObjectIndex, Segment, OBJECT_PLACEHOLDER};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel};
pub use model::card::Card;
pub use model::embedded::{EmbeddedId, EmbeddedObject, ObjectKind};
pub use model::frame::{Frame, MIN_FRAME_EDGE};
pub use model::record::{CardRecord, SegmentRecord, TableRecord};
pub use model::table::{Alignment, ColumnWidths, Table, TableError, MAX_TABLE_DIMENSION};
pub use persist::json::{
    decode_document, decode_records, encode_document, encode_records, load_into,
    records_from_str, records_to_string, PersistError, PersistResult,
};
pub use service::note_service::{NoteService, NoteServiceError};
pub use store::note_store::{
    normalize_note_name, FsNoteStore, NoteStore, StoreError, StoreResult,
};
pub use theme::{ThemeError, ThemeStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
