//! Note editing session service.
//!
//! # Responsibility
//! - Hold the open note's name and its `DocumentBuffer`.
//! - Orchestrate new/open/save/rename/delete against a `NoteStore`.
//! - Track unsaved changes so the shell can prompt before discarding them.
//!
//! # Invariants
//! - Exactly one document is open at a time; switching notes discards the
//!   previous buffer.
//! - Failed operations leave the open note, its document and the dirty flag
//!   unchanged.
//! - Blank documents are never written.

use crate::document::DocumentBuffer;
use crate::store::note_store::{normalize_note_name, NoteStore, StoreError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for note session use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Document has no objects and only whitespace text.
    EmptyNote,
    /// `save` called on a note that was never named.
    NameRequired,
    /// Storage-layer failure.
    Store(StoreError),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyNote => write!(f, "note is empty"),
            Self::NameRequired => write!(f, "note has no name yet; use save-as"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for NoteServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Editing session over one note store.
pub struct NoteService<S: NoteStore> {
    store: S,
    current: Option<String>,
    document: DocumentBuffer,
    dirty: bool,
}

impl<S: NoteStore> NoteService<S> {
    /// Creates a session with an empty, unnamed note.
    pub fn new(store: S) -> Self {
        Self {
            store,
            current: None,
            document: DocumentBuffer::new(),
            dirty: false,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Normalized name of the open note, if it has been saved or opened.
    pub fn current_note(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn document(&self) -> &DocumentBuffer {
        &self.document
    }

    /// Mutable document access for edits; marks the session dirty.
    pub fn document_mut(&mut self) -> &mut DocumentBuffer {
        self.dirty = true;
        &mut self.document
    }

    /// Returns whether the open note has edits not yet written.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn list_notes(&self) -> Result<Vec<String>, NoteServiceError> {
        Ok(self.store.list_notes()?)
    }

    /// Discards the open note and starts an empty, unnamed one.
    pub fn new_note(&mut self) {
        self.current = None;
        self.document.clear();
        self.dirty = false;
    }

    /// Loads a note from storage, replacing the open document.
    pub fn open_note(&mut self, name: &str) -> Result<(), NoteServiceError> {
        let name = normalize_note_name(name)?;
        let records = self.store.load_note(&name)?;
        self.document.deserialize(records);
        self.current = Some(name);
        self.dirty = false;
        Ok(())
    }

    /// Writes the open document back under its current name.
    ///
    /// # Errors
    /// - `NameRequired` when the note was never named.
    /// - `EmptyNote` when the document is blank.
    pub fn save(&mut self) -> Result<(), NoteServiceError> {
        let name = self.current.clone().ok_or(NoteServiceError::NameRequired)?;
        self.write(&name)?;
        Ok(())
    }

    /// Writes the open document under a new name and adopts that name.
    ///
    /// # Errors
    /// - `EmptyNote` when the document is blank.
    /// - `Store(AlreadyExists)` when a note with that name exists.
    pub fn save_as(&mut self, name: &str) -> Result<String, NoteServiceError> {
        if self.document.is_blank() {
            return Err(NoteServiceError::EmptyNote);
        }
        let name = normalize_note_name(name)?;
        if self.store.exists(&name)? {
            return Err(StoreError::AlreadyExists(name).into());
        }
        let saved = self.write(&name)?;
        self.current = Some(saved.clone());
        Ok(saved)
    }

    /// Renames a stored note; follows the rename if it is the open one.
    pub fn rename_note(&mut self, from: &str, to: &str) -> Result<String, NoteServiceError> {
        let from = normalize_note_name(from)?;
        let renamed = self.store.rename_note(&from, to)?;
        if self.current.as_deref() == Some(from.as_str()) {
            self.current = Some(renamed.clone());
        }
        Ok(renamed)
    }

    /// Deletes a stored note; deleting the open note clears the editor.
    pub fn delete_note(&mut self, name: &str) -> Result<(), NoteServiceError> {
        let name = normalize_note_name(name)?;
        self.store.delete_note(&name)?;
        if self.current.as_deref() == Some(name.as_str()) {
            self.new_note();
        }
        Ok(())
    }

    fn write(&mut self, name: &str) -> Result<String, NoteServiceError> {
        if self.document.is_blank() {
            return Err(NoteServiceError::EmptyNote);
        }
        let saved = self.store.save_note(name, &self.document.serialize())?;
        self.dirty = false;
        info!(
            "event=session_save module=service status=ok objects={}",
            self.document.object_count()
        );
        Ok(saved)
    }
}
