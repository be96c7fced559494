//! Note store contract and directory-backed implementation.
//!
//! # Responsibility
//! - Map note names to files inside one notes directory.
//! - Read/write the persisted segment-record format.
//!
//! # Invariants
//! - Names never escape the notes directory (no separators or reserved
//!   characters).
//! - Names without a known extension get `.json` appended.
//! - Rename never overwrites an existing note.

use crate::model::record::SegmentRecord;
use crate::persist::json::{records_from_str, records_to_string, PersistError};
use log::{error, info};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Extension for notes written by this version.
pub const NOTE_EXTENSION: &str = "json";
/// Extension of plain-text notes from older versions.
pub const LEGACY_NOTE_EXTENSION: &str = "txt";

static RESERVED_NAME_CHARS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[/\\:*?"<>|\x00-\x1F]"#).expect("valid reserved-char regex")
});

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from note storage operations.
#[derive(Debug)]
pub enum StoreError {
    /// Name is empty or contains separators/reserved characters.
    InvalidName(String),
    /// No note with this (normalized) name exists.
    NotFound(String),
    /// A note with this (normalized) name already exists.
    AlreadyExists(String),
    /// Filesystem read/write failure.
    Io {
        operation: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    /// File content is not a valid persisted note.
    Persist { name: String, source: PersistError },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName(name) => write!(f, "invalid note name: `{name}`"),
            Self::NotFound(name) => write!(f, "note not found: {name}"),
            Self::AlreadyExists(name) => write!(f, "note already exists: {name}"),
            Self::Io {
                operation,
                path,
                source,
            } => write!(f, "failed to {operation} `{}`: {source}", path.display()),
            Self::Persist { name, source } => write!(f, "note `{name}` is unreadable: {source}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Persist { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Storage contract for named notes.
///
/// Every method accepts raw user-entered names and normalizes them with
/// [`normalize_note_name`].
pub trait NoteStore {
    /// Returns note file names, sorted.
    fn list_notes(&self) -> StoreResult<Vec<String>>;
    fn exists(&self, name: &str) -> StoreResult<bool>;
    /// Reads one note's segment records.
    fn load_note(&self, name: &str) -> StoreResult<Vec<SegmentRecord>>;
    /// Creates or overwrites a note; returns the normalized name.
    fn save_note(&self, name: &str, records: &[SegmentRecord]) -> StoreResult<String>;
    /// Renames a note; returns the normalized new name.
    fn rename_note(&self, from: &str, to: &str) -> StoreResult<String>;
    fn delete_note(&self, name: &str) -> StoreResult<()>;
}

/// Normalizes a user-entered note name to its file name.
///
/// Rules:
/// - Surrounding whitespace is trimmed; empty names are rejected.
/// - Path separators, reserved characters and control characters are
///   rejected.
/// - `.json` is appended unless the name ends in `.json` or `.txt`.
pub fn normalize_note_name(raw: &str) -> StoreResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || RESERVED_NAME_CHARS_RE.is_match(trimmed) {
        return Err(StoreError::InvalidName(raw.to_string()));
    }
    if trimmed == "." || trimmed == ".." {
        return Err(StoreError::InvalidName(raw.to_string()));
    }

    if has_note_extension(trimmed) {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("{trimmed}.{NOTE_EXTENSION}"))
    }
}

fn has_note_extension(name: &str) -> bool {
    match Path::new(name).extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            ext.eq_ignore_ascii_case(NOTE_EXTENSION) || ext.eq_ignore_ascii_case(LEGACY_NOTE_EXTENSION)
        }
        None => false,
    }
}

fn is_legacy_note(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(LEGACY_NOTE_EXTENSION))
}

/// Notes directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsNoteStore {
    root: PathBuf,
}

impl FsNoteStore {
    /// Opens (creating if needed) a notes directory.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|source| StoreError::Io {
            operation: "create notes directory",
            path: root.clone(),
            source,
        })?;
        info!("event=store_open module=store status=ok");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, raw: &str) -> StoreResult<(String, PathBuf)> {
        let name = normalize_note_name(raw)?;
        let path = self.root.join(&name);
        Ok((name, path))
    }
}

impl NoteStore for FsNoteStore {
    fn list_notes(&self) -> StoreResult<Vec<String>> {
        let entries = std::fs::read_dir(&self.root).map_err(|source| StoreError::Io {
            operation: "list notes directory",
            path: self.root.clone(),
            source,
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io {
                operation: "list notes directory",
                path: self.root.clone(),
                source,
            })?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                if has_note_extension(name) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn exists(&self, name: &str) -> StoreResult<bool> {
        let (_, path) = self.resolve(name)?;
        Ok(path.is_file())
    }

    fn load_note(&self, name: &str) -> StoreResult<Vec<SegmentRecord>> {
        let (name, path) = self.resolve(name)?;
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound(name));
            }
            Err(source) => {
                error!("event=note_load module=store status=error error_code=read_failed");
                return Err(StoreError::Io {
                    operation: "read note",
                    path,
                    source,
                });
            }
        };

        let records = match records_from_str(&raw) {
            Ok(records) => records,
            Err(_) if is_legacy_note(&name) => legacy_records(&raw),
            Err(source) => {
                error!("event=note_load module=store status=error error_code=invalid_content");
                return Err(StoreError::Persist { name, source });
            }
        };
        info!(
            "event=note_load module=store status=ok segments={} bytes={}",
            records.len(),
            raw.len()
        );
        Ok(records)
    }

    fn save_note(&self, name: &str, records: &[SegmentRecord]) -> StoreResult<String> {
        let (name, path) = self.resolve(name)?;
        let text = records_to_string(records).map_err(|source| StoreError::Persist {
            name: name.clone(),
            source,
        })?;
        write_replacing(&self.root, &path, text.as_bytes()).map_err(|source| {
            error!("event=note_save module=store status=error error_code=write_failed");
            StoreError::Io {
                operation: "write note",
                path: path.clone(),
                source,
            }
        })?;
        info!(
            "event=note_save module=store status=ok segments={} bytes={}",
            records.len(),
            text.len()
        );
        Ok(name)
    }

    fn rename_note(&self, from: &str, to: &str) -> StoreResult<String> {
        let (from_name, from_path) = self.resolve(from)?;
        let (to_name, to_path) = self.resolve(to)?;
        if !from_path.is_file() {
            return Err(StoreError::NotFound(from_name));
        }
        if from_name == to_name {
            return Ok(to_name);
        }
        if to_path.exists() {
            return Err(StoreError::AlreadyExists(to_name));
        }

        std::fs::rename(&from_path, &to_path).map_err(|source| StoreError::Io {
            operation: "rename note",
            path: from_path.clone(),
            source,
        })?;
        info!("event=note_rename module=store status=ok");
        Ok(to_name)
    }

    fn delete_note(&self, name: &str) -> StoreResult<()> {
        let (name, path) = self.resolve(name)?;
        match std::fs::remove_file(&path) {
            Ok(()) => {
                info!("event=note_delete module=store status=ok");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Err(StoreError::NotFound(name)),
            Err(source) => Err(StoreError::Io {
                operation: "delete note",
                path,
                source,
            }),
        }
    }
}

/// Writes `bytes` to a temp file in `dir`, then renames it over `path`.
///
/// A failed write leaves any previous note at `path` intact.
fn write_replacing(dir: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(bytes)?;
    staged.as_file().sync_all()?;
    staged.persist(path).map_err(|err| err.error)?;
    Ok(())
}

/// Plain-text notes load as a single text run.
fn legacy_records(raw: &str) -> Vec<SegmentRecord> {
    if raw.is_empty() {
        Vec::new()
    } else {
        vec![SegmentRecord::text(raw)]
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_note_name, FsNoteStore, NoteStore, StoreError};
    use crate::model::record::SegmentRecord;

    #[test]
    fn normalize_appends_json_extension() {
        assert_eq!(normalize_note_name(" groceries ").unwrap(), "groceries.json");
        assert_eq!(normalize_note_name("plan.json").unwrap(), "plan.json");
        assert_eq!(normalize_note_name("old.TXT").unwrap(), "old.TXT");
        assert_eq!(normalize_note_name("v1.2").unwrap(), "v1.2.json");
    }

    #[test]
    fn normalize_rejects_empty_and_path_like_names() {
        for raw in ["", "   ", "../escape", "a/b", "a\\b", "what?", "..", "tab\there"] {
            assert!(
                matches!(normalize_note_name(raw), Err(StoreError::InvalidName(_))),
                "`{raw}` should be rejected"
            );
        }
    }

    #[test]
    fn legacy_plain_text_note_loads_as_one_run() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsNoteStore::open(dir.path()).unwrap();
        std::fs::write(dir.path().join("old.txt"), "not json\nat all").unwrap();
        std::fs::write(dir.path().join("empty.txt"), "").unwrap();

        assert_eq!(
            store.load_note("old.txt").unwrap(),
            vec![SegmentRecord::text("not json\nat all")]
        );
        assert!(store.load_note("empty.txt").unwrap().is_empty());
    }

    #[test]
    fn save_replaces_existing_note_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsNoteStore::open(dir.path()).unwrap();

        store
            .save_note("plan", &[SegmentRecord::text("first draft that is longer")])
            .unwrap();
        store.save_note("plan", &[SegmentRecord::text("short")]).unwrap();

        assert_eq!(store.load_note("plan").unwrap(), vec![SegmentRecord::text("short")]);
        let files: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(files, vec!["plan.json"]);
    }
}
