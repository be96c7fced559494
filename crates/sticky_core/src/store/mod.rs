//! Note directory storage.
//!
//! # Responsibility
//! - Define the contract the editor session uses to list, load and persist
//!   notes.
//! - Keep filesystem details behind that contract.
//!
//! # Invariants
//! - Note names are normalized before touching the filesystem.
//! - Storage failures never mutate an open document.

pub mod note_store;
