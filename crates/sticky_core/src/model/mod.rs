//! Embedded object model and persisted record schema.
//!
//! # Responsibility
//! - Define cards and tables as independently mutable structured objects.
//! - Define the persisted record shape every segment maps to.
//!
//! # Invariants
//! - Every embedded object is addressed by a stable `EmbeddedId`.
//! - Objects snapshot their state on demand (`data()`); nothing is cached.

pub mod card;
pub mod embedded;
pub mod frame;
pub mod record;
pub mod table;
