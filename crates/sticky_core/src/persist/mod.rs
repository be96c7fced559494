//! JSON persistence adapter for documents.
//!
//! # Responsibility
//! - Map a `DocumentBuffer` to the persisted JSON array and back.
//! - Tolerate schema drift: records with unknown `type` tags are skipped.
//!
//! # Invariants
//! - Array order is document order, in both directions.
//! - Decoding is all-or-nothing; a malformed known record fails the load and
//!   leaves any target document untouched.

pub mod json;
