//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate document and store calls into use-case level APIs.
//! - Keep UI shells decoupled from storage details.

pub mod note_service;
