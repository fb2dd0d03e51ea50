//! Note domain model.
//!
//! # Responsibility
//! - Define the note record shared by list, detail and edit projections.
//! - Validate user input before it reaches any store.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId`.
//! - Deletion is a hard removal; there is no tombstone state.

pub mod category;
pub mod note;
