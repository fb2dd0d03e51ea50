//! Note collection query pipeline.
//!
//! # Responsibility
//! - Derive the ordered, filtered note sequence every list screen renders.
//! - Keep one parameterized pipeline instead of per-screen copies.
//!
//! # Invariants
//! - All operations are total, pure and never mutate their input.
//! - Composition order is category scope, then sort, then search.

pub mod pipeline;

pub use pipeline::{apply, filter_by_category, search, sort, NoteQuery, SortBy, SortOrder};
