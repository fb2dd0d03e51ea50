//! View-models consumed by the list and detail screens.
//!
//! # Responsibility
//! - Hold per-screen query state over the latest store snapshot.
//! - Model delete confirmation as an explicit intent/commit workflow.
//! - Project notes into display-ready cards.
//!
//! # Invariants
//! - Derived lists are recomputed from the latest snapshot, never cached.
//! - A note being deleted cannot receive a second delete intent.

pub mod delete_flow;
pub mod note_list;
pub mod palette;
pub mod presentation;
