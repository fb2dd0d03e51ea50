//! Core use-case services.
//!
//! # Responsibility
//! - Turn raw form input into validated store calls.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod note_service;
