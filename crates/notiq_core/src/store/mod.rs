//! Notes store contract and implementations.
//!
//! # Responsibility
//! - Define the add/update/delete/list boundary every screen talks to.
//! - Map storage failures onto the user-facing error taxonomy.
//!
//! # Invariants
//! - `delete_note` on a missing id is a no-op, never an error.
//! - `update_note` on a missing id fails with `StoreError::NotFound`.
//! - `list_notes` returns notes in insertion order.

use crate::db::DbError;
use crate::model::note::{Note, NoteDraft, NoteId, NoteValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod clock;
pub mod memory;
pub mod sqlite;

pub type StoreResult<T> = Result<T, StoreError>;

/// Error taxonomy surfaced to screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Blocking message; the operation was not attempted.
    Validation,
    /// Non-fatal notice; the caller refreshes from the latest snapshot.
    NotFound,
    /// Retryable failure of the underlying storage.
    Store,
}

/// Notes store error.
#[derive(Debug)]
pub enum StoreError {
    Validation(NoteValidationError),
    NotFound(NoteId),
    Db(DbError),
    /// Persisted row cannot be decoded into a `Note`.
    InvalidData(String),
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Db(_) | Self::InvalidData(_) => ErrorKind::Store,
        }
    }

    /// Only storage failures are worth retrying by the user.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Store
    }

    /// Message shown at the screen boundary.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Validation(err) => err.user_message(),
            Self::NotFound(_) => "Note not found",
            Self::Db(_) | Self::InvalidData(_) => "Something went wrong. Please try again.",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<NoteValidationError> for StoreError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence boundary for notes.
pub trait NoteStore {
    /// Current snapshot in insertion order.
    fn list_notes(&self) -> StoreResult<Vec<Note>>;
    fn get_note(&self, id: NoteId) -> StoreResult<Option<Note>>;
    /// Creates a note with `date_added = now` and no `date_edited`.
    fn add_note(&mut self, draft: &NoteDraft) -> StoreResult<Note>;
    /// Overwrites title/content/category and stamps `date_edited`.
    fn update_note(&mut self, id: NoteId, draft: &NoteDraft) -> StoreResult<Note>;
    /// Removes the note. Returns `false` when no such note existed.
    fn delete_note(&mut self, id: NoteId) -> StoreResult<bool>;
}

impl<S: NoteStore + ?Sized> NoteStore for &mut S {
    fn list_notes(&self) -> StoreResult<Vec<Note>> {
        (**self).list_notes()
    }

    fn get_note(&self, id: NoteId) -> StoreResult<Option<Note>> {
        (**self).get_note(id)
    }

    fn add_note(&mut self, draft: &NoteDraft) -> StoreResult<Note> {
        (**self).add_note(draft)
    }

    fn update_note(&mut self, id: NoteId, draft: &NoteDraft) -> StoreResult<Note> {
        (**self).update_note(id, draft)
    }

    fn delete_note(&mut self, id: NoteId) -> StoreResult<bool> {
        (**self).delete_note(id)
    }
}
