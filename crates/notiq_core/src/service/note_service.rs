//! Note use-case service for the add and edit screens.
//!
//! # Responsibility
//! - Validate raw form input before any store call.
//! - Emit metadata-only events for every mutation.
//!
//! # Invariants
//! - Invalid input never reaches the store.
//! - Deleting a missing note is reported as `false`, not as an error.
//! - Logs carry ids and status only; titles and content are never logged.

use crate::model::note::{Note, NoteDraft, NoteId};
use crate::store::{NoteStore, StoreResult};
use log::{info, warn};
use std::time::Instant;

/// Validating facade over a [`NoteStore`].
pub struct NoteService<S: NoteStore> {
    store: S,
}

impl<S: NoteStore> NoteService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Creates one note from form input.
    ///
    /// # Errors
    /// - `StoreError::Validation` for a blank category or content.
    pub fn add_note(
        &mut self,
        title: Option<&str>,
        content: &str,
        category: &str,
    ) -> StoreResult<Note> {
        let started_at = Instant::now();
        let draft = NoteDraft::new(title, content, category).inspect_err(|err| {
            warn!("event=note_add module=service status=rejected reason={err:?}");
        })?;

        let created = self.store.add_note(&draft);
        match &created {
            Ok(note) => info!(
                "event=note_add module=service status=ok note_id={} duration_ms={}",
                note.id,
                started_at.elapsed().as_millis()
            ),
            Err(err) => warn!(
                "event=note_add module=service status=error kind={:?} error={err}",
                err.kind()
            ),
        }
        created
    }

    /// Replaces title, content and category of an existing note.
    ///
    /// # Errors
    /// - `StoreError::Validation` for invalid input (store untouched).
    /// - `StoreError::NotFound` when the note vanished.
    pub fn update_note(
        &mut self,
        id: NoteId,
        title: Option<&str>,
        content: &str,
        category: &str,
    ) -> StoreResult<Note> {
        let started_at = Instant::now();
        let draft = NoteDraft::new(title, content, category).inspect_err(|err| {
            warn!("event=note_update module=service status=rejected note_id={id} reason={err:?}");
        })?;

        let updated = self.store.update_note(id, &draft);
        match &updated {
            Ok(_) => info!(
                "event=note_update module=service status=ok note_id={id} duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => warn!(
                "event=note_update module=service status=error note_id={id} kind={:?} error={err}",
                err.kind()
            ),
        }
        updated
    }

    /// Removes a note. Returns whether it existed.
    pub fn delete_note(&mut self, id: NoteId) -> StoreResult<bool> {
        let removed = self.store.delete_note(id)?;
        info!("event=note_delete module=service status=ok note_id={id} removed={removed}");
        Ok(removed)
    }

    pub fn get_note(&self, id: NoteId) -> StoreResult<Option<Note>> {
        self.store.get_note(id)
    }

    pub fn list_notes(&self) -> StoreResult<Vec<Note>> {
        self.store.list_notes()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::NoteService;
    use crate::model::note::NoteValidationError;
    use crate::store::memory::InMemoryNoteStore;
    use crate::store::StoreError;

    #[test]
    fn invalid_input_never_reaches_store() {
        let mut service = NoteService::new(InMemoryNoteStore::new());

        let err = service.add_note(Some("t"), "   ", "Work").unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(NoteValidationError::EmptyContent)
        ));

        let err = service.add_note(None, "body", "").unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(NoteValidationError::MissingCategory)
        ));

        assert!(service.list_notes().unwrap().is_empty());
    }

    #[test]
    fn add_trims_input() {
        let mut service = NoteService::new(InMemoryNoteStore::new());
        let note = service.add_note(Some("  "), "  hello  ", "Ideas").unwrap();
        assert_eq!(note.title, None);
        assert_eq!(note.content, "hello");
        assert_eq!(note.date_edited, None);
    }
}
