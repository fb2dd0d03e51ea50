//! In-memory notes store.
//!
//! Backs previews, tests and the offline fallback of the mobile client.

use crate::model::note::{Note, NoteDraft, NoteId};
use crate::store::clock::{Clock, SystemClock};
use crate::store::{NoteStore, StoreError, StoreResult};
use std::collections::HashSet;
use std::sync::Arc;

/// `Vec`-backed store preserving insertion order.
pub struct InMemoryNoteStore {
    notes: Vec<Note>,
    clock: Arc<dyn Clock>,
}

impl InMemoryNoteStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            notes: Vec::new(),
            clock,
        }
    }

    /// Seeds the store with existing notes.
    ///
    /// # Errors
    /// - `InvalidData` when two notes share an id.
    pub fn from_notes(notes: Vec<Note>, clock: Arc<dyn Clock>) -> StoreResult<Self> {
        let mut seen = HashSet::with_capacity(notes.len());
        for note in &notes {
            if !seen.insert(note.id) {
                return Err(StoreError::InvalidData(format!(
                    "duplicate note id `{}`",
                    note.id
                )));
            }
        }
        Ok(Self { notes, clock })
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

impl Default for InMemoryNoteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteStore for InMemoryNoteStore {
    fn list_notes(&self) -> StoreResult<Vec<Note>> {
        Ok(self.notes.clone())
    }

    fn get_note(&self, id: NoteId) -> StoreResult<Option<Note>> {
        Ok(self.notes.iter().find(|note| note.id == id).cloned())
    }

    fn add_note(&mut self, draft: &NoteDraft) -> StoreResult<Note> {
        let note = Note::create(draft, self.clock.now_epoch_ms());
        self.notes.push(note.clone());
        Ok(note)
    }

    fn update_note(&mut self, id: NoteId, draft: &NoteDraft) -> StoreResult<Note> {
        let now_ms = self.clock.now_epoch_ms();
        let note = self
            .notes
            .iter_mut()
            .find(|note| note.id == id)
            .ok_or(StoreError::NotFound(id))?;
        note.apply_update(draft, now_ms);
        Ok(note.clone())
    }

    fn delete_note(&mut self, id: NoteId) -> StoreResult<bool> {
        let before = self.notes.len();
        self.notes.retain(|note| note.id != id);
        Ok(self.notes.len() != before)
    }
}
