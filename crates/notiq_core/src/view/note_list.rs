//! Per-screen note list view-model.
//!
//! # Responsibility
//! - Keep the latest store snapshot and the screen's query state.
//! - Route mutations through the store and refresh before the next render.
//! - Own the screen's delete workflow.
//!
//! # Invariants
//! - `visible()` runs against the snapshot taken after the most recently
//!   completed mutation, unless that refresh failed; then `is_stale()` is
//!   true until the next successful `refresh()`.
//! - A mutation's result is never replaced by a failure of the follow-up
//!   refresh.
//! - After `dismiss()`, mutations still reach the store but the snapshot is
//!   no longer refreshed.
//! - Delete workflow entries only exist for notes in the snapshot.

use crate::model::category::{Category, KnownCategory};
use crate::model::note::{Note, NoteDraft, NoteId};
use crate::query::pipeline::{apply, NoteQuery, SortBy, SortOrder};
use crate::store::{ErrorKind, NoteStore, StoreResult};
use crate::view::delete_flow::{
    DeleteError, DeleteOutcome, DeletePhase, DeletePrompt, DeleteTicket, DeleteWorkflow,
    DeleteWorkflowError,
};
use crate::view::palette::CategoryPalette;
use crate::view::presentation::NoteCard;
use log::{debug, warn};

/// View-model behind the All Notes, Personal and category screens.
pub struct NoteListViewModel<S: NoteStore> {
    store: S,
    snapshot: Vec<Note>,
    query: NoteQuery,
    deletes: DeleteWorkflow,
    stale: bool,
    dismissed: bool,
}

impl<S: NoteStore> NoteListViewModel<S> {
    /// Loads the initial snapshot for `query`.
    pub fn new(store: S, query: NoteQuery) -> StoreResult<Self> {
        let snapshot = store.list_notes()?;
        Ok(Self {
            store,
            snapshot,
            query,
            deletes: DeleteWorkflow::new(),
            stale: false,
            dismissed: false,
        })
    }

    /// Every note, newest first.
    pub fn all_notes(store: S) -> StoreResult<Self> {
        Self::new(store, NoteQuery::default())
    }

    /// Notes in the `personal` category.
    pub fn personal_notes(store: S) -> StoreResult<Self> {
        Self::category(store, KnownCategory::Personal)
    }

    pub fn category(store: S, category: impl Into<Category>) -> StoreResult<Self> {
        Self::new(store, NoteQuery::scoped(category))
    }

    /// Replaces the snapshot with the store's current contents.
    pub fn refresh(&mut self) -> StoreResult<()> {
        self.snapshot = self.store.list_notes()?;
        self.stale = false;
        self.deletes.prune(&self.snapshot);
        debug!(
            "event=view_refresh module=view status=ok note_count={}",
            self.snapshot.len()
        );
        Ok(())
    }

    pub fn snapshot(&self) -> &[Note] {
        &self.snapshot
    }

    /// `true` when a refresh after a completed mutation failed.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn query(&self) -> &NoteQuery {
        &self.query
    }

    /// Notes to render, in order.
    pub fn visible(&self) -> Vec<Note> {
        apply(&self.snapshot, &self.query)
    }

    /// Visible notes projected into cards.
    pub fn cards(&self, palette: &CategoryPalette) -> Vec<NoteCard> {
        self.visible()
            .iter()
            .map(|note| NoteCard::from_note(note, palette))
            .collect()
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.query.search = search.into();
    }

    pub fn set_sort_by(&mut self, sort_by: SortBy) {
        self.query.sort_by = sort_by;
    }

    pub fn set_sort_order(&mut self, sort_order: SortOrder) {
        self.query.sort_order = sort_order;
    }

    pub fn toggle_sort_order(&mut self) {
        self.query.sort_order = self.query.sort_order.toggle();
    }

    pub fn add_note(&mut self, draft: &NoteDraft) -> StoreResult<Note> {
        self.mutate(|store| store.add_note(draft))
    }

    /// Updates a note. A `NotFound` failure still refreshes the snapshot so
    /// the vanished note drops out of the list.
    pub fn update_note(&mut self, id: NoteId, draft: &NoteDraft) -> StoreResult<Note> {
        self.mutate(|store| store.update_note(id, draft))
    }

    pub fn delete_phase(&self, note_id: NoteId) -> DeletePhase {
        self.deletes.phase(note_id)
    }

    pub fn request_delete(
        &mut self,
        note_id: NoteId,
        title: Option<&str>,
    ) -> Result<DeletePrompt, DeleteWorkflowError> {
        self.deletes.request(note_id, title)
    }

    pub fn cancel_delete(&mut self, note_id: NoteId) -> bool {
        self.deletes.cancel(note_id)
    }

    pub fn confirm_delete(&mut self, note_id: NoteId) -> Result<DeleteTicket, DeleteWorkflowError> {
        self.deletes.confirm(note_id)
    }

    /// Releases a note stuck in `Deleting` after its ticket was dropped.
    pub fn abandon_delete(&mut self, note_id: NoteId) -> bool {
        self.deletes.abandon(note_id)
    }

    /// Commits a confirmed delete and refreshes the snapshot.
    pub fn commit_delete(&mut self, ticket: DeleteTicket) -> Result<DeleteOutcome, DeleteError> {
        let result = self.deletes.commit(ticket, &mut self.store);
        if result.is_ok() {
            self.refresh_if_attached();
        }
        result
    }

    /// Marks the screen as gone. Later continuations skip the refresh.
    pub fn dismiss(&mut self) {
        self.dismissed = true;
    }

    pub fn is_dismissed(&self) -> bool {
        self.dismissed
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn mutate<T>(&mut self, op: impl FnOnce(&mut S) -> StoreResult<T>) -> StoreResult<T> {
        let result = op(&mut self.store);
        match &result {
            Ok(_) => self.refresh_if_attached(),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                warn!("event=view_mutation module=view status=not_found action=refresh");
                self.refresh_if_attached();
            }
            Err(_) => {}
        }
        result
    }

    fn refresh_if_attached(&mut self) {
        if self.dismissed {
            debug!("event=view_refresh module=view status=skipped reason=dismissed");
            return;
        }
        if let Err(err) = self.refresh() {
            self.stale = true;
            warn!(
                "event=view_refresh module=view status=error stale=true retryable={} error={err}",
                err.is_retryable()
            );
        }
    }
}
