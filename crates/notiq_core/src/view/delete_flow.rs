//! Two-phase delete workflow.
//!
//! Per note: `Idle -> ConfirmPending -> {Idle (cancel), Deleting -> Idle}`.
//! The user-facing confirmation happens outside this module; this module
//! only guarantees that no store mutation happens without a confirmed
//! [`DeleteTicket`], and that a note is never deleted twice concurrently.
//! Tickets are bound to the workflow that issued them.

use crate::model::note::{Note, NoteId};
use crate::store::{ErrorKind, NoteStore, StoreError};
use crate::view::presentation::display_title;
use log::{info, warn};
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_WORKFLOW_ID: AtomicU64 = AtomicU64::new(1);

/// Observable phase of one note's delete workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletePhase {
    Idle,
    ConfirmPending,
    Deleting,
}

/// Confirmation request to show the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePrompt {
    pub note_id: NoteId,
    pub display_title: String,
}

impl DeletePrompt {
    pub fn message(&self) -> String {
        format!("Remove \"{}\"?", self.display_title)
    }
}

/// Proof that the user confirmed deleting one note. Single use.
#[must_use = "a confirmed delete must be committed or the note stays in Deleting"]
#[derive(Debug, PartialEq, Eq)]
pub struct DeleteTicket {
    workflow_id: u64,
    note_id: NoteId,
}

impl DeleteTicket {
    pub fn note_id(&self) -> NoteId {
        self.note_id
    }
}

/// Result of a committed delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Removed,
    /// The note was already gone (e.g. deleted from another screen).
    AlreadyGone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteWorkflowError {
    /// A delete for this note is already in flight.
    InFlight(NoteId),
    /// `confirm` was called without a pending request.
    NotPending(NoteId),
    /// The ticket was issued by a different workflow.
    ForeignTicket(NoteId),
}

impl Display for DeleteWorkflowError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InFlight(id) => write!(f, "delete already in progress for note {id}"),
            Self::NotPending(id) => write!(f, "no pending delete request for note {id}"),
            Self::ForeignTicket(id) => {
                write!(f, "delete ticket for note {id} belongs to another workflow")
            }
        }
    }
}

impl Error for DeleteWorkflowError {}

/// Failure of a committed delete.
#[derive(Debug)]
pub enum DeleteError {
    /// Rejected before the store was touched.
    Workflow(DeleteWorkflowError),
    Store(StoreError),
}

impl DeleteError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Workflow(_) => ErrorKind::Validation,
            Self::Store(err) => err.kind(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(err) if err.is_retryable())
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Workflow(_) => "This note is not waiting for a delete confirmation.",
            Self::Store(err) => err.user_message(),
        }
    }
}

impl Display for DeleteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Workflow(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DeleteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Workflow(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<DeleteWorkflowError> for DeleteError {
    fn from(value: DeleteWorkflowError) -> Self {
        Self::Workflow(value)
    }
}

impl From<StoreError> for DeleteError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

#[derive(Debug, Clone)]
enum Pending {
    Confirm(DeletePrompt),
    Deleting,
}

/// Delete workflow state for every note a screen shows.
#[derive(Debug)]
pub struct DeleteWorkflow {
    id: u64,
    pending: HashMap<NoteId, Pending>,
}

impl Default for DeleteWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl DeleteWorkflow {
    pub fn new() -> Self {
        Self {
            id: NEXT_WORKFLOW_ID.fetch_add(1, Ordering::Relaxed),
            pending: HashMap::new(),
        }
    }

    pub fn phase(&self, note_id: NoteId) -> DeletePhase {
        match self.pending.get(&note_id) {
            None => DeletePhase::Idle,
            Some(Pending::Confirm(_)) => DeletePhase::ConfirmPending,
            Some(Pending::Deleting) => DeletePhase::Deleting,
        }
    }

    /// Records a delete intent. Side-effect free with respect to the store.
    ///
    /// Repeating the request while confirmation is pending returns the
    /// existing prompt.
    ///
    /// # Errors
    /// - `InFlight` while the same note is being deleted.
    pub fn request(
        &mut self,
        note_id: NoteId,
        title: Option<&str>,
    ) -> Result<DeletePrompt, DeleteWorkflowError> {
        match self.pending.get(&note_id) {
            Some(Pending::Deleting) => Err(DeleteWorkflowError::InFlight(note_id)),
            Some(Pending::Confirm(prompt)) => Ok(prompt.clone()),
            None => {
                let prompt = DeletePrompt {
                    note_id,
                    display_title: display_title(title).to_string(),
                };
                self.pending
                    .insert(note_id, Pending::Confirm(prompt.clone()));
                Ok(prompt)
            }
        }
    }

    /// Drops a pending request. Returns `false` when nothing was pending.
    ///
    /// An in-flight delete cannot be cancelled.
    pub fn cancel(&mut self, note_id: NoteId) -> bool {
        if matches!(self.pending.get(&note_id), Some(Pending::Confirm(_))) {
            self.pending.remove(&note_id);
            return true;
        }
        false
    }

    /// Accepts the user's confirmation and moves the note to `Deleting`.
    ///
    /// # Errors
    /// - `InFlight` when already confirmed.
    /// - `NotPending` when no request was made (or it was cancelled).
    pub fn confirm(&mut self, note_id: NoteId) -> Result<DeleteTicket, DeleteWorkflowError> {
        match self.pending.get(&note_id) {
            Some(Pending::Confirm(_)) => {
                self.pending.insert(note_id, Pending::Deleting);
                Ok(DeleteTicket {
                    workflow_id: self.id,
                    note_id,
                })
            }
            Some(Pending::Deleting) => Err(DeleteWorkflowError::InFlight(note_id)),
            None => Err(DeleteWorkflowError::NotPending(note_id)),
        }
    }

    /// Returns the note to `Idle` without touching the store.
    ///
    /// # Errors
    /// - `ForeignTicket` when another workflow issued `ticket`.
    pub fn complete(&mut self, ticket: DeleteTicket) -> Result<(), DeleteWorkflowError> {
        self.check_owner(&ticket)?;
        self.pending.remove(&ticket.note_id);
        Ok(())
    }

    /// Returns a `Deleting` note whose ticket was lost to `Idle`.
    ///
    /// Returns `false` unless the note was `Deleting`.
    pub fn abandon(&mut self, note_id: NoteId) -> bool {
        if matches!(self.pending.get(&note_id), Some(Pending::Deleting)) {
            self.pending.remove(&note_id);
            warn!("event=delete_abandon module=view status=ok note_id={note_id}");
            return true;
        }
        false
    }

    /// Drops workflow entries for notes missing from `live`.
    ///
    /// A ticket for a pruned note can still be committed; the store then
    /// reports the note as already gone. Returns the number of dropped entries.
    pub fn prune(&mut self, live: &[Note]) -> usize {
        let live_ids = live.iter().map(|note| note.id).collect::<HashSet<_>>();
        let before = self.pending.len();
        self.pending.retain(|note_id, _| live_ids.contains(note_id));
        let pruned = before - self.pending.len();
        if pruned > 0 {
            info!("event=delete_prune module=view status=ok pruned={pruned}");
        }
        pruned
    }

    fn check_owner(&self, ticket: &DeleteTicket) -> Result<(), DeleteWorkflowError> {
        if ticket.workflow_id == self.id {
            Ok(())
        } else {
            Err(DeleteWorkflowError::ForeignTicket(ticket.note_id))
        }
    }

    /// Performs the confirmed delete against `store`.
    ///
    /// The workflow returns to `Idle` whether or not the store call
    /// succeeded; store errors are handed back for the screen to report.
    ///
    /// # Errors
    /// - `DeleteError::Workflow` for a foreign ticket; nothing is deleted.
    /// - `DeleteError::Store` when the store call fails.
    pub fn commit<S: NoteStore + ?Sized>(
        &mut self,
        ticket: DeleteTicket,
        store: &mut S,
    ) -> Result<DeleteOutcome, DeleteError> {
        let note_id = ticket.note_id;
        if let Err(err) = self.check_owner(&ticket) {
            warn!("event=note_delete module=view status=rejected note_id={note_id} error={err}");
            return Err(err.into());
        }
        let result = store.delete_note(note_id);
        self.pending.remove(&note_id);

        match result {
            Ok(true) => {
                info!("event=note_delete module=view status=ok note_id={note_id}");
                Ok(DeleteOutcome::Removed)
            }
            Ok(false) => {
                info!("event=note_delete module=view status=ok note_id={note_id} already_gone=true");
                Ok(DeleteOutcome::AlreadyGone)
            }
            Err(err) => {
                warn!(
                    "event=note_delete module=view status=error note_id={note_id} retryable={} error={err}",
                    err.is_retryable()
                );
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DeleteError, DeletePhase, DeleteWorkflow, DeleteWorkflowError};
    use crate::model::note::{Note, NoteDraft};
    use crate::store::memory::InMemoryNoteStore;
    use crate::store::NoteStore;
    use uuid::Uuid;

    fn live_note(content: &str) -> Note {
        Note::create(&NoteDraft::new(None, content, "work").unwrap(), 1)
    }

    #[test]
    fn request_then_cancel_returns_to_idle() {
        let mut workflow = DeleteWorkflow::new();
        let id = Uuid::new_v4();

        let prompt = workflow.request(id, None).unwrap();
        assert_eq!(prompt.message(), "Remove \"Untitled\"?");
        assert_eq!(workflow.phase(id), DeletePhase::ConfirmPending);

        assert!(workflow.cancel(id));
        assert_eq!(workflow.phase(id), DeletePhase::Idle);
        assert!(!workflow.cancel(id));
    }

    #[test]
    fn confirmed_delete_blocks_new_intents_until_complete() {
        let mut workflow = DeleteWorkflow::new();
        let id = Uuid::new_v4();

        workflow.request(id, Some("Trip")).unwrap();
        let ticket = workflow.confirm(id).unwrap();
        assert_eq!(workflow.phase(id), DeletePhase::Deleting);
        assert_eq!(
            workflow.request(id, Some("Trip")),
            Err(DeleteWorkflowError::InFlight(id))
        );
        assert!(!workflow.cancel(id));

        workflow.complete(ticket).unwrap();
        assert_eq!(workflow.phase(id), DeletePhase::Idle);
    }

    #[test]
    fn ticket_from_another_workflow_is_rejected() {
        let mut store = InMemoryNoteStore::new();
        let note = store
            .add_note(&NoteDraft::new(None, "keep me", "work").unwrap())
            .unwrap();
        let mut first = DeleteWorkflow::new();
        let mut second = DeleteWorkflow::new();

        first.request(note.id, None).unwrap();
        let ticket = first.confirm(note.id).unwrap();

        let err = second.commit(ticket, &mut store).unwrap_err();
        assert!(matches!(
            err,
            DeleteError::Workflow(DeleteWorkflowError::ForeignTicket(id)) if id == note.id
        ));
        assert!(!err.is_retryable());
        assert_eq!(store.len(), 1);
        assert_eq!(first.phase(note.id), DeletePhase::Deleting);

        assert!(first.abandon(note.id));
        assert_eq!(first.phase(note.id), DeletePhase::Idle);
        assert!(!first.abandon(note.id));
    }

    #[test]
    fn prune_drops_entries_for_vanished_notes() {
        let mut workflow = DeleteWorkflow::new();
        let kept = live_note("kept");
        let vanished_pending = Uuid::new_v4();
        let vanished_deleting = Uuid::new_v4();

        workflow.request(kept.id, None).unwrap();
        workflow.request(vanished_pending, None).unwrap();
        workflow.request(vanished_deleting, None).unwrap();
        let stale_ticket = workflow.confirm(vanished_deleting).unwrap();

        assert_eq!(workflow.prune(std::slice::from_ref(&kept)), 2);
        assert_eq!(workflow.phase(kept.id), DeletePhase::ConfirmPending);
        assert_eq!(workflow.phase(vanished_pending), DeletePhase::Idle);
        assert_eq!(workflow.phase(vanished_deleting), DeletePhase::Idle);

        let mut store = InMemoryNoteStore::new();
        assert_eq!(
            workflow.commit(stale_ticket, &mut store).unwrap(),
            super::DeleteOutcome::AlreadyGone
        );
    }

    #[test]
    fn confirm_without_request_is_rejected() {
        let mut workflow = DeleteWorkflow::new();
        let id = Uuid::new_v4();
        assert_eq!(
            workflow.confirm(id).unwrap_err(),
            DeleteWorkflowError::NotPending(id)
        );
    }

    #[test]
    fn repeated_request_reuses_prompt() {
        let mut workflow = DeleteWorkflow::new();
        let id = Uuid::new_v4();
        let first = workflow.request(id, Some("Groceries")).unwrap();
        let second = workflow.request(id, Some("renamed meanwhile")).unwrap();
        assert_eq!(first, second);
    }
}
