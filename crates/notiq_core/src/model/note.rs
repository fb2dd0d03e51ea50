//! Note record and validated draft input.
//!
//! # Responsibility
//! - Define the canonical note shape owned by the notes store.
//! - Normalize add/edit form input into a `NoteDraft`.
//!
//! # Invariants
//! - `id` is stable and never reused for another note.
//! - `date_added` is set once at creation and never changes.
//! - `date_edited`, once set, never decreases for the same note.
//! - A draft always has non-empty trimmed content and category.

use crate::model::category::Category;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a note for its whole lifetime.
pub type NoteId = Uuid;

/// Title shown for notes saved without one.
pub const UNTITLED: &str = "Untitled";

/// Canonical note record.
///
/// Serialized with the camelCase field names used by the mobile client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    /// `None` renders as [`UNTITLED`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: String,
    pub category: Category,
    /// Unix epoch milliseconds.
    pub date_added: i64,
    /// Unix epoch milliseconds. Absent until the first update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_edited: Option<i64>,
}

impl Note {
    /// Builds a freshly created note from a validated draft.
    pub fn create(draft: &NoteDraft, now_ms: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: draft.title.clone(),
            content: draft.content.clone(),
            category: draft.category.clone(),
            date_added: now_ms,
            date_edited: None,
        }
    }

    /// Overwrites editable fields and stamps `date_edited`.
    ///
    /// The stamp is clamped so it never goes below the previous edit or the
    /// creation time, even when the wall clock moves backwards.
    pub fn apply_update(&mut self, draft: &NoteDraft, now_ms: i64) {
        self.title = draft.title.clone();
        self.content = draft.content.clone();
        self.category = draft.category.clone();
        self.date_edited = Some(now_ms.max(self.last_touched_ms()));
    }

    /// Timestamp shown on cards: `date_edited` once set, else `date_added`.
    pub fn last_touched_ms(&self) -> i64 {
        self.date_edited.unwrap_or(self.date_added)
    }

    /// Whether the note carries a non-empty title.
    pub fn has_title(&self) -> bool {
        self.title.as_deref().is_some_and(|title| !title.is_empty())
    }
}

/// Input rejected before any store call is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteValidationError {
    /// Content is empty after trimming.
    EmptyContent,
    /// No category was selected.
    MissingCategory,
}

impl NoteValidationError {
    /// Blocking message shown by add/edit screens.
    pub fn user_message(self) -> &'static str {
        match self {
            Self::EmptyContent => "Please enter note content",
            Self::MissingCategory => "Please select a category",
        }
    }
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyContent => write!(f, "note content must not be empty"),
            Self::MissingCategory => write!(f, "note category must be selected"),
        }
    }
}

impl Error for NoteValidationError {}

/// Validated add/update input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    title: Option<String>,
    content: String,
    category: Category,
}

impl NoteDraft {
    /// Normalizes raw form input.
    ///
    /// # Errors
    /// - `MissingCategory` when `category` is blank (checked first, like the form).
    /// - `EmptyContent` when `content` is blank.
    pub fn new(
        title: Option<&str>,
        content: &str,
        category: &str,
    ) -> Result<Self, NoteValidationError> {
        let category = category.trim();
        if category.is_empty() {
            return Err(NoteValidationError::MissingCategory);
        }

        let content = content.trim();
        if content.is_empty() {
            return Err(NoteValidationError::EmptyContent);
        }

        let title = title
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        Ok(Self {
            title,
            content: content.to_string(),
            category: Category::new(category),
        })
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn category(&self) -> &Category {
        &self.category
    }
}
