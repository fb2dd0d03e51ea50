//! Category scope, sort and free-text search over a notes snapshot.

use crate::model::category::Category;
use crate::model::note::Note;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Timestamp a list is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    #[default]
    DateAdded,
    /// Notes never edited fall back to `date_added`.
    DateEdited,
}

impl SortBy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DateAdded => "dateAdded",
            Self::DateEdited => "dateEdited",
        }
    }

    /// Parses the wire value, accepting `date_added` spellings too.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "dateAdded" | "date_added" => Some(Self::DateAdded),
            "dateEdited" | "date_edited" => Some(Self::DateEdited),
            _ => None,
        }
    }

    fn key(self, note: &Note) -> i64 {
        match self {
            Self::DateAdded => note.date_added,
            Self::DateEdited => note.last_touched_ms(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Asc),
            "desc" | "descending" => Some(Self::Desc),
            _ => None,
        }
    }

    #[must_use]
    pub fn toggle(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Full query state of one list screen.
///
/// The default matches a freshly opened screen: newest first by creation
/// time, no search text, no category scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NoteQuery {
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
    pub search: String,
    /// Restricts the list to one category (case-insensitive).
    pub category: Option<Category>,
}

impl NoteQuery {
    /// Query scoped to one category.
    pub fn scoped(category: impl Into<Category>) -> Self {
        Self {
            category: Some(category.into()),
            ..Self::default()
        }
    }
}

/// Orders notes by the chosen timestamp.
///
/// Equal keys keep their input order in both directions.
pub fn sort(notes: &[Note], sort_by: SortBy, sort_order: SortOrder) -> Vec<Note> {
    let mut sorted = notes.to_vec();
    sorted.sort_by(|a, b| compare(sort_by.key(a), sort_by.key(b), sort_order));
    sorted
}

fn compare(a: i64, b: i64, sort_order: SortOrder) -> Ordering {
    match sort_order {
        SortOrder::Asc => a.cmp(&b),
        SortOrder::Desc => b.cmp(&a),
    }
}

/// Keeps notes whose category equals `category`, ignoring case.
pub fn filter_by_category(notes: &[Note], category: &str) -> Vec<Note> {
    notes
        .iter()
        .filter(|note| note.category.matches(category))
        .cloned()
        .collect()
}

/// Case-insensitive substring search over title, content and category.
///
/// A blank query returns the input unchanged. Untitled notes never match on
/// title.
pub fn search(notes: &[Note], query: &str) -> Vec<Note> {
    if query.trim().is_empty() {
        return notes.to_vec();
    }

    let needle = query.to_lowercase();
    notes
        .iter()
        .filter(|note| matches_search(note, &needle))
        .cloned()
        .collect()
}

fn matches_search(note: &Note, needle: &str) -> bool {
    let in_title = note
        .title
        .as_deref()
        .is_some_and(|title| title.to_lowercase().contains(needle));

    in_title
        || note.content.to_lowercase().contains(needle)
        || note.category.as_str().to_lowercase().contains(needle)
}

/// Runs the full pipeline: category scope, then sort, then search.
pub fn apply(notes: &[Note], query: &NoteQuery) -> Vec<Note> {
    let scoped = match query.category.as_ref() {
        Some(category) => filter_by_category(notes, category.as_str()),
        None => notes.to_vec(),
    };
    let sorted = sort(&scoped, query.sort_by, query.sort_order);
    search(&sorted, &query.search)
}
