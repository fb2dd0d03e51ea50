//! Display projections for note cards and category tiles.

use crate::model::category::{Category, KnownCategory};
use crate::model::note::{Note, NoteId, UNTITLED};
use crate::view::palette::CategoryPalette;
use chrono::{DateTime, Utc};
use serde::Serialize;

const CARD_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Title to render, with the "Untitled" fallback.
pub fn display_title(title: Option<&str>) -> &str {
    match title {
        Some(value) if !value.is_empty() => value,
        _ => UNTITLED,
    }
}

/// Which timestamp a card shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayTimestamp {
    Added(i64),
    Edited(i64),
}

impl DisplayTimestamp {
    /// `date_edited` takes priority permanently once it exists.
    pub fn of(note: &Note) -> Self {
        match note.date_edited {
            Some(edited) => Self::Edited(edited),
            None => Self::Added(note.date_added),
        }
    }

    pub fn epoch_ms(self) -> i64 {
        match self {
            Self::Added(ms) | Self::Edited(ms) => ms,
        }
    }

    /// `Edited • 2026-10-19 14:05` style label (UTC).
    pub fn label(self) -> String {
        let prefix = match self {
            Self::Added(_) => "Added",
            Self::Edited(_) => "Edited",
        };
        format!("{prefix} • {}", format_epoch_ms(self.epoch_ms()))
    }
}

fn format_epoch_ms(epoch_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(epoch_ms)
        .map(|at| at.format(CARD_DATE_FORMAT).to_string())
        .unwrap_or_else(|| "unknown date".to_string())
}

/// Display-ready list item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteCard {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub category: String,
    pub category_color: String,
    pub timestamp_label: String,
}

impl NoteCard {
    pub fn from_note(note: &Note, palette: &CategoryPalette) -> Self {
        Self {
            id: note.id,
            title: display_title(note.title.as_deref()).to_string(),
            content: note.content.clone(),
            category: note.category.to_string(),
            category_color: palette.color_for(note.category.as_str()).to_string(),
            timestamp_label: DisplayTimestamp::of(note).label(),
        }
    }
}

/// Home screen tile: one per category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub label: String,
    pub key: String,
    pub color: String,
    pub note_count: usize,
}

/// Summaries for the known categories in form order, then any other
/// category present in `notes` in first-seen order.
pub fn category_summaries(notes: &[Note], palette: &CategoryPalette) -> Vec<CategorySummary> {
    let mut summaries: Vec<CategorySummary> = KnownCategory::ALL
        .into_iter()
        .map(|known| CategorySummary {
            label: known.label().to_string(),
            key: known.key().to_string(),
            color: palette.color_for(known.key()).to_string(),
            note_count: 0,
        })
        .collect();

    for note in notes {
        let key = note.category.key();
        match summaries.iter_mut().find(|summary| summary.key == key) {
            Some(summary) => summary.note_count += 1,
            None => summaries.push(custom_summary(&note.category, key, palette)),
        }
    }

    summaries
}

fn custom_summary(category: &Category, key: String, palette: &CategoryPalette) -> CategorySummary {
    CategorySummary {
        label: category.to_string(),
        color: palette.color_for(&key).to_string(),
        key,
        note_count: 1,
    }
}
