//! SQLite-backed notes store.
//!
//! # Invariants
//! - Notes are listed by insertion sequence (`seq ASC`).
//! - `date_edited` is written as `max(now, previous stamp)` in SQL so it
//!   never decreases.
//! - Read paths reject undecodable rows instead of masking them.

use crate::model::category::Category;
use crate::model::note::{Note, NoteDraft, NoteId};
use crate::store::clock::{Clock, SystemClock};
use crate::store::{NoteStore, StoreError, StoreResult};
use rusqlite::{params, Connection, Row};
use std::sync::Arc;
use uuid::Uuid;

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    title,
    content,
    category,
    date_added,
    date_edited
FROM notes";

/// Notes store over a migrated connection (see [`crate::db::open_db`]).
pub struct SqliteNoteStore<'conn> {
    conn: &'conn Connection,
    clock: Arc<dyn Clock>,
}

impl<'conn> SqliteNoteStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self::with_clock(conn, Arc::new(SystemClock))
    }

    pub fn with_clock(conn: &'conn Connection, clock: Arc<dyn Clock>) -> Self {
        Self { conn, clock }
    }
}

impl NoteStore for SqliteNoteStore<'_> {
    fn list_notes(&self) -> StoreResult<Vec<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} ORDER BY seq ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }
        Ok(notes)
    }

    fn get_note(&self, id: NoteId) -> StoreResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_note_row(row)?)),
            None => Ok(None),
        }
    }

    fn add_note(&mut self, draft: &NoteDraft) -> StoreResult<Note> {
        let note = Note::create(draft, self.clock.now_epoch_ms());
        self.conn.execute(
            "INSERT INTO notes (id, title, content, category, date_added, date_edited)
             VALUES (?1, ?2, ?3, ?4, ?5, NULL);",
            params![
                note.id.to_string(),
                note.title.as_deref(),
                note.content.as_str(),
                note.category.as_str(),
                note.date_added,
            ],
        )?;
        Ok(note)
    }

    fn update_note(&mut self, id: NoteId, draft: &NoteDraft) -> StoreResult<Note> {
        let changed = self.conn.execute(
            "UPDATE notes
             SET
                title = ?2,
                content = ?3,
                category = ?4,
                date_edited = max(?5, COALESCE(date_edited, date_added))
             WHERE id = ?1;",
            params![
                id.to_string(),
                draft.title(),
                draft.content(),
                draft.category().as_str(),
                self.clock.now_epoch_ms(),
            ],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }

        self.get_note(id)?.ok_or(StoreError::NotFound(id))
    }

    fn delete_note(&mut self, id: NoteId) -> StoreResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM notes WHERE id = ?1;", [id.to_string()])?;
        Ok(changed > 0)
    }
}

fn parse_note_row(row: &Row<'_>) -> StoreResult<Note> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        StoreError::InvalidData(format!("invalid uuid value `{id_text}` in notes.id"))
    })?;

    let content: String = row.get("content")?;
    if content.is_empty() {
        return Err(StoreError::InvalidData(format!(
            "empty content for note `{id_text}`"
        )));
    }

    let category: String = row.get("category")?;
    Ok(Note {
        id,
        title: row.get("title")?,
        content,
        category: Category::new(category),
        date_added: row.get("date_added")?,
        date_edited: row.get("date_edited")?,
    })
}
