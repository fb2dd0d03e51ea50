//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose list, detail and edit use-cases to Dart via FRB.
//! - Fold every core error into a response envelope.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Ids cross the boundary as UUID strings.
//! - Deletes go through one process-wide delete workflow: Dart shows the
//!   prompt from `delete_request` and only `delete_confirm` touches the store.
//! - Config set by `configure` applies to every later call.

use log::{info, warn};
use notiq_core::db::open_db;
use notiq_core::{
    apply, category_summaries, core_version as core_version_inner,
    init_logging as init_logging_inner, init_logging_from_config, ping as ping_inner,
    CoreConfig, DeleteError, DeleteOutcome, DeleteWorkflow, ErrorKind, Note, NoteCard, NoteId,
    NoteQuery, NoteService, SortBy, SortOrder, SqliteNoteStore, StoreError,
};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError, RwLock};
use uuid::Uuid;

static FFI_CONFIG: OnceLock<RwLock<CoreConfig>> = OnceLock::new();
static DELETE_WORKFLOW: OnceLock<Mutex<DeleteWorkflow>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and the error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.trim()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Applies a JSON core config for the rest of the process.
///
/// # FFI contract
/// - Starts logging when the config names a `log_dir`.
/// - Returns empty string on success and the error message on failure; a
///   failed call leaves the previous config in place.
#[flutter_rust_bridge::frb(sync)]
pub fn configure(config_json: String) -> String {
    let config = match CoreConfig::from_json_str(&config_json) {
        Ok(config) => config,
        Err(err) => return format!("invalid config: {err}"),
    };
    if let Err(err) = init_logging_from_config(&config) {
        return err.to_string();
    }
    info!(
        "event=configure module=ffi status=ok db_path={}",
        config.resolve_db_path().display()
    );
    *config_slot()
        .write()
        .unwrap_or_else(PoisonError::into_inner) = config;
    String::new()
}

/// One card of a list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteCardItem {
    pub note_id: String,
    pub title: String,
    pub content: String,
    pub category: String,
    pub category_color: String,
    pub timestamp_label: String,
}

/// Envelope for list screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesViewResponse {
    pub ok: bool,
    pub items: Vec<NoteCardItem>,
    /// Total notes in the store before scope and search.
    pub total_count: u32,
    /// Effective sort key and order, echoed back as wire strings.
    pub sort_by: String,
    pub sort_order: String,
    pub message: String,
}

/// Editable fields of one note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDetail {
    pub note_id: String,
    pub title: Option<String>,
    pub content: String,
    pub category: String,
    pub date_added: i64,
    pub date_edited: Option<i64>,
}

/// Envelope for add/update/get/delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteActionResponse {
    pub ok: bool,
    pub note: Option<NoteDetail>,
    /// `validation|not_found|store|workflow` on failure.
    pub error_kind: Option<String>,
    pub message: String,
}

impl NoteActionResponse {
    fn success(message: impl Into<String>, note: Option<NoteDetail>) -> Self {
        Self {
            ok: true,
            note,
            error_kind: None,
            message: message.into(),
        }
    }

    fn failure(err: &StoreError) -> Self {
        Self {
            ok: false,
            note: None,
            error_kind: Some(error_kind_label(err).to_string()),
            message: err.user_message().to_string(),
        }
    }

    fn delete_failure(err: &DeleteError) -> Self {
        let error_kind = match err {
            DeleteError::Workflow(_) => "workflow",
            DeleteError::Store(err) => error_kind_label(err),
        };
        Self {
            ok: false,
            note: None,
            error_kind: Some(error_kind.to_string()),
            message: err.user_message().to_string(),
        }
    }

    fn invalid_id(raw: &str) -> Self {
        Self {
            ok: false,
            note: None,
            error_kind: Some("validation".to_string()),
            message: invalid_id_message(raw),
        }
    }
}

/// Envelope for `delete_request`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePromptResponse {
    pub ok: bool,
    pub note_id: String,
    /// Confirmation text to show, e.g. `Remove "Trip"?`.
    pub prompt: String,
    /// `validation|not_found|store|workflow` on failure.
    pub error_kind: Option<String>,
    pub message: String,
}

impl DeletePromptResponse {
    fn failure(note_id: &str, error_kind: &str, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            note_id: note_id.to_string(),
            prompt: String::new(),
            error_kind: Some(error_kind.to_string()),
            message: message.into(),
        }
    }
}

/// Category color used by list and home screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryColor {
    pub category: String,
    pub color: String,
    pub note_count: u32,
}

/// Runs the list pipeline for one screen.
///
/// Unknown `sort_by`/`sort_order` strings fall back to the configured
/// default query; `category = None` means every note.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_view(
    sort_by: Option<String>,
    sort_order: Option<String>,
    search: String,
    category: Option<String>,
) -> NotesViewResponse {
    let config = ffi_config();
    let defaults = &config.default_query;
    let query = NoteQuery {
        sort_by: sort_by
            .as_deref()
            .and_then(SortBy::parse)
            .unwrap_or(defaults.sort_by),
        sort_order: sort_order
            .as_deref()
            .and_then(SortOrder::parse)
            .unwrap_or(defaults.sort_order),
        search,
        category: category
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(Into::into),
    };

    let listed = with_service(|service| service.list_notes());
    match listed {
        Ok(notes) => {
            let items = apply(&notes, &query)
                .iter()
                .map(|note| to_card_item(NoteCard::from_note(note, &config.palette)))
                .collect::<Vec<_>>();
            let message = if items.is_empty() {
                "No notes.".to_string()
            } else {
                format!("{} note(s).", items.len())
            };
            NotesViewResponse {
                ok: true,
                items,
                total_count: saturating_u32(notes.len()),
                sort_by: query.sort_by.as_str().to_string(),
                sort_order: query.sort_order.as_str().to_string(),
                message,
            }
        }
        Err(err) => NotesViewResponse {
            ok: false,
            items: Vec::new(),
            total_count: 0,
            sort_by: query.sort_by.as_str().to_string(),
            sort_order: query.sort_order.as_str().to_string(),
            message: err.user_message().to_string(),
        },
    }
}

/// Loads one note for the edit screen.
#[flutter_rust_bridge::frb(sync)]
pub fn note_get(note_id: String) -> NoteActionResponse {
    let Some(id) = parse_note_id(&note_id) else {
        return NoteActionResponse::invalid_id(&note_id);
    };
    match with_service(|service| service.get_note(id)) {
        Ok(Some(note)) => NoteActionResponse::success("Note loaded.", Some(to_detail(&note))),
        Ok(None) => NoteActionResponse::failure(&StoreError::NotFound(id)),
        Err(err) => NoteActionResponse::failure(&err),
    }
}

/// Creates a note from the add form.
#[flutter_rust_bridge::frb(sync)]
pub fn note_add(title: Option<String>, content: String, category: String) -> NoteActionResponse {
    match with_service(|service| service.add_note(title.as_deref(), &content, &category)) {
        Ok(note) => NoteActionResponse::success("Note added successfully!", Some(to_detail(&note))),
        Err(err) => NoteActionResponse::failure(&err),
    }
}

/// Saves the edit form.
#[flutter_rust_bridge::frb(sync)]
pub fn note_update(
    note_id: String,
    title: Option<String>,
    content: String,
    category: String,
) -> NoteActionResponse {
    let Some(id) = parse_note_id(&note_id) else {
        return NoteActionResponse::invalid_id(&note_id);
    };
    match with_service(|service| service.update_note(id, title.as_deref(), &content, &category)) {
        Ok(note) => {
            NoteActionResponse::success("Note updated successfully!", Some(to_detail(&note)))
        }
        Err(err) => NoteActionResponse::failure(&err),
    }
}

/// Records a delete intent and returns the confirmation prompt.
///
/// Does not touch the store beyond reading the note's title.
#[flutter_rust_bridge::frb(sync)]
pub fn delete_request(note_id: String) -> DeletePromptResponse {
    let Some(id) = parse_note_id(&note_id) else {
        return DeletePromptResponse::failure(&note_id, "validation", invalid_id_message(&note_id));
    };
    let note = match with_service(|service| service.get_note(id)) {
        Ok(Some(note)) => note,
        Ok(None) => {
            delete_workflow().cancel(id);
            let err = StoreError::NotFound(id);
            return DeletePromptResponse::failure(&note_id, error_kind_label(&err), err.user_message());
        }
        Err(err) => {
            return DeletePromptResponse::failure(&note_id, error_kind_label(&err), err.user_message());
        }
    };
    match delete_workflow().request(id, note.title.as_deref()) {
        Ok(prompt) => DeletePromptResponse {
            ok: true,
            note_id: id.to_string(),
            prompt: prompt.message(),
            error_kind: None,
            message: "Waiting for confirmation.".to_string(),
        },
        Err(err) => DeletePromptResponse::failure(&note_id, "workflow", err.to_string()),
    }
}

/// Drops a pending delete request. Returns `false` when nothing was pending.
#[flutter_rust_bridge::frb(sync)]
pub fn delete_cancel(note_id: String) -> bool {
    parse_note_id(&note_id).is_some_and(|id| delete_workflow().cancel(id))
}

/// Confirms a pending delete and removes the note.
///
/// Fails with `workflow` when no request is pending or the delete is
/// already in flight. A note removed elsewhere meanwhile is not an error.
#[flutter_rust_bridge::frb(sync)]
pub fn delete_confirm(note_id: String) -> NoteActionResponse {
    let Some(id) = parse_note_id(&note_id) else {
        return NoteActionResponse::invalid_id(&note_id);
    };
    let conn = match open_db(resolve_db_path()) {
        Ok(conn) => conn,
        Err(err) => return NoteActionResponse::failure(&StoreError::from(err)),
    };
    let mut store = SqliteNoteStore::new(&conn);

    let mut workflow = delete_workflow();
    let ticket = match workflow.confirm(id) {
        Ok(ticket) => ticket,
        Err(err) => return NoteActionResponse::delete_failure(&DeleteError::from(err)),
    };
    match workflow.commit(ticket, &mut store) {
        Ok(DeleteOutcome::Removed) => NoteActionResponse::success("Note deleted successfully!", None),
        Ok(DeleteOutcome::AlreadyGone) => {
            NoteActionResponse::success("Note was already deleted.", None)
        }
        Err(err) => NoteActionResponse::delete_failure(&err),
    }
}

/// Category tiles for the home screen, known categories first.
#[flutter_rust_bridge::frb(sync)]
pub fn category_palette() -> Vec<CategoryColor> {
    let palette = ffi_config().palette;
    let notes = with_service(|service| service.list_notes()).unwrap_or_else(|err| {
        warn!("event=category_palette module=ffi status=degraded error={err}");
        Vec::new()
    });
    category_summaries(&notes, &palette)
        .into_iter()
        .map(|summary| CategoryColor {
            category: summary.label,
            color: summary.color,
            note_count: saturating_u32(summary.note_count),
        })
        .collect()
}

fn config_slot() -> &'static RwLock<CoreConfig> {
    FFI_CONFIG.get_or_init(|| RwLock::new(CoreConfig::default()))
}

fn ffi_config() -> CoreConfig {
    config_slot()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

fn delete_workflow() -> MutexGuard<'static, DeleteWorkflow> {
    DELETE_WORKFLOW
        .get_or_init(|| Mutex::new(DeleteWorkflow::new()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

fn resolve_db_path() -> PathBuf {
    ffi_config().resolve_db_path()
}

fn with_service<T>(
    f: impl FnOnce(&mut NoteService<SqliteNoteStore<'_>>) -> Result<T, StoreError>,
) -> Result<T, StoreError> {
    let conn = open_db(resolve_db_path())?;
    let mut service = NoteService::new(SqliteNoteStore::new(&conn));
    f(&mut service)
}

fn parse_note_id(raw: &str) -> Option<NoteId> {
    Uuid::parse_str(raw.trim()).ok()
}

fn invalid_id_message(raw: &str) -> String {
    format!("invalid note id `{raw}`")
}

fn error_kind_label(err: &StoreError) -> &'static str {
    match err.kind() {
        ErrorKind::Validation => "validation",
        ErrorKind::NotFound => "not_found",
        ErrorKind::Store => "store",
    }
}

fn to_card_item(card: NoteCard) -> NoteCardItem {
    NoteCardItem {
        note_id: card.id.to_string(),
        title: card.title,
        content: card.content,
        category: card.category,
        category_color: card.category_color,
        timestamp_label: card.timestamp_label,
    }
}

fn to_detail(note: &Note) -> NoteDetail {
    NoteDetail {
        note_id: note.id.to_string(),
        title: note.title.clone(),
        content: note.content.clone(),
        category: note.category.to_string(),
        date_added: note.date_added,
        date_edited: note.date_edited,
    }
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::{
        category_palette, configure, core_version, delete_cancel, delete_confirm,
        delete_request, init_logging, note_add, note_get, note_update, notes_view, ping,
    };
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn note_add_rejects_blank_content_with_validation_kind() {
        let response = note_add(None, "   ".to_string(), "Work".to_string());
        assert!(!response.ok);
        assert_eq!(response.error_kind.as_deref(), Some("validation"));
        assert_eq!(response.message, "Please enter note content");
    }

    #[test]
    fn added_note_is_found_by_search_and_category() {
        let token = unique_token("ffi-view");
        let created = note_add(
            Some(format!("title {token}")),
            "body".to_string(),
            "Study".to_string(),
        );
        assert!(created.ok, "{}", created.message);
        let note_id = created.note.expect("created note").note_id;

        let view = notes_view(None, None, token.to_uppercase(), Some("study".to_string()));
        assert!(view.ok, "{}", view.message);
        assert_eq!(view.sort_by, "dateAdded");
        assert_eq!(view.sort_order, "desc");
        assert!(view.items.iter().any(|item| item.note_id == note_id));

        let scoped_out = notes_view(None, None, token, Some("work".to_string()));
        assert!(scoped_out.items.iter().all(|item| item.note_id != note_id));

        assert!(category_palette()
            .iter()
            .any(|entry| entry.category == "Study" && entry.note_count >= 1));
    }

    #[test]
    fn update_then_confirmed_delete_removes_note_once() {
        let created = note_add(None, "draft".to_string(), "Ideas".to_string());
        let note_id = created.note.expect("created note").note_id;

        let updated = note_update(
            note_id.clone(),
            Some("Final".to_string()),
            "final body".to_string(),
            "Ideas".to_string(),
        );
        assert!(updated.ok, "{}", updated.message);
        let detail = updated.note.expect("updated note");
        assert_eq!(detail.title.as_deref(), Some("Final"));
        assert!(detail.date_edited.is_some());

        let prompt = delete_request(note_id.clone());
        assert!(prompt.ok, "{}", prompt.message);
        assert_eq!(prompt.prompt, "Remove \"Final\"?");

        let deleted = delete_confirm(note_id.clone());
        assert!(deleted.ok, "{}", deleted.message);
        assert_eq!(deleted.message, "Note deleted successfully!");

        let again = delete_confirm(note_id.clone());
        assert!(!again.ok);
        assert_eq!(again.error_kind.as_deref(), Some("workflow"));

        let missing = note_get(note_id.clone());
        assert!(!missing.ok);
        assert_eq!(missing.error_kind.as_deref(), Some("not_found"));

        let gone = delete_request(note_id);
        assert!(!gone.ok);
        assert_eq!(gone.error_kind.as_deref(), Some("not_found"));
    }

    #[test]
    fn delete_requires_a_pending_request() {
        let created = note_add(Some("Keep".to_string()), "body".to_string(), "Work".to_string());
        let note_id = created.note.expect("created note").note_id;

        let unrequested = delete_confirm(note_id.clone());
        assert!(!unrequested.ok);
        assert_eq!(unrequested.error_kind.as_deref(), Some("workflow"));

        assert!(delete_request(note_id.clone()).ok);
        assert!(delete_cancel(note_id.clone()));
        assert!(!delete_cancel(note_id.clone()));

        let cancelled = delete_confirm(note_id.clone());
        assert!(!cancelled.ok);
        assert_eq!(cancelled.error_kind.as_deref(), Some("workflow"));
        assert!(note_get(note_id).ok);
    }

    #[test]
    fn malformed_id_is_rejected() {
        let response = delete_confirm("not-a-uuid".to_string());
        assert!(!response.ok);
        assert_eq!(response.error_kind.as_deref(), Some("validation"));

        let prompt = delete_request("not-a-uuid".to_string());
        assert!(!prompt.ok);
        assert_eq!(prompt.error_kind.as_deref(), Some("validation"));
        assert!(!delete_cancel("not-a-uuid".to_string()));
    }

    #[test]
    fn configure_applies_palette_overlay_and_keeps_it_on_bad_input() {
        let applied = configure(r##"{"palette": {"colors": {"travel": "#123456"}}}"##.to_string());
        assert!(applied.is_empty(), "{applied}");

        let rejected = configure("{not json".to_string());
        assert!(rejected.starts_with("invalid config"), "{rejected}");

        let token = unique_token("ffi-config");
        let created = note_add(None, token.clone(), "Travel".to_string());
        assert!(created.ok, "{}", created.message);

        let view = notes_view(None, None, token, None);
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].category_color, "#123456");
        assert!(category_palette()
            .iter()
            .any(|entry| entry.category == "Work" && entry.color == "#FEC260"));
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
