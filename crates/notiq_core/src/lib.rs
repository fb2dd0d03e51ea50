//! Core domain logic for NotIQ.
//! This crate is the single source of truth for note list behavior shared
//! by every screen of the mobile client.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod service;
pub mod store;
pub mod view;

pub use config::CoreConfig;
pub use logging::{
    default_log_level, init_logging, init_logging_from_config, logging_status, LoggingError,
};
pub use model::category::{Category, KnownCategory};
pub use model::note::{Note, NoteDraft, NoteId, NoteValidationError, UNTITLED};
pub use query::pipeline::{apply, filter_by_category, search, sort, NoteQuery, SortBy, SortOrder};
pub use service::note_service::NoteService;
pub use store::clock::{Clock, ManualClock, SystemClock};
pub use store::memory::InMemoryNoteStore;
pub use store::sqlite::SqliteNoteStore;
pub use store::{ErrorKind, NoteStore, StoreError, StoreResult};
pub use view::delete_flow::{
    DeleteError, DeleteOutcome, DeletePhase, DeletePrompt, DeleteTicket, DeleteWorkflow,
    DeleteWorkflowError,
};
pub use view::note_list::NoteListViewModel;
pub use view::palette::CategoryPalette;
pub use view::presentation::{
    category_summaries, display_title, CategorySummary, DisplayTimestamp, NoteCard,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
