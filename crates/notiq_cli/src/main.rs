//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `notiq_core` linkage without the Flutter runtime.
//! - With a database path argument, print the default All Notes view.

use notiq_core::db::open_db;
use notiq_core::{CoreConfig, NoteListViewModel, SqliteNoteStore};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("notiq_core ping={}", notiq_core::ping());
    println!("notiq_core version={}", notiq_core::core_version());

    let Some(db_path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        return ExitCode::SUCCESS;
    };

    match print_all_notes(db_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("notiq_cli: {err}");
            ExitCode::FAILURE
        }
    }
}

fn print_all_notes(db_path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = CoreConfig {
        db_path: Some(db_path),
        ..CoreConfig::default()
    };
    let conn = open_db(config.resolve_db_path())?;
    let view = NoteListViewModel::new(SqliteNoteStore::new(&conn), config.default_query.clone())?;

    let cards = view.cards(&config.palette);
    if cards.is_empty() {
        println!("No notes yet.");
        return Ok(());
    }
    for card in cards {
        println!(
            "{}  [{}]  {}  ({})",
            card.id, card.category, card.title, card.timestamp_label
        );
    }
    Ok(())
}
