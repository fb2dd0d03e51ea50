//! Core configuration.
//!
//! # Responsibility
//! - Describe where the notes database and logs live.
//! - Carry the category palette and the default list query to presentation.
//!
//! # Invariants
//! - Every field has a default; an empty JSON object is a valid config.
//! - An explicit `db_path` wins over `NOTIQ_DB_PATH`, which wins over the
//!   temp-dir fallback.

use crate::logging::default_log_level;
use crate::query::pipeline::NoteQuery;
use crate::view::palette::CategoryPalette;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable overriding the notes database location.
pub const DB_PATH_ENV: &str = "NOTIQ_DB_PATH";
/// File name used under the temp dir when nothing else is configured.
pub const DEFAULT_DB_FILE_NAME: &str = "notiq.sqlite3";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub db_path: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_dir: Option<PathBuf>,
    pub palette: CategoryPalette,
    pub default_query: NoteQuery,
}

impl CoreConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Resolves the notes database path.
    pub fn resolve_db_path(&self) -> PathBuf {
        if let Some(path) = self.db_path.as_ref() {
            return path.clone();
        }
        db_path_from_env().unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME))
    }

    /// Configured level, or the build-mode default.
    pub fn effective_log_level(&self) -> &str {
        self.log_level
            .as_deref()
            .map(str::trim)
            .filter(|level| !level.is_empty())
            .unwrap_or(default_log_level())
    }
}

fn db_path_from_env() -> Option<PathBuf> {
    let raw = std::env::var(DB_PATH_ENV).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(PathBuf::from(trimmed))
    }
}

#[cfg(test)]
mod tests {
    use super::CoreConfig;
    use crate::query::pipeline::{SortBy, SortOrder};
    use std::path::PathBuf;

    #[test]
    fn empty_object_uses_defaults() {
        let config = CoreConfig::from_json_str("{}").unwrap();
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.default_query.sort_by, SortBy::DateAdded);
        assert_eq!(config.default_query.sort_order, SortOrder::Desc);
        assert_eq!(config.palette.color_for("work"), "#FEC260");
    }

    #[test]
    fn explicit_values_are_parsed() {
        let config = CoreConfig::from_json_str(
            r##"{
                "db_path": "/data/notes.sqlite3",
                "log_level": "warn",
                "palette": {"colors": {"work": "#111111"}},
                "default_query": {"sortBy": "dateEdited", "sortOrder": "asc"}
            }"##,
        )
        .unwrap();
        assert_eq!(config.resolve_db_path(), PathBuf::from("/data/notes.sqlite3"));
        assert_eq!(config.effective_log_level(), "warn");
        assert_eq!(config.palette.color_for("Work"), "#111111");
        assert_eq!(config.palette.color_for("study"), "#4DD4AC");
        assert_eq!(config.default_query.sort_by, SortBy::DateEdited);
        assert_eq!(config.default_query.sort_order, SortOrder::Asc);
    }

    #[test]
    fn blank_log_level_falls_back_to_build_default() {
        let config = CoreConfig {
            log_level: Some("  ".to_string()),
            ..CoreConfig::default()
        };
        assert_eq!(config.effective_log_level(), super::default_log_level());
    }

    #[test]
    fn unset_log_level_uses_build_default() {
        let config = CoreConfig::default();
        assert_eq!(config.effective_log_level(), super::default_log_level());
    }
}
