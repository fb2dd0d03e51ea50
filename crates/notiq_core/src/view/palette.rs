//! Category to color mapping handed to presentation.
//!
//! # Invariants
//! - Lookup keys are lowercase; lookups ignore case.
//! - Every category resolves to a color through the fallback entry.
//! - Configured colors overlay the defaults; known categories keep their
//!   default color unless the config names them.

use crate::model::category::KnownCategory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const DEFAULT_FALLBACK_COLOR: &str = "#CCCCCC";

/// Explicit category palette with a defined fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PaletteConfig")]
pub struct CategoryPalette {
    colors: BTreeMap<String, String>,
    fallback: String,
}

#[derive(Deserialize)]
struct PaletteConfig {
    #[serde(default)]
    colors: BTreeMap<String, String>,
    #[serde(default = "default_fallback")]
    fallback: String,
}

fn default_fallback() -> String {
    DEFAULT_FALLBACK_COLOR.to_string()
}

impl From<PaletteConfig> for CategoryPalette {
    fn from(value: PaletteConfig) -> Self {
        let mut palette = Self {
            fallback: value.fallback,
            ..Self::default()
        };
        for (category, color) in value.colors {
            palette = palette.with_color(&category, color);
        }
        palette
    }
}

impl CategoryPalette {
    /// Palette with no entries; everything resolves to `fallback`.
    pub fn empty(fallback: impl Into<String>) -> Self {
        Self {
            colors: BTreeMap::new(),
            fallback: fallback.into(),
        }
    }

    #[must_use]
    pub fn with_color(mut self, category: &str, color: impl Into<String>) -> Self {
        self.colors
            .insert(category.trim().to_lowercase(), color.into());
        self
    }

    pub fn color_for(&self, category: &str) -> &str {
        self.colors
            .get(&category.trim().to_lowercase())
            .map_or(self.fallback.as_str(), String::as_str)
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Explicit entries, sorted by key.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.colors
            .iter()
            .map(|(category, color)| (category.as_str(), color.as_str()))
    }
}

impl Default for CategoryPalette {
    fn default() -> Self {
        Self::empty(DEFAULT_FALLBACK_COLOR)
            .with_color(KnownCategory::Work.key(), "#FEC260")
            .with_color(KnownCategory::Study.key(), "#4DD4AC")
            .with_color(KnownCategory::Personal.key(), "#FF6B6B")
            .with_color(KnownCategory::Ideas.key(), "#8AB4F8")
    }
}

#[cfg(test)]
mod tests {
    use super::CategoryPalette;

    #[test]
    fn default_palette_resolves_known_and_unknown_categories() {
        let palette = CategoryPalette::default();
        assert_eq!(palette.color_for("Work"), "#FEC260");
        assert_eq!(palette.color_for("IDEAS"), "#8AB4F8");
        assert_eq!(palette.color_for("groceries"), "#CCCCCC");
    }

    #[test]
    fn deserialized_palette_normalizes_keys() {
        let palette: CategoryPalette = serde_json::from_str(
            r##"{"colors": {"Travel": "#123456"}, "fallback": "#000000"}"##,
        )
        .unwrap();
        assert_eq!(palette.color_for("travel"), "#123456");
        assert_eq!(palette.color_for("groceries"), "#000000");
    }

    #[test]
    fn configured_colors_overlay_defaults() {
        let palette: CategoryPalette =
            serde_json::from_str(r##"{"colors": {"Work": "#111111"}}"##).unwrap();
        assert_eq!(palette.color_for("work"), "#111111");
        assert_eq!(palette.color_for("study"), "#4DD4AC");
        assert_eq!(palette.color_for("personal"), "#FF6B6B");
        assert_eq!(palette.color_for("ideas"), "#8AB4F8");
        assert_eq!(palette.color_for("groceries"), "#CCCCCC");
    }

    #[test]
    fn missing_fallback_uses_default() {
        let palette: CategoryPalette = serde_json::from_str(r#"{"colors": {}}"#).unwrap();
        assert_eq!(palette.fallback(), "#CCCCCC");
    }
}
