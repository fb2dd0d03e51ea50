//! Free-form note categories with a known display subset.
//!
//! # Invariants
//! - Category comparisons are case-insensitive.
//! - Any label is a valid category; `KnownCategory` only lists the choices
//!   offered by the creation form.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Category label as entered by the user.
///
/// Equality via `==` is exact; use [`Category::matches`] for the
/// case-insensitive comparison every screen relies on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercase lookup key.
    pub fn key(&self) -> String {
        self.0.to_lowercase()
    }

    /// Case-insensitive exact match.
    pub fn matches(&self, other: &str) -> bool {
        self.0.to_lowercase() == other.to_lowercase()
    }

    /// Maps the label onto the form's fixed choices, if it is one of them.
    pub fn known(&self) -> Option<KnownCategory> {
        KnownCategory::parse(&self.0)
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<KnownCategory> for Category {
    fn from(value: KnownCategory) -> Self {
        Self::new(value.label())
    }
}

/// Categories offered by the add/edit forms, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KnownCategory {
    Work,
    Study,
    Personal,
    Ideas,
}

impl KnownCategory {
    pub const ALL: [KnownCategory; 4] = [Self::Work, Self::Study, Self::Personal, Self::Ideas];

    /// Label used by the picker.
    pub fn label(self) -> &'static str {
        match self {
            Self::Work => "Work",
            Self::Study => "Study",
            Self::Personal => "Personal",
            Self::Ideas => "Ideas",
        }
    }

    /// Lowercase key used for palette lookup and scoping.
    pub fn key(self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Study => "study",
            Self::Personal => "personal",
            Self::Ideas => "ideas",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|known| known.key() == normalized)
    }
}
