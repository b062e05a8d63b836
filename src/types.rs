//! Core types shared across the crate.
//! The folder loader and the snapshot codec both decode into these.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

/// One translated string for a single (group, language, key) cell.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LocalizationEntry {
    /// The key this entry belongs to. Unique per group, not globally.
    pub key: String,

    /// The translated value. Empty means "not translated yet".
    #[serde(skip_serializing_if = "String::is_empty")]
    #[serde(default)]
    pub value: String,

    /// Optional free-text context for translators.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub message: Option<String>,
}

impl LocalizationEntry {
    pub fn new(
        key: impl Into<String>,
        value: impl Into<String>,
        message: Option<String>,
    ) -> Self {
        LocalizationEntry {
            key: key.into(),
            value: value.into(),
            message,
        }
    }

    /// Whether this cell counts as translated for filtering purposes.
    pub fn is_translated(&self) -> bool {
        !self.value.is_empty()
    }
}

impl Display for LocalizationEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}", self.key, self.value)
    }
}

/// Row filter applied on top of the active group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    /// Every key.
    #[default]
    All,

    /// Keys where every language has a non-empty value.
    Translated,

    /// Keys where at least one language has an empty or missing value.
    Untranslated,
}

impl FromStr for Filter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ALL" => Ok(Filter::All),
            "TRANSLATED" => Ok(Filter::Translated),
            "UNTRANSLATED" => Ok(Filter::Untranslated),
            _ => Err(format!("Unknown filter: {}", s)),
        }
    }
}

impl Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Filter::All => write!(f, "all"),
            Filter::Translated => write!(f, "translated"),
            Filter::Untranslated => write!(f, "untranslated"),
        }
    }
}
