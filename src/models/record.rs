use std::fmt;

use serde::{Deserialize, Serialize};

/// One row of the termbase: a source term, its translation, and free-form notes.
///
/// Records are immutable once built. `notes` is always a string; sources that
/// represent a missing value (empty cell, omitted trailing cell, null) produce `""`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TermRecord {
    source_term: String,
    target_term: String,
    #[serde(default)]
    notes: String,
}

impl TermRecord {
    /// Build a record, trimming surrounding whitespace from every field.
    pub fn new(
        source_term: impl AsRef<str>,
        target_term: impl AsRef<str>,
        notes: impl AsRef<str>,
    ) -> Self {
        Self {
            source_term: source_term.as_ref().trim().to_string(),
            target_term: target_term.as_ref().trim().to_string(),
            notes: notes.as_ref().trim().to_string(),
        }
    }

    /// Build a record from optional cells, mapping missing cells to empty strings.
    pub fn from_cells(
        source_term: Option<&str>,
        target_term: Option<&str>,
        notes: Option<&str>,
    ) -> Self {
        Self::new(
            source_term.unwrap_or_default(),
            target_term.unwrap_or_default(),
            notes.unwrap_or_default(),
        )
    }

    pub fn source_term(&self) -> &str {
        &self.source_term
    }

    pub fn target_term(&self) -> &str {
        &self.target_term
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// The three cells in column order, as written to a backing resource.
    pub fn to_row(&self) -> [&str; 3] {
        [&self.source_term, &self.target_term, &self.notes]
    }
}

impl fmt::Display for TermRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.source_term, self.target_term)?;
        if !self.notes.is_empty() {
            write!(f, " ({})", self.notes)?;
        }
        Ok(())
    }
}
