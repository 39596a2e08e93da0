//! Grouping of loaded rows into match groups.
//!
//! # Error Handling Strategy
//!
//! Row-level problems never fail a build: a row without a source term cannot be
//! keyed, so it is logged and skipped, and the remaining rows are indexed as usual.
//! Whole-resource failures are the store's concern and never reach this module.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::models::TermRecord;

/// Counts reported by a rebuild.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Rows that landed in a match group
    pub indexed: usize,
    /// Rows dropped because they had no source term
    pub skipped: usize,
}

/// Normalized lookup key for a term: surrounding whitespace removed, lowercased.
pub fn normalize_key(term: &str) -> String {
    term.trim().to_lowercase()
}

/// Group rows by normalized source term, keeping source order within each group.
pub fn build_groups<I>(rows: I) -> (HashMap<String, Vec<TermRecord>>, BuildStats)
where
    I: IntoIterator<Item = TermRecord>,
{
    let mut groups: HashMap<String, Vec<TermRecord>> = HashMap::new();
    let mut stats = BuildStats::default();

    for (row_num, record) in rows.into_iter().enumerate() {
        let key = normalize_key(record.source_term());
        if key.is_empty() {
            // Row numbers are 1-based data rows (header excluded)
            warn!(row = row_num + 1, "Skipping termbase row without a source term");
            stats.skipped += 1;
            continue;
        }

        groups.entry(key).or_default().push(record);
        stats.indexed += 1;
    }

    debug!(
        indexed = stats.indexed,
        skipped = stats.skipped,
        groups = groups.len(),
        "Built termbase groups"
    );

    (groups, stats)
}
