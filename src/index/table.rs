use std::collections::HashMap;
use std::sync::Arc;

use super::builder::{BuildStats, build_groups, normalize_key};
use crate::error::ValidationError;
use crate::models::{QuerySession, TermRecord};

/// Immutable view of the termbase at one point in time.
#[derive(Debug, Clone, Default)]
pub struct IndexSnapshot {
    groups: HashMap<String, Vec<TermRecord>>,
    record_count: usize,
}

impl IndexSnapshot {
    /// Match group for `term`, empty when the term is unknown.
    pub fn lookup(&self, term: &str) -> &[TermRecord] {
        self.groups.get(&normalize_key(term)).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn record_count(&self) -> usize {
        self.record_count
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Number of source terms with more than one translation.
    pub fn multi_match_count(&self) -> usize {
        self.groups.values().filter(|g| g.len() > 1).count()
    }
}

/// Case-insensitive, multi-valued lookup table over termbase records.
///
/// The table is held behind an `Arc` and replaced wholesale on rebuild, so a
/// reader holding a [`snapshot`](Self::snapshot) sees either the complete old
/// contents or the complete new contents, never a mix.
#[derive(Debug, Clone, Default)]
pub struct TermbaseIndex {
    snapshot: Arc<IndexSnapshot>,
}

impl TermbaseIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index directly from rows.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = TermRecord>,
    {
        let mut index = Self::new();
        index.rebuild(rows);
        index
    }

    /// Replace the whole mapping with one built from `rows`.
    ///
    /// Rows without a source term are skipped. The new mapping is built off to the
    /// side and swapped in as a single step.
    pub fn rebuild<I>(&mut self, rows: I) -> BuildStats
    where
        I: IntoIterator<Item = TermRecord>,
    {
        let (groups, stats) = build_groups(rows);
        self.snapshot = Arc::new(IndexSnapshot { groups, record_count: stats.indexed });
        stats
    }

    /// All records whose source term equals `term`, ignoring case and surrounding
    /// whitespace, in source order.
    pub fn query(&self, term: &str) -> Vec<TermRecord> {
        self.snapshot.lookup(term).to_vec()
    }

    /// Run a query and wrap the result in a fresh session positioned at the first
    /// match.
    pub fn session(&self, term: &str) -> QuerySession {
        QuerySession::new(term.trim(), self.query(term))
    }

    /// Add a record to the in-memory index.
    ///
    /// Source and target terms are required; notes may be empty. The record goes
    /// to the end of its match group. Persisting it is the caller's job.
    pub fn add_entry(
        &mut self,
        source_term: &str,
        target_term: &str,
        notes: &str,
    ) -> Result<TermRecord, ValidationError> {
        let record = validate_entry(source_term, target_term, notes)?;

        // Clone-on-write: outstanding snapshots keep the pre-insert view
        let snapshot = Arc::make_mut(&mut self.snapshot);
        snapshot
            .groups
            .entry(normalize_key(record.source_term()))
            .or_default()
            .push(record.clone());
        snapshot.record_count += 1;

        Ok(record)
    }

    /// Shared handle to the current mapping.
    pub fn snapshot(&self) -> Arc<IndexSnapshot> {
        Arc::clone(&self.snapshot)
    }

    pub fn len(&self) -> usize {
        self.snapshot.record_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn group_count(&self) -> usize {
        self.snapshot.group_count()
    }
}

/// Check the required fields of a new entry and build the record.
pub fn validate_entry(
    source_term: &str,
    target_term: &str,
    notes: &str,
) -> Result<TermRecord, ValidationError> {
    if source_term.trim().is_empty() {
        return Err(ValidationError::EmptySourceTerm);
    }
    if target_term.trim().is_empty() {
        return Err(ValidationError::EmptyTargetTerm);
    }
    Ok(TermRecord::new(source_term, target_term, notes))
}
