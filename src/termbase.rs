//! The termbase context: one backing store plus the index built from it.
//!
//! `Termbase` is what the UI layer holds. It sequences the core operations so
//! that:
//!
//! - a failed load leaves the previous index in place,
//! - switching to a new source only takes effect once that source has loaded,
//! - every accepted new entry is followed by exactly one append to the store.

use tracing::{info, warn};

use crate::error::{LoadError, PersistError, TermbaseError};
use crate::index::{BuildStats, IndexSnapshot, TermbaseIndex};
use crate::models::{QuerySession, TermRecord};
use crate::store::TermStore;

/// Lifecycle of the store's contents as seen by the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loading,
    Loaded,
    LoadFailed,
}

/// Summary numbers for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermbaseStats {
    pub source: String,
    pub records: usize,
    pub distinct_terms: usize,
    pub multi_match_terms: usize,
}

pub struct Termbase {
    store: Box<dyn TermStore>,
    index: TermbaseIndex,
    state: LoadState,
}

impl Termbase {
    /// Wrap a store without loading it.
    pub fn new(store: Box<dyn TermStore>) -> Self {
        Self { store, index: TermbaseIndex::new(), state: LoadState::Unloaded }
    }

    /// Wrap a store and load it.
    pub fn open(store: Box<dyn TermStore>) -> Result<Self, LoadError> {
        let mut termbase = Self::new(store);
        termbase.refresh()?;
        Ok(termbase)
    }

    /// Reload everything from the store and rebuild the index.
    ///
    /// On failure the index keeps its previous contents.
    pub fn refresh(&mut self) -> Result<BuildStats, LoadError> {
        self.state = LoadState::Loading;

        match self.store.load() {
            Ok(rows) => {
                let stats = self.index.rebuild(rows);
                self.state = LoadState::Loaded;
                info!(
                    source = %self.store.describe(),
                    indexed = stats.indexed,
                    skipped = stats.skipped,
                    "Termbase loaded"
                );
                Ok(stats)
            }
            Err(e) => {
                self.state = LoadState::LoadFailed;
                warn!(error = %e, "Termbase load failed; keeping previous contents");
                Err(e)
            }
        }
    }

    /// Load `store` and, only if that succeeds, make it the active source.
    pub fn switch_source(&mut self, store: Box<dyn TermStore>) -> Result<BuildStats, LoadError> {
        let rows = store.load()?;

        let mut index = TermbaseIndex::new();
        let stats = index.rebuild(rows);

        info!(from = %self.store.describe(), to = %store.describe(), "Switched termbase source");
        self.store = store;
        self.index = index;
        self.state = LoadState::Loaded;
        Ok(stats)
    }

    /// Look up `term` and start a new navigation session over the matches.
    pub fn query(&self, term: &str) -> QuerySession {
        self.index.session(term)
    }

    /// Add a new entry to the index and write it to the store.
    ///
    /// Invalid input is rejected before anything changes. If the write fails the
    /// entry stays in the index and a [`PersistError`] is returned; pass its
    /// `record` to [`persist`](Self::persist) to retry.
    pub fn add_entry(
        &mut self,
        source_term: &str,
        target_term: &str,
        notes: &str,
    ) -> Result<TermRecord, TermbaseError> {
        let record = self.index.add_entry(source_term, target_term, notes)?;
        self.store.append(&record)?;
        Ok(record)
    }

    /// Write an already-indexed record to the store again.
    pub fn persist(&mut self, record: &TermRecord) -> Result<(), PersistError> {
        self.store.append(record)
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn index(&self) -> &TermbaseIndex {
        &self.index
    }

    pub fn snapshot(&self) -> std::sync::Arc<IndexSnapshot> {
        self.index.snapshot()
    }

    pub fn source_description(&self) -> String {
        self.store.describe()
    }

    /// Path or URL of the active source, for opening it outside the app.
    pub fn location(&self) -> String {
        self.store.location()
    }

    pub fn stats(&self) -> TermbaseStats {
        let snapshot = self.index.snapshot();
        TermbaseStats {
            source: self.store.describe(),
            records: snapshot.record_count(),
            distinct_terms: snapshot.group_count(),
            multi_match_terms: snapshot.multi_match_count(),
        }
    }
}
