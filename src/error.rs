//! Error types for termbase operations.
//!
//! The library reports three kinds of failure, each recoverable from the user's
//! point of view:
//!
//! - [`LoadError`] - the backing resource could not be read. The index keeps its
//!   last good contents.
//! - [`PersistError`] - an entry was added to the index but could not be written
//!   back. The error carries the record so the caller can retry.
//! - [`ValidationError`] - a required field was empty. Nothing was changed.
//!
//! [`BackendError`] describes the underlying cause for the first two.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::TermRecord;

/// Low-level cause of a store failure.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File too large: {path} ({size} bytes, max {max} bytes)")]
    TooLarge { path: PathBuf, size: u64, max: u64 },

    #[error("Unsupported spreadsheet format: {0}")]
    UnsupportedFormat(String),

    #[error("Spreadsheet read error: {0}")]
    SpreadsheetRead(String),

    #[error("Spreadsheet write error: {0}")]
    SpreadsheetWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Spreadsheet service returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Invalid service URL: {0}")]
    InvalidUrl(String),
}

impl BackendError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

/// Reading the backing resource failed.
#[derive(Debug, Error)]
#[error("Failed to load termbase from {resource}: {source}")]
pub struct LoadError {
    pub resource: String,
    #[source]
    pub source: BackendError,
}

impl LoadError {
    pub fn new(resource: impl Into<String>, source: BackendError) -> Self {
        Self { resource: resource.into(), source }
    }
}

/// Writing a new entry to the backing resource failed.
///
/// The entry is already present in the in-memory index; it is not durable until a
/// later persist attempt succeeds.
#[derive(Debug, Error)]
#[error(
    "Entry '{record}' is in the termbase but was not saved to {resource}: {source}"
)]
pub struct PersistError {
    pub resource: String,
    pub record: TermRecord,
    #[source]
    pub source: BackendError,
}

impl PersistError {
    pub fn new(resource: impl Into<String>, record: TermRecord, source: BackendError) -> Self {
        Self { resource: resource.into(), record, source }
    }
}

/// A new entry was rejected before any state changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Source term must not be empty")]
    EmptySourceTerm,
    #[error("Target term must not be empty")]
    EmptyTargetTerm,
}

/// Any failure surfaced by the [`Termbase`](crate::termbase::Termbase) context.
#[derive(Debug, Error)]
pub enum TermbaseError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
