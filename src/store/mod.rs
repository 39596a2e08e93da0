//! Backing stores for the termbase
//!
//! A store adapts one durable resource to the three-column row model:
//!
//! - [`FileStore`] - local spreadsheet file (`.xlsx`, `.csv`; `.xls`/`.ods`/`.xlsm`
//!   read-only)
//! - [`RemoteStore`] - Google Sheets spreadsheet over the Sheets v4 REST API
//!
//! Both implement [`TermStore`]; which one is used is decided by configuration
//! (see [`open_store`]).

pub mod file;
#[cfg(test)]
pub(crate) mod memory;
pub mod remote;
pub mod rows;

pub use file::{FileFormat, FileStore};
pub use remote::RemoteStore;

use crate::config::SourceConfig;
use crate::error::{BackendError, LoadError, PersistError};
use crate::models::TermRecord;

/// Capability set every backing resource provides.
pub trait TermStore {
    /// Read every data row (header excluded) as records.
    fn load(&self) -> Result<Vec<TermRecord>, LoadError>;

    /// Durably add one row. Either the resource reflects the new row afterwards or
    /// it is unchanged.
    ///
    /// Takes `&mut self` so two appends can never run against the same store at
    /// once.
    fn append(&mut self, record: &TermRecord) -> Result<(), PersistError>;

    /// Human-readable name of the resource, used in messages and titles.
    fn describe(&self) -> String;

    /// Path or URL a user can open to view the resource directly.
    fn location(&self) -> String {
        self.describe()
    }
}

impl<S: TermStore + ?Sized> TermStore for Box<S> {
    fn load(&self) -> Result<Vec<TermRecord>, LoadError> {
        (**self).load()
    }

    fn append(&mut self, record: &TermRecord) -> Result<(), PersistError> {
        (**self).append(record)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }

    fn location(&self) -> String {
        (**self).location()
    }
}

/// Construct the store described by `source`.
pub fn open_store(source: &SourceConfig) -> Result<Box<dyn TermStore>, BackendError> {
    match source {
        SourceConfig::File { path } => Ok(Box::new(FileStore::new(path)?)),
        SourceConfig::Remote { sheet_id, worksheet, token_file } => {
            let token = remote::resolve_token(token_file.as_deref());
            Ok(Box::new(RemoteStore::new(sheet_id, worksheet.clone(), token)?))
        }
    }
}
