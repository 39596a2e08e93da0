//! termbase - personal glossary lookup backed by a spreadsheet
//!
//! A termbase is a three-column table (source term, target term, notes) kept in a
//! local spreadsheet file or a Google Sheets document. This library:
//!
//! - Loads the table through a [`TermStore`](store::TermStore) adapter
//! - Builds a case-insensitive, order-preserving index over source terms
//! - Navigates multiple translations of one term with [`QuerySession`]
//! - Appends new entries to both the index and the backing resource
//!
//! # Example
//!
//! ```no_run
//! use termbase::store::FileStore;
//! use termbase::Termbase;
//!
//! let store = FileStore::new("glossary.xlsx")?;
//! let termbase = Termbase::open(Box::new(store))?;
//!
//! let session = termbase.query("Run");
//! if let Some(record) = session.current() {
//!     println!("{}", record.target_term());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod index;
pub mod logging;
pub mod models;
pub mod store;
pub mod termbase;
pub mod tui;
pub mod utils;

// Re-export commonly used types
pub use error::{LoadError, PersistError, TermbaseError, ValidationError};
pub use index::TermbaseIndex;
pub use models::{Direction, QuerySession, TermRecord, advance};
pub use termbase::{LoadState, Termbase};
