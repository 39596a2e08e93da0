//! Data models for the termbase.
//!
//! - [`TermRecord`] - One glossary row (source term, target term, notes)
//! - [`QuerySession`] - A lookup result plus the caller's position within it
//! - [`Direction`] / [`advance`] - Circular navigation over a session's matches

pub mod record;
pub mod session;

pub use record::TermRecord;
pub use session::{Direction, QuerySession, advance};
