//! In-memory termbase index
//!
//! Records are grouped by their normalized source term (trimmed, lowercased).
//! Lookup is always case-insensitive and returns the whole match group in source
//! order; there is no partial or fuzzy matching.
//!
//! Rebuilds construct a new mapping and swap it in whole, so readers never see a
//! half-built index.

pub mod builder;
pub mod table;

pub use builder::{BuildStats, normalize_key};
pub use table::{IndexSnapshot, TermbaseIndex, validate_entry};
