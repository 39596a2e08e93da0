use serde::Serialize;

use super::record::TermRecord;

/// Direction for cycling through a match group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// The result of one lookup plus the caller's position within it.
///
/// A session is a plain value: it is created by a query, moved with [`advance`],
/// and thrown away on the next query or after a rebuild. The position is only
/// meaningful while there are matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QuerySession {
    term: String,
    matches: Vec<TermRecord>,
    position: usize,
}

impl QuerySession {
    pub fn new(term: impl Into<String>, matches: Vec<TermRecord>) -> Self {
        Self { term: term.into(), matches, position: 0 }
    }

    /// The term as the user typed it (trimmed).
    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn matches(&self) -> &[TermRecord] {
        &self.matches
    }

    /// Current position, or `None` when the lookup found nothing.
    pub fn position(&self) -> Option<usize> {
        if self.matches.is_empty() { None } else { Some(self.position) }
    }

    pub fn current(&self) -> Option<&TermRecord> {
        self.matches.get(self.position)
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// True when the term has more than one translation to cycle through.
    pub fn has_alternatives(&self) -> bool {
        self.matches.len() > 1
    }
}

/// Move to the next or previous match, wrapping around at both ends.
///
/// Sessions without matches are returned unchanged.
pub fn advance(mut session: QuerySession, direction: Direction) -> QuerySession {
    let len = session.matches.len();
    if len == 0 {
        return session;
    }

    session.position = match direction {
        Direction::Forward => (session.position + 1) % len,
        Direction::Backward => (session.position + len - 1) % len,
    };
    session
}
