//! In-memory store for unit tests.

use std::cell::RefCell;
use std::rc::Rc;

use super::TermStore;
use crate::error::{BackendError, LoadError, PersistError};
use crate::models::TermRecord;

/// Store backed by shared cells so a test can keep a [`handle`](Self::handle)
/// after moving the store into a `Termbase`.
#[derive(Default)]
pub(crate) struct MemoryStore {
    pub rows: Rc<RefCell<Vec<TermRecord>>>,
    pub appended: Rc<RefCell<Vec<TermRecord>>>,
    pub fail_load: Rc<RefCell<bool>>,
    pub fail_append: Rc<RefCell<bool>>,
}

impl MemoryStore {
    pub fn with_rows(rows: &[(&str, &str, &str)]) -> Self {
        let store = Self::default();
        *store.rows.borrow_mut() = rows.iter().map(|(s, t, n)| TermRecord::new(s, t, n)).collect();
        store
    }

    pub fn failing_load() -> Self {
        let store = Self::default();
        *store.fail_load.borrow_mut() = true;
        store
    }

    pub fn handle(&self) -> Self {
        Self {
            rows: Rc::clone(&self.rows),
            appended: Rc::clone(&self.appended),
            fail_load: Rc::clone(&self.fail_load),
            fail_append: Rc::clone(&self.fail_append),
        }
    }
}

impl TermStore for MemoryStore {
    fn load(&self) -> Result<Vec<TermRecord>, LoadError> {
        if *self.fail_load.borrow() {
            return Err(LoadError::new("memory", BackendError::Auth("denied".into())));
        }
        Ok(self.rows.borrow().clone())
    }

    fn append(&mut self, record: &TermRecord) -> Result<(), PersistError> {
        if *self.fail_append.borrow() {
            return Err(PersistError::new(
                "memory",
                record.clone(),
                BackendError::Auth("denied".into()),
            ));
        }
        self.rows.borrow_mut().push(record.clone());
        self.appended.borrow_mut().push(record.clone());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
