//! Data-access contract for todo persistence.
//!
//! # Design
//! The handler issues exactly one store call per logical step and never wraps
//! several calls in a transaction. Isolation between concurrent requests is
//! whatever the backend itself provides. Update methods report whether the
//! row existed so the caller can stop a multi-field update as soon as the row
//! disappears.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::error::StoreError;
use crate::types::Todo;

/// CRUD operations against the todo table, keyed by numeric id.
pub trait TodoStore: Send + Sync {
    /// All todos in a stable order.
    fn get_all(&self) -> Result<Vec<Todo>, StoreError>;

    fn get(&self, id: i64) -> Result<Option<Todo>, StoreError>;

    /// Insert a new row and return it with its freshly assigned id.
    fn create(&self, title: &str, date: &str, completed: bool) -> Result<Todo, StoreError>;

    fn update_title(&self, id: i64, title: &str) -> Result<bool, StoreError>;

    fn update_date(&self, id: i64, date: &str) -> Result<bool, StoreError>;

    fn update_completed(&self, id: i64, completed: bool) -> Result<bool, StoreError>;

    /// Remove a row. Removing a missing row is not an error.
    fn delete(&self, id: i64) -> Result<(), StoreError>;
}

/// In-process store backed by an ordered map.
///
/// Ids start at 1 and are never reused, even after deletes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryTable>,
}

#[derive(Debug, Default)]
struct MemoryTable {
    rows: BTreeMap<i64, Todo>,
    last_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self) -> Result<MutexGuard<'_, MemoryTable>, StoreError> {
        self.inner.lock().map_err(|_| StoreError::Poisoned)
    }

    fn modify(&self, id: i64, apply: impl FnOnce(&mut Todo)) -> Result<bool, StoreError> {
        let mut table = self.table()?;
        Ok(table.rows.get_mut(&id).map(apply).is_some())
    }
}

impl TodoStore for MemoryStore {
    fn get_all(&self) -> Result<Vec<Todo>, StoreError> {
        Ok(self.table()?.rows.values().cloned().collect())
    }

    fn get(&self, id: i64) -> Result<Option<Todo>, StoreError> {
        Ok(self.table()?.rows.get(&id).cloned())
    }

    fn create(&self, title: &str, date: &str, completed: bool) -> Result<Todo, StoreError> {
        let mut table = self.table()?;
        table.last_id += 1;
        let todo = Todo {
            id: table.last_id,
            title: title.to_string(),
            date: date.to_string(),
            completed,
        };
        table.rows.insert(todo.id, todo.clone());
        Ok(todo)
    }

    fn update_title(&self, id: i64, title: &str) -> Result<bool, StoreError> {
        self.modify(id, |todo| todo.title = title.to_string())
    }

    fn update_date(&self, id: i64, date: &str) -> Result<bool, StoreError> {
        self.modify(id, |todo| todo.date = date.to_string())
    }

    fn update_completed(&self, id: i64, completed: bool) -> Result<bool, StoreError> {
        self.modify(id, |todo| todo.completed = completed)
    }

    fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.table()?.rows.remove(&id);
        Ok(())
    }
}
