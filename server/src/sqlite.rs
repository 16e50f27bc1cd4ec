//! SQLite implementation of the todo data-access contract.
//!
//! One table, one connection. The connection sits behind a mutex so the store
//! can be shared across request tasks; each trait method holds the lock for a
//! single statement only.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension, Row};
use todo_core::{StoreError, Todo, TodoStore};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS todos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    date TEXT NOT NULL,
    completed INTEGER NOT NULL DEFAULT 0
)";

#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database file and install the schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(StoreError::backend)?;
        }
        Self::from_connection(Connection::open(path).map_err(sql)?)
    }

    /// Private database that disappears with the store.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory().map_err(sql)?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA).map_err(sql)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Run a single-row UPDATE and report whether the row was there.
    fn update(&self, statement: &str, params: impl rusqlite::Params) -> Result<bool, StoreError> {
        let changed = self.conn()?.execute(statement, params).map_err(sql)?;
        Ok(changed > 0)
    }
}

fn sql(err: rusqlite::Error) -> StoreError {
    StoreError::backend(err)
}

fn row_to_todo(row: &Row<'_>) -> rusqlite::Result<Todo> {
    Ok(Todo {
        id: row.get(0)?,
        title: row.get(1)?,
        date: row.get(2)?,
        completed: row.get(3)?,
    })
}

impl TodoStore for SqliteStore {
    fn get_all(&self) -> Result<Vec<Todo>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare("SELECT id, title, date, completed FROM todos ORDER BY id")
            .map_err(sql)?;
        let rows = stmt.query_map([], row_to_todo).map_err(sql)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(sql)
    }

    fn get(&self, id: i64) -> Result<Option<Todo>, StoreError> {
        self.conn()?
            .query_row(
                "SELECT id, title, date, completed FROM todos WHERE id = ?1",
                params![id],
                row_to_todo,
            )
            .optional()
            .map_err(sql)
    }

    fn create(&self, title: &str, date: &str, completed: bool) -> Result<Todo, StoreError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO todos (title, date, completed) VALUES (?1, ?2, ?3)",
            params![title, date, completed],
        )
        .map_err(sql)?;
        Ok(Todo {
            id: conn.last_insert_rowid(),
            title: title.to_string(),
            date: date.to_string(),
            completed,
        })
    }

    fn update_title(&self, id: i64, title: &str) -> Result<bool, StoreError> {
        self.update("UPDATE todos SET title = ?1 WHERE id = ?2", params![title, id])
    }

    fn update_date(&self, id: i64, date: &str) -> Result<bool, StoreError> {
        self.update("UPDATE todos SET date = ?1 WHERE id = ?2", params![date, id])
    }

    fn update_completed(&self, id: i64, completed: bool) -> Result<bool, StoreError> {
        self.update(
            "UPDATE todos SET completed = ?1 WHERE id = ?2",
            params![completed, id],
        )
    }

    fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.conn()?
            .execute("DELETE FROM todos WHERE id = ?1", params![id])
            .map_err(sql)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SqliteStore {
        SqliteStore::open_in_memory().unwrap()
    }

    #[test]
    fn create_then_get_round_trips_row() {
        let store = store();
        let created = store.create("Buy milk", "2024-05-01", false).unwrap();
        assert!(created.id > 0);
        assert_eq!(store.get(created.id).unwrap(), Some(created));
    }

    #[test]
    fn get_missing_is_none() {
        assert_eq!(store().get(1).unwrap(), None);
    }

    #[test]
    fn get_all_orders_by_id() {
        let store = store();
        let a = store.create("a", "2024-05-01", false).unwrap();
        let b = store.create("b", "2024-05-02", true).unwrap();
        assert_eq!(store.get_all().unwrap(), vec![a, b]);
    }

    #[test]
    fn updates_report_row_existence() {
        let store = store();
        let todo = store.create("a", "2024-05-01", false).unwrap();
        assert!(store.update_title(todo.id, "b").unwrap());
        assert!(store.update_date(todo.id, "2024-06-01").unwrap());
        assert!(store.update_completed(todo.id, true).unwrap());
        assert!(!store.update_title(todo.id + 1, "c").unwrap());
        assert!(!store.update_date(todo.id + 1, "x").unwrap());
        assert!(!store.update_completed(todo.id + 1, false).unwrap());

        let stored = store.get(todo.id).unwrap().unwrap();
        assert_eq!(stored.title, "b");
        assert_eq!(stored.date, "2024-06-01");
        assert!(stored.completed);
    }

    #[test]
    fn rewriting_same_value_still_reports_existence() {
        let store = store();
        let todo = store.create("a", "2024-05-01", false).unwrap();
        assert!(store.update_title(todo.id, "a").unwrap());
        assert!(store.update_completed(todo.id, false).unwrap());
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let store = store();
        let first = store.create("a", "2024-05-01", false).unwrap();
        store.delete(first.id).unwrap();
        let second = store.create("b", "2024-05-01", false).unwrap();
        assert!(second.id > first.id);
        assert_eq!(store.get(first.id).unwrap(), None);
    }

    #[test]
    fn file_database_persists_across_reopen() {
        let dir = std::env::temp_dir().join(format!("todo-server-{}", std::process::id()));
        let path = dir.join("nested").join("todos.db");
        let _ = std::fs::remove_dir_all(&dir);

        let id = {
            let store = SqliteStore::open(&path).unwrap();
            store.create("persisted", "2024-05-01", true).unwrap().id
        };
        let reopened = SqliteStore::open(&path).unwrap();
        let todo = reopened.get(id).unwrap().unwrap();
        assert_eq!(todo.title, "persisted");
        assert!(todo.completed);

        drop(reopened);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
