//! Startup configuration read from the environment.
//!
//! | Variable    | Default     | Meaning                                        |
//! |-------------|-------------|------------------------------------------------|
//! | `TODO_HOST` | `127.0.0.1` | Interface to bind                              |
//! | `PORT`      | `3000`      | TCP port                                       |
//! | `TODO_DB`   | `todos.db`  | SQLite file path, or `:memory:` for in-process |

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use todo_core::{MemoryStore, StoreError, TodoStore};

use crate::sqlite::SqliteStore;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DB: &str = "todos.db";
const MEMORY_DB: &str = ":memory:";

/// Where todos are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Database {
    Memory,
    File(PathBuf),
}

impl Database {
    pub fn open(&self) -> Result<Arc<dyn TodoStore>, StoreError> {
        match self {
            Database::Memory => Ok(Arc::new(MemoryStore::new())),
            Database::File(path) => Ok(Arc::new(SqliteStore::open(path)?)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database: Database,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("TODO_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };
        let database = match lookup("TODO_DB").as_deref() {
            Some(MEMORY_DB) => Database::Memory,
            Some(path) if !path.is_empty() => Database::File(PathBuf::from(path)),
            _ => Database::File(PathBuf::from(DEFAULT_DB)),
        };
        Ok(Self {
            host,
            port,
            database,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidPort(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort(raw) => write!(f, "PORT is not a valid port number: {raw:?}"),
        }
    }
}

impl std::error::Error for ConfigError {}
