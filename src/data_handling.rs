use std::path::Path;

use rusqlite::Connection;
use thiserror::Error;
use tracing::debug;

pub type Result<T> = std::result::Result<T, DataError>;

pub type Id = i64;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS departments (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS roles (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    title         TEXT NOT NULL,
    salary        REAL NOT NULL,
    department_id INTEGER NOT NULL REFERENCES departments(id)
);
CREATE TABLE IF NOT EXISTS employees (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name  TEXT NOT NULL,
    role_id    INTEGER NOT NULL REFERENCES roles(id),
    manager_id INTEGER REFERENCES employees(id)
);
";

/// Store is the single handle to the relational data behind departments, roles and employees.
/// It is opened once and lent to each service, so tests can hand the services an in-memory
/// database instead of a file.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) the database file at `path` and make sure the tables exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening store");
        Self::bootstrap(Connection::open(path)?)
    }

    pub fn in_memory() -> Result<Self> {
        Self::bootstrap(Connection::open_in_memory()?)
    }

    fn bootstrap(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Store { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

#[derive(Debug, Error)]
pub enum DataError {
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
    #[error("no {kind} named \"{name}\"")]
    Reference { kind: &'static str, name: String },
    #[error("\"{name}\" matches more than one employee (ids {ids:?})")]
    Ambiguous { name: String, ids: Vec<Id> },
    #[error("invalid salary \"{0}\", expected a non-negative number")]
    InvalidSalary(String),
}

impl DataError {
    pub fn reference(kind: &'static str, name: &str) -> Self {
        DataError::Reference {
            kind,
            name: String::from(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bootstrap_creates_all_tables() {
        let store = Store::in_memory().unwrap();
        let mut stmt = store
            .conn()
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name")
            .unwrap();
        let names: Vec<String> = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<_, _>>()
            .unwrap();

        assert_eq!(names, vec!["departments", "employees", "roles"]);
    }

    #[test]
    fn foreign_keys_are_enforced() {
        let store = Store::in_memory().unwrap();
        let result = store.conn().execute(
            "INSERT INTO roles (title, salary, department_id) VALUES ('Ghost', 1.0, 42)",
            [],
        );

        assert!(result.is_err());
    }

    #[test]
    fn reopening_a_file_keeps_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tracker.db");

        {
            let store = Store::open(&path).unwrap();
            store
                .conn()
                .execute("INSERT INTO departments (name) VALUES ('Sales')", [])
                .unwrap();
        }

        let store = Store::open(&path).unwrap();
        let count: i64 = store
            .conn()
            .query_row("SELECT COUNT(*) FROM departments", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
