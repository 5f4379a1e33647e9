use rusqlite::{params, OptionalExtension, Row};
use tracing::debug;

use crate::data_handling::{Id, Result, Store};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Department {
    pub id: Id,
    pub name: String,
}

impl Department {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Department {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    }
}

pub struct DepartmentService<'a> {
    store: &'a Store,
}

impl<'a> DepartmentService<'a> {
    pub fn new(store: &'a Store) -> Self {
        DepartmentService { store }
    }

    pub fn list(&self) -> Result<Vec<Department>> {
        let mut stmt = self
            .store
            .conn()
            .prepare("SELECT id, name FROM departments ORDER BY id")?;
        let rows = stmt.query_map([], Department::from_row)?;

        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Insert a department and return the id the store assigned to it.  Names are not unique.
    pub fn create(&self, name: &str) -> Result<Id> {
        let conn = self.store.conn();
        conn.execute("INSERT INTO departments (name) VALUES (?1)", params![name])?;
        let id = conn.last_insert_rowid();

        debug!(id, name, "department created");
        Ok(id)
    }

    /// First department (lowest id) whose name matches exactly.
    pub fn find_by_name(&self, name: &str) -> Result<Option<Department>> {
        let department = self
            .store
            .conn()
            .query_row(
                "SELECT id, name FROM departments WHERE name = ?1 ORDER BY id LIMIT 1",
                params![name],
                Department::from_row,
            )
            .optional()?;

        Ok(department)
    }
}
