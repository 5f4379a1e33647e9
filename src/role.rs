use rusqlite::{params, OptionalExtension, Row};
use tracing::debug;

use crate::data_handling::{DataError, Id, Result, Store};

const SELECT_ROLES: &str = "
SELECT r.id, r.title, r.salary, r.department_id, d.name
FROM roles r
JOIN departments d ON d.id = r.department_id";

#[derive(Debug, Clone, PartialEq)]
pub struct Role {
    pub id: Id,
    pub title: String,
    pub salary: f64,
    pub department_id: Id,
    /// Name of the owning department, joined in for display.
    pub department: String,
}

impl Role {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Role {
            id: row.get(0)?,
            title: row.get(1)?,
            salary: row.get(2)?,
            department_id: row.get(3)?,
            department: row.get(4)?,
        })
    }
}

/// Parse a salary typed at the prompt.  Surrounding whitespace is ignored; anything that is not
/// a finite, non-negative number is rejected.
pub fn parse_salary(input: &str) -> Result<f64> {
    let trimmed = input.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(DataError::InvalidSalary(String::from(trimmed))),
    }
}

pub struct RoleService<'a> {
    store: &'a Store,
}

impl<'a> RoleService<'a> {
    pub fn new(store: &'a Store) -> Self {
        RoleService { store }
    }

    pub fn list(&self) -> Result<Vec<Role>> {
        let mut stmt = self
            .store
            .conn()
            .prepare(&format!("{} ORDER BY r.id", SELECT_ROLES))?;
        let rows = stmt.query_map([], Role::from_row)?;

        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Insert a role under an existing department.  The department id is checked before the
    /// insert so a stale id reports which reference failed rather than a bare constraint error.
    pub fn create(&self, title: &str, salary: f64, department_id: Id) -> Result<Id> {
        let conn = self.store.conn();

        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM departments WHERE id = ?1)",
            params![department_id],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(DataError::reference("department", &department_id.to_string()));
        }

        conn.execute(
            "INSERT INTO roles (title, salary, department_id) VALUES (?1, ?2, ?3)",
            params![title, salary, department_id],
        )?;
        let id = conn.last_insert_rowid();

        debug!(id, title, salary, department_id, "role created");
        Ok(id)
    }

    /// First role (lowest id) whose title matches exactly.
    pub fn find_by_title(&self, title: &str) -> Result<Option<Role>> {
        let role = self
            .store
            .conn()
            .query_row(
                &format!("{} WHERE r.title = ?1 ORDER BY r.id LIMIT 1", SELECT_ROLES),
                params![title],
                Role::from_row,
            )
            .optional()?;

        Ok(role)
    }
}
