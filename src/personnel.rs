use std::fmt;

use rusqlite::{params, OptionalExtension, Row};
use tracing::debug;

use crate::data_handling::{DataError, Id, Result, Store};
use crate::role::RoleService;

/// Manager choice meaning "this employee reports to nobody".
pub const NO_MANAGER: &str = "None";

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Name {
    pub first: String,
    pub last: String,
}

/// Renders as "first last", the form employees are picked by at the prompt.
impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.first, self.last)
    }
}

/// An employee row as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    pub id: Id,
    pub name: Name,
    pub role_id: Id,
    pub manager_id: Option<Id>,
}

impl Employee {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Employee {
            id: row.get(0)?,
            name: Name {
                first: row.get(1)?,
                last: row.get(2)?,
            },
            role_id: row.get(3)?,
            manager_id: row.get(4)?,
        })
    }
}

/// An employee joined with role, department and manager for listing.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeView {
    pub id: Id,
    pub first_name: String,
    pub last_name: String,
    pub title: String,
    pub department: String,
    pub salary: f64,
    pub manager: Option<String>,
}

impl EmployeeView {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(EmployeeView {
            id: row.get(0)?,
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            title: row.get(3)?,
            department: row.get(4)?,
            salary: row.get(5)?,
            manager: row.get(6)?,
        })
    }
}

pub struct EmployeeService<'a> {
    store: &'a Store,
}

impl<'a> EmployeeService<'a> {
    pub fn new(store: &'a Store) -> Self {
        EmployeeService { store }
    }

    pub fn list(&self) -> Result<Vec<EmployeeView>> {
        let mut stmt = self.store.conn().prepare(
            "SELECT e.id, e.first_name, e.last_name, r.title, d.name, r.salary,
                    m.first_name || ' ' || m.last_name
             FROM employees e
             JOIN roles r ON r.id = e.role_id
             JOIN departments d ON d.id = r.department_id
             LEFT JOIN employees m ON m.id = e.manager_id
             ORDER BY e.id",
        )?;
        let rows = stmt.query_map([], EmployeeView::from_row)?;

        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn find_by_id(&self, id: Id) -> Result<Option<Employee>> {
        let employee = self
            .store
            .conn()
            .query_row(
                "SELECT id, first_name, last_name, role_id, manager_id FROM employees WHERE id = ?1",
                params![id],
                Employee::from_row,
            )
            .optional()?;

        Ok(employee)
    }

    /// Resolve a "first last" display name.  Several employees sharing the name is an error
    /// rather than a guess, since the wrong row would be silently modified.
    pub fn find_by_full_name(&self, full_name: &str) -> Result<Option<Employee>> {
        let mut stmt = self.store.conn().prepare(
            "SELECT id, first_name, last_name, role_id, manager_id FROM employees
             WHERE first_name || ' ' || last_name = ?1
             ORDER BY id",
        )?;
        let mut matches = stmt
            .query_map(params![full_name], Employee::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            _ => Err(DataError::Ambiguous {
                name: String::from(full_name),
                ids: matches.iter().map(|e| e.id).collect(),
            }),
        }
    }

    /// Add an employee.  The role title and the manager's full name are resolved first; if
    /// either fails nothing is written.  `None`, or the `NO_MANAGER` choice, leaves the
    /// manager empty.
    pub fn create(
        &self,
        first_name: &str,
        last_name: &str,
        role_name: &str,
        manager_name: Option<&str>,
    ) -> Result<Id> {
        let role = RoleService::new(self.store)
            .find_by_title(role_name)?
            .ok_or_else(|| DataError::reference("role", role_name))?;

        let manager_id = match manager_name {
            None | Some(NO_MANAGER) => None,
            Some(name) => {
                let manager = self
                    .find_by_full_name(name)?
                    .ok_or_else(|| DataError::reference("employee", name))?;
                Some(manager.id)
            }
        };

        let conn = self.store.conn();
        conn.execute(
            "INSERT INTO employees (first_name, last_name, role_id, manager_id)
             VALUES (?1, ?2, ?3, ?4)",
            params![first_name, last_name, role.id, manager_id],
        )?;
        let id = conn.last_insert_rowid();

        debug!(id, role_id = role.id, ?manager_id, "employee created");
        Ok(id)
    }

    /// Move an employee to another role.  Only `role_id` changes.
    pub fn update(&self, employee_name: &str, role_name: &str) -> Result<()> {
        let employee = self
            .find_by_full_name(employee_name)?
            .ok_or_else(|| DataError::reference("employee", employee_name))?;
        let role = RoleService::new(self.store)
            .find_by_title(role_name)?
            .ok_or_else(|| DataError::reference("role", role_name))?;

        self.store.conn().execute(
            "UPDATE employees SET role_id = ?1 WHERE id = ?2",
            params![role.id, employee.id],
        )?;

        debug!(id = employee.id, name = %employee.name, role_id = role.id, "employee role updated");
        Ok(())
    }
}
