use comfy_table::{presets, Table};

use crate::department::Department;
use crate::personnel::EmployeeView;
use crate::role::Role;

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.set_header(header.to_vec());
    table
}

pub fn render_departments(departments: &[Department]) -> String {
    let mut table = new_table(&["id", "name"]);
    for department in departments {
        table.add_row(vec![department.id.to_string(), department.name.clone()]);
    }
    table.to_string()
}

pub fn render_roles(roles: &[Role]) -> String {
    let mut table = new_table(&["id", "title", "salary", "department"]);
    for role in roles {
        table.add_row(vec![
            role.id.to_string(),
            role.title.clone(),
            role.salary.to_string(),
            role.department.clone(),
        ]);
    }
    table.to_string()
}

pub fn render_employees(employees: &[EmployeeView]) -> String {
    let mut table = new_table(&[
        "id",
        "first_name",
        "last_name",
        "title",
        "department",
        "salary",
        "manager",
    ]);
    for employee in employees {
        table.add_row(vec![
            employee.id.to_string(),
            employee.first_name.clone(),
            employee.last_name.clone(),
            employee.title.clone(),
            employee.department.clone(),
            employee.salary.to_string(),
            employee.manager.clone().unwrap_or_else(|| String::from("null")),
        ]);
    }
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_still_has_a_header() {
        let rendered = render_departments(&[]);
        assert!(rendered.contains("id"));
        assert!(rendered.contains("name"));
    }

    #[test]
    fn employee_without_manager_renders_null() {
        let rendered = render_employees(&[EmployeeView {
            id: 1,
            first_name: String::from("Ada"),
            last_name: String::from("Lovelace"),
            title: String::from("Engineer"),
            department: String::from("Engineering"),
            salary: 75000.0,
            manager: None,
        }]);

        assert!(rendered.contains("Ada"));
        assert!(rendered.contains("Lovelace"));
        assert!(rendered.contains("75000"));
        assert!(rendered.contains("null"));
    }

    #[test]
    fn roles_show_department_name() {
        let rendered = render_roles(&[Role {
            id: 3,
            title: String::from("Engineer"),
            salary: 1234.5,
            department_id: 7,
            department: String::from("Engineering"),
        }]);

        assert!(rendered.contains("Engineering"));
        assert!(rendered.contains("1234.5"));
    }
}
