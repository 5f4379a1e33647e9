use std::io::Cursor;

use employee_tracker::data_handling::Store;
use employee_tracker::department::DepartmentService;
use employee_tracker::personnel::EmployeeService;
use employee_tracker::role::RoleService;
use employee_tracker::textinterface::{TextInterface, TextInterfaceError};

type ScriptedInterface = TextInterface<Cursor<Vec<u8>>, Vec<u8>>;

fn scripted(store: Store, lines: &[&str]) -> ScriptedInterface {
    let mut script = lines.join("\n");
    script.push('\n');
    TextInterface::new(store, Cursor::new(script.into_bytes()), Vec::new())
}

fn transcript(interface: &ScriptedInterface) -> String {
    String::from_utf8(interface.output().clone()).unwrap()
}

#[test]
fn onboarding_and_promotion() {
    let mut interface = scripted(
        Store::in_memory().unwrap(),
        &[
            "Add A Department",
            "Engineering",
            "Add A Role",
            "Engineer",
            "75000",
            "Engineering",
            "Add An Employee",
            "Ada",
            "Lovelace",
            "Engineer",
            "None",
            "View All Employees",
            "Add A Role",
            "Lead Engineer",
            "90000",
            "1",
            "Update An Employee Role",
            "Ada Lovelace",
            "Lead Engineer",
            "View All Employees",
            "Exit",
        ],
    );

    interface.run().unwrap();

    let store = interface.store();
    let employees = EmployeeService::new(store).list().unwrap();
    assert_eq!(employees.len(), 1);
    let ada = &employees[0];
    assert_eq!(ada.first_name, "Ada");
    assert_eq!(ada.last_name, "Lovelace");
    assert_eq!(ada.title, "Lead Engineer");
    assert_eq!(ada.department, "Engineering");
    assert_eq!(ada.manager, None);

    let roles = RoleService::new(store).list().unwrap();
    let engineering = DepartmentService::new(store)
        .find_by_name("Engineering")
        .unwrap()
        .unwrap();
    assert_eq!(roles.len(), 2);
    assert!(roles.iter().all(|r| r.department_id == engineering.id));

    let out = transcript(&interface);
    assert!(out.contains("Added department: Engineering"));
    assert!(out.contains("Added role: Engineer with salary: 75000 and department: Engineering"));
    assert!(out.contains("Added employee: Ada Lovelace, Role: Engineer, Manager Name: None"));
    assert!(out.contains("Updated employee Ada Lovelace to role Lead Engineer"));
    assert!(out.trim_end().ends_with("Exiting..."));

    let (before, after) = out.split_at(out.find("Updated employee").unwrap());
    assert!(before.contains("Viewing all employees..."));
    assert!(after.contains("Viewing all employees..."));
    assert!(after.contains("Lead Engineer"));
}

#[test]
fn data_errors_return_to_the_menu() {
    let mut interface = scripted(
        Store::in_memory().unwrap(),
        &[
            "Add A Role",
            "Add An Employee",
            "Update An Employee Role",
            "Add A Department",
            "Sales",
            "Add A Role",
            "Rep",
            "a lot",
            "View All Roles",
            "Exit",
        ],
    );

    interface.run().unwrap();

    let out = transcript(&interface);
    assert!(out.contains("Error: no departments to choose from"));
    assert!(out.contains("Error: no roles to choose from"));
    assert!(out.contains("Error: no employees to choose from"));
    assert!(out.contains("Error: invalid salary \"a lot\""));
    assert!(out.contains("Exiting..."));
    assert!(RoleService::new(interface.store()).list().unwrap().is_empty());
}

#[test]
fn manager_is_picked_from_existing_employees() {
    let store = Store::in_memory().unwrap();
    let department = DepartmentService::new(&store).create("Research").unwrap();
    RoleService::new(&store)
        .create("Scientist", 50000.0, department)
        .unwrap();
    let lead = EmployeeService::new(&store)
        .create("Marie", "Curie", "Scientist", None)
        .unwrap();

    let mut interface = scripted(
        store,
        &["Add An Employee", "Pierre", "Curie", "1", "Marie Curie", "Exit"],
    );
    interface.run().unwrap();

    let employees = EmployeeService::new(interface.store());
    let pierre = employees.find_by_full_name("Pierre Curie").unwrap().unwrap();
    assert_eq!(pierre.manager_id, Some(lead));
}

#[test]
fn rows_survive_between_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("company.db");

    let mut first = scripted(
        Store::open(&path).unwrap(),
        &["Add A Department", "Finance", "Exit"],
    );
    first.run().unwrap();
    drop(first);

    let mut second = scripted(Store::open(&path).unwrap(), &["View All Departments", "Exit"]);
    second.run().unwrap();

    assert!(transcript(&second).contains("Finance"));
}

#[test]
fn closed_input_without_exit_is_an_error() {
    let mut interface = scripted(Store::in_memory().unwrap(), &["View All Departments"]);

    assert!(matches!(interface.run(), Err(TextInterfaceError::Io(_))));
}

#[test]
fn storage_failure_is_reported_and_the_menu_returns() {
    let store = Store::in_memory().unwrap();
    store.conn().execute_batch("DROP TABLE employees;").unwrap();

    let mut interface = scripted(
        store,
        &["View All Employees", "Add A Department", "Legal", "Exit"],
    );

    interface.run().unwrap();

    let out = transcript(&interface);
    assert!(out.contains("Error: storage error: no such table: employees"));
    assert!(out.contains("Added department: Legal"));
    assert!(out.trim_end().ends_with("Exiting..."));
}
