use std::io::{self, BufRead, Write};

use thiserror::Error;
use tracing::{info, warn};

use crate::data_handling::{DataError, Store};
use crate::department::DepartmentService;
use crate::display;
use crate::personnel::{EmployeeService, NO_MANAGER};
use crate::role::{parse_salary, RoleService};

pub type Result<T> = std::result::Result<T, TextInterfaceError>;

const MENU_PROMPT: &str = "Please choose an option:";

/// One entry of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ViewDepartments,
    ViewRoles,
    ViewEmployees,
    AddDepartment,
    AddRole,
    AddEmployee,
    UpdateEmployeeRole,
    Exit,
}

impl Action {
    /// Menu order.
    pub const ALL: [Action; 8] = [
        Action::ViewDepartments,
        Action::ViewRoles,
        Action::ViewEmployees,
        Action::AddDepartment,
        Action::AddRole,
        Action::AddEmployee,
        Action::UpdateEmployeeRole,
        Action::Exit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Action::ViewDepartments => "View All Departments",
            Action::ViewRoles => "View All Roles",
            Action::ViewEmployees => "View All Employees",
            Action::AddDepartment => "Add A Department",
            Action::AddRole => "Add A Role",
            Action::AddEmployee => "Add An Employee",
            Action::UpdateEmployeeRole => "Update An Employee Role",
            Action::Exit => "Exit",
        }
    }

    pub fn from_label(label: &str) -> Option<Action> {
        Action::ALL.iter().copied().find(|a| a.label() == label)
    }
}

/// An action together with everything collected for it at the prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    ViewDepartments,
    ViewRoles,
    ViewEmployees,
    AddDepartment {
        name: String,
    },
    AddRole {
        title: String,
        salary: f64,
        department: String,
    },
    AddEmployee {
        first_name: String,
        last_name: String,
        role: String,
        manager: Option<String>,
    },
    UpdateEmployeeRole {
        employee: String,
        role: String,
    },
    Exit,
}

impl Request {
    pub fn action(&self) -> Action {
        match self {
            Request::ViewDepartments => Action::ViewDepartments,
            Request::ViewRoles => Action::ViewRoles,
            Request::ViewEmployees => Action::ViewEmployees,
            Request::AddDepartment { .. } => Action::AddDepartment,
            Request::AddRole { .. } => Action::AddRole,
            Request::AddEmployee { .. } => Action::AddEmployee,
            Request::UpdateEmployeeRole { .. } => Action::UpdateEmployeeRole,
            Request::Exit => Action::Exit,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum State {
    MainMenu,
    Collecting(Action),
    Executing(Request),
    Terminated,
}

/// The interactive session.  Reads answers from `R`, writes menus, tables and messages to `W`.
pub struct TextInterface<R, W> {
    io: TextIO<R, W>,
    store: Store,
}

impl<R: BufRead, W: Write> TextInterface<R, W> {
    pub fn new(store: Store, input: R, output: W) -> Self {
        TextInterface {
            io: TextIO { input, output },
            store,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn output(&self) -> &W {
        &self.io.output
    }

    /// Drive the session until Exit is chosen.  Errors from a menu action are reported and the
    /// menu comes back; only a console failure, such as input closing, ends the loop early.
    pub fn run(&mut self) -> Result<()> {
        info!("session started");
        let mut state = State::MainMenu;
        while state != State::Terminated {
            state = self.step(state)?;
        }
        info!("session finished");
        Ok(())
    }

    /// Perform a single transition.
    pub fn step(&mut self, state: State) -> Result<State> {
        match state {
            State::MainMenu => {
                let labels: Vec<String> = Action::ALL
                    .iter()
                    .map(|a| String::from(a.label()))
                    .collect();
                let choice = self.io.select(MENU_PROMPT, &labels, "menu entries")?;
                Ok(match Action::from_label(&choice) {
                    Some(action) => State::Collecting(action),
                    None => State::MainMenu,
                })
            }
            State::Collecting(action) => match self.collect(action) {
                Ok(request) => Ok(State::Executing(request)),
                Err(e) => self.recover(action, e),
            },
            State::Executing(request) => {
                let action = request.action();
                match self.execute(request) {
                    Ok(next) => Ok(next),
                    Err(e) => self.recover(action, e),
                }
            }
            State::Terminated => Ok(State::Terminated),
        }
    }

    fn recover(&mut self, action: Action, error: TextInterfaceError) -> Result<State> {
        if let TextInterfaceError::Io(_) = error {
            return Err(error);
        }

        warn!(action = action.label(), %error, "action failed");
        writeln!(self.io.output, "Error: {}", error)?;
        Ok(State::MainMenu)
    }

    fn collect(&mut self, action: Action) -> Result<Request> {
        let request = match action {
            Action::ViewDepartments => Request::ViewDepartments,
            Action::ViewRoles => Request::ViewRoles,
            Action::ViewEmployees => Request::ViewEmployees,
            Action::Exit => Request::Exit,
            Action::AddDepartment => Request::AddDepartment {
                name: self.io.input("Enter the name of the new department:")?,
            },
            Action::AddRole => {
                let departments: Vec<String> = DepartmentService::new(&self.store)
                    .list()?
                    .into_iter()
                    .map(|d| d.name)
                    .collect();
                require(&departments, "departments")?;

                let title = self.io.input("Enter the name of the new role:")?;
                let salary = parse_salary(&self.io.input("Enter the salary for the new role:")?)?;
                let department =
                    self.io
                        .select("Select associated department:", &departments, "departments")?;

                Request::AddRole {
                    title,
                    salary,
                    department,
                }
            }
            Action::AddEmployee => {
                let roles = self.role_titles()?;
                require(&roles, "roles")?;
                let mut managers = self.employee_names()?;
                managers.push(String::from(NO_MANAGER));

                let first_name = self.io.input("Enter the first name of the new employee:")?;
                let last_name = self.io.input("Enter the last name of the new employee:")?;
                let role = self
                    .io
                    .select("Choose a role for the new employee:", &roles, "roles")?;
                let manager = self.io.select(
                    "Select the new employee's manager (optional):",
                    &managers,
                    "employees",
                )?;

                Request::AddEmployee {
                    first_name,
                    last_name,
                    role,
                    manager: if manager == NO_MANAGER {
                        None
                    } else {
                        Some(manager)
                    },
                }
            }
            Action::UpdateEmployeeRole => {
                let employees = self.employee_names()?;
                require(&employees, "employees")?;
                let roles = self.role_titles()?;
                require(&roles, "roles")?;

                let employee =
                    self.io
                        .select("Select the Employee to update:", &employees, "employees")?;
                let role = self
                    .io
                    .select("Select the Employee's new role:", &roles, "roles")?;

                Request::UpdateEmployeeRole { employee, role }
            }
        };

        Ok(request)
    }

    fn execute(&mut self, request: Request) -> Result<State> {
        let out = &mut self.io.output;

        match request {
            Request::ViewDepartments => {
                writeln!(out, "Viewing all departments...")?;
                let departments = DepartmentService::new(&self.store).list()?;
                writeln!(out, "{}", display::render_departments(&departments))?;
            }
            Request::ViewRoles => {
                writeln!(out, "Viewing all roles...")?;
                let roles = RoleService::new(&self.store).list()?;
                writeln!(out, "{}", display::render_roles(&roles))?;
            }
            Request::ViewEmployees => {
                writeln!(out, "Viewing all employees...")?;
                let employees = EmployeeService::new(&self.store).list()?;
                writeln!(out, "{}", display::render_employees(&employees))?;
            }
            Request::AddDepartment { name } => {
                DepartmentService::new(&self.store).create(&name)?;
                writeln!(out, "Added department: {}", name)?;
            }
            Request::AddRole {
                title,
                salary,
                department,
            } => {
                let found = DepartmentService::new(&self.store)
                    .find_by_name(&department)?
                    .ok_or_else(|| DataError::reference("department", &department))?;
                RoleService::new(&self.store).create(&title, salary, found.id)?;
                writeln!(
                    out,
                    "Added role: {} with salary: {} and department: {}",
                    title, salary, department
                )?;
            }
            Request::AddEmployee {
                first_name,
                last_name,
                role,
                manager,
            } => {
                EmployeeService::new(&self.store).create(
                    &first_name,
                    &last_name,
                    &role,
                    manager.as_deref(),
                )?;
                writeln!(
                    out,
                    "Added employee: {} {}, Role: {}, Manager Name: {}",
                    first_name,
                    last_name,
                    role,
                    manager.as_deref().unwrap_or(NO_MANAGER)
                )?;
            }
            Request::UpdateEmployeeRole { employee, role } => {
                EmployeeService::new(&self.store).update(&employee, &role)?;
                writeln!(out, "Updated employee {} to role {}", employee, role)?;
            }
            Request::Exit => {
                writeln!(out, "Exiting...")?;
                out.flush()?;
                return Ok(State::Terminated);
            }
        }

        Ok(State::MainMenu)
    }

    fn role_titles(&self) -> Result<Vec<String>> {
        Ok(RoleService::new(&self.store)
            .list()?
            .into_iter()
            .map(|r| r.title)
            .collect())
    }

    fn employee_names(&self) -> Result<Vec<String>> {
        Ok(EmployeeService::new(&self.store)
            .list()?
            .iter()
            .map(|e| e.full_name())
            .collect())
    }
}

fn require(choices: &[String], what: &'static str) -> Result<()> {
    if choices.is_empty() {
        return Err(TextInterfaceError::NoChoices(what));
    }
    Ok(())
}

struct TextIO<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TextIO<R, W> {
    fn read_line(&mut self) -> Result<String> {
        let mut buffer = String::new();
        if self.input.read_line(&mut buffer)? == 0 {
            return Err(TextInterfaceError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed",
            )));
        }
        Ok(String::from(buffer.trim_end_matches(&['\r', '\n'][..])))
    }

    /// Free-text question.  The answer is kept as typed, minus the line ending.
    fn input(&mut self, message: &str) -> Result<String> {
        write!(self.output, "{} ", message)?;
        self.output.flush()?;
        self.read_line()
    }

    /// Single choice.  Accepts the entry's exact label or its number and asks again otherwise.
    /// A label wins over a number, so a choice named "2" is reachable by typing it.
    fn select(&mut self, message: &str, choices: &[String], what: &'static str) -> Result<String> {
        require(choices, what)?;

        loop {
            writeln!(self.output, "{}", message)?;
            for (index, choice) in choices.iter().enumerate() {
                writeln!(self.output, "  {}) {}", index + 1, choice)?;
            }
            write!(self.output, "?> ")?;
            self.output.flush()?;

            let answer = self.read_line()?;

            if let Some(choice) = choices.iter().find(|c| **c == answer) {
                return Ok(choice.clone());
            }
            if let Ok(number) = answer.trim().parse::<usize>() {
                if (1..=choices.len()).contains(&number) {
                    return Ok(choices[number - 1].clone());
                }
            }

            writeln!(self.output, "Invalid selection.")?;
        }
    }
}

#[derive(Debug, Error)]
pub enum TextInterfaceError {
    #[error(transparent)]
    Data(#[from] DataError),
    #[error("no {0} to choose from")]
    NoChoices(&'static str),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
