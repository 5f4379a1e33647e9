// Interactive tracker for departments, roles and employees.  Everything happens through the
// menu; the database location comes from employee_tracker.json or EMPLOYEE_TRACKER_DB.
use std::io;
use std::process::ExitCode;

use employee_tracker::config::Config;
use employee_tracker::data_handling::Store;
use employee_tracker::textinterface::TextInterface;
use tracing::error;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let config = match Config::load(None) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "could not load configuration");
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let store = match Store::open(&config.database) {
        Ok(store) => store,
        Err(e) => {
            error!(database = %config.database.display(), error = %e, "could not open database");
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut interface = TextInterface::new(store, io::stdin().lock(), io::stdout());

    match interface.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "session ended unexpectedly");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
