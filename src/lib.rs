pub mod config;
pub mod data_handling;
pub mod department;
pub mod display;
pub mod personnel;
pub mod role;
pub mod textinterface;
