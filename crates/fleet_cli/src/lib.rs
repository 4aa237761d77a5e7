//! Console front end for the fleet engines: command-line parsing, seed
//! manifests, staff accounts and report formatting.

pub mod accounts;
pub mod cli;
pub mod commands;
pub mod config;
pub mod fleet;
pub mod manifest;
pub mod report;

pub use cli::Cli;
pub use commands::{exit_code, run};
pub use fleet::Fleet;
