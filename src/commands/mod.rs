//! Command definitions and implementations.
//!
//! Each command is defined in its own module with:
//! - The command struct with clap attributes for CLI parsing
//! - An `Execute` impl producing a serializable result
//! - An `Outputable` impl for the table format
//!
//! `up`, `down` and `status` connect to the configured database. `plan`,
//! `check` and `describe` work from the compiled-in schema and never connect.

mod check;
mod describe;
mod down;
mod plan;
mod status;
mod up;

pub use check::CheckCmd;
pub use describe::DescribeCmd;
pub use down::DownCmd;
pub use plan::PlanCmd;
pub use status::StatusCmd;
pub use up::UpCmd;

use clap::Subcommand;
use enum_dispatch::enum_dispatch;
use std::error::Error;

use crate::db::{DatabaseBackend, DatabaseConfig};
use crate::output::{OutputFormat, Outputable};

/// Trait for running a parsed command to formatted output.
#[enum_dispatch]
pub trait CommandRunner {
    fn run(self, ctx: &CommandContext, format: OutputFormat) -> Result<String, Box<dyn Error>>;
}

/// Trait for executing commands with command-specific result types.
pub trait Execute {
    type Output: Outputable;

    fn execute(self, db: &dyn DatabaseBackend) -> Result<Self::Output, Box<dyn Error>>;
}

/// Global options shared by every command.
#[derive(Debug, Clone, Default)]
pub struct CommandContext {
    /// Value of `--database-url`, if given
    pub database_url: Option<String>,
}

impl CommandContext {
    /// Resolve the configured database and connect to it.
    pub fn connect(&self) -> Result<Box<dyn DatabaseBackend>, Box<dyn Error>> {
        let config = DatabaseConfig::resolve(self.database_url.as_deref())?;
        Ok(config.connect()?)
    }
}

#[derive(Subcommand, Debug)]
#[enum_dispatch(CommandRunner)]
pub enum Command {
    /// Apply all pending migrations
    Up(UpCmd),

    /// Revert the most recently applied migration
    Down(DownCmd),

    /// Show applied and pending migrations
    Status(StatusCmd),

    /// Print the SQL a migration would run, without connecting
    Plan(PlanCmd),

    /// Validate the schema definition, without connecting
    Check(CheckCmd),

    /// Show tables, columns, keys and relationships
    Describe(DescribeCmd),
}
