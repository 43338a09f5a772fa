mod execute;
mod output;

use std::error::Error;

use clap::Args;

use crate::commands::{CommandContext, CommandRunner, Execute};
use crate::db::schema::migrations::Direction;
use crate::db::MemoryBackend;
use crate::output::{OutputFormat, Outputable};

/// Print the SQL statements a migration runs
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  hrm_schema plan                      # Forward SQL for every migration
  hrm_schema plan --direction down     # SQL that reverts the last migration
  hrm_schema plan -o json              # Statements with their phase and target")]
pub struct PlanCmd {
    /// Which statement list to print
    #[arg(long, value_enum, default_value_t = Direction::Up)]
    pub direction: Direction,
}

impl CommandRunner for PlanCmd {
    fn run(self, _ctx: &CommandContext, format: OutputFormat) -> Result<String, Box<dyn Error>> {
        let scratch = MemoryBackend::new();
        let result = self.execute(&scratch)?;
        Ok(result.format(format))
    }
}
