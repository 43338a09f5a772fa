mod execute;
mod output;

use std::error::Error;

use clap::Args;

use crate::commands::{CommandContext, CommandRunner, Execute};
use crate::output::{OutputFormat, Outputable};

/// Revert the most recently applied migration
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  hrm_schema down              # Drop everything the last migration created
  hrm_schema down --dry-run    # Name the migration that would be reverted")]
pub struct DownCmd {
    /// Show which migration would be reverted without reverting it
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

impl CommandRunner for DownCmd {
    fn run(self, ctx: &CommandContext, format: OutputFormat) -> Result<String, Box<dyn Error>> {
        let db = ctx.connect()?;
        let result = self.execute(db.as_ref())?;
        Ok(result.format(format))
    }
}
