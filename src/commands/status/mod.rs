mod execute;
mod output;

use std::error::Error;

use clap::Args;

use crate::commands::{CommandContext, CommandRunner, Execute};
use crate::output::{OutputFormat, Outputable};

/// Show applied and pending migrations
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  hrm_schema status            # Migration state and live table/enum counts
  hrm_schema status -o json    # Same, as JSON")]
pub struct StatusCmd {}

impl CommandRunner for StatusCmd {
    fn run(self, ctx: &CommandContext, format: OutputFormat) -> Result<String, Box<dyn Error>> {
        let db = ctx.connect()?;
        let result = self.execute(db.as_ref())?;
        Ok(result.format(format))
    }
}
