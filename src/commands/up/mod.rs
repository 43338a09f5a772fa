mod execute;
mod output;

use std::error::Error;

use clap::Args;

use crate::commands::{CommandContext, CommandRunner, Execute};
use crate::output::{OutputFormat, Outputable};

/// Apply all pending migrations
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  hrm_schema up                                     # Apply pending migrations
  hrm_schema up --dry-run                           # List what would be applied
  hrm_schema --database-url postgres://hr@localhost/hr up")]
pub struct UpCmd {
    /// Show pending migrations without applying them
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

impl CommandRunner for UpCmd {
    fn run(self, ctx: &CommandContext, format: OutputFormat) -> Result<String, Box<dyn Error>> {
        let db = ctx.connect()?;
        let result = self.execute(db.as_ref())?;
        Ok(result.format(format))
    }
}

#[cfg(test)]
mod tests {
    use crate::cli::Args;
    use clap::Parser;
    use rstest::rstest;

    crate::cli_defaults_test! {
        command: "up",
        variant: Up,
        required_args: [],
        defaults: {
            dry_run: false,
        },
    }

    crate::cli_option_test! {
        command: "up",
        variant: Up,
        test_name: test_with_dry_run,
        args: ["--dry-run"],
        field: dry_run,
        expected: true,
    }
}
