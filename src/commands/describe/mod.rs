mod execute;
mod output;

use std::error::Error;

use clap::Args;

use crate::commands::{CommandContext, CommandRunner, Execute};
use crate::db::MemoryBackend;
use crate::output::{OutputFormat, Outputable};

/// Show tables, columns, keys and relationships
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  hrm_schema describe                  # List all tables
  hrm_schema describe employees        # Columns, keys and foreign keys of one table
  hrm_schema describe projects -o json")]
pub struct DescribeCmd {
    /// Table to describe (if omitted, lists all)
    pub table: Option<String>,
}

impl CommandRunner for DescribeCmd {
    fn run(self, _ctx: &CommandContext, format: OutputFormat) -> Result<String, Box<dyn Error>> {
        let result = self.execute(&MemoryBackend::new())?;
        Ok(result.format(format))
    }
}

#[cfg(test)]
mod tests {
    use crate::cli::Args;
    use clap::Parser;
    use rstest::rstest;

    crate::cli_defaults_test! {
        command: "describe",
        variant: Describe,
        required_args: [],
        defaults: {
            table: None,
        },
    }

    crate::cli_option_test! {
        command: "describe",
        variant: Describe,
        test_name: test_with_table,
        args: ["employees"],
        field: table,
        expected: Some("employees".to_string()),
    }
}
