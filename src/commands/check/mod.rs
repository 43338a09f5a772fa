mod execute;
mod output;

use std::error::Error;

use clap::Args;

use crate::commands::{CommandContext, CommandRunner, Execute};
use crate::db::MemoryBackend;
use crate::output::{OutputFormat, Outputable};

/// Validate the schema definition
#[derive(Args, Debug)]
#[command(after_help = "\
Checks foreign key targets, enum declarations, creation order, key rules,
identifier lengths and that every down migration mirrors its up migration.
Exits non-zero when any issue is found.

Examples:
  hrm_schema check
  hrm_schema check -o json")]
pub struct CheckCmd {}

impl CommandRunner for CheckCmd {
    fn run(self, _ctx: &CommandContext, format: OutputFormat) -> Result<String, Box<dyn Error>> {
        let scratch = MemoryBackend::new();
        let result = self.execute(&scratch)?;
        let output = result.format(format);
        if result.issues.is_empty() {
            Ok(output)
        } else {
            Err(format!("{}\n{} schema issue(s) found", output, result.issues.len()).into())
        }
    }
}
