//! Output formatting for down command results.

use crate::commands::down::execute::DownResult;
use crate::output::Outputable;

impl Outputable for DownResult {
    fn to_table(&self) -> String {
        let m = &self.migration;
        if self.dry_run {
            format!(
                "Would revert on {}:\n  → {} {} ({} statements)\n\nNo changes made (dry-run mode).\n",
                self.backend, m.version, m.name, m.statements
            )
        } else {
            format!(
                "Reverted on {}:\n  ✓ {} {} ({} statements)\n",
                self.backend, m.version, m.name, m.statements
            )
        }
    }
}
