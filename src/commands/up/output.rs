//! Output formatting for up command results.

use crate::commands::up::execute::UpResult;
use crate::output::Outputable;

impl Outputable for UpResult {
    fn to_table(&self) -> String {
        let mut output = String::new();

        if self.dry_run {
            output.push_str(&format!("Pending migrations on {} (dry-run):\n", self.backend));
        } else {
            output.push_str(&format!("Migrations on {}:\n", self.backend));
        }

        if self.migrations.is_empty() {
            output.push_str("  Schema is up to date.\n");
            return output;
        }

        let symbol = if self.dry_run { "→" } else { "✓" };
        for m in &self.migrations {
            output.push_str(&format!(
                "  {} {} {} ({} statements)\n",
                symbol, m.version, m.name, m.statements
            ));
        }

        if self.dry_run {
            output.push_str("\nNo changes made (dry-run mode).\n");
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::migrations::{Direction, MigrationOutcome};
    use rstest::{fixture, rstest};

    #[fixture]
    fn applied() -> UpResult {
        UpResult {
            backend: "Postgres".to_string(),
            dry_run: false,
            migrations: vec![MigrationOutcome {
                version: 20240315093000,
                name: "initial_schema".to_string(),
                direction: Direction::Up,
                statements: 84,
            }],
        }
    }

    #[fixture]
    fn up_to_date() -> UpResult {
        UpResult {
            backend: "Postgres".to_string(),
            dry_run: false,
            migrations: vec![],
        }
    }

    crate::output_table_contains_test! {
        test_name: test_to_table_applied,
        fixture: applied,
        fixture_type: UpResult,
        contains: ["Migrations on Postgres", "✓ 20240315093000 initial_schema (84 statements)"],
    }

    crate::output_table_contains_test! {
        test_name: test_to_table_up_to_date,
        fixture: up_to_date,
        fixture_type: UpResult,
        contains: ["Schema is up to date."],
    }

    crate::output_json_test! {
        test_name: test_format_json,
        fixture: applied,
        fixture_type: UpResult,
        assertions: {
            "dry_run": false,
            "backend": "Postgres",
        },
    }

    crate::output_toon_test! {
        test_name: test_format_toon,
        fixture: applied,
        fixture_type: UpResult,
        contains: ["initial_schema"],
    }
}
