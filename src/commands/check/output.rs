//! Output formatting for check command results.

use crate::commands::check::execute::CheckResult;
use crate::output::Outputable;

impl Outputable for CheckResult {
    fn to_table(&self) -> String {
        let mut output = format!(
            "Schema check: {} migration(s), {} tables, {} foreign keys\n\n",
            self.migrations, self.tables, self.foreign_keys
        );

        if self.issues.is_empty() {
            output.push_str("✓ No issues found.\n");
            return output;
        }

        for issue in &self.issues {
            output.push_str(&format!("  ✗ {}: {}\n", issue.subject, issue.message));
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::validate::{IssueKind, SchemaIssue};
    use rstest::{fixture, rstest};

    #[fixture]
    fn clean() -> CheckResult {
        CheckResult {
            migrations: 1,
            tables: 27,
            foreign_keys: 34,
            issues: vec![],
        }
    }

    #[fixture]
    fn failing() -> CheckResult {
        CheckResult {
            migrations: 1,
            tables: 27,
            foreign_keys: 34,
            issues: vec![SchemaIssue {
                kind: IssueKind::UnknownTable,
                subject: "fk_users_teamid".to_string(),
                message: "foreign key references unknown table 'teams'".to_string(),
            }],
        }
    }

    crate::output_table_contains_test! {
        test_name: test_to_table_clean,
        fixture: clean,
        fixture_type: CheckResult,
        contains: ["1 migration(s), 27 tables, 34 foreign keys", "No issues found."],
    }

    crate::output_table_contains_test! {
        test_name: test_to_table_failing,
        fixture: failing,
        fixture_type: CheckResult,
        contains: ["✗ fk_users_teamid: foreign key references unknown table 'teams'"],
    }

    crate::output_json_test! {
        test_name: test_format_json_issue_kind,
        fixture: failing,
        fixture_type: CheckResult,
        assertions: {
            "tables": 27,
        },
    }

    #[rstest]
    fn test_json_issue_kind_snake_case(failing: CheckResult) {
        use crate::output::OutputFormat;
        let parsed: serde_json::Value =
            serde_json::from_str(&failing.format(OutputFormat::Json)).unwrap();
        assert_eq!(parsed["issues"][0]["kind"], "unknown_table");
    }
}
