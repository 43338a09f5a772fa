//! Output formatting for plan command results.

use crate::commands::plan::execute::PlanResult;
use crate::db::schema::migrations::Direction;
use crate::output::Outputable;

impl Outputable for PlanResult {
    /// Emits a runnable SQL script.
    fn to_table(&self) -> String {
        let direction = match self.direction {
            Direction::Up => "up",
            Direction::Down => "down",
        };
        let mut output = format!(
            "-- hrm_schema plan ({}): {} statements\n",
            direction,
            self.statements.len()
        );

        let mut current = None;
        for s in &self.statements {
            if s.migration != 0 && current != Some(s.migration) {
                output.push_str(&format!("\n-- migration {}\n", s.migration));
                current = Some(s.migration);
            }
            output.push('\n');
            output.push_str(&s.sql);
            output.push_str(";\n");
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::plan::execute::PlannedStatement;
    use crate::db::schema::statement::Phase;
    use rstest::{fixture, rstest};

    #[fixture]
    fn small_plan() -> PlanResult {
        PlanResult {
            direction: Direction::Down,
            statements: vec![
                PlannedStatement {
                    migration: 20240315093000,
                    phase: Phase::ForeignKeys,
                    target: "fk_permissions_roleid".to_string(),
                    sql: r#"ALTER TABLE "permissions" DROP CONSTRAINT "fk_permissions_roleid""#
                        .to_string(),
                },
                PlannedStatement {
                    migration: 20240315093000,
                    phase: Phase::Tables,
                    target: "roles".to_string(),
                    sql: r#"DROP TABLE "roles""#.to_string(),
                },
            ],
        }
    }

    crate::output_table_test! {
        test_name: test_to_table_is_sql_script,
        fixture: small_plan,
        fixture_type: PlanResult,
        expected: "-- hrm_schema plan (down): 2 statements\n\
                   \n-- migration 20240315093000\n\
                   \nALTER TABLE \"permissions\" DROP CONSTRAINT \"fk_permissions_roleid\";\n\
                   \nDROP TABLE \"roles\";\n",
    }

    crate::output_json_test! {
        test_name: test_format_json,
        fixture: small_plan,
        fixture_type: PlanResult,
        assertions: {
            "direction": "down",
        },
    }

    #[rstest]
    fn test_json_phases(small_plan: PlanResult) {
        use crate::output::OutputFormat;
        let parsed: serde_json::Value =
            serde_json::from_str(&small_plan.format(OutputFormat::Json)).unwrap();
        assert_eq!(parsed["statements"][0]["phase"], "foreign_keys");
        assert_eq!(parsed["statements"][1]["target"], "roles");
    }
}
