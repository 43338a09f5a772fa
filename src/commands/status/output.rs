//! Output formatting for status command results.

use crate::commands::status::execute::StatusResult;
use crate::output::{render_columns, Outputable};

impl Outputable for StatusResult {
    fn to_table(&self) -> String {
        let rows: Vec<Vec<String>> = self
            .migrations
            .iter()
            .map(|m| {
                let state = match (m.applied, m.known) {
                    (true, true) => "applied",
                    (true, false) => "applied (unknown)",
                    (false, _) => "pending",
                };
                vec![
                    m.version.to_string(),
                    m.name.clone(),
                    state.to_string(),
                    m.applied_at.clone().unwrap_or_default(),
                ]
            })
            .collect();

        format!(
            "Migration status ({})\n\n{}\n\n{} pending; {} tables, {} enum types\n",
            self.backend,
            render_columns(&["version", "name", "state", "applied at"], &rows),
            self.pending(),
            self.tables,
            self.enum_types
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::migrations::MigrationState;
    use rstest::{fixture, rstest};

    #[fixture]
    fn mixed() -> StatusResult {
        StatusResult {
            backend: "Postgres".to_string(),
            migrations: vec![
                MigrationState {
                    version: 20240315093000,
                    name: "initial_schema".to_string(),
                    applied: true,
                    applied_at: Some("2024-03-15 09:30:00".to_string()),
                    known: true,
                },
                MigrationState {
                    version: 20990101000000,
                    name: "from_elsewhere".to_string(),
                    applied: true,
                    applied_at: None,
                    known: false,
                },
            ],
            tables: 27,
            enum_types: 12,
        }
    }

    crate::output_table_contains_test! {
        test_name: test_to_table,
        fixture: mixed,
        fixture_type: StatusResult,
        contains: [
            "Migration status (Postgres)",
            "initial_schema",
            "2024-03-15 09:30:00",
            "applied (unknown)",
            "0 pending; 27 tables, 12 enum types",
        ],
    }

    crate::output_json_test! {
        test_name: test_format_json,
        fixture: mixed,
        fixture_type: StatusResult,
        assertions: {
            "tables": 27,
            "enum_types": 12,
        },
    }
}
