//! Output formatting for describe command results.

use crate::commands::describe::execute::{DescribeMode, DescribeResult, ForeignKeyInfo};
use crate::output::{render_columns, Outputable};

fn fk_line(fk: &ForeignKeyInfo) -> String {
    format!(
        "{}.{} -> {}.{} ON DELETE {}",
        fk.table,
        fk.column,
        fk.references,
        fk.referenced_column,
        fk.on_delete.sql()
    )
}

impl Outputable for DescribeResult {
    fn to_table(&self) -> String {
        match &self.mode {
            DescribeMode::ListAll { tables } => {
                let rows: Vec<Vec<String>> = tables
                    .iter()
                    .map(|t| {
                        vec![
                            t.name.clone(),
                            t.columns.to_string(),
                            t.primary_key.join(", "),
                            t.references.to_string(),
                            t.referenced_by.to_string(),
                        ]
                    })
                    .collect();
                format!(
                    "{} tables\n\n{}\n",
                    tables.len(),
                    render_columns(&["table", "columns", "primary key", "refs", "referenced by"], &rows)
                )
            }
            DescribeMode::Specific { table } => {
                let rows: Vec<Vec<String>> = table
                    .columns
                    .iter()
                    .map(|c| {
                        vec![
                            c.name.clone(),
                            c.sql_type.clone(),
                            if c.nullable { "null" } else { "not null" }.to_string(),
                            c.default.clone().unwrap_or_default(),
                        ]
                    })
                    .collect();

                let mut output = format!(
                    "Table {}\n\n{}\n\nPrimary key: ({})\n",
                    table.name,
                    render_columns(&["column", "type", "nullable", "default"], &rows),
                    table.primary_key.join(", ")
                );
                for key in &table.unique_keys {
                    output.push_str(&format!("Unique: ({})\n", key.join(", ")));
                }
                for index in &table.indexes {
                    output.push_str(&format!("Index: {}\n", index));
                }
                if !table.references.is_empty() {
                    output.push_str("\nReferences:\n");
                    for fk in &table.references {
                        output.push_str(&format!("  {}\n", fk_line(fk)));
                    }
                }
                if !table.referenced_by.is_empty() {
                    output.push_str("\nReferenced by:\n");
                    for fk in &table.referenced_by {
                        output.push_str(&format!("  {}\n", fk_line(fk)));
                    }
                }
                if !table.cascades_to.is_empty() {
                    output.push_str(&format!(
                        "\nDeleting a row also deletes from: {}\n",
                        table.cascades_to.join(", ")
                    ));
                }
                if !table.blocked_by.is_empty() {
                    output.push_str("\nDelete blocked while referenced by:\n");
                    for fk in &table.blocked_by {
                        output.push_str(&format!("  {}.{}\n", fk.table, fk.column));
                    }
                }
                output
            }
        }
    }
}
