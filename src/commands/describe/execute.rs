use serde::Serialize;
use std::error::Error;

use super::DescribeCmd;
use crate::commands::Execute;
use crate::db::schema::compilers::PostgresCompiler;
use crate::db::schema::constraints::{foreign_keys_of, foreign_keys_to, FOREIGN_KEYS, INDEXES};
use crate::db::schema::definition::{ForeignKey, ReferentialAction, SchemaTable};
use crate::db::schema::tables::{find_table, ALL_TABLES};
use crate::db::schema::validate::{cascade_targets, protecting_references};
use crate::db::DatabaseBackend;

/// One row of the table listing
#[derive(Debug, Clone, Serialize)]
pub struct TableSummary {
    pub name: String,
    pub columns: usize,
    pub primary_key: Vec<String>,
    pub references: usize,
    pub referenced_by: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub sql_type: String,
    pub nullable: bool,
    pub default: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForeignKeyInfo {
    pub constraint: String,
    pub table: String,
    pub column: String,
    pub references: String,
    pub referenced_column: String,
    pub on_delete: ReferentialAction,
}

impl From<&ForeignKey> for ForeignKeyInfo {
    fn from(fk: &ForeignKey) -> Self {
        Self {
            constraint: fk.constraint_name(),
            table: fk.table.to_string(),
            column: fk.column.to_string(),
            references: fk.references.to_string(),
            referenced_column: fk.referenced_column.to_string(),
            on_delete: fk.on_delete,
        }
    }
}

/// Full description of one table
#[derive(Debug, Clone, Serialize)]
pub struct TableDescription {
    pub name: String,
    pub primary_key: Vec<String>,
    pub columns: Vec<ColumnInfo>,
    pub unique_keys: Vec<Vec<String>>,
    pub indexes: Vec<String>,
    pub references: Vec<ForeignKeyInfo>,
    pub referenced_by: Vec<ForeignKeyInfo>,
    /// Tables whose rows go when a row of this table is deleted
    pub cascades_to: Vec<String>,
    /// References that make deleting a referenced row fail
    pub blocked_by: Vec<ForeignKeyInfo>,
}

/// Output for describe mode
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum DescribeMode {
    ListAll { tables: Vec<TableSummary> },
    Specific { table: TableDescription },
}

/// Result of the describe command
#[derive(Debug, Serialize)]
pub struct DescribeResult {
    #[serde(flatten)]
    pub mode: DescribeMode,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn summarize(table: &SchemaTable) -> TableSummary {
    TableSummary {
        name: table.name.to_string(),
        columns: table.all_columns().count(),
        primary_key: strings(table.primary_key_columns()),
        references: foreign_keys_of(table.name).count(),
        referenced_by: foreign_keys_to(table.name).count(),
    }
}

fn describe(table: &SchemaTable) -> TableDescription {
    TableDescription {
        name: table.name.to_string(),
        primary_key: strings(table.primary_key_columns()),
        columns: table
            .all_columns()
            .map(|c| ColumnInfo {
                name: c.name.to_string(),
                sql_type: PostgresCompiler::column_type(&c.data_type),
                nullable: c.nullable,
                default: c.default.as_ref().map(PostgresCompiler::default_expr),
            })
            .collect(),
        unique_keys: table.unique_keys.iter().map(|k| strings(k)).collect(),
        indexes: INDEXES
            .iter()
            .filter(|i| i.table == table.name)
            .map(|i| i.name())
            .collect(),
        references: foreign_keys_of(table.name).map(ForeignKeyInfo::from).collect(),
        referenced_by: foreign_keys_to(table.name).map(ForeignKeyInfo::from).collect(),
        cascades_to: cascade_targets(FOREIGN_KEYS, table.name)
            .into_iter()
            .map(str::to_string)
            .collect(),
        blocked_by: protecting_references(FOREIGN_KEYS, table.name)
            .into_iter()
            .map(ForeignKeyInfo::from)
            .collect(),
    }
}

impl Execute for DescribeCmd {
    type Output = DescribeResult;

    fn execute(self, _db: &dyn DatabaseBackend) -> Result<Self::Output, Box<dyn Error>> {
        let mode = match self.table {
            None => DescribeMode::ListAll {
                tables: ALL_TABLES.iter().map(|t| summarize(t)).collect(),
            },
            Some(name) => {
                let table = find_table(&name).ok_or_else(|| format!("Unknown table: '{}'", name))?;
                DescribeMode::Specific {
                    table: describe(table),
                }
            }
        };
        Ok(DescribeResult { mode })
    }
}
