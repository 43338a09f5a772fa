//! Offline validation of the schema graph and of migration statement lists.
//!
//! Nothing here touches a database. The checks catch mistakes the engine would
//! only report halfway through a migration (a foreign key to a table created
//! later, an enum used but never declared) and mistakes it would never report
//! at all (a `down` that is not the mirror of `up`).

use std::collections::{BTreeSet, HashSet, VecDeque};

use serde::Serialize;

use crate::db::schema::definition::{ForeignKey, PrimaryKey, ReferentialAction, SchemaTable};
use crate::db::schema::migrations::Migration;
use crate::db::schema::statement::Statement;

/// PostgreSQL truncates identifiers longer than `NAMEDATALEN - 1` bytes.
pub const MAX_IDENTIFIER_LEN: usize = 63;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    UnknownTable,
    UnknownColumn,
    DuplicateColumn,
    ReferencedColumnNotKey,
    TypeMismatch,
    SetNullOnRequiredColumn,
    UndeclaredEnum,
    UnusedEnum,
    CreationOrder,
    PrimaryKey,
    MissingTimestamps,
    DuplicateName,
    NameTooLong,
    StatementOrder,
    DownNotMirror,
}

#[derive(Debug, Clone, Serialize)]
pub struct SchemaIssue {
    pub kind: IssueKind,
    /// Object the issue is about (table, column, constraint or statement)
    pub subject: String,
    pub message: String,
}

impl SchemaIssue {
    fn new(kind: IssueKind, subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            subject: subject.into(),
            message: message.into(),
        }
    }
}

/// Run every structural check over a migration's schema objects.
pub fn validate_migration(migration: &Migration) -> Vec<SchemaIssue> {
    let mut issues = Vec::new();
    check_tables(migration, &mut issues);
    check_enums(migration, &mut issues);
    check_indexes(migration, &mut issues);
    check_foreign_keys(migration, &mut issues);
    check_names(migration, &mut issues);
    issues.extend(validate_statement_order(
        &migration.up_statements(),
        &migration.down_statements(),
    ));
    issues
}

fn table_in<'a>(migration: &'a Migration, name: &str) -> Option<(usize, &'a SchemaTable)> {
    migration
        .tables
        .iter()
        .enumerate()
        .find(|(_, t)| t.name == name)
        .map(|(i, t)| (i, *t))
}

fn check_tables(migration: &Migration, issues: &mut Vec<SchemaIssue>) {
    for table in migration.tables {
        let mut seen = HashSet::new();
        for column in table.all_columns() {
            if !seen.insert(column.name) {
                issues.push(SchemaIssue::new(
                    IssueKind::DuplicateColumn,
                    format!("{}.{}", table.name, column.name),
                    "column declared twice",
                ));
            }
        }

        match table.primary_key {
            PrimaryKey::GeneratedUuid => {
                if table.column("createdAt").is_none() || table.column("updatedAt").is_none() {
                    issues.push(SchemaIssue::new(
                        IssueKind::MissingTimestamps,
                        table.name,
                        "entity table lacks createdAt/updatedAt",
                    ));
                }
            }
            PrimaryKey::Composite(columns) => {
                // Composite keys are reserved for pure join tables: every key
                // column is a foreign key and nothing else is stored.
                let fk_columns: Vec<&str> = migration
                    .foreign_keys
                    .iter()
                    .filter(|fk| fk.table == table.name)
                    .map(|fk| fk.column)
                    .collect();
                let pure_join = columns.len() >= 2
                    && table.columns.len() == columns.len()
                    && !table.audited
                    && columns.iter().all(|c| fk_columns.contains(c));
                if !pure_join {
                    issues.push(SchemaIssue::new(
                        IssueKind::PrimaryKey,
                        table.name,
                        "composite primary key on a table that is not a pure join table",
                    ));
                }
            }
        }

        for key in table.unique_keys.iter().copied().chain([table.primary_key_columns()]) {
            for column in key {
                if table.column(column).is_none() {
                    issues.push(SchemaIssue::new(
                        IssueKind::UnknownColumn,
                        format!("{}.{}", table.name, column),
                        "key column does not exist",
                    ));
                }
            }
        }
    }
}

fn check_enums(migration: &Migration, issues: &mut Vec<SchemaIssue>) {
    let declared: HashSet<&str> = migration.enums.iter().map(|e| e.name).collect();
    let mut used = HashSet::new();

    for table in migration.tables {
        for enum_type in table.enum_types() {
            used.insert(enum_type.name);
            if !declared.contains(enum_type.name) {
                issues.push(SchemaIssue::new(
                    IssueKind::UndeclaredEnum,
                    format!("{}: {}", table.name, enum_type.name),
                    "enum type used by a column but not created",
                ));
            }
        }
    }

    for enum_type in migration.enums {
        if !used.contains(enum_type.name) {
            issues.push(SchemaIssue::new(
                IssueKind::UnusedEnum,
                enum_type.name,
                "enum type created but no column uses it",
            ));
        }
    }
}

fn check_indexes(migration: &Migration, issues: &mut Vec<SchemaIssue>) {
    for index in migration.indexes {
        let Some((_, table)) = table_in(migration, index.table) else {
            issues.push(SchemaIssue::new(
                IssueKind::UnknownTable,
                index.name(),
                format!("index on unknown table '{}'", index.table),
            ));
            continue;
        };
        for column in index.columns {
            if table.column(column).is_none() {
                issues.push(SchemaIssue::new(
                    IssueKind::UnknownColumn,
                    index.name(),
                    format!("index column '{}.{}' does not exist", index.table, column),
                ));
            }
        }
    }
}

fn check_foreign_keys(migration: &Migration, issues: &mut Vec<SchemaIssue>) {
    for fk in migration.foreign_keys {
        let name = fk.constraint_name();
        let Some((child_pos, child)) = table_in(migration, fk.table) else {
            issues.push(SchemaIssue::new(
                IssueKind::UnknownTable,
                name,
                format!("foreign key on unknown table '{}'", fk.table),
            ));
            continue;
        };
        let Some((parent_pos, parent)) = table_in(migration, fk.references) else {
            issues.push(SchemaIssue::new(
                IssueKind::UnknownTable,
                name,
                format!("foreign key references unknown table '{}'", fk.references),
            ));
            continue;
        };

        let Some(column) = child.column(fk.column) else {
            issues.push(SchemaIssue::new(
                IssueKind::UnknownColumn,
                name,
                format!("column '{}.{}' does not exist", fk.table, fk.column),
            ));
            continue;
        };
        let Some(referenced) = parent.column(fk.referenced_column) else {
            issues.push(SchemaIssue::new(
                IssueKind::UnknownColumn,
                name,
                format!("column '{}.{}' does not exist", fk.references, fk.referenced_column),
            ));
            continue;
        };

        if !parent.is_key(&[fk.referenced_column]) {
            issues.push(SchemaIssue::new(
                IssueKind::ReferencedColumnNotKey,
                name.as_str(),
                format!(
                    "'{}.{}' is neither primary key nor unique",
                    fk.references, fk.referenced_column
                ),
            ));
        }
        if column.data_type != referenced.data_type {
            issues.push(SchemaIssue::new(
                IssueKind::TypeMismatch,
                name.as_str(),
                "column type differs from referenced column type",
            ));
        }
        if fk.on_delete == ReferentialAction::SetNull && !column.nullable {
            issues.push(SchemaIssue::new(
                IssueKind::SetNullOnRequiredColumn,
                name.as_str(),
                format!("ON DELETE SET NULL on NOT NULL column '{}'", fk.column),
            ));
        }
        if !fk.is_self_reference() && parent_pos > child_pos {
            issues.push(SchemaIssue::new(
                IssueKind::CreationOrder,
                name.as_str(),
                format!("'{}' is created after '{}' which references it", fk.references, fk.table),
            ));
        }
    }
}

fn check_names(migration: &Migration, issues: &mut Vec<SchemaIssue>) {
    let mut names: Vec<String> = Vec::new();
    for table in migration.tables {
        names.push(table.name.to_string());
        names.push(table.primary_key_name());
        names.extend(table.unique_keys.iter().map(|k| table.unique_key_name(k)));
    }
    names.extend(migration.enums.iter().map(|e| e.name.to_string()));
    names.extend(migration.indexes.iter().map(|i| i.name()));
    names.extend(migration.foreign_keys.iter().map(|fk| fk.constraint_name()));

    let mut seen = BTreeSet::new();
    for name in names {
        if name.len() > MAX_IDENTIFIER_LEN {
            issues.push(SchemaIssue::new(
                IssueKind::NameTooLong,
                name.clone(),
                format!("identifier exceeds {} bytes", MAX_IDENTIFIER_LEN),
            ));
        }
        if !seen.insert(name.clone()) {
            issues.push(SchemaIssue::new(IssueKind::DuplicateName, name, "identifier used twice"));
        }
    }
}

/// Check that `up` runs phases in order and `down` is its exact mirror.
pub fn validate_statement_order(up: &[Statement], down: &[Statement]) -> Vec<SchemaIssue> {
    let mut issues = Vec::new();

    for pair in up.windows(2) {
        if pair[1].kind.phase() < pair[0].kind.phase() {
            issues.push(SchemaIssue::new(
                IssueKind::StatementOrder,
                pair[1].kind.target(),
                format!("{:?} statement after {:?}", pair[1].kind.phase(), pair[0].kind.phase()),
            ));
        }
    }

    if up.len() != down.len() {
        issues.push(SchemaIssue::new(
            IssueKind::DownNotMirror,
            "down",
            format!("up has {} statements, down has {}", up.len(), down.len()),
        ));
        return issues;
    }

    for (u, d) in up.iter().rev().zip(down) {
        if !u.kind.is_inverse_of(&d.kind) {
            issues.push(SchemaIssue::new(
                IssueKind::DownNotMirror,
                d.kind.target(),
                format!("expected the inverse of: {}", u.sql),
            ));
        }
    }

    issues
}

/// Tables whose rows are deleted, directly or transitively, when a row of
/// `table` is deleted.
pub fn cascade_targets(foreign_keys: &[ForeignKey], table: &str) -> Vec<&'static str> {
    let mut reached: BTreeSet<&'static str> = BTreeSet::new();
    let mut queue: VecDeque<&str> = VecDeque::from([table]);

    while let Some(current) = queue.pop_front() {
        for fk in foreign_keys.iter().filter(|fk| fk.references == current) {
            if fk.on_delete == ReferentialAction::Cascade
                && fk.table != table
                && reached.insert(fk.table)
            {
                queue.push_back(fk.table);
            }
        }
    }

    reached.into_iter().collect()
}

/// Foreign keys that block deleting a referenced row (`NO ACTION`).
pub fn protecting_references<'a>(
    foreign_keys: &'a [ForeignKey],
    table: &str,
) -> Vec<&'a ForeignKey> {
    foreign_keys
        .iter()
        .filter(|fk| fk.references == table && fk.on_delete == ReferentialAction::NoAction)
        .collect()
}

/// Hierarchy links: foreign keys from a table to itself.
pub fn self_references(foreign_keys: &[ForeignKey]) -> Vec<&ForeignKey> {
    foreign_keys.iter().filter(|fk| fk.is_self_reference()).collect()
}
