//! In-memory catalog backend.
//!
//! Tracks which enum types, tables, indexes and foreign keys exist and which
//! migrations are recorded. It stores no rows. Every statement is checked
//! against the same dependency rules PostgreSQL enforces for DDL, and a batch
//! passed to `apply` is committed only if every statement in it succeeds.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use super::backend::{AppliedMigration, DatabaseBackend};
use super::schema::compilers::PostgresCompiler;
use super::schema::definition::{EnumType, ForeignKey, SchemaIndex, SchemaTable};
use super::schema::migrations::MIGRATIONS_TABLE;
use super::schema::statement::{Statement, StatementKind};
use super::DbError;

#[derive(Debug, Clone, Default)]
struct Catalog {
    enums: BTreeMap<&'static str, &'static EnumType>,
    tables: BTreeMap<&'static str, &'static SchemaTable>,
    indexes: BTreeMap<String, &'static SchemaIndex>,
    foreign_keys: BTreeMap<String, &'static ForeignKey>,
    /// `None` until the bookkeeping table is created
    migrations: Option<BTreeMap<i64, String>>,
}

impl Catalog {
    fn execute(&mut self, kind: StatementKind) -> Result<(), String> {
        match kind {
            StatementKind::CreateEnum(e) => {
                if self.enums.contains_key(e.name) {
                    return Err(format!("type \"{}\" already exists", e.name));
                }
                self.enums.insert(e.name, e);
            }
            StatementKind::DropEnum(e) => {
                if !self.enums.contains_key(e.name) {
                    return Err(format!("type \"{}\" does not exist", e.name));
                }
                if let Some(user) = self
                    .tables
                    .values()
                    .find(|t| t.enum_types().iter().any(|u| u.name == e.name))
                {
                    return Err(format!(
                        "cannot drop type \"{}\" because table \"{}\" depends on it",
                        e.name, user.name
                    ));
                }
                self.enums.remove(e.name);
            }
            StatementKind::CreateTable(t) => {
                if self.relation_exists(t.name) {
                    return Err(format!("relation \"{}\" already exists", t.name));
                }
                if let Some(missing) = t
                    .enum_types()
                    .into_iter()
                    .find(|e| !self.enums.contains_key(e.name))
                {
                    return Err(format!("type \"{}\" does not exist", missing.name));
                }
                self.tables.insert(t.name, t);
            }
            StatementKind::DropTable(t) => {
                if !self.tables.contains_key(t.name) {
                    return Err(format!("table \"{}\" does not exist", t.name));
                }
                if let Some(fk) = self
                    .foreign_keys
                    .values()
                    .find(|fk| fk.references == t.name && fk.table != t.name)
                {
                    return Err(format!(
                        "cannot drop table \"{}\" because constraint \"{}\" on table \"{}\" depends on it",
                        t.name,
                        fk.constraint_name(),
                        fk.table
                    ));
                }
                self.tables.remove(t.name);
                self.indexes.retain(|_, i| i.table != t.name);
                self.foreign_keys.retain(|_, fk| fk.table != t.name);
            }
            StatementKind::CreateIndex(i) => {
                let name = i.name();
                if self.indexes.contains_key(&name) {
                    return Err(format!("relation \"{}\" already exists", name));
                }
                let table = self
                    .tables
                    .get(i.table)
                    .ok_or_else(|| format!("relation \"{}\" does not exist", i.table))?;
                if let Some(column) = i.columns.iter().find(|c| table.column(c).is_none()) {
                    return Err(format!("column \"{}\" does not exist", column));
                }
                self.indexes.insert(name, i);
            }
            StatementKind::DropIndex(i) => {
                let name = i.name();
                if self.indexes.remove(&name).is_none() {
                    return Err(format!("index \"{}\" does not exist", name));
                }
            }
            StatementKind::AddForeignKey(fk) => {
                let name = fk.constraint_name();
                if self.foreign_keys.contains_key(&name) {
                    return Err(format!(
                        "constraint \"{}\" for relation \"{}\" already exists",
                        name, fk.table
                    ));
                }
                let child = self
                    .tables
                    .get(fk.table)
                    .ok_or_else(|| format!("relation \"{}\" does not exist", fk.table))?;
                let parent = self
                    .tables
                    .get(fk.references)
                    .ok_or_else(|| format!("relation \"{}\" does not exist", fk.references))?;
                if child.column(fk.column).is_none() {
                    return Err(format!("column \"{}\" does not exist", fk.column));
                }
                if !parent.is_key(&[fk.referenced_column]) {
                    return Err(format!(
                        "there is no unique constraint matching given keys for referenced table \"{}\"",
                        fk.references
                    ));
                }
                self.foreign_keys.insert(name, fk);
            }
            StatementKind::DropForeignKey(fk) => {
                let name = fk.constraint_name();
                if !self.tables.contains_key(fk.table) {
                    return Err(format!("relation \"{}\" does not exist", fk.table));
                }
                if self.foreign_keys.remove(&name).is_none() {
                    return Err(format!(
                        "constraint \"{}\" of relation \"{}\" does not exist",
                        name, fk.table
                    ));
                }
            }
            StatementKind::EnsureMigrationsTable => {
                if self.tables.contains_key(MIGRATIONS_TABLE) {
                    return Err(format!("relation \"{}\" already exists", MIGRATIONS_TABLE));
                }
                self.migrations.get_or_insert_with(BTreeMap::new);
            }
            StatementKind::RecordMigration { version, name } => {
                let rows = self.bookkeeping()?;
                if rows.contains_key(&version) {
                    return Err(format!(
                        "duplicate key value violates unique constraint: version {}",
                        version
                    ));
                }
                rows.insert(version, name.to_string());
            }
            StatementKind::ForgetMigration { version } => {
                self.bookkeeping()?.remove(&version);
            }
        }
        Ok(())
    }

    fn bookkeeping(&mut self) -> Result<&mut BTreeMap<i64, String>, String> {
        self.migrations
            .as_mut()
            .ok_or_else(|| format!("relation \"{}\" does not exist", MIGRATIONS_TABLE))
    }

    fn relation_exists(&self, name: &str) -> bool {
        self.tables.contains_key(name) || (name == MIGRATIONS_TABLE && self.migrations.is_some())
    }

    fn snapshot(&self) -> Vec<String> {
        let mut lines = BTreeSet::new();

        for e in self.enums.values() {
            lines.insert(format!("enum {}: {}", e.name, e.values.join(", ")));
        }
        for t in self.tables.values() {
            for column in t.all_columns() {
                lines.insert(format!(
                    "column {}.{}",
                    t.name,
                    PostgresCompiler::column_definition(column)
                ));
            }
            lines.insert(format!(
                "constraint {}.{} PRIMARY KEY ({})",
                t.name,
                t.primary_key_name(),
                t.primary_key_columns().join(", ")
            ));
            for key in t.unique_keys {
                lines.insert(format!(
                    "constraint {}.{} UNIQUE ({})",
                    t.name,
                    t.unique_key_name(key),
                    key.join(", ")
                ));
            }
        }
        for (name, i) in &self.indexes {
            lines.insert(format!("index {}.{} ({})", i.table, name, i.columns.join(", ")));
        }
        for (name, fk) in &self.foreign_keys {
            lines.insert(format!(
                "constraint {}.{} FOREIGN KEY ({}) REFERENCES {}({}) ON DELETE {} ON UPDATE {}",
                fk.table,
                name,
                fk.column,
                fk.references,
                fk.referenced_column,
                fk.on_delete.sql(),
                fk.on_update.sql()
            ));
        }

        lines.into_iter().collect()
    }
}

/// Catalog-only backend used for offline planning and tests.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    catalog: Mutex<Catalog>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_catalog<T>(&self, f: impl FnOnce(&mut Catalog) -> T) -> Result<T, DbError> {
        let mut catalog = self.catalog.lock().map_err(|e| DbError::TransactionFailed {
            message: format!("Failed to acquire catalog lock: {}", e),
        })?;
        Ok(f(&mut catalog))
    }
}

impl DatabaseBackend for MemoryBackend {
    fn backend_name(&self) -> &'static str {
        "Memory"
    }

    fn apply(&self, statements: &[Statement]) -> Result<(), DbError> {
        self.with_catalog(|catalog| -> Result<(), DbError> {
            let mut scratch = catalog.clone();
            for statement in statements {
                tracing::debug!("{}", statement.sql);
                scratch
                    .execute(statement.kind)
                    .map_err(|message| DbError::CatalogConflict {
                        statement: statement.sql.clone(),
                        message,
                    })?;
            }
            *catalog = scratch;
            Ok(())
        })?
    }

    fn applied_migrations(&self) -> Result<Vec<AppliedMigration>, DbError> {
        self.with_catalog(|catalog| -> Result<Vec<AppliedMigration>, DbError> {
            let rows = catalog.migrations.as_ref().ok_or_else(|| DbError::QueryFailed {
                message: format!("relation \"{}\" does not exist", MIGRATIONS_TABLE),
            })?;
            Ok(rows
                .iter()
                .map(|(version, name)| AppliedMigration {
                    version: *version,
                    name: name.clone(),
                    applied_at: None,
                })
                .collect())
        })?
    }

    fn relation_exists(&self, name: &str) -> Result<bool, DbError> {
        self.with_catalog(|catalog| catalog.relation_exists(name))
    }

    fn list_tables(&self) -> Result<Vec<String>, DbError> {
        self.with_catalog(|catalog| catalog.tables.keys().map(|t| t.to_string()).collect())
    }

    fn list_enum_types(&self) -> Result<Vec<String>, DbError> {
        self.with_catalog(|catalog| catalog.enums.keys().map(|e| e.to_string()).collect())
    }

    fn catalog_snapshot(&self) -> Result<Vec<String>, DbError> {
        self.with_catalog(|catalog| catalog.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::constraints::FOREIGN_KEYS;
    use crate::db::schema::enums::{EMPLOYEES_GENDER, USERS_STATUS};
    use crate::db::schema::tables::{EMPLOYEES, ROLES, USERS};
    use rstest::{fixture, rstest};

    fn stmt(kind: StatementKind) -> Statement {
        PostgresCompiler::compile(kind)
    }

    fn fk(table: &str, column: &str) -> &'static ForeignKey {
        FOREIGN_KEYS
            .iter()
            .find(|fk| fk.table == table && fk.column == column)
            .unwrap()
    }

    #[fixture]
    fn users_and_employees() -> MemoryBackend {
        let backend = MemoryBackend::new();
        backend
            .apply(&[
                stmt(StatementKind::CreateEnum(&USERS_STATUS)),
                stmt(StatementKind::CreateEnum(&EMPLOYEES_GENDER)),
                stmt(StatementKind::CreateTable(&USERS)),
                stmt(StatementKind::CreateTable(&EMPLOYEES)),
                stmt(StatementKind::AddForeignKey(fk("employees", "userId"))),
            ])
            .unwrap();
        backend
    }

    #[rstest]
    fn test_table_requires_its_enum() {
        let backend = MemoryBackend::new();
        let err = backend.apply(&[stmt(StatementKind::CreateTable(&USERS))]).unwrap_err();
        assert!(matches!(err, DbError::CatalogConflict { .. }));
        assert!(err.to_string().contains("users_status_enum"));
    }

    #[rstest]
    fn test_failed_batch_leaves_catalog_untouched() {
        let backend = MemoryBackend::new();
        let result = backend.apply(&[
            stmt(StatementKind::CreateTable(&ROLES)),
            stmt(StatementKind::CreateTable(&USERS)),
        ]);
        assert!(result.is_err());
        assert!(backend.list_tables().unwrap().is_empty());
    }

    #[rstest]
    fn test_duplicate_create_fails() {
        let backend = MemoryBackend::new();
        let result = backend.apply(&[
            stmt(StatementKind::CreateTable(&ROLES)),
            stmt(StatementKind::CreateTable(&ROLES)),
        ]);
        assert!(result.is_err());
    }

    #[rstest]
    fn test_drop_referenced_table_fails(users_and_employees: MemoryBackend) {
        let err = users_and_employees
            .apply(&[stmt(StatementKind::DropTable(&USERS))])
            .unwrap_err();
        assert!(err.to_string().contains("fk_employees_userid"));
    }

    #[rstest]
    fn test_drop_enum_in_use_fails(users_and_employees: MemoryBackend) {
        let result = users_and_employees.apply(&[stmt(StatementKind::DropEnum(&USERS_STATUS))]);
        assert!(result.is_err());
    }

    #[rstest]
    fn test_drop_table_removes_its_constraints(users_and_employees: MemoryBackend) {
        users_and_employees
            .apply(&[
                stmt(StatementKind::DropTable(&EMPLOYEES)),
                stmt(StatementKind::DropTable(&USERS)),
            ])
            .unwrap();
        let snapshot = users_and_employees.catalog_snapshot().unwrap();
        assert!(snapshot.iter().all(|line| line.starts_with("enum ")));
    }

    #[rstest]
    fn test_foreign_key_needs_both_tables() {
        let backend = MemoryBackend::new();
        backend
            .apply(&[
                stmt(StatementKind::CreateEnum(&EMPLOYEES_GENDER)),
                stmt(StatementKind::CreateTable(&EMPLOYEES)),
            ])
            .unwrap();
        let err = backend
            .apply(&[stmt(StatementKind::AddForeignKey(fk("employees", "userId")))])
            .unwrap_err();
        assert!(err.to_string().contains("\"users\" does not exist"));
    }

    #[rstest]
    fn test_bookkeeping_rows() {
        let backend = MemoryBackend::new();
        assert!(!backend.relation_exists(MIGRATIONS_TABLE).unwrap());
        assert!(backend.applied_migrations().is_err());

        backend
            .apply(&[
                stmt(StatementKind::EnsureMigrationsTable),
                stmt(StatementKind::EnsureMigrationsTable),
                stmt(StatementKind::RecordMigration { version: 7, name: "seven" }),
            ])
            .unwrap();
        assert!(backend.relation_exists(MIGRATIONS_TABLE).unwrap());

        let applied = backend.applied_migrations().unwrap();
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].name, "seven");

        let dup = backend.apply(&[stmt(StatementKind::RecordMigration { version: 7, name: "again" })]);
        assert!(dup.is_err());
    }

    #[rstest]
    fn test_bookkeeping_table_excluded_from_listing() {
        let backend = MemoryBackend::new();
        backend.apply(&[stmt(StatementKind::EnsureMigrationsTable)]).unwrap();
        assert!(backend.list_tables().unwrap().is_empty());
    }
}
