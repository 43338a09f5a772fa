//! Database migration system for schema versioning and management.
//!
//! - Tracks applied versions in the `migrations` bookkeeping table
//! - Applies each pending migration as one transaction (statements + bookkeeping row)
//! - Reverts the most recent migration with the exact mirror statement list
//! - Running `up` again once everything is applied is a no-op

use serde::Serialize;

use crate::db::backend::{AppliedMigration, DatabaseBackend};
use crate::db::schema::compilers::PostgresCompiler;
use crate::db::schema::constraints::{FOREIGN_KEYS, INDEXES};
use crate::db::schema::definition::{EnumType, ForeignKey, SchemaIndex, SchemaTable};
use crate::db::schema::enums::ALL_ENUMS;
use crate::db::schema::statement::{Statement, StatementKind};
use crate::db::schema::tables::ALL_TABLES;
use crate::db::DbError;

/// Name of the bookkeeping table.
pub const MIGRATIONS_TABLE: &str = "migrations";

/// A single migration: the schema objects it creates, in creation order.
///
/// `up` creates enum types, tables, indexes, then foreign keys. `down` is the
/// exact mirror.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    /// Migration version (timestamp-style, strictly increasing)
    pub version: i64,
    /// Human-readable name of this migration
    pub name: &'static str,
    pub enums: &'static [&'static EnumType],
    /// Tables, parents before children
    pub tables: &'static [&'static SchemaTable],
    pub indexes: &'static [SchemaIndex],
    pub foreign_keys: &'static [ForeignKey],
}

impl Migration {
    /// Ordered statements transitioning the schema forward.
    pub fn up_statements(&self) -> Vec<Statement> {
        let (enums, tables, indexes, foreign_keys) =
            (self.enums, self.tables, self.indexes, self.foreign_keys);

        enums
            .iter()
            .map(|e| StatementKind::CreateEnum(e))
            .chain(tables.iter().map(|t| StatementKind::CreateTable(t)))
            .chain(indexes.iter().map(StatementKind::CreateIndex))
            .chain(foreign_keys.iter().map(StatementKind::AddForeignKey))
            .map(PostgresCompiler::compile)
            .collect()
    }

    /// Ordered statements undoing `up_statements`, children first.
    pub fn down_statements(&self) -> Vec<Statement> {
        let (enums, tables, indexes, foreign_keys) =
            (self.enums, self.tables, self.indexes, self.foreign_keys);

        foreign_keys
            .iter()
            .rev()
            .map(StatementKind::DropForeignKey)
            .chain(indexes.iter().rev().map(StatementKind::DropIndex))
            .chain(tables.iter().rev().map(|t| StatementKind::DropTable(t)))
            .chain(enums.iter().rev().map(|e| StatementKind::DropEnum(e)))
            .map(PostgresCompiler::compile)
            .collect()
    }

    /// `up_statements` plus the bookkeeping insert: one transaction.
    pub fn apply_plan(&self) -> Vec<Statement> {
        let mut statements = self.up_statements();
        statements.push(PostgresCompiler::compile(StatementKind::RecordMigration {
            version: self.version,
            name: self.name,
        }));
        statements
    }

    /// `down_statements` plus the bookkeeping delete: one transaction.
    pub fn revert_plan(&self) -> Vec<Statement> {
        let mut statements = self.down_statements();
        statements.push(PostgresCompiler::compile(StatementKind::ForgetMigration {
            version: self.version,
        }));
        statements
    }
}

/// All available migrations, ordered by version.
///
/// Currently contains the single initial migration that creates the whole
/// HR schema.
pub const MIGRATIONS: &[Migration] = &[Migration {
    version: 20240315093000,
    name: "initial_schema",
    enums: ALL_ENUMS,
    tables: ALL_TABLES,
    indexes: INDEXES,
    foreign_keys: FOREIGN_KEYS,
}];

/// Look up a known migration by version.
pub fn find_migration(version: i64) -> Option<&'static Migration> {
    MIGRATIONS.iter().find(|m| m.version == version)
}

/// Migrations not yet recorded in `applied`, in version order.
pub fn pending_migrations(applied: &[AppliedMigration]) -> Vec<&'static Migration> {
    MIGRATIONS
        .iter()
        .filter(|m| !applied.iter().any(|a| a.version == m.version))
        .collect()
}

/// Direction a migration was run in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Up,
    Down,
}

/// Result of applying or reverting one migration.
#[derive(Debug, Clone, Serialize)]
pub struct MigrationOutcome {
    pub version: i64,
    pub name: String,
    pub direction: Direction,
    pub statements: usize,
}

/// Applied/pending state of one migration.
#[derive(Debug, Clone, Serialize)]
pub struct MigrationState {
    pub version: i64,
    pub name: String,
    pub applied: bool,
    pub applied_at: Option<String>,
    /// False when the database records a version this binary does not know
    pub known: bool,
}

/// Read applied migrations, creating nothing. Missing bookkeeping means none.
pub fn applied_migrations(backend: &dyn DatabaseBackend) -> Result<Vec<AppliedMigration>, DbError> {
    if !backend.relation_exists(MIGRATIONS_TABLE)? {
        return Ok(Vec::new());
    }
    backend.applied_migrations()
}

/// Run all pending migrations.
///
/// First performs backend setup and ensures the bookkeeping table exists,
/// then applies every migration not yet recorded, in version order. Each
/// migration's statements and its bookkeeping insert run in one transaction;
/// the first failure aborts that transaction and is returned.
pub fn run_migrations(backend: &dyn DatabaseBackend) -> Result<Vec<MigrationOutcome>, DbError> {
    backend.setup_backend()?;
    backend.apply(&[PostgresCompiler::compile(StatementKind::EnsureMigrationsTable)])?;

    let applied = backend.applied_migrations()?;
    let pending = pending_migrations(&applied);

    if pending.is_empty() {
        tracing::info!("Schema is up to date ({} migration(s) applied)", applied.len());
    }

    let mut outcomes = Vec::new();
    for migration in pending {
        let statements = migration.apply_plan();

        tracing::info!(
            "Applying migration {} ({}): {} statement(s)",
            migration.version,
            migration.name,
            statements.len()
        );
        backend.apply(&statements)?;

        outcomes.push(MigrationOutcome {
            version: migration.version,
            name: migration.name.to_string(),
            direction: Direction::Up,
            statements: statements.len(),
        });
    }

    Ok(outcomes)
}

/// Revert the most recently applied migration.
///
/// # Errors
/// See `migration_to_revert`.
pub fn revert_last_migration(backend: &dyn DatabaseBackend) -> Result<MigrationOutcome, DbError> {
    let migration = migration_to_revert(backend)?;
    let statements = migration.revert_plan();

    tracing::info!(
        "Reverting migration {} ({}): {} statement(s)",
        migration.version,
        migration.name,
        statements.len()
    );
    backend.apply(&statements)?;

    Ok(MigrationOutcome {
        version: migration.version,
        name: migration.name.to_string(),
        direction: Direction::Down,
        statements: statements.len(),
    })
}

/// The most recently applied migration, which `down` would revert.
///
/// # Errors
/// - `NothingToRevert` when no migration is recorded
/// - `UnknownMigration` when the latest recorded version is not known to this binary
pub fn migration_to_revert(backend: &dyn DatabaseBackend) -> Result<&'static Migration, DbError> {
    let applied = applied_migrations(backend)?;
    let last = applied
        .iter()
        .max_by_key(|m| m.version)
        .ok_or(DbError::NothingToRevert)?;
    find_migration(last.version).ok_or(DbError::UnknownMigration {
        version: last.version,
    })
}

/// Applied/pending state of every known migration, plus any recorded
/// version this binary does not know.
pub fn migration_status(backend: &dyn DatabaseBackend) -> Result<Vec<MigrationState>, DbError> {
    let applied = applied_migrations(backend)?;

    let mut states: Vec<MigrationState> = MIGRATIONS
        .iter()
        .map(|m| {
            let record = applied.iter().find(|a| a.version == m.version);
            MigrationState {
                version: m.version,
                name: m.name.to_string(),
                applied: record.is_some(),
                applied_at: record.and_then(|a| a.applied_at.clone()),
                known: true,
            }
        })
        .collect();

    for record in applied.iter().filter(|a| find_migration(a.version).is_none()) {
        tracing::warn!("Database records unknown migration {}", record.version);
        states.push(MigrationState {
            version: record.version,
            name: record.name.clone(),
            applied: true,
            applied_at: record.applied_at.clone(),
            known: false,
        });
    }

    states.sort_by_key(|s| s.version);
    Ok(states)
}
