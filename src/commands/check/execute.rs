use std::error::Error;

use serde::Serialize;

use super::CheckCmd;
use crate::commands::Execute;
use crate::db::schema::compilers::PostgresCompiler;
use crate::db::schema::migrations::{Migration, MIGRATIONS};
use crate::db::schema::statement::StatementKind;
use crate::db::schema::validate::{validate_migration, SchemaIssue};
use crate::db::DatabaseBackend;

/// Result of the check command execution
#[derive(Debug, Serialize)]
pub struct CheckResult {
    pub migrations: usize,
    pub tables: usize,
    pub foreign_keys: usize,
    pub issues: Vec<SchemaIssue>,
}

/// Validate `migrations` and, through `db`, replay each one forward and back.
pub fn check_migrations(
    migrations: &[Migration],
    db: &dyn DatabaseBackend,
) -> Result<CheckResult, Box<dyn Error>> {
    let mut issues = Vec::new();
    for migration in migrations {
        issues.extend(validate_migration(migration));
    }

    // Only replay a clean definition; a broken one would stop at the first error.
    if issues.is_empty() {
        db.apply(&[PostgresCompiler::compile(StatementKind::EnsureMigrationsTable)])?;
        for migration in migrations {
            db.apply(&migration.apply_plan())?;
        }
        for migration in migrations.iter().rev() {
            db.apply(&migration.revert_plan())?;
        }
    }

    Ok(CheckResult {
        migrations: migrations.len(),
        tables: migrations.iter().map(|m| m.tables.len()).sum(),
        foreign_keys: migrations.iter().map(|m| m.foreign_keys.len()).sum(),
        issues,
    })
}

impl Execute for CheckCmd {
    type Output = CheckResult;

    fn execute(self, db: &dyn DatabaseBackend) -> Result<Self::Output, Box<dyn Error>> {
        check_migrations(MIGRATIONS, db)
    }
}
