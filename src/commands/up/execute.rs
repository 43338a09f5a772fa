use std::error::Error;

use serde::Serialize;

use super::UpCmd;
use crate::commands::Execute;
use crate::db::schema::migrations::{
    applied_migrations, pending_migrations, run_migrations, Direction, MigrationOutcome,
};
use crate::db::DatabaseBackend;

/// Result of the up command execution
#[derive(Debug, Serialize)]
pub struct UpResult {
    pub backend: String,
    pub dry_run: bool,
    /// Migrations applied (or, in dry-run mode, that would be)
    pub migrations: Vec<MigrationOutcome>,
}

impl Execute for UpCmd {
    type Output = UpResult;

    fn execute(self, db: &dyn DatabaseBackend) -> Result<Self::Output, Box<dyn Error>> {
        let migrations = if self.dry_run {
            let applied = applied_migrations(db)?;
            pending_migrations(&applied)
                .into_iter()
                .map(|m| MigrationOutcome {
                    version: m.version,
                    name: m.name.to_string(),
                    direction: Direction::Up,
                    statements: m.apply_plan().len(),
                })
                .collect()
        } else {
            run_migrations(db)?
        };

        Ok(UpResult {
            backend: db.backend_name().to_string(),
            dry_run: self.dry_run,
            migrations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryBackend;
    use rstest::{fixture, rstest};

    #[fixture]
    fn db() -> MemoryBackend {
        MemoryBackend::new()
    }

    #[rstest]
    fn test_up_applies_initial_schema(db: MemoryBackend) {
        let result = UpCmd { dry_run: false }.execute(&db).unwrap();
        assert_eq!(result.migrations.len(), 1);
        assert_eq!(result.migrations[0].name, "initial_schema");
        assert_eq!(db.list_tables().unwrap().len(), 27);
    }

    #[rstest]
    fn test_up_twice_is_noop(db: MemoryBackend) {
        UpCmd { dry_run: false }.execute(&db).unwrap();
        let second = UpCmd { dry_run: false }.execute(&db).unwrap();
        assert!(second.migrations.is_empty());
    }

    #[rstest]
    fn test_dry_run_changes_nothing(db: MemoryBackend) {
        let result = UpCmd { dry_run: true }.execute(&db).unwrap();
        assert!(result.dry_run);
        assert_eq!(result.migrations.len(), 1);
        assert!(result.migrations[0].statements > 27);
        assert!(db.list_tables().unwrap().is_empty());
        assert!(db.catalog_snapshot().unwrap().is_empty());
    }
}
