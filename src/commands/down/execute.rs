use std::error::Error;

use serde::Serialize;

use super::DownCmd;
use crate::commands::Execute;
use crate::db::schema::migrations::{
    migration_to_revert, revert_last_migration, Direction, MigrationOutcome,
};
use crate::db::DatabaseBackend;

/// Result of the down command execution
#[derive(Debug, Serialize)]
pub struct DownResult {
    pub backend: String,
    pub dry_run: bool,
    pub migration: MigrationOutcome,
}

impl Execute for DownCmd {
    type Output = DownResult;

    fn execute(self, db: &dyn DatabaseBackend) -> Result<Self::Output, Box<dyn Error>> {
        let migration = if self.dry_run {
            let m = migration_to_revert(db)?;
            MigrationOutcome {
                version: m.version,
                name: m.name.to_string(),
                direction: Direction::Down,
                statements: m.revert_plan().len(),
            }
        } else {
            revert_last_migration(db)?
        };

        Ok(DownResult {
            backend: db.backend_name().to_string(),
            dry_run: self.dry_run,
            migration,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::migrations::run_migrations;
    use crate::db::MemoryBackend;
    use rstest::{fixture, rstest};

    #[fixture]
    fn migrated() -> MemoryBackend {
        let db = MemoryBackend::new();
        run_migrations(&db).unwrap();
        db
    }

    #[rstest]
    fn test_down_reverts_everything(migrated: MemoryBackend) {
        let result = DownCmd { dry_run: false }.execute(&migrated).unwrap();
        assert_eq!(result.migration.direction, Direction::Down);
        assert!(migrated.list_tables().unwrap().is_empty());
        assert!(migrated.list_enum_types().unwrap().is_empty());
    }

    #[rstest]
    fn test_dry_run_keeps_schema(migrated: MemoryBackend) {
        let result = DownCmd { dry_run: true }.execute(&migrated).unwrap();
        assert_eq!(result.migration.name, "initial_schema");
        assert_eq!(migrated.list_tables().unwrap().len(), 27);
    }

    #[rstest]
    fn test_down_on_empty_database_fails() {
        let db = MemoryBackend::new();
        let err = DownCmd { dry_run: false }.execute(&db).unwrap_err();
        assert!(err.to_string().contains("Nothing to revert"));
    }
}
