use std::error::Error;

use serde::Serialize;

use super::StatusCmd;
use crate::commands::Execute;
use crate::db::schema::migrations::{migration_status, MigrationState};
use crate::db::DatabaseBackend;

/// Result of the status command execution
#[derive(Debug, Serialize)]
pub struct StatusResult {
    pub backend: String,
    pub migrations: Vec<MigrationState>,
    /// User tables present, bookkeeping table excluded
    pub tables: usize,
    pub enum_types: usize,
}

impl StatusResult {
    pub fn pending(&self) -> usize {
        self.migrations.iter().filter(|m| !m.applied).count()
    }
}

impl Execute for StatusCmd {
    type Output = StatusResult;

    fn execute(self, db: &dyn DatabaseBackend) -> Result<Self::Output, Box<dyn Error>> {
        Ok(StatusResult {
            backend: db.backend_name().to_string(),
            migrations: migration_status(db)?,
            tables: db.list_tables()?.len(),
            enum_types: db.list_enum_types()?.len(),
        })
    }
}
