//! Configuration file handling for database connections.
//!
//! This module provides loading and parsing of `.hrm_schema.json` configuration
//! files. The file is optional: when it is absent the database comes from the
//! `--database-url` flag or the `DATABASE_URL` environment variable.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::Path;

use crate::db::{DatabaseConfig, PostgresConfig};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".hrm_schema.json";

/// Top-level configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Database configuration
    pub database: DatabaseConfigFile,
}

/// Database configuration variants.
///
/// JSON format uses a "type" field with lowercase variant names:
///
/// ```json
/// { "database": { "type": "postgres", "connection_string": "postgres://hr@localhost/hr" } }
/// { "database": { "type": "postgres", "host": "localhost", "user": "hr", "database": "hr" } }
/// { "database": { "type": "memory" } }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DatabaseConfigFile {
    /// PostgreSQL server
    Postgres(PostgresConfig),
    /// In-memory catalog
    #[serde(rename = "memory")]
    Mem,
}

impl ConfigFile {
    /// Load `.hrm_schema.json` from the current directory if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_if_present() -> Result<Option<Self>, Box<dyn Error>> {
        let path = Path::new(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from(path).map(Some)
    }

    /// Load configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, Box<dyn Error>> {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

        let config: ConfigFile = serde_json::from_str(&content)
            .map_err(|e| format!("Invalid JSON in {}: {}", path.display(), e))?;

        Ok(config)
    }
}

impl DatabaseConfigFile {
    /// Convert this configuration to a DatabaseConfig.
    pub fn to_database_config(&self) -> DatabaseConfig {
        match self {
            Self::Postgres(pg_config) => DatabaseConfig::Postgres(pg_config.clone()),
            Self::Mem => DatabaseConfig::Memory,
        }
    }
}
