//! Database backend trait for abstracting the migration target.
//!
//! The runner only ever talks to `&dyn DatabaseBackend`. PostgreSQL is the
//! production target; the in-memory catalog backs offline planning and tests.

use serde::Serialize;

use super::DbError;
use super::schema::Statement;

/// A row of the bookkeeping table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedMigration {
    pub version: i64,
    pub name: String,
    /// Wall-clock time of application, when the backend records one
    pub applied_at: Option<String>,
}

/// Trait for database backends that can receive schema statements.
pub trait DatabaseBackend: Send + Sync {
    /// Get the backend name for logging/debugging.
    fn backend_name(&self) -> &'static str;

    /// Perform backend-specific setup/initialization.
    ///
    /// Called by `run_migrations()` before anything else.
    ///
    /// # Default Implementation
    /// Returns Ok(()) for backends that don't need special initialization.
    ///
    /// # PostgreSQL
    /// Ensures the `pgcrypto` extension for `gen_random_uuid()`.
    fn setup_backend(&self) -> Result<(), DbError> {
        Ok(())
    }

    /// Apply `statements` in order as one all-or-nothing unit.
    ///
    /// # Errors
    /// Returns the first failing statement; nothing from the batch is kept.
    fn apply(&self, statements: &[Statement]) -> Result<(), DbError>;

    /// Rows of the bookkeeping table, ordered by version.
    ///
    /// The table must exist; use `migrations::applied_migrations` for a
    /// read that tolerates its absence.
    fn applied_migrations(&self) -> Result<Vec<AppliedMigration>, DbError>;

    /// Check if a relation (table) exists.
    fn relation_exists(&self, name: &str) -> Result<bool, DbError>;

    /// User tables, sorted, excluding the bookkeeping table.
    fn list_tables(&self) -> Result<Vec<String>, DbError>;

    /// User-defined enum types, sorted.
    fn list_enum_types(&self) -> Result<Vec<String>, DbError>;

    /// Canonical, sorted description of the catalog.
    ///
    /// One line per column, constraint, index and enum type. Two snapshots are
    /// equal exactly when the schemas are structurally equal, so comparing them
    /// checks that `down` followed by `up` reproduces the schema.
    fn catalog_snapshot(&self) -> Result<Vec<String>, DbError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trait_is_object_safe() {
        fn accepts_backend(_db: &dyn DatabaseBackend) {}
        let _ = accepts_backend;
    }
}
