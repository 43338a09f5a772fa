//! Database access for the schema migrator.
//!
//! This module provides the database abstraction layer for the CLI tool:
//! - Connection configuration (PostgreSQL URL or in-memory catalog)
//! - The `DatabaseBackend` trait the migration runner is written against
//! - The schema definition, its compiler and the migration runner (`schema`)
//!
//! # Backends
//!
//! `PostgresBackend` applies statements inside real transactions.
//! `MemoryBackend` keeps a typed catalog and enforces the same dependency rules
//! PostgreSQL would (no table before its enum types, no foreign key before both
//! tables, no drop while something still depends on the object). It backs
//! offline planning and the unit tests.

mod backend;
pub mod config;
mod escape;
mod memory;
pub mod postgres;
pub mod schema;

// Re-export public items
pub use backend::{AppliedMigration, DatabaseBackend};
pub use config::{DatabaseConfig, PostgresConfig};
pub use escape::{escape_string_for_quote, quote_ident, quote_literal};
pub use memory::MemoryBackend;
pub use postgres::PostgresBackend;

use thiserror::Error;

/// Database error types
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to connect to database: {message}")]
    ConnectionFailed { message: String },

    #[error("Statement failed: {message}\n  statement: {statement}")]
    StatementFailed { statement: String, message: String },

    #[error("Transaction failed: {message}")]
    TransactionFailed { message: String },

    #[error("Catalog conflict: {message}\n  statement: {statement}")]
    CatalogConflict { statement: String, message: String },

    #[error("Nothing to revert: no migration has been applied")]
    NothingToRevert,

    #[error("Migration {version} is recorded in the database but unknown to this build")]
    UnknownMigration { version: i64 },

    #[error("Invalid database configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Query failed: {message}")]
    QueryFailed { message: String },
}
