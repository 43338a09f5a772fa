//! Executable statements.
//!
//! A `Statement` pairs the SQL text sent to PostgreSQL with a typed description
//! of what it does. The typed half lets the in-memory backend enforce the same
//! dependency rules as the engine, and lets validation reason about ordering
//! without parsing SQL.

use serde::Serialize;

use super::definition::{EnumType, ForeignKey, SchemaIndex, SchemaTable};

/// What a statement does to the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    CreateEnum(&'static EnumType),
    DropEnum(&'static EnumType),
    CreateTable(&'static SchemaTable),
    DropTable(&'static SchemaTable),
    CreateIndex(&'static SchemaIndex),
    DropIndex(&'static SchemaIndex),
    AddForeignKey(&'static ForeignKey),
    DropForeignKey(&'static ForeignKey),
    /// `CREATE TABLE IF NOT EXISTS` for the bookkeeping table
    EnsureMigrationsTable,
    RecordMigration { version: i64, name: &'static str },
    ForgetMigration { version: i64 },
}

/// Phase of a schema statement within `up`/`down`.
///
/// `up` runs phases in ascending order, `down` in descending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    EnumTypes,
    Tables,
    Indexes,
    ForeignKeys,
    Bookkeeping,
}

impl StatementKind {
    pub fn phase(&self) -> Phase {
        match self {
            StatementKind::CreateEnum(_) | StatementKind::DropEnum(_) => Phase::EnumTypes,
            StatementKind::CreateTable(_) | StatementKind::DropTable(_) => Phase::Tables,
            StatementKind::CreateIndex(_) | StatementKind::DropIndex(_) => Phase::Indexes,
            StatementKind::AddForeignKey(_) | StatementKind::DropForeignKey(_) => {
                Phase::ForeignKeys
            }
            StatementKind::EnsureMigrationsTable
            | StatementKind::RecordMigration { .. }
            | StatementKind::ForgetMigration { .. } => Phase::Bookkeeping,
        }
    }

    /// True if this statement removes something from the catalog.
    pub fn is_drop(&self) -> bool {
        matches!(
            self,
            StatementKind::DropEnum(_)
                | StatementKind::DropTable(_)
                | StatementKind::DropIndex(_)
                | StatementKind::DropForeignKey(_)
                | StatementKind::ForgetMigration { .. }
        )
    }

    /// True if `other` undoes `self`.
    pub fn is_inverse_of(&self, other: &StatementKind) -> bool {
        use StatementKind::*;
        match (self, other) {
            (CreateEnum(a), DropEnum(b)) | (DropEnum(a), CreateEnum(b)) => a.name == b.name,
            (CreateTable(a), DropTable(b)) | (DropTable(a), CreateTable(b)) => a.name == b.name,
            (CreateIndex(a), DropIndex(b)) | (DropIndex(a), CreateIndex(b)) => a == b,
            (AddForeignKey(a), DropForeignKey(b)) | (DropForeignKey(a), AddForeignKey(b)) => {
                a == b
            }
            (RecordMigration { version: a, .. }, ForgetMigration { version: b })
            | (ForgetMigration { version: a }, RecordMigration { version: b, .. }) => a == b,
            _ => false,
        }
    }

    /// Name of the catalog object the statement touches.
    pub fn target(&self) -> String {
        match self {
            StatementKind::CreateEnum(e) | StatementKind::DropEnum(e) => e.name.to_string(),
            StatementKind::CreateTable(t) | StatementKind::DropTable(t) => t.name.to_string(),
            StatementKind::CreateIndex(i) | StatementKind::DropIndex(i) => i.name(),
            StatementKind::AddForeignKey(fk) | StatementKind::DropForeignKey(fk) => {
                fk.constraint_name()
            }
            StatementKind::EnsureMigrationsTable => super::migrations::MIGRATIONS_TABLE.to_string(),
            StatementKind::RecordMigration { version, .. }
            | StatementKind::ForgetMigration { version } => version.to_string(),
        }
    }
}

/// A single DDL/DML statement with its typed description.
#[derive(Debug, Clone)]
pub struct Statement {
    pub kind: StatementKind,
    pub sql: String,
}
