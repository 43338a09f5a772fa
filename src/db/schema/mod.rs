//! The HR schema as data, its PostgreSQL compiler and the migration runner.
//!
//! # Overview
//!
//! 1. **Core Types** (`definition.rs`):
//!    - `EnumType`, `DataType`, `SchemaColumn`, `SchemaTable`
//!    - `ForeignKey` with its `ReferentialAction`s, `SchemaIndex`
//!
//! 2. **Schema Definitions**:
//!    - `enums.rs` - the 12 enumerated types
//!    - `tables.rs` - the 27 tables, parents before children
//!    - `constraints.rs` - foreign keys and secondary indexes
//!
//! 3. **Statements** (`statement.rs`, `compilers/`):
//!    - `StatementKind` - typed description of one DDL/bookkeeping statement
//!    - `PostgresCompiler` - turns a `StatementKind` into SQL text
//!
//! 4. **Runner** (`migrations.rs`): `run_migrations`, `revert_last_migration`,
//!    `migration_status`
//!
//! 5. **Checks**: `validate.rs` for the schema graph, `hierarchy.rs` for
//!    parent/child rows in self-referencing tables
//!
//! # Type Mapping
//!
//! | DataType | PostgreSQL |
//! |----------|------------|
//! | Uuid | uuid |
//! | Varchar(n) | character varying(n) |
//! | Text | text |
//! | Integer | integer |
//! | Double | double precision |
//! | Boolean | boolean |
//! | Date | date |
//! | Timestamp | TIMESTAMP |
//! | Jsonb | jsonb |
//! | Enum(e) | "e" |

pub mod compilers;
pub mod constraints;
pub mod definition;
pub mod enums;
pub mod hierarchy;
pub mod migrations;
pub mod statement;
pub mod tables;
pub mod validate;

// Re-export public items
pub use compilers::PostgresCompiler;
pub use definition::{
    DataType, DefaultValue, EnumType, ForeignKey, PrimaryKey, ReferentialAction, SchemaColumn,
    SchemaIndex, SchemaTable,
};
pub use hierarchy::{HierarchyError, HierarchyGuard};
pub use migrations::{
    applied_migrations, find_migration, migration_status, migration_to_revert,
    pending_migrations, revert_last_migration, run_migrations, Direction, Migration,
    MigrationOutcome, MigrationState, MIGRATIONS, MIGRATIONS_TABLE,
};
pub use statement::{Phase, Statement, StatementKind};
pub use validate::{validate_migration, IssueKind, SchemaIssue};
