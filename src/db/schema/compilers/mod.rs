//! Database schema compilers.
//!
//! Generates backend-specific DDL from the schema definitions. Each compiler
//! converts `SchemaTable`, `EnumType`, `SchemaIndex` and `ForeignKey`
//! definitions into the target database's native DDL syntax.

pub mod postgres;

pub use postgres::PostgresCompiler;
