//! PostgreSQL DDL compiler.
//!
//! Generates PostgreSQL DDL from the schema definitions. Output is
//! deterministic: the same definition always compiles to the same text, so
//! statement lists can be compared and snapshotted.

use crate::db::escape::{quote_ident, quote_literal};
use crate::db::schema::definition::{
    DataType, DefaultValue, EnumType, ForeignKey, SchemaColumn, SchemaIndex, SchemaTable,
};
use crate::db::schema::migrations::MIGRATIONS_TABLE;
use crate::db::schema::statement::{Statement, StatementKind};

/// Compiler for generating PostgreSQL statements from schema definitions.
pub struct PostgresCompiler;

impl PostgresCompiler {
    /// SQL type name for a column type.
    pub fn column_type(data_type: &DataType) -> String {
        match data_type {
            DataType::Uuid => "uuid".to_string(),
            DataType::Varchar(None) => "character varying".to_string(),
            DataType::Varchar(Some(len)) => format!("character varying({})", len),
            DataType::Text => "text".to_string(),
            DataType::Integer => "integer".to_string(),
            DataType::Double => "double precision".to_string(),
            DataType::Boolean => "boolean".to_string(),
            DataType::Date => "date".to_string(),
            DataType::Timestamp => "TIMESTAMP".to_string(),
            DataType::Jsonb => "jsonb".to_string(),
            DataType::Enum(e) => quote_ident(e.name),
        }
    }

    /// SQL default expression.
    pub fn default_expr(default: &DefaultValue) -> String {
        match default {
            DefaultValue::GeneratedUuid => "gen_random_uuid()".to_string(),
            DefaultValue::Now => "now()".to_string(),
            DefaultValue::Bool(b) => b.to_string(),
            DefaultValue::Int(i) => i.to_string(),
            DefaultValue::Literal(s) => quote_literal(s),
        }
    }

    /// Column definition as it appears inside `CREATE TABLE`.
    ///
    /// ```sql
    /// "status" "users_status_enum" NOT NULL DEFAULT 'Active'
    /// ```
    pub fn column_definition(column: &SchemaColumn) -> String {
        let mut def = format!(
            "{} {}",
            quote_ident(column.name),
            Self::column_type(&column.data_type)
        );
        if !column.nullable {
            def.push_str(" NOT NULL");
        }
        if let Some(default) = &column.default {
            def.push_str(" DEFAULT ");
            def.push_str(&Self::default_expr(default));
        }
        def
    }

    /// ```sql
    /// CREATE TYPE "leave_requests_status_enum" AS ENUM('Pending', 'Rejected', 'Approved')
    /// ```
    pub fn create_enum(enum_type: &EnumType) -> String {
        let values = enum_type
            .values
            .iter()
            .map(|v| quote_literal(v))
            .collect::<Vec<_>>()
            .join(", ");
        format!("CREATE TYPE {} AS ENUM({})", quote_ident(enum_type.name), values)
    }

    pub fn drop_enum(enum_type: &EnumType) -> String {
        format!("DROP TYPE {}", quote_ident(enum_type.name))
    }

    /// Generate `CREATE TABLE` with inline unique and primary key constraints.
    ///
    /// Produces output in the format:
    /// ```sql
    /// CREATE TABLE "users" (
    ///     "id" uuid NOT NULL DEFAULT gen_random_uuid(),
    ///     "email" character varying NOT NULL,
    ///     ...
    ///     CONSTRAINT "uq_users_email" UNIQUE ("email"),
    ///     CONSTRAINT "pk_users" PRIMARY KEY ("id")
    /// )
    /// ```
    pub fn create_table(table: &SchemaTable) -> String {
        let mut lines: Vec<String> = table
            .all_columns()
            .map(|c| format!("    {}", Self::column_definition(c)))
            .collect();

        for key in table.unique_keys {
            lines.push(format!(
                "    CONSTRAINT {} UNIQUE ({})",
                quote_ident(&table.unique_key_name(key)),
                Self::column_list(key)
            ));
        }

        lines.push(format!(
            "    CONSTRAINT {} PRIMARY KEY ({})",
            quote_ident(&table.primary_key_name()),
            Self::column_list(table.primary_key_columns())
        ));

        format!(
            "CREATE TABLE {} (\n{}\n)",
            quote_ident(table.name),
            lines.join(",\n")
        )
    }

    pub fn drop_table(table: &SchemaTable) -> String {
        format!("DROP TABLE {}", quote_ident(table.name))
    }

    pub fn create_index(index: &SchemaIndex) -> String {
        format!(
            "CREATE INDEX {} ON {} ({})",
            quote_ident(&index.name()),
            quote_ident(index.table),
            Self::column_list(index.columns)
        )
    }

    pub fn drop_index(index: &SchemaIndex) -> String {
        format!("DROP INDEX {}", quote_ident(&index.name()))
    }

    /// ```sql
    /// ALTER TABLE "contracts" ADD CONSTRAINT "fk_contracts_employeeid" FOREIGN KEY ("employeeId")
    ///     REFERENCES "employees"("id") ON DELETE CASCADE ON UPDATE NO ACTION
    /// ```
    pub fn add_foreign_key(fk: &ForeignKey) -> String {
        format!(
            "ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {}({}) ON DELETE {} ON UPDATE {}",
            quote_ident(fk.table),
            quote_ident(&fk.constraint_name()),
            quote_ident(fk.column),
            quote_ident(fk.references),
            quote_ident(fk.referenced_column),
            fk.on_delete.sql(),
            fk.on_update.sql()
        )
    }

    pub fn drop_foreign_key(fk: &ForeignKey) -> String {
        format!(
            "ALTER TABLE {} DROP CONSTRAINT {}",
            quote_ident(fk.table),
            quote_ident(&fk.constraint_name())
        )
    }

    /// Bookkeeping table recording applied migrations.
    pub fn create_migrations_table(table: &str) -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    \
             \"id\" SERIAL NOT NULL,\n    \
             \"version\" bigint NOT NULL,\n    \
             \"name\" character varying NOT NULL,\n    \
             \"appliedAt\" TIMESTAMP NOT NULL DEFAULT now(),\n    \
             CONSTRAINT {} UNIQUE (\"version\"),\n    \
             CONSTRAINT {} PRIMARY KEY (\"id\")\n)",
            quote_ident(table),
            quote_ident(&format!("uq_{}_version", table)),
            quote_ident(&format!("pk_{}", table))
        )
    }

    pub fn record_migration(table: &str, version: i64, name: &str) -> String {
        format!(
            "INSERT INTO {} (\"version\", \"name\") VALUES ({}, {})",
            quote_ident(table),
            version,
            quote_literal(name)
        )
    }

    pub fn forget_migration(table: &str, version: i64) -> String {
        format!(
            "DELETE FROM {} WHERE \"version\" = {}",
            quote_ident(table),
            version
        )
    }

    /// Compile a typed statement kind to SQL.
    pub fn compile(kind: StatementKind) -> Statement {
        let migrations_table = MIGRATIONS_TABLE;
        let sql = match kind {
            StatementKind::CreateEnum(e) => Self::create_enum(e),
            StatementKind::DropEnum(e) => Self::drop_enum(e),
            StatementKind::CreateTable(t) => Self::create_table(t),
            StatementKind::DropTable(t) => Self::drop_table(t),
            StatementKind::CreateIndex(i) => Self::create_index(i),
            StatementKind::DropIndex(i) => Self::drop_index(i),
            StatementKind::AddForeignKey(fk) => Self::add_foreign_key(fk),
            StatementKind::DropForeignKey(fk) => Self::drop_foreign_key(fk),
            StatementKind::EnsureMigrationsTable => Self::create_migrations_table(migrations_table),
            StatementKind::RecordMigration { version, name } => {
                Self::record_migration(migrations_table, version, name)
            }
            StatementKind::ForgetMigration { version } => {
                Self::forget_migration(migrations_table, version)
            }
        };
        Statement { kind, sql }
    }

    fn column_list(columns: &[&str]) -> String {
        columns
            .iter()
            .map(|c| quote_ident(c))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
