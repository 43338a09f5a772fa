//! PostgreSQL backend implementation.
//!
//! Applies statement batches inside a single transaction and reads the
//! catalog back through `information_schema` and `pg_catalog`. Catalog names
//! are cast to `text` so they decode as Rust `String`s.

use std::sync::{Mutex, MutexGuard};

use postgres::{Client, NoTls, Row};

use super::backend::{AppliedMigration, DatabaseBackend};
use super::config::PostgresConfig;
use super::escape::quote_ident;
use super::schema::migrations::MIGRATIONS_TABLE;
use super::schema::Statement;
use super::DbError;

/// PostgreSQL backend using the synchronous `postgres` client.
pub struct PostgresBackend {
    /// The client is used serially; the mutex makes the backend `Sync`.
    client: Mutex<Client>,
}

impl PostgresBackend {
    /// Connect without TLS.
    ///
    /// # Errors
    /// `InvalidConfig` for unusable settings, `ConnectionFailed` when the
    /// server cannot be reached or rejects the credentials.
    pub fn connect(config: &PostgresConfig) -> Result<Self, DbError> {
        let conn = config.to_connection_string()?;
        let client = Client::connect(&conn, NoTls).map_err(|e| DbError::ConnectionFailed {
            message: e.to_string(),
        })?;
        Ok(Self {
            client: Mutex::new(client),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Client>, DbError> {
        self.client.lock().map_err(|e| DbError::TransactionFailed {
            message: format!("Failed to acquire client lock: {}", e),
        })
    }

    fn query(
        &self,
        sql: &str,
        params: &[&(dyn postgres::types::ToSql + Sync)],
    ) -> Result<Vec<Row>, DbError> {
        self.lock()?
            .query(sql, params)
            .map_err(|e| DbError::QueryFailed {
                message: error_message(&e),
            })
    }

    /// Parent of row `id` in a self-referencing table.
    ///
    /// Returns `Ok(None)` when the row does not exist or has no parent.
    pub fn parent_of(
        &self,
        table: &str,
        column: &str,
        id: &str,
    ) -> Result<Option<String>, DbError> {
        let sql = format!(
            "SELECT {}::text FROM {} WHERE id::text = $1",
            quote_ident(column),
            quote_ident(table)
        );
        let rows = self.query(&sql, &[&id])?;
        match rows.first() {
            Some(row) => get(row, 0),
            None => Ok(None),
        }
    }
}

/// Server message without the client-side "db error:" prefix.
fn error_message(e: &postgres::Error) -> String {
    match e.as_db_error() {
        Some(db) => match db.detail() {
            Some(detail) => format!("{} ({})", db.message(), detail),
            None => db.message().to_string(),
        },
        None => e.to_string(),
    }
}

fn get<'a, T: postgres::types::FromSql<'a>>(row: &'a Row, idx: usize) -> Result<T, DbError> {
    row.try_get(idx).map_err(|e| DbError::QueryFailed {
        message: format!("Unexpected value in column {}: {}", idx, e),
    })
}

const LIST_TABLES: &str = "\
SELECT table_name::text FROM information_schema.tables \
WHERE table_schema = current_schema() AND table_type = 'BASE TABLE' AND table_name::text <> $1 \
ORDER BY 1";

const LIST_ENUM_TYPES: &str = "\
SELECT t.typname::text FROM pg_type t \
JOIN pg_namespace n ON n.oid = t.typnamespace \
WHERE t.typtype = 'e' AND n.nspname = current_schema() \
ORDER BY 1";

const SNAPSHOT_COLUMNS: &str = "\
SELECT table_name::text, column_name::text, \
       CASE WHEN data_type = 'USER-DEFINED' THEN udt_name::text ELSE data_type::text END, \
       character_maximum_length::int4, is_nullable::text, column_default::text \
FROM information_schema.columns \
WHERE table_schema = current_schema() AND table_name::text <> $1";

const SNAPSHOT_CONSTRAINTS: &str = "\
SELECT rel.relname::text, con.conname::text, pg_get_constraintdef(con.oid) \
FROM pg_constraint con \
JOIN pg_class rel ON rel.oid = con.conrelid \
JOIN pg_namespace n ON n.oid = rel.relnamespace \
WHERE n.nspname = current_schema() AND rel.relname::text <> $1";

const SNAPSHOT_INDEXES: &str = "\
SELECT tablename::text, indexname::text, indexdef \
FROM pg_indexes \
WHERE schemaname = current_schema() AND tablename::text <> $1";

const SNAPSHOT_ENUMS: &str = "\
SELECT t.typname::text, string_agg(e.enumlabel::text, ', ' ORDER BY e.enumsortorder) \
FROM pg_type t \
JOIN pg_enum e ON e.enumtypid = t.oid \
JOIN pg_namespace n ON n.oid = t.typnamespace \
WHERE n.nspname = current_schema() \
GROUP BY t.typname";

impl DatabaseBackend for PostgresBackend {
    fn backend_name(&self) -> &'static str {
        "Postgres"
    }

    fn setup_backend(&self) -> Result<(), DbError> {
        // gen_random_uuid() is built in from PostgreSQL 13; older servers need pgcrypto.
        if let Err(e) = self
            .lock()?
            .batch_execute("CREATE EXTENSION IF NOT EXISTS pgcrypto")
        {
            tracing::warn!(
                "Could not ensure pgcrypto ({}); relying on built-in gen_random_uuid()",
                error_message(&e)
            );
        }
        Ok(())
    }

    fn apply(&self, statements: &[Statement]) -> Result<(), DbError> {
        let mut client = self.lock()?;
        let mut tx = client.transaction().map_err(|e| DbError::TransactionFailed {
            message: error_message(&e),
        })?;

        for statement in statements {
            tracing::debug!("{}", statement.sql);
            if let Err(e) = tx.batch_execute(&statement.sql) {
                tracing::warn!("Rolling back: {}", statement.kind.target());
                // Dropping `tx` rolls the transaction back.
                return Err(DbError::StatementFailed {
                    statement: statement.sql.clone(),
                    message: error_message(&e),
                });
            }
        }

        tx.commit().map_err(|e| DbError::TransactionFailed {
            message: error_message(&e),
        })
    }

    fn applied_migrations(&self) -> Result<Vec<AppliedMigration>, DbError> {
        let sql = format!(
            "SELECT version, name::text, {}::text FROM {} ORDER BY version",
            quote_ident("appliedAt"),
            quote_ident(MIGRATIONS_TABLE)
        );
        self.query(&sql, &[])?
            .iter()
            .map(|row| -> Result<AppliedMigration, DbError> {
                Ok(AppliedMigration {
                    version: get(row, 0)?,
                    name: get(row, 1)?,
                    applied_at: get(row, 2)?,
                })
            })
            .collect()
    }

    fn relation_exists(&self, name: &str) -> Result<bool, DbError> {
        let rows = self.query(
            "SELECT to_regclass($1::text) IS NOT NULL",
            &[&quote_ident(name)],
        )?;
        match rows.first() {
            Some(row) => get(row, 0),
            None => Ok(false),
        }
    }

    fn list_tables(&self) -> Result<Vec<String>, DbError> {
        self.query(LIST_TABLES, &[&MIGRATIONS_TABLE])?
            .iter()
            .map(|row| get(row, 0))
            .collect()
    }

    fn list_enum_types(&self) -> Result<Vec<String>, DbError> {
        self.query(LIST_ENUM_TYPES, &[])?
            .iter()
            .map(|row| get(row, 0))
            .collect()
    }

    fn catalog_snapshot(&self) -> Result<Vec<String>, DbError> {
        let mut lines = Vec::new();

        for row in self.query(SNAPSHOT_COLUMNS, &[&MIGRATIONS_TABLE])? {
            let table: String = get(&row, 0)?;
            let column: String = get(&row, 1)?;
            let data_type: String = get(&row, 2)?;
            let length: Option<i32> = get(&row, 3)?;
            let nullable: String = get(&row, 4)?;
            let default: Option<String> = get(&row, 5)?;

            let mut line = format!("column {}.{} {}", table, column, data_type);
            if let Some(length) = length {
                line.push_str(&format!("({})", length));
            }
            if nullable == "NO" {
                line.push_str(" NOT NULL");
            }
            if let Some(default) = default {
                line.push_str(&format!(" DEFAULT {}", default));
            }
            lines.push(line);
        }

        for row in self.query(SNAPSHOT_CONSTRAINTS, &[&MIGRATIONS_TABLE])? {
            let table: String = get(&row, 0)?;
            let name: String = get(&row, 1)?;
            let definition: String = get(&row, 2)?;
            lines.push(format!("constraint {}.{} {}", table, name, definition));
        }

        for row in self.query(SNAPSHOT_INDEXES, &[&MIGRATIONS_TABLE])? {
            let table: String = get(&row, 0)?;
            let name: String = get(&row, 1)?;
            let definition: String = get(&row, 2)?;
            lines.push(format!("index {}.{} {}", table, name, definition));
        }

        for row in self.query(SNAPSHOT_ENUMS, &[])? {
            let name: String = get(&row, 0)?;
            let labels: String = get(&row, 1)?;
            lines.push(format!("enum {}: {}", name, labels));
        }

        lines.sort();
        Ok(lines)
    }
}
