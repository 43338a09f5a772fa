//! hrm_schema library - schema and migrations for the HR management database
//!
//! Provides the schema definition, its PostgreSQL compiler, the migration
//! runner with its database backends, and the command and output layers of
//! the `hrm_schema` CLI.

pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod output;

#[macro_use]
pub mod test_macros;
