//! Cycle prevention for self-referencing hierarchies.
//!
//! `departments`, `positions` and `skill_types` each point at themselves
//! through a nullable `parentId`. PostgreSQL cannot forbid cycles with a plain
//! foreign key, so writers check a new parent here before updating the row.

use thiserror::Error;

use crate::db::postgres::PostgresBackend;
use crate::db::schema::constraints::FOREIGN_KEYS;
use crate::db::schema::definition::ForeignKey;
use crate::db::schema::validate::self_references;
use crate::db::DbError;

/// Default bound on ancestor walks.
pub const DEFAULT_MAX_DEPTH: usize = 1024;

#[derive(Error, Debug)]
pub enum HierarchyError {
    #[error("A row cannot be its own parent: {node}")]
    SelfParent { node: String },

    #[error("Setting this parent would create a cycle: {}", .path.join(" -> "))]
    Cycle { path: Vec<String> },

    #[error("Ancestor chain longer than {depth}; the hierarchy is likely corrupt")]
    DepthExceeded { depth: usize },

    #[error("Table '{table}' has no self-referencing foreign key")]
    NotHierarchical { table: String },

    #[error("Parent lookup failed: {0}")]
    Lookup(#[from] DbError),
}

/// The self-referencing foreign key of `table`, if it has one.
pub fn hierarchy_of(table: &str) -> Option<&'static ForeignKey> {
    self_references(FOREIGN_KEYS)
        .into_iter()
        .find(|fk| fk.table == table)
}

/// Validates parent assignments within one hierarchy.
#[derive(Debug, Clone, Copy)]
pub struct HierarchyGuard {
    pub link: &'static ForeignKey,
    pub max_depth: usize,
}

impl HierarchyGuard {
    pub fn for_table(table: &str) -> Result<Self, HierarchyError> {
        let link = hierarchy_of(table).ok_or_else(|| HierarchyError::NotHierarchical {
            table: table.to_string(),
        })?;
        Ok(Self {
            link,
            max_depth: DEFAULT_MAX_DEPTH,
        })
    }

    pub fn with_max_depth(self, max_depth: usize) -> Self {
        Self { max_depth, ..self }
    }

    /// Check that `node` may take `parent` as its parent.
    ///
    /// Walks up from `parent` using `parent_of` and fails if `node` is on the
    /// chain. The returned `Cycle` path runs from `node` through the new parent
    /// back to `node`.
    pub fn validate_parent<F>(
        &self,
        node: &str,
        parent: &str,
        mut parent_of: F,
    ) -> Result<(), HierarchyError>
    where
        F: FnMut(&str) -> Result<Option<String>, DbError>,
    {
        if node == parent {
            return Err(HierarchyError::SelfParent {
                node: node.to_string(),
            });
        }

        let mut path = vec![node.to_string(), parent.to_string()];
        let mut current = parent.to_string();

        for _ in 0..self.max_depth {
            match parent_of(&current)? {
                None => return Ok(()),
                Some(next) if next == node => {
                    path.push(next);
                    return Err(HierarchyError::Cycle { path });
                }
                Some(next) => {
                    path.push(next.clone());
                    current = next;
                }
            }
        }

        Err(HierarchyError::DepthExceeded {
            depth: self.max_depth,
        })
    }

    /// `validate_parent` against rows stored in PostgreSQL.
    pub fn validate_parent_in(
        &self,
        backend: &PostgresBackend,
        node: &str,
        parent: &str,
    ) -> Result<(), HierarchyError> {
        tracing::debug!(
            "Checking {}.{}: {} -> {}",
            self.link.table,
            self.link.column,
            node,
            parent
        );
        self.validate_parent(node, parent, |id| {
            backend.parent_of(self.link.table, self.link.column, id)
        })
    }
}
