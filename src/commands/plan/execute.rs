use std::error::Error;

use serde::Serialize;

use super::PlanCmd;
use crate::commands::Execute;
use crate::db::schema::compilers::PostgresCompiler;
use crate::db::schema::migrations::{run_migrations, Direction, MIGRATIONS};
use crate::db::schema::statement::{Phase, Statement, StatementKind};
use crate::db::DatabaseBackend;

/// One statement of the plan
#[derive(Debug, Clone, Serialize)]
pub struct PlannedStatement {
    pub migration: i64,
    pub phase: Phase,
    pub target: String,
    pub sql: String,
}

/// Result of the plan command execution
#[derive(Debug, Serialize)]
pub struct PlanResult {
    pub direction: Direction,
    pub statements: Vec<PlannedStatement>,
}

fn planned(migration: i64, statements: Vec<Statement>) -> impl Iterator<Item = PlannedStatement> {
    statements.into_iter().map(move |s| PlannedStatement {
        migration,
        phase: s.kind.phase(),
        target: s.kind.target(),
        sql: s.sql,
    })
}

impl Execute for PlanCmd {
    type Output = PlanResult;

    /// Replays the plan against `db`, which should be an empty scratch catalog,
    /// so a statement that could not run in order fails here instead of on a
    /// real database.
    fn execute(self, db: &dyn DatabaseBackend) -> Result<Self::Output, Box<dyn Error>> {
        let mut statements = Vec::new();

        match self.direction {
            Direction::Up => {
                let bootstrap = vec![PostgresCompiler::compile(StatementKind::EnsureMigrationsTable)];
                db.apply(&bootstrap)?;
                statements.extend(planned(0, bootstrap));

                for migration in MIGRATIONS {
                    let plan = migration.apply_plan();
                    db.apply(&plan)?;
                    statements.extend(planned(migration.version, plan));
                }
            }
            Direction::Down => {
                run_migrations(db)?;
                if let Some(migration) = MIGRATIONS.last() {
                    let plan = migration.revert_plan();
                    db.apply(&plan)?;
                    statements.extend(planned(migration.version, plan));
                }
            }
        }

        Ok(PlanResult {
            direction: self.direction,
            statements,
        })
    }
}
