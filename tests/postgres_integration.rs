//! Integration tests against a live PostgreSQL server.
//!
//! These tests drop and recreate every schema object in the target database.
//! Run with: cargo test --features postgres-tests
//!
//! Prerequisites:
//! 1. A PostgreSQL 13+ server
//! 2. A scratch database: `createdb -U postgres hrm_schema_test`
//! 3. `DATABASE_URL` pointing at it (defaults to the local one below)

#![cfg(feature = "postgres-tests")]

use postgres::types::ToSql;
use postgres::{Client, NoTls};
use serial_test::serial;

use hrm_schema::db::schema::enums::ALL_ENUMS;
use hrm_schema::db::schema::{
    find_migration, migration_status, revert_last_migration, run_migrations, HierarchyError,
    HierarchyGuard, MigrationState, MIGRATIONS,
};
use hrm_schema::db::{DatabaseBackend, DbError, PostgresBackend, PostgresConfig};

const DEFAULT_URL: &str = "postgres://postgres@localhost/hrm_schema_test";

fn database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_URL.to_string())
}

fn backend() -> PostgresBackend {
    PostgresBackend::connect(&PostgresConfig::from_connection_string(&database_url()))
        .expect("PostgreSQL should be reachable")
}

fn client() -> Client {
    Client::connect(&database_url(), NoTls).expect("PostgreSQL should be reachable")
}

/// Revert everything applied so far.
fn reset(db: &PostgresBackend) {
    loop {
        match revert_last_migration(db) {
            Ok(_) => continue,
            Err(DbError::NothingToRevert) => break,
            Err(e) => panic!("Reset failed: {}", e),
        }
    }
}

/// An empty database with every migration applied.
fn migrated() -> PostgresBackend {
    let db = backend();
    reset(&db);
    run_migrations(&db).expect("Migrations should apply");
    db
}

fn insert_employee(client: &mut Client, code: &str) -> String {
    let row = client
        .query_one(
            r#"INSERT INTO "employees" ("employeeCode", "firstName", "lastName", "fullName")
               VALUES ($1, 'Ada', 'Lovelace', 'Ada Lovelace') RETURNING id::text"#,
            &[&code],
        )
        .unwrap();
    row.get(0)
}

/// Insert one row and return its id as text.
fn insert_returning_id(client: &mut Client, sql: &str, params: &[&(dyn ToSql + Sync)]) -> String {
    client.query_one(sql, params).unwrap().get(0)
}

fn count(client: &mut Client, table: &str) -> i64 {
    client
        .query_one(&format!(r#"SELECT count(*) FROM "{}""#, table), &[])
        .unwrap()
        .get(0)
}

#[test]
#[serial]
fn test_up_creates_schema_and_records_version() {
    let db = migrated();

    assert_eq!(db.list_tables().unwrap().len(), 27);
    assert_eq!(db.list_enum_types().unwrap().len(), 12);

    let applied = db.applied_migrations().unwrap();
    assert_eq!(applied.len(), MIGRATIONS.len());
    assert!(applied[0].applied_at.is_some());

    // A second run finds nothing pending.
    assert!(run_migrations(&db).unwrap().is_empty());
}

#[test]
#[serial]
fn test_status_reports_applied() {
    let db = migrated();
    let states: Vec<MigrationState> = migration_status(&db).unwrap();
    assert!(states.iter().all(|s| s.applied && s.known));
}

#[test]
#[serial]
fn test_down_then_up_restores_identical_catalog() {
    let db = migrated();
    let before = db.catalog_snapshot().unwrap();

    revert_last_migration(&db).unwrap();
    run_migrations(&db).unwrap();

    assert_eq!(db.catalog_snapshot().unwrap(), before);
}

#[test]
#[serial]
fn test_down_leaves_no_tables_or_enums() {
    let db = migrated();
    reset(&db);

    assert!(db.list_tables().unwrap().is_empty());
    assert!(db.list_enum_types().unwrap().is_empty());
    assert!(db.applied_migrations().unwrap().is_empty());
}

#[test]
#[serial]
fn test_enum_rejects_unknown_value() {
    let _db = migrated();
    let mut client = client();

    let result = client.execute(
        r#"INSERT INTO "users" ("email", "password", "status") VALUES ('a@example.com', 'x', 'Suspended')"#,
        &[],
    );
    assert!(result.is_err());

    client
        .execute(
            r#"INSERT INTO "users" ("email", "password") VALUES ('b@example.com', 'x')"#,
            &[],
        )
        .unwrap();
    let status: String = client
        .query_one(r#"SELECT "status"::text FROM "users""#, &[])
        .unwrap()
        .get(0);
    assert_eq!(status, "Active");
}

#[test]
#[serial]
fn test_every_enum_accepts_only_declared_values() {
    let _db = migrated();
    let mut client = client();

    for enum_type in ALL_ENUMS {
        let cast = format!(r#"SELECT $1::text::"{}"::text"#, enum_type.name);
        for value in enum_type.values {
            let echoed: String = client.query_one(&cast, &[value]).unwrap().get(0);
            assert_eq!(echoed, *value);
        }
        let err = client.query_one(&cast, &[&"Freelance"]).unwrap_err();
        let message = err.as_db_error().map(|e| e.message().to_string());
        assert!(
            message.as_deref().is_some_and(|m| m.contains("invalid input value for enum")),
            "{} accepted or failed oddly: {}",
            enum_type.name,
            err
        );
    }

    let employee = insert_employee(&mut client, "E100");
    let result = client.execute(
        r#"INSERT INTO "contracts" ("no", "type", "startDate", "employeeId")
           VALUES ('C-9', 'Freelance', '2024-01-01', $1::text::uuid)"#,
        &[&employee],
    );
    assert!(result.is_err());
}

#[test]
#[serial]
fn test_duplicate_email_rejected() {
    let _db = migrated();
    let mut client = client();
    let insert = r#"INSERT INTO "users" ("email", "password") VALUES ('dup@example.com', 'x')"#;

    client.execute(insert, &[]).unwrap();
    let err = client.execute(insert, &[]).unwrap_err();
    assert!(err.as_db_error().is_some());
}

#[test]
#[serial]
fn test_employee_delete_cascades_to_dependents() {
    let _db = migrated();
    let mut client = client();
    let employee = insert_employee(&mut client, "E001");
    let skill_type = insert_returning_id(
        &mut client,
        r#"INSERT INTO "skill_types" ("name") VALUES ('Languages') RETURNING id::text"#,
        &[],
    );
    let skill_level = insert_returning_id(
        &mut client,
        r#"INSERT INTO "skill_levels" ("name", "skillTypeId")
           VALUES ('Fluent', $1::text::uuid) RETURNING id::text"#,
        &[&skill_type],
    );
    let leave_type = insert_returning_id(
        &mut client,
        r#"INSERT INTO "leave_types" ("name", "code") VALUES ('Annual', 'AL') RETURNING id::text"#,
        &[],
    );

    let dependents: [(&str, &str, Vec<String>); 6] = [
        (
            "contracts",
            r#"INSERT INTO "contracts" ("no", "type", "startDate", "employeeId")
               VALUES ('C-1', 'Probation', '2024-01-01', $1::text::uuid)"#,
            vec![employee.clone()],
        ),
        (
            "skills",
            r#"INSERT INTO "skills" ("employeeId", "skillLevelId")
               VALUES ($1::text::uuid, $2::text::uuid)"#,
            vec![employee.clone(), skill_level.clone()],
        ),
        (
            "leave_requests",
            r#"INSERT INTO "leave_requests"
                 ("startDate", "endDate", "numberOfDays", "requesterId", "leaveTypeId")
               VALUES ('2024-02-01', '2024-02-02', 2, $1::text::uuid, $2::text::uuid)"#,
            vec![employee.clone(), leave_type.clone()],
        ),
        (
            "employee_children",
            r#"INSERT INTO "employee_children" ("fullName", "employeeId")
               VALUES ('Byron Lovelace', $1::text::uuid)"#,
            vec![employee.clone()],
        ),
        (
            "remaining_annual_leaves",
            r#"INSERT INTO "remaining_annual_leaves" ("year", "employeeId", "leaveTypeId")
               VALUES (2024, $1::text::uuid, $2::text::uuid)"#,
            vec![employee.clone(), leave_type.clone()],
        ),
        (
            "educations",
            r#"INSERT INTO "educations" ("school", "employeeId")
               VALUES ('University of London', $1::text::uuid)"#,
            vec![employee.clone()],
        ),
    ];
    for (table, sql, ids) in &dependents {
        let params: Vec<&(dyn ToSql + Sync)> =
            ids.iter().map(|id| id as &(dyn ToSql + Sync)).collect();
        client.execute(*sql, &params).unwrap();
        assert_eq!(count(&mut client, table), 1, "{} row not inserted", table);
    }

    client
        .execute(r#"DELETE FROM "employees" WHERE id = $1::text::uuid"#, &[&employee])
        .unwrap();
    for (table, _, _) in &dependents {
        assert_eq!(count(&mut client, table), 0, "{} row survived the delete", table);
    }
    // Reference data is not owned by the employee.
    assert_eq!(count(&mut client, "leave_types"), 1);
    assert_eq!(count(&mut client, "skill_levels"), 1);
}

#[test]
#[serial]
fn test_project_manager_blocks_employee_delete() {
    let _db = migrated();
    let mut client = client();
    let manager = insert_employee(&mut client, "E002");

    client
        .execute(
            r#"INSERT INTO "projects" ("name", "code", "projectManagerId")
               VALUES ('Payroll', 'PAY', $1::text::uuid)"#,
            &[&manager],
        )
        .unwrap();

    let result = client.execute(
        r#"DELETE FROM "employees" WHERE id = $1::text::uuid"#,
        &[&manager],
    );
    assert!(result.is_err());
    assert_eq!(count(&mut client, "projects"), 1);
}

#[test]
#[serial]
fn test_composite_key_rejects_duplicate_pair() {
    let _db = migrated();
    let mut client = client();

    let user: String = client
        .query_one(
            r#"INSERT INTO "users" ("email", "password") VALUES ('u@example.com', 'x') RETURNING id::text"#,
            &[],
        )
        .unwrap()
        .get(0);
    let role: String = client
        .query_one(
            r#"INSERT INTO "roles" ("name") VALUES ('admin') RETURNING id::text"#,
            &[],
        )
        .unwrap()
        .get(0);

    let link = r#"INSERT INTO "users_roles" ("userId", "roleId") VALUES ($1::text::uuid, $2::text::uuid)"#;
    client.execute(link, &[&user, &role]).unwrap();
    assert!(client.execute(link, &[&user, &role]).is_err());
}

#[test]
#[serial]
fn test_group_notification_link_rejects_duplicate_pair() {
    let _db = migrated();
    let mut client = client();
    let employee = insert_employee(&mut client, "E003");
    let notification = insert_returning_id(
        &mut client,
        r#"INSERT INTO "group_notifications" ("title", "type")
           VALUES ('Happy birthday', 'Birthday') RETURNING id::text"#,
        &[],
    );

    let link = r#"INSERT INTO "employees_group_notifications" ("employeeId", "groupNotificationId")
                  VALUES ($1::text::uuid, $2::text::uuid)"#;
    client.execute(link, &[&employee, &notification]).unwrap();
    let err = client.execute(link, &[&employee, &notification]).unwrap_err();
    assert_eq!(
        err.as_db_error().and_then(|e| e.constraint()),
        Some("pk_employees_group_notifications")
    );
    assert_eq!(count(&mut client, "employees_group_notifications"), 1);
}

#[test]
#[serial]
fn test_hierarchy_guard_rejects_cycle() {
    let db = migrated();
    let mut client = client();

    let mut insert = |name: &str, parent: Option<&String>| -> String {
        client
            .query_one(
                r#"INSERT INTO "departments" ("name", "parentId") VALUES ($1, $2::text::uuid) RETURNING id::text"#,
                &[&name, &parent],
            )
            .unwrap()
            .get(0)
    };
    let root = insert("Engineering", None);
    let child = insert("Platform", Some(&root));
    let grandchild = insert("Databases", Some(&child));

    let guard = HierarchyGuard::for_table("departments").unwrap();
    assert!(guard.validate_parent_in(&db, &grandchild, &root).is_ok());

    let err = guard.validate_parent_in(&db, &root, &grandchild).unwrap_err();
    match err {
        HierarchyError::Cycle { path } => {
            assert_eq!(path, vec![root.clone(), grandchild, child, root]);
        }
        other => panic!("Expected Cycle, got {:?}", other),
    }
}

#[test]
#[serial]
fn test_failed_batch_leaves_database_untouched() {
    let db = backend();
    reset(&db);

    let migration = find_migration(MIGRATIONS[0].version).unwrap();
    let mut plan = migration.apply_plan();
    // A repeated CREATE TYPE fails after everything before it succeeded.
    plan.push(plan[0].clone());

    let err = db.apply(&plan).unwrap_err();
    assert!(matches!(err, DbError::StatementFailed { .. }));
    assert!(db.list_tables().unwrap().is_empty());
    assert!(db.list_enum_types().unwrap().is_empty());
}
