//! Foreign keys and secondary indexes of the HR schema.
//!
//! Foreign keys are added after every table exists, so their order here only
//! matters for the statement lists: `down` drops them in reverse.

use super::definition::{ForeignKey, ReferentialAction, SchemaIndex};

use ReferentialAction::{Cascade, NoAction, SetNull};

pub const FOREIGN_KEYS: &[ForeignKey] = &[
    // Identity & access
    ForeignKey::new("permissions", "roleId", "roles", Cascade),
    ForeignKey::new("users_roles", "userId", "users", Cascade),
    ForeignKey::new("users_roles", "roleId", "roles", Cascade),
    ForeignKey::new("sessions", "userId", "users", Cascade),
    // Organization
    ForeignKey::new("departments", "parentId", "departments", SetNull),
    ForeignKey::new("departments", "companyId", "companies", SetNull),
    ForeignKey::new("positions", "parentId", "positions", SetNull),
    // Workforce reference data
    ForeignKey::new("skill_types", "parentId", "skill_types", Cascade),
    ForeignKey::new("skill_levels", "skillTypeId", "skill_types", Cascade),
    // Workforce
    ForeignKey::new("employees", "userId", "users", SetNull),
    ForeignKey::new("employees", "positionId", "positions", SetNull),
    ForeignKey::new("employees", "companyId", "companies", SetNull),
    ForeignKey::new("employees_departments", "employeeId", "employees", Cascade),
    ForeignKey::new("employees_departments", "departmentId", "departments", Cascade),
    ForeignKey::new("contracts", "employeeId", "employees", Cascade),
    ForeignKey::new("employee_children", "employeeId", "employees", Cascade),
    ForeignKey::new("educations", "employeeId", "employees", Cascade),
    ForeignKey::new("educations", "degreeId", "degrees", SetNull),
    ForeignKey::new("skills", "employeeId", "employees", Cascade),
    ForeignKey::new("skills", "skillLevelId", "skill_levels", Cascade),
    // Leave management
    ForeignKey::new("leave_requests", "requesterId", "employees", Cascade),
    ForeignKey::new("leave_requests", "approverId", "employees", SetNull),
    ForeignKey::new("leave_requests", "leaveTypeId", "leave_types", NoAction),
    ForeignKey::new("remaining_annual_leaves", "employeeId", "employees", Cascade),
    ForeignKey::new("remaining_annual_leaves", "leaveTypeId", "leave_types", Cascade),
    // Projects: managers are protected, not cascaded
    ForeignKey::new("projects", "accountManagerId", "employees", NoAction),
    ForeignKey::new("projects", "projectManagerId", "employees", NoAction),
    ForeignKey::new("projects", "departmentId", "departments", SetNull),
    ForeignKey::new("projects", "marketId", "markets", SetNull),
    ForeignKey::new("projects_employees", "projectId", "projects", Cascade),
    ForeignKey::new("projects_employees", "employeeId", "employees", Cascade),
    // Notifications
    ForeignKey::new("notifications", "assigneeId", "employees", Cascade),
    ForeignKey::new("employees_group_notifications", "employeeId", "employees", Cascade),
    ForeignKey::new(
        "employees_group_notifications",
        "groupNotificationId",
        "group_notifications",
        Cascade,
    ),
];

pub const INDEXES: &[SchemaIndex] = &[
    SchemaIndex {
        table: "users_roles",
        columns: &["userId"],
    },
    SchemaIndex {
        table: "users_roles",
        columns: &["roleId"],
    },
    SchemaIndex {
        table: "sessions",
        columns: &["userId"],
    },
    SchemaIndex {
        table: "employees",
        columns: &["fullName"],
    },
    SchemaIndex {
        table: "contracts",
        columns: &["employeeId"],
    },
    SchemaIndex {
        table: "leave_requests",
        columns: &["requesterId"],
    },
    SchemaIndex {
        table: "leave_requests",
        columns: &["status"],
    },
    SchemaIndex {
        table: "notifications",
        columns: &["assigneeId"],
    },
    SchemaIndex {
        table: "employees_group_notifications",
        columns: &["employeeId"],
    },
    SchemaIndex {
        table: "employees_group_notifications",
        columns: &["groupNotificationId"],
    },
];

/// Foreign keys declared on `table`.
pub fn foreign_keys_of(table: &str) -> impl Iterator<Item = &'static ForeignKey> + '_ {
    FOREIGN_KEYS.iter().filter(move |fk| fk.table == table)
}

/// Foreign keys pointing at `table` (self-references included).
pub fn foreign_keys_to(table: &str) -> impl Iterator<Item = &'static ForeignKey> + '_ {
    FOREIGN_KEYS.iter().filter(move |fk| fk.references == table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_names_unique() {
        let mut names: Vec<_> = FOREIGN_KEYS.iter().map(|fk| fk.constraint_name()).collect();
        names.extend(INDEXES.iter().map(|i| i.name()));
        let total = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn test_project_managers_are_not_cascaded() {
        let managers: Vec<_> = foreign_keys_of("projects")
            .filter(|fk| fk.references == "employees")
            .collect();
        assert_eq!(managers.len(), 2);
        assert!(managers.iter().all(|fk| fk.on_delete == NoAction));
    }

    #[test]
    fn test_foreign_keys_to_employees() {
        let referencing: Vec<_> = foreign_keys_to("employees").map(|fk| fk.table).collect();
        for table in [
            "contracts",
            "skills",
            "leave_requests",
            "employee_children",
            "remaining_annual_leaves",
            "educations",
            "projects",
        ] {
            assert!(referencing.contains(&table), "{} should reference employees", table);
        }
    }
}
