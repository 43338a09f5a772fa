//! All table definitions of the HR schema.
//!
//! `ALL_TABLES` lists the 27 tables in creation order: every table appears
//! after the tables it references (hierarchy self-references aside). Foreign
//! keys themselves are declared in `constraints.rs`.

use super::definition::{DataType, DefaultValue, PrimaryKey, SchemaColumn, SchemaTable};
use super::enums::*;

const VARCHAR: DataType = DataType::Varchar(None);
const UUID: DataType = DataType::Uuid;
const BOOL_FALSE: DefaultValue = DefaultValue::Bool(false);

const fn req(name: &'static str, data_type: DataType) -> SchemaColumn {
    SchemaColumn::required(name, data_type)
}

const fn opt(name: &'static str, data_type: DataType) -> SchemaColumn {
    SchemaColumn::optional(name, data_type)
}

// ---------------------------------------------------------------------------
// Identity & access
// ---------------------------------------------------------------------------

pub const ROLES: SchemaTable = SchemaTable {
    name: "roles",
    primary_key: PrimaryKey::GeneratedUuid,
    columns: &[
        req("name", DataType::Varchar(Some(100))),
        opt("description", VARCHAR),
    ],
    audited: true,
    unique_keys: &[&["name"]],
};

/// Per-role capability flags over a named resource.
pub const PERMISSIONS: SchemaTable = SchemaTable {
    name: "permissions",
    primary_key: PrimaryKey::GeneratedUuid,
    columns: &[
        req("roleId", UUID),
        req("resource", DataType::Varchar(Some(100))),
        req("canRead", DataType::Boolean).with_default(BOOL_FALSE),
        req("canCreate", DataType::Boolean).with_default(BOOL_FALSE),
        req("canUpdate", DataType::Boolean).with_default(BOOL_FALSE),
        req("canDelete", DataType::Boolean).with_default(BOOL_FALSE),
        req("canApprove", DataType::Boolean).with_default(BOOL_FALSE),
    ],
    audited: true,
    unique_keys: &[&["roleId", "resource"]],
};

pub const USERS: SchemaTable = SchemaTable {
    name: "users",
    primary_key: PrimaryKey::GeneratedUuid,
    columns: &[
        req("email", VARCHAR),
        req("password", VARCHAR),
        req("status", DataType::Enum(&USERS_STATUS)).with_default(DefaultValue::Literal("Active")),
        opt("lastLoginAt", DataType::Timestamp),
    ],
    audited: true,
    unique_keys: &[&["email"]],
};

pub const USERS_ROLES: SchemaTable = SchemaTable {
    name: "users_roles",
    primary_key: PrimaryKey::Composite(&["userId", "roleId"]),
    columns: &[req("userId", UUID), req("roleId", UUID)],
    audited: false,
    unique_keys: &[],
};

/// Issued token pairs. The employee/department/project columns are
/// snapshots taken at login, not references.
pub const SESSIONS: SchemaTable = SchemaTable {
    name: "sessions",
    primary_key: PrimaryKey::GeneratedUuid,
    columns: &[
        req("accessToken", DataType::Text),
        req("refreshToken", DataType::Text),
        opt("userAgent", VARCHAR),
        opt("ipAddress", DataType::Varchar(Some(45))),
        req("expiresAt", DataType::Timestamp),
        req("userId", UUID),
        opt("employee", DataType::Jsonb),
        opt("department", DataType::Jsonb),
        opt("project", DataType::Jsonb),
        req("createdAt", DataType::Timestamp).with_default(DefaultValue::Now),
        req("updatedAt", DataType::Timestamp).with_default(DefaultValue::Now),
    ],
    audited: false,
    unique_keys: &[],
};

// ---------------------------------------------------------------------------
// Organization
// ---------------------------------------------------------------------------

pub const COMPANIES: SchemaTable = SchemaTable {
    name: "companies",
    primary_key: PrimaryKey::GeneratedUuid,
    columns: &[
        req("name", VARCHAR),
        opt("taxCode", DataType::Varchar(Some(50))),
        opt("address", VARCHAR),
        opt("phone", DataType::Varchar(Some(20))),
        opt("email", VARCHAR),
        opt("website", VARCHAR),
    ],
    audited: true,
    unique_keys: &[],
};

pub const MARKETS: SchemaTable = SchemaTable {
    name: "markets",
    primary_key: PrimaryKey::GeneratedUuid,
    columns: &[req("name", VARCHAR), opt("description", VARCHAR)],
    audited: true,
    unique_keys: &[],
};

pub const DEPARTMENTS: SchemaTable = SchemaTable {
    name: "departments",
    primary_key: PrimaryKey::GeneratedUuid,
    columns: &[
        req("name", VARCHAR),
        opt("code", DataType::Varchar(Some(50))),
        opt("description", VARCHAR),
        opt("parentId", UUID),
        opt("companyId", UUID),
    ],
    audited: true,
    unique_keys: &[],
};

pub const POSITIONS: SchemaTable = SchemaTable {
    name: "positions",
    primary_key: PrimaryKey::GeneratedUuid,
    columns: &[
        req("name", VARCHAR),
        opt("description", VARCHAR),
        opt("parentId", UUID),
    ],
    audited: true,
    unique_keys: &[],
};

// ---------------------------------------------------------------------------
// Workforce reference data
// ---------------------------------------------------------------------------

pub const DEGREES: SchemaTable = SchemaTable {
    name: "degrees",
    primary_key: PrimaryKey::GeneratedUuid,
    columns: &[req("name", VARCHAR)],
    audited: true,
    unique_keys: &[],
};

pub const SKILL_TYPES: SchemaTable = SchemaTable {
    name: "skill_types",
    primary_key: PrimaryKey::GeneratedUuid,
    columns: &[req("name", VARCHAR), opt("parentId", UUID)],
    audited: true,
    unique_keys: &[],
};

pub const SKILL_LEVELS: SchemaTable = SchemaTable {
    name: "skill_levels",
    primary_key: PrimaryKey::GeneratedUuid,
    columns: &[
        req("name", VARCHAR),
        req("level", DataType::Integer).with_default(DefaultValue::Int(1)),
        req("skillTypeId", UUID),
    ],
    audited: true,
    unique_keys: &[],
};

pub const LEAVE_TYPES: SchemaTable = SchemaTable {
    name: "leave_types",
    primary_key: PrimaryKey::GeneratedUuid,
    columns: &[
        req("name", VARCHAR),
        req("code", DataType::Varchar(Some(50))),
        req("daysPerYear", DataType::Double).with_default(DefaultValue::Int(0)),
        req("isPaid", DataType::Boolean).with_default(DefaultValue::Bool(true)),
    ],
    audited: true,
    unique_keys: &[&["code"]],
};

pub const HOLIDAYS: SchemaTable = SchemaTable {
    name: "holidays",
    primary_key: PrimaryKey::GeneratedUuid,
    columns: &[
        req("name", VARCHAR),
        req("date", DataType::Date),
        req("isRecurring", DataType::Boolean).with_default(BOOL_FALSE),
    ],
    audited: true,
    unique_keys: &[],
};

// ---------------------------------------------------------------------------
// Workforce
// ---------------------------------------------------------------------------

pub const EMPLOYEES: SchemaTable = SchemaTable {
    name: "employees",
    primary_key: PrimaryKey::GeneratedUuid,
    columns: &[
        req("employeeCode", DataType::Varchar(Some(50))),
        req("firstName", VARCHAR),
        req("lastName", VARCHAR),
        req("fullName", VARCHAR),
        opt("gender", DataType::Enum(&EMPLOYEES_GENDER)),
        opt("dateOfBirth", DataType::Date),
        opt("placeOfBirth", VARCHAR),
        opt("nationality", VARCHAR),
        opt("identityNumber", DataType::Varchar(Some(20))),
        opt("identityIssuedDate", DataType::Date),
        opt("identityIssuedPlace", VARCHAR),
        opt("phone", DataType::Varchar(Some(20))),
        opt("personalEmail", VARCHAR),
        opt("workEmail", VARCHAR),
        opt("address", VARCHAR),
        opt("permanentAddress", VARCHAR),
        opt("avatar", VARCHAR),
        opt("joinedDate", DataType::Date),
        opt("leftDate", DataType::Date),
        req("basicSalary", DataType::Double).with_default(DefaultValue::Int(0)),
        req("grossSalary", DataType::Double).with_default(DefaultValue::Int(0)),
        req("allowance", DataType::Double).with_default(DefaultValue::Int(0)),
        opt("bankName", VARCHAR),
        opt("bankAccount", DataType::Varchar(Some(50))),
        opt("bankBranch", VARCHAR),
        opt("taxCode", DataType::Varchar(Some(50))),
        opt("socialInsuranceNumber", DataType::Varchar(Some(50))),
        opt("healthInsuranceNumber", DataType::Varchar(Some(50))),
        opt("userId", UUID),
        opt("positionId", UUID),
        opt("companyId", UUID),
    ],
    audited: true,
    unique_keys: &[&["employeeCode"], &["userId"]],
};

pub const EMPLOYEES_DEPARTMENTS: SchemaTable = SchemaTable {
    name: "employees_departments",
    primary_key: PrimaryKey::GeneratedUuid,
    columns: &[
        req("employeeId", UUID),
        req("departmentId", UUID),
        req("isManager", DataType::Boolean).with_default(BOOL_FALSE),
    ],
    audited: true,
    unique_keys: &[&["employeeId", "departmentId"]],
};

pub const CONTRACTS: SchemaTable = SchemaTable {
    name: "contracts",
    primary_key: PrimaryKey::GeneratedUuid,
    columns: &[
        req("no", DataType::Varchar(Some(50))),
        req("type", DataType::Enum(&CONTRACTS_TYPE)),
        req("status", DataType::Enum(&CONTRACTS_STATUS))
            .with_default(DefaultValue::Literal("Pending")),
        req("workingType", DataType::Enum(&CONTRACTS_WORKING_TYPE))
            .with_default(DefaultValue::Literal("Full-time")),
        req("startDate", DataType::Date),
        opt("endDate", DataType::Date),
        req("salary", DataType::Double).with_default(DefaultValue::Int(0)),
        opt("note", DataType::Text),
        req("employeeId", UUID),
    ],
    audited: true,
    unique_keys: &[&["no"]],
};

pub const EMPLOYEE_CHILDREN: SchemaTable = SchemaTable {
    name: "employee_children",
    primary_key: PrimaryKey::GeneratedUuid,
    columns: &[
        req("fullName", VARCHAR),
        opt("dateOfBirth", DataType::Date),
        opt("gender", DataType::Enum(&EMPLOYEES_GENDER)),
        req("employeeId", UUID),
    ],
    audited: true,
    unique_keys: &[],
};

pub const EDUCATIONS: SchemaTable = SchemaTable {
    name: "educations",
    primary_key: PrimaryKey::GeneratedUuid,
    columns: &[
        req("school", VARCHAR),
        opt("major", VARCHAR),
        opt("fromYear", DataType::Integer),
        opt("toYear", DataType::Integer),
        req("employeeId", UUID),
        opt("degreeId", UUID),
    ],
    audited: true,
    unique_keys: &[],
};

pub const SKILLS: SchemaTable = SchemaTable {
    name: "skills",
    primary_key: PrimaryKey::GeneratedUuid,
    columns: &[
        opt("note", VARCHAR),
        req("employeeId", UUID),
        req("skillLevelId", UUID),
    ],
    audited: true,
    unique_keys: &[],
};

// ---------------------------------------------------------------------------
// Leave management
// ---------------------------------------------------------------------------

pub const LEAVE_REQUESTS: SchemaTable = SchemaTable {
    name: "leave_requests",
    primary_key: PrimaryKey::GeneratedUuid,
    columns: &[
        req("startDate", DataType::Date),
        req("endDate", DataType::Date),
        req("leavePeriod", DataType::Enum(&LEAVE_REQUESTS_PERIOD))
            .with_default(DefaultValue::Literal("Full day")),
        req("numberOfDays", DataType::Double),
        opt("reason", DataType::Text),
        req("status", DataType::Enum(&LEAVE_REQUESTS_STATUS))
            .with_default(DefaultValue::Literal("Pending")),
        opt("rejectReason", DataType::Text),
        req("requesterId", UUID),
        opt("approverId", UUID),
        req("leaveTypeId", UUID),
    ],
    audited: true,
    unique_keys: &[],
};

/// Per-employee, per-leave-type, per-year balance.
pub const REMAINING_ANNUAL_LEAVES: SchemaTable = SchemaTable {
    name: "remaining_annual_leaves",
    primary_key: PrimaryKey::GeneratedUuid,
    columns: &[
        req("year", DataType::Integer),
        req("totalDays", DataType::Double).with_default(DefaultValue::Int(0)),
        req("usedDays", DataType::Double).with_default(DefaultValue::Int(0)),
        req("remainingDays", DataType::Double).with_default(DefaultValue::Int(0)),
        req("status", DataType::Enum(&REMAINING_ANNUAL_LEAVES_STATUS))
            .with_default(DefaultValue::Literal("Active")),
        req("employeeId", UUID),
        req("leaveTypeId", UUID),
    ],
    audited: true,
    unique_keys: &[&["employeeId", "leaveTypeId", "year"]],
};

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

pub const PROJECTS: SchemaTable = SchemaTable {
    name: "projects",
    primary_key: PrimaryKey::GeneratedUuid,
    columns: &[
        req("name", VARCHAR),
        req("code", DataType::Varchar(Some(50))),
        opt("description", DataType::Text),
        req("type", DataType::Enum(&PROJECTS_TYPE)).with_default(DefaultValue::Literal("Internal")),
        req("status", DataType::Enum(&PROJECTS_STATUS))
            .with_default(DefaultValue::Literal("Planning")),
        opt("startDate", DataType::Date),
        opt("endDate", DataType::Date),
        opt("accountManagerId", UUID),
        opt("projectManagerId", UUID),
        opt("departmentId", UUID),
        opt("marketId", UUID),
    ],
    audited: true,
    unique_keys: &[&["code"]],
};

pub const PROJECTS_EMPLOYEES: SchemaTable = SchemaTable {
    name: "projects_employees",
    primary_key: PrimaryKey::GeneratedUuid,
    columns: &[
        req("projectId", UUID),
        req("employeeId", UUID),
        req("isManager", DataType::Boolean).with_default(BOOL_FALSE),
        // Percentage of working time
        req("allocation", DataType::Integer).with_default(DefaultValue::Int(100)),
        opt("joinedAt", DataType::Date),
        opt("leftAt", DataType::Date),
    ],
    audited: true,
    unique_keys: &[&["projectId", "employeeId"]],
};

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// `contentId` points at a row of the table named by `contentType`, so it
/// carries no foreign key.
pub const NOTIFICATIONS: SchemaTable = SchemaTable {
    name: "notifications",
    primary_key: PrimaryKey::GeneratedUuid,
    columns: &[
        req("title", VARCHAR),
        opt("content", DataType::Text),
        req("contentType", DataType::Enum(&NOTIFICATIONS_CONTENT_TYPE)),
        opt("contentId", UUID),
        req("isRead", DataType::Boolean).with_default(BOOL_FALSE),
        opt("readAt", DataType::Timestamp),
        req("assigneeId", UUID),
    ],
    audited: true,
    unique_keys: &[],
};

pub const GROUP_NOTIFICATIONS: SchemaTable = SchemaTable {
    name: "group_notifications",
    primary_key: PrimaryKey::GeneratedUuid,
    columns: &[
        req("title", VARCHAR),
        opt("content", DataType::Text),
        req("type", DataType::Enum(&GROUP_NOTIFICATIONS_TYPE)),
        opt("sentAt", DataType::Timestamp),
    ],
    audited: true,
    unique_keys: &[],
};

pub const EMPLOYEES_GROUP_NOTIFICATIONS: SchemaTable = SchemaTable {
    name: "employees_group_notifications",
    primary_key: PrimaryKey::Composite(&["employeeId", "groupNotificationId"]),
    columns: &[req("employeeId", UUID), req("groupNotificationId", UUID)],
    audited: false,
    unique_keys: &[],
};

/// All tables, parents before children.
pub const ALL_TABLES: &[&SchemaTable] = &[
    &ROLES,
    &PERMISSIONS,
    &USERS,
    &USERS_ROLES,
    &SESSIONS,
    &COMPANIES,
    &MARKETS,
    &DEPARTMENTS,
    &POSITIONS,
    &DEGREES,
    &SKILL_TYPES,
    &SKILL_LEVELS,
    &LEAVE_TYPES,
    &HOLIDAYS,
    &EMPLOYEES,
    &EMPLOYEES_DEPARTMENTS,
    &CONTRACTS,
    &EMPLOYEE_CHILDREN,
    &EDUCATIONS,
    &SKILLS,
    &LEAVE_REQUESTS,
    &REMAINING_ANNUAL_LEAVES,
    &PROJECTS,
    &PROJECTS_EMPLOYEES,
    &NOTIFICATIONS,
    &GROUP_NOTIFICATIONS,
    &EMPLOYEES_GROUP_NOTIFICATIONS,
];

/// Look up a table by name.
pub fn find_table(name: &str) -> Option<&'static SchemaTable> {
    ALL_TABLES.iter().copied().find(|t| t.name == name)
}
