//! Enumerated types of the HR schema.

use super::definition::EnumType;

pub const USERS_STATUS: EnumType = EnumType {
    name: "users_status_enum",
    values: &["Active", "Inactive", "Blocked"],
};

pub const EMPLOYEES_GENDER: EnumType = EnumType {
    name: "employees_gender_enum",
    values: &["Male", "Female", "Other"],
};

pub const CONTRACTS_TYPE: EnumType = EnumType {
    name: "contracts_type_enum",
    values: &["Probation", "Fixed-term", "Indefinite", "Internship", "Collaborator"],
};

pub const CONTRACTS_STATUS: EnumType = EnumType {
    name: "contracts_status_enum",
    values: &["Pending", "Active", "Expired", "Terminated"],
};

pub const CONTRACTS_WORKING_TYPE: EnumType = EnumType {
    name: "contracts_workingtype_enum",
    values: &["Full-time", "Part-time", "Remote"],
};

pub const LEAVE_REQUESTS_STATUS: EnumType = EnumType {
    name: "leave_requests_status_enum",
    values: &["Pending", "Rejected", "Approved"],
};

pub const LEAVE_REQUESTS_PERIOD: EnumType = EnumType {
    name: "leave_requests_leaveperiod_enum",
    values: &["Full day", "Morning", "Afternoon"],
};

pub const REMAINING_ANNUAL_LEAVES_STATUS: EnumType = EnumType {
    name: "remaining_annual_leaves_status_enum",
    values: &["Active", "Expired"],
};

pub const PROJECTS_TYPE: EnumType = EnumType {
    name: "projects_type_enum",
    values: &["Internal", "External"],
};

pub const PROJECTS_STATUS: EnumType = EnumType {
    name: "projects_status_enum",
    values: &["Planning", "In progress", "Completed", "Cancelled"],
};

pub const NOTIFICATIONS_CONTENT_TYPE: EnumType = EnumType {
    name: "notifications_contenttype_enum",
    values: &["LeaveRequest", "Contract", "Project", "Birthday", "Announcement"],
};

pub const GROUP_NOTIFICATIONS_TYPE: EnumType = EnumType {
    name: "group_notifications_type_enum",
    values: &["Birthday", "Holiday", "Announcement"],
};

/// All enumerated types, in creation order.
pub const ALL_ENUMS: &[&EnumType] = &[
    &USERS_STATUS,
    &EMPLOYEES_GENDER,
    &CONTRACTS_TYPE,
    &CONTRACTS_STATUS,
    &CONTRACTS_WORKING_TYPE,
    &LEAVE_REQUESTS_STATUS,
    &LEAVE_REQUESTS_PERIOD,
    &REMAINING_ANNUAL_LEAVES_STATUS,
    &PROJECTS_TYPE,
    &PROJECTS_STATUS,
    &NOTIFICATIONS_CONTENT_TYPE,
    &GROUP_NOTIFICATIONS_TYPE,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_names_follow_table_column_convention() {
        for e in ALL_ENUMS {
            assert!(e.name.ends_with("_enum"), "{} lacks _enum suffix", e.name);
            assert_eq!(e.name, e.name.to_lowercase());
        }
    }

    #[test]
    fn test_leave_status_is_closed_set() {
        assert_eq!(LEAVE_REQUESTS_STATUS.values, &["Pending", "Rejected", "Approved"]);
        assert!(!LEAVE_REQUESTS_STATUS.accepts("Cancelled"));
    }

    #[test]
    fn test_no_duplicate_values() {
        for e in ALL_ENUMS {
            let mut values = e.values.to_vec();
            values.sort();
            values.dedup();
            assert_eq!(values.len(), e.values.len(), "duplicate value in {}", e.name);
        }
    }
}
