//! Core schema definition types.
//!
//! Provides the typed vocabulary used to describe the relational schema:
//! enumerated types, columns, tables, indexes and foreign keys. The schema
//! itself lives in `enums.rs`, `tables.rs` and `constraints.rs` as `const`
//! data and is compiled to DDL by the compilers.

/// A closed set of string values enforced by the storage engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumType {
    /// Type name (e.g., "leave_requests_status_enum")
    pub name: &'static str,

    /// Permitted values, in declaration order
    pub values: &'static [&'static str],
}

impl EnumType {
    /// Returns true if `value` belongs to the declared set.
    pub fn accepts(&self, value: &str) -> bool {
        self.values.contains(&value)
    }
}

/// Represents a column data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Uuid,
    /// `character varying`, optionally length-limited
    Varchar(Option<u16>),
    Text,
    Integer,
    Double,
    Boolean,
    Date,
    /// Timestamp without time zone
    Timestamp,
    Jsonb,
    /// Column typed by a custom enumerated type
    Enum(&'static EnumType),
}

impl DataType {
    /// Returns the enum type backing this column, if any.
    pub fn enum_type(&self) -> Option<&'static EnumType> {
        match self {
            DataType::Enum(e) => Some(e),
            _ => None,
        }
    }
}

/// Column default expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    /// `gen_random_uuid()`
    GeneratedUuid,
    /// `now()`
    Now,
    Bool(bool),
    Int(i64),
    /// A quoted string literal (also used for enum defaults)
    Literal(&'static str),
}

/// Represents a column in a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaColumn {
    /// Column name, camelCase as stored (e.g., "employeeCode")
    pub name: &'static str,

    pub data_type: DataType,

    pub nullable: bool,

    /// Default value (if any). None means no default.
    pub default: Option<DefaultValue>,
}

impl SchemaColumn {
    /// A `NOT NULL` column without default.
    pub const fn required(name: &'static str, data_type: DataType) -> Self {
        Self {
            name,
            data_type,
            nullable: false,
            default: None,
        }
    }

    /// A nullable column without default.
    pub const fn optional(name: &'static str, data_type: DataType) -> Self {
        Self {
            name,
            data_type,
            nullable: true,
            default: None,
        }
    }

    pub const fn with_default(self, default: DefaultValue) -> Self {
        Self {
            default: Some(default),
            ..self
        }
    }
}

/// Generated `id` primary key column shared by every entity table.
pub static ID_COLUMN: SchemaColumn =
    SchemaColumn::required("id", DataType::Uuid).with_default(DefaultValue::GeneratedUuid);

/// Audit columns carried by soft-deletable entities.
///
/// A row is live while `deletedAt` is null.
pub static AUDIT_COLUMNS: [SchemaColumn; 6] = [
    SchemaColumn::required("createdAt", DataType::Timestamp).with_default(DefaultValue::Now),
    SchemaColumn::required("updatedAt", DataType::Timestamp).with_default(DefaultValue::Now),
    SchemaColumn::optional("deletedAt", DataType::Timestamp),
    SchemaColumn::optional("createdBy", DataType::Uuid),
    SchemaColumn::optional("updatedBy", DataType::Uuid),
    SchemaColumn::optional("deletedBy", DataType::Uuid),
];

/// Primary key shape of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryKey {
    /// Generated uuid `id` column (implicit, prepended to the column list)
    GeneratedUuid,
    /// Composite natural key over existing columns (pure join tables)
    Composite(&'static [&'static str]),
}

/// Represents a complete table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaTable {
    /// Table name (e.g., "employees")
    pub name: &'static str,

    pub primary_key: PrimaryKey,

    /// Domain columns, excluding the generated id and the audit block
    pub columns: &'static [SchemaColumn],

    /// Whether the table carries the soft-delete audit block
    pub audited: bool,

    /// Unique constraints, one column list each
    pub unique_keys: &'static [&'static [&'static str]],
}

impl SchemaTable {
    /// Returns all columns in creation order (id, domain columns, audit block).
    pub fn all_columns(&self) -> impl Iterator<Item = &SchemaColumn> {
        let id: &[SchemaColumn] = match self.primary_key {
            PrimaryKey::GeneratedUuid => std::slice::from_ref(&ID_COLUMN),
            PrimaryKey::Composite(_) => &[],
        };
        let audit: &[SchemaColumn] = if self.audited { &AUDIT_COLUMNS } else { &[] };
        id.iter().chain(self.columns.iter()).chain(audit.iter())
    }

    pub fn column(&self, name: &str) -> Option<&SchemaColumn> {
        self.all_columns().find(|c| c.name == name)
    }

    /// Returns the primary key column names.
    pub fn primary_key_columns(&self) -> &'static [&'static str] {
        match self.primary_key {
            PrimaryKey::GeneratedUuid => &["id"],
            PrimaryKey::Composite(columns) => columns,
        }
    }

    /// Enum types referenced by this table's columns, without duplicates.
    pub fn enum_types(&self) -> Vec<&'static EnumType> {
        let mut types: Vec<&'static EnumType> = Vec::new();
        for column in self.all_columns() {
            if let Some(e) = column.data_type.enum_type() {
                if !types.iter().any(|t| t.name == e.name) {
                    types.push(e);
                }
            }
        }
        types
    }

    /// True if `columns` is exactly the primary key or one of the unique keys.
    pub fn is_key(&self, columns: &[&str]) -> bool {
        self.primary_key_columns() == columns || self.unique_keys.iter().any(|k| *k == columns)
    }

    pub fn primary_key_name(&self) -> String {
        format!("pk_{}", self.name)
    }

    pub fn unique_key_name(&self, columns: &[&str]) -> String {
        format!("uq_{}_{}", self.name, lowercase_join(columns))
    }
}

/// Action taken on referencing rows when the referenced row changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum ReferentialAction {
    Cascade,
    SetNull,
    NoAction,
}

impl ReferentialAction {
    pub fn sql(&self) -> &'static str {
        match self {
            ReferentialAction::Cascade => "CASCADE",
            ReferentialAction::SetNull => "SET NULL",
            ReferentialAction::NoAction => "NO ACTION",
        }
    }
}

/// Single-column foreign key from `table.column` to `references.referenced_column`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKey {
    pub table: &'static str,
    pub column: &'static str,
    pub references: &'static str,
    pub referenced_column: &'static str,
    pub on_delete: ReferentialAction,
    pub on_update: ReferentialAction,
}

impl ForeignKey {
    /// Foreign key to the referenced table's `id`, `ON UPDATE NO ACTION`.
    pub const fn new(
        table: &'static str,
        column: &'static str,
        references: &'static str,
        on_delete: ReferentialAction,
    ) -> Self {
        Self {
            table,
            column,
            references,
            referenced_column: "id",
            on_delete,
            on_update: ReferentialAction::NoAction,
        }
    }

    pub fn constraint_name(&self) -> String {
        format!("fk_{}_{}", self.table, self.column.to_lowercase())
    }

    /// True for hierarchy links (`parentId` pointing back at the same table).
    pub fn is_self_reference(&self) -> bool {
        self.table == self.references
    }
}

/// Non-unique B-tree index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaIndex {
    pub table: &'static str,
    pub columns: &'static [&'static str],
}

impl SchemaIndex {
    pub fn name(&self) -> String {
        format!("idx_{}_{}", self.table, lowercase_join(self.columns))
    }
}

fn lowercase_join(columns: &[&str]) -> String {
    columns
        .iter()
        .map(|c| c.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUS: EnumType = EnumType {
        name: "things_status_enum",
        values: &["On", "Off"],
    };

    const THINGS: SchemaTable = SchemaTable {
        name: "things",
        primary_key: PrimaryKey::GeneratedUuid,
        columns: &[
            SchemaColumn::required("code", DataType::Varchar(Some(32))),
            SchemaColumn::required("status", DataType::Enum(&STATUS))
                .with_default(DefaultValue::Literal("On")),
            SchemaColumn::optional("previousStatus", DataType::Enum(&STATUS)),
        ],
        audited: true,
        unique_keys: &[&["code"]],
    };

    const THINGS_TAGS: SchemaTable = SchemaTable {
        name: "things_tags",
        primary_key: PrimaryKey::Composite(&["thingId", "tagId"]),
        columns: &[
            SchemaColumn::required("thingId", DataType::Uuid),
            SchemaColumn::required("tagId", DataType::Uuid),
        ],
        audited: false,
        unique_keys: &[],
    };

    #[test]
    fn test_enum_accepts_only_declared_values() {
        assert!(STATUS.accepts("On"));
        assert!(!STATUS.accepts("on"));
        assert!(!STATUS.accepts("Unknown"));
    }

    #[test]
    fn test_all_columns_prepends_id_and_appends_audit() {
        let names: Vec<_> = THINGS.all_columns().map(|c| c.name).collect();
        assert_eq!(names[0], "id");
        assert_eq!(&names[1..4], &["code", "status", "previousStatus"]);
        assert_eq!(names.len(), 4 + AUDIT_COLUMNS.len());
        assert_eq!(names.last(), Some(&"deletedBy"));
    }

    #[test]
    fn test_composite_table_has_no_implicit_columns() {
        let names: Vec<_> = THINGS_TAGS.all_columns().map(|c| c.name).collect();
        assert_eq!(names, vec!["thingId", "tagId"]);
        assert_eq!(THINGS_TAGS.primary_key_columns(), &["thingId", "tagId"]);
    }

    #[test]
    fn test_enum_types_deduplicated() {
        let types = THINGS.enum_types();
        assert_eq!(types.len(), 1);
        assert_eq!(types[0].name, "things_status_enum");
    }

    #[test]
    fn test_is_key() {
        assert!(THINGS.is_key(&["id"]));
        assert!(THINGS.is_key(&["code"]));
        assert!(!THINGS.is_key(&["status"]));
    }

    #[test]
    fn test_constraint_names_are_lowercased() {
        let fk = ForeignKey::new("things", "ownerId", "owners", ReferentialAction::Cascade);
        assert_eq!(fk.constraint_name(), "fk_things_ownerid");
        assert_eq!(fk.referenced_column, "id");
        assert_eq!(fk.on_update, ReferentialAction::NoAction);
        assert!(!fk.is_self_reference());

        let idx = SchemaIndex {
            table: "things_tags",
            columns: &["thingId"],
        };
        assert_eq!(idx.name(), "idx_things_tags_thingid");
        assert_eq!(THINGS.unique_key_name(&["code"]), "uq_things_code");
        assert_eq!(THINGS.primary_key_name(), "pk_things");
    }

    #[test]
    fn test_self_reference() {
        let fk = ForeignKey::new("things", "parentId", "things", ReferentialAction::SetNull);
        assert!(fk.is_self_reference());
    }
}
