//! Schema changes and their forward/revert statements.
//!
//! Each change is an immutable value that renders one complete SQL
//! statement to apply it and, when a safe inverse exists, one statement to
//! undo it. Statements carry no trailing terminator. Ordering, execution
//! and bookkeeping of applied changes belong to whoever runs them.
//!
//! ```rust
//! use schemashift::prelude::*;
//!
//! let users = CreateTable::new(
//!     "users",
//!     vec![
//!         FieldSpec::primary_key("id", DataType::Serial),
//!         FieldSpec::new("email", DataType::varchar(255)).not_null().unique(),
//!     ],
//! );
//!
//! assert_eq!(
//!     users.forward_query(),
//!     "CREATE TABLE users (id SERIAL PRIMARY KEY,email varchar(255) UNIQUE NOT NULL)"
//! );
//! assert_eq!(users.revert_query().as_deref(), Some("DROP TABLE users"));
//! ```

use serde::{Deserialize, Serialize};

use crate::constraint::Constraint;
use crate::field::FieldSpec;
use crate::transpiler::ToSql;

/// A single schema change that can render itself to SQL.
pub trait DatabaseChange {
    /// Statement that applies the change.
    fn forward_query(&self) -> String;

    /// Statement that undoes the change, if one exists.
    fn revert_query(&self) -> Option<String>;

    fn is_reversible(&self) -> bool {
        self.revert_query().is_some()
    }
}

/// `CREATE TABLE` with columns, an optional composite primary key and
/// named constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateTable {
    name: String,
    fields: Vec<FieldSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    primary_key: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    constraints: Vec<Constraint>,
}

impl CreateTable {
    pub fn new(name: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        Self {
            name: name.into(),
            fields,
            primary_key: Vec::new(),
            constraints: Vec::new(),
        }
    }

    /// Composite primary key, rendered after all columns.
    pub fn primary_key<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_key = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn primary_key_columns(&self) -> &[String] {
        &self.primary_key
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }
}

impl DatabaseChange for CreateTable {
    fn forward_query(&self) -> String {
        // Columns, then composite key, then constraints
        let mut defs: Vec<String> = self.fields.iter().map(|f| f.to_sql()).collect();
        if !self.primary_key.is_empty() {
            defs.push(format!("PRIMARY KEY ({})", self.primary_key.join(",")));
        }
        defs.extend(self.constraints.iter().map(|c| c.to_sql()));

        format!("CREATE TABLE {} ({})", self.name, defs.join(","))
    }

    fn revert_query(&self) -> Option<String> {
        Some(format!("DROP TABLE {}", self.name))
    }
}

/// `ALTER TABLE ... ADD COLUMN`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddColumn {
    table: String,
    #[serde(rename = "column")]
    spec: FieldSpec,
}

impl AddColumn {
    pub fn new(table: impl Into<String>, spec: FieldSpec) -> Self {
        Self {
            table: table.into(),
            spec,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn spec(&self) -> &FieldSpec {
        &self.spec
    }
}

impl DatabaseChange for AddColumn {
    fn forward_query(&self) -> String {
        format!("ALTER TABLE {} ADD COLUMN {}", self.table, self.spec.to_sql())
    }

    fn revert_query(&self) -> Option<String> {
        Some(format!(
            "ALTER TABLE {} DROP COLUMN {}",
            self.table,
            self.spec.name()
        ))
    }
}

/// `INSERT INTO ... VALUES (...)`.
///
/// Values are SQL literals inserted as given. Quoting and escaping is the
/// caller's job. There is no revert: without a key to target, a `DELETE`
/// could remove rows this change never inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InsertRow {
    table: String,
    values: Vec<String>,
}

impl InsertRow {
    pub fn new<I, S>(table: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            table: table.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }
}

impl DatabaseChange for InsertRow {
    fn forward_query(&self) -> String {
        format!(
            "INSERT INTO {} VALUES ({})",
            self.table,
            self.values.join(",")
        )
    }

    fn revert_query(&self) -> Option<String> {
        None
    }
}

/// Any supported change, as stored in a plan file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Change {
    CreateTable(CreateTable),
    AddColumn(AddColumn),
    InsertRow(InsertRow),
}

impl Change {
    /// Plan file name of the variant.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::CreateTable(_) => "create_table",
            Self::AddColumn(_) => "add_column",
            Self::InsertRow(_) => "insert_row",
        }
    }

    fn inner(&self) -> &dyn DatabaseChange {
        match self {
            Self::CreateTable(c) => c,
            Self::AddColumn(c) => c,
            Self::InsertRow(c) => c,
        }
    }
}

impl DatabaseChange for Change {
    fn forward_query(&self) -> String {
        self.inner().forward_query()
    }

    fn revert_query(&self) -> Option<String> {
        self.inner().revert_query()
    }
}

impl From<CreateTable> for Change {
    fn from(c: CreateTable) -> Self {
        Self::CreateTable(c)
    }
}

impl From<AddColumn> for Change {
    fn from(c: AddColumn) -> Self {
        Self::AddColumn(c)
    }
}

impl From<InsertRow> for Change {
    fn from(c: InsertRow) -> Self {
        Self::InsertRow(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Action, FieldReference};
    use crate::types::DataType;
    use pretty_assertions::assert_eq;

    fn users() -> CreateTable {
        CreateTable::new(
            "users",
            vec![
                FieldSpec::primary_key("id", DataType::Serial),
                FieldSpec::new("email", DataType::varchar(255))
                    .not_null()
                    .unique(),
            ],
        )
    }

    #[test]
    fn test_create_table() {
        assert_eq!(
            users().forward_query(),
            "CREATE TABLE users (id SERIAL PRIMARY KEY,email varchar(255) UNIQUE NOT NULL)"
        );
    }

    #[test]
    fn test_create_table_revert() {
        assert_eq!(users().revert_query(), Some("DROP TABLE users".to_string()));
        let other = CreateTable::new("audit_log", vec![]);
        assert_eq!(other.revert_query(), Some("DROP TABLE audit_log".to_string()));
    }

    #[test]
    fn test_composite_key_between_fields_and_constraints() {
        let table = CreateTable::new(
            "memberships",
            vec![
                FieldSpec::new("a", DataType::Integer).not_null(),
                FieldSpec::new("b", DataType::Integer).not_null(),
                FieldSpec::new("role", DataType::varchar(16)),
            ],
        )
        .constraint(Constraint::unique("uq_role", ["a", "role"]))
        .primary_key(["a", "b"]);

        assert_eq!(
            table.forward_query(),
            "CREATE TABLE memberships (a integer NOT NULL,b integer NOT NULL,role varchar(16),PRIMARY KEY (a,b),CONSTRAINT uq_role UNIQUE (a,role))"
        );
    }

    #[test]
    fn test_create_table_with_reference() {
        let table = CreateTable::new(
            "sessions",
            vec![
                FieldSpec::primary_key("id", DataType::Serial),
                FieldSpec::new("user_id", DataType::Integer).not_null().references(
                    FieldReference::new("users", "id")
                        .on_delete(Action::Cascade)
                        .on_update(Action::SetNull),
                ),
                FieldSpec::new("ip", DataType::IpAddress),
                FieldSpec::new("expires", DataType::TimestampWithTimeZone),
            ],
        );
        assert_eq!(
            table.forward_query(),
            "CREATE TABLE sessions (id SERIAL PRIMARY KEY,user_id integer NOT NULL REFERENCES users(id) ON DELETE CASCADE ON UPDATE SET NULL,ip inet,expires timestamp with time zone)"
        );
    }

    #[test]
    fn test_add_column() {
        let change = AddColumn::new("users", FieldSpec::new("age", DataType::Integer));
        assert_eq!(change.forward_query(), "ALTER TABLE users ADD COLUMN age integer");
    }

    #[test]
    fn test_add_column_revert_is_table_scoped() {
        let change = AddColumn::new("users", FieldSpec::new("age", DataType::Integer));
        assert_eq!(
            change.revert_query().as_deref(),
            Some("ALTER TABLE users DROP COLUMN age")
        );
    }

    #[test]
    fn test_insert_row() {
        let change = InsertRow::new("logs", ["1", "'x'"]);
        assert_eq!(change.forward_query(), "INSERT INTO logs VALUES (1,'x')");
        assert_eq!(change.revert_query(), None);
        assert!(!change.is_reversible());
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let changes: Vec<Change> = vec![
            users().into(),
            AddColumn::new("users", FieldSpec::new("bio", DataType::text())).into(),
            InsertRow::new("logs", ["2"]).into(),
        ];
        for change in &changes {
            assert_eq!(change.forward_query(), change.forward_query());
            assert_eq!(change.revert_query(), change.revert_query());
        }
    }

    #[test]
    fn test_change_delegates() {
        let change: Change = AddColumn::new("users", FieldSpec::new("age", DataType::Integer)).into();
        assert_eq!(change.kind(), "add_column");
        assert_eq!(change.forward_query(), "ALTER TABLE users ADD COLUMN age integer");
        assert!(change.is_reversible());

        let insert: Change = InsertRow::new("logs", ["1"]).into();
        assert_eq!(insert.kind(), "insert_row");
        assert!(!insert.is_reversible());
    }

    #[test]
    fn test_forward_query_has_no_terminator() {
        assert!(!users().forward_query().ends_with(';'));
    }
}
