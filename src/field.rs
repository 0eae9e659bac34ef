//! Column definitions and foreign key references.
//!
//! ```rust
//! use schemashift::prelude::*;
//!
//! let owner = FieldSpec::new("owner_id", DataType::Integer)
//!     .not_null()
//!     .references(FieldReference::new("users", "id").on_delete(Action::Cascade));
//!
//! assert_eq!(
//!     owner.to_string(),
//!     "owner_id integer NOT NULL REFERENCES users(id) ON DELETE CASCADE ON UPDATE NO ACTION"
//! );
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ShiftError;
use crate::parser;
use crate::types::DataType;

/// Referential action taken when a referenced row is deleted or updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Action {
    #[default]
    NoAction,
    Cascade,
    SetNull,
    SetDefault,
}

impl Action {
    pub const ALL: [Action; 4] = [
        Self::NoAction,
        Self::Cascade,
        Self::SetNull,
        Self::SetDefault,
    ];

    /// The SQL keyword for this action.
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::NoAction => "NO ACTION",
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for Action {
    type Err = ShiftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parser::parse_action(s)
    }
}

impl TryFrom<String> for Action {
    type Error = ShiftError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Action> for String {
    fn from(value: Action) -> Self {
        value.keyword().to_string()
    }
}

/// A column that knows the table it belongs to.
///
/// Usually implemented by a per-table enum of column names so references
/// can be built without repeating string literals.
///
/// ```rust
/// use schemashift::prelude::*;
///
/// enum UserField {
///     Id,
/// }
///
/// impl TableField for UserField {
///     const TABLE_NAME: &'static str = "users";
///
///     fn field_name(&self) -> &str {
///         match self {
///             UserField::Id => "id",
///         }
///     }
/// }
///
/// let reference = FieldReference::to_field(&UserField::Id);
/// assert_eq!(reference.table(), "users");
/// assert_eq!(reference.field(), "id");
/// ```
pub trait TableField {
    const TABLE_NAME: &'static str;

    fn field_name(&self) -> &str;
}

/// Foreign key target of a column.
///
/// Table and field names are rendered verbatim; nothing here checks them
/// against a real schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldReference {
    table: String,
    field: String,
    #[serde(default)]
    on_delete: Action,
    #[serde(default)]
    on_update: Action,
}

impl FieldReference {
    /// Reference `table(field)` with `NO ACTION` on delete and update.
    pub fn new(table: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            field: field.into(),
            on_delete: Action::NoAction,
            on_update: Action::NoAction,
        }
    }

    /// Reference a typed column.
    pub fn to_field<F: TableField>(field: &F) -> Self {
        Self::new(F::TABLE_NAME, field.field_name())
    }

    pub fn on_delete(mut self, action: Action) -> Self {
        self.on_delete = action;
        self
    }

    pub fn on_update(mut self, action: Action) -> Self {
        self.on_update = action;
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn delete_action(&self) -> Action {
        self.on_delete
    }

    pub fn update_action(&self) -> Action {
        self.on_update
    }
}

/// A single column definition.
///
/// Built with [`FieldSpec::new`] for ordinary columns or
/// [`FieldSpec::primary_key`] for a single-column primary key. A primary
/// key spec always keeps `allow_null = true`, `is_unique = false` and no
/// reference: `PRIMARY KEY` already implies the rest, so those clauses are
/// never rendered for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FieldSpecDef", into = "FieldSpecDef")]
pub struct FieldSpec {
    name: String,
    data_type: DataType,
    allow_null: bool,
    is_unique: bool,
    is_primary_key: bool,
    references: Option<FieldReference>,
}

impl FieldSpec {
    /// Create a nullable, non-unique column.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            allow_null: true,
            is_unique: false,
            is_primary_key: false,
            references: None,
        }
    }

    /// Create a primary key column.
    pub fn primary_key(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            is_primary_key: true,
            ..Self::new(name, data_type)
        }
    }

    /// Mark the column `NOT NULL`. No effect on primary keys.
    pub fn not_null(mut self) -> Self {
        if self.ignores_modifier("not_null") {
            return self;
        }
        self.allow_null = false;
        self
    }

    /// Mark the column `UNIQUE`. No effect on primary keys.
    pub fn unique(mut self) -> Self {
        if self.ignores_modifier("unique") {
            return self;
        }
        self.is_unique = true;
        self
    }

    /// Add a foreign key reference. No effect on primary keys.
    pub fn references(mut self, reference: FieldReference) -> Self {
        if self.ignores_modifier("references") {
            return self;
        }
        self.references = Some(reference);
        self
    }

    fn ignores_modifier(&self, modifier: &str) -> bool {
        if self.is_primary_key {
            tracing::warn!(
                "Ignoring {}() on primary key field '{}'",
                modifier,
                self.name
            );
        }
        self.is_primary_key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn allow_null(&self) -> bool {
        self.allow_null
    }

    pub fn is_unique(&self) -> bool {
        self.is_unique
    }

    pub fn is_primary_key(&self) -> bool {
        self.is_primary_key
    }

    pub fn reference(&self) -> Option<&FieldReference> {
        self.references.as_ref()
    }
}

impl fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use crate::transpiler::ToSql;
        f.write_str(&self.to_sql())
    }
}

/// Serialized form of a [`FieldSpec`] in plan files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct FieldSpecDef {
    name: String,
    #[serde(rename = "type")]
    data_type: DataType,
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    allow_null: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    unique: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    primary_key: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    references: Option<FieldReference>,
}

fn default_true() -> bool {
    true
}

fn is_true(value: &bool) -> bool {
    *value
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl TryFrom<FieldSpecDef> for FieldSpec {
    type Error = ShiftError;

    fn try_from(def: FieldSpecDef) -> Result<Self, Self::Error> {
        if !def.primary_key {
            let mut spec = FieldSpec::new(def.name, def.data_type);
            spec.allow_null = def.allow_null;
            spec.is_unique = def.unique;
            spec.references = def.references;
            return Ok(spec);
        }

        if !def.allow_null {
            return Err(ShiftError::conflicting(
                def.name,
                "primary key cannot also set allow_null",
            ));
        }
        if def.unique {
            return Err(ShiftError::conflicting(
                def.name,
                "primary key cannot also be unique",
            ));
        }
        if def.references.is_some() {
            return Err(ShiftError::conflicting(
                def.name,
                "primary key cannot also reference another table",
            ));
        }

        Ok(FieldSpec::primary_key(def.name, def.data_type))
    }
}

impl From<FieldSpec> for FieldSpecDef {
    fn from(spec: FieldSpec) -> Self {
        Self {
            name: spec.name,
            data_type: spec.data_type,
            allow_null: spec.allow_null,
            unique: spec.is_unique,
            primary_key: spec.is_primary_key,
            references: spec.references,
        }
    }
}
