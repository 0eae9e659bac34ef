//! Named table-level constraints.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of a table constraint.
///
/// Column order is kept as given: it is part of what the constraint means.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    /// UNIQUE over one or more columns
    Unique(Vec<String>),
}

/// A named table constraint, rendered as `CONSTRAINT <name> ...`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
    name: String,
    #[serde(flatten)]
    kind: ConstraintKind,
}

impl Constraint {
    pub fn new(name: impl Into<String>, kind: ConstraintKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Composite uniqueness over `columns`, in order.
    pub fn unique<I, S>(name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            name,
            ConstraintKind::Unique(columns.into_iter().map(Into::into).collect()),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ConstraintKind {
        &self.kind
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use crate::transpiler::ToSql;
        f.write_str(&self.to_sql())
    }
}
