//! Migration plan files.
//!
//! A plan is an ordered list of changes stored as TOML:
//!
//! ```toml
//! name = "create_users"
//!
//! [[change]]
//! kind = "create_table"
//! name = "users"
//!
//! [[change.fields]]
//! name = "id"
//! type = "serial"
//! primary_key = true
//!
//! [[change]]
//! kind = "insert_row"
//! table = "users"
//! values = ["DEFAULT"]
//! ```
//!
//! Forward statements come out in plan order, revert statements in reverse
//! plan order.

use std::path::Path;

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::change::{Change, DatabaseChange};
use crate::error::{ShiftError, ShiftResult};

/// An ordered list of changes with optional metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationPlan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "change", default)]
    pub changes: Vec<Change>,
}

/// One change rendered for display or JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedChange {
    pub index: usize,
    pub kind: &'static str,
    pub forward: String,
    pub revert: Option<String>,
}

impl MigrationPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn change(mut self, change: impl Into<Change>) -> Self {
        self.changes.push(change.into());
        self
    }

    /// Parse a plan from TOML text.
    pub fn from_toml_str(content: &str) -> ShiftResult<Self> {
        let plan: MigrationPlan =
            toml::from_str(content).map_err(|e| ShiftError::Plan(e.to_string()))?;
        tracing::debug!("Parsed plan with {} change(s)", plan.changes.len());
        Ok(plan)
    }

    /// Load a plan file.
    pub fn load(path: impl AsRef<Path>) -> ShiftResult<Self> {
        let path = path.as_ref();
        tracing::debug!("Loading plan from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Forward statements in plan order.
    pub fn forward_statements(&self) -> Vec<String> {
        self.changes.iter().map(|c| c.forward_query()).collect()
    }

    /// Revert statements in reverse plan order.
    ///
    /// Fails on the first change (walking backwards) that has no revert.
    pub fn revert_statements(&self) -> ShiftResult<Vec<String>> {
        self.changes
            .iter()
            .enumerate()
            .rev()
            .map(|(index, change)| {
                change.revert_query().ok_or_else(|| ShiftError::Irreversible {
                    index,
                    statement: change.forward_query(),
                })
            })
            .collect()
    }

    /// Revert statements in reverse plan order, skipping changes that
    /// cannot be reverted. Returns the statements and the skipped indices.
    pub fn revert_statements_lossy(&self) -> (Vec<String>, Vec<usize>) {
        let mut statements = Vec::new();
        let mut skipped = Vec::new();

        for (index, change) in self.changes.iter().enumerate().rev() {
            match change.revert_query() {
                Some(sql) => statements.push(sql),
                None => {
                    tracing::warn!("Skipping irreversible change #{} ({})", index, change.kind());
                    skipped.push(index);
                }
            }
        }

        (statements, skipped)
    }

    pub fn is_reversible(&self) -> bool {
        self.changes.iter().all(|c| c.is_reversible())
    }

    pub fn render(&self) -> Vec<RenderedChange> {
        self.changes
            .iter()
            .enumerate()
            .map(|(index, change)| RenderedChange {
                index,
                kind: change.kind(),
                forward: change.forward_query(),
                revert: change.revert_query(),
            })
            .collect()
    }

    /// Warnings about input the database is going to reject.
    ///
    /// Rendering never depends on this; the plan renders verbatim either way.
    pub fn lint(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.changes.is_empty() {
            warnings.push("plan has no changes".to_string());
        }

        for (index, change) in self.changes.iter().enumerate() {
            match change {
                Change::CreateTable(table) => {
                    if table.name().is_empty() {
                        warnings.push(format!("change #{}: empty table name", index));
                    }
                    if table.fields().is_empty() {
                        warnings.push(format!(
                            "change #{}: table '{}' has no fields",
                            index,
                            table.name()
                        ));
                    }
                    for field in table.fields() {
                        lint_field(index, field, &mut warnings);
                    }
                    for column in table.primary_key_columns() {
                        if !table.fields().iter().any(|f| f.name() == column) {
                            warnings.push(format!(
                                "change #{}: primary key column '{}' is not a field of '{}'",
                                index,
                                column,
                                table.name()
                            ));
                        }
                    }
                }
                Change::AddColumn(add) => {
                    if add.table().is_empty() {
                        warnings.push(format!("change #{}: empty table name", index));
                    }
                    lint_field(index, add.spec(), &mut warnings);
                }
                Change::InsertRow(insert) => {
                    if insert.table().is_empty() {
                        warnings.push(format!("change #{}: empty table name", index));
                    }
                    if insert.values().is_empty() {
                        warnings.push(format!("change #{}: insert without values", index));
                    }
                }
            }
        }

        warnings
    }
}

fn lint_field(index: usize, field: &crate::field::FieldSpec, warnings: &mut Vec<String>) {
    if field.name().is_empty() {
        warnings.push(format!("change #{}: empty field name", index));
    }
    if let Some(reference) = field.reference() {
        if reference.table().is_empty() || reference.field().is_empty() {
            warnings.push(format!(
                "change #{}: field '{}' has an empty reference target",
                index,
                field.name()
            ));
        }
    }
}

/// File name and template body for a new plan.
pub fn scaffold<Tz: TimeZone>(name: &str, now: &DateTime<Tz>) -> (String, String)
where
    Tz::Offset: std::fmt::Display,
{
    let timestamp = now.format("%Y%m%d%H%M%S");
    let file_name = format!("{}_{}.toml", timestamp, name);
    let content = format!(
        "# Migration: {name}\n\
         # Created: {created}\n\
         name = \"{name}\"\n\
         \n\
         # [[change]]\n\
         # kind = \"create_table\"\n\
         # name = \"example\"\n\
         #\n\
         # [[change.fields]]\n\
         # name = \"id\"\n\
         # type = \"serial\"\n\
         # primary_key = true\n",
        name = name,
        created = now.to_rfc3339(),
    );
    (file_name, content)
}
