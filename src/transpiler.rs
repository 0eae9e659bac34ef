//! SQL fragment rendering.
//!
//! Converts column types, references, field specs and constraints into the
//! PostgreSQL text that [`DatabaseChange`](crate::change::DatabaseChange)
//! implementations stitch into whole statements. Rendering is pure and
//! total: malformed names are emitted verbatim and left for the database
//! to reject.

use crate::constraint::{Constraint, ConstraintKind};
use crate::field::{Action, FieldReference, FieldSpec};
use crate::types::DataType;

/// Trait for converting schema values to SQL.
pub trait ToSql {
    /// Convert this value to a SQL fragment.
    fn to_sql(&self) -> String;
}

impl ToSql for DataType {
    fn to_sql(&self) -> String {
        match self {
            DataType::String(Some(length)) => format!("varchar({})", length),
            DataType::String(None) => "varchar".to_string(),
            DataType::Timestamp => "timestamp".to_string(),
            DataType::TimestampWithTimeZone => "timestamp with time zone".to_string(),
            DataType::Interval => "interval".to_string(),
            DataType::IpAddress => "inet".to_string(),
            DataType::Date => "date".to_string(),
            DataType::Bool => "boolean".to_string(),
            DataType::Serial => "SERIAL".to_string(),
            DataType::Integer => "integer".to_string(),
            DataType::Double => "double precision".to_string(),
        }
    }
}

impl ToSql for Action {
    fn to_sql(&self) -> String {
        self.keyword().to_string()
    }
}

impl ToSql for FieldReference {
    fn to_sql(&self) -> String {
        format!(
            "REFERENCES {}({}) ON DELETE {} ON UPDATE {}",
            self.table(),
            self.field(),
            self.delete_action().to_sql(),
            self.update_action().to_sql()
        )
    }
}

impl ToSql for FieldSpec {
    fn to_sql(&self) -> String {
        let mut sql = format!("{} {}", self.name(), self.data_type().to_sql());

        if self.is_primary_key() {
            sql.push_str(" PRIMARY KEY");
        }
        if self.is_unique() {
            sql.push_str(" UNIQUE");
        }
        if !self.allow_null() {
            sql.push_str(" NOT NULL");
        }
        if let Some(reference) = self.reference() {
            sql.push(' ');
            sql.push_str(&reference.to_sql());
        }

        sql
    }
}

impl ToSql for Constraint {
    fn to_sql(&self) -> String {
        let mut sql = format!("CONSTRAINT {} ", self.name());
        match self.kind() {
            ConstraintKind::Unique(columns) => {
                sql.push_str("UNIQUE (");
                sql.push_str(&columns.join(","));
                sql.push(')');
            }
        }
        sql
    }
}
