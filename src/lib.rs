//! # schemashift
//!
//! > **Schema changes as values. SQL on demand.**
//!
//! Describe a migration step as a typed value and let it render its own
//! forward statement and, when one exists, its revert statement.
//!
//! ## Quick Example
//!
//! ```rust
//! use schemashift::prelude::*;
//!
//! let change = AddColumn::new("users", FieldSpec::new("age", DataType::Integer));
//!
//! assert_eq!(change.forward_query(), "ALTER TABLE users ADD COLUMN age integer");
//! assert_eq!(
//!     change.revert_query().as_deref(),
//!     Some("ALTER TABLE users DROP COLUMN age")
//! );
//! ```
//!
//! ## Changes
//!
//! | Change        | Forward                          | Revert                         |
//! |---------------|----------------------------------|--------------------------------|
//! | `CreateTable` | `CREATE TABLE t (...)`           | `DROP TABLE t`                 |
//! | `AddColumn`   | `ALTER TABLE t ADD COLUMN c ...` | `ALTER TABLE t DROP COLUMN c`  |
//! | `InsertRow`   | `INSERT INTO t VALUES (...)`     | none                           |
//!
//! Running the statements, ordering them and recording which ones ran is
//! left to the caller.

pub mod change;
pub mod config;
pub mod constraint;
pub mod error;
pub mod field;
pub mod parser;
pub mod plan;
pub mod transpiler;
pub mod types;

pub mod prelude {
    pub use crate::change::{AddColumn, Change, CreateTable, DatabaseChange, InsertRow};
    pub use crate::config::{Config, OutputFormat};
    pub use crate::constraint::{Constraint, ConstraintKind};
    pub use crate::error::*;
    pub use crate::field::{Action, FieldReference, FieldSpec, TableField};
    pub use crate::plan::{MigrationPlan, RenderedChange};
    pub use crate::transpiler::ToSql;
    pub use crate::types::DataType;
}

/// Load a plan file.
///
/// # Example
///
/// ```no_run
/// let plan = schemashift::load_plan("migrations/20261017093005_users.toml").unwrap();
/// for sql in plan.forward_statements() {
///     println!("{};", sql);
/// }
/// ```
pub fn load_plan(path: impl AsRef<std::path::Path>) -> error::ShiftResult<plan::MigrationPlan> {
    plan::MigrationPlan::load(path)
}
