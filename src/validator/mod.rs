//! Change and change set validators
//!
//! Validators run after the listeners have replayed a change onto the
//! [`SchemaStore`]. Most wrap the [`RuleEngine`](crate::rules::RuleEngine)
//! over a handful of evaluation contexts; the session scoped ones read and
//! extend the [`SessionState`] owned by the [`ValidatorFactory`].

mod changeset;
mod columns;
mod config;
mod context;
mod datatype;
mod factory;
mod identifiers;
mod issue;
mod nullability;
pub mod row_size;
mod session;
mod storage;
mod structure;

pub use changeset::{
    CheckSumValidator, DuplicatedIdValidator, ExpectedPath, FilePathValidator, IssueIdValidator,
};
pub use columns::{ColumnsValidator, OracleClobValidator, TypedValueValidator};
pub use config::{Limits, ValidatorConfig, DEFAULT_ISSUE_PATTERN};
pub use context::{EvaluationContext, Subject};
pub use datatype::{CopyColumnValidator, NewDataTypeValidator, OracleModifyDataTypeValidator};
pub use factory::{Scope, ValidatorFactory};
pub use identifiers::{
    ChangeFilter, FilterChangesValidator, LengthRangeValidator, LowerCaseValidator,
    NotPermittedValidator,
};
pub use issue::ValidationIssue;
pub use nullability::{AddUniqueValidator, NotNullConstraintValidator, TenantIdNotNullValidator};
pub use session::{IndexRegistry, SessionState};
pub use storage::{
    ColumnConstraintsValidator, CreateIndexValidator, DuplicatedIndexValidator, TableSizeValidator,
};
pub use structure::{
    DropColumnValidator, InsertColumnsValidator, InsertDataValidator, ReplaceViewValidator,
    SequenceValidator,
};

use crate::error::LintError;
use crate::model::{ChangeRef, ChangeSetRef};
use crate::state::SchemaStore;

/// Validates one change against the current schema state
pub trait ChangeValidator {
    /// Name used by the ignore set
    fn name(&self) -> &'static str;

    fn validate(
        &mut self,
        change: ChangeRef<'_>,
        store: &SchemaStore,
    ) -> Result<Vec<ValidationIssue>, LintError>;
}

/// Validates a change set as a whole, independently of its changes
pub trait ChangeSetValidator {
    /// Name used by the ignore set
    fn name(&self) -> &'static str;

    fn validate(&mut self, change_set: ChangeSetRef<'_>) -> Result<Vec<ValidationIssue>, LintError>;
}
