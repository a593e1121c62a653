//! Not-null and uniqueness checks
//!
//! These look beyond the change under test: either at the other changes of
//! the same change set, or at the nullability recorded in the schema store.

use super::{ChangeValidator, ValidationIssue};
use crate::error::{required, LintError};
use crate::model::{Change, ChangeRef, ColumnConfig};
use crate::state::SchemaStore;
use crate::util::split_names;

const TENANT_ID: &str = "tenant_id";

fn declares_column(change: &Change, table: Option<&str>, column: Option<&str>) -> bool {
    let columns = match change {
        Change::AddColumn(c) if c.table_name.as_deref() == table => &c.columns,
        Change::CreateTable(c) if c.table_name.as_deref() == table => &c.columns,
        _ => return false,
    };
    columns.iter().any(|c| c.name.is_some() && c.name.as_deref() == column)
}

/// Columns cannot become not-null without a default value
#[derive(Debug, Clone, Copy, Default)]
pub struct NotNullConstraintValidator;

impl ChangeValidator for NotNullConstraintValidator {
    fn name(&self) -> &'static str {
        "notNullConstraint"
    }

    fn validate(
        &mut self,
        change: ChangeRef<'_>,
        _store: &SchemaStore,
    ) -> Result<Vec<ValidationIssue>, LintError> {
        let mut issues = Vec::new();
        match change.change {
            Change::AddNotNullConstraint(c) => {
                let table = c.table_name.as_deref();
                let column = c.column_name.as_deref();
                // a column created earlier in the same change set holds no rows yet
                let created_here = change
                    .preceding()
                    .iter()
                    .any(|earlier| declares_column(earlier, table, column));
                if c.default_null_value.is_none() && !created_here {
                    issues.push(ValidationIssue::for_change(
                        change,
                        Some("defaultNullValue"),
                        "You can not add not nullable constraint without a default value.",
                    ));
                }
            }
            Change::AddColumn(c) => {
                for column in &c.columns {
                    let not_null = column
                        .constraints
                        .as_ref()
                        .is_some_and(|constraints| constraints.nullable == Some(false));
                    if not_null && !column.has_default_value() {
                        issues.push(ValidationIssue::for_change_element(
                            change,
                            "column",
                            None,
                            "You can not add not nullable columns without a default value.",
                        ));
                    }
                }
            }
            _ => {}
        }
        Ok(issues)
    }
}

/// A `tenant_id` column must end up not-null within its change set
#[derive(Debug, Clone, Copy, Default)]
pub struct TenantIdNotNullValidator;

impl TenantIdNotNullValidator {
    fn made_not_null_later(change: ChangeRef<'_>, table: Option<&str>) -> bool {
        change.following().iter().any(|later| match later {
            Change::AddNotNullConstraint(c) => {
                c.column_name.as_deref() == Some(TENANT_ID) && c.table_name.as_deref() == table
            }
            _ => false,
        })
    }
}

impl ChangeValidator for TenantIdNotNullValidator {
    fn name(&self) -> &'static str {
        "tenantIdNotNull"
    }

    fn validate(
        &mut self,
        change: ChangeRef<'_>,
        _store: &SchemaStore,
    ) -> Result<Vec<ValidationIssue>, LintError> {
        let (table, columns): (Option<&str>, &[ColumnConfig]) = match change.change {
            Change::AddColumn(c) => (c.table_name.as_deref(), &c.columns),
            Change::CreateTable(c) => (c.table_name.as_deref(), &c.columns),
            _ => return Ok(Vec::new()),
        };
        let Some(tenant) = columns.iter().find(|c| c.is_named(TENANT_ID)) else {
            return Ok(Vec::new());
        };
        if tenant.is_nullable() && !Self::made_not_null_later(change, table) {
            return Ok(vec![ValidationIssue::for_change_element(
                change,
                "column",
                None,
                "tenant_id column must be not nullable",
            )]);
        }
        Ok(Vec::new())
    }
}

/// Unique constraints cannot cover columns the store knows to be nullable
#[derive(Debug, Clone, Copy, Default)]
pub struct AddUniqueValidator;

impl ChangeValidator for AddUniqueValidator {
    fn name(&self) -> &'static str {
        "addUnique"
    }

    fn validate(
        &mut self,
        change: ChangeRef<'_>,
        store: &SchemaStore,
    ) -> Result<Vec<ValidationIssue>, LintError> {
        let Change::AddUniqueConstraint(c) = change.change else {
            return Ok(Vec::new());
        };
        let table = required(&c.table_name, change.element_name(), "tableName")?;
        let nullable: Vec<&str> = c
            .column_names
            .as_deref()
            .map(split_names)
            .into_iter()
            .flatten()
            .filter(|column| store.column(table, column).is_some_and(|state| state.nullable))
            .collect();
        if nullable.is_empty() {
            return Ok(Vec::new());
        }
        let mut message = String::from("Unique constraint");
        if let Some(name) = &c.constraint_name {
            message.push_str(&format!(" '{}'", name));
        }
        message.push_str(&format!(
            " can not include nullable columns {} for table '{}'.",
            nullable.join(", "),
            table
        ));
        Ok(vec![ValidationIssue::for_change(
            change,
            Some("columnNames"),
            message,
        )])
    }
}
