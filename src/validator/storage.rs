//! Validators backed by the simulated schema
//!
//! Row and key budgets use the DB2 byte counts of [`row_size`](super::row_size).

use super::row_size::{key_size, row_size};
use super::{ChangeValidator, IndexRegistry, ValidationIssue};
use crate::error::{required, LintError};
use crate::model::{Change, ChangeRef};
use crate::state::{ColumnState, ConstraintRef, SchemaStore, SearchKey};
use crate::util::remove_param;

fn constraint_list(constraints: &[ConstraintRef]) -> String {
    constraints
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// Row size
// ============================================================================

/// The known columns of a table must fit the row size limit
pub struct TableSizeValidator {
    row_size_limit: u64,
}

impl TableSizeValidator {
    pub fn new(row_size_limit: u64) -> Self {
        Self { row_size_limit }
    }
}

impl ChangeValidator for TableSizeValidator {
    fn name(&self) -> &'static str {
        "tableSize"
    }

    fn validate(
        &mut self,
        change: ChangeRef<'_>,
        store: &SchemaStore,
    ) -> Result<Vec<ValidationIssue>, LintError> {
        let Some(table) = change.change.table_name() else {
            return Ok(Vec::new());
        };
        let mut total: u64 = 0;
        for column in store.filter_by::<ColumnState>(SearchKey::table(table)) {
            total = total.saturating_add(row_size(column)?);
            if total > self.row_size_limit {
                let message = format!(
                    "Table {} with column {} exceeds the table limit of {}.",
                    table, column.name, self.row_size_limit
                );
                return Ok(vec![ValidationIssue::for_change(change, Some("column"), message)]);
            }
        }
        Ok(Vec::new())
    }
}

/// The key columns of a new index must fit the index key limit
pub struct CreateIndexValidator {
    max_key_length: u64,
}

impl CreateIndexValidator {
    pub fn new(max_key_length: u64) -> Self {
        Self { max_key_length }
    }
}

impl ChangeValidator for CreateIndexValidator {
    fn name(&self) -> &'static str {
        "createIndex"
    }

    fn validate(
        &mut self,
        change: ChangeRef<'_>,
        store: &SchemaStore,
    ) -> Result<Vec<ValidationIssue>, LintError> {
        let Change::CreateIndex(c) = change.change else {
            return Ok(Vec::new());
        };
        let table = required(&c.table_name, change.element_name(), "tableName")?;
        let mut total: u64 = 0;
        for name in c.columns.iter().filter_map(|column| column.name.as_deref()) {
            if let Some(column) = store.column(table, name) {
                total = total.saturating_add(key_size(column)?);
            }
        }
        if total <= self.max_key_length {
            return Ok(Vec::new());
        }
        let mut message = String::from("Key columns for index");
        if let Some(index) = &c.index_name {
            message.push_str(&format!(" '{}'", index));
        }
        message.push_str(&format!(
            " of table {} exceed the index key size limit {}.",
            table, self.max_key_length
        ));
        Ok(vec![ValidationIssue::for_change_element(
            change, "column", None, message,
        )])
    }
}

// ============================================================================
// Duplicated indexes
// ============================================================================

/// The same set of table columns must not be indexed twice
pub struct DuplicatedIndexValidator<'s> {
    indexes: &'s mut IndexRegistry,
}

impl<'s> DuplicatedIndexValidator<'s> {
    pub fn new(indexes: &'s mut IndexRegistry) -> Self {
        Self { indexes }
    }
}

impl ChangeValidator for DuplicatedIndexValidator<'_> {
    fn name(&self) -> &'static str {
        "duplicatedIndex"
    }

    fn validate(
        &mut self,
        change: ChangeRef<'_>,
        _store: &SchemaStore,
    ) -> Result<Vec<ValidationIssue>, LintError> {
        match change.change {
            Change::CreateIndex(c) => {
                let name = c.index_name.as_deref().unwrap_or("null");
                let key = IndexRegistry::canonical_key(
                    c.table_name.as_deref().unwrap_or("null"),
                    c.columns.iter().filter_map(|column| column.name.as_deref()),
                );
                if let Some(owner) = self.indexes.owner(&key) {
                    let message = format!("The index {} is already defined by {}", name, owner);
                    return Ok(vec![ValidationIssue::for_change(change, Some("name"), message)]);
                }
                self.indexes.reserve(name, key);
            }
            Change::DropIndex(c) => {
                if let Some(name) = c.index_name.as_deref() {
                    self.indexes.release(name);
                }
            }
            _ => {}
        }
        Ok(Vec::new())
    }
}

// ============================================================================
// Constraint dependencies
// ============================================================================

/// Columns referenced by constraints cannot be renamed or retyped
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnConstraintsValidator;

impl ChangeValidator for ColumnConstraintsValidator {
    fn name(&self) -> &'static str {
        "columnConstraints"
    }

    fn validate(
        &mut self,
        change: ChangeRef<'_>,
        store: &SchemaStore,
    ) -> Result<Vec<ValidationIssue>, LintError> {
        let element = change.element_name();
        let message = match change.change {
            Change::RenameColumn(c) => {
                let table = required(&c.table_name, element, "tableName")?;
                let new_name = required(&c.new_column_name, element, "newColumnName")?;
                // the listener has already applied the rename
                match store.column(table, new_name) {
                    Some(column) if !column.constraints.is_empty() => format!(
                        "Can not rename column {}.{} because is referred by {}. Remove constraints before rename and then recreate them.",
                        table,
                        c.old_column_name.as_deref().unwrap_or("null"),
                        constraint_list(&column.constraints)
                    ),
                    _ => return Ok(Vec::new()),
                }
            }
            Change::ModifyDataType(c) | Change::ResizeDataType(c) => {
                let table = required(&c.table_name, element, "tableName")?;
                let name = required(&c.column_name, element, "columnName")?;
                let new_type = c.new_data_type.as_deref().map(remove_param);
                let Some(column) = store.column(table, name) else {
                    return Ok(Vec::new());
                };
                let same_type = match (&column.old_type, &new_type) {
                    (Some(old), Some(new)) => old.eq_ignore_ascii_case(new),
                    _ => false,
                };
                if column.constraints.is_empty() || same_type {
                    return Ok(Vec::new());
                }
                format!(
                    "Can not modify column type {}.{} because is referred by {}. Remove constraints before modify and then recreate them.",
                    table,
                    name,
                    constraint_list(&column.constraints)
                )
            }
            _ => return Ok(Vec::new()),
        };
        Ok(vec![ValidationIssue::for_change(change, None, message)])
    }
}
