//! Store update listeners
//!
//! Listeners replay each change onto the [`SchemaStore`] before any validator
//! sees it, so a change's own columns are visible to its validators.

use tracing::debug;

use super::{ColumnState, ConstraintKind, ConstraintRef, Entity, SchemaStore, SearchKey};
use crate::error::{required, LintError};
use crate::model::{Change, ChangeTag, ColumnConfig};
use crate::util::{get_param, remove_param, split_names};

/// Keeps the store consistent with one aspect of the replayed changes
pub trait ChangeListener {
    fn name(&self) -> &'static str;

    fn applies_to(&self, change: &Change) -> bool;

    fn update_store(&self, change: &Change, store: &mut SchemaStore) -> Result<(), LintError>;
}

/// Listeners in the order they must run
pub fn default_listeners() -> Vec<Box<dyn ChangeListener>> {
    vec![Box::new(ColumnListener), Box::new(ConstraintListener)]
}

/// Notify every applicable listener of a change
pub fn notify(
    listeners: &[Box<dyn ChangeListener>],
    change: &Change,
    store: &mut SchemaStore,
) -> Result<(), LintError> {
    for listener in listeners.iter().filter(|l| l.applies_to(change)) {
        debug!(
            listener = listener.name(),
            change = change.element_name(),
            "updating schema state"
        );
        listener.update_store(change, store)?;
    }
    Ok(())
}

fn table<'a>(value: &'a Option<String>, change: &Change, attribute: &str) -> Result<&'a str, LintError> {
    required(value, change.element_name(), attribute)
}

fn column_name(column: &ColumnConfig) -> Result<&str, LintError> {
    required(&column.name, "column", "name")
}

// ============================================================================
// Columns
// ============================================================================

/// Tracks column existence, names, nullability and types
pub struct ColumnListener;

impl ColumnListener {
    fn add_columns(
        store: &mut SchemaStore,
        table: &str,
        columns: &[ColumnConfig],
    ) -> Result<(), LintError> {
        for config in columns {
            let mut column = ColumnState::new(table, column_name(config)?);
            column.nullable = config.is_nullable();
            column.set_type(config.data_type.as_deref().map(remove_param));
            column.length = config.data_type.as_deref().map(get_param);
            store.put(column.key(), Entity::Column(column));
        }
        Ok(())
    }
}

impl ChangeListener for ColumnListener {
    fn name(&self) -> &'static str {
        "columns"
    }

    fn applies_to(&self, change: &Change) -> bool {
        matches!(
            change,
            Change::CreateTable(_)
                | Change::AddColumn(_)
                | Change::RenameTable(_)
                | Change::RenameColumn(_)
                | Change::AddNotNullConstraint(_)
                | Change::DropNotNullConstraint(_)
                | Change::DropTable(_)
                | Change::DropColumn(_)
        ) || change.is_a(ChangeTag::ModifyDataType)
    }

    fn update_store(&self, change: &Change, store: &mut SchemaStore) -> Result<(), LintError> {
        match change {
            Change::CreateTable(c) => {
                let table = table(&c.table_name, change, "tableName")?;
                Self::add_columns(store, table, &c.columns)?;
            }
            Change::AddColumn(c) => {
                let table = table(&c.table_name, change, "tableName")?;
                Self::add_columns(store, table, &c.columns)?;
            }
            Change::RenameTable(c) => {
                let old = table(&c.old_table_name, change, "oldTableName")?;
                let new = table(&c.new_table_name, change, "newTableName")?;
                store.update_columns(&SearchKey::table(old), |column| {
                    column.table = new.to_string()
                });
            }
            Change::RenameColumn(c) => {
                let table = table(&c.table_name, change, "tableName")?;
                let old = required(&c.old_column_name, change.element_name(), "oldColumnName")?;
                let new = required(&c.new_column_name, change.element_name(), "newColumnName")?;
                store.update_columns(&SearchKey::column(table, old), |column| {
                    column.name = new.to_string()
                });
            }
            Change::AddNotNullConstraint(c) => {
                let table = table(&c.table_name, change, "tableName")?;
                let name = required(&c.column_name, change.element_name(), "columnName")?;
                store.update_columns(&SearchKey::column(table, name), |column| {
                    column.nullable = false
                });
            }
            Change::DropNotNullConstraint(c) => {
                let table = table(&c.table_name, change, "tableName")?;
                let name = required(&c.column_name, change.element_name(), "columnName")?;
                store.update_columns(&SearchKey::column(table, name), |column| {
                    column.nullable = true
                });
            }
            Change::ModifyDataType(c) | Change::ResizeDataType(c) => {
                let table = table(&c.table_name, change, "tableName")?;
                let name = required(&c.column_name, change.element_name(), "columnName")?;
                let new_type = c.new_data_type.as_deref();
                store.update_columns(&SearchKey::column(table, name), |column| {
                    column.set_type(new_type.map(remove_param));
                    column.length = new_type.map(get_param);
                });
            }
            Change::DropTable(c) => {
                let table = table(&c.table_name, change, "tableName")?;
                store.remove_matching(&SearchKey::table(table));
            }
            Change::DropColumn(c) => {
                let table = table(&c.table_name, change, "tableName")?;
                if let Some(name) = c.column_name.as_deref() {
                    store.remove_matching(&SearchKey::column(table, name));
                }
                for config in &c.columns {
                    store.remove_matching(&SearchKey::column(table, column_name(config)?));
                }
            }
            _ => {}
        }
        Ok(())
    }
}

// ============================================================================
// Constraints
// ============================================================================

/// Attaches primary key, foreign key and index references to known columns
pub struct ConstraintListener;

impl ConstraintListener {
    /// Attach a constraint to a column if the column is known
    fn attach(
        store: &mut SchemaStore,
        table: &str,
        column: &str,
        name: Option<&str>,
        kind: ConstraintKind,
    ) {
        if store.column(table, column).is_none() {
            return;
        }
        let constraint = ConstraintRef::new(name, kind);
        store.update_columns(&SearchKey::column(table, column), |state| {
            state.constraints.push(constraint.clone())
        });
    }

    /// Remove constraints from every column of a table
    fn detach<F>(store: &mut SchemaStore, table: &str, mut predicate: F)
    where
        F: FnMut(&ConstraintRef) -> bool,
    {
        store.update_columns(&SearchKey::table(table), |state| {
            state.constraints.retain(|constraint| !predicate(constraint))
        });
    }

    fn detach_named(store: &mut SchemaStore, table: &str, name: Option<&str>) {
        if let Some(name) = name {
            Self::detach(store, table, |constraint| constraint.name == name);
        }
    }

    fn inline_constraints(
        store: &mut SchemaStore,
        table: &str,
        columns: &[ColumnConfig],
    ) -> Result<(), LintError> {
        for config in columns {
            let name = column_name(config)?;
            let Some(constraints) = &config.constraints else {
                continue;
            };
            if constraints.primary_key == Some(true) {
                let pk_name = constraints.primary_key_name.as_deref();
                Self::attach(store, table, name, pk_name, ConstraintKind::PrimaryKey);
            }
            if constraints.unique == Some(true) {
                let unique_name = constraints.unique_constraint_name.as_deref();
                Self::attach(store, table, name, unique_name, ConstraintKind::Index);
            }
            let references = constraints
                .references
                .as_deref()
                .or(constraints.referenced_table_name.as_deref());
            if references.is_some_and(|r| !r.is_empty()) {
                let fk_name = constraints.foreign_key_name.as_deref();
                Self::attach(store, table, name, fk_name, ConstraintKind::ForeignKey);
            }
        }
        Ok(())
    }

    fn attach_list(
        store: &mut SchemaStore,
        table: &str,
        columns: Option<&str>,
        name: Option<&str>,
        kind: ConstraintKind,
    ) {
        for column in columns.map(split_names).into_iter().flatten() {
            Self::attach(store, table, column, name, kind);
        }
    }
}

impl ChangeListener for ConstraintListener {
    fn name(&self) -> &'static str {
        "constraints"
    }

    fn applies_to(&self, change: &Change) -> bool {
        matches!(
            change,
            Change::CreateTable(_)
                | Change::AddColumn(_)
                | Change::CreateIndex(_)
                | Change::AddUniqueConstraint(_)
                | Change::AddPrimaryKey(_)
                | Change::AddForeignKeyConstraint(_)
                | Change::DropIndex(_)
                | Change::DropUniqueConstraint(_)
                | Change::DropPrimaryKey(_)
                | Change::DropForeignKeyConstraint(_)
                | Change::DropAllForeignKeyConstraints(_)
        )
    }

    fn update_store(&self, change: &Change, store: &mut SchemaStore) -> Result<(), LintError> {
        match change {
            Change::CreateTable(c) => {
                let table = table(&c.table_name, change, "tableName")?;
                Self::inline_constraints(store, table, &c.columns)?;
            }
            Change::AddColumn(c) => {
                let table = table(&c.table_name, change, "tableName")?;
                Self::inline_constraints(store, table, &c.columns)?;
            }
            Change::CreateIndex(c) => {
                let table = table(&c.table_name, change, "tableName")?;
                for config in &c.columns {
                    let name = column_name(config)?;
                    Self::attach(store, table, name, c.index_name.as_deref(), ConstraintKind::Index);
                }
            }
            Change::AddUniqueConstraint(c) => {
                let table = table(&c.table_name, change, "tableName")?;
                Self::attach_list(
                    store,
                    table,
                    c.column_names.as_deref(),
                    c.constraint_name.as_deref(),
                    ConstraintKind::Index,
                );
            }
            Change::AddPrimaryKey(c) => {
                let table = table(&c.table_name, change, "tableName")?;
                Self::attach_list(
                    store,
                    table,
                    c.column_names.as_deref(),
                    c.constraint_name.as_deref(),
                    ConstraintKind::PrimaryKey,
                );
            }
            Change::AddForeignKeyConstraint(c) => {
                let table = table(&c.base_table_name, change, "baseTableName")?;
                Self::attach_list(
                    store,
                    table,
                    c.base_column_names.as_deref(),
                    c.constraint_name.as_deref(),
                    ConstraintKind::ForeignKey,
                );
            }
            Change::DropIndex(c) => {
                let table = table(&c.table_name, change, "tableName")?;
                Self::detach_named(store, table, c.index_name.as_deref());
            }
            Change::DropUniqueConstraint(c) => {
                let table = table(&c.table_name, change, "tableName")?;
                Self::detach_named(store, table, c.constraint_name.as_deref());
            }
            Change::DropForeignKeyConstraint(c) => {
                let table = table(&c.base_table_name, change, "baseTableName")?;
                Self::detach_named(store, table, c.constraint_name.as_deref());
            }
            Change::DropPrimaryKey(c) => {
                let table = table(&c.table_name, change, "tableName")?;
                let name = c.constraint_name.as_deref();
                Self::detach(store, table, |constraint| {
                    constraint.kind == ConstraintKind::PrimaryKey
                        || Some(constraint.name.as_str()) == name
                });
            }
            Change::DropAllForeignKeyConstraints(c) => {
                let table = table(&c.base_table_name, change, "baseTableName")?;
                Self::detach(store, table, |constraint| {
                    constraint.kind == ConstraintKind::ForeignKey
                });
            }
            _ => {}
        }
        Ok(())
    }
}
