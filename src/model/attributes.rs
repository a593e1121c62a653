//! Attribute lookup tables
//!
//! Every change type (and the nested column/constraint declarations) exposes its
//! attributes through a static table of `(name, getter)` pairs. Lookups use the
//! changelog attribute names (`tableName`, `newDataType`, ...), so validators can be
//! configured with a list of attribute names and applied to any change type.
//!
//! A name that exists on some other element resolves to `None` for elements that
//! don't carry it; a name unknown to every table is a malformed lookup.

use std::collections::HashSet;

use once_cell::sync::Lazy;

use super::*;
use crate::error::LintError;

/// Reads one attribute off a record, stringified
pub type Getter<T> = fn(&T) -> Option<String>;

type Table<T> = &'static [(&'static str, Getter<T>)];

trait AttributeValue {
    fn to_attribute(&self) -> Option<String>;
}

impl AttributeValue for Option<String> {
    fn to_attribute(&self) -> Option<String> {
        self.clone()
    }
}

impl AttributeValue for Option<bool> {
    fn to_attribute(&self) -> Option<String> {
        self.map(|flag| flag.to_string())
    }
}

macro_rules! accessors {
    ($ty:ty { $($name:literal => $field:ident),* $(,)? }) => {
        &[$(($name, (|subject: &$ty| subject.$field.to_attribute()) as Getter<$ty>)),*]
    };
}

const COLUMN: Table<ColumnConfig> = accessors!(ColumnConfig {
    "name" => name,
    "type" => data_type,
    "computed" => computed,
    "value" => value,
    "valueNumeric" => value_numeric,
    "valueDate" => value_date,
    "valueBoolean" => value_boolean,
    "valueBlobFile" => value_blob_file,
    "valueClobFile" => value_clob_file,
    "valueComputed" => value_computed,
    "defaultValue" => default_value,
    "defaultValueNumeric" => default_value_numeric,
    "defaultValueDate" => default_value_date,
    "defaultValueBoolean" => default_value_boolean,
    "defaultValueComputed" => default_value_computed,
    "remarks" => remarks,
});

const CONSTRAINTS: Table<ConstraintsConfig> = accessors!(ConstraintsConfig {
    "nullable" => nullable,
    "notNullConstraintName" => not_null_constraint_name,
    "primaryKey" => primary_key,
    "primaryKeyName" => primary_key_name,
    "primaryKeyTablespace" => primary_key_tablespace,
    "unique" => unique,
    "uniqueConstraintName" => unique_constraint_name,
    "references" => references,
    "referencedTableCatalogName" => referenced_table_catalog_name,
    "referencedTableSchemaName" => referenced_table_schema_name,
    "referencedTableName" => referenced_table_name,
    "referencedColumnNames" => referenced_column_names,
    "foreignKeyName" => foreign_key_name,
    "deleteCascade" => delete_cascade,
});

const CREATE_TABLE: Table<CreateTableChange> = accessors!(CreateTableChange {
    "catalogName" => catalog_name,
    "schemaName" => schema_name,
    "tableName" => table_name,
    "tablespace" => tablespace,
    "remarks" => remarks,
});

const ADD_COLUMN: Table<AddColumnChange> = accessors!(AddColumnChange {
    "catalogName" => catalog_name,
    "schemaName" => schema_name,
    "tableName" => table_name,
});

const DROP_COLUMN: Table<DropColumnChange> = accessors!(DropColumnChange {
    "catalogName" => catalog_name,
    "schemaName" => schema_name,
    "tableName" => table_name,
    "columnName" => column_name,
});

const RENAME_COLUMN: Table<RenameColumnChange> = accessors!(RenameColumnChange {
    "catalogName" => catalog_name,
    "schemaName" => schema_name,
    "tableName" => table_name,
    "oldColumnName" => old_column_name,
    "newColumnName" => new_column_name,
    "columnDataType" => column_data_type,
});

const RENAME_TABLE: Table<RenameTableChange> = accessors!(RenameTableChange {
    "catalogName" => catalog_name,
    "schemaName" => schema_name,
    "oldTableName" => old_table_name,
    "newTableName" => new_table_name,
});

const DROP_TABLE: Table<DropTableChange> = accessors!(DropTableChange {
    "catalogName" => catalog_name,
    "schemaName" => schema_name,
    "tableName" => table_name,
    "cascadeConstraints" => cascade_constraints,
});

const MODIFY_DATA_TYPE: Table<ModifyDataTypeChange> = accessors!(ModifyDataTypeChange {
    "catalogName" => catalog_name,
    "schemaName" => schema_name,
    "tableName" => table_name,
    "columnName" => column_name,
    "newDataType" => new_data_type,
});

const ADD_NOT_NULL: Table<AddNotNullConstraintChange> = accessors!(AddNotNullConstraintChange {
    "catalogName" => catalog_name,
    "schemaName" => schema_name,
    "tableName" => table_name,
    "columnName" => column_name,
    "defaultNullValue" => default_null_value,
    "columnDataType" => column_data_type,
    "constraintName" => constraint_name,
});

const DROP_NOT_NULL: Table<DropNotNullConstraintChange> = accessors!(DropNotNullConstraintChange {
    "catalogName" => catalog_name,
    "schemaName" => schema_name,
    "tableName" => table_name,
    "columnName" => column_name,
    "columnDataType" => column_data_type,
});

const ADD_UNIQUE: Table<AddUniqueConstraintChange> = accessors!(AddUniqueConstraintChange {
    "catalogName" => catalog_name,
    "schemaName" => schema_name,
    "tableName" => table_name,
    "columnNames" => column_names,
    "constraintName" => constraint_name,
    "tablespace" => tablespace,
});

const DROP_UNIQUE: Table<DropUniqueConstraintChange> = accessors!(DropUniqueConstraintChange {
    "catalogName" => catalog_name,
    "schemaName" => schema_name,
    "tableName" => table_name,
    "constraintName" => constraint_name,
});

const ADD_PRIMARY_KEY: Table<AddPrimaryKeyChange> = accessors!(AddPrimaryKeyChange {
    "catalogName" => catalog_name,
    "schemaName" => schema_name,
    "tableName" => table_name,
    "columnNames" => column_names,
    "constraintName" => constraint_name,
    "tablespace" => tablespace,
});

const DROP_PRIMARY_KEY: Table<DropPrimaryKeyChange> = accessors!(DropPrimaryKeyChange {
    "catalogName" => catalog_name,
    "schemaName" => schema_name,
    "tableName" => table_name,
    "constraintName" => constraint_name,
});

const ADD_FOREIGN_KEY: Table<AddForeignKeyConstraintChange> = accessors!(AddForeignKeyConstraintChange {
    "baseTableCatalogName" => base_table_catalog_name,
    "baseTableSchemaName" => base_table_schema_name,
    "baseTableName" => base_table_name,
    "baseColumnNames" => base_column_names,
    "referencedTableCatalogName" => referenced_table_catalog_name,
    "referencedTableSchemaName" => referenced_table_schema_name,
    "referencedTableName" => referenced_table_name,
    "referencedColumnNames" => referenced_column_names,
    "constraintName" => constraint_name,
    "onDelete" => on_delete,
    "onUpdate" => on_update,
});

const DROP_FOREIGN_KEY: Table<DropForeignKeyConstraintChange> = accessors!(DropForeignKeyConstraintChange {
    "baseTableCatalogName" => base_table_catalog_name,
    "baseTableSchemaName" => base_table_schema_name,
    "baseTableName" => base_table_name,
    "constraintName" => constraint_name,
});

const DROP_ALL_FOREIGN_KEYS: Table<DropAllForeignKeyConstraintsChange> = accessors!(DropAllForeignKeyConstraintsChange {
    "baseTableCatalogName" => base_table_catalog_name,
    "baseTableSchemaName" => base_table_schema_name,
    "baseTableName" => base_table_name,
});

const CREATE_INDEX: Table<CreateIndexChange> = accessors!(CreateIndexChange {
    "catalogName" => catalog_name,
    "schemaName" => schema_name,
    "tableName" => table_name,
    "indexName" => index_name,
    "unique" => unique,
    "tablespace" => tablespace,
});

const DROP_INDEX: Table<DropIndexChange> = accessors!(DropIndexChange {
    "catalogName" => catalog_name,
    "schemaName" => schema_name,
    "tableName" => table_name,
    "indexName" => index_name,
});

const CREATE_SEQUENCE: Table<CreateSequenceChange> = accessors!(CreateSequenceChange {
    "catalogName" => catalog_name,
    "schemaName" => schema_name,
    "sequenceName" => sequence_name,
    "startValue" => start_value,
    "incrementBy" => increment_by,
    "minValue" => min_value,
    "maxValue" => max_value,
    "cycle" => cycle,
    "ordered" => ordered,
    "cacheSize" => cache_size,
});

const ALTER_SEQUENCE: Table<AlterSequenceChange> = accessors!(AlterSequenceChange {
    "catalogName" => catalog_name,
    "schemaName" => schema_name,
    "sequenceName" => sequence_name,
    "incrementBy" => increment_by,
    "minValue" => min_value,
    "maxValue" => max_value,
    "ordered" => ordered,
    "cacheSize" => cache_size,
});

const RENAME_SEQUENCE: Table<RenameSequenceChange> = accessors!(RenameSequenceChange {
    "catalogName" => catalog_name,
    "schemaName" => schema_name,
    "oldSequenceName" => old_sequence_name,
    "newSequenceName" => new_sequence_name,
});

const DROP_SEQUENCE: Table<DropSequenceChange> = accessors!(DropSequenceChange {
    "catalogName" => catalog_name,
    "schemaName" => schema_name,
    "sequenceName" => sequence_name,
});

const INSERT_DATA: Table<InsertDataChange> = accessors!(InsertDataChange {
    "catalogName" => catalog_name,
    "schemaName" => schema_name,
    "tableName" => table_name,
    "dbms" => dbms,
});

const CREATE_VIEW: Table<CreateViewChange> = accessors!(CreateViewChange {
    "catalogName" => catalog_name,
    "schemaName" => schema_name,
    "viewName" => view_name,
    "selectQuery" => select_query,
    "replaceIfExists" => replace_if_exists,
});

const DROP_VIEW: Table<DropViewChange> = accessors!(DropViewChange {
    "catalogName" => catalog_name,
    "schemaName" => schema_name,
    "viewName" => view_name,
});

const COPY_COLUMN: Table<CopyColumnChange> = accessors!(CopyColumnChange {
    "catalogName" => catalog_name,
    "schemaName" => schema_name,
    "tableName" => table_name,
    "fromColumnName" => from_column_name,
    "fromType" => from_type,
    "toColumnName" => to_column_name,
    "toType" => to_type,
});

const SQL: Table<SqlChange> = accessors!(SqlChange {
    "sql" => sql,
    "dbms" => dbms,
    "splitStatements" => split_statements,
});

fn names<T>(table: Table<T>) -> impl Iterator<Item = &'static str> {
    table.iter().map(|(name, _)| *name)
}

/// Every attribute name any element declares
static KNOWN_ATTRIBUTES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    names(COLUMN)
        .chain(names(CONSTRAINTS))
        .chain(names(CREATE_TABLE))
        .chain(names(ADD_COLUMN))
        .chain(names(DROP_COLUMN))
        .chain(names(RENAME_COLUMN))
        .chain(names(RENAME_TABLE))
        .chain(names(DROP_TABLE))
        .chain(names(MODIFY_DATA_TYPE))
        .chain(names(ADD_NOT_NULL))
        .chain(names(DROP_NOT_NULL))
        .chain(names(ADD_UNIQUE))
        .chain(names(DROP_UNIQUE))
        .chain(names(ADD_PRIMARY_KEY))
        .chain(names(DROP_PRIMARY_KEY))
        .chain(names(ADD_FOREIGN_KEY))
        .chain(names(DROP_FOREIGN_KEY))
        .chain(names(DROP_ALL_FOREIGN_KEYS))
        .chain(names(CREATE_INDEX))
        .chain(names(DROP_INDEX))
        .chain(names(CREATE_SEQUENCE))
        .chain(names(ALTER_SEQUENCE))
        .chain(names(RENAME_SEQUENCE))
        .chain(names(DROP_SEQUENCE))
        .chain(names(INSERT_DATA))
        .chain(names(CREATE_VIEW))
        .chain(names(DROP_VIEW))
        .chain(names(COPY_COLUMN))
        .chain(names(SQL))
        .collect()
});

/// True when some element declares an attribute with this name
pub fn is_known_attribute(name: &str) -> bool {
    KNOWN_ATTRIBUTES.contains(name)
}

fn find<T>(table: Table<T>, subject: &T, name: &str) -> Option<Option<String>> {
    table
        .iter()
        .find(|(attribute, _)| *attribute == name)
        .map(|(_, get)| get(subject))
}

fn resolve(
    found: Option<Option<String>>,
    element: &str,
    name: &str,
) -> Result<Option<String>, LintError> {
    match found {
        Some(value) => Ok(value),
        None if is_known_attribute(name) => Ok(None),
        None => Err(LintError::UnknownAttribute {
            element: element.to_string(),
            attribute: name.to_string(),
        }),
    }
}

impl Change {
    /// Read an attribute by its changelog name
    pub fn attribute(&self, name: &str) -> Result<Option<String>, LintError> {
        let found = match self {
            Change::CreateTable(c) => find(CREATE_TABLE, c, name),
            Change::AddColumn(c) => find(ADD_COLUMN, c, name),
            Change::DropColumn(c) => find(DROP_COLUMN, c, name),
            Change::RenameColumn(c) => find(RENAME_COLUMN, c, name),
            Change::RenameTable(c) => find(RENAME_TABLE, c, name),
            Change::DropTable(c) => find(DROP_TABLE, c, name),
            Change::ModifyDataType(c) | Change::ResizeDataType(c) => {
                find(MODIFY_DATA_TYPE, c, name)
            }
            Change::AddNotNullConstraint(c) => find(ADD_NOT_NULL, c, name),
            Change::DropNotNullConstraint(c) => find(DROP_NOT_NULL, c, name),
            Change::AddUniqueConstraint(c) => find(ADD_UNIQUE, c, name),
            Change::DropUniqueConstraint(c) => find(DROP_UNIQUE, c, name),
            Change::AddPrimaryKey(c) => find(ADD_PRIMARY_KEY, c, name),
            Change::DropPrimaryKey(c) => find(DROP_PRIMARY_KEY, c, name),
            Change::AddForeignKeyConstraint(c) => find(ADD_FOREIGN_KEY, c, name),
            Change::DropForeignKeyConstraint(c) => find(DROP_FOREIGN_KEY, c, name),
            Change::DropAllForeignKeyConstraints(c) => find(DROP_ALL_FOREIGN_KEYS, c, name),
            Change::CreateIndex(c) => find(CREATE_INDEX, c, name),
            Change::DropIndex(c) => find(DROP_INDEX, c, name),
            Change::CreateSequence(c) => find(CREATE_SEQUENCE, c, name),
            Change::AlterSequence(c) => find(ALTER_SEQUENCE, c, name),
            Change::RenameSequence(c) => find(RENAME_SEQUENCE, c, name),
            Change::DropSequence(c) => find(DROP_SEQUENCE, c, name),
            Change::InsertData(c) => find(INSERT_DATA, c, name),
            Change::CreateView(c) => find(CREATE_VIEW, c, name),
            Change::DropView(c) => find(DROP_VIEW, c, name),
            Change::CopyColumn(c) => find(COPY_COLUMN, c, name),
            Change::Sql(c) => find(SQL, c, name),
        };
        resolve(found, self.element_name(), name)
    }
}

impl ColumnConfig {
    pub fn attribute(&self, name: &str) -> Result<Option<String>, LintError> {
        resolve(find(COLUMN, self, name), "column", name)
    }
}

impl ConstraintsConfig {
    pub fn attribute(&self, name: &str) -> Result<Option<String>, LintError> {
        resolve(find(CONSTRAINTS, self, name), "constraints", name)
    }
}
