//! Schema state replay tests

use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use rust_changelog_lint::state::{
    default_listeners, notify, ColumnState, ConstraintKind, SchemaStore, SearchKey,
};
use rust_changelog_lint::{Change, LintError};

fn replay(changes: Value) -> Result<SchemaStore, LintError> {
    let changes: Vec<Change> = serde_json::from_value(changes).expect("Invalid change records");
    let listeners = default_listeners();
    let mut store = SchemaStore::new();
    for change in &changes {
        notify(&listeners, change, &mut store)?;
    }
    Ok(store)
}

fn column_names(store: &SchemaStore, table: &str) -> Vec<String> {
    store
        .filter_by::<ColumnState>(SearchKey::table(table))
        .map(|column| column.name.clone())
        .collect()
}

#[test]
fn test_create_table_splits_types() {
    let store = replay(json!([
        {"change": "createTable", "tableName": "t1", "columns": [
            {"name": "id", "type": "NUMERIC(10, 2)"},
            {"name": "created", "type": "TIMESTAMP"}
        ]}
    ]))
    .unwrap();

    let id = store.column("t1", "id").unwrap();
    assert_eq!(id.data_type.as_deref(), Some("NUMERIC"));
    assert_eq!(id.length.as_deref(), Some("10, 2"));
    assert!(id.nullable);
    let created = store.column("t1", "created").unwrap();
    assert_eq!(created.length.as_deref(), Some(""));
}

#[test]
fn test_rename_table_moves_columns() {
    let store = replay(json!([
        {"change": "createTable", "tableName": "t1", "columns": [{"name": "a", "type": "INTEGER"}]},
        {"change": "addColumn", "tableName": "t1", "columns": [{"name": "b", "type": "INTEGER"}]},
        {"change": "renameTable", "oldTableName": "t1", "newTableName": "t2"}
    ]))
    .unwrap();

    assert!(column_names(&store, "t1").is_empty());
    assert_eq!(column_names(&store, "t2"), vec!["a", "b"]);
}

#[test]
fn test_not_null_toggles() {
    let store = replay(json!([
        {"change": "addColumn", "tableName": "t1", "columns": [{"name": "a", "type": "INTEGER"}]},
        {"change": "addNotNullConstraint", "tableName": "t1", "columnName": "a", "defaultNullValue": "0"}
    ]))
    .unwrap();
    assert!(!store.column("t1", "a").unwrap().nullable);

    let store = replay(json!([
        {"change": "addColumn", "tableName": "t1", "columns": [
            {"name": "a", "type": "INTEGER", "constraints": {"nullable": false}}
        ]},
        {"change": "dropNotNullConstraint", "tableName": "t1", "columnName": "a"}
    ]))
    .unwrap();
    assert!(store.column("t1", "a").unwrap().nullable);
}

#[test]
fn test_modify_keeps_old_type() {
    let store = replay(json!([
        {"change": "addColumn", "tableName": "t1", "columns": [{"name": "a", "type": "VARCHAR(10)"}]},
        {"change": "resizeDataType", "tableName": "t1", "columnName": "a", "newDataType": "VARCHAR(20)"}
    ]))
    .unwrap();

    let column = store.column("t1", "a").unwrap();
    assert_eq!(column.data_type.as_deref(), Some("VARCHAR"));
    assert_eq!(column.old_type.as_deref(), Some("VARCHAR"));
    assert_eq!(column.length.as_deref(), Some("20"));
}

#[test]
fn test_drops_remove_columns() {
    let store = replay(json!([
        {"change": "createTable", "tableName": "t1", "columns": [
            {"name": "a", "type": "INTEGER"},
            {"name": "b", "type": "INTEGER"}
        ]},
        {"change": "createTable", "tableName": "t2", "columns": [{"name": "a", "type": "INTEGER"}]},
        {"change": "dropColumn", "tableName": "t1", "columnName": "a"},
        {"change": "dropTable", "tableName": "t2"}
    ]))
    .unwrap();

    assert_eq!(column_names(&store, "t1"), vec!["b"]);
    assert!(column_names(&store, "t2").is_empty());
}

#[test]
fn test_unknown_column_is_tolerated() {
    let store = replay(json!([
        {"change": "addNotNullConstraint", "tableName": "t1", "columnName": "ghost", "defaultNullValue": "0"},
        {"change": "renameColumn", "tableName": "t1", "oldColumnName": "ghost", "newColumnName": "spirit"}
    ]))
    .unwrap();

    assert!(store.is_empty());
}

#[test]
fn test_constraints_attach_and_detach() {
    let store = replay(json!([
        {"change": "createTable", "tableName": "t1", "columns": [
            {"name": "id", "type": "INTEGER", "constraints": {"primaryKey": true, "primaryKeyName": "pk_t1"}},
            {"name": "parent_id", "type": "INTEGER"}
        ]},
        {"change": "addForeignKeyConstraint", "baseTableName": "t1", "baseColumnNames": "parent_id",
         "referencedTableName": "t1", "referencedColumnNames": "id", "constraintName": "fk_parent"},
        {"change": "createIndex", "tableName": "t1", "indexName": "idx_parent", "columns": [{"name": "parent_id"}]}
    ]))
    .unwrap();

    let id = store.column("t1", "id").unwrap();
    assert_eq!(id.constraints.len(), 1);
    assert_eq!(id.constraints[0].kind, ConstraintKind::PrimaryKey);
    assert_eq!(id.constraints[0].name, "pk_t1");

    let parent = store.column("t1", "parent_id").unwrap();
    let kinds: Vec<_> = parent.constraints.iter().map(|c| c.kind).collect();
    assert_eq!(kinds, vec![ConstraintKind::ForeignKey, ConstraintKind::Index]);
}

#[test]
fn test_drop_all_foreign_keys_matches_kind() {
    let store = replay(json!([
        {"change": "createTable", "tableName": "t1", "columns": [{"name": "parent_id", "type": "INTEGER"}]},
        {"change": "addForeignKeyConstraint", "baseTableName": "t1", "baseColumnNames": "parent_id",
         "referencedTableName": "t2", "referencedColumnNames": "id", "constraintName": "fk_a"},
        {"change": "createIndex", "tableName": "t1", "indexName": "idx_parent", "columns": [{"name": "parent_id"}]},
        {"change": "dropAllForeignKeyConstraints", "baseTableName": "t1"}
    ]))
    .unwrap();

    let parent = store.column("t1", "parent_id").unwrap();
    assert_eq!(parent.constraints.len(), 1);
    assert_eq!(parent.constraints[0].name, "idx_parent");
}

#[test]
fn test_missing_table_name_halts_replay() {
    let result = replay(json!([{"change": "createTable", "columns": []}]));
    assert!(matches!(result, Err(LintError::MissingAttribute { .. })));
}
