//! Validation sessions over whole changelogs
//!
//! Each test replays one or more changelogs through a fresh factory and
//! looks at the issues a single validator contributes.

use pretty_assertions::assert_eq;
use serde_json::json;

use rust_changelog_lint::{validate_changelogs, LintError, ValidatorConfig};

use crate::common::{
    change_set, changelog, column, messages_containing, not_null_column, single_set, validate,
    validate_with,
};

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_replaying_same_changelog_is_idempotent() {
    let change_log = single_set(json!([
        {"change": "createTable", "tableName": "Orders", "columns": [
            column("id", "NUMBER(10)"),
            column("tenant_id", "VARCHAR(36)")
        ]},
        {"change": "createIndex", "tableName": "Orders", "indexName": "idx_a", "columns": [column("id", "NUMBER(10)")]},
        {"change": "createIndex", "tableName": "Orders", "indexName": "idx_b", "columns": [column("id", "NUMBER(10)")]},
        {"change": "createView", "viewName": "v", "replaceIfExists": true}
    ]));

    let first = validate(std::slice::from_ref(&change_log));
    let second = validate(std::slice::from_ref(&change_log));

    assert!(!first.is_empty());
    assert_eq!(first, second);
}

// ============================================================================
// Tenant id
// ============================================================================

#[test]
fn test_tenant_id_made_not_null_later_in_set() {
    let issues = validate(&[single_set(json!([
        {"change": "addColumn", "tableName": "orders", "columns": [column("tenant_id", "VARCHAR(36)")]},
        {"change": "addNotNullConstraint", "tableName": "orders", "columnName": "tenant_id"}
    ]))]);

    assert!(messages_containing(&issues, "tenant_id column must be not nullable").is_empty());
    assert!(messages_containing(&issues, "without a default value").is_empty());
}

#[test]
fn test_tenant_id_constraint_before_column_reports_once() {
    let issues = validate(&[single_set(json!([
        {"change": "addNotNullConstraint", "tableName": "orders", "columnName": "tenant_id"},
        {"change": "addColumn", "tableName": "orders", "columns": [column("tenant_id", "VARCHAR(36)")]}
    ]))]);

    let tenant = messages_containing(&issues, "tenant_id column must be not nullable");
    assert_eq!(tenant.len(), 1);
    assert!(tenant[0].ends_with("tenant_id column must be not nullable"));
}

#[test]
fn test_tenant_id_without_constraint_reports() {
    let issues = validate(&[single_set(json!([
        {"change": "createTable", "tableName": "orders", "columns": [column("tenant_id", "VARCHAR(36)")]}
    ]))]);

    assert_eq!(
        messages_containing(&issues, "tenant_id column must be not nullable").len(),
        1
    );
}

#[test]
fn test_not_null_column_needs_default() {
    let issues = validate(&[single_set(json!([
        {"change": "addColumn", "tableName": "orders", "columns": [
            {"name": "status", "type": "VARCHAR(10)", "constraints": {"nullable": false}},
            not_null_column("amount", "NUMERIC(10)", "0")
        ]}
    ]))]);

    assert_eq!(
        messages_containing(&issues, "You can not add not nullable columns without a default value."),
        vec!["You can not add not nullable columns without a default value.".to_string()]
    );
}

// ============================================================================
// Duplicate change set ids
// ============================================================================

#[test]
fn test_duplicate_id_across_files_blames_first_file() {
    let sets = || json!([change_set("ISSUE-49-1", json!([]))]);
    let first = changelog("db/a/changelog.json", Some("orders"), sets());
    let second = changelog("db/b/changelog.json", Some("orders"), sets());

    let issues = validate(&[first, second]);

    let duplicates: Vec<_> = issues
        .iter()
        .filter(|issue| issue.message.contains("is already defined"))
        .collect();
    assert_eq!(duplicates.len(), 1);
    assert_eq!(duplicates[0].file, "db/b/changelog.json");
    assert_eq!(
        duplicates[0].message,
        "the changeSet ISSUE-49-1 is already defined in db/a/changelog.json"
    );
    assert_eq!(duplicates[0].attribute.as_deref(), Some("id"));
}

#[test]
fn test_duplicate_id_in_same_file() {
    let change_log = changelog(
        "db/a/changelog.json",
        Some("orders"),
        json!([
            change_set("ISSUE-49-1", json!([])),
            change_set("ISSUE-49-1", json!([]))
        ]),
    );

    let issues = validate(&[change_log]);

    assert_eq!(
        messages_containing(&issues, "is already defined"),
        vec!["the changeSet ISSUE-49-1 is already defined in the same file".to_string()]
    );
}

#[test]
fn test_same_id_under_different_logical_paths_is_allowed() {
    let sets = || json!([change_set("ISSUE-49-1", json!([]))]);
    let issues = validate(&[
        changelog("db/a/changelog.json", Some("orders"), sets()),
        changelog("db/b/changelog.json", Some("billing"), sets()),
    ]);

    assert!(messages_containing(&issues, "is already defined").is_empty());
}

#[test]
fn test_independent_sessions_do_not_share_ids() {
    let change_log = changelog(
        "db/a/changelog.json",
        Some("orders"),
        json!([change_set("ISSUE-49-1", json!([]))]),
    );

    let config = ValidatorConfig::default();
    let first = validate_changelogs(std::slice::from_ref(&change_log), &config).unwrap();
    let second = validate_changelogs(std::slice::from_ref(&change_log), &config).unwrap();

    assert!(messages_containing(&first, "is already defined").is_empty());
    assert!(messages_containing(&second, "is already defined").is_empty());
}

// ============================================================================
// Row size budget
// ============================================================================

fn row_size_config(limit: u64) -> ValidatorConfig {
    let mut config = ValidatorConfig::default();
    config
        .parameters
        .insert("tableSize.rowSizeLimit".to_string(), limit.to_string());
    config
}

#[test]
fn test_row_size_at_limit_passes() {
    // NUMBER(10) costs 8 bytes
    let issues = validate_with(
        &[single_set(json!([
            {"change": "createTable", "tableName": "orders", "columns": [
                column("id", "NUMBER(10)"),
                column("amount", "NUMBER(10)")
            ]}
        ]))],
        &row_size_config(16),
    );

    assert!(messages_containing(&issues, "exceeds the table limit").is_empty());
}

#[test]
fn test_row_size_over_limit_names_column() {
    let issues = validate_with(
        &[single_set(json!([
            {"change": "createTable", "tableName": "orders", "columns": [
                column("id", "NUMBER(10)"),
                column("amount", "NUMBER(10)")
            ]},
            {"change": "addColumn", "tableName": "orders", "columns": [column("total", "NUMBER(10)")]}
        ]))],
        &row_size_config(16),
    );

    assert_eq!(
        messages_containing(&issues, "exceeds the table limit"),
        vec!["Table orders with column total exceeds the table limit of 16.".to_string()]
    );
}

#[test]
fn test_malformed_length_halts_session() {
    let result = validate_changelogs(
        &[single_set(json!([
            {"change": "createTable", "tableName": "orders", "columns": [column("id", "VARCHAR(abc)")]}
        ]))],
        &ValidatorConfig::default(),
    );

    assert!(matches!(result, Err(LintError::MalformedNumber { .. })));
}

#[test]
fn test_huge_declared_length_exceeds_budgets() {
    let issues = validate(&[single_set(json!([
        {"change": "createTable", "tableName": "orders", "columns": [
            column("payload", "CHAR(18446744073709551615)"),
            column("code", "CHAR(10)")
        ]},
        {"change": "createIndex", "tableName": "orders", "indexName": "idx_payload", "columns": [
            {"name": "payload"}, {"name": "code"}
        ]}
    ]))]);

    assert_eq!(
        messages_containing(&issues, "exceeds the table limit"),
        vec!["Table orders with column payload exceeds the table limit of 4005.".to_string()]
    );
    assert_eq!(messages_containing(&issues, "index key size limit").len(), 1);
}

// ============================================================================
// Indexes
// ============================================================================

#[test]
fn test_duplicate_index_ignores_column_order() {
    let issues = validate(&[single_set(json!([
        {"change": "createIndex", "tableName": "t1", "indexName": "idx1", "columns": [
            {"name": "col_a"}, {"name": "col_b"}
        ]},
        {"change": "createIndex", "tableName": "t1", "indexName": "idx2", "columns": [
            {"name": "col_b"}, {"name": "col_a"}
        ]}
    ]))]);

    assert_eq!(
        messages_containing(&issues, "is already defined by"),
        vec!["The index idx2 is already defined by idx1".to_string()]
    );
}

#[test]
fn test_dropped_index_frees_its_columns() {
    let issues = validate(&[single_set(json!([
        {"change": "createIndex", "tableName": "t1", "indexName": "idx1", "columns": [
            {"name": "col_a"}, {"name": "col_b"}
        ]},
        {"change": "dropIndex", "tableName": "t1", "indexName": "idx1"},
        {"change": "createIndex", "tableName": "t1", "indexName": "idx2", "columns": [
            {"name": "col_b"}, {"name": "col_a"}
        ]}
    ]))]);

    assert!(messages_containing(&issues, "is already defined by").is_empty());
}

#[test]
fn test_index_key_budget() {
    let mut config = ValidatorConfig::default();
    config
        .parameters
        .insert("createIndex.maxKeyLength".to_string(), "20".to_string());

    let issues = validate_with(
        &[single_set(json!([
            {"change": "createTable", "tableName": "t1", "columns": [
                column("code", "VARCHAR(10)"),
                column("name", "VARCHAR(10)")
            ]},
            {"change": "createIndex", "tableName": "t1", "indexName": "idx_code", "columns": [
                {"name": "code"}, {"name": "name"}
            ]}
        ]))],
        &config,
    );

    assert_eq!(
        messages_containing(&issues, "index key size limit"),
        vec!["Key columns for index 'idx_code' of table t1 exceed the index key size limit 20.".to_string()]
    );
}

// ============================================================================
// Constraints
// ============================================================================

#[test]
fn test_foreign_key_blocks_rename() {
    let issues = validate(&[single_set(json!([
        {"change": "createTable", "tableName": "t1", "columns": [
            column("id", "NUMERIC(10)"),
            column("parent_id", "NUMERIC(10)")
        ]},
        {"change": "addForeignKeyConstraint", "baseTableName": "t1", "baseColumnNames": "parent_id",
         "referencedTableName": "t1", "referencedColumnNames": "id", "constraintName": "fk_parent"},
        {"change": "renameColumn", "tableName": "t1", "oldColumnName": "parent_id", "newColumnName": "parent_ref"}
    ]))]);

    let blocked = messages_containing(&issues, "Can not rename column");
    assert_eq!(blocked.len(), 1);
    assert!(blocked[0].contains("t1.parent_id"));
    assert!(blocked[0].contains("fk_parent"));
}

#[test]
fn test_unconstrained_rename_passes() {
    let issues = validate(&[single_set(json!([
        {"change": "createTable", "tableName": "t1", "columns": [column("parent_id", "NUMERIC(10)")]},
        {"change": "renameColumn", "tableName": "t1", "oldColumnName": "parent_id", "newColumnName": "parent_ref"}
    ]))]);

    assert!(messages_containing(&issues, "Can not rename column").is_empty());
}

#[test]
fn test_unique_constraint_on_nullable_column() {
    let issues = validate(&[single_set(json!([
        {"change": "createTable", "tableName": "t1", "columns": [
            column("code", "VARCHAR(10)"),
            not_null_column("id", "NUMERIC(10)", "0")
        ]},
        {"change": "addUniqueConstraint", "tableName": "t1", "columnNames": "id, code", "constraintName": "uq_code"}
    ]))]);

    assert_eq!(
        messages_containing(&issues, "Unique constraint"),
        vec!["Unique constraint 'uq_code' can not include nullable columns code for table 't1'.".to_string()]
    );
}

// ============================================================================
// Session configuration
// ============================================================================

#[test]
fn test_ignored_rule_is_silent() {
    let change_log = single_set(json!([
        {"change": "createView", "viewName": "v", "selectQuery": "select 1", "replaceIfExists": true}
    ]));
    let mut config = ValidatorConfig::default();

    let before = validate_with(std::slice::from_ref(&change_log), &config);
    config.ignore_rules.push("replaceView".to_string());
    let after = validate_with(std::slice::from_ref(&change_log), &config);

    assert_eq!(messages_containing(&before, "replaceIfExists").len(), 1);
    assert!(messages_containing(&after, "replaceIfExists").is_empty());
}

#[test]
fn test_exclusion_filter() {
    let config = ValidatorConfig {
        exclude_changes: vec!["sql".to_string()],
        ..Default::default()
    };
    let issues = validate_with(
        &[single_set(json!([{"change": "sql", "sql": "select 1"}]))],
        &config,
    );

    assert_eq!(
        messages_containing(&issues, "filter"),
        vec!["The change sql is not allowed by the exclusion filter".to_string()]
    );
}

#[test]
fn test_skip_only_db_specific_change_sets() {
    let view = json!([{"change": "createView", "viewName": "v", "replaceIfExists": true}]);
    let change_log = changelog(
        "db/a/changelog.json",
        Some("orders"),
        json!([
            {"id": "ORDS-1-1", "author": "dev", "dbms": ["oracle"], "changes": view},
            {"id": "ORDS-1-2", "author": "dev", "changes": view}
        ]),
    );
    let config = ValidatorConfig {
        skip_change_sets: vec!["ORDS-1-1".to_string(), "ORDS-1-2".to_string()],
        ..Default::default()
    };

    let issues = validate_with(&[change_log], &config);

    let replaced: Vec<_> = issues
        .iter()
        .filter(|issue| issue.message.contains("replaceIfExists"))
        .collect();
    assert_eq!(replaced.len(), 1);
    assert_eq!(replaced[0].change_set_id.as_deref(), Some("ORDS-1-2"));
}

#[test]
fn test_sequence_defaults() {
    let issues = validate(&[single_set(json!([
        {"change": "createSequence", "sequenceName": "orders_seq", "startValue": 1, "incrementBy": 50}
    ]))]);

    assert_eq!(
        messages_containing(&issues, "expected value"),
        vec!["1 does not matches the expected value 50".to_string()]
    );
}

#[test]
fn test_insert_ownership_across_changelogs() {
    let insert = || {
        json!([change_set(
            "ORDS-2-1",
            json!([{"change": "insert", "tableName": "country", "columns": [
                {"name": "code", "value": "it"}
            ]}])
        )])
    };
    let issues = validate(&[
        changelog("db/a/changelog.json", Some("orders"), insert()),
        changelog("db/b/changelog.json", Some("billing"), insert()),
    ]);

    assert_eq!(
        messages_containing(&issues, "is already used in"),
        vec!["The table name country is already used in orders project".to_string()]
    );
}

#[test]
fn test_change_set_checks() {
    let change_log = changelog(
        "db/a/changelog.json",
        Some("orders"),
        json!([
            {"id": "orders-1", "changes": [], "validCheckSums": ["1:ANY"]}
        ]),
    );

    let issues = validate(&[change_log]);

    assert!(issues
        .iter()
        .any(|issue| issue.message == "The changeset id does not matches the issue pattern"));
    assert!(issues
        .iter()
        .any(|issue| issue.message == "The author is required"));
    assert!(issues
        .iter()
        .any(|issue| issue.message == "the 1:any validateCheckSum is not allowed"
            && issue.element.as_deref() == Some("validCheckSum")));
}

// ============================================================================
// Type changes
// ============================================================================

fn keyed_orders_table() -> serde_json::Value {
    json!({"change": "createTable", "tableName": "orders", "columns": [
        {"name": "id", "type": "NUMERIC(10)", "constraints": {"primaryKey": true, "nullable": false}}
    ]})
}

#[test]
fn test_constrained_column_cannot_change_type() {
    let issues = validate(&[single_set(json!([
        keyed_orders_table(),
        {"change": "modifyDataType", "tableName": "orders", "columnName": "id", "newDataType": "BIGINT"}
    ]))]);

    let blocked = messages_containing(&issues, "Can not modify column type");
    assert_eq!(blocked.len(), 1);
    assert!(blocked[0].starts_with("Can not modify column type orders.id because is referred by"));
}

#[test]
fn test_constrained_column_keeps_type_with_new_precision() {
    let issues = validate(&[single_set(json!([
        keyed_orders_table(),
        {"change": "modifyDataType", "tableName": "orders", "columnName": "id", "newDataType": "NUMERIC(12)"}
    ]))]);

    assert!(messages_containing(&issues, "Can not modify column type").is_empty());
}

#[test]
fn test_oracle_varchar_limit() {
    let issues = validate(&[single_set(json!([
        {"change": "createTable", "tableName": "notes", "columns": [
            column("short_text", "VARCHAR(4000)"),
            column("long_text", "VARCHAR(4001)")
        ]},
        {"change": "resizeDataType", "tableName": "notes", "columnName": "short_text", "newDataType": "VARCHAR(5000)"}
    ]))]);

    let oversized = issues
        .iter()
        .filter(|issue| issue.message.starts_with("Oracle 11g not allows column of type VARCHAR greater than 4000"))
        .map(|issue| issue.attribute.clone())
        .collect::<Vec<_>>();
    assert_eq!(
        oversized,
        vec![Some("value".to_string()), Some("newDataType".to_string())]
    );
}

#[test]
fn test_oracle_lob_modify_only_for_modify_data_type() {
    let issues = validate(&[single_set(json!([
        {"change": "createTable", "tableName": "notes", "columns": [
            column("body", "VARCHAR(100)"),
            column("summary", "VARCHAR(100)")
        ]},
        {"change": "modifyDataType", "tableName": "notes", "columnName": "body", "newDataType": "CLOB"},
        {"change": "resizeDataType", "tableName": "notes", "columnName": "summary", "newDataType": "CLOB"}
    ]))]);

    let rejected = messages_containing(&issues, "Oracle 11g not allows modify data type to");
    assert_eq!(rejected.len(), 1);
    assert!(rejected[0].starts_with("Oracle 11g not allows modify data type to CLOB."));
}

#[test]
fn test_copy_column_conversions() {
    let issues = validate(&[single_set(json!([
        {"change": "copyColumn", "tableName": "notes", "fromColumnName": "title", "fromType": "VARCHAR(100)",
         "toColumnName": "title_lob", "toType": "CLOB"},
        {"change": "copyColumn", "tableName": "notes", "fromColumnName": "created", "fromType": "DATE",
         "toColumnName": "created_lob", "toType": "CLOB"},
        {"change": "copyColumn", "tableName": "notes", "fromColumnName": "title", "fromType": "VARCHAR(100)",
         "toColumnName": "title_bin", "toType": "BLOB"}
    ]))]);

    let to_clob = messages_containing(&issues, "Oracle TO_CLOB function");
    assert_eq!(to_clob.len(), 1);
    assert!(to_clob[0].starts_with("DATE isn't one of types permitted"));
    assert_eq!(
        messages_containing(&issues, "Copy column cannot convert"),
        vec!["Copy column cannot convert VARCHAR into BLOB.".to_string()]
    );
}

// ============================================================================
// Column declarations
// ============================================================================

#[test]
fn test_untyped_default_value_hint() {
    let issues = validate(&[single_set(json!([
        {"change": "createTable", "tableName": "flags", "columns": [
            {"name": "active", "type": "BOOLEAN", "defaultValue": "true"},
            {"name": "enabled", "type": "BOOLEAN", "defaultValueBoolean": true},
            {"name": "label", "type": "VARCHAR(10)", "defaultValue": "none"}
        ]}
    ]))]);

    assert_eq!(
        messages_containing(&issues, "defaultValue is not allowed because is not portable"),
        vec!["defaultValue is not allowed because is not portable. Replace it with defaultBooleanValue".to_string()]
    );
}

#[test]
fn test_drop_column_name_or_nested_columns() {
    let issues = validate(&[single_set(json!([
        {"change": "createTable", "tableName": "orders", "columns": [
            column("code", "VARCHAR(10)"),
            column("note", "VARCHAR(10)"),
            column("extra", "VARCHAR(10)")
        ]},
        {"change": "dropColumn", "tableName": "orders", "columnName": "code", "columns": [{"name": "note"}]},
        {"change": "dropColumn", "tableName": "orders", "columnName": "extra"}
    ]))]);

    assert_eq!(
        messages_containing(&issues, "Drop column does not permit"),
        vec!["Drop column does not permit columnName attribute and nested columns to be declared at the same time".to_string()]
    );
}

#[test]
fn test_insert_loading_lob_needs_every_value() {
    let issues = validate(&[single_set(json!([
        {"change": "insert", "tableName": "documents", "columns": [
            {"name": "body", "valueClobFile": "body.txt"},
            {"name": "id"}
        ]},
        {"change": "insert", "tableName": "documents", "columns": [
            {"name": "body", "valueClobFile": "body.txt"},
            {"name": "id", "valueNumeric": 2}
        ]}
    ]))]);

    assert_eq!(
        messages_containing(&issues, "Insert data does not permit"),
        vec!["Insert data does not permit any column of table documents to be declared without a value".to_string()]
    );
}
