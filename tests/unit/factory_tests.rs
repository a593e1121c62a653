//! Validator factory dispatch tests

use pretty_assertions::assert_eq;
use serde_json::json;

use rust_changelog_lint::model::{ChangeRef, ChangeSetRef};
use rust_changelog_lint::state::SchemaStore;
use rust_changelog_lint::validator::{
    ChangeSetValidator, ChangeValidator, Scope, ValidationIssue, ValidatorConfig, ValidatorFactory,
};
use rust_changelog_lint::LintError;

use crate::common::{column, single_set};

/// Reports every change with the number of columns the store knows for its table
struct ColumnCount;

impl ChangeValidator for ColumnCount {
    fn name(&self) -> &'static str {
        "columnCount"
    }

    fn validate(
        &mut self,
        change: ChangeRef<'_>,
        store: &SchemaStore,
    ) -> Result<Vec<ValidationIssue>, LintError> {
        let count = change
            .change
            .table_name()
            .map(|table| {
                store
                    .filter_by::<rust_changelog_lint::state::ColumnState>(
                        rust_changelog_lint::state::SearchKey::table(table),
                    )
                    .count()
            })
            .unwrap_or_default();
        Ok(vec![ValidationIssue::for_change(
            change,
            None,
            format!("{} columns", count),
        )])
    }
}

struct Banner;

impl ChangeSetValidator for Banner {
    fn name(&self) -> &'static str {
        "banner"
    }

    fn validate(&mut self, change_set: ChangeSetRef<'_>) -> Result<Vec<ValidationIssue>, LintError> {
        Ok(vec![ValidationIssue::for_change_set(
            change_set,
            None,
            "banner",
        )])
    }
}

fn quiet_config() -> ValidatorConfig {
    ValidatorConfig {
        issue_pattern: None,
        ..Default::default()
    }
}

#[test]
fn test_extra_validator_sees_listener_updates_first() {
    let change_log = single_set(json!([
        {"change": "createTable", "tableName": "t1", "columns": [column("a", "INTEGER")]},
        {"change": "addColumn", "tableName": "t1", "columns": [column("b", "INTEGER")]}
    ]));
    let mut factory = ValidatorFactory::new(&quiet_config()).unwrap();
    factory.register_change_validator(Box::new(ColumnCount));

    let issues = factory.validate_change_log(&change_log).unwrap();

    let counts: Vec<_> = issues
        .iter()
        .filter(|issue| issue.message.ends_with("columns"))
        .map(|issue| issue.message.as_str())
        .collect();
    assert_eq!(counts, vec!["1 columns", "2 columns"]);
    assert_eq!(factory.store().len(), 2);
}

#[test]
fn test_extra_validators_run_before_dispatch() {
    let change_log = single_set(json!([
        {"change": "createView", "viewName": "v", "replaceIfExists": true}
    ]));
    let mut factory = ValidatorFactory::new(&quiet_config()).unwrap();
    factory.register_change_validator(Box::new(ColumnCount));
    factory.register_change_set_validator(Box::new(Banner));

    let issues = factory.validate_change_log(&change_log).unwrap();
    let messages: Vec<_> = issues.iter().map(|issue| issue.message.as_str()).collect();

    assert_eq!(
        messages,
        vec![
            "banner",
            "0 columns",
            "Create view cannot contain attribute replaceIfExists"
        ]
    );
}

#[test]
fn test_extra_validators_honour_ignore_set() {
    let change_log = single_set(json!([
        {"change": "createView", "viewName": "v"}
    ]));
    let config = ValidatorConfig {
        ignore_rules: vec!["columnCount".to_string(), "banner".to_string()],
        ..quiet_config()
    };
    let mut factory = ValidatorFactory::new(&config).unwrap();
    factory.register_change_validator(Box::new(ColumnCount));
    factory.register_change_set_validator(Box::new(Banner));

    assert!(factory.validate_change_log(&change_log).unwrap().is_empty());
}

#[test]
fn test_session_state_lives_with_factory() {
    let change_log = single_set(json!([
        {"change": "createIndex", "tableName": "t1", "indexName": "idx1", "columns": [{"name": "a"}]},
        {"change": "insert", "tableName": "t1", "columns": [{"name": "a", "value": "x"}]}
    ]));
    let mut factory = ValidatorFactory::new(&quiet_config()).unwrap();
    factory.validate_change_log(&change_log).unwrap();

    assert_eq!(factory.session().indexes.len(), 1);
    assert_eq!(
        factory.session().insert_owners.get("t1").map(String::as_str),
        Some("orders")
    );

    let fresh = ValidatorFactory::new(&quiet_config()).unwrap();
    assert!(fresh.session().indexes.is_empty());
}

#[test]
fn test_declared_scopes() {
    assert_eq!(ValidatorFactory::scope("insertDataChange"), Some(Scope::Session));
    assert_eq!(ValidatorFactory::scope("filePath"), Some(Scope::Session));
    assert_eq!(ValidatorFactory::scope("checksum"), Some(Scope::PerCall));
    assert_eq!(ValidatorFactory::scope("columns"), Some(Scope::PerCall));
}

#[test]
fn test_typed_values_are_opt_in() {
    let change_log = single_set(json!([
        {"change": "addColumn", "tableName": "t1", "columns": [
            {"name": "active", "type": "BOOLEAN", "defaultValue": "true"}
        ]}
    ]));
    let hint = |issues: &[ValidationIssue]| {
        issues
            .iter()
            .filter(|issue| issue.message.starts_with("Use the specific defaultValueBoolean"))
            .count()
    };

    let mut off = ValidatorFactory::new(&quiet_config()).unwrap();
    let config = ValidatorConfig {
        typed_values: true,
        ..quiet_config()
    };
    let mut on = ValidatorFactory::new(&config).unwrap();

    assert_eq!(hint(&off.validate_change_log(&change_log).unwrap()), 0);
    assert_eq!(hint(&on.validate_change_log(&change_log).unwrap()), 1);
}

#[test]
fn test_bad_parameter_fails_fast() {
    let mut config = quiet_config();
    config
        .parameters
        .insert("tableSize.rowSizeLimit".to_string(), "lots".to_string());

    assert!(matches!(
        ValidatorFactory::new(&config),
        Err(LintError::InvalidLimit { .. })
    ));
}
