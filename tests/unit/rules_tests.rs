//! Rule catalog and rule engine tests

use pretty_assertions::assert_eq;

use rust_changelog_lint::rules::{
    DataType, Equals, LobDimension, MaxLength, MinLength, NotPermitted, NumericPrecision, Required,
    Rule, RuleEngine, SQL99_DATATYPES, SQL99_PARAMETRIC_DATATYPES,
};
use rust_changelog_lint::validator::{EvaluationContext, Subject};
use rust_changelog_lint::{LintError, ValidatorConfig};

use crate::common::single_set;

// ============================================================================
// Type whitelist
// ============================================================================

#[test]
fn test_every_fixed_type_passes() {
    for data_type in SQL99_DATATYPES {
        assert!(
            DataType.is_valid(Some(*data_type)).unwrap(),
            "{} should be a standard type",
            data_type
        );
    }
}

#[test]
fn test_every_parametric_type_with_length_passes() {
    for data_type in SQL99_PARAMETRIC_DATATYPES {
        let declared = format!("{}(8)", data_type);
        assert!(
            DataType.is_valid(Some(&declared)).unwrap(),
            "{} should be a standard type",
            declared
        );
    }
}

#[test]
fn test_non_standard_type_fails() {
    assert!(!DataType.is_valid(Some("INT8")).unwrap());
    assert!(DataType
        .message("type", Some("INT8"))
        .ends_with("isn't one of SQL-99 standard types"));
}

#[test]
fn test_absent_values_are_vacuously_valid() {
    assert!(DataType.is_valid(None).unwrap());
    assert!(MinLength(3).is_valid(None).unwrap());
    assert!(MaxLength(3).is_valid(None).unwrap());
    assert!(NumericPrecision(31).is_valid(None).unwrap());
    assert!(LobDimension.is_valid(None).unwrap());
    assert!(!Required.is_valid(None).unwrap());
    assert!(NotPermitted.is_valid(None).unwrap());
}

#[test]
fn test_numeric_precision_bound() {
    let rule = NumericPrecision(31);
    assert!(rule.is_valid(Some("NUMERIC(31,2)")).unwrap());
    assert!(!rule.is_valid(Some("NUMERIC(32)")).unwrap());
}

#[test]
fn test_malformed_precision_is_error() {
    let result = NumericPrecision(31).is_valid(Some("NUMERIC(x)"));
    assert!(matches!(result, Err(LintError::MalformedNumber { .. })));
}

#[test]
fn test_blank_expectation_rejected() {
    assert!(matches!(Equals::new("  "), Err(LintError::InvalidEqualsExpectation)));
}

// ============================================================================
// Engine
// ============================================================================

#[test]
fn test_engine_reports_each_failing_binding() {
    let change_log = single_set(serde_json::json!([
        {"change": "createSequence", "sequenceName": "s"}
    ]));
    let change_set = change_log.change_set_refs().next().unwrap();
    let change = change_set.changes().next().unwrap();

    let contexts = [
        EvaluationContext::from_subject(Subject::Change(change), "startValue"),
        EvaluationContext::from_subject(Subject::Change(change), "incrementBy"),
        EvaluationContext::from_subject(Subject::Change(change), "sequenceName"),
    ];
    let mut engine = RuleEngine::new();
    engine.add(&Required, contexts);
    let issues = engine.execute().unwrap();

    let attributes: Vec<_> = issues.iter().map(|i| i.attribute.clone()).collect();
    assert_eq!(
        attributes,
        vec![Some("startValue".to_string()), Some("incrementBy".to_string())]
    );
    assert_eq!(issues[0].element.as_deref(), Some("createSequence"));
    assert_eq!(issues[0].change_set_id.as_deref(), Some("ORDS-1-1"));
}

#[test]
fn test_unknown_attribute_is_error() {
    let change_log = single_set(serde_json::json!([{"change": "dropView", "viewName": "v"}]));
    let change = change_log
        .change_set_refs()
        .next()
        .unwrap()
        .changes()
        .next()
        .unwrap();

    let mut engine = RuleEngine::new();
    engine.add(
        &Required,
        [EvaluationContext::from_subject(Subject::Change(change), "tableNmae")],
    );

    assert!(matches!(
        engine.execute(),
        Err(LintError::UnknownAttribute { .. })
    ));
}

#[test]
fn test_default_config_limits() {
    let config = ValidatorConfig::default();
    assert_eq!(config.limits.row_size_limit, 4005);
    assert_eq!(config.limits.index_key_limit, 1024);
    assert_eq!(config.limits.sequence_step, "50");
    assert!(!config.typed_values);
}
