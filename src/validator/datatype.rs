//! Data type validators for type changes and column copies

use super::{ChangeValidator, EvaluationContext, Subject, ValidationIssue};
use crate::error::LintError;
use crate::model::{Change, ChangeRef};
use crate::rules::{DataType, LobDimension, NumericPrecision, Rule, RuleEngine};
use crate::state::SchemaStore;
use crate::util::remove_param;

/// Types Oracle's `TO_CLOB` accepts as a source
const TO_CLOB_SOURCES: &[&str] = &["CHAR", "VARCHAR", "NCHAR", "NVARCHAR", "CLOB", "NCLOB", "NUMBER"];

/// Applies one rule to the `newDataType` of a type change
pub struct NewDataTypeValidator<R> {
    name: &'static str,
    rule: R,
}

impl NewDataTypeValidator<DataType> {
    pub fn sql99() -> Self {
        Self {
            name: "sql99Datatype",
            rule: DataType,
        }
    }
}

impl NewDataTypeValidator<NumericPrecision> {
    pub fn numeric(max_precision: u64) -> Self {
        Self {
            name: "numericType",
            rule: NumericPrecision(max_precision),
        }
    }
}

impl NewDataTypeValidator<LobDimension> {
    pub fn lob() -> Self {
        Self {
            name: "lobType",
            rule: LobDimension,
        }
    }
}

impl<R: Rule + Clone + 'static> ChangeValidator for NewDataTypeValidator<R> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn validate(
        &mut self,
        change: ChangeRef<'_>,
        _store: &SchemaStore,
    ) -> Result<Vec<ValidationIssue>, LintError> {
        let mut engine = RuleEngine::new();
        engine.add(
            &self.rule,
            [EvaluationContext::from_subject(Subject::Change(change), "newDataType")],
        );
        engine.execute()
    }
}

/// Oracle 11g cannot modify a column into a LOB
#[derive(Debug, Clone, Copy, Default)]
pub struct OracleModifyDataTypeValidator;

impl ChangeValidator for OracleModifyDataTypeValidator {
    fn name(&self) -> &'static str {
        "oracleModifyDataType"
    }

    fn validate(
        &mut self,
        change: ChangeRef<'_>,
        _store: &SchemaStore,
    ) -> Result<Vec<ValidationIssue>, LintError> {
        let Change::ModifyDataType(c) = change.change else {
            return Ok(Vec::new());
        };
        let Some(new_type) = c.new_data_type.as_deref() else {
            return Ok(Vec::new());
        };
        let base = remove_param(&new_type.to_uppercase());
        if base != "CLOB" && base != "BLOB" {
            return Ok(Vec::new());
        }
        let message = format!(
            "Oracle 11g not allows modify data type to {}. If you are trying to resize the column use resizeDataType instead of modifyDataType. If not, the correct way to proceed is add a new column and then move data to the new column",
            base
        );
        Ok(vec![ValidationIssue::for_change_element(
            change,
            "column",
            Some("modifyDataType"),
            message,
        )])
    }
}

/// Both types of a column copy must be standard, and LOB targets need a convertible source
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyColumnValidator;

impl ChangeValidator for CopyColumnValidator {
    fn name(&self) -> &'static str {
        "copyColumn"
    }

    fn validate(
        &mut self,
        change: ChangeRef<'_>,
        _store: &SchemaStore,
    ) -> Result<Vec<ValidationIssue>, LintError> {
        let mut engine = RuleEngine::new();
        engine.add(
            &DataType,
            [
                EvaluationContext::from_subject(Subject::Change(change), "toType"),
                EvaluationContext::from_subject(Subject::Change(change), "fromType"),
            ],
        );
        let mut issues = engine.execute()?;

        let Change::CopyColumn(c) = change.change else {
            return Ok(issues);
        };
        let base = |data_type: &Option<String>| {
            data_type
                .as_deref()
                .map(|t| remove_param(t).to_uppercase())
                .unwrap_or_default()
        };
        let to_type = base(&c.to_type);
        let from_type = base(&c.from_type);
        match to_type.as_str() {
            "CLOB" if !TO_CLOB_SOURCES.contains(&from_type.as_str()) => {
                issues.push(ValidationIssue::for_change(
                    change,
                    Some("fromType"),
                    format!(
                        "{} isn't one of types permitted by Oracle TO_CLOB function. Use one of these: [{}]",
                        from_type,
                        TO_CLOB_SOURCES.join(", ")
                    ),
                ));
            }
            "BLOB" | "NCLOB" if from_type != to_type => {
                issues.push(ValidationIssue::for_change(
                    change,
                    Some("toType"),
                    format!("Copy column cannot convert {} into {}.", from_type, to_type),
                ));
            }
            _ => {}
        }
        Ok(issues)
    }
}
