//! Validators over nested column declarations

use std::rc::Rc;

use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use super::{ChangeValidator, EvaluationContext, Subject, ValidationIssue};
use crate::error::{parse_number, LintError};
use crate::model::{Change, ChangeRef, ColumnConfig};
use crate::rules::{
    DataType, LobDimension, LowerCase, MaxLength, MinLength, NotPermitted, NumericPrecision,
    RuleEngine,
};
use crate::state::SchemaStore;
use crate::util::{get_param, remove_param};

const TENANT_ID: &str = "tenant_id";

static DECIMAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?[0-9]+(\.([0-9]+))?$").expect("decimal pattern is valid")
});

/// Typed default attribute that replaces `defaultValue` for a base type
fn typed_default_attribute(data_type: &str) -> Option<&'static str> {
    match remove_param(&data_type.trim().to_uppercase()).as_str() {
        "BOOLEAN" => Some("defaultBooleanValue"),
        "INTEGER" | "SMALLINT" | "BIGINT" | "REAL" | "DOUBLE PRECISION" | "DECIMAL"
        | "NUMERIC" | "FLOAT" => Some("defaultNumericValue"),
        "TIMESTAMP" | "DATE" => Some("defaultDateValue"),
        _ => None,
    }
}

// ============================================================================
// Column declarations
// ============================================================================

/// Names, types, value attributes and inline constraints of declared columns
pub struct ColumnsValidator {
    min_length: usize,
    max_length: usize,
    max_precision: u64,
}

impl ColumnsValidator {
    pub fn new(min_length: usize, max_length: usize, max_precision: u64) -> Self {
        Self {
            min_length,
            max_length,
            max_precision,
        }
    }

    fn value_contexts<'a>(
        parent: &Rc<EvaluationContext<'a>>,
        column: &'a ColumnConfig,
    ) -> Vec<Rc<EvaluationContext<'a>>> {
        let subject = Subject::Column(column);
        [
            ("computed", column.computed.map(|flag| flag.to_string())),
            ("value", column.value.clone()),
            ("valueNumeric", column.value_numeric.clone()),
            ("valueDate", column.value_date.clone()),
            ("valueBoolean", column.value_boolean.clone()),
            ("valueBlobFile", column.value_blob_file.clone()),
            ("valueClobFile", column.value_clob_file.clone()),
            ("valueComputed", column.value_computed.clone()),
            ("defaultValueComputed", column.default_value_computed.clone()),
        ]
        .into_iter()
        .map(|(attribute, value)| parent.child(subject, attribute, value))
        .collect()
    }
}

impl ChangeValidator for ColumnsValidator {
    fn name(&self) -> &'static str {
        "columns"
    }

    fn validate(
        &mut self,
        change: ChangeRef<'_>,
        _store: &SchemaStore,
    ) -> Result<Vec<ValidationIssue>, LintError> {
        let Some(columns) = change.change.columns() else {
            return Ok(Vec::new());
        };
        let min = MinLength(self.min_length);
        let max = MaxLength(self.max_length);
        let precision = NumericPrecision(self.max_precision);

        let parent = EvaluationContext::from_subject(Subject::Change(change), "columns");
        let mut engine = RuleEngine::new();
        let mut issues = Vec::new();
        for column in columns {
            let subject = Subject::Column(column);
            let name = parent.child(subject, "name", column.name.clone());
            let data_type = parent.child(subject, "type", column.data_type.clone());
            engine.add(&LowerCase, [Rc::clone(&name)]);
            engine.add(&max, [Rc::clone(&name)]);
            engine.add(&min, [name]);
            engine.add(&DataType, [Rc::clone(&data_type)]);
            engine.add(&NotPermitted, Self::value_contexts(&parent, column));
            engine.add(&precision, [Rc::clone(&data_type)]);
            engine.add(&LobDimension, [data_type]);

            if let Some(constraints) = &column.constraints {
                let subject = Subject::Constraints(constraints);
                let names = [
                    parent.child(
                        subject,
                        "uniqueConstraintName",
                        constraints.unique_constraint_name.clone(),
                    ),
                    parent.child(subject, "foreignKeyName", constraints.foreign_key_name.clone()),
                    parent.child(subject, "primaryKeyName", constraints.primary_key_name.clone()),
                ];
                engine.add(&LowerCase, names.iter().cloned());
                engine.add(&min, names.iter().cloned());
                engine.add(&max, names);
                engine.add(
                    &NotPermitted,
                    [
                        parent.child(
                            subject,
                            "privateKeyTablespace",
                            constraints.primary_key_tablespace.clone(),
                        ),
                        parent.child(
                            subject,
                            "referencedTableCatalogName",
                            constraints.referenced_table_catalog_name.clone(),
                        ),
                        parent.child(
                            subject,
                            "referencedTableSchemaName",
                            constraints.referenced_table_schema_name.clone(),
                        ),
                    ],
                );
            }

            let typed = column
                .data_type
                .as_deref()
                .filter(|_| column.default_value.is_some())
                .and_then(typed_default_attribute);
            if let Some(typed) = typed {
                issues.push(ValidationIssue::for_change(
                    change,
                    Some("defaultValue"),
                    format!(
                        "defaultValue is not allowed because is not portable. Replace it with {}",
                        typed
                    ),
                ));
            }
        }
        issues.extend(engine.execute()?);
        Ok(issues)
    }
}

// ============================================================================
// Oracle VARCHAR limit
// ============================================================================

/// Oracle 11g caps VARCHAR at a fixed length; longer text needs a CLOB
pub struct OracleClobValidator {
    max_length: u64,
}

impl OracleClobValidator {
    pub fn new(max_length: u64) -> Self {
        Self { max_length }
    }

    fn exceeds(&self, data_type: &str) -> Result<bool, LintError> {
        if !remove_param(data_type).eq_ignore_ascii_case("varchar") {
            return Ok(false);
        }
        let length = get_param(data_type);
        if length.is_empty() {
            return Ok(false);
        }
        Ok(parse_number("type", &length)? > self.max_length)
    }

    fn message(&self) -> String {
        format!(
            "Oracle 11g not allows column of type VARCHAR greater than {}, a CLOB must be used instead of that",
            self.max_length
        )
    }
}

impl ChangeValidator for OracleClobValidator {
    fn name(&self) -> &'static str {
        "oracleCLOB"
    }

    fn validate(
        &mut self,
        change: ChangeRef<'_>,
        _store: &SchemaStore,
    ) -> Result<Vec<ValidationIssue>, LintError> {
        let mut issues = Vec::new();
        for column in change.change.columns().unwrap_or_default() {
            let Some(data_type) = column.data_type.as_deref() else {
                continue;
            };
            if self.exceeds(data_type)? {
                issues.push(ValidationIssue::for_change_element(
                    change,
                    "column",
                    Some("value"),
                    self.message(),
                ));
            }
        }
        if let Change::ModifyDataType(c) | Change::ResizeDataType(c) = change.change {
            if let Some(new_type) = c.new_data_type.as_deref() {
                if self
                    .exceeds(new_type)
                    .map_err(|e| e.at_attribute("newDataType"))?
                {
                    issues.push(ValidationIssue::for_change(
                        change,
                        Some("newDataType"),
                        self.message(),
                    ));
                }
            }
        }
        Ok(issues)
    }
}

// ============================================================================
// Typed values
// ============================================================================

/// Textual values that look boolean, date or numeric should use the typed attribute
#[derive(Debug, Clone, Copy, Default)]
pub struct TypedValueValidator;

impl TypedValueValidator {
    fn is_date(value: &str) -> bool {
        if value.len() > 10 {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.3f").is_ok()
        } else {
            NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
        }
    }

    /// Typed attribute suffix suggested for a textual value
    fn typed_suffix(value: &str) -> Option<&'static str> {
        if value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false") {
            Some("Boolean")
        } else if Self::is_date(value) {
            Some("Date")
        } else if DECIMAL.is_match(value) {
            Some("Numeric")
        } else {
            None
        }
    }
}

impl ChangeValidator for TypedValueValidator {
    fn name(&self) -> &'static str {
        "value"
    }

    fn validate(
        &mut self,
        change: ChangeRef<'_>,
        _store: &SchemaStore,
    ) -> Result<Vec<ValidationIssue>, LintError> {
        let columns = match change.change {
            Change::InsertData(c) => &c.columns,
            Change::CreateTable(c) => &c.columns,
            Change::AddColumn(c) => &c.columns,
            _ => return Ok(Vec::new()),
        };
        let table = change.change.table_name().unwrap_or("null");
        let mut issues = Vec::new();
        for column in columns {
            let (attribute, value) = match (&column.value, &column.default_value) {
                (Some(value), _) => ("value", value),
                (None, Some(value)) => ("defaultValue", value),
                (None, None) => continue,
            };
            if column.is_named(TENANT_ID) {
                continue;
            }
            if let Some(suffix) = Self::typed_suffix(value) {
                let message = format!(
                    "Use the specific {}{} attribute for {}.{}",
                    attribute,
                    suffix,
                    table,
                    column.name.as_deref().unwrap_or("null")
                );
                issues.push(ValidationIssue::for_change(change, Some("name"), message));
            }
        }
        Ok(issues)
    }
}
