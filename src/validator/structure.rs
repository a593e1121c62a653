//! Shape checks for sequences, views, column drops and inserts

use std::collections::HashMap;

use super::{ChangeValidator, EvaluationContext, Subject, ValidationIssue};
use crate::error::LintError;
use crate::model::{Change, ChangeRef};
use crate::rules::{Equals, RuleEngine, Required};
use crate::state::SchemaStore;

/// New sequences must declare the expected start value and increment
pub struct SequenceValidator {
    expected: Equals,
}

impl SequenceValidator {
    pub fn new(expected: &str) -> Result<Self, LintError> {
        Ok(Self {
            expected: Equals::new(expected)?,
        })
    }
}

impl ChangeValidator for SequenceValidator {
    fn name(&self) -> &'static str {
        "sequence"
    }

    fn validate(
        &mut self,
        change: ChangeRef<'_>,
        _store: &SchemaStore,
    ) -> Result<Vec<ValidationIssue>, LintError> {
        let contexts = [
            EvaluationContext::from_subject(Subject::Change(change), "startValue"),
            EvaluationContext::from_subject(Subject::Change(change), "incrementBy"),
        ];
        let mut engine = RuleEngine::new();
        engine.add(&Required, contexts.iter().cloned());
        engine.add(&self.expected, contexts);
        engine.execute()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DropColumnValidator;

impl ChangeValidator for DropColumnValidator {
    fn name(&self) -> &'static str {
        "dropColumnChange"
    }

    fn validate(
        &mut self,
        change: ChangeRef<'_>,
        _store: &SchemaStore,
    ) -> Result<Vec<ValidationIssue>, LintError> {
        match change.change {
            Change::DropColumn(c) if c.column_name.is_some() && !c.columns.is_empty() => {
                Ok(vec![ValidationIssue::for_change(
                    change,
                    Some("columnName"),
                    "Drop column does not permit columnName attribute and nested columns to be declared at the same time",
                )])
            }
            _ => Ok(Vec::new()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReplaceViewValidator;

impl ChangeValidator for ReplaceViewValidator {
    fn name(&self) -> &'static str {
        "replaceView"
    }

    fn validate(
        &mut self,
        change: ChangeRef<'_>,
        _store: &SchemaStore,
    ) -> Result<Vec<ValidationIssue>, LintError> {
        match change.change {
            Change::CreateView(c) if c.replace_if_exists.is_some() => {
                Ok(vec![ValidationIssue::for_change(
                    change,
                    Some("replaceIfExists"),
                    "Create view cannot contain attribute replaceIfExists",
                )])
            }
            _ => Ok(Vec::new()),
        }
    }
}

/// An insert loading a LOB file must give every column a value
#[derive(Debug, Clone, Copy, Default)]
pub struct InsertColumnsValidator;

impl ChangeValidator for InsertColumnsValidator {
    fn name(&self) -> &'static str {
        "insertColumnsChange"
    }

    fn validate(
        &mut self,
        change: ChangeRef<'_>,
        _store: &SchemaStore,
    ) -> Result<Vec<ValidationIssue>, LintError> {
        let Change::InsertData(c) = change.change else {
            return Ok(Vec::new());
        };
        let loads_lob = c
            .columns
            .iter()
            .any(|column| column.value_clob_file.is_some() || column.value_blob_file.is_some());
        if loads_lob && c.columns.iter().any(|column| !column.has_value()) {
            let message = format!(
                "Insert data does not permit any column of table {} to be declared without a value",
                c.table_name.as_deref().unwrap_or("null")
            );
            return Ok(vec![ValidationIssue::for_change(change, Some("value"), message)]);
        }
        Ok(Vec::new())
    }
}

/// Rows of a table may only be inserted from one changelog
pub struct InsertDataValidator<'s> {
    owners: &'s mut HashMap<String, String>,
}

impl<'s> InsertDataValidator<'s> {
    pub fn new(owners: &'s mut HashMap<String, String>) -> Self {
        Self { owners }
    }
}

impl ChangeValidator for InsertDataValidator<'_> {
    fn name(&self) -> &'static str {
        "insertDataChange"
    }

    fn validate(
        &mut self,
        change: ChangeRef<'_>,
        _store: &SchemaStore,
    ) -> Result<Vec<ValidationIssue>, LintError> {
        let Change::InsertData(c) = change.change else {
            return Ok(Vec::new());
        };
        let Some(table) = c.table_name.as_deref() else {
            return Ok(Vec::new());
        };
        let file_path = change.set.change_log.file_path();
        match self.owners.get(table) {
            None => {
                self.owners.insert(table.to_string(), file_path.to_string());
                Ok(Vec::new())
            }
            Some(owner) if owner == file_path => Ok(Vec::new()),
            Some(owner) => {
                let message = format!(
                    "The table name {} is already used in {} project",
                    table, owner
                );
                Ok(vec![ValidationIssue::for_change(change, Some("name"), message)])
            }
        }
    }
}
