//! Validators over the plain attributes of any change

use std::collections::BTreeSet;

use super::{ChangeValidator, EvaluationContext, Subject, ValidationIssue};
use crate::error::LintError;
use crate::model::{ChangeRef, ChangeTag};
use crate::rules::{LowerCase, MaxLength, MinLength, NotPermitted, RuleEngine};
use crate::state::SchemaStore;
use crate::util::split_names;

/// Attributes that bind a change to one database vendor
pub const NON_PORTABLE_ATTRIBUTES: &[&str] = &[
    "catalogName",
    "schemaName",
    "baseTableCatalogName",
    "baseTableSchemaName",
    "referencedTableCatalogName",
    "referencedTableSchemaName",
    "defaultValueComputed",
];

/// Attributes holding identifiers that must be lower case
pub const LOWER_CASE_ATTRIBUTES: &[&str] = &[
    "tableName",
    "columnName",
    "baseColumnNames",
    "constraintName",
    "baseTableName",
    "referencedTableName",
    "columnNames",
    "sequenceName",
    "indexName",
    "newColumnName",
    "oldColumnName",
    "newSequenceName",
    "oldSequenceName",
];

/// Attributes holding identifiers subject to the Oracle length limit
pub const ORACLE_IDENTIFIER_ATTRIBUTES: &[&str] = &[
    "constraintName",
    "indexName",
    "baseColumnNames",
    "baseTableName",
    "referencedTableName",
    "tableName",
    "columnName",
    "sequenceName",
    "newColumnName",
    "oldColumnName",
    "newSequenceName",
    "oldSequenceName",
];

// ============================================================================
// Change type filter
// ============================================================================

/// Change types allowed and rejected by configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeFilter {
    include: BTreeSet<ChangeTag>,
    exclude: BTreeSet<ChangeTag>,
}

impl ChangeFilter {
    /// Build a filter from change element names.
    ///
    /// Fails on an unknown element name or when a change is both included and excluded.
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self, LintError> {
        let include = Self::tags(include)?;
        let exclude = Self::tags(exclude)?;
        let overlap: Vec<&str> = include
            .intersection(&exclude)
            .map(|tag| tag.element_name())
            .collect();
        if !overlap.is_empty() {
            return Err(LintError::OverlappingChangeFilters {
                changes: overlap.join(", "),
            });
        }
        Ok(Self { include, exclude })
    }

    fn tags(names: &[String]) -> Result<BTreeSet<ChangeTag>, LintError> {
        names
            .iter()
            .map(|name| {
                ChangeTag::from_element_name(name.trim()).ok_or_else(|| {
                    LintError::UnknownChangeType { name: name.clone() }
                })
            })
            .collect()
    }

    /// Violation message for a change type, if the filter rejects it
    pub fn rejection(&self, tag: ChangeTag) -> Option<String> {
        if self.exclude.contains(&tag) {
            Some(format!(
                "The change {} is not allowed by the exclusion filter",
                tag.element_name()
            ))
        } else if !self.include.is_empty() && !self.include.contains(&tag) {
            Some(format!(
                "The change {} is not allowed by the inclusion filter",
                tag.element_name()
            ))
        } else {
            None
        }
    }
}

pub struct FilterChangesValidator<'s> {
    filter: &'s ChangeFilter,
}

impl<'s> FilterChangesValidator<'s> {
    pub fn new(filter: &'s ChangeFilter) -> Self {
        Self { filter }
    }
}

impl ChangeValidator for FilterChangesValidator<'_> {
    fn name(&self) -> &'static str {
        "filterChanges"
    }

    fn validate(
        &mut self,
        change: ChangeRef<'_>,
        _store: &SchemaStore,
    ) -> Result<Vec<ValidationIssue>, LintError> {
        Ok(self
            .filter
            .rejection(change.change.tag())
            .map(|message| ValidationIssue::for_change(change, None, message))
            .into_iter()
            .collect())
    }
}

// ============================================================================
// Attribute lists
// ============================================================================

fn attribute_contexts<'a>(
    change: ChangeRef<'a>,
    attributes: &'static [&'static str],
) -> impl Iterator<Item = std::rc::Rc<EvaluationContext<'a>>> {
    attributes
        .iter()
        .map(move |attribute| EvaluationContext::from_subject(Subject::Change(change), attribute))
}

/// Listed attributes must be absent
pub struct NotPermittedValidator {
    attributes: &'static [&'static str],
}

impl NotPermittedValidator {
    pub fn new(attributes: &'static [&'static str]) -> Self {
        Self { attributes }
    }

    pub fn non_portable() -> Self {
        Self::new(NON_PORTABLE_ATTRIBUTES)
    }
}

impl ChangeValidator for NotPermittedValidator {
    fn name(&self) -> &'static str {
        "notPermitted"
    }

    fn validate(
        &mut self,
        change: ChangeRef<'_>,
        _store: &SchemaStore,
    ) -> Result<Vec<ValidationIssue>, LintError> {
        let mut engine = RuleEngine::new();
        engine.add(&NotPermitted, attribute_contexts(change, self.attributes));
        engine.execute()
    }
}

/// Listed attributes must be lower case
pub struct LowerCaseValidator {
    attributes: &'static [&'static str],
}

impl LowerCaseValidator {
    pub fn new(attributes: &'static [&'static str]) -> Self {
        Self { attributes }
    }
}

impl Default for LowerCaseValidator {
    fn default() -> Self {
        Self::new(LOWER_CASE_ATTRIBUTES)
    }
}

impl ChangeValidator for LowerCaseValidator {
    fn name(&self) -> &'static str {
        "lowerCase"
    }

    fn validate(
        &mut self,
        change: ChangeRef<'_>,
        _store: &SchemaStore,
    ) -> Result<Vec<ValidationIssue>, LintError> {
        let mut engine = RuleEngine::new();
        engine.add(&LowerCase, attribute_contexts(change, self.attributes));
        engine.execute()
    }
}

/// Every comma separated identifier of the listed attributes must fit a length range
pub struct LengthRangeValidator {
    name: &'static str,
    min: usize,
    max: usize,
    attributes: &'static [&'static str],
}

impl LengthRangeValidator {
    pub fn new(name: &'static str, min: usize, max: usize, attributes: &'static [&'static str]) -> Self {
        Self {
            name,
            min,
            max,
            attributes,
        }
    }

    /// Oracle 11g identifiers are limited to `max` characters
    pub fn oracle(max: usize) -> Self {
        Self::new("oracleLength", 0, max, ORACLE_IDENTIFIER_ATTRIBUTES)
    }
}

impl ChangeValidator for LengthRangeValidator {
    fn name(&self) -> &'static str {
        self.name
    }

    fn validate(
        &mut self,
        change: ChangeRef<'_>,
        _store: &SchemaStore,
    ) -> Result<Vec<ValidationIssue>, LintError> {
        let mut contexts = Vec::new();
        for attribute in self.attributes {
            let Some(value) = change.change.attribute(attribute)? else {
                continue;
            };
            for token in split_names(&value) {
                contexts.push(EvaluationContext::with_value(
                    Subject::Change(change),
                    attribute,
                    Some(token.to_string()),
                ));
            }
        }
        let mut engine = RuleEngine::new();
        engine.add(&MinLength(self.min), contexts.iter().cloned());
        engine.add(&MaxLength(self.max), contexts);
        engine.execute()
    }
}
