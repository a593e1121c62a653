//! Error types for rust-changelog-lint
//!
//! Validation findings are never errors; they are returned as
//! [`ValidationIssue`](crate::validator::ValidationIssue) values. The variants below cover
//! configuration mistakes (raised before any change is processed), malformed
//! change records (raised mid-session, halting it) and changelog loading failures.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while configuring or running a validation session
#[derive(Error, Debug)]
pub enum LintError {
    #[error("Some changes are included in both includeChanges/excludeChanges: {changes}")]
    OverlappingChangeFilters { changes: String },

    #[error("Unknown change type in filter: {name}")]
    UnknownChangeType { name: String },

    #[error("Invalid value '{value}' for validator parameter {key}")]
    InvalidLimit {
        key: String,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("Validator parameter {key} is not addressed to any validator")]
    MissingValidatorName { key: String },

    #[error("Invalid issue pattern: {pattern}")]
    InvalidIssuePattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Expected value of an equality rule must not be blank")]
    InvalidEqualsExpectation,

    #[error("Attribute {attribute} is not defined for element {element}")]
    UnknownAttribute { element: String, attribute: String },

    #[error("Element {element} requires attribute {attribute}")]
    MissingAttribute { element: String, attribute: String },

    #[error("Attribute {attribute} has a non numeric value '{value}'")]
    MalformedNumber {
        attribute: String,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("Evaluation context for attribute {attribute} has no change ancestor")]
    InvalidContext { attribute: String },

    #[error("Failed to read changelog file: {path}")]
    ChangeLogReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse changelog file: {path}")]
    ChangeLogParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to walk source directory: {path}")]
    SourceWalkError {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Invalid changelog include pattern: {pattern}")]
    InvalidIncludePattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

/// Borrow a mandatory attribute, reporting the element and attribute when it is absent.
pub(crate) fn required<'a>(
    value: &'a Option<String>,
    element: &str,
    attribute: &str,
) -> Result<&'a str, LintError> {
    value
        .as_deref()
        .ok_or_else(|| LintError::MissingAttribute {
            element: element.to_string(),
            attribute: attribute.to_string(),
        })
}

/// Parse an integer attribute value, reporting the attribute on failure.
pub(crate) fn parse_number(attribute: &str, value: &str) -> Result<u64, LintError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|source| LintError::MalformedNumber {
            attribute: attribute.to_string(),
            value: value.to_string(),
            source,
        })
}

impl LintError {
    /// Attribute a malformed number to the attribute that was being evaluated.
    pub(crate) fn at_attribute(self, name: &str) -> Self {
        match self {
            LintError::MalformedNumber { value, source, .. } => LintError::MalformedNumber {
                attribute: name.to_string(),
                value,
                source,
            },
            other => other,
        }
    }
}
