//! Presence, equality, length and case rules

use super::{shown, Rule};
use crate::error::LintError;
use crate::util::is_blank;

/// Valid when the value is non-blank
#[derive(Debug, Clone, Copy, Default)]
pub struct Required;

impl Rule for Required {
    fn is_valid(&self, value: Option<&str>) -> Result<bool, LintError> {
        Ok(!is_blank(value))
    }

    fn message(&self, field: &str, _value: Option<&str>) -> String {
        format!("{} is a required attribute", field)
    }
}

/// Valid when the attribute is absent; its presence is the violation
#[derive(Debug, Clone, Copy, Default)]
pub struct NotPermitted;

impl Rule for NotPermitted {
    fn is_valid(&self, value: Option<&str>) -> Result<bool, LintError> {
        Ok(value.is_none())
    }

    fn message(&self, field: &str, _value: Option<&str>) -> String {
        format!("{} is not allowed because is not portable", field)
    }
}

/// Valid when the value equals the expected one exactly
#[derive(Debug, Clone)]
pub struct Equals {
    expected: String,
}

impl Equals {
    pub fn new(expected: &str) -> Result<Self, LintError> {
        if expected.trim().is_empty() {
            return Err(LintError::InvalidEqualsExpectation);
        }
        Ok(Self {
            expected: expected.to_string(),
        })
    }
}

impl Rule for Equals {
    fn is_valid(&self, value: Option<&str>) -> Result<bool, LintError> {
        Ok(value == Some(self.expected.as_str()))
    }

    fn message(&self, _field: &str, value: Option<&str>) -> String {
        format!(
            "{} does not matches the expected value {}",
            shown(value),
            self.expected
        )
    }
}

/// Valid when absent or the trimmed value has at least `min` UTF-16 code units
#[derive(Debug, Clone, Copy)]
pub struct MinLength(pub usize);

impl Rule for MinLength {
    fn is_valid(&self, value: Option<&str>) -> Result<bool, LintError> {
        Ok(value.map_or(true, |v| v.trim().encode_utf16().count() >= self.0))
    }

    fn message(&self, _field: &str, value: Option<&str>) -> String {
        format!("{} is shorter than {}", shown(value), self.0)
    }
}

/// Valid when absent or the trimmed value has at most `max` UTF-16 code units
#[derive(Debug, Clone, Copy)]
pub struct MaxLength(pub usize);

impl Rule for MaxLength {
    fn is_valid(&self, value: Option<&str>) -> Result<bool, LintError> {
        Ok(value.map_or(true, |v| v.trim().encode_utf16().count() <= self.0))
    }

    fn message(&self, _field: &str, value: Option<&str>) -> String {
        format!("{} exceeds max length {}", shown(value), self.0)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LowerCase;

impl Rule for LowerCase {
    fn is_valid(&self, value: Option<&str>) -> Result<bool, LintError> {
        Ok(value.map_or(true, |v| v == v.to_lowercase()))
    }

    fn message(&self, _field: &str, value: Option<&str>) -> String {
        format!("{} must be lowercase", shown(value))
    }
}
