//! Validator configuration

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::warn;

use crate::error::LintError;

/// Default change set id pattern: a tracker key with a number, or a bare number
pub const DEFAULT_ISSUE_PATTERN: &str = r"[A-Z][A-Z0-9]{3,}-\d+|\d{1,6}";

/// Configuration consumed by a validation session
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidatorConfig {
    /// Change element names allowed; empty allows every change
    pub include_changes: Vec<String>,
    /// Change element names rejected
    pub exclude_changes: Vec<String>,
    /// Validator names to suppress
    pub ignore_rules: Vec<String>,
    /// Change set ids to skip when they are database specific
    pub skip_change_sets: Vec<String>,
    /// Change set id pattern; `None` disables the check
    pub issue_pattern: Option<String>,
    /// Expected logical file path of every changelog
    pub artifact_id: Option<String>,
    /// Changelog root used to derive the expected logical file path when no artifact id is set
    pub source_dir: Option<PathBuf>,
    /// Hint at typed value attributes for textual values that look boolean, numeric or date
    pub typed_values: bool,
    pub limits: Limits,
    /// Validator specific settings addressed as `<validatorName>.<key>`
    pub parameters: BTreeMap<String, String>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            include_changes: Vec::new(),
            exclude_changes: Vec::new(),
            ignore_rules: Vec::new(),
            skip_change_sets: Vec::new(),
            issue_pattern: Some(DEFAULT_ISSUE_PATTERN.to_string()),
            artifact_id: None,
            source_dir: None,
            typed_values: false,
            limits: Limits::default(),
            parameters: BTreeMap::new(),
        }
    }
}

/// Numeric limits and validator settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Limits {
    pub min_name_length: usize,
    pub max_name_length: usize,
    pub column_max_precision: u64,
    pub sequence_name_max_length: usize,
    pub numeric_max_precision: u64,
    /// DB2 row size limit for a 4KB page regular table space
    pub row_size_limit: u64,
    /// DB2 index key limit, a quarter of the page size
    pub index_key_limit: u64,
    pub oracle_identifier_length: usize,
    pub oracle_varchar_length: u64,
    /// Required sequence start value and increment
    pub sequence_step: String,
    pub file_path_suffix: Option<String>,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            min_name_length: 1,
            max_name_length: 30,
            column_max_precision: 31,
            sequence_name_max_length: 30,
            numeric_max_precision: 31,
            row_size_limit: 4005,
            index_key_limit: 1024,
            oracle_identifier_length: 30,
            oracle_varchar_length: 4000,
            sequence_step: "50".to_string(),
            file_path_suffix: None,
        }
    }
}

fn parse_limit<T: std::str::FromStr<Err = std::num::ParseIntError>>(
    key: &str,
    value: &str,
) -> Result<T, LintError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|source| LintError::InvalidLimit {
            key: key.to_string(),
            value: value.to_string(),
            source,
        })
}

impl Limits {
    /// Apply `<validatorName>.<key>` overrides
    pub fn with_parameters(mut self, parameters: &BTreeMap<String, String>) -> Result<Self, LintError> {
        for (key, value) in parameters {
            let (validator, setting) = match key.split_once('.') {
                Some((validator, setting)) if !validator.is_empty() && !setting.is_empty() => {
                    (validator, setting)
                }
                _ => return Err(LintError::MissingValidatorName { key: key.clone() }),
            };
            match (validator, setting) {
                ("columns", "minLength") => self.min_name_length = parse_limit(key, value)?,
                ("columns", "maxLength") => self.max_name_length = parse_limit(key, value)?,
                ("columns", "maxPrecision") => self.column_max_precision = parse_limit(key, value)?,
                ("range", "maxLength") => self.sequence_name_max_length = parse_limit(key, value)?,
                ("numericType", "maxPrecision") => {
                    self.numeric_max_precision = parse_limit(key, value)?
                }
                ("tableSize", "rowSizeLimit") => self.row_size_limit = parse_limit(key, value)?,
                ("createIndex", "maxKeyLength") => self.index_key_limit = parse_limit(key, value)?,
                ("oracleLength", "maxLength") => {
                    self.oracle_identifier_length = parse_limit(key, value)?
                }
                ("oracleCLOB", "maxLength") => self.oracle_varchar_length = parse_limit(key, value)?,
                ("sequence", "expected") => self.sequence_step = value.clone(),
                ("filePath", "suffix") => self.file_path_suffix = Some(value.clone()),
                _ => warn!(key = %key, "ignoring unrecognised validator parameter"),
            }
        }
        Ok(self)
    }
}
