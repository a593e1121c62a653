//! Data type rules

use super::{shown, Rule};
use crate::error::LintError;
use crate::util::{get_param, get_precision, remove_param};

/// SQL-99 types that take no parameter
pub const SQL99_DATATYPES: &[&str] = &[
    "BOOLEAN",
    "INTEGER",
    "SMALLINT",
    "BIGINT",
    "REAL",
    "DOUBLE PRECISION",
    "DATE",
];

/// SQL-99 types that accept a length or precision; the parameter is not checked
pub const SQL99_PARAMETRIC_DATATYPES: &[&str] = &[
    "CHARACTER",
    "VARCHAR",
    "CLOB",
    "NCHAR",
    "NVARCHAR",
    "NCLOB",
    "BLOB",
    "DECIMAL",
    "NUMERIC",
    "FLOAT",
    "TIMESTAMP",
];

/// Valid when absent or one of the SQL-99 standard types
#[derive(Debug, Clone, Copy, Default)]
pub struct DataType;

impl Rule for DataType {
    fn is_valid(&self, value: Option<&str>) -> Result<bool, LintError> {
        let Some(value) = value else {
            return Ok(true);
        };
        let data_type = value.trim().to_uppercase();
        if SQL99_DATATYPES.contains(&data_type.as_str()) {
            return Ok(true);
        }
        let base = remove_param(&data_type);
        Ok(SQL99_PARAMETRIC_DATATYPES.contains(&base.as_str()))
    }

    fn message(&self, _field: &str, value: Option<&str>) -> String {
        format!("{} isn't one of SQL-99 standard types", shown(value))
    }
}

/// NUMERIC types must declare a precision no greater than the maximum
#[derive(Debug, Clone, Copy)]
pub struct NumericPrecision(pub u64);

impl Rule for NumericPrecision {
    fn is_valid(&self, value: Option<&str>) -> Result<bool, LintError> {
        let Some(value) = value else {
            return Ok(true);
        };
        if !remove_param(value).eq_ignore_ascii_case("numeric") {
            return Ok(true);
        }
        let param = get_param(value);
        if param.is_empty() {
            return Ok(false);
        }
        Ok(get_precision("type", &param)? <= self.0)
    }

    fn message(&self, field: &str, value: Option<&str>) -> String {
        if value.map(get_param).unwrap_or_default().is_empty() {
            format!("Column {} NUMERIC has no defined precision", field)
        } else {
            format!(
                "{} has greater precision than {} allowed",
                shown(value),
                self.0
            )
        }
    }
}

/// LOB types must declare a dimension
#[derive(Debug, Clone, Copy, Default)]
pub struct LobDimension;

impl Rule for LobDimension {
    fn is_valid(&self, value: Option<&str>) -> Result<bool, LintError> {
        let Some(value) = value else {
            return Ok(true);
        };
        let is_lob = remove_param(value).to_uppercase().ends_with("LOB");
        Ok(!is_lob || !get_param(value).is_empty())
    }

    fn message(&self, field: &str, value: Option<&str>) -> String {
        format!(
            "Column with {} {} has no defined dimension",
            field,
            shown(value)
        )
    }
}
