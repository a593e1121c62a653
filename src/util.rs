//! Shared utility helpers.

use crate::error::{parse_number, LintError};

/// Strip a parenthesized parameter from a type declaration: `VARCHAR(10)` becomes `VARCHAR`.
#[inline]
pub fn remove_param(data_type: &str) -> String {
    match (data_type.find('('), data_type.find(')')) {
        (Some(start), Some(end)) if start <= end => {
            let mut base = String::with_capacity(data_type.len());
            base.push_str(&data_type[..start]);
            base.push_str(&data_type[end + 1..]);
            base.trim().to_string()
        }
        _ => data_type.trim().to_string(),
    }
}

/// Text between the parentheses of a type declaration, or an empty string when there is none.
#[inline]
pub fn get_param(data_type: &str) -> String {
    match (data_type.find('('), data_type.find(')')) {
        (Some(start), Some(end)) if start < end => data_type[start + 1..end].trim().to_string(),
        _ => String::new(),
    }
}

/// Leading precision of a numeric parameter: `10,2` yields 10. Empty input yields 0.
pub fn get_precision(attribute: &str, param: &str) -> Result<u64, LintError> {
    if param.trim().is_empty() {
        return Ok(0);
    }
    let precision = param.split(',').next().unwrap_or(param);
    parse_number(attribute, precision)
}

/// Split a comma separated identifier list (`a, b,c`) into trimmed, non-empty names.
#[inline]
pub fn split_names(names: &str) -> impl Iterator<Item = &str> {
    names.split(',').map(str::trim).filter(|n| !n.is_empty())
}

/// True when the value is absent or contains only whitespace.
#[inline]
pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}
