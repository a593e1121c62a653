//! Rule catalog
//!
//! Rules are small predicates over one stringified attribute value. They carry
//! no state besides their construction parameters, so one instance may be
//! bound to any number of evaluation contexts.

mod engine;
mod text;
mod types;

pub use engine::RuleEngine;
pub use text::{Equals, LowerCase, MaxLength, MinLength, NotPermitted, Required};
pub use types::{DataType, LobDimension, NumericPrecision, SQL99_DATATYPES, SQL99_PARAMETRIC_DATATYPES};

use crate::error::LintError;

/// A predicate over one attribute value
pub trait Rule {
    /// Whether the value satisfies the rule; `None` means the attribute is absent.
    ///
    /// Fails only when the value is structurally malformed (e.g. a non numeric precision).
    fn is_valid(&self, value: Option<&str>) -> Result<bool, LintError>;

    /// Violation message for `field` holding `value`
    fn message(&self, field: &str, value: Option<&str>) -> String;
}

/// Render an optional value the way messages show it
pub(crate) fn shown(value: Option<&str>) -> &str {
    value.unwrap_or("null")
}
