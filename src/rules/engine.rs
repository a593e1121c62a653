//! Rule engine: binds rules to evaluation contexts and runs them

use std::rc::Rc;

use super::Rule;
use crate::error::LintError;
use crate::validator::{EvaluationContext, ValidationIssue};

/// Ordered list of (rule, context) bindings
#[derive(Default)]
pub struct RuleEngine<'a> {
    bindings: Vec<(Box<dyn Rule>, Rc<EvaluationContext<'a>>)>,
}

impl<'a> RuleEngine<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a rule to each of the given contexts
    pub fn add<R, I>(&mut self, rule: &R, contexts: I)
    where
        R: Rule + Clone + 'static,
        I: IntoIterator<Item = Rc<EvaluationContext<'a>>>,
    {
        for context in contexts {
            self.bindings.push((Box::new(rule.clone()), context));
        }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Evaluate every binding, turning each failure into an issue
    pub fn execute(&self) -> Result<Vec<ValidationIssue>, LintError> {
        let mut issues = Vec::new();
        for (rule, context) in &self.bindings {
            let value = context.value()?;
            let field = context.attribute_name();
            let valid = rule
                .is_valid(value.as_deref())
                .map_err(|e| e.at_attribute(field))?;
            if !valid {
                issues.push(context.issue(rule.message(field, value.as_deref()))?);
            }
        }
        Ok(issues)
    }
}
