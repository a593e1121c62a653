//! Evaluation contexts
//!
//! A context names the attribute a rule evaluates and where its value comes
//! from. Contexts for nested column or constraint declarations chain to the
//! context of their change, which is where issues get their element name,
//! change set id and author.

use std::rc::Rc;

use crate::error::LintError;
use crate::model::{ChangeRef, ColumnConfig, ConstraintsConfig};

use super::ValidationIssue;

/// What a context evaluates
#[derive(Debug, Clone, Copy)]
pub enum Subject<'a> {
    Change(ChangeRef<'a>),
    Column(&'a ColumnConfig),
    Constraints(&'a ConstraintsConfig),
}

impl<'a> Subject<'a> {
    fn attribute(&self, name: &str) -> Result<Option<String>, LintError> {
        match self {
            Subject::Change(change) => change.change.attribute(name),
            Subject::Column(column) => column.attribute(name),
            Subject::Constraints(constraints) => constraints.attribute(name),
        }
    }
}

#[derive(Debug, Clone)]
enum ValueSource {
    FromSubject,
    Explicit(Option<String>),
}

#[derive(Debug, Clone)]
pub struct EvaluationContext<'a> {
    subject: Subject<'a>,
    attribute: String,
    source: ValueSource,
    parent: Option<Rc<EvaluationContext<'a>>>,
}

impl<'a> EvaluationContext<'a> {
    /// Context whose value is read off the subject by attribute name
    pub fn from_subject(subject: Subject<'a>, attribute: &str) -> Rc<Self> {
        Rc::new(Self {
            subject,
            attribute: attribute.to_string(),
            source: ValueSource::FromSubject,
            parent: None,
        })
    }

    /// Context with an explicitly supplied value
    pub fn with_value(subject: Subject<'a>, attribute: &str, value: Option<String>) -> Rc<Self> {
        Rc::new(Self {
            subject,
            attribute: attribute.to_string(),
            source: ValueSource::Explicit(value),
            parent: None,
        })
    }

    /// Explicit-valued context chained to this one
    pub fn child(
        self: &Rc<Self>,
        subject: Subject<'a>,
        attribute: &str,
        value: Option<String>,
    ) -> Rc<Self> {
        Rc::new(Self {
            subject,
            attribute: attribute.to_string(),
            source: ValueSource::Explicit(value),
            parent: Some(Rc::clone(self)),
        })
    }

    pub fn attribute_name(&self) -> &str {
        &self.attribute
    }

    pub fn subject(&self) -> Subject<'a> {
        self.subject
    }

    pub fn parent(&self) -> Option<&Rc<EvaluationContext<'a>>> {
        self.parent.as_ref()
    }

    /// Stringified value, `None` when the attribute is absent
    pub fn value(&self) -> Result<Option<String>, LintError> {
        match &self.source {
            ValueSource::FromSubject => self.subject.attribute(&self.attribute),
            ValueSource::Explicit(value) => Ok(value.clone()),
        }
    }

    /// Nearest change in this context's ancestry, itself included
    pub fn change(&self) -> Option<ChangeRef<'a>> {
        let mut current = Some(self);
        while let Some(context) = current {
            if let Subject::Change(change) = context.subject {
                return Some(change);
            }
            current = context.parent.as_deref();
        }
        None
    }

    /// Issue for this context's attribute, attributed to the nearest change
    pub fn issue(&self, message: String) -> Result<ValidationIssue, LintError> {
        let change = self.change().ok_or_else(|| LintError::InvalidContext {
            attribute: self.attribute.clone(),
        })?;
        Ok(ValidationIssue::for_change(
            change,
            Some(&self.attribute),
            message,
        ))
    }
}
