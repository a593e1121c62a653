//! Validation findings

use std::fmt;

use serde::Serialize;

use crate::model::{ChangeLog, ChangeRef, ChangeSetRef};

/// One violation found in a changelog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    /// Physical path of the offending changelog
    pub file: String,
    pub element: Option<String>,
    pub attribute: Option<String>,
    pub message: String,
    pub change_set_id: Option<String>,
    pub change_set_author: Option<String>,
}

impl ValidationIssue {
    /// Issue on a changelog as a whole
    pub fn for_change_log(
        change_log: &ChangeLog,
        attribute: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            file: change_log.physical_file_path.clone(),
            element: None,
            attribute: attribute.map(str::to_string),
            message: message.into(),
            change_set_id: None,
            change_set_author: None,
        }
    }

    /// Issue on a change set attribute
    pub fn for_change_set(
        change_set: ChangeSetRef<'_>,
        attribute: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            change_set_id: Some(change_set.id().to_string()),
            change_set_author: change_set.author().map(str::to_string),
            ..Self::for_change_log(change_set.change_log, attribute, message)
        }
    }

    /// Issue on a nested element of a change set (e.g. `validCheckSum`)
    pub fn for_change_set_element(
        change_set: ChangeSetRef<'_>,
        element: &str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            element: Some(element.to_string()),
            ..Self::for_change_set(change_set, None, message)
        }
    }

    /// Issue on a change, attributed to the change element
    pub fn for_change(change: ChangeRef<'_>, attribute: Option<&str>, message: impl Into<String>) -> Self {
        Self::for_change_element(change, change.element_name(), attribute, message)
    }

    /// Issue on a change, attributed to a nested element such as `column`
    pub fn for_change_element(
        change: ChangeRef<'_>,
        element: &str,
        attribute: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            element: Some(element.to_string()),
            ..Self::for_change_set(change.set, attribute, message)
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} changeSet {} ({}) has a violation on ",
            self.file,
            self.change_set_id.as_deref().unwrap_or("-"),
            self.change_set_author.as_deref().unwrap_or("-"),
        )?;
        if let Some(attribute) = &self.attribute {
            write!(f, "attribute {} of ", attribute)?;
        }
        write!(
            f,
            "element {}, {}",
            self.element.as_deref().unwrap_or("changeSet"),
            self.message
        )
    }
}
