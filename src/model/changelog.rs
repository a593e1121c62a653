//! Change sets, changelogs and borrowed cursors into them

use serde::Deserialize;

use super::Change;

/// Ordered list of change sets loaded from one changelog file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChangeLog {
    /// Logical identifier declared by the changelog author
    pub logical_file_path: Option<String>,
    /// Location the changelog was loaded from
    pub physical_file_path: String,
    pub change_sets: Vec<ChangeSet>,
}

impl ChangeLog {
    /// Logical path when declared, physical path otherwise
    pub fn file_path(&self) -> &str {
        self.logical_file_path
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or(&self.physical_file_path)
    }

    pub fn change_set_refs(&self) -> impl Iterator<Item = ChangeSetRef<'_>> {
        self.change_sets.iter().map(move |change_set| ChangeSetRef {
            change_log: self,
            change_set,
        })
    }
}

/// An ordered, named group of changes applied together
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChangeSet {
    pub id: String,
    pub author: Option<String>,
    pub valid_check_sums: Vec<String>,
    pub preconditions: Option<Preconditions>,
    pub dbms: Vec<String>,
    pub changes: Vec<Change>,
}

impl ChangeSet {
    /// Scoped to particular databases through preconditions or a dbms list
    pub fn is_db_specific(&self) -> bool {
        self.preconditions.is_some() || !self.dbms.is_empty()
    }
}

/// Preconditions guarding a change set; only their presence matters here
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preconditions {
    pub on_fail: Option<String>,
    pub on_error: Option<String>,
    pub conditions: Vec<serde_json::Value>,
}

/// A change set together with the changelog that owns it
#[derive(Debug, Clone, Copy)]
pub struct ChangeSetRef<'a> {
    pub change_log: &'a ChangeLog,
    pub change_set: &'a ChangeSet,
}

impl<'a> ChangeSetRef<'a> {
    pub fn id(&self) -> &'a str {
        &self.change_set.id
    }

    pub fn author(&self) -> Option<&'a str> {
        self.change_set.author.as_deref()
    }

    pub fn changes(&self) -> impl Iterator<Item = ChangeRef<'a>> {
        let set = *self;
        self.change_set
            .changes
            .iter()
            .enumerate()
            .map(move |(index, change)| ChangeRef { set, index, change })
    }
}

/// A change together with its position in the owning change set
#[derive(Debug, Clone, Copy)]
pub struct ChangeRef<'a> {
    pub set: ChangeSetRef<'a>,
    pub index: usize,
    pub change: &'a Change,
}

impl<'a> ChangeRef<'a> {
    /// Changes declared before this one in the same change set
    pub fn preceding(&self) -> &'a [Change] {
        &self.set.change_set.changes[..self.index]
    }

    /// Changes declared after this one in the same change set
    pub fn following(&self) -> &'a [Change] {
        &self.set.change_set.changes[self.index + 1..]
    }

    pub fn element_name(&self) -> &'static str {
        self.change.element_name()
    }
}
