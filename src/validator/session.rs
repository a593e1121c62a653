//! Memory that outlives a single change
//!
//! One [`SessionState`] exists per [`ValidatorFactory`](super::ValidatorFactory).
//! Session scoped validators borrow the part they need while they run, so two
//! factories never observe each other's findings.

use std::collections::{HashMap, HashSet};

/// Bidirectional map between index names and their canonical column keys
#[derive(Debug, Clone, Default)]
pub struct IndexRegistry {
    by_name: HashMap<String, String>,
    by_key: HashMap<String, String>,
}

impl IndexRegistry {
    /// Key for a table and a set of columns; column order and repeats are irrelevant
    pub fn canonical_key<'a, I>(table: &str, columns: I) -> String
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut columns: Vec<&str> = columns.into_iter().collect();
        columns.sort_unstable();
        columns.dedup();
        let mut key = table.to_string();
        for column in columns {
            key.push('-');
            key.push_str(column);
        }
        key
    }

    /// Name of the index holding a canonical key
    pub fn owner(&self, key: &str) -> Option<&str> {
        self.by_key.get(key).map(String::as_str)
    }

    /// Reserve a key for an index, replacing any key the name held before
    pub fn reserve(&mut self, name: &str, key: String) {
        if let Some(previous) = self.by_name.insert(name.to_string(), key.clone()) {
            self.by_key.remove(&previous);
        }
        self.by_key.insert(key, name.to_string());
    }

    /// Release the key held by an index, returning it
    pub fn release(&mut self, name: &str) -> Option<String> {
        let key = self.by_name.remove(name)?;
        self.by_key.remove(&key);
        Some(key)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Cross-change memory of one validation session
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub indexes: IndexRegistry,
    /// Table name to the changelog that first inserted rows into it
    pub insert_owners: HashMap<String, String>,
    /// (logical changelog path, change set id) to the physical path declaring it first
    pub change_set_ids: HashMap<(Option<String>, String), String>,
    /// Physical changelog paths whose logical path was already checked
    pub checked_files: HashSet<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }
}
