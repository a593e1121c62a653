//! Schema state store

use super::{matches, ColumnState, Entity, Record, SearchKey, StorageKey};

/// Simulated schema: records keyed by identity, in insertion order.
///
/// Lookups by [`SearchKey`] are linear scans through [`matches`], so a
/// whole-table key selects every column of that table.
#[derive(Debug, Default, Clone)]
pub struct SchemaStore {
    entries: Vec<(StorageKey, Entity)>,
}

impl SchemaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, replacing any record stored under the same identity
    pub fn put(&mut self, key: StorageKey, record: Entity) -> Option<Entity> {
        match self.entries.iter_mut().find(|(stored, _)| *stored == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, record)),
            None => {
                self.entries.push((key, record));
                None
            }
        }
    }

    pub fn get(&self, key: &StorageKey) -> Option<&Entity> {
        self.entries
            .iter()
            .find(|(stored, _)| stored == key)
            .map(|(_, record)| record)
    }

    pub fn remove(&mut self, key: &StorageKey) -> Option<Entity> {
        let position = self.entries.iter().position(|(stored, _)| stored == key)?;
        Some(self.entries.remove(position).1)
    }

    /// Remove every record selected by the search key, returning how many were dropped
    pub fn remove_matching(&mut self, query: &SearchKey) -> usize {
        self.remove_where(|key, _| matches(key, query))
    }

    /// Remove every record for which the predicate holds
    pub fn remove_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&StorageKey, &Entity) -> bool,
    {
        let before = self.entries.len();
        self.entries.retain(|(key, record)| !predicate(key, record));
        before - self.entries.len()
    }

    /// Records of type `T` selected by the search key, in insertion order
    pub fn filter_by<T: Record + 'static>(&self, query: SearchKey) -> impl Iterator<Item = &T> + '_ {
        self.entries
            .iter()
            .filter(move |(key, _)| matches(key, &query))
            .filter_map(|(_, record)| T::from_entity(record))
    }

    /// First known column with this table and name
    pub fn column(&self, table: &str, column: &str) -> Option<&ColumnState> {
        self.filter_by::<ColumnState>(SearchKey::column(table, column))
            .next()
    }

    /// Apply `update` to every column selected by the search key.
    ///
    /// Stored identities follow renames done by `update`.
    pub fn update_columns<F>(&mut self, query: &SearchKey, mut update: F) -> usize
    where
        F: FnMut(&mut ColumnState),
    {
        let mut updated = 0;
        for (key, record) in self.entries.iter_mut() {
            if !matches(key, query) {
                continue;
            }
            if let Some(column) = ColumnState::from_entity_mut(record) {
                update(column);
                *key = column.key();
                updated += 1;
            }
        }
        updated
    }

    /// Semantic key lookup: true when any stored identity is selected by the search key
    pub fn contains_key(&self, query: &SearchKey) -> bool {
        self.entries.iter().any(|(key, _)| matches(key, query))
    }

    pub fn contains_value(&self, record: &Entity) -> bool {
        self.entries.iter().any(|(_, stored)| stored == record)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
