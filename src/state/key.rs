//! Storage identities and search keys

use std::fmt;

/// Identity under which a record is stored
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Column { table: String, column: String },
    Constraint { name: String },
}

impl StorageKey {
    pub fn column(table: &str, column: &str) -> Self {
        StorageKey::Column {
            table: table.to_string(),
            column: column.to_string(),
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageKey::Column { table, column } => write!(f, "{}.{}", table, column),
            StorageKey::Constraint { name } => write!(f, "{}", name),
        }
    }
}

/// Lookup key; never stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchKey {
    /// One column of one table
    ExactColumn { table: String, column: String },
    /// Every column of a table
    WholeTable { table: String },
}

impl SearchKey {
    pub fn column(table: &str, column: &str) -> Self {
        SearchKey::ExactColumn {
            table: table.to_string(),
            column: column.to_string(),
        }
    }

    pub fn table(table: &str) -> Self {
        SearchKey::WholeTable {
            table: table.to_string(),
        }
    }
}

impl fmt::Display for SearchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchKey::ExactColumn { table, column } => write!(f, "{}.{}", table, column),
            SearchKey::WholeTable { table } => write!(f, "{}", table),
        }
    }
}

/// Whether a stored identity is selected by a search key.
///
/// A whole-table key selects every column identity of that table, an exact
/// column key selects only the identical pair. Constraint identities are only
/// reachable by exact identity, never by a search key.
pub fn matches(stored: &StorageKey, query: &SearchKey) -> bool {
    match (stored, query) {
        (
            StorageKey::Column { table, column },
            SearchKey::ExactColumn {
                table: query_table,
                column: query_column,
            },
        ) => table == query_table && column == query_column,
        (StorageKey::Column { table, .. }, SearchKey::WholeTable { table: query_table }) => {
            table == query_table
        }
        (StorageKey::Constraint { .. }, _) => false,
    }
}
