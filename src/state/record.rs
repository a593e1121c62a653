//! Simulated schema entities kept in the store

use std::fmt;

use uuid::Uuid;

use super::StorageKey;

/// Kind of a constraint protecting a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    PrimaryKey,
    ForeignKey,
    /// Unique constraints and indexes
    Index,
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConstraintKind::PrimaryKey => "primary_key",
            ConstraintKind::ForeignKey => "foreign_key",
            ConstraintKind::Index => "index",
        };
        f.write_str(name)
    }
}

/// A constraint attached to a column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintRef {
    pub name: String,
    pub kind: ConstraintKind,
}

impl ConstraintRef {
    /// Constraint with the declared name, or a random 8 character one
    pub fn new(name: Option<&str>, kind: ConstraintKind) -> Self {
        let name = match name {
            Some(name) => name.to_string(),
            None => random_name(),
        };
        Self { name, kind }
    }
}

impl fmt::Display for ConstraintRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.name)
    }
}

fn random_name() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// Best-effort knowledge about one column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnState {
    pub table: String,
    pub name: String,
    pub nullable: bool,
    /// Base type with any length/precision stripped
    pub data_type: Option<String>,
    /// Base type before the last type change
    pub old_type: Option<String>,
    /// Parenthesized length/precision, empty when undeclared
    pub length: Option<String>,
    pub constraints: Vec<ConstraintRef>,
}

impl ColumnState {
    pub fn new(table: &str, name: &str) -> Self {
        Self {
            table: table.to_string(),
            name: name.to_string(),
            nullable: true,
            data_type: None,
            old_type: None,
            length: None,
            constraints: Vec::new(),
        }
    }

    /// Replace the base type, remembering the previous one
    pub fn set_type(&mut self, data_type: Option<String>) {
        self.old_type = std::mem::replace(&mut self.data_type, data_type);
    }

    pub fn key(&self) -> StorageKey {
        StorageKey::column(&self.table, &self.name)
    }
}

impl fmt::Display for ColumnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.name)
    }
}

/// Any record the store can hold
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    Column(ColumnState),
    Constraint(ConstraintRef),
}

/// Typed view of an [`Entity`] variant, used by `SchemaStore::filter_by`
pub trait Record: Sized {
    fn from_entity(entity: &Entity) -> Option<&Self>;
    fn from_entity_mut(entity: &mut Entity) -> Option<&mut Self>;
}

impl Record for ColumnState {
    fn from_entity(entity: &Entity) -> Option<&Self> {
        match entity {
            Entity::Column(column) => Some(column),
            Entity::Constraint(_) => None,
        }
    }

    fn from_entity_mut(entity: &mut Entity) -> Option<&mut Self> {
        match entity {
            Entity::Column(column) => Some(column),
            Entity::Constraint(_) => None,
        }
    }
}

impl Record for ConstraintRef {
    fn from_entity(entity: &Entity) -> Option<&Self> {
        match entity {
            Entity::Constraint(constraint) => Some(constraint),
            Entity::Column(_) => None,
        }
    }

    fn from_entity_mut(entity: &mut Entity) -> Option<&mut Self> {
        match entity {
            Entity::Constraint(constraint) => Some(constraint),
            Entity::Column(_) => None,
        }
    }
}
