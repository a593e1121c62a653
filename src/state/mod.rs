//! Simulated schema state
//!
//! The store is rebuilt solely from listener updates while a changelog is
//! replayed; it is never loaded from a live database.

mod key;
mod listener;
mod record;
mod store;

pub use key::{matches, SearchKey, StorageKey};
pub use listener::{default_listeners, notify, ChangeListener, ColumnListener, ConstraintListener};
pub use record::{ColumnState, ConstraintKind, ConstraintRef, Entity, Record};
pub use store::SchemaStore;
