//! Changelog record model

mod attributes;
mod change;
mod changelog;
mod lenient;

pub use attributes::{is_known_attribute, Getter};
pub use change::*;
pub use changelog::*;
