//! Core type definitions for stordiff

mod attrs;
mod error;
mod record;

pub use attrs::{EntryAttributes, EntryKind};
pub use error::DiffError;
pub use record::{DiffKind, DiffRecord};
