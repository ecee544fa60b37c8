//! EntryAttributes - Minimal stat snapshot used for comparison

use serde::{Deserialize, Serialize};

/// Kind of a storage entry.
///
/// `Other` covers symlinks, devices, sockets and anything else a backend may
/// surface. An `Other` entry is never considered equal to anything, not even
/// another `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryKind {
    Regular,
    Directory,
    Other,
}

impl EntryKind {
    pub fn is_regular(&self) -> bool {
        matches!(self, EntryKind::Regular)
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, EntryKind::Directory)
    }
}

/// The stat snapshot a comparison works with: relative name, size and kind.
///
/// `size` is meaningful only when `kind == EntryKind::Regular`; directory and
/// special-entry sizes are backend noise and never compared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryAttributes {
    /// Path relative to the listing root, `/`-separated.
    pub name: String,

    /// Size in bytes.
    pub size: u64,

    /// Entry kind.
    pub kind: EntryKind,
}

impl EntryAttributes {
    /// Attributes for a regular object.
    pub fn regular(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
            kind: EntryKind::Regular,
        }
    }

    /// Attributes for a directory / prefix.
    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: 0,
            kind: EntryKind::Directory,
        }
    }

    /// Attributes for a special entry (symlink, device, ...).
    pub fn other(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: 0,
            kind: EntryKind::Other,
        }
    }
}
