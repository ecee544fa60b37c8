//! DiffRecord - One emitted unit of diff output

use super::DiffError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a detected difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiffKind {
    /// Entry exists on the first side but not the second.
    OnlyInFirst,

    /// Entry exists on both sides with different kinds.
    TypeMismatch,

    /// Both entries are regular objects with different sizes.
    SizeMismatch,
}

impl fmt::Display for DiffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DiffKind::OnlyInFirst => "only-in-first",
            DiffKind::TypeMismatch => "type-mismatch",
            DiffKind::SizeMismatch => "size-mismatch",
        };
        f.write_str(s)
    }
}

/// One unit of output on the diff result stream.
///
/// A record is either a classified difference or a failure, never both; the
/// enum enforces that. Records are created once, sent once, and owned by the
/// consumer afterwards.
#[derive(Debug)]
pub enum DiffRecord {
    /// A detected difference between a pair of URLs.
    Difference {
        first_url: String,
        second_url: String,
        kind: DiffKind,
    },

    /// A terminal error for one unit of comparison, tagged with the URL(s)
    /// that produced it.
    Failure { urls: Vec<String>, error: DiffError },
}

impl DiffRecord {
    pub fn difference(
        first_url: impl Into<String>,
        second_url: impl Into<String>,
        kind: DiffKind,
    ) -> Self {
        DiffRecord::Difference {
            first_url: first_url.into(),
            second_url: second_url.into(),
            kind,
        }
    }

    pub fn failure(urls: Vec<String>, error: DiffError) -> Self {
        DiffRecord::Failure { urls, error }
    }

    /// The difference classification, if this is not a failure record.
    pub fn kind(&self) -> Option<DiffKind> {
        match self {
            DiffRecord::Difference { kind, .. } => Some(*kind),
            DiffRecord::Failure { .. } => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, DiffRecord::Failure { .. })
    }
}
