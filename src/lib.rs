//! # stordiff - Storage Tree Diff Tool
//!
//! Compares two storage locations - single objects, local directories or
//! bucket prefixes behind a pluggable backend - and streams a structured
//! report of their differences (missing entries, type mismatches, size
//! mismatches) without transferring any data.

// Module declarations
pub mod client;
pub mod commands;
pub mod config;
pub mod diff;
pub mod types;
pub mod ui;

// Re-export commonly used types
pub use client::{connect, FsClient, MemoryClient, MemoryTreeBuilder, StorageClient, StorageUrl};
pub use diff::{diff, DiffOptions, PathIndex};
pub use types::{DiffError, DiffKind, DiffRecord, EntryAttributes, EntryKind};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
