//! Storage backend abstraction
//!
//! Every location the tool can talk about sits behind a `StorageClient`: a
//! handle bound to one URL that can stat itself, lazily enumerate children and
//! derive handles for child paths. The diff engine only ever sees this trait,
//! so remote backends plug in without touching the comparison logic.

mod fs;
mod memory;
mod url;

pub use fs::FsClient;
pub use memory::{MemoryClient, MemoryTreeBuilder};
pub use url::StorageUrl;

use crate::types::{DiffError, EntryAttributes};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;

/// One item of a lazy listing: an entry's attributes (with its path relative
/// to the listed URL) or a mid-stream failure that terminates the sequence.
pub type ListEvent = Result<EntryAttributes, DiffError>;

/// Buffer between a listing producer and its consumer.
pub(crate) const LIST_CHANNEL_CAPACITY: usize = 256;

/// Handle to a single storage location.
#[async_trait]
pub trait StorageClient: Send + Sync + std::fmt::Debug {
    /// The URL this client is bound to.
    fn url(&self) -> &StorageUrl;

    /// Stat the entry at this URL without reading content.
    async fn stat(&self) -> Result<EntryAttributes, DiffError>;

    /// Enumerate child entries, optionally to full depth.
    ///
    /// Entries arrive in backend order. Dropping the receiver stops the
    /// producer; an `Err` item is always the last one sent.
    async fn list(&self, recursive: bool) -> Result<mpsc::Receiver<ListEvent>, DiffError>;

    /// Derive a client for a child path joined onto this URL.
    fn at(&self, relative: &str) -> Result<Arc<dyn StorageClient>, DiffError>;

    /// Create the bucket or directory this URL names.
    async fn make_bucket(&self) -> Result<(), DiffError>;
}

/// Resolve a raw URL string to a backend client.
///
/// Plain paths and `file://` URLs map to the local filesystem; any other
/// scheme is rejected here and expected to come from an external adapter.
pub fn connect(raw: &str) -> Result<Arc<dyn StorageClient>, DiffError> {
    let url = StorageUrl::parse(raw)?;
    match url.scheme() {
        None | Some("file") => Ok(Arc::new(FsClient::new(url)?)),
        Some(scheme) => Err(DiffError::UnsupportedScheme {
            scheme: scheme.to_string(),
        }),
    }
}
