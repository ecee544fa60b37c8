//! Diff engine - classification, comparison strategies and the result stream

mod classify;
mod flat;
mod index;
mod object;
mod recursive;

pub use index::PathIndex;

use crate::client::StorageClient;
use crate::types::DiffRecord;
use crate::ui::ScanSpinner;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Sized buffer on the result stream so the recursive enumeration pass keeps
/// moving while the consumer renders.
const RESULT_CHANNEL_CAPACITY: usize = 1024;

/// Options for one comparison session.
#[derive(Default)]
pub struct DiffOptions {
    /// Full-depth tree comparison instead of a single level.
    pub recursive: bool,

    /// Spinner to bump while recursive listings are in flight. Constructed by
    /// the caller; the engine never decides whether to show progress.
    pub progress: Option<ScanSpinner>,
}

/// Compare two storage locations and stream the differences.
///
/// Returns immediately with the receiving end of the result stream; records
/// arrive as they are found and the channel closes when the comparison is
/// done, on success and on failure alike. Must be called from within a tokio
/// runtime.
pub fn diff(
    first: Arc<dyn StorageClient>,
    second: Arc<dyn StorageClient>,
    options: DiffOptions,
) -> mpsc::Receiver<DiffRecord> {
    let (tx, rx) = mpsc::channel(RESULT_CHANNEL_CAPACITY);
    tokio::spawn(classify::classify(first, second, options, tx));
    rx
}
