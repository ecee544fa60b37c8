//! Recursive differ - full-depth comparison via two concurrently built indices
//!
//! Each side is listed to full depth on its own task into a private
//! `PathIndex`. The only synchronization point is the join after both
//! listings; from there the indices are read-only and a single pass over the
//! first index computes the one-directional difference.

use super::index::PathIndex;
use super::object::compare_attrs;
use crate::client::StorageClient;
use crate::types::{DiffError, DiffKind, DiffRecord};
use crate::ui::ScanSpinner;
use std::sync::Arc;
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;

pub(crate) async fn diff_trees(
    first: &Arc<dyn StorageClient>,
    second: &Arc<dyn StorageClient>,
    progress: Option<ScanSpinner>,
    tx: &Sender<DiffRecord>,
) {
    let first_task = index_side(Arc::clone(first), tx.clone(), progress.clone());
    let second_task = index_side(Arc::clone(second), tx.clone(), progress.clone());

    // Join barrier: after this point both indices are complete (or as complete
    // as a failed listing left them) and nothing writes to them anymore.
    let first_index = join_index(first_task, first, tx).await;
    let second_index = join_index(second_task, second, tx).await;

    if let Some(spinner) = progress {
        spinner.finish_and_clear();
    }

    // A crashed indexing task is not a partial listing: its index cannot be
    // trusted, so no comparison happens at all.
    let (Some(first_index), Some(second_index)) = (first_index, second_index) else {
        return;
    };

    let first_base = first.url().delimited();
    let second_base = second.url().delimited();

    for (name, first_attrs) in first_index.iter() {
        let record = match second_index.get(name) {
            None => Some(DiffKind::OnlyInFirst),
            Some(second_attrs) => compare_attrs(first_attrs, second_attrs),
        }
        .map(|kind| {
            DiffRecord::difference(
                format!("{}{}", first_base, name),
                format!("{}{}", second_base, name),
                kind,
            )
        });

        if let Some(record) = record {
            if tx.send(record).await.is_err() {
                // Consumer abandoned the stream; stop producing.
                return;
            }
        }
    }
}

/// Join one indexing task, converting a crashed task into a failure record
/// for its side.
async fn join_index(
    task: JoinHandle<PathIndex>,
    client: &Arc<dyn StorageClient>,
    tx: &Sender<DiffRecord>,
) -> Option<PathIndex> {
    match task.await {
        Ok(index) => Some(index),
        Err(e) => {
            let url = client.url().to_string();
            let record = DiffRecord::failure(
                vec![url.clone()],
                DiffError::Listing {
                    url,
                    message: format!("listing task failed: {}", e),
                },
            );
            let _ = tx.send(record).await;
            None
        }
    }
}

/// List one side to full depth into its own index.
///
/// A mid-stream listing error is reported once and stops this side early;
/// whatever was indexed before the failure is still compared.
fn index_side(
    client: Arc<dyn StorageClient>,
    tx: Sender<DiffRecord>,
    progress: Option<ScanSpinner>,
) -> JoinHandle<PathIndex> {
    tokio::spawn(async move {
        let mut index = PathIndex::new();
        let mut listing = match client.list(true).await {
            Ok(listing) => listing,
            Err(e) => {
                let _ = tx
                    .send(DiffRecord::failure(vec![client.url().to_string()], e))
                    .await;
                return index;
            }
        };
        while let Some(event) = listing.recv().await {
            match event {
                Ok(attrs) => {
                    index.insert(attrs);
                    if let Some(spinner) = &progress {
                        spinner.entry_indexed();
                    }
                }
                Err(e) => {
                    let _ = tx
                        .send(DiffRecord::failure(vec![client.url().to_string()], e))
                        .await;
                    break;
                }
            }
        }
        index
    })
}
