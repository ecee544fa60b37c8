//! Comparison classifier - stats both sides and dispatches to a differ

use super::flat::diff_single_level;
use super::object::diff_objects;
use super::recursive::diff_trees;
use super::DiffOptions;
use crate::client::StorageClient;
use crate::types::{DiffError, DiffKind, DiffRecord, EntryKind};
use std::sync::Arc;
use tokio::sync::mpsc::Sender;

/// Run one comparison session.
///
/// Owns the only sender for the result stream; every exit path falls through
/// to the end of this function, so dropping `tx` closes the stream exactly
/// once no matter how the comparison went.
pub(crate) async fn classify(
    first: Arc<dyn StorageClient>,
    second: Arc<dyn StorageClient>,
    options: DiffOptions,
    tx: Sender<DiffRecord>,
) {
    let first_attrs = match first.stat().await {
        Ok(attrs) => attrs,
        Err(e) => {
            let _ = tx
                .send(DiffRecord::failure(vec![first.url().to_string()], e))
                .await;
            return;
        }
    };
    let second_attrs = match second.stat().await {
        Ok(attrs) => attrs,
        Err(e) => {
            let _ = tx
                .send(DiffRecord::failure(vec![second.url().to_string()], e))
                .await;
            return;
        }
    };

    match first_attrs.kind {
        EntryKind::Regular => match second_attrs.kind {
            // Comparing a file against a directory means comparing against
            // the equally named file inside it.
            EntryKind::Directory => {
                let target = match second.at(first.url().file_name()) {
                    Ok(target) => target,
                    Err(e) => {
                        let _ = tx
                            .send(DiffRecord::failure(
                                vec![second.url().to_string(), first.url().to_string()],
                                e,
                            ))
                            .await;
                        return;
                    }
                };
                diff_objects(&*first, &*target, &tx).await;
            }
            EntryKind::Regular => diff_objects(&*first, &*second, &tx).await,
            EntryKind::Other => {
                let _ = tx
                    .send(DiffRecord::difference(
                        first.url().to_string(),
                        second.url().to_string(),
                        DiffKind::TypeMismatch,
                    ))
                    .await;
            }
        },
        EntryKind::Directory => {
            if second_attrs.kind != EntryKind::Directory {
                let _ = tx
                    .send(DiffRecord::difference(
                        first.url().to_string(),
                        second.url().to_string(),
                        DiffKind::TypeMismatch,
                    ))
                    .await;
            } else if options.recursive {
                diff_trees(&first, &second, options.progress, &tx).await;
            } else {
                diff_single_level(&first, &second, &tx).await;
            }
        }
        EntryKind::Other => {
            let url = first.url().to_string();
            let _ = tx
                .send(DiffRecord::failure(
                    vec![url.clone()],
                    DiffError::UnsupportedEntryType { url },
                ))
                .await;
        }
    }
}
