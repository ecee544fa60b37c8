//! Flat differ - single-level comparison without building an index
//!
//! Lists only the immediate children of the first side and stats the matching
//! path on the second side one entry at a time. Two stat round-trips per entry
//! buy simplicity and near-zero memory; deep trees belong to the recursive
//! differ.

use super::object::compare_attrs;
use crate::client::StorageClient;
use crate::types::{DiffKind, DiffRecord};
use std::sync::Arc;
use tokio::sync::mpsc::Sender;

pub(crate) async fn diff_single_level(
    first: &Arc<dyn StorageClient>,
    second: &Arc<dyn StorageClient>,
    tx: &Sender<DiffRecord>,
) {
    let mut listing = match first.list(false).await {
        Ok(listing) => listing,
        Err(e) => {
            let _ = tx
                .send(DiffRecord::failure(vec![first.url().to_string()], e))
                .await;
            return;
        }
    };

    while let Some(event) = listing.recv().await {
        let attrs = match event {
            Ok(attrs) => attrs,
            Err(e) => {
                let _ = tx
                    .send(DiffRecord::failure(vec![first.url().to_string()], e))
                    .await;
                return;
            }
        };

        let new_first = match first.at(&attrs.name) {
            Ok(client) => client,
            Err(e) => {
                let _ = tx
                    .send(DiffRecord::failure(vec![first.url().to_string()], e))
                    .await;
                return;
            }
        };
        let new_second = match second.at(&attrs.name) {
            Ok(client) => client,
            Err(e) => {
                let _ = tx
                    .send(DiffRecord::failure(vec![second.url().to_string()], e))
                    .await;
                return;
            }
        };

        let first_stat = new_first.stat().await;
        let second_stat = new_second.stat().await;

        let record = match (first_stat, second_stat) {
            // Listed a moment ago, gone now. Report it rather than guessing.
            (Err(e), _) => Some(DiffRecord::failure(
                vec![new_first.url().to_string()],
                e,
            )),
            // Absence on the second side is defined by the failed stat.
            (Ok(_), Err(_)) => Some(DiffRecord::difference(
                new_first.url().to_string(),
                new_second.url().to_string(),
                DiffKind::OnlyInFirst,
            )),
            (Ok(first_attrs), Ok(second_attrs)) => compare_attrs(&first_attrs, &second_attrs)
                .map(|kind| {
                    DiffRecord::difference(
                        new_first.url().to_string(),
                        new_second.url().to_string(),
                        kind,
                    )
                }),
        };

        if let Some(record) = record {
            if tx.send(record).await.is_err() {
                return;
            }
        }
    }
}
