//! Object comparator - unit comparison of two single entries

use crate::client::StorageClient;
use crate::types::{DiffError, DiffKind, DiffRecord, EntryAttributes, EntryKind};
use tokio::sync::mpsc::Sender;

/// Compare the attributes of two entries that exist on both sides.
///
/// This is the one rule every differ shares: kinds must match (and `Other`
/// never matches, not even itself), then regular objects must agree on size.
/// Equal entries produce no record; content is never read.
pub(crate) fn compare_attrs(
    first: &EntryAttributes,
    second: &EntryAttributes,
) -> Option<DiffKind> {
    if first.kind != second.kind || first.kind == EntryKind::Other {
        return Some(DiffKind::TypeMismatch);
    }
    if first.kind == EntryKind::Regular && first.size != second.size {
        return Some(DiffKind::SizeMismatch);
    }
    None
}

/// Compare two URLs believed to reference single objects.
///
/// Both sides are re-stat'd independently so this works standalone and as the
/// per-entry check inside directory diffing; one side's failure never
/// suppresses what can be said about the other.
pub(crate) async fn diff_objects(
    first: &dyn StorageClient,
    second: &dyn StorageClient,
    tx: &Sender<DiffRecord>,
) {
    let first_url = first.url().to_string();
    let second_url = second.url().to_string();

    // A path-join can resolve both sides to the same target; comparing an
    // entry to itself is a no-op, not a difference.
    if first.url() == second.url() {
        return;
    }

    let first_stat = first.stat().await;
    let second_stat = second.stat().await;

    let (first_attrs, second_attrs) = match (first_stat, second_stat) {
        (Err(e), Ok(_)) => {
            let _ = tx.send(DiffRecord::failure(vec![first_url], e)).await;
            return;
        }
        (Ok(_), Err(e)) => {
            let _ = tx.send(DiffRecord::failure(vec![second_url], e)).await;
            return;
        }
        (Err(first_err), Err(second_err)) => {
            let _ = tx
                .send(DiffRecord::failure(vec![first_url], first_err))
                .await;
            let _ = tx
                .send(DiffRecord::failure(vec![second_url], second_err))
                .await;
            return;
        }
        (Ok(f), Ok(s)) => (f, s),
    };

    if !first_attrs.kind.is_regular() {
        // The caller believed this was an object; finding anything else here
        // is an unexpected state, not a difference.
        let _ = tx
            .send(DiffRecord::failure(
                vec![first_url.clone()],
                DiffError::NotAnObject { url: first_url },
            ))
            .await;
        return;
    }

    if !second_attrs.kind.is_regular() {
        let _ = tx
            .send(DiffRecord::difference(
                first_url,
                second_url,
                DiffKind::TypeMismatch,
            ))
            .await;
        return;
    }

    if first_attrs.size != second_attrs.size {
        let _ = tx
            .send(DiffRecord::difference(
                first_url,
                second_url,
                DiffKind::SizeMismatch,
            ))
            .await;
    }
}
