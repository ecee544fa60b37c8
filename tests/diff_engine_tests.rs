//! Diff engine integration tests
//!
//! Exercises classification, the flat and recursive differs and the result
//! stream contract over the in-memory backend.

use std::sync::Arc;
use stordiff::client::ListEvent;
use stordiff::{
    diff, DiffError, DiffKind, DiffOptions, DiffRecord, EntryAttributes, MemoryClient,
    MemoryTreeBuilder, StorageClient, StorageUrl,
};
use tokio::sync::mpsc;

// ═══════════════════════════════════════════════════════════
// Test Helpers
// ═══════════════════════════════════════════════════════════

async fn collect(
    first: Arc<dyn StorageClient>,
    second: Arc<dyn StorageClient>,
    recursive: bool,
) -> Vec<DiffRecord> {
    let mut stream = diff(
        first,
        second,
        DiffOptions {
            recursive,
            progress: None,
        },
    );
    let mut records = Vec::new();
    while let Some(record) = stream.recv().await {
        records.push(record);
    }
    records
}

fn differences(records: &[DiffRecord]) -> Vec<(String, String, DiffKind)> {
    let mut pairs: Vec<_> = records
        .iter()
        .filter_map(|record| match record {
            DiffRecord::Difference {
                first_url,
                second_url,
                kind,
            } => Some((first_url.clone(), second_url.clone(), *kind)),
            DiffRecord::Failure { .. } => None,
        })
        .collect();
    pairs.sort();
    pairs
}

fn failure_count(records: &[DiffRecord]) -> usize {
    records.iter().filter(|r| r.is_failure()).count()
}

// ═══════════════════════════════════════════════════════════
// Object comparison via the classifier
// ═══════════════════════════════════════════════════════════

#[tokio::test]
async fn test_equal_regular_files_emit_nothing() {
    let first = MemoryTreeBuilder::new().file("f.txt", 3).build("mem://first");
    let second = MemoryTreeBuilder::new().file("f.txt", 3).build("mem://second");

    let records = collect(
        first.at("f.txt").unwrap(),
        second.at("f.txt").unwrap(),
        false,
    )
    .await;
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_unequal_sizes_emit_one_size_mismatch_with_input_urls() {
    let first = MemoryTreeBuilder::new().file("a.txt", 5).build("mem://first");
    let second = MemoryTreeBuilder::new().file("a.txt", 8).build("mem://second");

    let records = collect(
        first.at("a.txt").unwrap(),
        second.at("a.txt").unwrap(),
        false,
    )
    .await;
    assert_eq!(
        differences(&records),
        vec![(
            "mem://first/a.txt".to_string(),
            "mem://second/a.txt".to_string(),
            DiffKind::SizeMismatch
        )]
    );
    assert_eq!(failure_count(&records), 0);
}

#[tokio::test]
async fn test_directory_vs_regular_file_is_one_type_mismatch() {
    let first = MemoryTreeBuilder::new().file("d/x.txt", 1).build("mem://first");
    let second = MemoryTreeBuilder::new().file("d", 1).build("mem://second");

    let records = collect(first.at("d").unwrap(), second.at("d").unwrap(), false).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].kind(), Some(DiffKind::TypeMismatch));
}

#[tokio::test]
async fn test_regular_file_vs_special_entry_is_type_mismatch() {
    let first = MemoryTreeBuilder::new().file("f", 3).build("mem://first");
    let second = MemoryTreeBuilder::new().special("f").build("mem://second");

    let records = collect(first.at("f").unwrap(), second.at("f").unwrap(), false).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].kind(), Some(DiffKind::TypeMismatch));
}

#[tokio::test]
async fn test_file_against_directory_compares_projected_file() {
    // diff(f.txt, dir) compares f.txt against dir/f.txt.
    let first = MemoryTreeBuilder::new().file("f.txt", 4).build("mem://first");
    let second = MemoryTreeBuilder::new().file("f.txt", 9).build("mem://second");

    let records = collect(first.at("f.txt").unwrap(), second.at("").unwrap(), false).await;
    assert_eq!(
        differences(&records),
        vec![(
            "mem://first/f.txt".to_string(),
            "mem://second/f.txt".to_string(),
            DiffKind::SizeMismatch
        )]
    );
}

#[tokio::test]
async fn test_file_against_directory_with_equal_copy_emits_nothing() {
    let first = MemoryTreeBuilder::new().file("f.txt", 4).build("mem://first");
    let second = MemoryTreeBuilder::new().file("f.txt", 4).build("mem://second");

    let records = collect(first.at("f.txt").unwrap(), second.at("").unwrap(), false).await;
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_missing_first_url_is_one_tagged_failure() {
    let first = MemoryClient::empty("mem://first");
    let second = MemoryTreeBuilder::new().file("f.txt", 1).build("mem://second");

    let records = collect(
        first.at("absent.txt").unwrap(),
        second.at("f.txt").unwrap(),
        false,
    )
    .await;
    assert_eq!(records.len(), 1);
    match &records[0] {
        DiffRecord::Failure { urls, .. } => {
            assert_eq!(urls, &vec!["mem://first/absent.txt".to_string()]);
        }
        other => panic!("expected failure record, got {:?}", other),
    }
}

#[tokio::test]
async fn test_special_first_side_is_reported_not_dropped() {
    let first = MemoryTreeBuilder::new().special("weird").build("mem://first");
    let second = MemoryTreeBuilder::new().file("weird", 1).build("mem://second");

    let records = collect(
        first.at("weird").unwrap(),
        second.at("weird").unwrap(),
        false,
    )
    .await;
    assert_eq!(records.len(), 1);
    assert!(records[0].is_failure());
}

// ═══════════════════════════════════════════════════════════
// Flat differ
// ═══════════════════════════════════════════════════════════

#[tokio::test]
async fn test_flat_diff_reports_missing_top_level_entry() {
    let first = MemoryTreeBuilder::new().file("only.txt", 7).build("mem://first");
    let second = MemoryClient::empty("mem://second");

    let records = collect(first.at("").unwrap(), second.at("").unwrap(), false).await;
    assert_eq!(
        differences(&records),
        vec![(
            "mem://first/only.txt".to_string(),
            "mem://second/only.txt".to_string(),
            DiffKind::OnlyInFirst
        )]
    );
}

#[tokio::test]
async fn test_flat_diff_ignores_nested_differences() {
    let first = MemoryTreeBuilder::new()
        .file("top.txt", 2)
        .file("sub/deep.txt", 9)
        .build("mem://first");
    let second = MemoryTreeBuilder::new()
        .file("top.txt", 2)
        .file("sub/deep.txt", 1)
        .build("mem://second");

    let records = collect(first.at("").unwrap(), second.at("").unwrap(), false).await;
    assert!(records.is_empty(), "flat diff must not descend: {:?}", records);
}

#[tokio::test]
async fn test_flat_diff_reports_top_level_size_mismatch() {
    let first = MemoryTreeBuilder::new().file("a.txt", 5).build("mem://first");
    let second = MemoryTreeBuilder::new().file("a.txt", 8).build("mem://second");

    let records = collect(first.at("").unwrap(), second.at("").unwrap(), false).await;
    assert_eq!(
        differences(&records),
        vec![(
            "mem://first/a.txt".to_string(),
            "mem://second/a.txt".to_string(),
            DiffKind::SizeMismatch
        )]
    );
}

// ═══════════════════════════════════════════════════════════
// Recursive differ
// ═══════════════════════════════════════════════════════════

#[tokio::test]
async fn test_recursive_only_in_first_reconstructs_second_url() {
    let first = MemoryTreeBuilder::new()
        .file("a/x.txt", 10)
        .file("a/y.txt", 5)
        .build("mem://first");
    let second = MemoryTreeBuilder::new().file("a/x.txt", 10).build("mem://second");

    let records = collect(first.at("").unwrap(), second.at("").unwrap(), true).await;
    assert_eq!(
        differences(&records),
        vec![(
            "mem://first/a/y.txt".to_string(),
            "mem://second/a/y.txt".to_string(),
            DiffKind::OnlyInFirst
        )]
    );
    assert_eq!(failure_count(&records), 0);
}

#[tokio::test]
async fn test_recursive_type_mismatch_inside_tree() {
    let first = MemoryTreeBuilder::new().file("f.txt", 3).build("mem://first");
    let second = MemoryTreeBuilder::new().dir("f.txt").build("mem://second");

    let records = collect(first.at("").unwrap(), second.at("").unwrap(), true).await;
    assert_eq!(
        differences(&records),
        vec![(
            "mem://first/f.txt".to_string(),
            "mem://second/f.txt".to_string(),
            DiffKind::TypeMismatch
        )]
    );
}

#[tokio::test]
async fn test_recursive_size_mismatch_inside_tree() {
    let first = MemoryTreeBuilder::new().file("a.txt", 5).build("mem://first");
    let second = MemoryTreeBuilder::new().file("a.txt", 8).build("mem://second");

    let records = collect(first.at("").unwrap(), second.at("").unwrap(), true).await;
    assert_eq!(
        differences(&records),
        vec![(
            "mem://first/a.txt".to_string(),
            "mem://second/a.txt".to_string(),
            DiffKind::SizeMismatch
        )]
    );
}

#[tokio::test]
async fn test_recursive_is_one_directional() {
    // Entries only on the second side are never reported.
    let first = MemoryClient::empty("mem://first");
    let second = MemoryTreeBuilder::new().file("extra.txt", 1).build("mem://second");

    let records = collect(first.at("").unwrap(), second.at("").unwrap(), true).await;
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_recursive_is_idempotent_on_static_trees() {
    let build_first = || {
        MemoryTreeBuilder::new()
            .file("a/x.txt", 10)
            .file("a/y.txt", 5)
            .file("b.txt", 1)
            .build("mem://first")
    };
    let build_second = || {
        MemoryTreeBuilder::new()
            .file("a/x.txt", 11)
            .file("b.txt", 1)
            .build("mem://second")
    };

    let run1 = collect(build_first().at("").unwrap(), build_second().at("").unwrap(), true).await;
    let run2 = collect(build_first().at("").unwrap(), build_second().at("").unwrap(), true).await;
    assert_eq!(differences(&run1), differences(&run2));
    assert_eq!(differences(&run1).len(), 2); // a/x.txt size, a/y.txt missing
}

#[tokio::test]
async fn test_partial_listing_failure_keeps_partial_results_and_terminates() {
    // First side yields 2 of 5 entries before its listing dies: those 2 are
    // still compared, exactly one failure is streamed, and the stream closes.
    let first = MemoryTreeBuilder::new()
        .file("a.txt", 1)
        .file("b.txt", 2)
        .file("c.txt", 3)
        .file("d.txt", 4)
        .file("e.txt", 5)
        .fail_listing_after(2)
        .build("mem://first");
    let second = MemoryClient::empty("mem://second");

    let records = collect(first.at("").unwrap(), second.at("").unwrap(), true).await;
    assert_eq!(failure_count(&records), 1);
    assert_eq!(
        differences(&records),
        vec![
            (
                "mem://first/a.txt".to_string(),
                "mem://second/a.txt".to_string(),
                DiffKind::OnlyInFirst
            ),
            (
                "mem://first/b.txt".to_string(),
                "mem://second/b.txt".to_string(),
                DiffKind::OnlyInFirst
            ),
        ]
    );
}

#[tokio::test]
async fn test_second_side_listing_failure_still_terminates() {
    let first = MemoryTreeBuilder::new().file("a.txt", 1).build("mem://first");
    let second = MemoryTreeBuilder::new()
        .file("a.txt", 1)
        .fail_listing_after(0)
        .build("mem://second");

    let records = collect(first.at("").unwrap(), second.at("").unwrap(), true).await;
    // Nothing of the second side was indexed, so a.txt looks missing; the
    // listing failure itself is reported alongside.
    assert_eq!(failure_count(&records), 1);
    assert_eq!(differences(&records).len(), 1);
    assert_eq!(differences(&records)[0].2, DiffKind::OnlyInFirst);
}

/// Backend whose listing task dies outright instead of yielding an error event.
#[derive(Debug)]
struct CrashingClient {
    url: StorageUrl,
}

#[async_trait::async_trait]
impl StorageClient for CrashingClient {
    fn url(&self) -> &StorageUrl {
        &self.url
    }

    async fn stat(&self) -> Result<EntryAttributes, DiffError> {
        Ok(EntryAttributes::directory(self.url.file_name()))
    }

    async fn list(&self, _recursive: bool) -> Result<mpsc::Receiver<ListEvent>, DiffError> {
        panic!("listing backend crashed")
    }

    fn at(&self, relative: &str) -> Result<Arc<dyn StorageClient>, DiffError> {
        Ok(Arc::new(CrashingClient {
            url: self.url.join(relative),
        }))
    }

    async fn make_bucket(&self) -> Result<(), DiffError> {
        Err(DiffError::Config("crashing backend".to_string()))
    }
}

#[tokio::test]
async fn test_crashed_listing_task_is_a_failure_not_an_empty_side() {
    let first = MemoryTreeBuilder::new()
        .file("a.txt", 1)
        .file("b.txt", 2)
        .build("mem://first");
    let second: Arc<dyn StorageClient> = Arc::new(CrashingClient {
        url: StorageUrl::parse("mem://second").unwrap(),
    });

    let records = collect(first.at("").unwrap(), second, true).await;
    // A crashed index is not an empty tree: the side is reported as failed
    // and nothing gets compared against it.
    assert_eq!(records.len(), 1, "records: {:?}", records);
    assert!(differences(&records).is_empty());
    match &records[0] {
        DiffRecord::Failure { urls, .. } => assert_eq!(urls[0], "mem://second/"),
        _ => unreachable!(),
    }
}

#[tokio::test]
async fn test_abandoned_stream_does_not_hang() {
    let first = MemoryTreeBuilder::new()
        .file("a.txt", 1)
        .file("b.txt", 2)
        .build("mem://first");
    let second = MemoryClient::empty("mem://second");

    let stream = diff(
        first.at("").unwrap(),
        second.at("").unwrap(),
        DiffOptions {
            recursive: true,
            progress: None,
        },
    );
    // Consumer walks away immediately; producers must notice and stop.
    drop(stream);
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
}
