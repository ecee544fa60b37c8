//! In-memory storage client
//!
//! Backs the engine tests and doubles as a scriptable stand-in for a remote
//! backend. The whole tree lives in one shared map keyed by relative path;
//! `at()` handles re-scope into it without copying.

use super::{ListEvent, StorageClient, StorageUrl, LIST_CHANNEL_CAPACITY};
use crate::types::{DiffError, EntryAttributes};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Debug, Default)]
struct MemoryTree {
    entries: BTreeMap<String, EntryAttributes>,
    /// Abort listings with an error after this many yielded entries.
    fail_listing_after: Option<usize>,
}

/// Storage client over an in-memory tree.
#[derive(Debug, Clone)]
pub struct MemoryClient {
    url: StorageUrl,
    /// Path of this handle relative to the tree root; empty at the root.
    prefix: String,
    tree: Arc<MemoryTree>,
}

/// Builder for the shared tree behind `MemoryClient` handles.
#[derive(Debug, Default)]
pub struct MemoryTreeBuilder {
    tree: MemoryTree,
}

impl MemoryTreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a regular object, creating implicit parent directories.
    pub fn file(mut self, name: &str, size: u64) -> Self {
        self.add_parents(name);
        self.tree
            .entries
            .insert(name.to_string(), EntryAttributes::regular(name, size));
        self
    }

    /// Add an explicit directory entry.
    pub fn dir(mut self, name: &str) -> Self {
        self.add_parents(name);
        self.tree
            .entries
            .insert(name.to_string(), EntryAttributes::directory(name));
        self
    }

    /// Add a special entry (symlink-like, never equal to anything).
    pub fn special(mut self, name: &str) -> Self {
        self.add_parents(name);
        self.tree
            .entries
            .insert(name.to_string(), EntryAttributes::other(name));
        self
    }

    /// Make listings fail after yielding `count` entries.
    pub fn fail_listing_after(mut self, count: usize) -> Self {
        self.tree.fail_listing_after = Some(count);
        self
    }

    pub fn build(self, url: &str) -> MemoryClient {
        let url = StorageUrl::parse(url).expect("memory tree URL must parse");
        MemoryClient {
            url,
            prefix: String::new(),
            tree: Arc::new(self.tree),
        }
    }

    fn add_parents(&mut self, name: &str) {
        let mut parent = name;
        while let Some((head, _)) = parent.rsplit_once('/') {
            self.tree
                .entries
                .entry(head.to_string())
                .or_insert_with(|| EntryAttributes::directory(head));
            parent = head;
        }
    }
}

impl MemoryClient {
    /// Empty tree rooted at `url`.
    pub fn empty(url: &str) -> Self {
        MemoryTreeBuilder::new().build(url)
    }

    fn join_prefix(&self, relative: &str) -> String {
        let relative = relative.trim_matches('/');
        if self.prefix.is_empty() {
            relative.to_string()
        } else if relative.is_empty() {
            self.prefix.clone()
        } else {
            format!("{}/{}", self.prefix, relative)
        }
    }

    /// Entries directly or transitively under `prefix`, with names rebased.
    fn children(&self, recursive: bool) -> Vec<EntryAttributes> {
        let scope = if self.prefix.is_empty() {
            String::new()
        } else {
            format!("{}/", self.prefix)
        };
        self.tree
            .entries
            .iter()
            .filter_map(|(path, attrs)| {
                let relative = path.strip_prefix(&scope)?;
                if relative.is_empty() {
                    return None;
                }
                if !recursive && relative.contains('/') {
                    return None;
                }
                let mut attrs = attrs.clone();
                attrs.name = relative.to_string();
                Some(attrs)
            })
            .collect()
    }
}

#[async_trait]
impl StorageClient for MemoryClient {
    fn url(&self) -> &StorageUrl {
        &self.url
    }

    async fn stat(&self) -> Result<EntryAttributes, DiffError> {
        if self.prefix.is_empty() {
            return Ok(EntryAttributes::directory(self.url.file_name()));
        }
        match self.tree.entries.get(&self.prefix) {
            Some(attrs) => Ok(attrs.clone()),
            None => Err(DiffError::NotFound {
                url: self.url.to_string(),
            }),
        }
    }

    async fn list(&self, recursive: bool) -> Result<mpsc::Receiver<ListEvent>, DiffError> {
        let (tx, rx) = mpsc::channel(LIST_CHANNEL_CAPACITY);
        let children = self.children(recursive);
        let fail_after = self.tree.fail_listing_after;
        let url = self.url.to_string();
        tokio::spawn(async move {
            for (index, attrs) in children.into_iter().enumerate() {
                if fail_after == Some(index) {
                    let _ = tx
                        .send(Err(DiffError::Listing {
                            url,
                            message: "injected listing failure".to_string(),
                        }))
                        .await;
                    return;
                }
                if tx.send(Ok(attrs)).await.is_err() {
                    return;
                }
            }
        });
        Ok(rx)
    }

    fn at(&self, relative: &str) -> Result<Arc<dyn StorageClient>, DiffError> {
        Ok(Arc::new(MemoryClient {
            url: self.url.join(relative),
            prefix: self.join_prefix(relative),
            tree: Arc::clone(&self.tree),
        }))
    }

    async fn make_bucket(&self) -> Result<(), DiffError> {
        // The shared tree is immutable once built; creation is meaningless here.
        Err(DiffError::Config(
            "memory backend cannot create buckets".to_string(),
        ))
    }
}
