//! Local filesystem storage client

use super::{ListEvent, StorageClient, StorageUrl, LIST_CHANNEL_CAPACITY};
use crate::types::{DiffError, EntryAttributes, EntryKind};
use async_trait::async_trait;
use camino::Utf8PathBuf;
use std::fs::FileType;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Storage client for plain paths and `file://` URLs.
#[derive(Debug, Clone)]
pub struct FsClient {
    url: StorageUrl,
    root: Utf8PathBuf,
}

impl FsClient {
    pub fn new(url: StorageUrl) -> Result<Self, DiffError> {
        let root = Utf8PathBuf::from(url.path().to_string());
        Ok(Self { url, root })
    }

    fn kind_of(file_type: FileType) -> EntryKind {
        if file_type.is_file() {
            EntryKind::Regular
        } else if file_type.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::Other
        }
    }

    fn relative_name(root: &Path, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(root).ok()?;
        let utf8 = camino::Utf8Path::from_path(relative)?;
        if utf8.as_str().is_empty() {
            return None;
        }
        // Normalize to forward slashes so keys compare across backends.
        Some(utf8.as_str().replace(std::path::MAIN_SEPARATOR, "/"))
    }

    fn walk_recursive(root: Utf8PathBuf, url: String, tx: mpsc::Sender<ListEvent>) {
        // Standard ignore filters stay off: a verifier has to see every entry,
        // including whatever .gitignore would hide.
        let walker = ignore::WalkBuilder::new(&root)
            .standard_filters(false)
            .build();

        for result in walker {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    let _ = tx.blocking_send(Err(DiffError::Listing {
                        url,
                        message: e.to_string(),
                    }));
                    return;
                }
            };
            if entry.depth() == 0 {
                continue;
            }
            let Some(name) = Self::relative_name(root.as_std_path(), entry.path()) else {
                let _ = tx.blocking_send(Err(DiffError::Listing {
                    url,
                    message: format!("non-UTF-8 path under '{}'", root),
                }));
                return;
            };
            let Some(file_type) = entry.file_type() else {
                continue;
            };
            let size = match entry.metadata() {
                Ok(metadata) => metadata.len(),
                Err(e) => {
                    let _ = tx.blocking_send(Err(DiffError::Listing {
                        url,
                        message: e.to_string(),
                    }));
                    return;
                }
            };
            let attrs = EntryAttributes {
                name,
                size,
                kind: Self::kind_of(file_type),
            };
            if tx.blocking_send(Ok(attrs)).is_err() {
                return;
            }
        }
    }

    fn walk_single_level(root: Utf8PathBuf, url: String, tx: mpsc::Sender<ListEvent>) {
        let entries = match std::fs::read_dir(&root) {
            Ok(entries) => entries,
            Err(e) => {
                let _ = tx.blocking_send(Err(DiffError::Listing {
                    url,
                    message: e.to_string(),
                }));
                return;
            }
        };

        for result in entries {
            let item = (|| -> Result<(std::path::PathBuf, u64, EntryKind), std::io::Error> {
                let entry = result?;
                let file_type = entry.file_type()?;
                let metadata = entry.metadata()?;
                Ok((entry.path(), metadata.len(), Self::kind_of(file_type)))
            })();
            match item {
                Ok((path, size, kind)) => {
                    // Same UTF-8 contract as the recursive walk: a name that
                    // cannot round-trip as a key is a listing error, not a
                    // lossily rewritten entry.
                    let Some(name) = Self::relative_name(root.as_std_path(), &path) else {
                        let _ = tx.blocking_send(Err(DiffError::Listing {
                            url,
                            message: format!("non-UTF-8 path under '{}'", root),
                        }));
                        return;
                    };
                    if tx.blocking_send(Ok(EntryAttributes { name, size, kind })).is_err() {
                        return;
                    }
                }
                Err(e) => {
                    let _ = tx.blocking_send(Err(DiffError::Listing {
                        url,
                        message: e.to_string(),
                    }));
                    return;
                }
            }
        }
    }
}

#[async_trait]
impl StorageClient for FsClient {
    fn url(&self) -> &StorageUrl {
        &self.url
    }

    async fn stat(&self) -> Result<EntryAttributes, DiffError> {
        let metadata = tokio::fs::symlink_metadata(&self.root)
            .await
            .map_err(|e| DiffError::Stat {
                url: self.url.to_string(),
                source: e,
            })?;
        Ok(EntryAttributes {
            name: self.url.file_name().to_string(),
            size: metadata.len(),
            kind: Self::kind_of(metadata.file_type()),
        })
    }

    async fn list(&self, recursive: bool) -> Result<mpsc::Receiver<ListEvent>, DiffError> {
        let (tx, rx) = mpsc::channel(LIST_CHANNEL_CAPACITY);
        let root = self.root.clone();
        let url = self.url.to_string();
        tokio::task::spawn_blocking(move || {
            if recursive {
                Self::walk_recursive(root, url, tx);
            } else {
                Self::walk_single_level(root, url, tx);
            }
        });
        Ok(rx)
    }

    fn at(&self, relative: &str) -> Result<Arc<dyn StorageClient>, DiffError> {
        Ok(Arc::new(FsClient::new(self.url.join(relative))?))
    }

    async fn make_bucket(&self) -> Result<(), DiffError> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }
}
