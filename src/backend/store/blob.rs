//! Blob Store
//!
//! Rendered card images live in a bucket-style blob store. The card record
//! only keeps the public URL; the object path is the part of that URL after
//! `/{bucket}/`.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::StoreError;

/// Object storage for rendered card images
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Remove the object at `path`
    ///
    /// Removing an object that does not exist is not an error.
    async fn delete(&self, path: &str) -> Result<(), StoreError>;
}

/// Extract the object path from a public blob URL
///
/// `https://cdn.example.com/storage/v1/object/public/polaroids/u1/card.png`
/// with bucket `polaroids` yields `u1/card.png`. Query strings and fragments
/// are ignored.
pub fn blob_path_from_url(url: &str, bucket: &str) -> Option<String> {
    let marker = format!("/{}/", bucket);
    let start = url.find(&marker)? + marker.len();
    let rest = &url[start..];
    let end = rest.find(['?', '#']).unwrap_or(rest.len());
    let path = &rest[..end];
    if path.is_empty() {
        None
    } else {
        Some(path.to_string())
    }
}

/// Blob store over a local directory
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store for `bucket` inside a directory served as `/storage/{bucket}/...`
    ///
    /// Object paths taken from public URLs exclude the bucket segment, so the
    /// store is rooted at the bucket directory itself.
    pub fn for_bucket(storage_dir: impl AsRef<Path>, bucket: &str) -> Self {
        Self::new(storage_dir.as_ref().join(bucket))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, StoreError> {
        let relative = Path::new(path);
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(StoreError::blob(format!("rejected blob path '{}'", path)));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn delete(&self, path: &str) -> Result<(), StoreError> {
        let full = self.resolve(path)?;
        match tokio::fs::remove_file(&full).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::blob(format!("{}: {}", full.display(), e))),
        }
    }
}

/// Blob store that only records which paths exist
#[derive(Default)]
pub struct MemoryBlobStore {
    objects: Mutex<HashSet<String>>,
    failing: AtomicBool,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put(&self, path: impl Into<String>) {
        self.objects.lock().await.insert(path.into());
    }

    pub async fn contains(&self, path: &str) -> bool {
        self.objects.lock().await.contains(path)
    }

    /// Make every delete fail
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn delete(&self, path: &str) -> Result<(), StoreError> {
        if self.failing.load(Ordering::Relaxed) {
            return Err(StoreError::blob("memory blob store is set to fail"));
        }
        self.objects.lock().await.remove(path);
        Ok(())
    }
}
