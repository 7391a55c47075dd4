//! Attachment storage rooted at the configured media directory.
//!
//! The lifecycle core treats attachments as opaque payload; the only
//! operations here are best-effort deletes. Deleting a file that is already
//! missing is a success (purge must be idempotent), and any other failure is
//! logged without aborting the caller.

use std::io;
use std::path::{Component, Path, PathBuf};

/// Filesystem-backed attachment store.
pub struct AssetStore {
    root: PathBuf,
}

impl AssetStore {
    /// Create a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The configured media root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Delete an attachment. Returns `Ok(true)` if a file was removed and
    /// `Ok(false)` if it was already missing.
    pub async fn remove(&self, relative_path: &str) -> io::Result<bool> {
        let path = self.resolve(relative_path)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Best-effort delete: failures are logged and swallowed. Used wherever
    /// asset cleanup must never block the record operation it accompanies.
    pub async fn remove_or_warn(&self, relative_path: &str) {
        match self.remove(relative_path).await {
            Ok(true) => {
                tracing::debug!(path = relative_path, "Removed attachment");
            }
            Ok(false) => {
                tracing::debug!(path = relative_path, "Attachment already missing");
            }
            Err(e) => {
                tracing::warn!(path = relative_path, error = %e, "Failed to remove attachment");
            }
        }
    }

    /// Resolve a stored relative path under the media root, rejecting
    /// absolute paths and parent-directory traversal.
    fn resolve(&self, relative_path: &str) -> io::Result<PathBuf> {
        let rel = Path::new(relative_path);
        let traversal = rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if rel.as_os_str().is_empty() || traversal {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid attachment path: {relative_path}"),
            ));
        }
        Ok(self.root.join(rel))
    }
}
