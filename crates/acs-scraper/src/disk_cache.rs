//! Best-effort JSON blob store behind the `cache` tier.
//!
//! One file per key under a root directory that is created on first write.
//! Reads never fail: a missing or unreadable file, or one that no longer
//! matches the expected shape, is `None`. Writes never fail either; errors
//! are logged and dropped.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct DiskCache {
    root: PathBuf,
    /// Write failures log at `warn` when set, `debug` otherwise.
    verbose: bool,
}

impl DiskCache {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, verbose: bool) -> Self {
        Self {
            root: root.into(),
            verbose,
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", sanitize_key(key)))
    }

    /// Serializes `payload` to `<root>/<key>.json`, replacing any prior entry.
    pub async fn write<T: Serialize>(&self, key: &str, payload: &T) {
        if let Err(err) = self.try_write(key, payload).await {
            if self.verbose {
                tracing::warn!(key, error = %err, "disk cache write failed");
            } else {
                tracing::debug!(key, error = %err, "disk cache write failed");
            }
        }
    }

    pub async fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.path_for(key);
        let raw = tokio::fs::read(&path).await.ok()?;
        match serde_json::from_slice(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::debug!(key, error = %err, "disk cache entry does not match expected shape");
                None
            }
        }
    }

    async fn try_write<T: Serialize>(&self, key: &str, payload: &T) -> std::io::Result<()> {
        let body = serde_json::to_vec(payload)?;
        tokio::fs::create_dir_all(&self.root).await?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, &path).await
    }
}

/// Restricts keys to `[A-Za-z0-9_-]` so a key can never escape the root.
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
