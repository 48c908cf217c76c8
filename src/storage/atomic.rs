//! Torn-write-free persistence.
//!
//! Content is written to a randomly named temp file next to the target and
//! renamed over it, so readers see either the old bytes or the new bytes.
//! Same-directory rename is atomic on local filesystems; network mounts are
//! not covered.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::{Result, StoreError};

/// Serialize `value` as pretty JSON and atomically replace `path` with it.
pub async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut bytes = serde_json::to_vec_pretty(value).map_err(|e| {
        StoreError::io(path, std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })?;
    bytes.push(b'\n');
    write_bytes(path, &bytes).await
}

/// Atomically replace `path` with `bytes`.
pub async fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    write_with(path, bytes, |_| Ok(())).await
}

/// `before_rename` runs once the temp file is durable and before it replaces
/// the target. Tests use it to inject failures at that point.
pub(crate) async fn write_with<F>(path: &Path, bytes: &[u8], before_rename: F) -> Result<()>
where
    F: FnOnce(&Path) -> std::io::Result<()>,
{
    let dir = parent_dir(path);
    fs::create_dir_all(&dir)
        .await
        .map_err(|e| StoreError::io(&dir, e))?;

    let tmp = temp_path(path, &dir)?;
    let result = write_then_rename(&tmp, path, bytes, before_rename).await;

    if result.is_err() {
        if let Err(e) = fs::remove_file(&tmp).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to remove temp file {}: {}", tmp.display(), e);
            }
        }
    }
    result
}

async fn write_then_rename<F>(tmp: &Path, path: &Path, bytes: &[u8], before_rename: F) -> Result<()>
where
    F: FnOnce(&Path) -> std::io::Result<()>,
{
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(tmp)
        .await
        .map_err(|e| StoreError::io(tmp, e))?;
    file.write_all(bytes)
        .await
        .map_err(|e| StoreError::io(tmp, e))?;
    file.sync_all().await.map_err(|e| StoreError::io(tmp, e))?;
    drop(file);

    before_rename(tmp).map_err(|e| StoreError::io(tmp, e))?;

    fs::rename(tmp, path)
        .await
        .map_err(|e| StoreError::io(path, e))
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn temp_path(path: &Path, dir: &Path) -> Result<PathBuf> {
    let name = path
        .file_name()
        .ok_or_else(|| StoreError::Validation(format!("{} has no file name", path.display())))?;
    Ok(dir.join(format!(
        ".{}.{}.tmp",
        name.to_string_lossy(),
        Uuid::new_v4().simple()
    )))
}
