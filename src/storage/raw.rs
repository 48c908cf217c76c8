//! Append-only raw task log (`raw.txt`).
//!
//! Entries are opaque lines for the companion's formatter. Appends are plain
//! `O_APPEND` writes rather than rename-based, so concurrent appenders may
//! interleave at write-call granularity.

use std::io::SeekFrom;
use std::path::Path;

use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};

use super::RAW_FILE;
use crate::error::{Result, StoreError};

/// Append `text` as its own line to the project's raw log.
pub async fn append_raw(dir: &Path, text: &str) -> Result<()> {
    fs::create_dir_all(dir)
        .await
        .map_err(|e| StoreError::io(dir, e))?;

    let path = dir.join(RAW_FILE);
    let mut entry = String::with_capacity(text.len() + 2);
    if tail_is_unterminated(&path).await? {
        entry.push('\n');
    }
    entry.push_str(text);
    if !text.ends_with('\n') {
        entry.push('\n');
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .await
        .map_err(|e| StoreError::io(&path, e))?;
    file.write_all(entry.as_bytes())
        .await
        .map_err(|e| StoreError::io(&path, e))?;
    file.flush().await.map_err(|e| StoreError::io(&path, e))?;

    tracing::info!("Appended {} bytes to {}", entry.len(), path.display());
    Ok(())
}

/// True when the log exists, is non-empty and its last byte is not `\n`.
async fn tail_is_unterminated(path: &Path) -> Result<bool> {
    let mut file = match File::open(path).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(StoreError::io(path, e)),
    };
    let len = file
        .metadata()
        .await
        .map_err(|e| StoreError::io(path, e))?
        .len();
    if len == 0 {
        return Ok(false);
    }

    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))
        .await
        .map_err(|e| StoreError::io(path, e))?;
    file.read_exact(&mut last)
        .await
        .map_err(|e| StoreError::io(path, e))?;
    Ok(last[0] != b'\n')
}
