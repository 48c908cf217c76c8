//! Whole-document load and save of a project's `notes.json`.
//!
//! There is no field-level patch API: callers load the entire document,
//! mutate it in memory and save it back.

use std::path::Path;

use tokio::fs;

use super::{atomic, NOTES_FILE};
use crate::error::{Result, StoreError};
use crate::models::NotesFile;

/// Load the task document from a project directory.
pub async fn load_notes(dir: &Path) -> Result<NotesFile> {
    let path = dir.join(NOTES_FILE);
    let text = match fs::read_to_string(&path).await {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(StoreError::NotFound(format!(
                "task document {}",
                path.display()
            )))
        }
        Err(e) => return Err(StoreError::io(path, e)),
    };

    let notes: NotesFile =
        serde_json::from_str(&text).map_err(|e| StoreError::parse(&path, e))?;
    tracing::debug!("Loaded {} ({} root tasks)", path.display(), notes.tasks.len());
    Ok(notes)
}

/// Atomically replace the task document in a project directory.
pub async fn save_notes(dir: &Path, notes: &NotesFile) -> Result<()> {
    let path = dir.join(NOTES_FILE);
    atomic::write_json(&path, notes).await?;
    tracing::info!("Saved {}", path.display());
    Ok(())
}
