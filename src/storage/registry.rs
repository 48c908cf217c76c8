//! Project name to on-disk directory resolution.
//!
//! The registry document is re-read on every call. The companion application
//! updates `last_accessed` behind our back, so caching would serve stale
//! ordering.

use std::cmp::Reverse;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use tokio::fs;

use super::{ProjectDir, REGISTRY_FILE};
use crate::error::{Result, StoreError};
use crate::models::ProjectSettings;

/// Read-only view of `projects.json` under a storage root.
#[derive(Debug, Clone)]
pub struct Registry {
    root: PathBuf,
}

impl Registry {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.root.join(REGISTRY_FILE)
    }

    /// All registered projects, most recently accessed first.
    ///
    /// A missing registry is an empty registry. Timestamps compare by instant
    /// whichever form they are stored in.
    pub async fn list(&self) -> Result<Vec<ProjectSettings>> {
        let mut projects = self.read().await?.unwrap_or_default();
        projects.sort_by_key(|p| Reverse(p.last_accessed.instant()));
        Ok(projects)
    }

    /// Find the project whose name matches exactly and return its directory.
    ///
    /// A name that is not a single plain path component (`a/b`, `..`) fails
    /// with [`StoreError::Validation`] before the registry is read, even if the
    /// registry lists it. An unlisted name fails with [`StoreError::NotFound`].
    pub async fn resolve(&self, name: &str) -> Result<ProjectDir> {
        validate_project_name(name)?;

        let settings = self
            .read()
            .await?
            .unwrap_or_default()
            .into_iter()
            .find(|p| p.name == name)
            .ok_or_else(|| StoreError::NotFound(format!("project '{}'", name)))?;

        tracing::debug!("Resolved project {} to {}", name, self.root.join(name).display());
        Ok(ProjectDir::new(self.root.join(name), settings))
    }

    async fn read(&self) -> Result<Option<Vec<ProjectSettings>>> {
        let path = self.path();
        let text = match fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(path, e)),
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| StoreError::parse(path, e))
    }
}

/// Project names become directory names, so they must be a single plain path
/// component.
pub fn validate_project_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(StoreError::Validation(
            "project name must not be blank".to_string(),
        ));
    }

    let mut components = Path::new(name).components();
    let single = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(c)), None) if c == OsStr::new(name)
    );
    if !single || name.contains('\\') {
        return Err(StoreError::Validation(format!(
            "invalid project name '{}'",
            name
        )));
    }
    Ok(())
}
