//! Storage root configuration.
//!
//! The root is resolved once at startup and handed to [`crate::storage::Store`];
//! nothing below this module reads the environment.
//! - `TASKTREE_ROOT` - Storage root (default: platform data directory)

use std::path::{Path, PathBuf};

use anyhow::Result;

const APP_NAME: &str = "tasktree";
const ROOT_ENV: &str = "TASKTREE_ROOT";

/// Runtime configuration for the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding `projects.json` and one subdirectory per project.
    pub root: PathBuf,
}

impl Config {
    /// Create with an explicit storage root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve the root from an explicit override, then `TASKTREE_ROOT`, then
    /// the platform data directory.
    pub fn resolve(root_override: Option<PathBuf>) -> Result<Self> {
        if let Some(root) = root_override {
            return Ok(Self::new(root));
        }
        Self::from_env()
    }

    pub fn from_env() -> Result<Self> {
        match std::env::var_os(ROOT_ENV) {
            Some(root) if !root.is_empty() => Ok(Self::new(root)),
            _ => Ok(Self::new(default_root()?)),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn default_root() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", APP_NAME)
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(dirs.data_dir().to_path_buf())
}
