//! File-backed storage under a single root.
//!
//! ```text
//! {root}/projects.json            registry of ProjectSettings
//! {root}/{project}/notes.json     task document (NotesFile)
//! {root}/{project}/raw.txt        append-only raw task log
//! ```
//!
//! Documents are loaded lazily per request, so a malformed document in one
//! project never blocks operations on another.

pub mod atomic;
mod notes;
mod raw;
mod registry;

use std::path::{Path, PathBuf};

pub use notes::{load_notes, save_notes};
pub use raw::append_raw;
pub use registry::{validate_project_name, Registry};

use crate::config::Config;
use crate::error::Result;
use crate::models::{NotesFile, ProjectSettings};

pub const REGISTRY_FILE: &str = "projects.json";
pub const NOTES_FILE: &str = "notes.json";
pub const RAW_FILE: &str = "raw.txt";

/// Entry point to everything stored under the configured root.
#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    pub fn new(config: &Config) -> Self {
        Self::open(config.root())
    }

    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn registry(&self) -> Registry {
        Registry::new(&self.root)
    }

    pub async fn list_projects(&self) -> Result<Vec<ProjectSettings>> {
        self.registry().list().await
    }

    pub async fn project(&self, name: &str) -> Result<ProjectDir> {
        self.registry().resolve(name).await
    }
}

/// A resolved project: its registry entry and its directory under the root.
#[derive(Debug, Clone)]
pub struct ProjectDir {
    pub settings: ProjectSettings,
    dir: PathBuf,
}

impl ProjectDir {
    pub(crate) fn new(dir: PathBuf, settings: ProjectSettings) -> Self {
        Self { settings, dir }
    }

    pub fn name(&self) -> &str {
        &self.settings.name
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn notes_path(&self) -> PathBuf {
        self.dir.join(NOTES_FILE)
    }

    pub fn raw_path(&self) -> PathBuf {
        self.dir.join(RAW_FILE)
    }

    pub async fn load_notes(&self) -> Result<NotesFile> {
        load_notes(&self.dir).await
    }

    pub async fn save_notes(&self, notes: &NotesFile) -> Result<()> {
        save_notes(&self.dir, notes).await
    }

    pub async fn append_raw(&self, text: &str) -> Result<()> {
        append_raw(&self.dir, text).await
    }
}
