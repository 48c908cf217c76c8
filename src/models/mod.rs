//! Domain models for the shared task tree.
//!
//! # Core Concepts
//!
//! - [`ProjectSettings`]: One entry of the project registry (`projects.json`).
//! - [`NotesFile`]: The single document persisted per project (`notes.json`),
//!   holding an ordered forest of [`TaskNode`]s.
//! - [`TaskNode`]: A checklist item with exclusively owned children.
//! - [`TaskMetadata`]: Opaque descriptive payload attached to a node. Carried
//!   through load and save untouched.
//! - [`StatusFilter`]: Which nodes a filtered view of the forest keeps.
//! - [`Timestamp`]: A companion-written time, RFC 3339 or epoch milliseconds.

mod notes;
mod project;
mod task;
mod timestamp;

pub use notes::*;
pub use project::*;
pub use task::*;
pub use timestamp::*;
