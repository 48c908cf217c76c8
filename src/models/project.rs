use serde::{Deserialize, Serialize};

use super::Timestamp;

/// A project known to the companion application.
///
/// The registry is an ordered sequence of these. `name` is expected to be
/// unique and is matched case-sensitively; that uniqueness is maintained by
/// whoever writes the registry, not by this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSettings {
    pub name: String,
    /// Working directory of the project on the local file system.
    pub path: String,
    pub created: Timestamp,
    pub last_accessed: Timestamp,
}
