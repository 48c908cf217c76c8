use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{TaskNode, Timestamp};

/// The per-project task document.
///
/// Created by the companion's formatter on first use. This crate only loads
/// it, flips `checked` on located nodes and rewrites the whole document.
/// `last_modified` is advisory; there is no optimistic-lock check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotesFile {
    pub version: String,
    pub project_path: String,
    pub last_modified: Timestamp,
    #[serde(default)]
    pub tasks: Vec<TaskNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_formatted_raw: Option<String>,
    /// Fields written by other tools that this crate does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NotesFile {
    /// Checked nodes and total nodes across the whole forest, as `(checked, total)`.
    pub fn progress(&self) -> (usize, usize) {
        let mut total = 0;
        let mut checked = 0;
        let mut stack: Vec<&TaskNode> = self.tasks.iter().collect();
        while let Some(node) = stack.pop() {
            total += 1;
            if node.checked {
                checked += 1;
            }
            stack.extend(node.children.iter());
        }
        (checked, total)
    }
}
