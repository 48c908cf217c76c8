use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A checklist item in a project's task forest.
///
/// `children` is owned exclusively by this node. `id` is an opaque string
/// (normally a UUID) assigned by the companion; this crate never generates or
/// rewrites ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskNode {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub indent: u32,
    #[serde(default)]
    pub children: Vec<TaskNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<TaskMetadata>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TaskNode {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            checked: false,
            indent: 0,
            children: Vec::new(),
            metadata: None,
            extra: Map::new(),
        }
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn with_children(mut self, children: Vec<TaskNode>) -> Self {
        self.children = children;
        self
    }

    pub fn with_metadata(mut self, metadata: TaskMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Descriptive fields attached to a task: priority, deadline, tags,
/// `blocked_by`, `depends_on`, notes, timing and attempt history, and whatever
/// else the companion records.
///
/// Tree operations never look inside. The payload round-trips as-is; the only
/// consumer is the detail renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskMetadata(pub Map<String, Value>);

impl TaskMetadata {
    /// Keys shown first, in this order, when rendering task details.
    pub const KNOWN_KEYS: [&'static str; 6] = [
        "priority",
        "deadline",
        "tags",
        "blocked_by",
        "depends_on",
        "notes",
    ];

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in display order: known keys first, then the rest by key.
    pub fn display_entries(&self) -> Vec<(&str, &Value)> {
        let mut entries: Vec<(&str, &Value)> = Self::KNOWN_KEYS
            .iter()
            .filter_map(|key| self.0.get(*key).map(|value| (*key, value)))
            .collect();
        let mut rest: Vec<(&str, &Value)> = self
            .0
            .iter()
            .filter(|(key, _)| !Self::KNOWN_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.as_str(), value))
            .collect();
        rest.sort_by(|a, b| a.0.cmp(b.0));
        entries.extend(rest);
        entries
    }
}

impl From<Map<String, Value>> for TaskMetadata {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Status predicate used when listing tasks.
///
/// - `All`: Keep every node
/// - `Checked`: Keep checked nodes and their ancestors
/// - `Unchecked`: Keep unchecked nodes and their ancestors
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Checked,
    Unchecked,
}

impl StatusFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Checked => "checked",
            Self::Unchecked => "unchecked",
        }
    }

    /// Tests a single node's own state, ignoring its descendants.
    pub fn matches(&self, node: &TaskNode) -> bool {
        match self {
            Self::All => true,
            Self::Checked => node.checked,
            Self::Unchecked => !node.checked,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "checked" => Ok(Self::Checked),
            "unchecked" => Ok(Self::Unchecked),
            other => Err(format!(
                "Invalid status '{}'. Must be: all, checked, or unchecked",
                other
            )),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
