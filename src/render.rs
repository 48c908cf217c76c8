//! Human-readable rendering of projects and task forests.

use serde_json::Value;

use crate::models::{ProjectSettings, TaskNode};

const CHECKED: &str = "[x]";
const UNCHECKED: &str = "[ ]";

fn checkbox(node: &TaskNode) -> &'static str {
    if node.checked {
        CHECKED
    } else {
        UNCHECKED
    }
}

/// Render a task forest with checkboxes and ids.
///
/// Example output:
/// ```text
/// [ ] Ship release (id: 1)
/// ├── [x] Write changelog (id: 2)
/// └── [ ] Tag version (id: 3)
///     └── [ ] Push tag (id: 4)
/// [x] Update docs (id: 5)
/// ```
pub fn render_tree(nodes: &[TaskNode]) -> String {
    let mut output = String::new();
    for node in nodes {
        render_node(&mut output, node, "", true, true);
    }
    output
}

/// Recursively render a node and its children.
fn render_node(
    output: &mut String,
    node: &TaskNode,
    prefix: &str,
    is_last: bool,
    is_root: bool,
) {
    if !is_root {
        let branch = if is_last { "└── " } else { "├── " };
        output.push_str(prefix);
        output.push_str(branch);
    }
    push_task_line(output, node);

    let child_prefix = if is_root {
        String::new()
    } else {
        let continuation = if is_last { "    " } else { "│   " };
        format!("{}{}", prefix, continuation)
    };

    for (i, child) in node.children.iter().enumerate() {
        let child_is_last = i == node.children.len() - 1;
        render_node(output, child, &child_prefix, child_is_last, false);
    }
}

fn push_task_line(output: &mut String, node: &TaskNode) {
    output.push_str(checkbox(node));
    output.push(' ');
    output.push_str(&node.text);
    output.push_str(" (id: ");
    output.push_str(&node.id);
    output.push_str(")\n");
}

/// One line per project, in the order given.
pub fn render_projects(projects: &[ProjectSettings]) -> String {
    let mut output = String::new();
    for project in projects {
        output.push_str(&format!(
            "- {} ({}) last accessed {}\n",
            project.name,
            project.path,
            project.last_accessed
        ));
    }
    output
}

/// Full detail of one task: its fields, metadata and immediate children.
pub fn render_task_detail(node: &TaskNode) -> String {
    let mut output = String::new();
    output.push_str(&format!("Task: {}\n", node.text));
    output.push_str(&format!("ID: {}\n", node.id));
    output.push_str(&format!(
        "Status: {}\n",
        if node.checked { "checked" } else { "unchecked" }
    ));
    output.push_str(&format!("Indent: {}\n", node.indent));

    match &node.metadata {
        Some(meta) if !meta.is_empty() => {
            output.push_str("Metadata:\n");
            for (key, value) in meta.display_entries() {
                output.push_str(&format!("  {}: {}\n", key, render_value(value)));
            }
        }
        _ => output.push_str("Metadata: none\n"),
    }

    if node.children.is_empty() {
        output.push_str("Children: none\n");
    } else {
        output.push_str(&format!("Children ({}):\n", node.children.len()));
        for child in &node.children {
            output.push_str("  ");
            push_task_line(&mut output, child);
        }
    }
    output
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "none".to_string(),
        Value::Array(items) if items.iter().all(|v| !v.is_object() && !v.is_array()) => items
            .iter()
            .map(render_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}
