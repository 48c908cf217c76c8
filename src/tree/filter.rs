//! Ancestry-preserving pruning.
//!
//! Each node is folded bottom-up: its children are filtered first, and the
//! node survives if it matches the predicate itself or still has surviving
//! children. Surviving nodes carry only their surviving children, so a deep
//! match keeps its whole ancestor chain while unrelated branches disappear.
//!
//! Recursion depth is bounded by the nesting `serde_json` accepts on load.

use crate::models::{StatusFilter, TaskNode};

/// Prune `forest` to the nodes matching `predicate` plus their ancestors.
///
/// `predicate` sees one node's own fields; descendants are handled by the fold.
pub fn filter_forest<F>(forest: &[TaskNode], predicate: F) -> Vec<TaskNode>
where
    F: Fn(&TaskNode) -> bool,
{
    filter_nodes(forest, &predicate)
}

pub fn filter_by_status(forest: &[TaskNode], status: StatusFilter) -> Vec<TaskNode> {
    match status {
        StatusFilter::All => forest.to_vec(),
        _ => filter_forest(forest, |node| status.matches(node)),
    }
}

fn filter_nodes(nodes: &[TaskNode], predicate: &dyn Fn(&TaskNode) -> bool) -> Vec<TaskNode> {
    nodes
        .iter()
        .filter_map(|node| prune(node, predicate))
        .collect()
}

fn prune(node: &TaskNode, predicate: &dyn Fn(&TaskNode) -> bool) -> Option<TaskNode> {
    let children = filter_nodes(&node.children, predicate);
    if !predicate(node) && children.is_empty() {
        return None;
    }

    Some(TaskNode {
        id: node.id.clone(),
        text: node.text.clone(),
        checked: node.checked,
        indent: node.indent,
        children,
        metadata: node.metadata.clone(),
        extra: node.extra.clone(),
    })
}
