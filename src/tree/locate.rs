//! Id lookup anywhere in a forest.
//!
//! Traversal is depth-first pre-order with siblings in order: a node is
//! tested before its children and the first exact id match wins. Forests
//! holding duplicate ids are malformed; later duplicates are unreachable here.

use crate::models::TaskNode;

/// A node found in a forest, together with the sibling sequence that
/// directly contains it.
#[derive(Debug, Clone, Copy)]
pub struct Located<'a> {
    pub siblings: &'a [TaskNode],
    pub index: usize,
}

impl<'a> Located<'a> {
    pub fn node(&self) -> &'a TaskNode {
        &self.siblings[self.index]
    }
}

/// Mutable counterpart of [`Located`], for editing the node in place or
/// restructuring its sibling sequence.
#[derive(Debug)]
pub struct LocatedMut<'a> {
    pub siblings: &'a mut Vec<TaskNode>,
    pub index: usize,
}

impl<'a> LocatedMut<'a> {
    pub fn node(&self) -> &TaskNode {
        &self.siblings[self.index]
    }

    pub fn node_mut(&mut self) -> &mut TaskNode {
        &mut self.siblings[self.index]
    }

    pub fn into_node_mut(self) -> &'a mut TaskNode {
        let siblings = self.siblings;
        &mut siblings[self.index]
    }

    /// Swap in `node`, returning the one it replaced.
    pub fn replace(self, node: TaskNode) -> TaskNode {
        std::mem::replace(&mut self.siblings[self.index], node)
    }

    /// Detach the node (and its subtree) from its siblings.
    pub fn remove(self) -> TaskNode {
        self.siblings.remove(self.index)
    }
}

/// Index path to the first node with `id`: the first entry indexes the
/// forest, each following entry indexes the previous node's children.
pub fn locate_path(forest: &[TaskNode], id: &str) -> Option<Vec<usize>> {
    let mut stack: Vec<(Vec<usize>, &TaskNode)> = forest
        .iter()
        .enumerate()
        .rev()
        .map(|(i, node)| (vec![i], node))
        .collect();

    while let Some((path, node)) = stack.pop() {
        if node.id == id {
            return Some(path);
        }
        for (i, child) in node.children.iter().enumerate().rev() {
            let mut child_path = Vec::with_capacity(path.len() + 1);
            child_path.extend_from_slice(&path);
            child_path.push(i);
            stack.push((child_path, child));
        }
    }
    None
}

pub fn find<'a>(forest: &'a [TaskNode], id: &str) -> Option<Located<'a>> {
    let path = locate_path(forest, id)?;
    let (&index, parents) = path.split_last()?;

    let mut siblings: &[TaskNode] = forest;
    for &i in parents {
        siblings = siblings[i].children.as_slice();
    }
    Some(Located { siblings, index })
}

pub fn find_mut<'a>(forest: &'a mut Vec<TaskNode>, id: &str) -> Option<LocatedMut<'a>> {
    let path = locate_path(forest, id)?;
    let (&index, parents) = path.split_last()?;

    let mut siblings = forest;
    for &i in parents {
        let current = siblings;
        siblings = &mut current[i].children;
    }
    Some(LocatedMut { siblings, index })
}
