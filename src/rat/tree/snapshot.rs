//! Tree snapshot - an owned, serializable copy of a subtree
//!
//! The arena representation is convenient while matching but awkward to hand to serde. A
//! snapshot captures one subtree as plain nested values so each output format only deals
//! with presentation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{NodeId, Tree};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeSnapshot {
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub branches: Vec<TreeSnapshot>,
}

impl TreeSnapshot {
    pub fn new(name: impl Into<String>) -> Self {
        TreeSnapshot {
            name: name.into(),
            attributes: BTreeMap::new(),
            tags: Vec::new(),
            branches: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_branch(mut self, branch: TreeSnapshot) -> Self {
        self.branches.push(branch);
        self
    }

    /// Number of nodes in this snapshot, including itself
    pub fn count(&self) -> usize {
        1 + self.branches.iter().map(TreeSnapshot::count).sum::<usize>()
    }

    /// Rebuild an arena tree from this snapshot
    pub fn to_tree(&self) -> Tree {
        let mut tree = Tree::new(&self.name);
        let root = tree.root();
        self.fill(&mut tree, root);
        tree
    }

    fn fill(&self, tree: &mut Tree, id: NodeId) {
        for (key, value) in &self.attributes {
            tree[id].set_attribute(key.clone(), value.clone());
        }
        for tag in &self.tags {
            tree[id].tag(tag);
        }
        for branch in &self.branches {
            let child = tree.new_node(&branch.name);
            tree.add_branch(id, child);
            branch.fill(tree, child);
        }
    }
}
