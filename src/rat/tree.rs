//! Generic N-ary tree
//!
//!     The tree is used for parse results. Every node has a name, a set of string attributes
//!     (unique by key), a set of tags and an ordered list of branches. A node owns its branches;
//!     removing a branch destroys the whole subtree below it.
//!
//! Storage
//!
//!     Nodes live in an arena owned by [Tree] and are addressed by [NodeId]. A node refers to
//!     its branches and to its parent by id, so the parent link is only ever used for
//!     navigation. Slots of removed nodes are reused; every slot carries a generation counter
//!     so an id that outlived its node is detected instead of silently aliasing a new one.
//!
//!     Indexing a tree with a stale id panics, the same way indexing a `Vec` out of bounds
//!     does. Use [Tree::get] when an id may be stale.
//!
//! Enumeration
//!
//!     [Tree::enumerate] lists descendants depth first, children before their parent, left to
//!     right. A client can walk that list and remove nodes as it goes: a node is always visited
//!     after everything below it.

pub mod snapshot;

pub use snapshot::TreeSnapshot;

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::ops::{Index, IndexMut};

/// Handle to a node inside a [Tree]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

/// A single node: name, attributes, tags and the ids of its branches
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    name: String,
    attributes: BTreeMap<String, String>,
    tags: Vec<String>,
    branches: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl Node {
    fn named(name: &str) -> Self {
        Node {
            name: name.to_string(),
            ..Node::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Look up an attribute. A missing key is reported as `None` and is not created.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Set an attribute, replacing any previous value
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        self.attributes.remove(name)
    }

    /// Attributes in key order
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Add a tag. Tagging twice has no further effect.
    pub fn tag(&mut self, tag: &str) {
        if !self.has_tag(tag) {
            self.tags.push(tag.to_string());
        }
    }

    pub fn untag(&mut self, tag: &str) {
        self.tags.retain(|t| t != tag);
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn count_tags(&self) -> usize {
        self.tags.len()
    }

    /// Tags in insertion order
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Branch ids in insertion order
    pub fn branches(&self) -> &[NodeId] {
        &self.branches
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Arena-backed tree with a designated root
#[derive(Debug, Clone)]
pub struct Tree {
    slots: Vec<Slot>,
    free: Vec<usize>,
    root: NodeId,
    live: usize,
}

impl Tree {
    /// Create a tree holding a single root node
    pub fn new(name: &str) -> Self {
        let mut tree = Tree {
            slots: Vec::new(),
            free: Vec::new(),
            root: NodeId {
                index: 0,
                generation: 0,
            },
            live: 0,
        };
        tree.root = tree.new_node(name);
        tree
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Allocate a detached node. It belongs to nothing until passed to [Tree::add_branch].
    pub fn new_node(&mut self, name: &str) -> NodeId {
        self.live += 1;
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.node = Some(Node::named(name));
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(Node::named(name)),
                });
                NodeId {
                    index: self.slots.len() - 1,
                    generation: 0,
                }
            }
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    /// True if `id` refers to a live node
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live nodes in the arena, attached or not
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Make `child` the last branch of `parent`.
    ///
    /// If `child` already hangs off another node it is moved, never shared.
    ///
    /// # Panics
    ///
    /// Panics if either id is stale, or if `child` is `parent` or one of its ancestors.
    pub fn add_branch(&mut self, parent: NodeId, child: NodeId) -> NodeId {
        assert!(
            !self.is_ancestor_or_self(child, parent),
            "a node cannot become a branch of its own subtree"
        );
        self.detach(child);
        self[child].parent = Some(parent);
        self[parent].branches.push(child);
        child
    }

    /// Remove `child` from `parent` and destroy its subtree. Returns false if `child` is
    /// not a branch of `parent`.
    pub fn remove_branch(&mut self, parent: NodeId, child: NodeId) -> bool {
        let Some(position) = self[parent].branches.iter().position(|b| *b == child) else {
            return false;
        };
        self[parent].branches.remove(position);
        self[child].parent = None;
        self.free_subtree(child);
        true
    }

    /// Destroy every branch of `parent`
    pub fn remove_all_branches(&mut self, parent: NodeId) {
        let branches = std::mem::take(&mut self[parent].branches);
        for branch in branches {
            self[branch].parent = None;
            self.free_subtree(branch);
        }
    }

    /// Put `new` where `old` was among the branches of `parent`.
    ///
    /// Returns the now detached `old`, which stays alive until the caller hands it to
    /// [Tree::dispose] or attaches it elsewhere. Returns `None` and changes nothing if `old`
    /// is not a branch of `parent`.
    pub fn replace_branch(&mut self, parent: NodeId, old: NodeId, new: NodeId) -> Option<NodeId> {
        let position = self[parent].branches.iter().position(|b| *b == old)?;
        if old == new {
            return Some(old);
        }
        assert!(
            !self.is_ancestor_or_self(new, parent),
            "a node cannot become a branch of its own subtree"
        );
        self.detach(new);
        // Detaching `new` may have shifted positions if it was a sibling of `old`
        let position = self[parent]
            .branches
            .iter()
            .position(|b| *b == old)
            .unwrap_or(position);
        self[parent].branches[position] = new;
        self[new].parent = Some(parent);
        self[old].parent = None;
        Some(old)
    }

    /// Move every branch of `from` to the end of the branches of `to`, keeping their order
    pub fn splice_branches(&mut self, to: NodeId, from: NodeId) {
        if to == from {
            return;
        }
        let moved = std::mem::take(&mut self[from].branches);
        for branch in &moved {
            self[*branch].parent = Some(to);
        }
        self[to].branches.extend(moved);
    }

    /// Detach `id` from its parent, if any, and destroy it with its subtree.
    /// Disposing the root leaves an empty arena.
    pub fn dispose(&mut self, id: NodeId) {
        if !self.contains(id) {
            return;
        }
        self.detach(id);
        self.free_subtree(id);
    }

    /// Total number of nodes in the subtree at `id`, including `id`
    pub fn count(&self, id: NodeId) -> usize {
        1 + self[id]
            .branches
            .iter()
            .map(|branch| self.count(*branch))
            .sum::<usize>()
    }

    /// Follow a slash-delimited name path starting at `id`.
    ///
    /// The first component must name `id` itself. At each level the first branch with a
    /// matching name is taken; siblings with the same name are not searched.
    pub fn find(&self, id: NodeId, path: &str) -> Option<NodeId> {
        let mut components = path.split('/');
        let first = components.next()?;
        if self[id].name != first {
            return None;
        }

        let mut cursor = id;
        for component in components {
            cursor = *self[cursor]
                .branches
                .iter()
                .find(|branch| self[**branch].name == component)?;
        }
        Some(cursor)
    }

    /// Descendants of `id`, depth first, each node after its own branches
    pub fn enumerate(&self, id: NodeId) -> Vec<NodeId> {
        let mut all = Vec::new();
        self.enumerate_into(id, &mut all);
        all
    }

    fn enumerate_into(&self, id: NodeId, all: &mut Vec<NodeId>) {
        for branch in &self[id].branches {
            self.enumerate_into(*branch, all);
            all.push(*branch);
        }
    }

    /// Names from the root of the containing subtree down to `id`, joined with `/`.
    /// The result is a path [Tree::find] accepts from that root.
    pub fn path(&self, id: NodeId) -> String {
        let mut names = vec![self[id].name.as_str()];
        let mut cursor = self[id].parent;
        while let Some(parent) = cursor {
            names.push(self[parent].name.as_str());
            cursor = self[parent].parent;
        }
        names.reverse();
        names.join("/")
    }

    /// Diagnostic rendering: names, attributes and tags indented by depth
    pub fn dump(&self, id: NodeId) -> String {
        let mut output = format!("Tree ({} nodes)\n", self.count(id));
        self.dump_node(id, 1, &mut output);
        output
    }

    fn dump_node(&self, id: NodeId, depth: usize, output: &mut String) {
        let node = &self[id];
        output.push_str(&"  ".repeat(depth));
        output.push_str(&node.name);

        for (key, value) in node.attributes() {
            let _ = write!(output, " {}='{}'", key, value);
        }
        for tag in &node.tags {
            output.push(' ');
            output.push_str(tag);
        }
        output.push('\n');

        for branch in &node.branches {
            self.dump_node(*branch, depth + 1, output);
        }
    }

    /// Owned, serializable copy of the subtree at `id`
    pub fn snapshot(&self, id: NodeId) -> TreeSnapshot {
        let node = &self[id];
        TreeSnapshot {
            name: node.name.clone(),
            attributes: node.attributes.clone(),
            tags: node.tags.clone(),
            branches: node
                .branches
                .iter()
                .map(|branch| self.snapshot(*branch))
                .collect(),
        }
    }

    fn is_ancestor_or_self(&self, candidate: NodeId, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == candidate {
                return true;
            }
            cursor = self[current].parent;
        }
        false
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self[id].parent.take() {
            self[parent].branches.retain(|b| *b != id);
        }
    }

    fn free_subtree(&mut self, id: NodeId) {
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            let slot = &mut self.slots[current.index];
            if slot.generation != current.generation {
                continue;
            }
            if let Some(node) = slot.node.take() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(current.index);
                self.live -= 1;
                pending.extend(node.branches);
            }
        }
    }
}

impl Index<NodeId> for Tree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        match self.get(id) {
            Some(node) => node,
            None => panic!("stale node id {:?}", id),
        }
    }
}

impl IndexMut<NodeId> for Tree {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        match self.get_mut(id) {
            Some(node) => node,
            None => panic!("stale node id {:?}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// root
    ///   a
    ///     b
    ///   c
    fn sample() -> (Tree, NodeId, NodeId, NodeId) {
        let mut tree = Tree::new("root");
        let a = tree.new_node("a");
        let b = tree.new_node("b");
        let c = tree.new_node("c");
        let root = tree.root();
        tree.add_branch(root, a);
        tree.add_branch(a, b);
        tree.add_branch(root, c);
        (tree, a, b, c)
    }

    #[test]
    fn test_add_branch_sets_parent_and_order() {
        let (tree, a, b, c) = sample();
        let root = tree.root();
        assert_eq!(tree[root].branches(), &[a, c]);
        assert_eq!(tree[a].parent(), Some(root));
        assert_eq!(tree[b].parent(), Some(a));
        assert_eq!(tree[root].parent(), None);
        assert_eq!(tree.count(root), 4);
    }

    #[test]
    fn test_add_branch_moves_instead_of_sharing() {
        let (mut tree, a, b, c) = sample();
        tree.add_branch(c, b);
        assert!(tree[a].branches().is_empty());
        assert_eq!(tree[c].branches(), &[b]);
        assert_eq!(tree[b].parent(), Some(c));
        assert_eq!(tree.count(tree.root()), 4);
    }

    #[test]
    #[should_panic(expected = "own subtree")]
    fn test_add_branch_rejects_cycles() {
        let (mut tree, a, b, _) = sample();
        tree.add_branch(b, a);
    }

    #[test]
    fn test_remove_branch_destroys_subtree() {
        let (mut tree, a, b, c) = sample();
        let root = tree.root();
        assert!(tree.remove_branch(root, a));
        assert!(!tree.contains(a));
        assert!(!tree.contains(b));
        assert_eq!(tree[root].branches(), &[c]);
        assert_eq!(tree.len(), 2);
        assert!(!tree.remove_branch(root, a));
    }

    #[test]
    fn test_remove_all_branches() {
        let (mut tree, _, _, _) = sample();
        let root = tree.root();
        tree.remove_all_branches(root);
        assert_eq!(tree.count(root), 1);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_stale_id_is_not_reused() {
        let (mut tree, a, _, _) = sample();
        let root = tree.root();
        tree.remove_branch(root, a);
        let fresh = tree.new_node("fresh");
        assert!(tree.get(a).is_none());
        assert_eq!(tree[fresh].name(), "fresh");
    }

    #[test]
    fn test_replace_branch_keeps_position() {
        let (mut tree, a, _, c) = sample();
        let root = tree.root();
        let d = tree.new_node("d");
        let old = tree.replace_branch(root, a, d);
        assert_eq!(old, Some(a));
        assert_eq!(tree[root].branches(), &[d, c]);
        assert_eq!(tree[a].parent(), None);
        assert_eq!(tree[d].parent(), Some(root));

        // The caller owns the detached node until it is disposed
        assert!(tree.contains(a));
        tree.dispose(a);
        assert_eq!(tree.len(), tree.count(root));
    }

    #[test]
    fn test_replace_branch_with_a_sibling() {
        let (mut tree, a, _, c) = sample();
        let root = tree.root();
        assert_eq!(tree.replace_branch(root, a, c), Some(a));
        assert_eq!(tree[root].branches(), &[c]);
    }

    #[test]
    fn test_replace_branch_missing() {
        let (mut tree, _, b, c) = sample();
        let root = tree.root();
        assert_eq!(tree.replace_branch(root, b, c), None);
        assert_eq!(tree.count(root), 4);
    }

    #[test]
    fn test_splice_branches() {
        let (mut tree, a, b, c) = sample();
        let d = tree.new_node("d");
        tree.add_branch(c, d);
        tree.splice_branches(a, c);
        assert_eq!(tree[a].branches(), &[b, d]);
        assert_eq!(tree[d].parent(), Some(a));
        assert!(tree[c].branches().is_empty());
    }

    #[test]
    fn test_attributes_do_not_autovivify() {
        let mut tree = Tree::new("root");
        let root = tree.root();
        assert_eq!(tree[root].attribute("missing"), None);
        assert_eq!(tree[root].attributes().count(), 0);

        tree[root].set_attribute("k", "1");
        tree[root].set_attribute("k", "2");
        assert_eq!(tree[root].attribute("k"), Some("2"));
        assert_eq!(tree[root].remove_attribute("k"), Some("2".to_string()));
        assert_eq!(tree[root].attribute("k"), None);
    }

    #[test]
    fn test_tags_are_a_set() {
        let mut tree = Tree::new("root");
        let root = tree.root();
        let node = &mut tree[root];
        node.tag("x");
        node.tag("x");
        node.tag("y");
        assert_eq!(node.count_tags(), 2);
        assert!(node.has_tag("x"));
        node.untag("x");
        node.untag("x");
        assert!(!node.has_tag("x"));
        assert_eq!(node.tags(), &["y".to_string()]);
    }

    #[test]
    fn test_find() {
        let (tree, a, b, c) = sample();
        let root = tree.root();
        assert_eq!(tree.find(root, "root"), Some(root));
        assert_eq!(tree.find(root, "root/a"), Some(a));
        assert_eq!(tree.find(root, "root/a/b"), Some(b));
        assert_eq!(tree.find(root, "root/c"), Some(c));
        assert_eq!(tree.find(root, "root/b"), None);
        assert_eq!(tree.find(root, "a/b"), None);
        assert_eq!(tree.find(a, "a/b"), Some(b));
    }

    #[test]
    fn test_find_takes_first_match_only() {
        let mut tree = Tree::new("root");
        let root = tree.root();
        let first = tree.new_node("x");
        let second = tree.new_node("x");
        let leaf = tree.new_node("leaf");
        tree.add_branch(root, first);
        tree.add_branch(root, second);
        tree.add_branch(second, leaf);
        assert_eq!(tree.find(root, "root/x"), Some(first));
        assert_eq!(tree.find(root, "root/x/leaf"), None);
    }

    #[test]
    fn test_enumerate_is_post_order() {
        let (tree, a, b, c) = sample();
        assert_eq!(tree.enumerate(tree.root()), vec![b, a, c]);
    }

    #[test]
    fn test_enumerate_supports_deleting_walk() {
        let (mut tree, _, _, _) = sample();
        let root = tree.root();
        for id in tree.enumerate(root) {
            if let Some(parent) = tree[id].parent() {
                tree.remove_branch(parent, id);
            }
        }
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_path() {
        let (tree, _, b, _) = sample();
        assert_eq!(tree.path(b), "root/a/b");
        assert_eq!(tree.find(tree.root(), &tree.path(b)), Some(b));
    }

    #[test]
    fn test_dump() {
        let (mut tree, a, b, _) = sample();
        tree[a].set_attribute("value", "1");
        tree[a].set_attribute("expected", "<digit>");
        tree[b].tag("leaf");
        tree[b].tag("x");

        insta::assert_snapshot!(tree.dump(tree.root()), @r###"
        Tree (4 nodes)
          root
            a expected='<digit>' value='1'
              b leaf x
            c
        "###);
    }
}
