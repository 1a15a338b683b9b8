//! Property trees, built from flat dot-separated keys and navigated segment by segment.
//!
//! Every key such as `caffeine[0].config.spec` is split on `.`, and each segment becomes one level of the tree. Nodes which have children are *inner* nodes, nodes which carry a value are *leaves*. Nodes are stored in an arena (a sparse `Vec` from `granite`), and all links between them, children and parents alike, are indices into that arena, so no reference cycles exist between parents and their children.
//!
//! # Example
//! ```rust
//! use proptree::Tree;
//!
//! let mut tree = Tree::new();
//! tree.insert("caches.caffeine[0].names", "books, authors")?;
//! tree.insert("caches.caffeine[0].config.spec", "maximumSize=500")?;
//!
//! // Lookups match every segment exactly:
//! let spec = tree.find("caches.caffeine[0].config.spec").unwrap();
//! assert!(spec.is_leaf());
//! assert_eq!(spec.value().unwrap(), "maximumSize=500");
//! // Any node can reconstruct the key it was inserted with:
//! assert_eq!(spec.dotted_path(), "caches.caffeine[0].config.spec");
//!
//! // Inner nodes carry no value:
//! assert!(tree.find("caches.caffeine[0]").unwrap().value().is_none());
//! assert!(tree.find("caches.redis[0]").is_none());
//! # Ok::<(), proptree::TreeError>(())
//! ```
//!
//! # Build, then query
//! Insertion needs exclusive access to the tree, and every node reference borrows it, so the borrow checker keeps the two phases apart:
//! ```rust,compile_fail
//! use proptree::Tree;
//!
//! let mut tree = Tree::new();
//! tree.insert("a.b", 1).unwrap();
//! let node = tree.find("a.b").unwrap();
//! tree.insert("a.c", 2).unwrap(); // cannot insert while `node` is alive
//! assert!(node.is_leaf());
//! ```
//! Once built, a tree is `Send + Sync` and can be read from any number of threads through shared references.

use core::fmt::{self, Formatter, Debug, Display};
use std::sync::Arc;
use granite::{SparseVec, Storage};
use log::{debug, warn};
use crate::{traversal::PreOrder, Result, Scalar, TreeError};

mod node;
mod node_ref;
#[cfg(feature = "serde")]
mod serde_impl;

use node::{Node, NodeData};
pub use node_ref::{NodeRef, NodeRefMut, NodeChildrenIter};

/// A tree of configuration properties.
///
/// See the [module-level documentation] for more.
///
/// [module-level documentation]: index.html " "
pub struct Tree {
    storage: SparseVec<Node>,
    root: Option<usize>,
}
impl Tree {
    /// Creates an empty tree, one without a root node.
    ///
    /// # Example
    /// ```rust
    /// # use proptree::Tree;
    /// let tree = Tree::new();
    /// assert!(tree.is_empty());
    /// assert!(tree.root().is_none());
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self {
            storage: Storage::new(),
            root: None,
        }
    }
    /// Creates a tree whose root is an inner node with the specified key and no children.
    ///
    /// # Errors
    /// Fails if the key is not a valid path segment: it must be non-empty and must not contain `.`.
    pub fn with_root(key: &str) -> Result<Self> {
        let segments = split_path(key)?;
        if segments.len() != 1 {
            return Err(TreeError::invalid_argument(key, "a root key must be a single segment"));
        }
        let mut tree = Self::new();
        tree.root = Some(tree.storage.add(Node::inner(key, None)));
        Ok(tree)
    }
    /// Creates a tree with a transparent root, ready to receive several top-level nodes.
    #[inline]
    pub(crate) fn anonymous() -> Self {
        let mut tree = Self::new();
        tree.root = Some(tree.storage.add(Node::anonymous()));
        tree
    }
    /// Builds a tree out of flat key/value pairs, inserting them in iteration order.
    ///
    /// # Errors
    /// Fails on the first key which [`insert`] would reject.
    ///
    /// # Example
    /// ```rust
    /// # use proptree::Tree;
    /// let tree = Tree::from_entries(vec![
    ///     ("redis[0].names", "cache1"),
    ///     ("redis[1].names", "cache2"),
    /// ])?;
    /// assert_eq!(tree.value("redis[1].names").unwrap(), "cache2");
    /// # Ok::<(), proptree::TreeError>(())
    /// ```
    ///
    /// [`insert`]: #method.insert " "
    pub fn from_entries<I, K, V>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Scalar>,
    {
        let mut tree = Self::new();
        for (key, value) in entries {
            tree.insert(key.as_ref(), value)?;
        }
        Ok(tree)
    }

    /// Inserts a value at the specified dot-separated path, creating missing nodes along the way, and returns the root of the tree.
    ///
    /// - Inserting at a path which already holds a value overwrites that value.
    /// - Inserting below an existing leaf *promotes* the leaf into an inner node. The value it held is discarded.
    /// - Inserting at a path which ends at an existing inner node keeps the inner node and discards the new value, so the shape of the tree does not depend on the order of insertions.
    /// - If the first segment differs from the key of the current root, the tree gets a transparent root above both of them (see [`NodeRef::is_anonymous`]).
    ///
    /// # Errors
    /// Fails with [`TreeError::InvalidArgument`] if the path is empty or has an empty segment (`a..b`, `.a`, `a.`). The tree is left untouched in that case.
    ///
    /// # Example
    /// ```rust
    /// # use proptree::Tree;
    /// let mut tree = Tree::new();
    /// tree.insert("a.b", "leaf")?;
    /// tree.insert("a.b.c", 1)?;
    /// // `a.b` was promoted and lost its value:
    /// let b = tree.find("a.b").unwrap();
    /// assert!(!b.is_leaf());
    /// assert_eq!(b.children().count(), 1);
    ///
    /// assert!(tree.insert("a..c", 2).is_err());
    /// # Ok::<(), proptree::TreeError>(())
    /// ```
    ///
    /// [`NodeRef::is_anonymous`]: struct.NodeRef.html#method.is_anonymous " "
    /// [`TreeError::InvalidArgument`]: ../enum.TreeError.html#variant.InvalidArgument " "
    pub fn insert(&mut self, path: &str, value: impl Into<Scalar>) -> Result<NodeRef<'_>> {
        let segments = split_path(path)?;
        let value = Arc::new(value.into());
        let last = segments.len() - 1;
        let mut current = None;
        for (i, segment) in segments.iter().enumerate() {
            let payload = if i == last { Some(&value) } else { None };
            current = Some(self.descend(current, segment, payload));
        }
        match self.root() {
            Some(root) => Ok(root),
            None => unreachable!("a successful insertion always leaves a root behind"),
        }
    }
    /// Moves one level down from `parent` (or to the top level if `None`), creating, promoting or updating the node named by `segment`. `value` is `Some` only for the last segment of a path.
    fn descend(&mut self, parent: Option<usize>, segment: &str, value: Option<&Arc<Scalar>>) -> usize {
        let parent = match parent {
            Some(parent) => Some(parent),
            None => self.top_level_parent(segment),
        };
        let existing = match parent {
            Some(parent) => self.child_by_key(parent, segment),
            None => self.root,
        };
        if let Some(key) = existing {
            let node = self.node_mut(key);
            match value {
                Some(value) => match &mut node.data {
                    NodeData::Leaf(old) => *old = Arc::clone(value),
                    NodeData::Inner(..) => warn!(
                        "discarding value {} for {:?}: the node has children",
                        value,
                        node.key,
                    ),
                },
                None => {
                    if let NodeData::Leaf(old) = &node.data {
                        debug!("promoting leaf {:?} to an inner node, dropping value {}", node.key, old);
                        node.data = NodeData::Inner(Vec::new());
                    }
                }
            }
            return key;
        }
        let node = match value {
            Some(value) => Node::leaf(segment, Arc::clone(value), parent),
            None => Node::inner(segment, parent),
        };
        let key = self.storage.add(node);
        match parent {
            Some(parent) => self.attach(parent, key),
            None => self.root = Some(key),
        }
        key
    }
    /// Returns the node under which a top-level segment lives, widening a named root into a transparent one if the segment does not match it. `None` means the segment addresses the root slot itself.
    fn top_level_parent(&mut self, segment: &str) -> Option<usize> {
        let root = self.root?;
        let node = self.node(root);
        if node.is_anonymous() {
            return Some(root);
        }
        if node.key == segment {
            return None;
        }
        debug!(
            "top-level key {:?} differs from root {:?}, placing both under a transparent root",
            segment,
            node.key,
        );
        let anonymous = self.storage.add(Node::anonymous());
        self.root = Some(anonymous);
        self.attach(anonymous, root);
        Some(anonymous)
    }

    /// Returns a reference to the root node, or `None` if the tree is empty.
    #[inline]
    pub fn root(&self) -> Option<NodeRef<'_>> {
        self.root.map(|key| NodeRef::new(self, key))
    }
    /// Returns a *mutable* reference to the root node, or `None` if the tree is empty.
    #[inline]
    pub fn root_mut(&mut self) -> Option<NodeRefMut<'_>> {
        let key = self.root?;
        Some(NodeRefMut::new(self, key))
    }
    /// Returns `true` if the tree holds no nodes at all, `false` otherwise.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root()
            .map_or(true, |root| root.is_anonymous() && root.children().len() == 0)
    }
    /// Returns the number of nodes in the tree, not counting a transparent root.
    #[inline]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Finds the node at the specified dot-separated path, starting with the key of the root.
    ///
    /// Every segment has to match the key of a node exactly; there is no prefix matching. Returns `None` as soon as a segment has no matching node.
    ///
    /// # Example
    /// ```rust
    /// # use proptree::Tree;
    /// let mut tree = Tree::new();
    /// tree.insert("a.b.g.d", 2)?;
    /// assert!(tree.find("a.b.g.d").is_some());
    /// assert!(tree.find("a.b.g").is_some());
    /// assert!(tree.find("a.b.g.d.e").is_none());
    /// assert!(tree.find("b.g.d").is_none());
    /// # Ok::<(), proptree::TreeError>(())
    /// ```
    pub fn find(&self, path: &str) -> Option<NodeRef<'_>> {
        self.find_segments(path.split('.'))
    }
    /// Finds the node at the path formed by the specified segments, starting with the key of the root.
    pub fn find_segments<'s, I>(&self, segments: I) -> Option<NodeRef<'_>>
    where
        I: IntoIterator<Item = &'s str>,
    {
        let mut segments = segments.into_iter();
        let first = segments.next()?;
        let root = self.root()?;
        let top = if root.is_anonymous() {
            root.find_child(first)?
        } else if root.key() == first {
            root
        } else {
            return None;
        };
        segments.try_fold(top, |node, segment| node.find_child(segment))
    }
    /// Finds a node by a path relative to the root, i.e. one which does not repeat the root's key. A leading `.` is allowed.
    ///
    /// An empty path resolves to the root itself. For trees with a transparent root, this is the same as [`find`].
    ///
    /// # Example
    /// ```rust
    /// # use proptree::Tree;
    /// let mut tree = Tree::new();
    /// tree.insert("redis.config.spec", "maximumSize=10")?;
    /// assert_eq!(tree.find_relative(".config.spec").unwrap().key(), "spec");
    /// assert_eq!(tree.find_relative("config").unwrap().key(), "config");
    /// assert_eq!(tree.find_relative("").unwrap().key(), "redis");
    /// # Ok::<(), proptree::TreeError>(())
    /// ```
    ///
    /// [`find`]: #method.find " "
    pub fn find_relative(&self, path: &str) -> Option<NodeRef<'_>> {
        let root = self.root()?;
        let path = path.strip_prefix('.').unwrap_or(path);
        if path.is_empty() {
            return Some(root);
        }
        if root.is_anonymous() {
            return self.find(path);
        }
        path.split('.')
            .try_fold(root, |node, segment| node.find_child(segment))
    }
    /// Returns a *mutable* reference to the node at the specified path, as matched by [`find`].
    ///
    /// [`find`]: #method.find " "
    pub fn find_mut(&mut self, path: &str) -> Option<NodeRefMut<'_>> {
        let key = self.find(path)?.key;
        Some(NodeRefMut::new(self, key))
    }
    /// Returns the value of the leaf at the specified path, or `None` if there is no such node or it's an inner node.
    #[inline]
    pub fn value(&self, path: &str) -> Option<&Scalar> {
        self.find(path).and_then(NodeRef::value)
    }
    /// Returns the value of the leaf at the specified path relative to the root, as matched by [`find_relative`].
    ///
    /// [`find_relative`]: #method.find_relative " "
    #[inline]
    pub fn relative_value(&self, path: &str) -> Option<&Scalar> {
        self.find_relative(path).and_then(NodeRef::value)
    }

    /// Returns an iterator over all nodes in pre-order: every node comes before its children, children come in insertion order. A transparent root is skipped.
    #[inline]
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder::new(self)
    }
    /// Visits every node in pre-order, as produced by [`iter`].
    ///
    /// [`iter`]: #method.iter " "
    #[inline]
    pub fn traverse<'t, F>(&'t self, visitor: F)
    where
        F: FnMut(NodeRef<'t>),
    {
        self.iter().for_each(visitor)
    }
    /// Runs the handler on every node in pre-order, giving it mutable access to the context, and returns the context afterwards.
    ///
    /// The tree makes no assumptions about the context: counters, lists and maps are all fine.
    ///
    /// # Example
    /// ```rust
    /// # use proptree::{Tree, NodeRef};
    /// # use std::collections::BTreeMap;
    /// let mut tree = Tree::new();
    /// tree.insert("a.b.c", "1")?;
    /// tree.insert("a.b.d", "2")?;
    /// tree.insert("a.b.a", "3")?;
    ///
    /// let count = tree.apply(|_, count: &mut usize| *count += 1, 0);
    /// assert_eq!(count, 5);
    ///
    /// let properties = tree.apply(
    ///     |node: NodeRef<'_>, map: &mut BTreeMap<String, String>| {
    ///         if let Some(value) = node.value() {
    ///             map.insert(node.dotted_path(), value.to_string());
    ///         }
    ///     },
    ///     BTreeMap::new(),
    /// );
    /// assert_eq!(properties["a.b.d"], "2");
    /// # Ok::<(), proptree::TreeError>(())
    /// ```
    pub fn apply<'t, C, H>(&'t self, mut handler: H, mut context: C) -> C
    where
        H: FnMut(NodeRef<'t>, &mut C),
    {
        for node in self.iter() {
            handler(node, &mut context);
        }
        context
    }
    /// Returns every leaf as a pair of its full dotted key and its value, in pre-order.
    ///
    /// Feeding those pairs into [`from_entries`] rebuilds an equal tree, as long as every inner node has at least one leaf beneath it. Inner nodes without leaves, such as the root of a fresh [`with_root`] tree, have no entry and are lost.
    ///
    /// [`from_entries`]: #method.from_entries " "
    /// [`with_root`]: #method.with_root " "
    pub fn entries(&self) -> impl Iterator<Item = (String, &Scalar)> + '_ {
        self.iter()
            .filter_map(|node| node.value().map(|value| (node.dotted_path(), value)))
    }

    //────────────────────────────────────────────────────────────┐
    // Arena plumbing, shared with the node references           │
    //────────────────────────────────────────────────────────────┘
    #[track_caller]
    pub(crate) fn node(&self, key: usize) -> &Node {
        self.storage
            .get(&key)
            .unwrap_or_else(|| panic!("invalid node key: {}", key))
    }
    #[track_caller]
    fn node_mut(&mut self, key: usize) -> &mut Node {
        self.storage
            .get_mut(&key)
            .unwrap_or_else(|| panic!("invalid node key: {}", key))
    }
    /// The nodes at the top level, looking through a transparent root.
    fn top_level(&self) -> Vec<NodeRef<'_>> {
        match self.root() {
            Some(root) if root.is_anonymous() => root.children().collect(),
            Some(root) => vec![root],
            None => Vec::new(),
        }
    }
    pub(crate) fn root_key(&self) -> Option<usize> {
        self.root
    }
    fn child_by_key(&self, parent: usize, key: &str) -> Option<usize> {
        self.node(parent)
            .children()
            .iter()
            .copied()
            .find(|child| self.node(*child).key == key)
    }
    /// Makes `child` a child of `parent`. A sibling with the same key is replaced in place, along with everything beneath it.
    fn attach(&mut self, parent: usize, child: usize) {
        let replaced = {
            let child_key = &self.node(child).key;
            self.node(parent)
                .children()
                .iter()
                .position(|x| self.node(*x).key == *child_key)
        };
        let old = match &mut self.node_mut(parent).data {
            NodeData::Inner(children) => match replaced {
                Some(position) => Some(core::mem::replace(&mut children[position], child)),
                None => {
                    children.push(child);
                    None
                }
            },
            NodeData::Leaf(..) => unreachable!("only inner nodes can have children attached"),
        };
        self.node_mut(child).parent = Some(parent);
        if let Some(old) = old {
            debug!("replacing existing child {:?}", self.node(child).key);
            self.remove_subtree(old);
        }
    }
    fn remove_subtree(&mut self, key: usize) {
        let mut stack = vec![key];
        while let Some(key) = stack.pop() {
            let node = self.storage.remove(&key);
            stack.extend_from_slice(node.children());
        }
    }
    /// Copies the subtree at `source` (which may belong to any tree) under `parent`, or into the root slot if `parent` is `None`. Scalars are shared, not cloned.
    pub(crate) fn graft(&mut self, source: NodeRef<'_>, parent: Option<usize>) -> usize {
        let top = self.storage.add(Node::copy_of(source, None));
        match parent {
            Some(parent) => self.attach(parent, top),
            None => {
                if let Some(old) = self.root.replace(top) {
                    self.remove_subtree(old);
                }
            }
        }
        let mut stack = vec![(source, top)];
        while let Some((source, copy)) = stack.pop() {
            for child in source.children() {
                let key = self.storage.add(Node::copy_of(child, Some(copy)));
                // Source siblings have distinct keys, nothing to replace.
                if let NodeData::Inner(children) = &mut self.node_mut(copy).data {
                    children.push(key);
                }
                stack.push((child, key));
            }
        }
        top
    }
    pub(crate) fn set_root_key(&mut self, new_key: &str) {
        if let Some(root) = self.root {
            self.node_mut(root).key = new_key.to_owned();
        }
    }
}
impl Default for Tree {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}
impl Clone for Tree {
    fn clone(&self) -> Self {
        let mut tree = Self::new();
        if let Some(root) = self.root() {
            tree.graft(root, None);
        }
        tree
    }
}
impl PartialEq for Tree {
    /// Compares two trees by shape: keys, values and the order of children all have to match.
    ///
    /// Only the visible nodes take part, so a transparent root holding a single node equals a tree rooted at that node, and an empty transparent root equals an empty tree.
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = (self.top_level(), other.top_level());
        a.len() == b.len() && a.into_iter().zip(b).all(|(a, b)| a.deep_eq(b))
    }
}
impl Debug for Tree {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("root", &self.root())
            .finish()
    }
}
impl Display for Tree {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.root() {
            Some(root) if !self.is_empty() => Display::fmt(&root, f),
            _ => f.write_str("()"),
        }
    }
}
impl<'a> IntoIterator for &'a Tree {
    type Item = NodeRef<'a>;
    type IntoIter = PreOrder<'a>;
    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Splits a dotted path into its segments, rejecting empty paths and empty segments.
fn split_path(path: &str) -> Result<Vec<&str>> {
    if path.is_empty() {
        return Err(TreeError::invalid_argument(path, "the path is empty"));
    }
    let segments = path.split('.').collect::<Vec<_>>();
    if segments.iter().any(|x| x.is_empty()) {
        return Err(TreeError::invalid_argument(path, "the path has an empty segment"));
    }
    Ok(segments)
}

#[cfg(test)]
mod tests;
