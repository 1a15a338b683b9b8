use core::{
    fmt::{self, Formatter, Debug, Display},
    iter::FusedIterator,
    slice,
};
use std::sync::Arc;
use crate::{Result, Scalar, TreeError};
use super::{Node, NodeData, Tree};

/// A reference to a node in a property tree.
///
/// Since this type does not point to the node directly, but rather the tree the node is in and the key of the node in the arena, it can be used to walk the tree in any direction.
#[derive(Copy, Clone)]
pub struct NodeRef<'a> {
    pub(super) tree: &'a Tree,
    pub(super) key: usize,
}
impl<'a> NodeRef<'a> {
    #[inline(always)]
    pub(super) fn new(tree: &'a Tree, key: usize) -> Self {
        Self { tree, key }
    }
    /// Returns the key of the node: the single path segment it was inserted with.
    #[inline]
    pub fn key(self) -> &'a str {
        &self.node().key
    }
    /// Returns the value of the node if it's a leaf, `None` if it's an inner node.
    #[inline]
    pub fn value(self) -> Option<&'a Scalar> {
        self.shared_value().map(|x| &**x)
    }
    #[inline]
    pub(crate) fn shared_value(self) -> Option<&'a Arc<Scalar>> {
        match &self.node().data {
            NodeData::Leaf(value) => Some(value),
            NodeData::Inner(..) => None,
        }
    }
    /// Returns `true` if the node is a *leaf*, i.e. carries a value; `false` otherwise.
    #[inline]
    pub fn is_leaf(self) -> bool {
        matches!(self.node().data, NodeData::Leaf(..))
    }
    /// Returns `true` if the node is an *inner* node, i.e. one which can have children; `false` otherwise.
    #[inline]
    pub fn is_inner(self) -> bool {
        !self.is_leaf()
    }
    /// Returns `true` if the node is the transparent root of a tree with several top-level keys.
    ///
    /// Such a root has an empty key. It is never visited by traversals, is not part of any path and is not reported as anybody's parent.
    ///
    /// # Example
    /// ```rust
    /// # use proptree::Tree;
    /// let mut tree = Tree::new();
    /// tree.insert("redis[0].names", "cache1")?;
    /// tree.insert("redis[1].names", "cache2")?;
    ///
    /// let root = tree.root().unwrap();
    /// assert!(root.is_anonymous());
    /// assert_eq!(root.children().count(), 2);
    /// assert!(tree.find("redis[1]").unwrap().parent().is_none());
    /// # Ok::<(), proptree::TreeError>(())
    /// ```
    #[inline]
    pub fn is_anonymous(self) -> bool {
        self.node().is_anonymous()
    }
    /// Returns a reference to the parent node, or `None` if this is a top-level node.
    #[inline]
    pub fn parent(self) -> Option<Self> {
        let parent = Self::new(self.tree, self.node().parent?);
        if parent.is_anonymous() {
            None
        } else {
            Some(parent)
        }
    }
    /// Returns `true` if the node has a parent, `false` if it's a top-level node.
    #[inline]
    pub fn has_parent(self) -> bool {
        self.parent().is_some()
    }
    /// Returns `true` if the node is a top-level node, `false` otherwise. The transparent root also counts as one.
    #[inline]
    pub fn is_root(self) -> bool {
        !self.has_parent()
    }
    /// Returns the keys of all nodes from the top level down to this one.
    pub fn path(self) -> Vec<&'a str> {
        let mut path = Vec::new();
        let mut current = Some(self);
        while let Some(node) = current {
            if node.is_anonymous() {
                break;
            }
            path.push(node.key());
            current = node.parent();
        }
        path.reverse();
        path
    }
    /// Returns the full dotted key of the node, the same one which was used to insert it.
    #[inline]
    pub fn dotted_path(self) -> String {
        self.path().join(".")
    }
    /// Returns an iterator over references to the children of the node, in insertion order. Leaves have no children.
    #[inline]
    pub fn children(self) -> NodeChildrenIter<'a> {
        NodeChildrenIter {
            tree: self.tree,
            keys: self.node().children().iter(),
        }
    }
    /// Returns the child with the specified key, or `None` if there is none or this is a leaf.
    #[inline]
    pub fn find_child(self, key: &str) -> Option<Self> {
        self.children().find(|x| x.key() == key)
    }
    /// Returns `true` if this is an inner node with a child under the specified key, `false` otherwise.
    #[inline]
    pub fn has_child(self, key: &str) -> bool {
        self.find_child(key).is_some()
    }
    /// Returns `true` if this is an inner node with a child which [matches] the specified node, `false` otherwise.
    ///
    /// [matches]: #method.matches " "
    #[inline]
    pub fn has_child_node(self, other: NodeRef<'_>) -> bool {
        self.children().any(|x| x.matches(other))
    }
    /// Compares the node itself with another one, without looking at children: leaves match if their keys and values are equal, inner nodes match if their keys are.
    ///
    /// # Example
    /// ```rust
    /// # use proptree::Tree;
    /// let mut a = Tree::new();
    /// a.insert("x.c", 1)?;
    /// let mut b = Tree::new();
    /// b.insert("y.c", 1)?;
    /// b.insert("y.d", 2)?;
    ///
    /// assert!(a.find("x.c").unwrap().matches(b.find("y.c").unwrap()));
    /// assert!(!a.find("x.c").unwrap().matches(b.find("y.d").unwrap()));
    /// assert!(a.find("x").unwrap().has_child_node(b.find("y.c").unwrap()));
    /// # Ok::<(), proptree::TreeError>(())
    /// ```
    pub fn matches(self, other: NodeRef<'_>) -> bool {
        self.key() == other.key() && self.value() == other.value()
    }
    /// Compares the whole subtrees rooted at the two nodes: keys, values and the order of children.
    pub fn deep_eq(self, other: NodeRef<'_>) -> bool {
        let mut stack = vec![(self, other)];
        while let Some((a, b)) = stack.pop() {
            if !a.matches(b) || a.children().len() != b.children().len() {
                return false;
            }
            stack.extend(a.children().zip(b.children()));
        }
        true
    }
    /// Copies the subtree rooted at this node into a new tree of its own, in which this node becomes the root.
    ///
    /// The scalars are shared between both trees.
    pub fn to_tree(self) -> Tree {
        let mut tree = Tree::new();
        tree.graft(self, None);
        tree
    }

    #[inline(always)]
    fn node(self) -> &'a Node {
        self.tree.node(self.key)
    }
}
impl Display for NodeRef<'_> {
    /// Renders leaves as `(key=value)`, inner nodes as `(key,[child, child])` and the transparent root as `[child, child]`.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut stack = vec![DisplayStep::Open(*self)];
        while let Some(step) = stack.pop() {
            match step {
                DisplayStep::Open(node) => {
                    if let Some(value) = node.value() {
                        write!(f, "({}={})", node.key(), value)?;
                        continue;
                    }
                    let named = !node.is_anonymous();
                    if named {
                        write!(f, "({},", node.key())?;
                    }
                    f.write_str("[")?;
                    stack.push(DisplayStep::Close { named });
                    for (i, child) in node.children().enumerate().rev() {
                        stack.push(DisplayStep::Open(child));
                        if i != 0 {
                            stack.push(DisplayStep::Separator);
                        }
                    }
                }
                DisplayStep::Separator => f.write_str(", ")?,
                DisplayStep::Close { named } => {
                    f.write_str("]")?;
                    if named {
                        f.write_str(")")?;
                    }
                }
            }
        }
        Ok(())
    }
}
enum DisplayStep<'a> {
    Open(NodeRef<'a>),
    Separator,
    Close { named: bool },
}
impl Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("NodeRef");
        s.field("key", &self.key());
        match self.value() {
            Some(value) => s.field("value", value),
            None => s.field("children", &ChildrenDebug(*self)),
        };
        s.finish()
    }
}
struct ChildrenDebug<'a>(NodeRef<'a>);
impl Debug for ChildrenDebug<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.children()).finish()
    }
}

/// A *mutable* reference to a node in a property tree.
///
/// Holds the whole tree mutably borrowed, so no [`NodeRef`] can exist at the same time.
///
/// [`NodeRef`]: struct.NodeRef.html " "
#[derive(Debug)]
pub struct NodeRefMut<'a> {
    tree: &'a mut Tree,
    key: usize,
}
impl<'a> NodeRefMut<'a> {
    #[inline(always)]
    pub(super) fn new(tree: &'a mut Tree, key: usize) -> Self {
        Self { tree, key }
    }
    /// Returns an immutable reference to the same node, for the duration of the borrow.
    #[inline]
    pub fn as_ref(&self) -> NodeRef<'_> {
        NodeRef::new(self.tree, self.key)
    }
    /// Returns the key of the node.
    #[inline]
    pub fn key(&self) -> &str {
        &self.tree.node(self.key).key
    }
    /// Returns a *mutable* reference to the child with the specified key, or `None` if there is none or this is a leaf.
    pub fn find_child_mut(&mut self, key: &str) -> Option<NodeRefMut<'_>> {
        let child = self.as_ref().find_child(key)?.key;
        Some(NodeRefMut::new(self.tree, child))
    }
    /// Adds a copy of the specified subtree, which can come from any tree, as a child of this node. A child with the same key is replaced in place, along with everything beneath it.
    ///
    /// Adding the transparent root of another tree adds each of its children instead.
    ///
    /// # Errors
    /// Fails with [`TreeError::NotInner`] if this node is a leaf.
    ///
    /// # Example
    /// ```rust
    /// # use proptree::Tree;
    /// let mut tree = Tree::new();
    /// tree.insert("caches.redis.names", "old")?;
    /// let mut other = Tree::new();
    /// other.insert("redis.names", "new")?;
    ///
    /// tree.root_mut().unwrap().add_child(other.root().unwrap())?;
    /// assert_eq!(tree.value("caches.redis.names").unwrap(), "new");
    /// assert_eq!(tree.root().unwrap().children().count(), 1);
    /// # Ok::<(), proptree::TreeError>(())
    /// ```
    ///
    /// [`TreeError::NotInner`]: ../enum.TreeError.html#variant.NotInner " "
    pub fn add_child(&mut self, child: NodeRef<'_>) -> Result<&mut Self> {
        if self.as_ref().is_leaf() {
            return Err(TreeError::NotInner {
                key: self.key().to_owned(),
            });
        }
        if child.is_anonymous() {
            for grandchild in child.children() {
                self.tree.graft(grandchild, Some(self.key));
            }
        } else {
            self.tree.graft(child, Some(self.key));
        }
        Ok(self)
    }
}
impl<'a> From<NodeRefMut<'a>> for NodeRef<'a> {
    #[inline(always)]
    fn from(op: NodeRefMut<'a>) -> Self {
        NodeRef::new(op.tree, op.key)
    }
}

/// An iterator over references to the children of a property tree node.
#[derive(Clone, Debug)]
pub struct NodeChildrenIter<'a> {
    tree: &'a Tree,
    keys: slice::Iter<'a, usize>,
}
impl<'a> Iterator for NodeChildrenIter<'a> {
    type Item = NodeRef<'a>;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        self.keys.next().map(|key| NodeRef::new(tree, *key))
    }
    #[inline(always)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}
impl DoubleEndedIterator for NodeChildrenIter<'_> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        self.keys.next_back().map(|key| NodeRef::new(tree, *key))
    }
}
impl ExactSizeIterator for NodeChildrenIter<'_> {}
impl FusedIterator for NodeChildrenIter<'_> {}
