//! Depth-first traversal of property trees.
//!
//! [`PreOrder`] is the only traversal order the crate needs: a parent always comes before its children, and children come in insertion order. [`Tree::traverse`], [`Tree::apply`] and the query combinators built on them all walk the tree with this iterator.
//!
//! [`PreOrder`]: struct.PreOrder.html " "
//! [`Tree::traverse`]: ../tree/struct.Tree.html#method.traverse " "
//! [`Tree::apply`]: ../tree/struct.Tree.html#method.apply " "

use core::iter::FusedIterator;
use crate::{NodeRef, Tree};

/// A pre-order depth-first iterator over the nodes of a tree.
///
/// Created by [`Tree::iter`]. The transparent root of a tree with several top-level keys is never yielded.
///
/// # Example
/// ```rust
/// # use proptree::Tree;
/// let mut tree = Tree::new();
/// tree.insert("a.b.c", 1)?;
/// tree.insert("a.e", 2)?;
/// tree.insert("a.b.d", 3)?;
///
/// let keys = tree.iter().map(|x| x.key()).collect::<Vec<_>>();
/// assert_eq!(keys, ["a", "b", "c", "d", "e"]);
/// # Ok::<(), proptree::TreeError>(())
/// ```
///
/// [`Tree::iter`]: ../tree/struct.Tree.html#method.iter " "
#[derive(Clone, Debug)]
pub struct PreOrder<'a> {
    stack: Vec<NodeRef<'a>>,
}
impl<'a> PreOrder<'a> {
    pub(crate) fn new(tree: &'a Tree) -> Self {
        match tree.root() {
            Some(root) => Self::from_node(root),
            None => Self { stack: Vec::new() },
        }
    }
    /// Creates an iterator over the subtree rooted at the specified node, starting with the node itself unless it's a transparent root.
    #[inline]
    pub fn from_node(node: NodeRef<'a>) -> Self {
        let stack = if node.is_anonymous() {
            node.children().rev().collect()
        } else {
            vec![node]
        };
        Self { stack }
    }
}
impl<'a> Iterator for PreOrder<'a> {
    type Item = NodeRef<'a>;
    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // reversed so that the first child ends up on top
        self.stack.extend(node.children().rev());
        Some(node)
    }
    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.stack.len(), None)
    }
}
impl FusedIterator for PreOrder<'_> {}
