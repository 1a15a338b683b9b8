//! Predicates over nodes and the collection strategies built on them.
//!
//! A [`Predicate`] decides whether a node is interesting. The constructor functions in this module ([`has_key`], [`is_array_node`], [`has_leaf`] and friends) cover the usual questions asked about configuration trees, and any closure taking a [`NodeRef`] works as well. Predicates are combined with [`Predicate::and`], [`Predicate::or`] and [`Predicate::not`].
//!
//! The collection strategies walk a tree in pre-order and gather the matches, either as node references ([`collect_if`], to be used with [`Tree::apply`]) or as independent trees ([`subtree`], [`subtrees`]).
//!
//! # Example
//! ```rust
//! use proptree::{Tree, query::{self, Predicate}};
//!
//! let mut tree = Tree::new();
//! tree.insert("a.b.c", "1")?;
//! tree.insert("a.b.d", "2")?;
//! tree.insert("a.e.d", "3")?;
//!
//! let trees = query::subtrees(&tree, query::has_key("d"));
//! assert_eq!(trees.len(), 2);
//! assert_eq!(trees[0].to_string(), "(d=2)");
//! assert_eq!(trees[1].to_string(), "(d=3)");
//!
//! let inner = tree.apply(query::collect_if(query::is_leaf().not()), Vec::new());
//! assert_eq!(inner.len(), 3);
//! # Ok::<(), proptree::TreeError>(())
//! ```
//!
//! [`Predicate`]: trait.Predicate.html " "
//! [`Predicate::and`]: trait.Predicate.html#method.and " "
//! [`Predicate::or`]: trait.Predicate.html#method.or " "
//! [`Predicate::not`]: trait.Predicate.html#method.not " "
//! [`has_key`]: fn.has_key.html " "
//! [`is_array_node`]: fn.is_array_node.html " "
//! [`has_leaf`]: fn.has_leaf.html " "
//! [`collect_if`]: fn.collect_if.html " "
//! [`subtree`]: fn.subtree.html " "
//! [`subtrees`]: fn.subtrees.html " "
//! [`NodeRef`]: ../tree/struct.NodeRef.html " "
//! [`Tree::apply`]: ../tree/struct.Tree.html#method.apply " "

use crate::{NodeRef, Scalar, Tree};

/// A condition on a single node.
///
/// Implemented for every `Fn(NodeRef<'_>) -> bool`. Closures passed where a predicate is expected need their parameter type spelled out, since it cannot be inferred through the blanket implementation:
/// ```rust
/// # use proptree::{Tree, NodeRef, query};
/// # let mut tree = Tree::new();
/// # tree.insert("a.b", 1)?;
/// let deep = query::subtree(&tree, |node: NodeRef<'_>| node.path().len() > 1);
/// assert_eq!(deep.to_string(), "(b=1)");
/// # Ok::<(), proptree::TreeError>(())
/// ```
pub trait Predicate {
    /// Returns `true` if the node satisfies the condition.
    fn test(&self, node: NodeRef<'_>) -> bool;

    /// Combines two predicates into one which holds if both of them do. The second one is not tested if the first one fails.
    #[inline(always)]
    fn and<P>(self, other: P) -> And<Self, P>
    where
        Self: Sized,
        P: Predicate,
    {
        And(self, other)
    }
    /// Combines two predicates into one which holds if either of them does. The second one is not tested if the first one holds.
    #[inline(always)]
    fn or<P>(self, other: P) -> Or<Self, P>
    where
        Self: Sized,
        P: Predicate,
    {
        Or(self, other)
    }
    /// Inverts the predicate.
    #[inline(always)]
    fn not(self) -> Not<Self>
    where
        Self: Sized,
    {
        Not(self)
    }
}
impl<F> Predicate for F
where
    F: Fn(NodeRef<'_>) -> bool,
{
    #[inline(always)]
    fn test(&self, node: NodeRef<'_>) -> bool {
        self(node)
    }
}

/// Matches nodes whose key is exactly the specified one. Created by [`has_key`].
///
/// [`has_key`]: fn.has_key.html " "
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HasKey(String);
impl Predicate for HasKey {
    #[inline]
    fn test(&self, node: NodeRef<'_>) -> bool {
        node.key() == self.0
    }
}
/// Matches nodes whose key is exactly the specified one.
#[inline]
pub fn has_key(key: impl Into<String>) -> HasKey {
    HasKey(key.into())
}

/// Matches nodes whose key starts with the specified prefix. Created by [`key_starts_with`].
///
/// [`key_starts_with`]: fn.key_starts_with.html " "
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyStartsWith(String);
impl Predicate for KeyStartsWith {
    #[inline]
    fn test(&self, node: NodeRef<'_>) -> bool {
        node.key().starts_with(self.0.as_str())
    }
}
/// Matches nodes whose key starts with the specified prefix.
#[inline]
pub fn key_starts_with(prefix: impl Into<String>) -> KeyStartsWith {
    KeyStartsWith(prefix.into())
}

/// Matches leaves. Created by [`is_leaf`].
///
/// [`is_leaf`]: fn.is_leaf.html " "
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct IsLeaf;
impl Predicate for IsLeaf {
    #[inline(always)]
    fn test(&self, node: NodeRef<'_>) -> bool {
        node.is_leaf()
    }
}
/// Matches leaves.
#[inline(always)]
pub fn is_leaf() -> IsLeaf {
    IsLeaf
}

/// Matches nodes whose keys are array elements. Created by [`is_array_node`].
///
/// [`is_array_node`]: fn.is_array_node.html " "
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct IsArrayNode;
impl Predicate for IsArrayNode {
    #[inline]
    fn test(&self, node: NodeRef<'_>) -> bool {
        is_array_key(node.key())
    }
}
/// Matches nodes whose keys are array elements: a name without whitespace followed by an index in square brackets, like `caffeine[0]`. The index may be empty, but only consist of ASCII digits otherwise.
///
/// # Example
/// ```rust
/// # use proptree::{Tree, query::{self, Predicate}};
/// let mut tree = Tree::new();
/// tree.insert("caches.redis[0].names", "cache1")?;
/// tree.insert("caches.redis[12].names", "cache2")?;
/// tree.insert("caches.redis0].names", "cache3")?;
///
/// let matches = tree.apply(query::collect_if(query::is_array_node()), Vec::new());
/// let keys = matches.iter().map(|x| x.key()).collect::<Vec<_>>();
/// assert_eq!(keys, ["redis[0]", "redis[12]"]);
/// # Ok::<(), proptree::TreeError>(())
/// ```
#[inline(always)]
pub fn is_array_node() -> IsArrayNode {
    IsArrayNode
}
fn is_array_key(key: &str) -> bool {
    let inner = match key.strip_suffix(']') {
        Some(x) => x,
        None => return false,
    };
    // The index holds no brackets, so it starts after the last opening one.
    let (name, index) = match inner.rfind('[') {
        Some(i) => (&inner[..i], &inner[i + 1..]),
        None => return false,
    };
    !name.is_empty()
        && !name.bytes().any(is_pattern_whitespace)
        && index.bytes().all(|x| x.is_ascii_digit())
}

/// The whitespace class of `[^\s]`: ASCII only, vertical tab included.
#[inline]
fn is_pattern_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\x0B' | b'\x0C' | b'\r')
}

/// Matches inner nodes with a child under the specified key. Created by [`has_child`].
///
/// [`has_child`]: fn.has_child.html " "
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HasChild(String);
impl Predicate for HasChild {
    #[inline]
    fn test(&self, node: NodeRef<'_>) -> bool {
        node.has_child(&self.0)
    }
}
/// Matches inner nodes with a child under the specified key. Leaves never match.
#[inline]
pub fn has_child(key: impl Into<String>) -> HasChild {
    HasChild(key.into())
}

/// Matches inner nodes with a child which matches the specified node without looking at its children. Created by [`has_child_node`].
///
/// [`has_child_node`]: fn.has_child_node.html " "
#[derive(Copy, Clone, Debug)]
pub struct HasChildNode<'a>(NodeRef<'a>);
impl Predicate for HasChildNode<'_> {
    #[inline]
    fn test(&self, node: NodeRef<'_>) -> bool {
        node.has_child_node(self.0)
    }
}
/// Matches inner nodes with a child which [matches] the specified node, which can belong to any tree. Leaves never match.
///
/// [matches]: ../tree/struct.NodeRef.html#method.matches " "
#[inline(always)]
pub fn has_child_node(node: NodeRef<'_>) -> HasChildNode<'_> {
    HasChildNode(node)
}

/// Matches inner nodes with a leaf child of the specified key and value. Created by [`has_leaf`].
///
/// [`has_leaf`]: fn.has_leaf.html " "
#[derive(Clone, Debug, PartialEq)]
pub struct HasLeaf {
    key: String,
    value: Scalar,
}
impl Predicate for HasLeaf {
    fn test(&self, node: NodeRef<'_>) -> bool {
        node.find_child(&self.key)
            .and_then(NodeRef::value)
            .map_or(false, |x| *x == self.value)
    }
}
/// Matches inner nodes with a leaf child of the specified key and value.
///
/// # Example
/// ```rust
/// # use proptree::{Tree, query};
/// let mut tree = Tree::new();
/// tree.insert("a.b.c", "1")?;
/// tree.insert("a.b.g.d", "2")?;
/// tree.insert("a.e.d", "3")?;
///
/// let b = query::subtree(&tree, query::has_leaf("c", "1"));
/// assert_eq!(query::value_of(&b, "b.g.d").unwrap(), "2");
/// # Ok::<(), proptree::TreeError>(())
/// ```
#[inline]
pub fn has_leaf(key: impl Into<String>, value: impl Into<Scalar>) -> HasLeaf {
    HasLeaf {
        key: key.into(),
        value: value.into(),
    }
}

/// Matches nodes which match the specified node without looking at children. Created by [`equals`].
///
/// [`equals`]: fn.equals.html " "
#[derive(Copy, Clone, Debug)]
pub struct Equals<'a>(NodeRef<'a>);
impl Predicate for Equals<'_> {
    #[inline]
    fn test(&self, node: NodeRef<'_>) -> bool {
        node.matches(self.0)
    }
}
/// Matches nodes which [match] the specified node, which can belong to any tree.
///
/// [match]: ../tree/struct.NodeRef.html#method.matches " "
#[inline(always)]
pub fn equals(node: NodeRef<'_>) -> Equals<'_> {
    Equals(node)
}

/// Both predicates hold. Created by [`Predicate::and`].
///
/// [`Predicate::and`]: trait.Predicate.html#method.and " "
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct And<A, B>(pub A, pub B);
impl<A: Predicate, B: Predicate> Predicate for And<A, B> {
    #[inline]
    fn test(&self, node: NodeRef<'_>) -> bool {
        self.0.test(node) && self.1.test(node)
    }
}
/// Either predicate holds. Created by [`Predicate::or`].
///
/// [`Predicate::or`]: trait.Predicate.html#method.or " "
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Or<A, B>(pub A, pub B);
impl<A: Predicate, B: Predicate> Predicate for Or<A, B> {
    #[inline]
    fn test(&self, node: NodeRef<'_>) -> bool {
        self.0.test(node) || self.1.test(node)
    }
}
/// The predicate does not hold. Created by [`Predicate::not`].
///
/// [`Predicate::not`]: trait.Predicate.html#method.not " "
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Not<P>(pub P);
impl<P: Predicate> Predicate for Not<P> {
    #[inline]
    fn test(&self, node: NodeRef<'_>) -> bool {
        !self.0.test(node)
    }
}

/// Returns a handler for [`Tree::apply`] which appends every node satisfying the predicate to a `Vec`.
///
/// [`Tree::apply`]: ../tree/struct.Tree.html#method.apply " "
pub fn collect_if<'t, P>(predicate: P) -> impl FnMut(NodeRef<'t>, &mut Vec<NodeRef<'t>>)
where
    P: Predicate,
{
    move |node, matches| {
        if predicate.test(node) {
            matches.push(node);
        }
    }
}
/// Returns a handler for [`Tree::apply`] which appends every node to a `Vec`.
///
/// [`Tree::apply`]: ../tree/struct.Tree.html#method.apply " "
pub fn collect<'t>() -> impl FnMut(NodeRef<'t>, &mut Vec<NodeRef<'t>>) {
    |node, nodes| nodes.push(node)
}

/// Copies out the subtree rooted at the first node, in pre-order, which satisfies the predicate. Returns an empty tree if nothing does.
///
/// The walk stops at the first match.
#[inline]
pub fn subtree<P: Predicate>(tree: &Tree, predicate: P) -> Tree {
    find_by(tree, predicate).unwrap_or_default()
}
/// Copies out the subtree rooted at the first node, in pre-order, which satisfies the predicate, or returns `None` if nothing does.
pub fn find_by<P: Predicate>(tree: &Tree, predicate: P) -> Option<Tree> {
    tree.iter()
        .find(|x| predicate.test(*x))
        .map(NodeRef::to_tree)
}
/// Copies out the subtrees rooted at every node which satisfies the predicate, in pre-order.
///
/// Matches may be nested, in which case the inner match is contained in the outer one and also copied out on its own.
pub fn subtrees<P: Predicate>(tree: &Tree, predicate: P) -> Vec<Tree> {
    tree.apply(collect_if(predicate), Vec::new())
        .into_iter()
        .map(NodeRef::to_tree)
        .collect()
}
/// Returns the value of the leaf at the specified path, starting with the key of the root, or `None` if there is no such leaf.
#[inline]
pub fn value_of<'t>(tree: &'t Tree, path: &str) -> Option<&'t Scalar> {
    tree.value(path)
}
