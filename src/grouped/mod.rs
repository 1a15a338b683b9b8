//! Splitting lists of sibling configuration blocks into independent trees.
//!
//! Configuration formats express lists of similar blocks with indexed keys:
//! ```text
//! redis[0].names = cache1
//! redis[0].config.spec = maximumSize=10
//! redis[1].names = cache2
//! ```
//! [`consume`] takes each top-level block of such a tree, copies it out, strips the index from its key and hands it over as a tree of its own, so that every block can be read with the same relative paths. [`GroupedConfig`] wraps a tree loaded from a flat map of properties and provides the filtering which usually precedes the split.
//!
//! # Example
//! ```rust
//! use proptree::{Tree, grouped};
//!
//! let tree = Tree::from_entries(vec![
//!     ("redis[0].names", "cache1"),
//!     ("redis[0].config.spec", "maximumSize=10"),
//!     ("redis[1].names", "cache2"),
//! ])?;
//! let mut groups = Vec::new();
//! grouped::consume(&tree, |group| groups.push(group));
//!
//! assert_eq!(groups.len(), 2);
//! assert_eq!(groups[0].root().unwrap().key(), "redis");
//! assert_eq!(groups[0].relative_value(".names").unwrap(), "cache1");
//! assert_eq!(groups[0].relative_value(".config.spec").unwrap(), "maximumSize=10");
//! assert_eq!(groups[1].relative_value(".names").unwrap(), "cache2");
//! assert!(groups[1].relative_value(".config.spec").is_none());
//! # Ok::<(), proptree::TreeError>(())
//! ```
//!
//! [`consume`]: fn.consume.html " "
//! [`GroupedConfig`]: struct.GroupedConfig.html " "

use log::{debug, trace};
use crate::{Result, Scalar, Tree};

/// Returns the key without its index suffix: everything before the first `[`.
///
/// # Example
/// ```rust
/// # use proptree::grouped::strip_index;
/// assert_eq!(strip_index("redis[0]"), "redis");
/// assert_eq!(strip_index("caffeine"), "caffeine");
/// assert_eq!(strip_index("a[1][2]"), "a");
/// ```
#[inline]
pub fn strip_index(key: &str) -> &str {
    match key.find('[') {
        Some(i) => &key[..i],
        None => key,
    }
}

/// Hands every immediate child of the root over to `on_each` as a tree of its own, with the index suffix stripped from its key. Does nothing for an empty tree.
///
/// A key which consists of nothing but an index, like `[0]`, is kept as is.
pub fn consume<F>(tree: &Tree, mut on_each: F)
where
    F: FnMut(Tree),
{
    let root = match tree.root() {
        Some(root) => root,
        None => return,
    };
    for child in root.children() {
        let mut group = child.to_tree();
        let key = strip_index(child.key());
        if !key.is_empty() {
            group.set_root_key(key);
        }
        trace!("consuming {:?} as group {:?}", child.key(), group.root().map(|x| x.key()));
        on_each(group);
    }
}

/// A tree of sibling configuration blocks, loaded from a flat map of properties.
///
/// The top level of the tree is always transparent, so a single block keyed `redis[0]` is still a group of its own rather than the root of the whole tree.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GroupedConfig {
    tree: Tree,
}
impl GroupedConfig {
    /// Creates an empty grouped configuration.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }
    /// Loads the entries whose keys start with the specified prefix, with the prefix removed from the keys. Other entries are ignored.
    ///
    /// Unless the prefix is empty or ends with `.`, it only matches whole segments: `spring.caches` matches `spring.caches.redis[0].names` but not `spring.cachesX.names`.
    ///
    /// # Errors
    /// Fails if a key is not a valid path once the prefix is removed.
    ///
    /// # Example
    /// ```rust
    /// # use proptree::grouped::GroupedConfig;
    /// let config = GroupedConfig::load(
    ///     vec![
    ///         ("spring.caches.redis[0].names", "cache1"),
    ///         ("spring.caches.caffeine[0].names", "cache2"),
    ///         ("spring.application.name", "app"),
    ///     ],
    ///     "spring.caches",
    /// )?;
    /// assert_eq!(config.tree().len(), 4);
    /// assert!(config.tree().find("spring").is_none());
    ///
    /// let mut names = Vec::new();
    /// config.filter_by_name("redis").consume(|group| {
    ///     names.push(group.relative_value("names").unwrap().to_string());
    /// });
    /// assert_eq!(names, ["cache1"]);
    /// # Ok::<(), proptree::TreeError>(())
    /// ```
    pub fn load<I, K, V>(entries: I, prefix: &str) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Scalar>,
    {
        let mut tree = Tree::anonymous();
        let mut loaded = 0_usize;
        for (key, value) in entries {
            if let Some(path) = strip_prefix(key.as_ref(), prefix) {
                tree.insert(path, value)?;
                loaded += 1;
            }
        }
        debug!("loaded {} properties under {:?}", loaded, prefix);
        Ok(Self { tree })
    }
    /// Wraps an existing tree. Its root's children become the groups.
    #[inline(always)]
    pub fn from_tree(tree: Tree) -> Self {
        Self { tree }
    }
    /// Returns the underlying tree.
    #[inline(always)]
    pub fn tree(&self) -> &Tree {
        &self.tree
    }
    /// Consumes the configuration and returns the underlying tree.
    #[inline(always)]
    pub fn into_tree(self) -> Tree {
        self.tree
    }
    /// Returns `true` if there are no properties at all, `false` otherwise.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }
    /// Returns a new configuration holding copies of every node, in pre-order, whose key starts with `name`.
    ///
    /// Nodes are matched anywhere in the tree, not just at the top level. A matching node nested inside another matching node is copied on its own as well. The result is empty if nothing matches.
    pub fn filter_by_name(&self, name: &str) -> Self {
        let mut filtered = Tree::anonymous();
        let root = filtered.root_key();
        for node in self.tree.iter().filter(|x| x.key().starts_with(name)) {
            filtered.graft(node, root);
        }
        trace!("filtered {} of {} nodes by {:?}", filtered.len(), self.tree.len(), name);
        Self { tree: filtered }
    }
    /// Hands every group over to `on_each` as a tree of its own, as [`consume`] does.
    ///
    /// [`consume`]: fn.consume.html " "
    #[inline]
    pub fn consume<F>(&self, on_each: F)
    where
        F: FnMut(Tree),
    {
        consume(&self.tree, on_each)
    }
}
impl From<Tree> for GroupedConfig {
    #[inline(always)]
    fn from(op: Tree) -> Self {
        Self::from_tree(op)
    }
}

fn strip_prefix<'k>(key: &'k str, prefix: &str) -> Option<&'k str> {
    let rest = key.strip_prefix(prefix)?;
    if prefix.is_empty() || prefix.ends_with('.') {
        Some(rest)
    } else {
        rest.strip_prefix('.')
    }
}
