//! Builds navigable trees out of flat dot-separated configuration properties and queries them.
//!
//! # Overview
//! Configuration layers usually hand out their properties as a flat map of keys like `caches.redis[0].config.spec` and scalar values. Proptree turns such a map into a [`Tree`] in which every key segment is one level, and provides what is needed to take the tree apart again:
//! - exact path lookup ([`Tree::find`], [`Tree::value`]);
//! - pre-order traversal with arbitrary accumulators ([`Tree::traverse`], [`Tree::apply`]);
//! - predicates and collection strategies which extract independent subtrees (the [`query`] module);
//! - splitting lists of indexed sibling blocks into one tree per block (the [`grouped`] module).
//!
//! The trees are ["arena-allocated"][arena tree blog post]: nodes live in a sparse `Vec` from the [`granite`] crate and refer to their children and parents by index, so there are no reference cycles and no `Rc`s. Values are shared between a tree and the subtrees copied out of it.
//!
//! # Example
//! ```rust
//! use proptree::{Tree, query, grouped};
//!
//! let tree = Tree::from_entries(vec![
//!     ("caches.redis[0].names", "cache1"),
//!     ("caches.redis[0].config.spec", "maximumSize=10"),
//!     ("caches.redis[1].names", "cache2"),
//!     ("caches.caffeine[0].names", "cache3"),
//! ])?;
//!
//! let redis = query::subtrees(&tree, query::key_starts_with("redis"));
//! assert_eq!(redis.len(), 2);
//!
//! let mut names = Vec::new();
//! grouped::consume(&tree, |group| {
//!     let name = group.root().unwrap().key().to_owned();
//!     let names_value = group.relative_value(".names").unwrap().to_string();
//!     names.push((name, names_value));
//! });
//! assert_eq!(names[0], ("redis".to_owned(), "cache1".to_owned()));
//! assert_eq!(names[2], ("caffeine".to_owned(), "cache3".to_owned()));
//! # Ok::<(), proptree::TreeError>(())
//! ```
//!
//! # Logging
//! The crate reports through the [`log`] facade and never installs a logger itself. Structural decisions made during insertion, such as promoting a leaf or widening the root, are logged at the `debug` level; values discarded because their path ends at an inner node are logged at `warn`.
//!
//! # Feature flags
//! - `serde`: adds `Serialize` and `Deserialize` implementations for [`Scalar`] and [`Tree`]. Trees are represented as flat maps from dotted keys to scalars.
//! - `doc_cfg`: marks feature-gated items in the documentation. **Requires a nightly compiler.**
//!
//! [`Tree`]: tree/struct.Tree.html " "
//! [`Tree::find`]: tree/struct.Tree.html#method.find " "
//! [`Tree::value`]: tree/struct.Tree.html#method.value " "
//! [`Tree::traverse`]: tree/struct.Tree.html#method.traverse " "
//! [`Tree::apply`]: tree/struct.Tree.html#method.apply " "
//! [`Scalar`]: enum.Scalar.html " "
//! [`query`]: query/index.html " "
//! [`grouped`]: grouped/index.html " "
//! [`granite`]: https://docs.rs/granite " "
//! [`log`]: https://docs.rs/log " "
//! [arena tree blog post]: https://dev.to/deciduously/no-more-tears-no-more-knots-arena-allocated-trees-in-rust-44k6 " "

#![warn(
    rust_2018_idioms,
    clippy::cargo,
    clippy::nursery,
    missing_debug_implementations,
    missing_docs,
    unused_qualifications,
    variant_size_differences,
    clippy::cast_lossless,
    clippy::checked_conversions,
    clippy::explicit_iter_loop,
    clippy::explicit_into_iter_loop,
    clippy::filter_map_next,
    clippy::map_flatten,
    clippy::map_unwrap_or,
    clippy::implicit_hasher,
    clippy::inefficient_to_string,
    clippy::items_after_statements,
    clippy::let_unit_value,
    clippy::macro_use_imports,
    clippy::match_same_arms,
    clippy::match_wild_err_arm,
    clippy::match_wildcard_for_single_variants,
    // sick of this stupid lint, disabling
    // clippy::module_name_repetitions,
    clippy::mut_mut,
    clippy::needless_continue,
    clippy::needless_pass_by_value,
    clippy::option_option,
    clippy::redundant_closure_for_method_calls,
    clippy::similar_names,
    clippy::single_match_else,
    clippy::string_add_assign,
    clippy::too_many_lines,
    clippy::type_repetition_in_bounds,
    clippy::trivially_copy_pass_by_ref,
    clippy::unnested_or_patterns,
    clippy::unused_self,
    clippy::used_underscore_binding,
    clippy::clone_on_ref_ptr,
    clippy::dbg_macro,
    clippy::get_unwrap,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unneeded_field_pattern,
    clippy::use_debug,
)]
#![deny(
    anonymous_parameters,
    bare_trait_objects,
    clippy::exit,
)]
#![allow(clippy::use_self)] // FIXME reenable when it gets fixed
#![cfg_attr(feature = "doc_cfg", feature(doc_cfg))]

pub mod scalar;
pub use scalar::Scalar;

pub mod tree;
pub use tree::{Tree, NodeRef, NodeRefMut};

pub mod traversal;
pub use traversal::PreOrder;

pub mod query;
pub use query::Predicate;

pub mod grouped;
pub use grouped::GroupedConfig;

/// A prelude for using Proptree, containing the most used types for glob-importing.
pub mod prelude {
    #[doc(no_inline)]
    pub use crate::{
        tree::{Tree, NodeRef, NodeRefMut},
        query::Predicate,
        grouped::GroupedConfig,
        Scalar,
        TreeError,
    };
}

use thiserror::Error;

/// The error type returned by operations which modify trees.
#[derive(Clone, Debug, Error, PartialEq, Eq, Hash)]
pub enum TreeError {
    /// The path could not be split into segments: it was empty or had an empty segment.
    #[error("invalid path {path:?}: {reason}")]
    InvalidArgument {
        /// The offending path, exactly as it was passed.
        path: String,
        /// What was wrong with it.
        reason: &'static str,
    },
    /// A child was about to be added to a leaf node.
    #[error("cannot add children to leaf node {key:?}")]
    NotInner {
        /// The key of the leaf node.
        key: String,
    },
}
impl TreeError {
    #[inline]
    pub(crate) fn invalid_argument(path: &str, reason: &'static str) -> Self {
        Self::InvalidArgument {
            path: path.to_owned(),
            reason,
        }
    }
}

/// The result type used by operations which modify trees.
pub type Result<T, E = TreeError> = core::result::Result<T, E>;
