use core::num::NonZeroIsize;
use std::sync::Arc;
use granite::{ListStorage, MoveFix};
use crate::Scalar;
use super::NodeRef;

/// A node of a property tree, as it is stored in the arena.
///
/// Created by the tree internally. Public access goes through [`NodeRef`] and [`NodeRefMut`].
///
/// [`NodeRef`]: struct.NodeRef.html " "
/// [`NodeRefMut`]: struct.NodeRefMut.html " "
#[derive(Clone, Debug)]
pub struct Node {
    pub(super) key: String,
    pub(super) data: NodeData,
    pub(super) parent: Option<usize>,
}
impl Node {
    #[inline(always)]
    pub(super) fn leaf(key: impl Into<String>, value: Arc<Scalar>, parent: Option<usize>) -> Self {
        Self {
            key: key.into(),
            data: NodeData::Leaf(value),
            parent,
        }
    }
    #[inline(always)]
    pub(super) fn inner(key: impl Into<String>, parent: Option<usize>) -> Self {
        Self {
            key: key.into(),
            data: NodeData::Inner(Vec::new()),
            parent,
        }
    }
    /// A detached copy of the referenced node, without its children. The scalar is shared.
    #[inline]
    pub(super) fn copy_of(source: NodeRef<'_>, parent: Option<usize>) -> Self {
        match source.shared_value() {
            Some(value) => Self::leaf(source.key(), Arc::clone(value), parent),
            None => Self::inner(source.key(), parent),
        }
    }
    /// The transparent root placed above several top-level keys.
    #[inline(always)]
    pub(super) fn anonymous() -> Self {
        Self::inner(String::new(), None)
    }
    #[inline(always)]
    pub(super) fn is_anonymous(&self) -> bool {
        self.key.is_empty()
    }
    #[inline]
    pub(super) fn children(&self) -> &[usize] {
        match &self.data {
            NodeData::Inner(children) => children,
            NodeData::Leaf(..) => &[],
        }
    }
}
impl MoveFix for Node {
    unsafe fn fix_shift<S>(storage: &mut S, shifted_from: usize, shifted_by: NonZeroIsize)
    where
        S: ListStorage<Element = Self>,
    {
        let fix_starting_from = if shifted_by.get() > 0 {
            shifted_from + 1 // If an insertion happened, ignore the new element
        } else {
            shifted_from
        };
        for i in fix_starting_from..storage.len() {
            // undo shift to figure out old index
            let old_index = (i as isize).wrapping_sub(shifted_by.get()) as usize;
            Self::fix_move(storage, old_index, i);
        }
    }

    unsafe fn fix_move<S>(storage: &mut S, previous_index: usize, current_index: usize)
    where
        S: ListStorage<Element = Self>,
    {
        let (children, parent) = match storage.get(current_index) {
            Some(node) => (node.children().to_vec(), node.parent),
            None => return,
        };
        for child in children {
            if let Some(child) = storage.get_mut(child) {
                child.parent = Some(current_index);
            }
        }
        let parent = match parent.and_then(|index| storage.get_mut(index)) {
            Some(parent) => parent,
            None => return,
        };
        if let NodeData::Inner(siblings) = &mut parent.data {
            for sibling in siblings.iter_mut().filter(|x| **x == previous_index) {
                *sibling = current_index;
            }
        }
    }
}

/// The payload of a node: either a scalar or an ordered list of children.
#[derive(Clone, Debug)]
pub(super) enum NodeData {
    Inner(Vec<usize>),
    Leaf(Arc<Scalar>),
}
