use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::collect::{Order, walk};
use crate::core::{Blake3Hasher, Hash32};
use crate::error::TransitiveSetError;

/// A single allocation in the set DAG. Never mutated after construction
/// apart from the write-once memo.
pub(super) struct Node<T> {
    pub(super) direct: Box<[T]>,
    /// Non-empty sets of the same order.
    pub(super) children: Box<[TransitiveSet<T>]>,
    pub(super) memo: OnceLock<Box<[T]>>,
}

// Chains of sets can be far deeper than the call stack, so nodes whose last
// owner goes away are released from a worklist instead of recursively.
impl<T> Drop for Node<T> {
    fn drop(&mut self) {
        let mut pending: Vec<Arc<Node<T>>> = std::mem::take(&mut self.children)
            .into_vec()
            .into_iter()
            .filter_map(|child| child.node)
            .collect();

        while let Some(node) = pending.pop() {
            if let Some(mut node) = Arc::into_inner(node) {
                pending.extend(
                    std::mem::take(&mut node.children)
                        .into_vec()
                        .into_iter()
                        .filter_map(|child| child.node),
                );
            }
        }
    }
}

/// Immutable, order-aware set shared by reference across the graph.
///
/// Cloning a `TransitiveSet` is a reference count bump. Equality and hashing
/// look at the order and the flattened content only, the nesting shape that
/// produced a set is not part of its identity.
pub struct TransitiveSet<T> {
    order: Order,
    /// `None` is the canonical empty set.
    pub(super) node: Option<Arc<Node<T>>>,
}

impl<T> TransitiveSet<T> {
    /// The canonical empty set for `order`. Does not allocate.
    pub fn empty(order: Order) -> Self {
        Self { order, node: None }
    }

    /// Wraps a list of elements with no children.
    pub fn of(order: Order, items: impl IntoIterator<Item = T>) -> Self {
        Self::from_parts(order, items.into_iter().collect(), Vec::new())
    }

    /// Direct elements plus pre-existing child sets of the same order.
    ///
    /// Runs in time proportional to `items` and `children`, regardless of how
    /// large the children are transitively.
    pub fn merge(
        order: Order,
        items: impl IntoIterator<Item = T>,
        children: impl IntoIterator<Item = TransitiveSet<T>>,
    ) -> Result<Self, TransitiveSetError> {
        let children = children
            .into_iter()
            .map(|child| {
                if child.order == order {
                    Ok(child)
                } else {
                    Err(TransitiveSetError::OrderMismatch {
                        expected: order,
                        found: child.order,
                    })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::from_parts(order, items.into_iter().collect(), children))
    }

    /// Callers guarantee that every child has the same order.
    pub(super) fn from_parts(
        order: Order,
        direct: Vec<T>,
        children: Vec<TransitiveSet<T>>,
    ) -> Self {
        let children: Vec<_> = children.into_iter().filter(|c| !c.is_empty()).collect();

        if direct.is_empty() && children.is_empty() {
            return Self::empty(order);
        }

        Self {
            order,
            node: Some(Arc::new(Node {
                direct: direct.into_boxed_slice(),
                children: children.into_boxed_slice(),
                memo: OnceLock::new(),
            })),
        }
    }

    pub fn order(&self) -> Order {
        self.order
    }

    /// True iff the set holds no elements, transitively. Never flattens.
    pub fn is_empty(&self) -> bool {
        self.node.is_none()
    }

    /// True iff the set is exactly one direct element with no children.
    pub fn is_singleton(&self) -> bool {
        self.node
            .as_ref()
            .is_some_and(|node| node.direct.len() == 1 && node.children.is_empty())
    }

    /// Elements contributed directly at this point of the graph.
    pub fn direct(&self) -> &[T] {
        match &self.node {
            Some(node) => &node.direct,
            None => &[],
        }
    }

    /// Non-empty child sets, in the order they were supplied.
    pub fn children(&self) -> &[TransitiveSet<T>] {
        match &self.node {
            Some(node) => &node.children,
            None => &[],
        }
    }

    /// Shallow identity: both handles point at the same allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.order == other.order
            && match (&self.node, &other.node) {
                (Some(a), Some(b)) => Arc::ptr_eq(a, b),
                (None, None) => true,
                _ => false,
            }
    }
}

impl<T> TransitiveSet<T>
where
    T: Clone + Eq + Hash,
{
    /// The elements of the set in the sequence defined by its [`Order`].
    ///
    /// The first call on an instance walks the whole DAG below it; the result
    /// is stored in the instance and later calls return it directly.
    /// Concurrent first calls may each walk, the first stored result is kept
    /// and every caller sees it.
    pub fn flatten(&self) -> &[T] {
        let Some(node) = &self.node else {
            return &[];
        };

        if let Some(items) = node.memo.get() {
            return items;
        }

        let items = walk::flatten(self.order, node);
        tracing::trace!(order = %self.order, len = items.len(), "flattened transitive set");

        node.memo.get_or_init(|| items)
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.flatten().to_vec()
    }

    /// Number of elements after flattening.
    pub fn len(&self) -> usize {
        self.flatten().len()
    }

    /// Content fingerprint over the order and the flattened elements.
    pub fn fingerprint(&self) -> Hash32 {
        let mut hasher = Blake3Hasher::default();
        self.order.name().hash(&mut hasher);
        self.flatten().hash(&mut hasher);
        hasher.into()
    }
}

impl<T> Clone for TransitiveSet<T> {
    fn clone(&self) -> Self {
        Self {
            order: self.order,
            node: self.node.clone(),
        }
    }
}

impl<T> PartialEq for TransitiveSet<T>
where
    T: Clone + Eq + Hash,
{
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order && (self.ptr_eq(other) || self.flatten() == other.flatten())
    }
}

impl<T> Eq for TransitiveSet<T> where T: Clone + Eq + Hash {}

impl<T> Hash for TransitiveSet<T>
where
    T: Clone + Eq + Hash,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.order.hash(state);
        self.flatten().hash(state);
    }
}

impl<T> fmt::Debug for TransitiveSet<T>
where
    T: Clone + Eq + Hash + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitiveSet")
            .field("order", &self.order)
            .field("items", &self.flatten())
            .finish()
    }
}

impl<T> Serialize for TransitiveSet<T>
where
    T: Clone + Eq + Hash + Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TransitiveSet", 2)?;
        state.serialize_field("order", &self.order)?;
        state.serialize_field("items", self.flatten())?;
        state.end()
    }
}
