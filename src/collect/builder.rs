use std::collections::HashSet;
use std::hash::Hash;
use std::sync::Arc;

use crate::collect::{Order, TransitiveSet};
use crate::error::TransitiveSetError;

/// Incremental construction of a [`TransitiveSet`].
///
/// Unlike [`TransitiveSet::merge`], the builder tidies its input: for
/// deduplicating orders it drops repeated direct elements and children that
/// point at the same allocation. Empty children are always dropped, and a
/// builder holding nothing but a single child returns that child as is.
///
/// ```
/// use kasane::{Order, TransitiveSet, TransitiveSetBuilder};
///
/// let dep = TransitiveSet::of(Order::Compile, ["dep.o"]);
///
/// let set = TransitiveSetBuilder::new(Order::Compile)
///     .add("main.o")
///     .add_transitive(dep)
///     .unwrap()
///     .build();
///
/// assert_eq!(set.flatten(), &["dep.o", "main.o"]);
/// ```
pub struct TransitiveSetBuilder<T> {
    order: Order,
    direct: Vec<T>,
    seen: HashSet<T>,
    children: Vec<TransitiveSet<T>>,
    /// Addresses of the child allocations already linked.
    linked: HashSet<usize>,
}

impl<T> TransitiveSetBuilder<T>
where
    T: Clone + Eq + Hash,
{
    pub fn new(order: Order) -> Self {
        Self {
            order,
            direct: Vec::new(),
            seen: HashSet::new(),
            children: Vec::new(),
            linked: HashSet::new(),
        }
    }

    pub fn order(&self) -> Order {
        self.order
    }

    pub fn is_empty(&self) -> bool {
        self.direct.is_empty() && self.children.is_empty()
    }

    pub fn add(mut self, item: T) -> Self {
        self.push(item);
        self
    }

    pub fn add_all(mut self, items: impl IntoIterator<Item = T>) -> Self {
        for item in items {
            self.push(item);
        }
        self
    }

    /// Adds `set` as a child. Fails if `set` was built with another order.
    pub fn add_transitive(mut self, set: TransitiveSet<T>) -> Result<Self, TransitiveSetError> {
        if set.order() != self.order {
            return Err(TransitiveSetError::OrderMismatch {
                expected: self.order,
                found: set.order(),
            });
        }

        let Some(node) = &set.node else {
            return Ok(self);
        };

        if self.order.dedups() && !self.linked.insert(Arc::as_ptr(node) as usize) {
            return Ok(self);
        }

        self.children.push(set);
        Ok(self)
    }

    pub fn build(mut self) -> TransitiveSet<T> {
        if self.direct.is_empty() && self.children.len() == 1 {
            if let Some(child) = self.children.pop() {
                return child;
            }
        }

        TransitiveSet::from_parts(self.order, self.direct, self.children)
    }

    fn push(&mut self, item: T) {
        if self.order.dedups() && !self.seen.insert(item.clone()) {
            return;
        }
        self.direct.push(item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_duplicates() {
        let link = TransitiveSetBuilder::new(Order::Link)
            .add_all([1, 2, 1, 3, 2])
            .build();
        assert_eq!(link.direct(), &[1, 2, 3]);

        let naive = TransitiveSetBuilder::new(Order::NaiveLink)
            .add_all([1, 2, 1])
            .build();
        assert_eq!(naive.direct(), &[1, 2, 1]);
    }

    #[test]
    fn test_single_child_is_returned() {
        let child = TransitiveSet::of(Order::Stable, ["a", "b"]);
        let set = TransitiveSetBuilder::new(Order::Stable)
            .add_transitive(child.clone())
            .unwrap()
            .add_transitive(TransitiveSet::empty(Order::Stable))
            .unwrap()
            .build();

        assert!(set.ptr_eq(&child));
    }

    #[test]
    fn test_identical_children() {
        let child = TransitiveSet::of(Order::Link, [1, 2]);

        let link = TransitiveSetBuilder::new(Order::Link)
            .add(0)
            .add_transitive(child.clone())
            .unwrap()
            .add_transitive(child.clone())
            .unwrap()
            .build();
        assert_eq!(link.children().len(), 1);
        assert_eq!(link.flatten(), &[0, 1, 2]);

        let naive_child = TransitiveSet::of(Order::NaiveLink, [1]);
        let naive = TransitiveSetBuilder::new(Order::NaiveLink)
            .add_transitive(naive_child.clone())
            .unwrap()
            .add_transitive(naive_child)
            .unwrap()
            .build();
        assert_eq!(naive.flatten(), &[1, 1]);
    }

    #[test]
    fn test_order_mismatch() {
        let result = TransitiveSetBuilder::new(Order::Compile)
            .add(1)
            .add_transitive(TransitiveSet::of(Order::Link, [2]));

        assert!(matches!(
            result,
            Err(TransitiveSetError::OrderMismatch {
                expected: Order::Compile,
                found: Order::Link,
            })
        ));
    }

    #[test]
    fn test_empty_builder() {
        let builder = TransitiveSetBuilder::<u8>::new(Order::Link);
        assert!(builder.is_empty());
        assert_eq!(builder.order(), Order::Link);
        assert!(builder.build().is_empty());
    }

    #[test]
    fn test_matches_merge() {
        let dep = TransitiveSet::of(Order::Compile, ['d']);
        let built = TransitiveSetBuilder::new(Order::Compile)
            .add('t')
            .add_transitive(dep.clone())
            .unwrap()
            .build();
        let merged = TransitiveSet::merge(Order::Compile, ['t'], [dep]).unwrap();

        assert_eq!(built, merged);
    }
}
