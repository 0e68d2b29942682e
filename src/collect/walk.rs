use std::collections::HashSet;
use std::hash::Hash;
use std::slice;

use crate::collect::Order;
use crate::collect::set::{Node, TransitiveSet};

/// Flattens the DAG under `root` according to `order`.
///
/// Both walks keep an explicit stack. For deduplicating orders a node that
/// was already walked is skipped as a whole, and a child whose flattening is
/// already memoized contributes its memo without being descended into.
pub(super) fn flatten<T>(order: Order, root: &Node<T>) -> Box<[T]>
where
    T: Clone + Eq + Hash,
{
    let mut out = Collector::new(order.dedups());

    match order {
        Order::Compile => postorder(root, &mut out),
        Order::Stable | Order::Link | Order::NaiveLink => preorder(root, &mut out),
    }

    out.items.into_boxed_slice()
}

struct Collector<'a, T> {
    items: Vec<T>,
    /// `None` when duplicates are kept.
    seen: Option<HashSet<&'a T>>,
    visited: HashSet<*const Node<T>>,
}

impl<'a, T> Collector<'a, T>
where
    T: Clone + Eq + Hash,
{
    fn new(dedup: bool) -> Self {
        Self {
            items: Vec::new(),
            seen: dedup.then(HashSet::new),
            visited: HashSet::new(),
        }
    }

    fn emit(&mut self, items: &'a [T]) {
        match &mut self.seen {
            Some(seen) => {
                for item in items {
                    if seen.insert(item) {
                        self.items.push(item.clone());
                    }
                }
            }
            None => self.items.extend_from_slice(items),
        }
    }

    /// Returns false if the node can be skipped entirely.
    fn enter(&mut self, node: &'a Node<T>) -> bool {
        self.seen.is_none() || self.visited.insert(node as *const Node<T>)
    }
}

/// Own elements first, then children left to right.
fn preorder<'a, T>(root: &'a Node<T>, out: &mut Collector<'a, T>)
where
    T: Clone + Eq + Hash,
{
    out.emit(&root.direct);

    let mut stack: Vec<slice::Iter<'a, TransitiveSet<T>>> = vec![root.children.iter()];

    while let Some(frame) = stack.last_mut() {
        let Some(child) = frame.next() else {
            stack.pop();
            continue;
        };
        let Some(node) = child.node.as_deref() else {
            continue;
        };
        if !out.enter(node) {
            continue;
        }

        match node.memo.get() {
            Some(memo) => out.emit(memo),
            None => {
                out.emit(&node.direct);
                stack.push(node.children.iter());
            }
        }
    }
}

/// Children left to right, then own elements.
fn postorder<'a, T>(root: &'a Node<T>, out: &mut Collector<'a, T>)
where
    T: Clone + Eq + Hash,
{
    let mut stack: Vec<(&'a Node<T>, slice::Iter<'a, TransitiveSet<T>>)> =
        vec![(root, root.children.iter())];

    while let Some((node, frame)) = stack.last_mut() {
        let node: &'a Node<T> = *node;

        let Some(child) = frame.next() else {
            stack.pop();
            out.emit(&node.direct);
            continue;
        };
        let Some(child) = child.node.as_deref() else {
            continue;
        };
        if !out.enter(child) {
            continue;
        }

        match child.memo.get() {
            Some(memo) => out.emit(memo),
            None => stack.push((child, child.children.iter())),
        }
    }
}
