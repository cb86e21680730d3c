//! Persistent implicit-key treap.
//!
//! The sequence is addressed by position, not by key: every node stores the
//! size of its subtree, and split/merge walk by index. Nodes are shared through
//! `Arc`, so cloning the tree is O(1) and a splice copies only the O(log n)
//! nodes on the split/merge paths (`Arc::make_mut`). Every other node stays
//! shared with earlier clones.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

type Link<T> = Option<Arc<Node<T>>>;

#[derive(Clone)]
struct Node<T> {
    value: T,
    priority: u64,
    len: usize,
    left: Link<T>,
    right: Link<T>,
}

impl<T> Node<T> {
    fn leaf(value: T, priority: u64) -> Self {
        Self {
            value,
            priority,
            len: 1,
            left: None,
            right: None,
        }
    }

    fn recount(&mut self) {
        self.len = 1 + link_len(&self.left) + link_len(&self.right);
    }
}

fn link_len<T>(link: &Link<T>) -> usize {
    link.as_ref().map_or(0, |node| node.len)
}

/// Splits `link` into the first `at` elements and the rest.
fn split<T: Clone>(link: Link<T>, at: usize) -> (Link<T>, Link<T>) {
    let Some(mut node) = link else {
        return (None, None);
    };
    if at == 0 {
        return (None, Some(node));
    }
    if at >= node.len {
        return (Some(node), None);
    }

    let left_len = link_len(&node.left);
    let inner = Arc::make_mut(&mut node);
    if at <= left_len {
        let (before, after) = split(inner.left.take(), at);
        inner.left = after;
        inner.recount();
        (before, Some(node))
    } else {
        let (before, after) = split(inner.right.take(), at - left_len - 1);
        inner.right = before;
        inner.recount();
        (Some(node), after)
    }
}

/// Concatenates two sequences. Heap order on priorities keeps the expected
/// depth logarithmic.
fn merge<T: Clone>(left: Link<T>, right: Link<T>) -> Link<T> {
    match (left, right) {
        (None, right) => right,
        (left, None) => left,
        (Some(mut l), Some(mut r)) => {
            if l.priority >= r.priority {
                let inner = Arc::make_mut(&mut l);
                inner.right = merge(inner.right.take(), Some(r));
                inner.recount();
                Some(l)
            } else {
                let inner = Arc::make_mut(&mut r);
                inner.left = merge(Some(l), inner.left.take());
                inner.recount();
                Some(r)
            }
        }
    }
}

/// An ordered sequence with O(log n) indexed access and splicing.
#[derive(Clone)]
pub(crate) struct LineTree<T> {
    root: Link<T>,
    priority_state: u64,
}

impl<T: Clone> LineTree<T> {
    pub fn new() -> Self {
        Self {
            root: None,
            priority_state: 0,
        }
    }

    pub fn len(&self) -> usize {
        link_len(&self.root)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn get(&self, mut index: usize) -> Option<&T> {
        if index >= self.len() {
            return None;
        }
        let mut node = self.root.as_deref()?;
        loop {
            let left_len = link_len(&node.left);
            if index < left_len {
                node = node.left.as_deref()?;
            } else if index == left_len {
                return Some(&node.value);
            } else {
                index -= left_len + 1;
                node = node.right.as_deref()?;
            }
        }
    }

    /// Iterates elements starting at `start` in O(log n + k).
    pub fn iter_from(&self, start: usize) -> Iter<'_, T> {
        let mut stack = Vec::new();
        let mut link = self.root.as_deref();
        let mut index = start;
        while let Some(node) = link {
            let left_len = link_len(&node.left);
            if index < left_len {
                stack.push(node);
                link = node.left.as_deref();
            } else if index == left_len {
                stack.push(node);
                break;
            } else {
                index -= left_len + 1;
                link = node.right.as_deref();
            }
        }
        Iter {
            stack,
            remaining: self.len().saturating_sub(start),
        }
    }

    pub fn iter(&self) -> Iter<'_, T> {
        self.iter_from(0)
    }

    /// Replaces the elements in `range` with `items`.
    ///
    /// # Panics
    ///
    /// Panics if `range` is inverted or extends past the end.
    pub fn splice<I>(&mut self, range: Range<usize>, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        assert!(
            range.start <= range.end && range.end <= self.len(),
            "splice range {:?} out of bounds for length {}",
            range,
            self.len()
        );
        let middle = self.build(items);
        let (before, rest) = split(self.root.take(), range.start);
        let (_removed, after) = split(rest, range.end - range.start);
        self.root = merge(merge(before, middle), after);
    }

    pub fn push(&mut self, item: T) {
        let end = self.len();
        self.splice(end..end, std::iter::once(item));
    }

    /// Builds a treap from an in-order sequence in O(k) using the right spine.
    fn build<I>(&mut self, items: I) -> Link<T>
    where
        I: IntoIterator<Item = T>,
    {
        let mut spine: Vec<Node<T>> = Vec::new();
        for value in items {
            let priority = self.next_priority();
            let mut carried: Link<T> = None;
            while matches!(spine.last(), Some(top) if top.priority < priority) {
                if let Some(mut top) = spine.pop() {
                    top.right = carried;
                    top.recount();
                    carried = Some(Arc::new(top));
                }
            }
            let mut node = Node::leaf(value, priority);
            node.left = carried;
            spine.push(node);
        }

        let mut carried: Link<T> = None;
        while let Some(mut top) = spine.pop() {
            top.right = carried;
            top.recount();
            carried = Some(Arc::new(top));
        }
        carried
    }

    // splitmix64
    fn next_priority(&mut self) -> u64 {
        self.priority_state = self.priority_state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.priority_state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    #[cfg(test)]
    fn depth(&self) -> usize {
        fn walk<T>(link: &Link<T>) -> usize {
            link.as_ref()
                .map_or(0, |n| 1 + walk(&n.left).max(walk(&n.right)))
        }
        walk(&self.root)
    }

    #[cfg(test)]
    fn shares_root_with(&self, other: &Self) -> bool {
        match (&self.root, &other.root) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl<T: Clone> Default for LineTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for LineTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Clone> FromIterator<T> for LineTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.root = tree.build(iter);
        tree
    }
}

/// In-order iterator over a [`LineTree`].
pub(crate) struct Iter<'a, T> {
    stack: Vec<&'a Node<T>>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let node = self.stack.pop()?;
        self.remaining = self.remaining.saturating_sub(1);
        let mut link = node.right.as_deref();
        while let Some(n) = link {
            self.stack.push(n);
            link = n.left.as_deref();
        }
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
