extern crate alloc;

use alloc::vec::Vec;
use core::fmt;

/// Index value meaning "no node".
pub(crate) const NIL: usize = usize::MAX;

/// A slot in the list's slab.
///
/// Vacant slots keep `val == None` and sit on the free list until reused.
#[derive(Clone)]
struct Node<T> {
    val: Option<T>,
    prev: usize,
    next: usize,
}

/// A doubly linked list whose nodes are linked by slab index.
///
/// Nodes live in a single `Vec` and refer to their neighbours by position
/// instead of by pointer. The list therefore owns no raw pointers, can be
/// shared freely across threads once frozen behind an `Arc`, and can be
/// duplicated with a plain `clone()` without relinking anything. Slots freed
/// by removals are recycled through a free list, so the slab never grows past
/// the peak number of live entries.
///
/// All operations are O(1) except `clone`, which is O(n).
///
/// # Examples
///
/// ```ignore
/// let mut list = List::new();
/// let a = list.push_back(10);
/// let _b = list.push_back(20);
/// assert_eq!(list.remove(a), Some(10));
/// assert_eq!(list.pop_front(), Some(20));
/// ```
#[derive(Clone)]
pub(crate) struct List<T> {
    nodes: Vec<Node<T>>,
    free: Vec<usize>,
    head: usize,
    tail: usize,
    len: usize,
}

impl<T> List<T> {
    /// Creates an empty list.
    pub(crate) fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty list with room for `capacity` nodes.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        List {
            nodes: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: NIL,
            tail: NIL,
            len: 0,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Index of the oldest node, or [`NIL`] when empty.
    #[inline]
    pub(crate) fn head(&self) -> usize {
        self.head
    }

    /// Index of the newest node, or [`NIL`] when empty.
    #[inline]
    pub(crate) fn tail(&self) -> usize {
        self.tail
    }

    /// Appends `val` after the current tail and returns its index.
    pub(crate) fn push_back(&mut self, val: T) -> usize {
        let node = Node {
            val: Some(val),
            prev: self.tail,
            next: NIL,
        };
        let idx = match self.free.pop() {
            Some(idx) => {
                self.nodes[idx] = node;
                idx
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        };

        if self.tail == NIL {
            self.head = idx;
        } else {
            self.nodes[self.tail].next = idx;
        }
        self.tail = idx;
        self.len += 1;
        idx
    }

    /// Unlinks the node at `idx` and returns its value.
    ///
    /// Returns `None` if `idx` is out of range or refers to a vacant slot.
    pub(crate) fn remove(&mut self, idx: usize) -> Option<T> {
        let node = self.nodes.get_mut(idx)?;
        let val = node.val.take()?;
        let (prev, next) = (node.prev, node.next);
        node.prev = NIL;
        node.next = NIL;

        if prev == NIL {
            self.head = next;
        } else {
            self.nodes[prev].next = next;
        }
        if next == NIL {
            self.tail = prev;
        } else {
            self.nodes[next].prev = prev;
        }

        self.free.push(idx);
        self.len -= 1;
        Some(val)
    }

    /// Removes the oldest value.
    #[inline]
    pub(crate) fn pop_front(&mut self) -> Option<T> {
        self.remove(self.head)
    }

    /// Removes the newest value.
    #[inline]
    pub(crate) fn pop_back(&mut self) -> Option<T> {
        self.remove(self.tail)
    }

    #[inline]
    pub(crate) fn get(&self, idx: usize) -> Option<&T> {
        self.nodes.get(idx)?.val.as_ref()
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, idx: usize) -> Option<&mut T> {
        self.nodes.get_mut(idx)?.val.as_mut()
    }

    /// Index of the node following `idx`, or [`NIL`].
    #[inline]
    pub(crate) fn next_of(&self, idx: usize) -> usize {
        self.nodes.get(idx).map_or(NIL, |node| node.next)
    }

    /// Drops every node and releases the slab.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.head = NIL;
        self.tail = NIL;
        self.len = 0;
    }

    /// Iterates from the oldest node to the newest.
    pub(crate) fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            front: self.head,
            back: self.tail,
            remaining: self.len,
        }
    }
}

impl<T> Default for List<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Borrowing iterator over a [`List`], oldest first.
pub(crate) struct Iter<'a, T> {
    list: &'a List<T>,
    front: usize,
    back: usize,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.list.nodes.get(self.front)?;
        self.front = node.next;
        self.remaining -= 1;
        node.val.as_ref()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.list.nodes.get(self.back)?;
        self.back = node.prev;
        self.remaining -= 1;
        node.val.as_ref()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
