//! LinkedList: a singly linked list that also tracks its last node.
//!
//! Used as the per-bucket chain of the hash map. Values are owned by the list and dropped
//! with it; `take_all` and `into_iter` hand them back instead.

use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;

// ================================================================================================
// INTERNAL DATA STRUCTURES
// ================================================================================================

struct Node<T> {
    value: T,
    next: Option<NonNull<Node<T>>>,
}

impl<T> Node<T> {
    #[inline(always)]
    fn alloc(value: T) -> NonNull<Node<T>> {
        let boxed = Box::new(Node { value, next: None });
        // SAFETY: Box::into_raw never returns null
        unsafe { NonNull::new_unchecked(Box::into_raw(boxed)) }
    }
}

// ================================================================================================
// LINKEDLIST STRUCTURE
// ================================================================================================

/// Singly linked list with O(1) append.
pub struct LinkedList<T> {
    first: Option<NonNull<Node<T>>>,
    last: Option<NonNull<Node<T>>>,
    len: usize,
    marker: PhantomData<Box<Node<T>>>,
}

// SAFETY: the list uniquely owns its nodes, same as Box<Node<T>> would.
unsafe impl<T: Send> Send for LinkedList<T> {}
unsafe impl<T: Sync> Sync for LinkedList<T> {}

impl<T> LinkedList<T> {
    /// Create an empty list.
    pub const fn new() -> Self {
        Self {
            first: None,
            last: None,
            len: 0,
            marker: PhantomData,
        }
    }

    /// Append `value` at the end.
    pub fn push(&mut self, value: T) {
        self.push_node(Node::alloc(value));
    }

    /// Append `value` and return a reference to it in its new place.
    pub fn push_mut(&mut self, value: T) -> &mut T {
        let node = Node::alloc(value);
        self.push_node(node);
        // SAFETY: node is now owned by the list, which is mutably borrowed for the result
        unsafe { &mut (*node.as_ptr()).value }
    }

    /// Append every value yielded by `values`, in order.
    pub fn push_all<I: IntoIterator<Item = T>>(&mut self, values: I) {
        for value in values {
            self.push(value);
        }
    }

    /// Remove and return the last value. O(n): the list is singly linked.
    pub fn pop(&mut self) -> Option<T> {
        let len = self.len;
        if len == 0 {
            return None;
        }
        self.remove(len - 1)
    }

    /// Remove and return the first value.
    pub fn pop_front(&mut self) -> Option<T> {
        self.pop_front_node().map(|node| {
            // SAFETY: node was produced by Node::alloc and is now unlinked
            let node = unsafe { Box::from_raw(node.as_ptr()) };
            node.value
        })
    }

    /// First value, if any.
    pub fn first(&self) -> Option<&T> {
        // SAFETY: nodes are valid while owned by the list
        self.first.map(|node| unsafe { &(*node.as_ptr()).value })
    }

    /// Last value, if any.
    pub fn last(&self) -> Option<&T> {
        // SAFETY: nodes are valid while owned by the list
        self.last.map(|node| unsafe { &(*node.as_ptr()).value })
    }

    /// First value matching `pred`.
    pub fn find<P: FnMut(&T) -> bool>(&self, mut pred: P) -> Option<&T> {
        self.iter().find(|v| pred(v))
    }

    /// Mutable reference to the first value matching `pred`.
    pub fn find_mut<P: FnMut(&T) -> bool>(&mut self, mut pred: P) -> Option<&mut T> {
        self.iter_mut().find(|v| pred(v))
    }

    /// Index of the first value matching `pred`.
    pub fn position<P: FnMut(&T) -> bool>(&self, pred: P) -> Option<usize> {
        self.iter().position(pred)
    }

    /// Returns true if an equal value is stored.
    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.iter().any(|v| v == value)
    }

    /// Unlink the node at `index` and return its value.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index >= self.len {
            return None;
        }
        if index == 0 {
            return self.pop_front();
        }

        // SAFETY: 0 < index < len, so the predecessor and target both exist and are owned
        // by this list. The target is unlinked before it is freed.
        unsafe {
            let mut prev = self.first?;
            for _ in 1..index {
                prev = (*prev.as_ptr()).next?;
            }
            let target = (*prev.as_ptr()).next?;
            (*prev.as_ptr()).next = (*target.as_ptr()).next;
            if self.last == Some(target) {
                self.last = Some(prev);
            }
            self.len -= 1;
            Some(Box::from_raw(target.as_ptr()).value)
        }
    }

    /// Drop every value.
    pub fn clear(&mut self) {
        while self.pop_front().is_some() {}
    }

    /// Unlink every value and hand them back, leaving the list empty.
    pub fn take_all(&mut self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.len);
        while let Some(v) = self.pop_front() {
            out.push(v);
        }
        out
    }

    /// Copy the values out into a `Vec`.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Number of values.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list holds no values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate from first to last.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            next: self.first,
            remaining: self.len,
            marker: PhantomData,
        }
    }

    /// Mutable iteration from first to last.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            next: self.first,
            remaining: self.len,
            marker: PhantomData,
        }
    }

    /// Mutable reference to the first value matching `pred`, or the list itself on a miss so
    /// the caller can append without scanning again.
    pub(crate) fn find_mut_or_vacant<P: FnMut(&T) -> bool>(
        &mut self,
        mut pred: P,
    ) -> Result<&mut T, &mut Self> {
        let mut cursor = self.first;
        while let Some(node) = cursor {
            // SAFETY: node is a live node of this list, which is mutably borrowed for the
            // lifetime of the returned reference
            unsafe {
                if pred(&(*node.as_ptr()).value) {
                    return Ok(&mut (*node.as_ptr()).value);
                }
                cursor = (*node.as_ptr()).next;
            }
        }
        Err(self)
    }

    /// Split the list into the values matching `pred` and the rest.
    ///
    /// Nodes are relinked, not reallocated. Relative order is kept on both sides.
    pub(crate) fn partition<P: FnMut(&T) -> bool>(mut self, mut pred: P) -> (Self, Self) {
        let mut yes = Self::new();
        let mut no = Self::new();
        while let Some(node) = self.pop_front_node() {
            // SAFETY: node is unlinked and exclusively ours until pushed again
            let matched = pred(unsafe { &(*node.as_ptr()).value });
            if matched {
                yes.push_node(node);
            } else {
                no.push_node(node);
            }
        }
        (yes, no)
    }

    #[inline(always)]
    fn push_node(&mut self, node: NonNull<Node<T>>) {
        // SAFETY: node is a detached node we own; last, if set, is a live node of this list
        unsafe {
            (*node.as_ptr()).next = None;
            match self.last {
                Some(last) => (*last.as_ptr()).next = Some(node),
                None => self.first = Some(node),
            }
        }
        self.last = Some(node);
        self.len += 1;
    }

    #[inline(always)]
    fn pop_front_node(&mut self) -> Option<NonNull<Node<T>>> {
        let node = self.first?;
        // SAFETY: first is a live node of this list
        self.first = unsafe { (*node.as_ptr()).next.take() };
        if self.first.is_none() {
            self.last = None;
        }
        self.len -= 1;
        Some(node)
    }
}

// ================================================================================================
// DROP AND STANDARD TRAIT IMPLEMENTATIONS
// ================================================================================================

impl<T> Drop for LinkedList<T> {
    fn drop(&mut self) {
        // Iterative so long chains cannot overflow the stack
        self.clear();
    }
}

impl<T> Default for LinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for LinkedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> From<Vec<T>> for LinkedList<T> {
    fn from(values: Vec<T>) -> Self {
        let mut list = Self::new();
        list.push_all(values);
        list
    }
}

impl<T> FromIterator<T> for LinkedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.push_all(iter);
        list
    }
}

impl<T> Extend<T> for LinkedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.push_all(iter);
    }
}

// ================================================================================================
// ITERATOR IMPLEMENTATIONS
// ================================================================================================

/// Borrowing iterator over a [`LinkedList`]
pub struct Iter<'a, T> {
    next: Option<NonNull<Node<T>>>,
    remaining: usize,
    marker: PhantomData<&'a Node<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let node = self.next?;
        // SAFETY: the list is borrowed for 'a, so its nodes stay alive and unmodified
        unsafe {
            self.next = (*node.as_ptr()).next;
            self.remaining -= 1;
            Some(&(*node.as_ptr()).value)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

/// Mutable iterator over a [`LinkedList`]
pub struct IterMut<'a, T> {
    next: Option<NonNull<Node<T>>>,
    remaining: usize,
    marker: PhantomData<&'a mut Node<T>>,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<&'a mut T> {
        let node = self.next?;
        // SAFETY: the list is mutably borrowed for 'a and each node is yielded once
        unsafe {
            self.next = (*node.as_ptr()).next;
            self.remaining -= 1;
            Some(&mut (*node.as_ptr()).value)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}

/// Owning iterator over a [`LinkedList`]
pub struct IntoIter<T>(LinkedList<T>);

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.0.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.0.len, Some(self.0.len))
    }
}

impl<T> IntoIterator for LinkedList<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter(self)
    }
}

impl<'a, T> IntoIterator for &'a LinkedList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut LinkedList<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}
