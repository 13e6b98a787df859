//! DArray: a growable array of owned, optionally-empty slots.
//!
//! Unlike `Vec`, removing a slot leaves a hole instead of shifting the tail down, so
//! indices stay stable. This is what lets the hash map address its buckets by index.

use crate::error::{try_reserve, Error, Result};

// ================================================================================================
// CONSTANTS
// ================================================================================================

/// Slot count used by [`DArray::new`]
pub const DARRAY_MINIMUM_CAPACITY: usize = 10;

/// Number of slots added each time a full array grows
pub const DARRAY_DEFAULT_EXPAND_RATE: usize = 300;

// ================================================================================================
// DARRAY STRUCTURE
// ================================================================================================

/// Dynamic array of `Option<T>` slots.
///
/// `capacity()` slots are always allocated. `len()` is one past the highest slot written
/// since the last [`clear`](DArray::clear); slots below it may be empty.
pub struct DArray<T> {
    contents: Vec<Option<T>>,
    end: usize,
    expand_rate: usize,
}

impl<T> DArray<T> {
    /// Create an array with [`DARRAY_MINIMUM_CAPACITY`] empty slots.
    pub fn new() -> Self {
        let mut contents = Vec::with_capacity(DARRAY_MINIMUM_CAPACITY);
        contents.resize_with(DARRAY_MINIMUM_CAPACITY, || None);
        Self {
            contents,
            end: 0,
            expand_rate: DARRAY_DEFAULT_EXPAND_RATE,
        }
    }

    /// Create an array with `capacity` empty slots.
    ///
    /// Fails with [`Error::InvalidCapacity`] for zero and [`Error::Alloc`] if the slots
    /// cannot be reserved.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity(capacity));
        }
        let mut contents = Vec::new();
        try_reserve(&mut contents, capacity)?;
        contents.resize_with(capacity, || None);
        Ok(Self {
            contents,
            end: 0,
            expand_rate: DARRAY_DEFAULT_EXPAND_RATE,
        })
    }

    /// Set how many slots are added when a full array grows. Zero is treated as one.
    pub fn with_expand_rate(mut self, expand_rate: usize) -> Self {
        self.expand_rate = expand_rate.max(1);
        self
    }

    /// Append `value` after the last written slot, growing the array when it is full.
    ///
    /// On allocation failure the array is left unchanged.
    pub fn push(&mut self, value: T) -> Result<()> {
        if self.end >= self.contents.len() {
            self.expand()?;
        }
        self.contents[self.end] = Some(value);
        self.end += 1;
        Ok(())
    }

    /// Remove and return the last written slot's value.
    pub fn pop(&mut self) -> Option<T> {
        if self.end == 0 {
            return None;
        }
        self.end -= 1;
        self.contents[self.end].take()
    }

    /// Get the value in slot `index`, or `None` if the slot is empty or out of bounds.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.contents.get(index)?.as_ref()
    }

    /// Mutable counterpart of [`get`](DArray::get).
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.contents.get_mut(index)?.as_mut()
    }

    /// Store `value` in slot `index` and return what the slot held before.
    ///
    /// Any slot below `capacity()` may be set; writing past `len()` extends it.
    pub fn set(&mut self, index: usize, value: T) -> Result<Option<T>> {
        let len = self.contents.len();
        let slot = self
            .contents
            .get_mut(index)
            .ok_or(Error::OutOfBounds { index, len })?;
        let old = slot.replace(value);
        if index >= self.end {
            self.end = index + 1;
        }
        Ok(old)
    }

    /// Empty slot `index` and return its value. Later slots are not shifted.
    #[inline]
    pub fn remove(&mut self, index: usize) -> Option<T> {
        self.contents.get_mut(index)?.take()
    }

    /// Value in slot 0.
    pub fn first(&self) -> Option<&T> {
        self.get(0)
    }

    /// Value in the last written slot.
    pub fn last(&self) -> Option<&T> {
        self.end.checked_sub(1).and_then(|i| self.get(i))
    }

    /// One past the highest written slot.
    #[inline]
    pub fn len(&self) -> usize {
        self.end
    }

    /// Returns true if no slot has been written since creation or the last clear.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end == 0
    }

    /// Number of allocated slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.contents.len()
    }

    /// Drop every stored value. Capacity is kept.
    pub fn clear(&mut self) {
        for slot in &mut self.contents[..self.end] {
            *slot = None;
        }
        self.end = 0;
    }

    /// Release slots past `len()`, keeping at least one.
    pub fn trim_to_size(&mut self) {
        let keep = self.end.max(1);
        self.contents.truncate(keep);
        self.contents.shrink_to_fit();
    }

    /// Iterate over the occupied slots below `len()`, in index order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.contents[..self.end].iter().flatten()
    }

    /// Mutable counterpart of [`iter`](DArray::iter).
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.contents[..self.end].iter_mut().flatten()
    }

    /// Wrap pre-built slots. `len()` ends after the last occupied one.
    pub(crate) fn from_slots(contents: Vec<Option<T>>) -> Self {
        let end = contents.iter().rposition(Option::is_some).map_or(0, |i| i + 1);
        Self {
            contents,
            end,
            expand_rate: DARRAY_DEFAULT_EXPAND_RATE,
        }
    }

    /// Value in slot `index`, filling an empty slot with `f()` first.
    ///
    /// Like [`set`](DArray::set), any slot below `capacity()` may be used and `len()` is
    /// extended to cover it.
    pub(crate) fn get_or_insert_with<F: FnOnce() -> T>(
        &mut self,
        index: usize,
        f: F,
    ) -> Result<&mut T> {
        let len = self.contents.len();
        let slot = self
            .contents
            .get_mut(index)
            .ok_or(Error::OutOfBounds { index, len })?;
        if index >= self.end {
            self.end = index + 1;
        }
        Ok(slot.get_or_insert_with(f))
    }

    /// Raw slots below `len()`.
    #[inline]
    pub(crate) fn slots(&self) -> &[Option<T>] {
        &self.contents[..self.end]
    }

    #[inline]
    pub(crate) fn slots_mut(&mut self) -> &mut [Option<T>] {
        &mut self.contents[..self.end]
    }

    fn expand(&mut self) -> Result<()> {
        let old_max = self.contents.len();
        let new_max = old_max
            .checked_add(self.expand_rate)
            .ok_or(Error::CapacityOverflow(old_max))?;
        try_reserve(&mut self.contents, self.expand_rate)?;
        self.contents.resize_with(new_max, || None);
        Ok(())
    }
}

impl<T> Default for DArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for DArray<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(&self.contents[..self.end]).finish()
    }
}
