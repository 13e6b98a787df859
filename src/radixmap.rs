//! RadixMap: a fixed-size map from `u32` keys to `u32` values, kept sorted by key.
//!
//! Every [`add`](RadixMap::add) re-sorts the live range with a four pass LSD byte radix
//! sort, so [`find`](RadixMap::find) can always binary search. Adds cost O(n), lookups
//! O(log n).

use std::fmt;

use crate::error::{try_reserve, Error, Result};

// ================================================================================================
// ELEMENT
// ================================================================================================

/// A key/value pair packed into one `u64`.
///
/// The key occupies the low 32 bits (little-endian bytes 0..=3) and the value the high 32
/// bits (bytes 4..=7). Sorting only ever looks at the key bytes.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Element(u64);

impl Element {
    /// Pack `key` and `value`.
    #[inline]
    pub const fn new(key: u32, value: u32) -> Self {
        Self(key as u64 | ((value as u64) << 32))
    }

    /// Reinterpret a raw packed word.
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The packed word.
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn key(self) -> u32 {
        self.0 as u32
    }

    #[inline]
    pub const fn value(self) -> u32 {
        (self.0 >> 32) as u32
    }

    #[inline(always)]
    fn set_key(&mut self, key: u32) {
        self.0 = (self.0 & !(u32::MAX as u64)) | key as u64;
    }

    /// Byte `offset` of the little-endian representation.
    #[inline(always)]
    fn byte(self, offset: usize) -> u8 {
        (self.0 >> (offset * 8)) as u8
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("key", &self.key())
            .field("value", &self.value())
            .finish()
    }
}

// ================================================================================================
// RADIXMAP STRUCTURE
// ================================================================================================

/// Sorted array of [`Element`]s with a same-size scratch buffer for sorting.
pub struct RadixMap {
    contents: Box<[Element]>,
    temp: Box<[Element]>,
    end: usize,
}

impl RadixMap {
    /// Create a map with room for `max` elements, one of which is held back.
    ///
    /// Fails with [`Error::InvalidCapacity`] for zero and [`Error::Alloc`] when the buffers
    /// cannot be reserved.
    pub fn new(max: usize) -> Result<Self> {
        if max == 0 {
            return Err(Error::InvalidCapacity(max));
        }
        Ok(Self {
            contents: zeroed(max)?,
            temp: zeroed(max)?,
            end: 0,
        })
    }

    /// Add a pair and re-sort.
    ///
    /// Fails with [`Error::Full`] once `max - 1` elements are live. Duplicate keys are
    /// accepted; equal keys keep their insertion order.
    pub fn add(&mut self, key: u32, value: u32) -> Result<()> {
        let max = self.max();
        if self.end + 1 >= max {
            tracing::warn!(max, key, "radix map is full, add refused");
            return Err(Error::Full { max });
        }
        self.contents[self.end] = Element::new(key, value);
        self.end += 1;
        self.sort();
        Ok(())
    }

    /// Sort the live elements by key.
    ///
    /// Four stable counting passes over key bytes 0..=3, alternating between the two
    /// buffers so the final pass lands back in `contents`.
    pub fn sort(&mut self) {
        let end = self.end;
        let (contents, temp) = (&mut self.contents[..end], &mut self.temp[..end]);
        radix_pass(0, contents, temp);
        radix_pass(1, temp, contents);
        radix_pass(2, contents, temp);
        radix_pass(3, temp, contents);
    }

    /// Binary search for `key`.
    pub fn find(&self, key: u32) -> Option<&Element> {
        self.find_index(key).map(|i| &self.contents[i])
    }

    /// Index of an element with `key`, usable with [`delete`](RadixMap::delete).
    pub fn find_index(&self, key: u32) -> Option<usize> {
        self.as_slice()
            .binary_search_by_key(&key, |e| e.key())
            .ok()
    }

    /// Value stored under `key`.
    pub fn get(&self, key: u32) -> Option<u32> {
        self.find(key).map(|e| e.value())
    }

    /// Delete the live element at `index` and return it.
    ///
    /// The element's key becomes the `u32::MAX` sentinel and it is moved behind every other
    /// live element, then the live range shrinks by one. The remaining elements stay sorted.
    pub fn delete(&mut self, index: usize) -> Result<Element> {
        let end = self.end;
        if index >= end {
            return Err(Error::OutOfBounds { index, len: end });
        }
        let removed = self.contents[index];
        self.contents[index].set_key(u32::MAX);
        if end > 1 {
            self.contents[index..end].rotate_left(1);
        }
        self.end -= 1;
        Ok(removed)
    }

    /// Find `key`, delete it, and return its value.
    pub fn remove(&mut self, key: u32) -> Option<u32> {
        let index = self.find_index(key)?;
        self.delete(index).ok().map(Element::value)
    }

    /// Number of live elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.end
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end == 0
    }

    /// Allocated size. At most `max() - 1` elements can be live.
    #[inline]
    pub fn max(&self) -> usize {
        self.contents.len()
    }

    /// The live elements, sorted by key.
    #[inline]
    pub fn as_slice(&self) -> &[Element] {
        &self.contents[..self.end]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.as_slice().iter()
    }
}

impl fmt::Debug for RadixMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RadixMap")
            .field("max", &self.max())
            .field("end", &self.end)
            .field("contents", &self.as_slice())
            .finish()
    }
}

impl<'a> IntoIterator for &'a RadixMap {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ================================================================================================
// UTILITY FUNCTIONS
// ================================================================================================

/// One stable counting sort pass on byte `offset`, scattering `source` into `dest`.
fn radix_pass(offset: usize, source: &[Element], dest: &mut [Element]) {
    debug_assert_eq!(source.len(), dest.len());

    // count occurrences of every byte value
    let mut count = [0usize; 256];
    for e in source {
        count[e.byte(offset) as usize] += 1;
    }

    // turn counts into starting positions
    let mut total = 0;
    for c in count.iter_mut() {
        let n = *c;
        *c = total;
        total += n;
    }

    for &e in source {
        let slot = &mut count[e.byte(offset) as usize];
        dest[*slot] = e;
        *slot += 1;
    }
}

fn zeroed(len: usize) -> Result<Box<[Element]>> {
    let mut buf = Vec::new();
    try_reserve(&mut buf, len)?;
    buf.resize(len, Element::default());
    Ok(buf.into_boxed_slice())
}
