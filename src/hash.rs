//! Bob Jenkins' one-at-a-time hash as a [`Hasher`].
//!
//! Slower and weaker than the default `ahash` state but fully deterministic, which makes
//! bucket placement reproducible across runs.

use std::hash::{BuildHasherDefault, Hasher};

/// One-at-a-time hasher state.
#[derive(Clone, Copy, Debug, Default)]
pub struct OneAtATime {
    hash: u32,
}

impl Hasher for OneAtATime {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        let mut hash = self.hash;
        for &byte in bytes {
            hash = hash.wrapping_add(byte as u32);
            hash = hash.wrapping_add(hash << 10);
            hash ^= hash >> 6;
        }
        self.hash = hash;
    }

    #[inline]
    fn finish(&self) -> u64 {
        let mut hash = self.hash;
        hash = hash.wrapping_add(hash << 3);
        hash ^= hash >> 11;
        hash = hash.wrapping_add(hash << 15);
        hash as u64
    }
}

/// `BuildHasher` producing [`OneAtATime`] hashers.
pub type BuildOneAtATime = BuildHasherDefault<OneAtATime>;
