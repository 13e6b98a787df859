//! bucketmap_rs: a chained hash map with split-rehash doubling, a radix-sorted `u32` map,
//! and the two small stores they are built on.
//!
//! - [`HashMap`]: power-of-two bucket array (a [`DArray`]) whose buckets are [`LinkedList`]
//!   chains. Doubling splits each chain on one bit of the stored hash; no key is rehashed.
//! - [`RadixMap`]: packed `u32` key/value pairs re-sorted by a four pass LSD radix sort on
//!   every add, looked up by binary search.
//!
//! All containers are single-threaded owned values. Fallible operations return
//! [`Result`] with the crate [`Error`]; a plain miss is `None` or `false`.
//!
//! ```
//! use bucketmap_rs::{HashMap, RadixMap};
//!
//! let mut map = HashMap::new();
//! assert_eq!(map.insert("a", 1)?, None);
//! assert_eq!(map.insert("a", 2)?, Some(1));
//! assert_eq!(map.get("a"), Some(&2));
//!
//! let mut radix = RadixMap::new(8)?;
//! radix.add(3, 300)?;
//! radix.add(1, 100)?;
//! assert_eq!(radix.get(1), Some(100));
//! # Ok::<(), bucketmap_rs::Error>(())
//! ```

pub mod darray;
pub mod error;
pub mod hash;
pub mod hashmap;
pub mod linkedlist;
pub mod radixmap;

pub use darray::DArray;
pub use error::{Error, Result};
pub use hash::{BuildOneAtATime, OneAtATime};
pub use hashmap::HashMap;
pub use linkedlist::LinkedList;
pub use radixmap::{Element, RadixMap};
