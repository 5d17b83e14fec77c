//! Faster (but not DoS-resistant) hashmap for counter caches
use farmhash;
use std::collections::HashMap;
use std::hash::{Hash, Hasher, BuildHasherDefault};

/// Chain farmhash over every write
///
/// farmhash isn't a streaming hash, so each write is hashed on its own and seeded with the
/// state so far. Entity keys are several strings long, hashing only the last write would send
/// every key to the same bucket.
pub struct FarmHashChain (u64);

impl Default for FarmHashChain {
    #[inline]
    fn default() -> FarmHashChain { FarmHashChain(0) }
}

impl Hasher for FarmHashChain {
    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        self.0 = farmhash::hash64_with_seed(bytes, self.0);
    }
}

pub type Farm = BuildHasherDefault<FarmHashChain>;
pub type FarmMap<X, Y> = HashMap<X, Y, Farm>;

pub fn new_farm<X: Hash+Eq, Y>() -> FarmMap<X, Y> {
    Default::default()
}
