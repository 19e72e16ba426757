//! A hasher which just proxies for the integer it's given.
//!
//! Meant for integer keys: hashing `n` yields `n`, so which bucket a key
//! lands in is plain arithmetic. That makes collisions easy to set up on
//! purpose, and it is a fair choice for keys that are already well spread,
//! such as ids. Anything that isn't a single integer gets its bytes folded
//! in little-endian order, which is a poor hash; don't use it for strings.

use std::hash::{BuildHasher, Hasher};

/// Proxies integers for themselves.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityHasher(u64);

impl Hasher for IdentityHasher {
    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes.iter().rev() {
            self.0 = (self.0 << 8) | *byte as u64;
        }
    }

    fn write_u8(&mut self, n: u8) {
        self.0 = n as u64;
    }

    fn write_u16(&mut self, n: u16) {
        self.0 = n as u64;
    }

    fn write_u32(&mut self, n: u32) {
        self.0 = n as u64;
    }

    fn write_u64(&mut self, n: u64) {
        self.0 = n;
    }

    fn write_usize(&mut self, n: usize) {
        self.0 = n as u64;
    }

    fn write_i32(&mut self, n: i32) {
        self.0 = n as u32 as u64;
    }

    fn write_i64(&mut self, n: i64) {
        self.0 = n as u64;
    }

    fn finish(&self) -> u64 {
        self.0
    }
}

/// Builds new IdentityHashers on demand.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuildIdentityHasher;

impl BuildHasher for BuildIdentityHasher {
    type Hasher = IdentityHasher;

    fn build_hasher(&self) -> Self::Hasher {
        IdentityHasher(0)
    }
}
