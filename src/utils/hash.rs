//! Unified hashing utilities using FxHash.
//!
//! Uses `rustc_hash::FxHasher` for:
//! - Fast, deterministic hashing (optimized for small data)
//! - No extra dependencies (rustc_hash already used for FxHashMap)
//!
//! Config hot-reload compares fingerprints of file content, so an unchanged
//! file never swaps the live config.

use rustc_hash::FxHasher;
use std::hash::Hasher;

/// Compute 64-bit hash from byte data.
#[inline]
pub fn compute<T: AsRef<[u8]> + ?Sized>(data: &T) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(data.as_ref());
    hasher.finish()
}
