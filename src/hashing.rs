//! Deterministic hashing. The hashers in the standard library are randomly seeded per
//! process, which would make the per-stream seeds in `crate::random` differ between runs.
//!
//! The `hash_str` free function is used by `crate::random::SeededRandomSource::seed_from`.
//! `HashMap` is an unseeded map used for the spatial grid. Create one with
//! `HashMap::default()`.

pub use rustc_hash::FxHashMap as HashMap;
use xxhash_rust::xxh3::xxh3_64;

/// A convenience method to compute the hash of a `&str`.
pub fn hash_str(data: &str) -> u64 {
    xxh3_64(data.as_bytes())
}
