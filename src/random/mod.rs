//! Seedable uniform random sources.
//!
//! A run draws from named streams rather than from one shared generator. Each stream is
//! created from the run's base seed plus a hash of the stream's name, so two runs with the
//! same seed and parameters see exactly the same draws in the same order.
mod macros;

pub use macros::define_rng;

use log::trace;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::hashing::hash_str;

/// Names an independent random stream. Use [`define_rng!`] to create one.
pub trait RngId: Copy + Clone {
    fn get_name() -> &'static str;
}

/// A deterministic source of uniform draws.
///
/// The engine is generic over this trait so tests can substitute a scripted source.
pub trait RandomSource {
    /// Creates the source for the stream `stream` of a run seeded with `base_seed`.
    fn seed_from(base_seed: u64, stream: &str) -> Self
    where
        Self: Sized;

    /// Returns an integer drawn uniformly from `[0, max)`.
    ///
    /// # Panics
    ///
    /// Panics if `max == 0`.
    fn next_int_less_than(&mut self, max: u64) -> u64;

    /// Returns `true` with probability `threshold / 100`.
    fn next_percent_succeeds(&mut self, threshold: u8) -> bool {
        self.next_int_less_than(100) < u64::from(threshold)
    }

    /// Creates the source for the stream identified by `I`.
    fn for_stream<I: RngId>(base_seed: u64, _rng_id: I) -> Self
    where
        Self: Sized,
    {
        Self::seed_from(base_seed, I::get_name())
    }
}

/// The default [`RandomSource`], backed by `rand`'s `SmallRng`.
#[derive(Debug, Clone)]
pub struct SeededRandomSource {
    rng: SmallRng,
}

impl RandomSource for SeededRandomSource {
    fn seed_from(base_seed: u64, stream: &str) -> Self {
        trace!("creating new RNG (seed={}) for stream {}", base_seed, stream);
        let seed_offset = hash_str(stream);
        SeededRandomSource {
            rng: SmallRng::seed_from_u64(base_seed.wrapping_add(seed_offset)),
        }
    }

    fn next_int_less_than(&mut self, max: u64) -> u64 {
        assert!(max > 0, "next_int_less_than requires a positive bound");
        self.rng.random_range(0..max)
    }
}
