//! Deterministic, splittable randomness (spec §5 "Global randomness").
//!
//! A single engine-scoped seed fans out into one independent stream per
//! sequence via a SplitMix64 mixer, so that two runs with the same seed,
//! config, and generator always produce byte-identical output regardless of
//! the order in which sequences happen to be polled.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Mixes a 64-bit value per the public-domain SplitMix64 algorithm.
///
/// Used only to derive sub-stream seeds from `(run_seed, stream_tag)`; the
/// actual instruction-level randomness is drawn from a `ChaCha8Rng` seeded
/// with the mixed output.
#[must_use]
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Derives a sub-stream seed for `stream_tag` under the given run seed.
///
/// Counter-based: calling this twice with the same `(run_seed, stream_tag)`
/// always yields the same seed, independent of call order or how many other
/// streams have been derived.
#[must_use]
pub fn sub_seed(run_seed: u64, stream_tag: u64) -> u64 {
    splitmix64(run_seed ^ splitmix64(stream_tag))
}

/// Constructs a fresh, independent PRNG stream for `stream_tag` under `run_seed`.
#[must_use]
pub fn stream(run_seed: u64, stream_tag: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(sub_seed(run_seed, stream_tag))
}

#[cfg(test)]
mod tests {
    use super::sub_seed;

    #[test]
    fn same_inputs_give_same_seed() {
        assert_eq!(sub_seed(42, 7), sub_seed(42, 7));
    }

    #[test]
    fn different_tags_give_different_seeds() {
        assert_ne!(sub_seed(42, 1), sub_seed(42, 2));
    }

    #[test]
    fn different_run_seeds_give_different_seeds() {
        assert_ne!(sub_seed(1, 7), sub_seed(2, 7));
    }
}
