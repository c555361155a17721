use rand::rngs::StdRng;
use rand::SeedableRng;

/// Deterministic RNG for reproducible random test inputs.
pub(crate) fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}
