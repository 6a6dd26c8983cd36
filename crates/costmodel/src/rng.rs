//! Deterministic PRNG seeding for the disk-cost working-set sampling.
//!
//! The source system seeds Python's `random.Random` with the literal string
//! `"cost model coolness"` on every `CostModel` construction, so repeated
//! calls to `overallCost` with the same design draw the identical sequence
//! of "does this query hit the working set?" coin flips (§9 "Deterministic
//! PRNG"). We can't reproduce Mersenne Twister's string-seeding algorithm
//! bit-for-bit and don't need to — determinism, not cross-language parity,
//! is the actual contract (§8 property 1). `SEED_PHRASE` is hashed down to a
//! `u64` with `xxh3` and handed to `StdRng::seed_from_u64`.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// The literal seed phrase from the source `CostModel.__init__`.
pub const SEED_PHRASE: &str = "cost model coolness";

/// A fresh RNG seeded identically every time, matching the per-call
/// reseeding the source system performs.
pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(xxhash_rust::xxh3::xxh3_64(SEED_PHRASE.as_bytes()))
}
