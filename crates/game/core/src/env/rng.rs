//! RNG oracle for deterministic shuffling.
//!
//! All RNG implementations must be deterministic: the same seed always
//! produces the same value. Replay depends on it.

/// RNG oracle for deterministic random number generation.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Random value in `[min, max]` inclusive.
    fn range(&self, seed: u64, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        let range = max - min + 1;
        min + (self.next_u32(seed) % range)
    }
}

/// PCG-XSH-RR generator: 64-bit state, 32-bit output.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// XSH-RR output permutation.
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::pcg_output(Self::pcg_step(seed))
    }
}

/// Mixes the game seed with per-draw context into a single seed.
///
/// * `game_seed` - fixed at game creation
/// * `clock` - logical timestamp of the action being applied
/// * `salt` - distinguishes independent draws within one action (team, shuffle count)
/// * `step` - index within a multi-step draw such as a shuffle
pub fn compute_seed(game_seed: u64, clock: u64, salt: u32, step: u32) -> u64 {
    let mut hash = game_seed;
    hash ^= clock.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (salt as u64).wrapping_mul(0x517cc1b727220a95);
    hash ^= (step as u64).wrapping_mul(0x85ebca6b);

    // avalanche
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;
    hash
}

/// Fisher-Yates shuffle driven by the oracle.
pub fn shuffle<T>(rng: &dyn RngOracle, seed: u64, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let step_seed = compute_seed(seed, i as u64, 0, 0);
        let j = rng.range(step_seed, 0, i as u32) as usize;
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_value() {
        let rng = PcgRng;
        assert_eq!(rng.next_u32(99), rng.next_u32(99));
        assert_ne!(compute_seed(1, 0, 0, 0), compute_seed(1, 1, 0, 0));
    }

    #[test]
    fn shuffle_is_a_deterministic_permutation() {
        let rng = PcgRng;
        let mut a: Vec<u32> = (0..20).collect();
        let mut b = a.clone();
        shuffle(&rng, 1234, &mut a);
        shuffle(&rng, 1234, &mut b);
        assert_eq!(a, b);

        let mut sorted = a.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
        assert_ne!(a, (0..20).collect::<Vec<_>>());
    }
}
