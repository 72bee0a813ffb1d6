//! Bounded pseudo-random values for fields no upstream is authoritative about.

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

pub const CLAPS_MIN: u32 = 50;
pub const CLAPS_MAX: u32 = 550;
pub const RESPONSES_MAX: u32 = 20;

pub struct Filler {
    rng: StdRng,
}

impl Filler {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform value in `lo..hi`; returns `lo` for an empty range.
    pub fn range(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        self.rng.random_range(lo..hi)
    }

    /// Clap count in `[CLAPS_MIN, CLAPS_MAX)`.
    pub fn claps(&mut self) -> u32 {
        self.range(CLAPS_MIN, CLAPS_MAX)
    }

    /// Response count in `[0, RESPONSES_MAX)`.
    pub fn responses(&mut self) -> u32 {
        self.range(0, RESPONSES_MAX)
    }

    pub fn chance(&mut self, probability: f64) -> bool {
        self.rng.random_bool(probability.clamp(0.0, 1.0))
    }

    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claps_and_responses_stay_in_bounds() {
        let mut filler = Filler::from_entropy();
        for _ in 0..1_000 {
            let claps = filler.claps();
            assert!((CLAPS_MIN..CLAPS_MAX).contains(&claps));
            assert!(filler.responses() < RESPONSES_MAX);
        }
    }

    #[test]
    fn seeded_fillers_repeat() {
        let mut a = Filler::seeded(7);
        let mut b = Filler::seeded(7);
        let xs: Vec<u32> = (0..16).map(|_| a.range(0, 1_000)).collect();
        let ys: Vec<u32> = (0..16).map(|_| b.range(0, 1_000)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn degenerate_inputs_do_not_panic() {
        let mut filler = Filler::seeded(1);
        assert_eq!(filler.range(5, 5), 5);
        assert!(!filler.chance(-1.0));
        assert!(filler.chance(2.0));
        assert_eq!(filler.pick::<u8>(&[]), None);
        assert_eq!(filler.pick(&["only"]), Some(&"only"));
    }
}
