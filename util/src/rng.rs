use std::hash::{Hash, Hasher};

use rand::prelude::*;
use rand_xorshift::XorShiftRng;

/// Good default concrete rng.
pub type GameRng = XorShiftRng;

/// Construct a random number generator seeded by a hashable value.
///
/// Good for turning user-typed seed strings into a deterministic game
/// generator.
pub fn srng(seed: &(impl Hash + ?Sized)) -> GameRng {
    let mut h = crate::FastHasher::default();
    seed.hash(&mut h);
    XorShiftRng::seed_from_u64(h.finish())
}

pub trait RngExt {
    /// Return true with probability `1 / n`.
    ///
    /// Zero is never picked, `one_chance_in(0)` is always false.
    fn one_chance_in(&mut self, n: usize) -> bool;

    /// Uniform bonus roll in `0..variation`, zero for non-positive
    /// variations.
    fn variation(&mut self, variation: i32) -> i32;
}

impl<T: Rng + ?Sized> RngExt for T {
    fn one_chance_in(&mut self, n: usize) -> bool {
        if n == 0 {
            return false;
        }
        self.gen_range(0..n) == 0
    }

    fn variation(&mut self, variation: i32) -> i32 {
        if variation <= 0 {
            0
        } else {
            self.gen_range(0..variation)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn seeding_is_stable() {
        let mut a = srng("squeamish ossifrage");
        let mut b = srng("squeamish ossifrage");
        for _ in 0..16 {
            assert_eq!(a.gen_range(0..1000), b.gen_range(0..1000));
        }
    }

    #[test]
    fn one_chance_in_edges() {
        let mut rng = srng(&1);
        assert!((0..100).all(|_| !rng.one_chance_in(0)));
        assert!((0..100).all(|_| rng.one_chance_in(1)));
    }

    #[test]
    fn variation_range() {
        let mut rng = srng(&2);
        assert_eq!(rng.variation(0), 0);
        assert_eq!(rng.variation(-5), 0);
        for _ in 0..1000 {
            let x = rng.variation(10);
            assert!((0..10).contains(&x));
        }
    }
}
