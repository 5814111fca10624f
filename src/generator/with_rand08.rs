//! Integration with `rand` (v0.8) crate.

use super::{RandSource, Scru128Generator, StdSystemTime};
use rand::RngCore;

/// An adapter that implements [`RandSource`] for [`RngCore`] types.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct Adapter<T>(/** The wrapped [`RngCore`] type. */ pub T);

impl<T: RngCore> RandSource for Adapter<T> {
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }
}

impl<T: RngCore> Scru128Generator<Adapter<T>> {
    /// Creates a generator object with a specified random number generator that implements
    /// [`RngCore`] from `rand` (v0.8) crate.
    ///
    /// The random number generator should be cryptographically strong and securely seeded.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use scru128::Scru128Generator;
    ///
    /// let mut g = Scru128Generator::with_rand08(rand::rngs::OsRng);
    /// println!("{}", g.generate());
    /// ```
    pub const fn with_rand08(rng: T) -> Self {
        Self::with_rand_and_time_sources(Adapter(rng), StdSystemTime)
    }
}

#[cfg(test)]
mod tests {
    use super::Scru128Generator;
    use rand::{rngs::StdRng, SeedableRng};

    /// Produces the same IDs from identically seeded random number generators
    #[test]
    fn produces_same_ids_from_identically_seeded_random_number_generators() {
        let mut g = Scru128Generator::with_rand08(StdRng::seed_from_u64(42));
        let mut h = Scru128Generator::with_rand08(StdRng::seed_from_u64(42));
        let ts = 0x0123_4567_89abu64;
        for i in 0..1_000u64 {
            assert_eq!(
                g.generate_or_reset_core(ts + i / 8, 10_000),
                h.generate_or_reset_core(ts + i / 8, 10_000)
            );
        }
    }
}
