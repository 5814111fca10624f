//! Default random number generator used by the process-wide generator.

use super::{RandSource, Scru128Generator, StdSystemTime};
use rand::rngs::{adapter::ReseedingRng, OsRng};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha12Core;
use std::fmt;

/// The default random number generator used by [`Scru128Generator`].
///
/// Currently, `DefaultRng` uses [`ChaCha12Core`] that is initially seeded and subsequently
/// reseeded by [`OsRng`] every 64 kiB of random data using the [`ReseedingRng`] wrapper. It is
/// the same strategy as that employed by [`rand::rngs::ThreadRng`]. This may change in future
/// releases.
pub struct DefaultRng(ReseedingRng<ChaCha12Core, OsRng>);

impl Default for DefaultRng {
    fn default() -> Self {
        let core =
            ChaCha12Core::from_rng(OsRng).expect("scru128: could not initialize DefaultRng");
        Self(ReseedingRng::new(core, 1024 * 64, OsRng))
    }
}

impl RandSource for DefaultRng {
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }
}

impl fmt::Debug for DefaultRng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultRng").finish()
    }
}

impl Scru128Generator<DefaultRng> {
    /// Creates a generator object with the default random number generator.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use scru128::Scru128Generator;
    ///
    /// let mut g = Scru128Generator::new();
    /// println!("{}", g.generate());
    /// ```
    pub fn new() -> Self {
        Self::with_rand_and_time_sources(Default::default(), StdSystemTime)
    }
}

#[cfg(test)]
mod tests {
    use super::{DefaultRng, Scru128Generator};
    use crate::RandSource;

    /// Sets random bits to 1 at about 50% probability
    #[test]
    fn sets_random_bits_to_1_at_about_50_percent_probability() {
        const N_SAMPLES: usize = 100_000;
        let mut rng = DefaultRng::default();
        let mut bins = [0u32; 32];
        for _ in 0..N_SAMPLES {
            let mut num = rng.next_u32();
            for e in bins.iter_mut() {
                *e += num & 1;
                num >>= 1;
            }
        }

        // set margin based on binom dist 99.999% confidence interval
        let margin = 4.417173 * (0.5 * 0.5 / N_SAMPLES as f64).sqrt();
        for (i, e) in bins.iter().enumerate() {
            let p = *e as f64 / N_SAMPLES as f64;
            assert!((p - 0.5).abs() < margin, "random bit {}: {}", i, p);
        }
    }

    /// Creates independent generators
    #[test]
    fn creates_independent_generators() {
        let mut g = Scru128Generator::new();
        let mut h: Scru128Generator<DefaultRng> = Default::default();
        let ts = 0x0123_4567_89abu64;
        assert_ne!(
            g.generate_or_reset_core(ts, 10_000),
            h.generate_or_reset_core(ts, 10_000)
        );
    }
}
