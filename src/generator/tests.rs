use super::*;

impl Scru128Generator<()> {
    pub(crate) fn for_testing() -> Scru128Generator<impl RandSource, impl TimeSource> {
        Scru128Generator::with_rand_and_time_sources(new_rand_source(), new_time_source())
    }
}

fn new_rand_source() -> impl RandSource {
    struct MockRandSource;
    impl RandSource for MockRandSource {
        fn next_u32(&mut self) -> u32 {
            rand::random()
        }
    }
    MockRandSource
}

fn new_time_source() -> impl TimeSource {
    #[cfg(feature = "std")]
    return StdSystemTime;

    #[cfg(not(feature = "std"))]
    {
        struct MockTimeSource(u64);
        impl TimeSource for MockTimeSource {
            fn unix_ts_ms(&mut self) -> u64 {
                self.0 += 8;
                self.0
            }
        }
        MockTimeSource(0x0123_4567_89abu64)
    }
}

/// A [`RandSource`] that returns the same value every time.
#[derive(Clone, Eq, PartialEq, Debug)]
pub(super) struct ConstRand(pub u32);

impl RandSource for ConstRand {
    fn next_u32(&mut self) -> u32 {
        self.0
    }
}

/// A [`TimeSource`] that returns whatever timestamp the test sets.
#[derive(Clone, Eq, PartialEq, Debug)]
pub(super) struct ManualClock(pub u64);

impl TimeSource for ManualClock {
    fn unix_ts_ms(&mut self) -> u64 {
        self.0
    }
}
