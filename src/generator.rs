//! SCRU128 generator and related types.

#[cfg(not(feature = "std"))]
use core as std;

use std::fmt;

use crate::id::{MAX_COUNTER_HI, MAX_COUNTER_LO, MAX_TIMESTAMP};
use crate::Scru128Id;

#[cfg(feature = "global_gen")]
#[cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]
pub mod default_rng;

pub mod with_rand08;

#[cfg(test)]
mod tests;

/// The default timestamp rollback allowance (ten seconds).
pub const DEFAULT_ROLLBACK_ALLOWANCE: u64 = 10_000;

/// A trait that defines the minimum random number generator interface for [`Scru128Generator`].
///
/// Implementations must return cryptographically strong, uniformly distributed values; the
/// generator takes narrower bit widths from the low bits of a returned value.
pub trait RandSource {
    /// Returns the next random `u32`.
    fn next_u32(&mut self) -> u32;
}

/// A trait that defines the minimum system clock interface for [`Scru128Generator`].
pub trait TimeSource {
    /// Returns the current Unix timestamp in milliseconds.
    fn unix_ts_ms(&mut self) -> u64;
}

/// The default [`TimeSource`] that uses [`std::time::SystemTime`].
///
/// Without the `std` feature, this type exists only as a placeholder for the default type
/// parameter and does not implement [`TimeSource`].
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Default)]
pub struct StdSystemTime;

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
impl TimeSource for StdSystemTime {
    fn unix_ts_ms(&mut self) -> u64 {
        use std::time;
        time::SystemTime::now()
            .duration_since(time::UNIX_EPOCH)
            .expect("clock may have gone backwards")
            .as_millis() as u64
    }
}

/// Specifies what [`Scru128Generator::try_generate_core`] does upon significant timestamp
/// rollback.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Default)]
pub enum RollbackPolicy {
    /// Resets the generator and returns a new ID based on the given `timestamp`, breaking the
    /// increasing order of IDs.
    #[default]
    Reset,

    /// Returns `None` without changing the generator state.
    Abort,
}

/// Reports which branch of the generator state machine produced an ID.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub enum Status {
    /// The `timestamp` passed was greater than the previous one and was adopted.
    NewTimestamp,

    /// The previous `timestamp` was reused and `counter_lo` was incremented.
    CounterLoInc,

    /// `counter_lo` overflowed and `counter_hi` was incremented.
    CounterHiInc,

    /// Both counters overflowed and the previous `timestamp` was incremented.
    TimestampInc,

    /// The `timestamp` moved backward beyond the rollback allowance, or the counters were
    /// exhausted at the maximum `timestamp`, and the generator was reset.
    ClockRollback,
}

/// Represents a SCRU128 ID generator that encapsulates the monotonic counters and other internal
/// states.
///
/// This type provides the interface to customize the random number generator, system clock, and
/// clock rollback handling of a SCRU128 generator. It also helps control the scope of guaranteed
/// order of the generated IDs. The following example guarantees the process-wide (cross-thread)
/// monotonicity using Rust's standard synchronization mechanism.
///
/// # Examples
///
/// ```rust
/// use rand::rngs::OsRng;
/// use scru128::Scru128Generator;
/// use std::{sync, thread};
///
/// let g = sync::Arc::new(sync::Mutex::new(Scru128Generator::with_rand08(OsRng)));
/// thread::scope(|s| {
///     for i in 0..4 {
///         let g = sync::Arc::clone(&g);
///         s.spawn(move || {
///             for _ in 0..8 {
///                 println!("{} by thread {}", g.lock().unwrap().generate(), i);
///                 thread::yield_now();
///             }
///         });
///     }
/// });
/// ```
///
/// # Generator functions
///
/// The generator comes with five different methods that generate a SCRU128 ID:
///
/// | Flavor                     | Timestamp | On big clock rewind      |
/// | -------------------------- | --------- | ------------------------ |
/// | [`generate`]               | Now       | Resets generator         |
/// | [`generate_or_abort`]      | Now       | Returns `None`           |
/// | [`generate_or_reset_core`] | Argument  | Resets generator         |
/// | [`generate_or_abort_core`] | Argument  | Returns `None`           |
/// | [`try_generate_core`]      | Argument  | Per [`RollbackPolicy`]   |
///
/// All of them return a monotonically increasing ID by reusing the previous `timestamp` even if
/// the one provided is smaller than the immediately preceding ID's. However, when such a clock
/// rollback is considered significant (by default, more than ten seconds):
///
/// 1.  `generate` (or_reset) methods reset the generator and return a new ID based on the given
///     `timestamp`, breaking the increasing order of IDs.
/// 2.  `or_abort` variants abort and return `None` immediately.
///
/// The `core` functions offer low-level primitives to customize the behavior. Unlike the other
/// methods, [`try_generate_core`] reports invalid arguments as an [`ArgumentError`] instead of
/// panicking, and it also reports the [`Status`] of the state machine.
///
/// [`generate`]: Scru128Generator::generate
/// [`generate_or_abort`]: Scru128Generator::generate_or_abort
/// [`generate_or_reset_core`]: Scru128Generator::generate_or_reset_core
/// [`generate_or_abort_core`]: Scru128Generator::generate_or_abort_core
/// [`try_generate_core`]: Scru128Generator::try_generate_core
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct Scru128Generator<R, T = StdSystemTime> {
    timestamp: u64,
    counter_hi: u32,
    counter_lo: u32,

    /// The timestamp at the last renewal of `counter_hi` field.
    ts_counter_hi: u64,

    /// The random number generator used by the generator.
    rng: R,

    /// The system clock used by the generator.
    time_source: T,
}

impl<R, T> Scru128Generator<R, T> {
    /// Creates a generator object with specified random number generator and system clock.
    ///
    /// The random number generator should be cryptographically strong and securely seeded.
    pub const fn with_rand_and_time_sources(rng: R, time_source: T) -> Self {
        Self {
            timestamp: 0,
            counter_hi: 0,
            counter_lo: 0,
            ts_counter_hi: 0,
            rng,
            time_source,
        }
    }
}

impl<R: RandSource, T: TimeSource> Scru128Generator<R, T> {
    /// Generates a new SCRU128 ID object from the current `timestamp`, or resets the generator
    /// upon significant timestamp rollback.
    ///
    /// See the [`Scru128Generator`] type documentation for the description.
    pub fn generate(&mut self) -> Scru128Id {
        let timestamp = self.time_source.unix_ts_ms();
        self.generate_or_reset_core(timestamp, DEFAULT_ROLLBACK_ALLOWANCE)
    }

    /// Generates a new SCRU128 ID object from the current `timestamp`, or returns `None` upon
    /// significant timestamp rollback.
    ///
    /// See the [`Scru128Generator`] type documentation for the description.
    pub fn generate_or_abort(&mut self) -> Option<Scru128Id> {
        let timestamp = self.time_source.unix_ts_ms();
        self.generate_or_abort_core(timestamp, DEFAULT_ROLLBACK_ALLOWANCE)
    }
}

impl<R: RandSource, T> Scru128Generator<R, T> {
    /// Generates a new SCRU128 ID object from the `timestamp` passed, or resets the generator
    /// upon significant timestamp rollback.
    ///
    /// See the [`Scru128Generator`] type documentation for the description.
    ///
    /// The `rollback_allowance` parameter specifies the amount of `timestamp` rollback that is
    /// considered significant. A suggested value is `10_000` (milliseconds).
    ///
    /// # Panics
    ///
    /// Panics if `timestamp` is not a 48-bit positive integer or if `rollback_allowance` is
    /// larger than the maximum 48-bit integer.
    pub fn generate_or_reset_core(
        &mut self,
        timestamp: u64,
        rollback_allowance: u64,
    ) -> Scru128Id {
        match self.try_generate_core(timestamp, rollback_allowance, RollbackPolicy::Reset) {
            Ok(Some((value, _))) => value,
            Ok(None) => unreachable!("reset policy never aborts"),
            Err(err) => panic!("{}", err),
        }
    }

    /// Generates a new SCRU128 ID object from the `timestamp` passed, or returns `None` upon
    /// significant timestamp rollback.
    ///
    /// See the [`Scru128Generator`] type documentation for the description.
    ///
    /// The `rollback_allowance` parameter specifies the amount of `timestamp` rollback that is
    /// considered significant. A suggested value is `10_000` (milliseconds).
    ///
    /// # Panics
    ///
    /// Panics if `timestamp` is not a 48-bit positive integer or if `rollback_allowance` is
    /// larger than the maximum 48-bit integer.
    pub fn generate_or_abort_core(
        &mut self,
        timestamp: u64,
        rollback_allowance: u64,
    ) -> Option<Scru128Id> {
        match self.try_generate_core(timestamp, rollback_allowance, RollbackPolicy::Abort) {
            Ok(value) => value.map(|(value, _)| value),
            Err(err) => panic!("{}", err),
        }
    }

    /// Generates a new SCRU128 ID object from the `timestamp` passed, handling significant
    /// timestamp rollback as specified by `policy`, and returns it together with the [`Status`]
    /// describing how the internal counters were updated.
    ///
    /// The `rollback_allowance` parameter specifies the amount of `timestamp` rollback that is
    /// considered significant. A rollback by exactly `rollback_allowance` is still tolerated.
    ///
    /// # Errors
    ///
    /// Returns an [`ArgumentError`] if `timestamp` is not a 48-bit positive integer or if
    /// `rollback_allowance` is larger than the maximum 48-bit integer.
    ///
    /// Running out of both counters at the maximum 48-bit `timestamp` is not an error. It is
    /// handled like a significant rollback: `policy` decides whether to reset or to return
    /// `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use scru128::{RollbackPolicy, Scru128Generator, Status};
    ///
    /// let mut g = Scru128Generator::with_rand08(rand::rngs::OsRng);
    /// let (x, status) = g
    ///     .try_generate_core(0x0123_4567_89ab, 10_000, RollbackPolicy::Abort)?
    ///     .unwrap();
    /// assert_eq!(status, Status::NewTimestamp);
    /// assert_eq!(x.timestamp(), 0x0123_4567_89ab);
    ///
    /// let y = g.try_generate_core(0x0123_4567_89ab - 10_001, 10_000, RollbackPolicy::Abort)?;
    /// assert!(y.is_none());
    ///
    /// let (z, status) = g
    ///     .try_generate_core(0x0123_4567_89ab - 10_001, 10_000, RollbackPolicy::Reset)?
    ///     .unwrap();
    /// assert_eq!(status, Status::ClockRollback);
    /// assert!(z < x);
    /// # Ok::<(), scru128::ArgumentError>(())
    /// ```
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip(self)))]
    pub fn try_generate_core(
        &mut self,
        timestamp: u64,
        rollback_allowance: u64,
        policy: RollbackPolicy,
    ) -> Result<Option<(Scru128Id, Status)>, ArgumentError> {
        if timestamp == 0 || timestamp > MAX_TIMESTAMP {
            return Err(ArgumentError {
                kind: ArgumentErrorKind::Timestamp,
            });
        } else if rollback_allowance > MAX_TIMESTAMP {
            return Err(ArgumentError {
                kind: ArgumentErrorKind::RollbackAllowance,
            });
        }

        let status = match self.advance_counters(timestamp, rollback_allowance) {
            Some(status) => status,
            None if policy == RollbackPolicy::Abort => return Ok(None),
            None => {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    timestamp,
                    prev_timestamp = self.timestamp,
                    rollback_allowance,
                    "could not move forward from previous timestamp; resetting generator"
                );

                // reset state and resume
                self.timestamp = 0;
                self.ts_counter_hi = 0;
                let status = self.advance_counters(timestamp, rollback_allowance);
                debug_assert_eq!(status, Some(Status::NewTimestamp));
                Status::ClockRollback
            }
        };

        if self.timestamp - self.ts_counter_hi >= 1_000 || self.ts_counter_hi == 0 {
            self.ts_counter_hi = self.timestamp;
            self.counter_hi = self.rng.next_u32() & MAX_COUNTER_HI;
        }

        let value = Scru128Id::from_fields(
            self.timestamp,
            self.counter_hi,
            self.counter_lo,
            self.rng.next_u32(),
        );
        Ok(Some((value, status)))
    }

    /// Moves `timestamp` and the counters forward, returning `None` without changing the state
    /// if `timestamp` went backwards beyond `rollback_allowance` or if the state is already at
    /// the largest possible ID prefix.
    fn advance_counters(&mut self, timestamp: u64, rollback_allowance: u64) -> Option<Status> {
        if timestamp > self.timestamp {
            self.timestamp = timestamp;
            self.counter_lo = self.rng.next_u32() & MAX_COUNTER_LO;
            Some(Status::NewTimestamp)
        } else if timestamp + rollback_allowance >= self.timestamp {
            // go on with previous timestamp if new one is not much smaller
            if self.counter_lo < MAX_COUNTER_LO {
                self.counter_lo += 1;
                Some(Status::CounterLoInc)
            } else if self.counter_hi < MAX_COUNTER_HI {
                self.counter_lo = 0;
                self.counter_hi += 1;
                Some(Status::CounterHiInc)
            } else if self.timestamp < MAX_TIMESTAMP {
                // increment timestamp at counter overflow
                self.counter_lo = self.rng.next_u32() & MAX_COUNTER_LO;
                self.counter_hi = 0;
                self.timestamp += 1;

                #[cfg(feature = "tracing")]
                tracing::debug!(
                    timestamp = self.timestamp,
                    "counters exhausted; incrementing timestamp"
                );
                Some(Status::TimestampInc)
            } else {
                // no room left above the maximum timestamp
                None
            }
        } else {
            // abort if clock went backwards to unbearable extent
            None
        }
    }
}

/// Supports operations as an infinite iterator that produces a new SCRU128 ID object for each
/// call of `next()`.
///
/// # Examples
///
/// ```rust
/// use scru128::Scru128Generator;
///
/// Scru128Generator::with_rand08(rand::thread_rng())
///     .enumerate()
///     .skip(4)
///     .take(4)
///     .for_each(|(i, e)| println!("[{}] {}", i, e));
/// ```
impl<R: RandSource, T: TimeSource> Iterator for Scru128Generator<R, T> {
    type Item = Scru128Id;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.generate())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl<R: RandSource, T: TimeSource> std::iter::FusedIterator for Scru128Generator<R, T> {}

/// Error passing an out-of-range `timestamp` or `rollback_allowance` to
/// [`Scru128Generator::try_generate_core`].
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ArgumentError {
    kind: ArgumentErrorKind,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
enum ArgumentErrorKind {
    Timestamp,
    RollbackAllowance,
}

impl fmt::Display for ArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ArgumentErrorKind::Timestamp => {
                write!(f, "`timestamp` must be a 48-bit positive integer")
            }
            ArgumentErrorKind::RollbackAllowance => {
                write!(f, "`rollback_allowance` out of reasonable range")
            }
        }
    }
}

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
impl std::error::Error for ArgumentError {}
