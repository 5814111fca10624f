//! # SCRU128: Sortable, Clock and Random number-based Unique identifier
//!
//! SCRU128 ID is yet another attempt to supersede [UUID] for the users who need decentralized,
//! globally unique time-ordered identifiers. SCRU128 is inspired by [ULID] and [KSUID] and has
//! the following features:
//!
//! - 128-bit unsigned integer type
//! - Sortable by generation time (as integer and as text)
//! - 25-digit case-insensitive textual representation (Base36)
//! - 48-bit millisecond Unix timestamp that ensures useful life until year 10889
//! - Up to 281 trillion time-ordered but unpredictable unique IDs per millisecond
//! - 80-bit three-layer randomness for global uniqueness
//!
//! ```rust
//! # #[cfg(feature = "global_gen")]
//! # {
//! use scru128::{scru128, scru128_string};
//!
//! // generate a new identifier object
//! let x = scru128();
//! println!("{}", x); // e.g., "036z951mhjikzik2gsl81gr7l"
//! println!("{}", x.to_u128()); // as a 128-bit unsigned integer
//!
//! // generate a textual representation directly
//! println!("{}", scru128_string()); // e.g., "036z951mhzx67t63mq9xe6q0j"
//! # }
//! ```
//!
//! # Field and bit layout
//!
//! A SCRU128 ID is a 128-bit unsigned integer consisting of four terms:
//!
//! ```text
//! timestamp * 2^80 + counter_hi * 2^56 + counter_lo * 2^32 + entropy
//! ```
//!
//! Where:
//!
//! - The 48-bit `timestamp` field is dedicated to the Unix timestamp in milliseconds.
//! - The 24-bit `counter_hi` field is reset to a random number when the `timestamp` has moved
//!   forward by one second or more since the last renewal of `counter_hi`.
//! - The 24-bit `counter_lo` field is incremented by one for each new ID generated within the
//!   same `timestamp` and is reset to a random number whenever the `timestamp` moves forward.
//!   When `counter_lo` overflows, `counter_hi` is incremented.
//! - The 32-bit `entropy` field is filled with a cryptographically strong random number for
//!   each new ID.
//!
//! The textual representation is the 25-digit Base36 encoding of the 128-bit integer using the
//! digits `0-9a-z`. It is lowercase when encoded and case-insensitive when decoded.
//!
//! In the very rare circumstances where both `counter_lo` and `counter_hi` reach the maximum
//! value and can no more be incremented within the same timestamp, this library increments the
//! `timestamp`; therefore, the `timestamp` may have a larger value than that of the real-time
//! clock. This library goes on with such larger `timestamp` values caused by counter overflows
//! and system clock rollbacks as long as the difference from the system clock is small enough.
//! If the system clock moves back more than ten seconds, the default [`Scru128Generator::generate`]
//! resets the generator state and thus breaks the monotonic order of generated identifiers,
//! while [`Scru128Generator::generate_or_abort`] returns `None` instead.
//!
//! # Crate features
//!
//! Default features:
//!
//! - `std` enables, among others, the conversion to [`String`] and [`StdSystemTime`] as the
//!   default clock.
//! - `global_gen` (implies `std`) enables the process-wide default generator behind
//!   [`scru128()`] and [`scru128_string()`] as well as [`DefaultRng`].
//!
//! Optional features:
//!
//! - `serde` enables serialization/deserialization via serde.
//! - `tracing` reports generator resets and counter overflows via the `tracing` crate.
//!
//! See [SCRU128 Specification] for details.
//!
//! [UUID]: https://en.wikipedia.org/wiki/Universally_unique_identifier
//! [ULID]: https://github.com/ulid/spec
//! [KSUID]: https://github.com/segmentio/ksuid
//! [SCRU128 Specification]: https://github.com/scru128/spec

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod id;
pub use id::{FieldRangeError, ParseError, Scru128Id};

pub mod generator;
pub use generator::{
    ArgumentError, RandSource, RollbackPolicy, Scru128Generator, Status, StdSystemTime,
    TimeSource, DEFAULT_ROLLBACK_ALLOWANCE,
};

#[cfg(feature = "global_gen")]
pub use generator::default_rng::DefaultRng;

mod global_gen;
#[cfg(feature = "global_gen")]
pub use global_gen::{scru128, scru128_string};
