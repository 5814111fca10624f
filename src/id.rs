#[cfg(not(feature = "std"))]
use core as std;

use fstr::FStr;
use std::{fmt, str};

/// The maximum value of 48-bit `timestamp` field.
pub(crate) const MAX_TIMESTAMP: u64 = 0xffff_ffff_ffff;

/// The maximum value of 24-bit `counter_hi` field.
pub(crate) const MAX_COUNTER_HI: u32 = 0xff_ffff;

/// The maximum value of 24-bit `counter_lo` field.
pub(crate) const MAX_COUNTER_LO: u32 = 0xff_ffff;

/// Digit characters used in the Base36 notation.
const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Represents a SCRU128 ID and provides converters and comparison operators.
///
/// The packed 128-bit unsigned integer is the only state; the field accessors, the canonical
/// string representation and the total order are all derived from it.
///
/// # Examples
///
/// ```rust
/// use scru128::Scru128Id;
///
/// let x = "036z968fu2tugy7svkfznewkk".parse::<Scru128Id>()?;
/// assert_eq!(x.to_string(), "036z968fu2tugy7svkfznewkk");
///
/// let y = Scru128Id::from_u128(0x017fa1de51a50fd992d082fa20ca6f64);
/// assert_eq!(y.to_string(), "036z968fu2tugy7svkfznewkk");
/// assert_eq!(x, y);
/// # Ok::<(), scru128::ParseError>(())
/// ```
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct Scru128Id(u128);

impl Scru128Id {
    /// The smallest possible SCRU128 ID (`0000000000000000000000000`).
    pub const MIN: Self = Self(u128::MIN);

    /// The largest possible SCRU128 ID (`f5lxx1zz5pnorynqglhzmsp33`).
    pub const MAX: Self = Self(u128::MAX);

    /// Creates an object from a 128-bit unsigned integer.
    pub const fn from_u128(int_value: u128) -> Self {
        Self(int_value)
    }

    /// Returns the 128-bit unsigned integer representation.
    pub const fn to_u128(self) -> u128 {
        self.0
    }

    /// Creates an object from a 16-byte big-endian byte array.
    pub const fn from_bytes(value: [u8; 16]) -> Self {
        Self(u128::from_be_bytes(value))
    }

    /// Returns the big-endian byte array representation.
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0.to_be_bytes()
    }

    /// Creates an object from field values, returning an error if any argument is larger than
    /// the bit width of the corresponding field.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use scru128::Scru128Id;
    ///
    /// let x = Scru128Id::try_from_fields(0x0123_4567_89ab, 0x12_3456, 0xab_cdef, 0xdead_beef)?;
    /// assert_eq!(x.to_string(), "02fapl4n16zf2wbva4cgtyfan");
    ///
    /// assert!(Scru128Id::try_from_fields(1 << 48, 0, 0, 0).is_err());
    /// # Ok::<(), scru128::FieldRangeError>(())
    /// ```
    pub const fn try_from_fields(
        timestamp: u64,
        counter_hi: u32,
        counter_lo: u32,
        entropy: u32,
    ) -> Result<Self, FieldRangeError> {
        if timestamp > MAX_TIMESTAMP {
            Err(FieldRangeError { field: "timestamp" })
        } else if counter_hi > MAX_COUNTER_HI {
            Err(FieldRangeError { field: "counter_hi" })
        } else if counter_lo > MAX_COUNTER_LO {
            Err(FieldRangeError { field: "counter_lo" })
        } else {
            Ok(Self(
                (timestamp as u128) << 80
                    | (counter_hi as u128) << 56
                    | (counter_lo as u128) << 32
                    | entropy as u128,
            ))
        }
    }

    /// Creates an object from field values.
    ///
    /// # Panics
    ///
    /// Panics if any argument is larger than the bit width of the corresponding field. Use
    /// [`Scru128Id::try_from_fields`] to handle the error instead.
    pub const fn from_fields(
        timestamp: u64,
        counter_hi: u32,
        counter_lo: u32,
        entropy: u32,
    ) -> Self {
        match Self::try_from_fields(timestamp, counter_hi, counter_lo, entropy) {
            Ok(value) => value,
            Err(_) => panic!("invalid field value"),
        }
    }

    /// Returns the 48-bit `timestamp` field value.
    pub const fn timestamp(&self) -> u64 {
        (self.0 >> 80) as u64
    }

    /// Returns the 24-bit `counter_hi` field value.
    pub const fn counter_hi(&self) -> u32 {
        (self.0 >> 56) as u32 & MAX_COUNTER_HI
    }

    /// Returns the 24-bit `counter_lo` field value.
    pub const fn counter_lo(&self) -> u32 {
        (self.0 >> 32) as u32 & MAX_COUNTER_LO
    }

    /// Returns the 32-bit `entropy` field value.
    pub const fn entropy(&self) -> u32 {
        self.0 as u32
    }

    /// Returns the 25-digit canonical string representation stored in a stack-allocated
    /// string type that can be dereferenced as `str` and [`Display`](fmt::Display)ed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use scru128::Scru128Id;
    ///
    /// let x = "036Z968FU2TUGY7SVKFZNEWKK".parse::<Scru128Id>()?;
    /// let y = x.encode();
    /// assert_eq!(&y as &str, "036z968fu2tugy7svkfznewkk");
    /// assert_eq!(format!("{}", y), "036z968fu2tugy7svkfznewkk");
    /// # Ok::<(), scru128::ParseError>(())
    /// ```
    pub fn encode(&self) -> FStr<25> {
        let mut buffer = [b'0'; 25];
        let mut n = self.0;
        for e in buffer.iter_mut().rev() {
            *e = DIGITS[(n % 36) as usize];
            n /= 36;
        }
        debug_assert!(n == 0 && buffer.is_ascii());
        // SAFETY: every byte is taken from the ASCII digit table
        unsafe { FStr::from_bytes_unchecked(buffer) }
    }
}

impl fmt::Debug for Scru128Id {
    /// Shows the 128-bit value in hexadecimal so that the field boundaries line up.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scru128Id({:#034x})", self.0)
    }
}

impl fmt::Display for Scru128Id {
    /// Returns the 25-digit canonical string representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl str::FromStr for Scru128Id {
    type Err = ParseError;

    /// Creates an object from a 25-digit string representation.
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        if src.len() != 25 {
            return Err(ParseError {
                kind: ParseErrorKind::InvalidLength { n_bytes: src.len() },
            });
        }

        let mut int_value = 0u128;
        for (position, e) in src.bytes().enumerate() {
            let digit = char::from(e).to_digit(36).ok_or(ParseError {
                kind: ParseErrorKind::InvalidDigit { position },
            })?;
            int_value = int_value
                .checked_mul(36)
                .and_then(|n| n.checked_add(digit as u128))
                .ok_or(ParseError {
                    kind: ParseErrorKind::OutOfU128Range,
                })?;
        }
        Ok(Self(int_value))
    }
}

impl TryFrom<&str> for Scru128Id {
    type Error = ParseError;

    fn try_from(src: &str) -> Result<Self, Self::Error> {
        src.parse()
    }
}

impl From<u128> for Scru128Id {
    fn from(src: u128) -> Self {
        Self::from_u128(src)
    }
}

impl From<Scru128Id> for u128 {
    fn from(src: Scru128Id) -> Self {
        src.to_u128()
    }
}

impl From<[u8; 16]> for Scru128Id {
    fn from(src: [u8; 16]) -> Self {
        Self::from_bytes(src)
    }
}

impl From<Scru128Id> for [u8; 16] {
    fn from(src: Scru128Id) -> Self {
        src.to_bytes()
    }
}

/// Error parsing an invalid string representation of SCRU128 ID.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ParseError {
    kind: ParseErrorKind,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
enum ParseErrorKind {
    InvalidLength { n_bytes: usize },
    InvalidDigit { position: usize },
    OutOfU128Range,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not parse string as SCRU128 ID: ")?;
        match self.kind {
            ParseErrorKind::InvalidLength { n_bytes } => {
                write!(f, "invalid length: {} bytes (expected 25)", n_bytes)
            }
            ParseErrorKind::InvalidDigit { position } => {
                write!(f, "invalid digit at {}", position)
            }
            ParseErrorKind::OutOfU128Range => write!(f, "out of 128-bit value range"),
        }
    }
}

/// Error creating a SCRU128 ID from a field value that does not fit in the field's bit width.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct FieldRangeError {
    field: &'static str,
}

impl fmt::Display for FieldRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid field value: `{}` out of range", self.field)
    }
}

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
mod std_ext {
    use super::{FieldRangeError, ParseError, Scru128Id};

    impl From<Scru128Id> for String {
        fn from(src: Scru128Id) -> Self {
            src.to_string()
        }
    }

    impl TryFrom<String> for Scru128Id {
        type Error = ParseError;

        fn try_from(src: String) -> Result<Self, Self::Error> {
            src.parse()
        }
    }

    impl std::error::Error for ParseError {}

    impl std::error::Error for FieldRangeError {}
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::{fmt, Scru128Id};
    use serde::{de, Deserializer, Serializer};

    impl serde::Serialize for Scru128Id {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                serializer.serialize_str(&self.encode())
            } else {
                serializer.serialize_bytes(&self.to_bytes())
            }
        }
    }

    impl<'de> serde::Deserialize<'de> for Scru128Id {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            if deserializer.is_human_readable() {
                deserializer.deserialize_str(VisitorImpl)
            } else {
                deserializer.deserialize_bytes(VisitorImpl)
            }
        }
    }

    struct VisitorImpl;

    impl<'de> de::Visitor<'de> for VisitorImpl {
        type Value = Scru128Id;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "a SCRU128 ID representation")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            value.parse::<Self::Value>().map_err(de::Error::custom)
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            <[u8; 16]>::try_from(value)
                .map(Self::Value::from)
                .map_err(|_| de::Error::invalid_length(value.len(), &"16 bytes"))
        }
    }

}
