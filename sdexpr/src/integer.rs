//! Unsigned integers as bit tuples.
//!
//! An unsigned integer of width `w` is a tuple of `w` bits, most-significant bit first.
//! [`make_unsigned_integer`] always produces the full width of the Rust integer type;
//! [`parse_unsigned_integer`] accepts any tuple of bits no wider than the target type.
use crate::{
    error::{Error, Result},
    value::Value,
};

mod sealed {
    pub trait Sealed {}
}

/// Rust unsigned integer types usable with the bit-tuple helpers.
pub trait UnsignedInteger: sealed::Sealed + Copy {
    const BITS: u32;

    fn to_u64(self) -> u64;

    /// Caller guarantees `value` fits in `Self::BITS` bits.
    fn from_u64(value: u64) -> Self;
}

macro_rules! unsigned_integer {
    ($($ty:ty),*) => {
        $(
            impl sealed::Sealed for $ty {}

            impl UnsignedInteger for $ty {
                const BITS: u32 = <$ty>::BITS;

                #[inline]
                fn to_u64(self) -> u64 {
                    self as u64
                }

                #[inline]
                fn from_u64(value: u64) -> Self {
                    value as $ty
                }
            }
        )*
    };
}

unsigned_integer! { u8, u16, u32, u64 }

/// Encode `value` as a big-endian tuple of exactly `T::BITS` bits.
///
/// ```rust
/// # use sdexpr::{integer::make_unsigned_integer, value::Value};
/// let two = make_unsigned_integer(2u8);
/// assert_eq!(two.to_string(), "0b00000010");
/// ```
pub fn make_unsigned_integer<T: UnsignedInteger>(value: T) -> Value {
    let value = value.to_u64();
    Value::Tuple(
        (0..T::BITS)
            .rev()
            .map(|shift| Value::Bit((value >> shift) & 1 != 0))
            .collect(),
    )
}

/// Decode a big-endian tuple of bits.
///
/// Fails with [`Error::NotAnInteger`] if an element is not a bit or the tuple is wider
/// than `T`.
pub fn parse_unsigned_integer<T: UnsignedInteger>(elements: &[Value]) -> Result<T> {
    let not_an_integer = || Error::NotAnInteger {
        length: elements.len(),
        width: T::BITS,
    };

    if elements.len() > T::BITS as usize {
        return Err(not_an_integer());
    }

    let mut result = 0u64;
    for element in elements {
        let Value::Bit(bit) = element else {
            return Err(not_an_integer());
        };
        result = (result << 1) | (*bit as u64);
    }
    Ok(T::from_u64(result))
}

impl Value {
    /// Decode this value as an unsigned integer if it is a tuple of bits.
    pub fn to_unsigned_integer<T: UnsignedInteger>(&self) -> Result<T> {
        match self {
            Value::Tuple(elements) => parse_unsigned_integer(elements),
            _ => Err(Error::NotAnInteger {
                length: 0,
                width: T::BITS,
            }),
        }
    }
}
