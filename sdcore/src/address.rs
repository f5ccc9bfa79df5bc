//! Bit addresses and overflow-checked address arithmetic.
//!
//! An [`Address`] is an unsigned 64-bit bit offset into storage. Every offset computation
//! goes through [`Address::checked_add`] / [`checked_mul`] and yields [`Overflow`] instead of
//! wrapping. Callers turn an overflow into "no result" rather than reading out of bounds.
use sdschema::layout::ARRAY_LENGTH_PREFIX_BITS;
use thiserror::Error;

/// Marker for an address computation that left the 64-bit address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error("address arithmetic overflowed the 64-bit address space")]
pub struct Overflow;

/// Result of an overflow-checked computation.
pub type OverflowOr<T> = Result<T, Overflow>;

/// A bit offset into storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address(pub u64);

impl Address {
    pub const ZERO: Address = Address(0);

    #[inline]
    pub const fn from_bytes(bytes: u64) -> OverflowOr<Address> {
        match bytes.checked_mul(8) {
            Some(bits) => Ok(Address(bits)),
            None => Err(Overflow),
        }
    }

    #[inline]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Index of the byte containing this bit.
    #[inline]
    pub const fn byte_index(self) -> u64 {
        self.0 / 8
    }

    /// Position of this bit inside its byte, counted from the most significant bit.
    #[inline]
    pub const fn bit_in_byte(self) -> u64 {
        self.0 % 8
    }

    #[inline]
    pub const fn is_byte_aligned(self) -> bool {
        self.bit_in_byte() == 0
    }

    #[inline]
    pub fn checked_add(self, bits: u64) -> OverflowOr<Address> {
        self.0.checked_add(bits).map(Address).ok_or(Overflow)
    }
}

/// `left * right`, or [`Overflow`].
#[inline]
pub fn checked_mul(left: u64, right: u64) -> OverflowOr<u64> {
    left.checked_mul(right).ok_or(Overflow)
}

/// Address of element `index` of an array stored at `begin` whose elements are
/// `element_bits` wide: `begin + 64 + element_bits * index`.
pub fn element_address(begin: Address, element_bits: u64, index: u64) -> OverflowOr<Address> {
    begin
        .checked_add(ARRAY_LENGTH_PREFIX_BITS)?
        .checked_add(checked_mul(element_bits, index)?)
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "@{}:{}", self.byte_index(), self.bit_in_byte())
    }
}
