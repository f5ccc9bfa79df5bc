//! Storage contract.
//!
//! A storage is an address space of bits exposed through byte cursors. Readers produce the
//! bytes from the byte containing the requested bit to the end of the data. Writers
//! overwrite existing bytes in place and append past the current extent.
//!
//! The engine never owns a storage: it borrows one for the duration of a plan invocation.
//! Callers sharing a storage between threads must serialize access themselves.
use log::trace;
use sdexpr::{codec::to_bytes, value::Value};
use sdschema::bits::{ByteSink, ByteToBitSource};

use crate::{address::Address, utils::error::SdResult};

pub mod memory;

pub use memory::MemoryStorage;

pub trait Storage {
    /// Finite byte cursor starting at the byte containing the requested bit.
    type Reader<'a>: Iterator<Item = u8>
    where
        Self: 'a;

    /// Byte sink starting at the byte containing the requested bit.
    type Writer<'a>: ByteSink
    where
        Self: 'a;

    fn read_at(&self, address: Address) -> Self::Reader<'_>;

    /// Fails with [`SdError::StorageExhausted`](crate::SdError::StorageExhausted) if the
    /// storage cannot be extended up to `address`.
    fn write_at(&mut self, address: Address) -> SdResult<Self::Writer<'_>>;
}

/// Bit source positioned exactly at `address`.
///
/// Leading bits of the containing byte are skipped. Returns `None` if the storage ends
/// before `address`.
pub fn bits_at<S: Storage>(storage: &S, address: Address) -> Option<ByteToBitSource<S::Reader<'_>>> {
    let mut source = ByteToBitSource::new(storage.read_at(address));
    source.skip_bits(address.bit_in_byte()).then_some(source)
}

/// Write the plain bit stream of `value` at address zero.
///
/// Storage is left untouched if `value` cannot be serialized. No array length prefix is
/// emitted, see [`Plan::initialize_storage`](crate::plan::Plan::initialize_storage)
/// for the layout-directed form.
pub fn initialize_storage<S: Storage>(storage: &mut S, value: &Value) -> SdResult<()> {
    let bytes = to_bytes(value)?;
    storage.write_at(Address::ZERO)?.append_bytes(&bytes);
    trace!("Initialized storage with {}", value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use sdexpr::integer::make_unsigned_integer;

    use super::*;

    #[test]
    fn bits_at_skips_leading_bits() {
        let storage = MemoryStorage::from(vec![0b0001_0110u8, 0xFF]);
        let bits: Vec<bool> = bits_at(&storage, Address(3)).unwrap().take(6).collect();
        assert_eq!(bits, [true, false, true, true, false, true]);
        assert!(bits_at(&storage, Address(16)).is_some());
        assert!(bits_at(&storage, Address(17)).is_none());
        assert!(bits_at(&storage, Address(u64::MAX)).is_none());
    }

    #[test]
    fn initialize_overwrites_from_zero() {
        let mut storage = MemoryStorage::from(vec![0xFF; 4]);
        let value = Value::tuple([make_unsigned_integer(0x12u8), make_unsigned_integer(0x34u8)]);
        initialize_storage(&mut storage, &value).unwrap();
        assert_eq!(storage.as_bytes(), &[0x12, 0x34, 0xFF, 0xFF]);
    }

    #[test]
    fn initialize_rejects_closures() {
        let mut storage = MemoryStorage::new();
        let closure = Value::closure(sdexpr::expr::Expression::Argument, Value::Unit);
        let error = initialize_storage(&mut storage, &closure).unwrap_err();
        assert!(error.is_value());
    }

    #[test]
    fn failed_initialize_keeps_storage() {
        let mut storage = MemoryStorage::from(vec![1, 2, 3]);
        let closure = Value::closure(sdexpr::expr::Expression::Argument, Value::Unit);
        let value = Value::tuple([make_unsigned_integer(0xAAu16), closure]);
        assert!(initialize_storage(&mut storage, &value).is_err());
        assert_eq!(storage.as_bytes(), &[1, 2, 3]);
    }
}
