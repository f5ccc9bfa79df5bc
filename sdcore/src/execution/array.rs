//! Element access for arrays stored in storage.
//!
//! All functions report missing bytes and address overflow as `Ok(None)`.
use sdexpr::value::Value;
use sdschema::layout::{ARRAY_LENGTH_PREFIX_BITS, Layout};

use super::pseudo::ArrayAccessor;
use crate::{
    address::{Address, element_address},
    storage::{Storage, bits_at},
    utils::error::{SdError, SdResult},
};

/// Read a 64-bit big-endian number from a bit source.
pub fn deserialize_address<I: Iterator<Item = bool>>(bits: &mut I) -> Option<u64> {
    (0..ARRAY_LENGTH_PREFIX_BITS).try_fold(0u64, |acc, _| Some((acc << 1) | bits.next()? as u64))
}

/// Number of elements of the array, or `None` if the count cannot be read.
pub fn array_length<S: Storage>(array: &ArrayAccessor<'_, S>) -> Option<u64> {
    let mut bits = bits_at(array.begin.storage, array.begin.address)?;
    deserialize_address(&mut bits)
}

/// Bounds-checked element access.
pub fn array_get<S: Storage>(array: &ArrayAccessor<'_, S>, index: u64) -> SdResult<Option<Value>> {
    let Some(length) = array_length(array) else {
        return Ok(None);
    };
    if index >= length {
        return Err(SdError::IndexOutOfRange { index, length });
    }
    element_at(array, index)
}

/// Decode element `index` without checking it against the element count.
pub fn element_at<S: Storage>(array: &ArrayAccessor<'_, S>, index: u64) -> SdResult<Option<Value>> {
    let Layout::Bitset(width) = *array.element_layout else {
        return Err(SdError::NotImplemented("decoding array elements that are not bitsets"));
    };
    let Ok(address) = element_address(array.begin.address, width, index) else {
        return Ok(None);
    };
    Ok(access_value(array.begin.storage, address, width))
}

/// Read `width` bits at `address` as a tuple of bits.
pub fn access_value<S: Storage>(storage: &S, address: Address, width: u64) -> Option<Value> {
    let mut bits = bits_at(storage, address)?;
    let elements = (0..width)
        .map(|_| bits.next().map(Value::Bit))
        .collect::<Option<Vec<_>>>()?;
    Some(Value::Tuple(elements))
}

/// Decode every element of the array.
pub fn materialize<S: Storage>(array: &ArrayAccessor<'_, S>) -> SdResult<Option<Value>> {
    let Some(length) = array_length(array) else {
        return Ok(None);
    };
    let mut elements = Vec::new();
    for index in 0..length {
        match element_at(array, index)? {
            Some(element) => elements.push(element),
            None => return Ok(None),
        }
    }
    Ok(Some(Value::Tuple(elements)))
}
