//! Value codec.
//!
//! [`serialize`] writes a value's bits in a fixed traversal order that does not depend on
//! any type: unit contributes nothing, a bit contributes exactly one bit, a tuple is the
//! concatenation of its elements and a variant contributes its active content only (no
//! discriminant). The reader therefore has to know the expected type from context, see
//! [`deserialize`].
//!
//! [`conforms_to_type`] is the structural precondition checked before serialization. It is
//! not enforced automatically.
use sdschema::{
    bits::{BitSink, BitsToByteSink},
    types::Type,
};
use smallvec::SmallVec;

use crate::{
    error::{Error, Result},
    value::Value,
};

/// Inline buffer of bits, spilling to the heap past 64 bits.
pub type BitBuffer = SmallVec<[bool; 64]>;

/// Append the bits of `value` to `sink`.
pub fn serialize<S: BitSink + ?Sized>(sink: &mut S, value: &Value) -> Result<()> {
    match value {
        Value::Unit => Ok(()),
        Value::Bit(bit) => {
            sink.append_bit(*bit);
            Ok(())
        }
        Value::Tuple(elements) => elements
            .iter()
            .try_for_each(|element| serialize(sink, element)),
        Value::Variant(content) => serialize(sink, content),
        Value::Closure { .. } => Err(Error::Unserializable),
    }
}

/// Serialize into an in-memory bit buffer.
pub fn to_bits(value: &Value) -> Result<BitBuffer> {
    let mut bits = BitBuffer::new();
    serialize(&mut bits, value)?;
    Ok(bits)
}

/// Serialize into bytes, padding the last byte with zero bits.
pub fn to_bytes(value: &Value) -> Result<Vec<u8>> {
    let mut sink = BitsToByteSink::new(Vec::new());
    serialize(&mut sink, value)?;
    Ok(sink.finish())
}

/// Read a value of type `expected` from a plain bit stream.
///
/// Only unit, bit and tuple types can be read back since the plain stream carries neither
/// array lengths nor variant discriminants. Returns `Ok(None)` if the source runs dry.
pub fn deserialize<I: Iterator<Item = bool>>(source: &mut I, expected: &Type) -> Result<Option<Value>> {
    match expected {
        Type::Unit => Ok(Some(Value::Unit)),
        Type::Bit => Ok(source.next().map(Value::Bit)),
        Type::Tuple(elements) => {
            let mut values = Vec::with_capacity(elements.len());
            for element in elements {
                match deserialize(source, element)? {
                    Some(value) => values.push(value),
                    None => return Ok(None),
                }
            }
            Ok(Some(Value::Tuple(values)))
        }
        Type::Variant(_) | Type::Array(_) | Type::Function => Err(Error::Undecodable {
            kind: expected.kind(),
        }),
    }
}

/// Structural match of `value` against `expected`.
///
/// A tuple additionally conforms to an array type when every element conforms to the
/// array's element type, since arrays and tuples share a physical representation. A variant
/// conforms when its content conforms to at least one possibility.
pub fn conforms_to_type(value: &Value, expected: &Type) -> bool {
    match (value, expected) {
        (Value::Unit, Type::Unit) | (Value::Bit(_), Type::Bit) => true,
        (Value::Tuple(values), Type::Tuple(types)) => {
            values.len() == types.len()
                && values
                    .iter()
                    .zip(types)
                    .all(|(value, ty)| conforms_to_type(value, ty))
        }
        (Value::Tuple(values), Type::Array(element)) => {
            values.iter().all(|value| conforms_to_type(value, element))
        }
        (Value::Variant(content), Type::Variant(possibilities)) => possibilities
            .iter()
            .any(|possibility| conforms_to_type(content, possibility)),
        (Value::Closure { .. }, Type::Function) => true,
        _ => false,
    }
}
