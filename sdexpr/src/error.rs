use strum::{EnumIs, EnumTryAs};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIs, EnumTryAs, Error)]
pub enum Error {
    /// Closures carry code, not data, and have no bit representation.
    #[error("A closure value cannot be serialized. Only unit, bit, tuple and variant values have a bit representation.")]
    Unserializable,

    /// The tuple holds a non-bit element or is wider than the requested integer.
    #[error("The tuple is not an unsigned integer: it holds {length} elements for a width of {width} bits, or contains a non-bit element.")]
    NotAnInteger { length: usize, width: u32 },

    /// The type cannot be read back from a plain bit stream.
    #[error("A `{kind}` value cannot be decoded from a plain bit stream without layout information.")]
    Undecodable { kind: &'static str },
}

pub type Result<T> = std::result::Result<T, Error>;
