//! Schema algebra and physical layout for bit-packed datasets.
//!
//! - [`types`]: the static schema ([`types::Type`]) describing a dataset once.
//! - [`layout`]: the layout compiler deriving the exact bit-packing of a type.
//! - [`bits`]: MSB-first bit framing over byte sinks and byte iterators.
//!
//! Example
//! ```
//! use sdschema::{layout::{calculate, Layout}, types::Type};
//!
//! let table = Type::array(Type::tuple([Type::Bit, Type::unsigned_integer(7)]));
//! let layout = calculate(&table).unwrap();
//! assert_eq!(layout, Layout::Array(Box::new(Layout::Bitset(8))));
//! ```
pub mod bits;
pub mod error;
pub mod layout;
pub mod types;

pub use error::Error;
