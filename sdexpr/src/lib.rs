//! Runtime values and the expression language evaluated against packed storage.
//!
//! - [`value`]: runtime data ([`value::Value`]) including closures.
//! - [`integer`]: unsigned integers as big-endian bit tuples.
//! - [`codec`]: type-independent bit serialization and structural type conformance.
//! - [`expr`]: the immutable expression tree ([`expr::Expression`]).
//!
//! Values and expressions live in the same crate because they are mutually recursive: a
//! literal expression holds a value and a closure value holds an expression.
pub mod codec;
pub mod error;
pub mod expr;
pub mod integer;
pub mod value;

pub use error::Error;

pub mod prelude {
    //! Convenient re-exports for end users.
    pub use crate::codec::{conforms_to_type, serialize};
    pub use crate::expr::Expression;
    pub use crate::integer::{make_unsigned_integer, parse_unsigned_integer};
    pub use crate::value::Value;
}
