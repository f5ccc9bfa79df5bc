//! Types module
//!
//! The schema algebra describing the shape of a dataset. A [`Type`] is built once by
//! the schema author and then shared read-only by the layout compiler and the plan
//! compiler. Types are trees: every composite variant owns its children.
//!
//! Integers are not primitive. An unsigned integer of `n` bits is simply a tuple of `n`
//! [`Type::Bit`] elements, most-significant bit first (see [`Type::unsigned_integer`]).
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{EnumIs, EnumTryAs};

/// A static schema node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIs, EnumTryAs)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Type {
    /// The type with a single, zero-sized inhabitant.
    Unit,

    /// A single bit.
    Bit,

    /// An ordered, fixed-arity product of element types.
    Tuple(Vec<Type>),

    /// A sum of possibilities. The wire format carries no discriminant.
    Variant(Vec<Type>),

    /// A homogeneous sequence whose length is only known at runtime.
    Array(Box<Type>),

    /// A function. Functions have no physical representation.
    Function,
}

impl Type {
    /// Build a tuple type from its elements.
    pub fn tuple<I: IntoIterator<Item = Type>>(elements: I) -> Self {
        Type::Tuple(elements.into_iter().collect())
    }

    /// Build a variant type from its possibilities.
    pub fn variant<I: IntoIterator<Item = Type>>(possibilities: I) -> Self {
        Type::Variant(possibilities.into_iter().collect())
    }

    /// Build an array type over `element`.
    pub fn array(element: Type) -> Self {
        Type::Array(Box::new(element))
    }

    /// An unsigned integer of `bits` bits, represented as a tuple of bits.
    ///
    /// ```rust
    /// # use sdschema::types::Type;
    /// let byte = Type::unsigned_integer(8);
    /// assert!(matches!(byte, Type::Tuple(ref bits) if bits.len() == 8));
    /// ```
    pub fn unsigned_integer(bits: usize) -> Self {
        Type::Tuple(vec![Type::Bit; bits])
    }

    /// The optional type `Unit | possibility`.
    pub fn optional(possibility: Type) -> Self {
        Type::Variant(vec![Type::Unit, possibility])
    }

    /// Short, human readable name of the outer constructor.
    pub fn kind(&self) -> &'static str {
        match self {
            Type::Unit => "unit",
            Type::Bit => "bit",
            Type::Tuple(_) => "tuple",
            Type::Variant(_) => "variant",
            Type::Array(_) => "array",
            Type::Function => "function",
        }
    }
}

fn fmt_list(f: &mut std::fmt::Formatter<'_>, items: &[Type], separator: &str) -> std::fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Unit => write!(f, "()"),
            Type::Bit => write!(f, "bit"),
            Type::Tuple(elements) => {
                if !elements.is_empty() && elements.iter().all(Type::is_bit) {
                    return write!(f, "u{}", elements.len());
                }
                write!(f, "(")?;
                fmt_list(f, elements, ", ")?;
                write!(f, ")")
            }
            Type::Variant(possibilities) => {
                write!(f, "<")?;
                fmt_list(f, possibilities, " | ")?;
                write!(f, ">")
            }
            Type::Array(element) => write!(f, "[{}]", element),
            Type::Function => write!(f, "fn"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsigned_integer_is_tuple_of_bits() {
        let ty = Type::unsigned_integer(3);
        assert_eq!(ty, Type::Tuple(vec![Type::Bit, Type::Bit, Type::Bit]));
        assert!(ty.is_tuple());
    }

    #[test]
    fn optional_has_unit_first() {
        let ty = Type::optional(Type::Bit);
        assert_eq!(ty, Type::Variant(vec![Type::Unit, Type::Bit]));
    }

    #[test]
    fn display_shapes() {
        let ty = Type::tuple([
            Type::unsigned_integer(8),
            Type::array(Type::optional(Type::Bit)),
            Type::Function,
        ]);
        assert_eq!(ty.to_string(), "(u8, [<() | bit>], fn)");
        assert_eq!(Type::Tuple(vec![]).to_string(), "()");
    }
}
