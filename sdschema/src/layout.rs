//! Layout compiler
//!
//! A [`Layout`] is the exact physical bit-packing derived from a [`Type`]. The compiler
//! folds fixed-width fields into a single [`Layout::Bitset`]: a tuple whose elements all
//! fold to bitsets becomes one bitset whose length is the exact sum of the element
//! lengths (no padding, no alignment). As soon as one element is not a bitset, or the
//! running length would overflow the 64-bit address width, the tuple keeps its
//! structure as a [`Layout::Tuple`].
//!
//! Arrays never fold since their element count is runtime data. Physically, an array is a
//! 64-bit big-endian element count followed by the packed elements.
use log::debug;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{EnumIs, EnumTryAs};

use crate::{
    error::{Error, Result},
    types::Type,
};

/// Number of bits used by the element count written in front of every array.
pub const ARRAY_LENGTH_PREFIX_BITS: u64 = 64;

/// Physical representation of a type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIs, EnumTryAs)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Layout {
    /// Zero-width layout. [`calculate`] never produces it since units have no physical
    /// representation.
    Unit,

    /// Structured sequence of element layouts that could not be folded.
    Tuple(Vec<Layout>),

    /// Length-prefixed sequence of elements sharing one layout.
    Array(Box<Layout>),

    /// A fixed-width run of packed bits.
    Bitset(u64),

    /// One layout per possibility. No discriminant is stored.
    Variant(Vec<Layout>),
}

impl Layout {
    /// Static width of this layout in bits.
    ///
    /// Returns `None` for arrays and variants, whose width depends on runtime data, and
    /// for tuples whose summed width does not fit in 64 bits.
    pub fn size_in_bits(&self) -> Option<u64> {
        match self {
            Layout::Unit => Some(0),
            Layout::Bitset(length) => Some(*length),
            Layout::Tuple(elements) => elements
                .iter()
                .try_fold(0u64, |acc, element| acc.checked_add(element.size_in_bits()?)),
            Layout::Array(_) | Layout::Variant(_) => None,
        }
    }

    /// Element layout of an array layout.
    pub fn element(&self) -> Option<&Layout> {
        match self {
            Layout::Array(element) => Some(element),
            _ => None,
        }
    }
}

impl std::fmt::Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn list(f: &mut std::fmt::Formatter<'_>, items: &[Layout], sep: &str) -> std::fmt::Result {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(sep)?;
                }
                write!(f, "{}", item)?;
            }
            Ok(())
        }

        match self {
            Layout::Unit => write!(f, "unit"),
            Layout::Bitset(length) => write!(f, "bits{}", length),
            Layout::Tuple(elements) => {
                write!(f, "(")?;
                list(f, elements, ", ")?;
                write!(f, ")")
            }
            Layout::Array(element) => write!(f, "[{}]", element),
            Layout::Variant(possibilities) => {
                write!(f, "<")?;
                list(f, possibilities, " | ")?;
                write!(f, ">")
            }
        }
    }
}

/// Calculate the layout of a root type.
///
/// Fails with [`Error::UnsupportedLayout`] as soon as a unit or a function appears, at
/// any depth. Consequently an optional type has no layout.
///
/// ```rust
/// # use sdschema::{layout::{calculate, Layout}, types::Type};
/// let pair = Type::tuple([Type::unsigned_integer(8), Type::unsigned_integer(8)]);
/// assert_eq!(calculate(&pair).unwrap(), Layout::Bitset(16));
/// ```
pub fn calculate(root: &Type) -> Result<Layout> {
    let layout = calculate_nested(root)?;
    debug!("Calculated layout {} for type {}", layout, root);
    Ok(layout)
}

fn calculate_nested(ty: &Type) -> Result<Layout> {
    match ty {
        Type::Unit | Type::Function => Err(Error::UnsupportedLayout { kind: ty.kind() }),
        Type::Bit => Ok(Layout::Bitset(1)),
        Type::Tuple(elements) => {
            // `None` once folding has been abandoned.
            let mut bits = Some(0u64);
            let mut element_layouts = Vec::with_capacity(elements.len());
            for element in elements {
                let element_layout = calculate_nested(element)?;
                bits = match (bits, &element_layout) {
                    (Some(acc), Layout::Bitset(length)) => acc.checked_add(*length),
                    _ => None,
                };
                element_layouts.push(element_layout);
            }

            Ok(match bits {
                Some(length) => Layout::Bitset(length),
                None => Layout::Tuple(element_layouts),
            })
        }
        Type::Variant(possibilities) => {
            // TODO: fold variants whose possibilities are all bitsets of equal length
            let layouts = possibilities
                .iter()
                .map(calculate_nested)
                .collect::<Result<Vec<_>>>()?;
            Ok(Layout::Variant(layouts))
        }
        Type::Array(element) => Ok(Layout::Array(Box::new(calculate_nested(element)?))),
    }
}
