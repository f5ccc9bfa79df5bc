//! Runtime values
//!
//! A [`Value`] is a runtime datum matching some [`Type`](sdschema::types::Type). Values
//! are trees with exclusively owned children. They are never implicitly shared: code that
//! needs the same value in two places clones it explicitly.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{EnumIs, EnumTryAs};

use crate::expr::Expression;

/// A runtime datum.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIs, EnumTryAs)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Value {
    Unit,
    Bit(bool),
    Tuple(Vec<Value>),

    /// The active possibility of a variant. Which possibility is active is not recorded.
    Variant(Box<Value>),

    /// A function body paired with the value it captured when it was built.
    Closure {
        body: Box<Expression>,
        bound: Box<Value>,
    },
}

impl Value {
    /// Build a tuple value from its elements.
    pub fn tuple<I: IntoIterator<Item = Value>>(elements: I) -> Self {
        Value::Tuple(elements.into_iter().collect())
    }

    /// The present case of an optional.
    pub fn some(content: Value) -> Self {
        Value::Variant(Box::new(content))
    }

    /// The absent case of an optional.
    pub fn none() -> Self {
        Value::Variant(Box::new(Value::Unit))
    }

    /// Pair a body with a captured value.
    pub fn closure(body: Expression, bound: Value) -> Self {
        Value::Closure {
            body: Box::new(body),
            bound: Box::new(bound),
        }
    }

    /// Returns `true` if a closure appears anywhere in this value.
    pub fn contains_closure(&self) -> bool {
        match self {
            Value::Unit | Value::Bit(_) => false,
            Value::Tuple(elements) => elements.iter().any(Value::contains_closure),
            Value::Variant(content) => content.contains_closure(),
            Value::Closure { .. } => true,
        }
    }

    /// Interpret this value as a boolean.
    ///
    /// A bit and a single-bit tuple are booleans; everything else is not.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bit(bit) => Some(*bit),
            Value::Tuple(elements) => match elements.as_slice() {
                [Value::Bit(bit)] => Some(*bit),
                _ => None,
            },
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(bit: bool) -> Self {
        Value::Bit(bit)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Unit => write!(f, "()"),
            Value::Bit(bit) => write!(f, "{}", *bit as u8),
            Value::Tuple(elements) => {
                // Bit strings are printed compactly.
                if !elements.is_empty() && elements.iter().all(Value::is_bit) {
                    write!(f, "0b")?;
                    for element in elements {
                        write!(f, "{}", element)?;
                    }
                    return Ok(());
                }
                write!(f, "(")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                write!(f, ")")
            }
            Value::Variant(content) => write!(f, "<{}>", content),
            Value::Closure { body, bound } => write!(f, "\\{} [{}]", body, bound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clone_is_deep() {
        let original = Value::tuple([Value::Bit(true), Value::some(Value::Bit(false))]);
        let mut copy = original.clone();
        if let Value::Tuple(elements) = &mut copy {
            elements[0] = Value::Bit(false);
        }
        assert_eq!(
            original,
            Value::tuple([Value::Bit(true), Value::some(Value::Bit(false))])
        );
        assert_ne!(original, copy);
    }

    #[test]
    fn booleans() {
        assert_eq!(Value::Bit(true).as_bool(), Some(true));
        assert_eq!(Value::tuple([Value::Bit(false)]).as_bool(), Some(false));
        assert_eq!(Value::tuple([Value::Bit(false), Value::Bit(true)]).as_bool(), None);
        assert_eq!(Value::Unit.as_bool(), None);
    }

    #[test]
    fn closure_detection() {
        let closure = Value::closure(Expression::Argument, Value::Unit);
        assert!(Value::tuple([Value::Unit, Value::some(closure)]).contains_closure());
        assert!(!Value::none().contains_closure());
    }

    #[test]
    fn display() {
        let value = Value::tuple([
            Value::tuple([Value::Bit(true), Value::Bit(false)]),
            Value::none(),
        ]);
        assert_eq!(value.to_string(), "(0b10, <()>)");
    }
}
