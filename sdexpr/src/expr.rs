//! Expression language.
//!
//! An [`Expression`] is an immutable tree evaluated against two implicit inputs: the
//! *argument* passed into the current evaluation ([`Expression::Argument`]) and the value
//! captured when the enclosing lambda was built ([`Expression::Bound`]).
//!
//! Builders are provided as associated functions and as chaining methods:
//!
//! ```rust
//! use sdexpr::expr::Expression;
//!
//! // Keep the elements of `argument[0]` that are equal to `argument[1]`.
//! let element_equals_key = Expression::lambda(
//!     Expression::Argument.equals(Expression::Bound),
//!     Expression::Argument.at(1),
//! );
//! let find = Expression::Argument.at(0).filter(element_equals_key);
//! assert_eq!(find.to_string(), "filter($arg[0], \\($arg == $bound) [$arg[1]])");
//! ```
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{EnumIs, EnumTryAs};

use crate::{integer::make_unsigned_integer, value::Value};

#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIs, EnumTryAs)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expression {
    /// A constant.
    Literal(Value),

    /// The value passed into the current evaluation.
    Argument,

    /// The value captured by the enclosing lambda.
    Bound,

    /// Evaluate each element in order and gather the results.
    MakeTuple(Vec<Expression>),

    /// Index into a tuple or array. The index must evaluate to a tuple of bits.
    TupleAt {
        tuple: Box<Expression>,
        index: Box<Expression>,
    },

    /// Conditional.
    Branch {
        condition: Box<Expression>,
        positive: Box<Expression>,
        negative: Box<Expression>,
    },

    /// Capture `bound` now and defer `body` until the closure is invoked.
    Lambda {
        body: Box<Expression>,
        bound: Box<Expression>,
    },

    /// Function application.
    Call {
        function: Box<Expression>,
        argument: Box<Expression>,
    },

    /// Keep the elements of `input` for which `predicate` yields a true bit.
    Filter {
        input: Box<Expression>,
        predicate: Box<Expression>,
    },

    /// Structural equality, yields a bit.
    Equals {
        left: Box<Expression>,
        right: Box<Expression>,
    },
}

impl Expression {
    pub fn literal(value: Value) -> Self {
        Expression::Literal(value)
    }

    pub fn make_tuple<I: IntoIterator<Item = Expression>>(elements: I) -> Self {
        Expression::MakeTuple(elements.into_iter().collect())
    }

    pub fn tuple_at(tuple: Expression, index: Expression) -> Self {
        Expression::TupleAt {
            tuple: Box::new(tuple),
            index: Box::new(index),
        }
    }

    pub fn branch(condition: Expression, positive: Expression, negative: Expression) -> Self {
        Expression::Branch {
            condition: Box::new(condition),
            positive: Box::new(positive),
            negative: Box::new(negative),
        }
    }

    /// A closure over `body` capturing the evaluation of `bound`.
    pub fn lambda(body: Expression, bound: Expression) -> Self {
        Expression::Lambda {
            body: Box::new(body),
            bound: Box::new(bound),
        }
    }

    pub fn call(function: Expression, argument: Expression) -> Self {
        Expression::Call {
            function: Box::new(function),
            argument: Box::new(argument),
        }
    }

    /// `self[index]` with a literal 64-bit index.
    #[inline]
    pub fn at(self, index: u64) -> Self {
        Expression::tuple_at(self, Expression::Literal(make_unsigned_integer(index)))
    }

    /// `filter(self, predicate)`.
    #[inline]
    pub fn filter(self, predicate: Expression) -> Self {
        Expression::Filter {
            input: Box::new(self),
            predicate: Box::new(predicate),
        }
    }

    /// `self == other`.
    #[inline]
    pub fn equals(self, other: Expression) -> Self {
        Expression::Equals {
            left: Box::new(self),
            right: Box::new(other),
        }
    }
}

impl From<Value> for Expression {
    fn from(value: Value) -> Self {
        Expression::Literal(value)
    }
}

impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expression::Literal(value) => {
                // Literal indices are printed as numbers.
                match value.to_unsigned_integer::<u64>() {
                    Ok(number) if matches!(value, Value::Tuple(bits) if !bits.is_empty()) => {
                        write!(f, "{}", number)
                    }
                    _ => write!(f, "{}", value),
                }
            }
            Expression::Argument => write!(f, "$arg"),
            Expression::Bound => write!(f, "$bound"),
            Expression::MakeTuple(elements) => {
                write!(f, "(")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                write!(f, ")")
            }
            Expression::TupleAt { tuple, index } => write!(f, "{}[{}]", tuple, index),
            Expression::Branch {
                condition,
                positive,
                negative,
            } => write!(f, "if {} then {} else {}", condition, positive, negative),
            Expression::Lambda { body, bound } => write!(f, "\\({}) [{}]", body, bound),
            Expression::Call { function, argument } => write!(f, "{}({})", function, argument),
            Expression::Filter { input, predicate } => write!(f, "filter({}, {})", input, predicate),
            Expression::Equals { left, right } => write!(f, "{} == {}", left, right),
        }
    }
}
