//! Lazy expression interpreter.
//!
//! [`execute`] evaluates an [`Expression`] against an argument and a bound pseudo value.
//! Arrays found in storage stay as [`ArrayAccessor`]s until an element is requested or the
//! result is forced with [`reduce_value`], so indexing into a large dataset only decodes the
//! addressed element.
//!
//! Every function returns `SdResult<Option<_>>`. `Ok(None)` means the storage did not hold
//! enough data (or an address overflowed) and is propagated unchanged to the caller.
//! `Err(_)` means the expression does not fit the data it runs against. Evaluation is
//! depth-first and left to right.
use log::trace;
use sdexpr::{expr::Expression, integer::parse_unsigned_integer, value::Value};

use crate::{
    storage::Storage,
    utils::error::{SdError, SdResult},
};

pub mod array;
pub mod pseudo;

pub use pseudo::{ArrayAccessor, PseudoValue, StoragePointer};

/// Unwrap an `Option` or return `Ok(None)` from the enclosing function.
macro_rules! try_some {
    ($e:expr) => {
        match $e {
            Some(value) => value,
            None => return Ok(None),
        }
    };
}

/// Evaluate `expression` with the given argument and bound value.
pub fn execute<'a, S: Storage>(
    expression: &'a Expression,
    argument: &PseudoValue<'a, S>,
    bound: &PseudoValue<'a, S>,
) -> SdResult<Option<PseudoValue<'a, S>>> {
    match expression {
        Expression::Literal(value) => Ok(Some(PseudoValue::Value(value.clone()))),
        Expression::Argument => Ok(Some(argument.clone())),
        Expression::Bound => Ok(Some(bound.clone())),
        Expression::MakeTuple(elements) => {
            let mut result = Vec::with_capacity(elements.len());
            for element in elements {
                result.push(try_some!(execute(element, argument, bound)?));
            }
            Ok(Some(PseudoValue::Tuple(result)))
        }
        Expression::TupleAt { tuple, index } => {
            let tuple = try_some!(execute(tuple, argument, bound)?);
            let index = try_some!(execute(index, argument, bound)?);
            tuple_at(tuple, extract_index(index)?)
        }
        Expression::Lambda {
            body,
            bound: captured,
        } => {
            let captured = try_some!(execute(captured, argument, bound)?);
            Ok(Some(PseudoValue::Closure {
                body: body.as_ref(),
                bound: Box::new(captured),
            }))
        }
        Expression::Filter { input, predicate } => {
            let input = try_some!(execute(input, argument, bound)?);
            let predicate = try_some!(execute(predicate, argument, bound)?);
            let PseudoValue::ArrayAccessor(array) = input else {
                return Err(SdError::NotAnArray { kind: input.kind() });
            };
            run_filter(&array, &predicate)
        }
        Expression::Equals { left, right } => {
            let left = try_some!(execute(left, argument, bound)?);
            let left = try_some!(reduce_value(left)?);
            let right = try_some!(execute(right, argument, bound)?);
            let right = try_some!(reduce_value(right)?);
            Ok(Some(PseudoValue::Value(Value::Bit(left == right))))
        }
        Expression::Branch { .. } => Err(SdError::NotImplemented("branch expressions")),
        Expression::Call { .. } => Err(SdError::NotImplemented("call expressions")),
    }
}

/// Convert an evaluated index into a number.
///
/// The index must be a tuple of at most 64 bits, either as a plain value or as a tuple of
/// plain bits.
pub fn extract_index<S>(index: PseudoValue<'_, S>) -> SdResult<u64> {
    let invalid = |found: String| SdError::InvalidIndex { found };
    match index {
        PseudoValue::Value(Value::Tuple(bits)) => {
            parse_unsigned_integer(&bits).map_err(|_| invalid(Value::Tuple(bits).to_string()))
        }
        PseudoValue::Tuple(elements) => {
            let bits = elements
                .iter()
                .map(|element| match element {
                    PseudoValue::Value(bit @ Value::Bit(_)) => Some(bit.clone()),
                    _ => None,
                })
                .collect::<Option<Vec<_>>>();
            match bits {
                Some(bits) => parse_unsigned_integer(&bits)
                    .map_err(|_| invalid(PseudoValue::Tuple(elements).to_string())),
                None => Err(invalid(PseudoValue::Tuple(elements).to_string())),
            }
        }
        other => Err(invalid(other.to_string())),
    }
}

/// Project element `index` out of `tuple`.
pub fn tuple_at<'a, S: Storage>(
    tuple: PseudoValue<'a, S>,
    index: u64,
) -> SdResult<Option<PseudoValue<'a, S>>> {
    let out_of_range = |length: usize| SdError::IndexOutOfRange {
        index,
        length: length as u64,
    };

    match tuple {
        PseudoValue::ArrayAccessor(array) => {
            Ok(array::array_get(&array, index)?.map(PseudoValue::Value))
        }
        PseudoValue::Tuple(mut elements) => {
            let length = elements.len();
            match usize::try_from(index) {
                Ok(position) if position < length => Ok(Some(elements.swap_remove(position))),
                _ => Err(out_of_range(length)),
            }
        }
        PseudoValue::Value(Value::Tuple(mut elements)) => {
            let length = elements.len();
            match usize::try_from(index) {
                Ok(position) if position < length => {
                    Ok(Some(PseudoValue::Value(elements.swap_remove(position))))
                }
                _ => Err(out_of_range(length)),
            }
        }
        PseudoValue::Value(Value::Closure { .. }) => Err(SdError::NotIndexable { kind: "closure" }),
        PseudoValue::Value(other) => Err(SdError::NotATuple {
            found: other.to_string(),
        }),
        PseudoValue::Closure { .. } => Err(SdError::NotIndexable { kind: "closure" }),
    }
}

/// Keep the elements of `array` for which `predicate` holds.
///
/// The element count is read once; each element is decoded and passed to the predicate as
/// its argument. A missing element aborts the scan with `Ok(None)`. The result is always a
/// materialized tuple.
pub fn run_filter<'a, S: Storage>(
    array: &ArrayAccessor<'a, S>,
    predicate: &PseudoValue<'a, S>,
) -> SdResult<Option<PseudoValue<'a, S>>> {
    if !predicate.is_closure() {
        return Err(SdError::NotAClosure {
            kind: predicate.kind(),
        });
    }

    let length = try_some!(array::array_length(array));
    trace!(
        "Filtering {} elements of layout {} at {}",
        length, array.element_layout, array.begin.address
    );

    let mut kept = Vec::new();
    for index in 0..length {
        let element = try_some!(array::element_at(array, index)?);
        let verdict = try_some!(invoke_closure(predicate, PseudoValue::Value(element.clone()))?);
        let verdict = try_some!(reduce_value(verdict)?);
        match verdict.as_bool() {
            Some(true) => kept.push(element),
            Some(false) => {}
            None => {
                return Err(SdError::NotABoolean {
                    found: verdict.to_string(),
                });
            }
        }
    }

    Ok(Some(PseudoValue::Value(Value::Tuple(kept))))
}

/// Run the body of `closure` with `argument`, binding the closure's captured value.
pub fn invoke_closure<'a, S: Storage>(
    closure: &PseudoValue<'a, S>,
    argument: PseudoValue<'a, S>,
) -> SdResult<Option<PseudoValue<'a, S>>> {
    match closure {
        PseudoValue::Closure { body, bound } => execute(*body, &argument, bound),
        PseudoValue::Value(Value::Closure { body, bound }) => {
            // The body lives inside the closure value, so the result cannot borrow from it.
            let bound = PseudoValue::Value((**bound).clone());
            let result = try_some!(execute(body, &argument, &bound)?);
            Ok(reduce_value(result)?.map(PseudoValue::Value))
        }
        other => Err(SdError::NotAClosure { kind: other.kind() }),
    }
}

/// Force a pseudo value into a plain [`Value`].
///
/// Arrays in storage are decoded in full. Closures, including closure values nested inside
/// data, cannot be reduced.
pub fn reduce_value<S: Storage>(value: PseudoValue<'_, S>) -> SdResult<Option<Value>> {
    match value {
        PseudoValue::Value(value) if value.contains_closure() => {
            Err(SdError::NotReducible { kind: "closure" })
        }
        PseudoValue::Value(value) => Ok(Some(value)),
        PseudoValue::ArrayAccessor(array) => array::materialize(&array),
        PseudoValue::Tuple(elements) => {
            let mut result = Vec::with_capacity(elements.len());
            for element in elements {
                result.push(try_some!(reduce_value(element)?));
            }
            Ok(Some(Value::Tuple(result)))
        }
        PseudoValue::Closure { .. } => Err(SdError::NotReducible { kind: "closure" }),
    }
}
