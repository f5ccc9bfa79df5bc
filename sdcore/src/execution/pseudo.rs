use std::fmt::{self, Debug, Display};

use sdexpr::{expr::Expression, value::Value};
use sdschema::layout::Layout;

use crate::address::Address;

/// Non-owning reference to a bit address inside a storage.
pub struct StoragePointer<'a, S> {
    pub storage: &'a S,
    pub address: Address,
}

impl<'a, S> StoragePointer<'a, S> {
    pub fn new(storage: &'a S, address: Address) -> Self {
        Self { storage, address }
    }
}

impl<S> Clone for StoragePointer<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for StoragePointer<'_, S> {}

impl<S> Debug for StoragePointer<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StoragePointer").field(&self.address).finish()
    }
}

/// A length-prefixed array living in storage, decoded one element at a time.
pub struct ArrayAccessor<'a, S> {
    /// Address of the 64-bit element count.
    pub begin: StoragePointer<'a, S>,
    pub element_layout: &'a Layout,
}

impl<'a, S> ArrayAccessor<'a, S> {
    pub fn new(storage: &'a S, begin: Address, element_layout: &'a Layout) -> Self {
        Self {
            begin: StoragePointer::new(storage, begin),
            element_layout,
        }
    }
}

impl<S> Clone for ArrayAccessor<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for ArrayAccessor<'_, S> {}

impl<S> Debug for ArrayAccessor<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayAccessor")
            .field("begin", &self.begin)
            .field("element_layout", self.element_layout)
            .finish()
    }
}

/// Execution-time value that may still reference storage or code.
///
/// A pseudo value borrows the storage and the expression tree it was produced from and
/// never outlives a single evaluation. It is turned into a [`Value`] by
/// [`reduce_value`](super::reduce_value).
pub enum PseudoValue<'a, S> {
    Value(Value),
    ArrayAccessor(ArrayAccessor<'a, S>),
    Tuple(Vec<PseudoValue<'a, S>>),
    Closure {
        body: &'a Expression,
        bound: Box<PseudoValue<'a, S>>,
    },
}

impl<'a, S> PseudoValue<'a, S> {
    /// Short name of the outer constructor, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            PseudoValue::Value(value) => match value {
                Value::Unit => "unit",
                Value::Bit(_) => "bit",
                Value::Tuple(_) => "tuple",
                Value::Variant(_) => "variant",
                Value::Closure { .. } => "closure",
            },
            PseudoValue::ArrayAccessor(_) => "array",
            PseudoValue::Tuple(_) => "tuple",
            PseudoValue::Closure { .. } => "closure",
        }
    }

    pub fn is_closure(&self) -> bool {
        matches!(
            self,
            PseudoValue::Closure { .. } | PseudoValue::Value(Value::Closure { .. })
        )
    }
}

impl<S> From<Value> for PseudoValue<'_, S> {
    fn from(value: Value) -> Self {
        PseudoValue::Value(value)
    }
}

impl<S> Clone for PseudoValue<'_, S> {
    fn clone(&self) -> Self {
        match self {
            PseudoValue::Value(value) => PseudoValue::Value(value.clone()),
            PseudoValue::ArrayAccessor(accessor) => PseudoValue::ArrayAccessor(*accessor),
            PseudoValue::Tuple(elements) => PseudoValue::Tuple(elements.clone()),
            PseudoValue::Closure { body, bound } => PseudoValue::Closure {
                body: *body,
                bound: bound.clone(),
            },
        }
    }
}

impl<S> Debug for PseudoValue<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PseudoValue::Value(value) => f.debug_tuple("Value").field(value).finish(),
            PseudoValue::ArrayAccessor(accessor) => accessor.fmt(f),
            PseudoValue::Tuple(elements) => f.debug_tuple("Tuple").field(elements).finish(),
            PseudoValue::Closure { body, bound } => f
                .debug_struct("Closure")
                .field("body", body)
                .field("bound", bound)
                .finish(),
        }
    }
}

impl<S> Display for PseudoValue<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PseudoValue::Value(value) => write!(f, "{}", value),
            PseudoValue::ArrayAccessor(accessor) => {
                write!(f, "[{}]{}", accessor.element_layout, accessor.begin.address)
            }
            PseudoValue::Tuple(elements) => {
                write!(f, "(")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                write!(f, ")")
            }
            PseudoValue::Closure { body, bound } => write!(f, "\\{} [{}]", body, bound),
        }
    }
}
