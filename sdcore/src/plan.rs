//! Plan compiler
//!
//! A [`Plan`] pairs a root type's layout, computed once, with one compiled closure per get
//! expression. Every getter sees the same input: a pair whose first element is the root
//! array in storage and whose second element is the caller's argument. For instance,
//! `$arg[0]` is the whole dataset and `$arg[1]` is the argument.
//!
//! ```rust
//! use sdcore::{plan::make_plan, storage::MemoryStorage};
//! use sdexpr::{expr::Expression, integer::make_unsigned_integer, value::Value};
//! use sdschema::types::Type;
//!
//! let root = Type::array(Type::unsigned_integer(8));
//! let second = Expression::Argument.at(0).at(1);
//! let plan = make_plan::<MemoryStorage>(&root, vec![second], vec![]).unwrap();
//!
//! let mut storage = MemoryStorage::new();
//! let data = Value::tuple([make_unsigned_integer(4u8), make_unsigned_integer(5u8)]);
//! plan.initialize_storage(&mut storage, &data).unwrap();
//!
//! let result = plan.get(0, &storage, &Value::Unit).unwrap();
//! assert_eq!(result, Some(make_unsigned_integer(5u8)));
//! ```
use std::sync::Arc;

use log::{debug, trace};
use sdexpr::{codec::serialize, expr::Expression, value::Value};
use sdschema::{
    bits::{BitSink, BitsToByteSink, ByteSink},
    layout::{ARRAY_LENGTH_PREFIX_BITS, Layout, calculate},
    types::Type,
};

use crate::{
    address::Address,
    config::EngineConfig,
    execution::{ArrayAccessor, PseudoValue, execute, reduce_value},
    storage::Storage,
    utils::error::{SdError, SdResult},
};

/// A compiled getter: `(storage, argument) -> value`.
///
/// `Ok(None)` means the storage does not hold enough data to answer.
pub type Getter<S> = Box<dyn Fn(&S, &Value) -> SdResult<Option<Value>> + Send + Sync>;

pub struct Plan<S> {
    pub gets: Vec<Getter<S>>,
    layout: Arc<Layout>,
}

impl<S: Storage> Plan<S> {
    /// Layout of the root type, shared by every getter.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Run getter `index`. Fails with [`SdError::IndexOutOfRange`] if there is no such getter.
    pub fn get(&self, index: usize, storage: &S, argument: &Value) -> SdResult<Option<Value>> {
        let getter = self.gets.get(index).ok_or(SdError::IndexOutOfRange {
            index: index as u64,
            length: self.gets.len() as u64,
        })?;
        getter(storage, argument)
    }

    /// Write `root` at address zero following the plan's layout.
    ///
    /// Arrays are written as their 64-bit big-endian element count followed by their
    /// elements. The dataset is always read as an array of records, so a root type that is
    /// not an array is written as a single-record array.
    ///
    /// The whole dataset is encoded before storage is touched: a value that does not fit
    /// the layout fails with [`SdError::LayoutMismatch`] and leaves storage unchanged.
    pub fn initialize_storage(&self, storage: &mut S, root: &Value) -> SdResult<()> {
        let mut sink = BitsToByteSink::new(Vec::<u8>::new());
        match &*self.layout {
            Layout::Array(_) => write_with_layout(&mut sink, root, &self.layout)?,
            layout => {
                write_length(&mut sink, 1);
                write_with_layout(&mut sink, root, layout)?;
            }
        }
        let bytes = sink.finish();
        storage.write_at(Address::ZERO)?.append_bytes(&bytes);
        trace!("Initialized storage for layout {} with {}", self.layout, root);
        Ok(())
    }
}

impl<S> std::fmt::Debug for Plan<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plan")
            .field("gets", &self.gets.len())
            .field("layout", &self.layout)
            .finish()
    }
}

fn write_length<B: BitSink>(sink: &mut B, length: u64) {
    for shift in (0..ARRAY_LENGTH_PREFIX_BITS).rev() {
        sink.append_bit((length >> shift) & 1 != 0);
    }
}

fn write_with_layout<B: BitSink>(sink: &mut B, value: &Value, layout: &Layout) -> SdResult<()> {
    match (layout, value) {
        (Layout::Array(element), Value::Tuple(elements)) => {
            write_length(sink, elements.len() as u64);
            elements
                .iter()
                .try_for_each(|value| write_with_layout(&mut *sink, value, element))
        }
        (Layout::Tuple(layouts), Value::Tuple(elements)) if layouts.len() == elements.len() => {
            layouts
                .iter()
                .zip(elements)
                .try_for_each(|(layout, value)| write_with_layout(&mut *sink, value, layout))
        }
        (Layout::Variant(layouts), Value::Variant(content)) => {
            // Without a discriminant the first possibility that accepts the content wins.
            for layout in layouts {
                let mut attempt: Vec<bool> = Vec::new();
                if write_with_layout(&mut attempt, content, layout).is_ok() {
                    attempt.into_iter().for_each(|bit| sink.append_bit(bit));
                    return Ok(());
                }
            }
            Err(mismatch(layout, value))
        }
        (Layout::Unit, Value::Unit) => Ok(()),
        (Layout::Bitset(length), value) => {
            let mut bits: Vec<bool> = Vec::new();
            serialize(&mut bits, value)?;
            if bits.len() as u64 != *length {
                return Err(mismatch(layout, value));
            }
            bits.into_iter().for_each(|bit| sink.append_bit(bit));
            Ok(())
        }
        (layout, value) => Err(mismatch(layout, value)),
    }
}

fn mismatch(layout: &Layout, value: &Value) -> SdError {
    SdError::LayoutMismatch {
        layout: layout.to_string(),
        found: value.to_string(),
    }
}

/// Reserved hook validating a getter against the layout before first use.
///
/// Accepts every getter.
pub fn analyze_getter(layout: &Layout, getter: &Expression) -> SdResult<()> {
    trace!("Analyzing getter {} against layout {}", getter, layout);
    Ok(())
}

/// Evaluate a get expression against `storage`.
///
/// The expression receives `(root, argument)` as its argument and unit as its bound value.
pub fn run_getter<S: Storage>(
    storage: &S,
    layout: &Layout,
    getter: &Expression,
    argument: &Value,
) -> SdResult<Option<Value>> {
    let element_layout = layout.element().unwrap_or(layout);
    let root = ArrayAccessor::new(storage, Address::ZERO, element_layout);
    let input = PseudoValue::Tuple(vec![
        PseudoValue::ArrayAccessor(root),
        PseudoValue::Value(argument.clone()),
    ]);

    match execute(getter, &input, &PseudoValue::Value(Value::Unit))? {
        Some(result) => reduce_value(result),
        None => Ok(None),
    }
}

/// Compile a plan with the default configuration.
pub fn make_plan<S: Storage + 'static>(
    root: &Type,
    gets: Vec<Expression>,
    sets: Vec<Expression>,
) -> SdResult<Plan<S>> {
    make_plan_with_config(root, gets, sets, &EngineConfig::default())
}

/// Compile a plan for `root`.
///
/// Set expressions are not supported yet: a non-empty `sets` fails with
/// [`SdError::NotImplemented`].
pub fn make_plan_with_config<S: Storage + 'static>(
    root: &Type,
    gets: Vec<Expression>,
    sets: Vec<Expression>,
    config: &EngineConfig,
) -> SdResult<Plan<S>> {
    if !sets.is_empty() {
        return Err(SdError::NotImplemented("set plans"));
    }

    let layout = Arc::new(calculate(root)?);
    let analyze_getters = config.plan.analyze_getters;
    let gets = gets
        .into_iter()
        .map(|expression| -> SdResult<Getter<S>> {
            if analyze_getters {
                analyze_getter(&layout, &expression)?;
            }
            let layout = Arc::clone(&layout);
            Ok(Box::new(move |storage: &S, argument: &Value| {
                run_getter(storage, &layout, &expression, argument)
            }))
        })
        .collect::<SdResult<Vec<_>>>()?;

    debug!("Compiled plan with {} getters for layout {}", gets.len(), layout);
    Ok(Plan { gets, layout })
}
