use strum::{EnumIs, EnumTryAs};
use thiserror::Error;

/// Contract violations between a compiled plan and the data or schema it runs against.
///
/// Insufficient data is not an error: it is reported as `Ok(None)` by the operations that
/// read storage.
#[derive(Debug, Error, EnumIs, EnumTryAs)]
pub enum SdError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration file '{file}': {source}")]
    ConfigParseError {
        source: toml::de::Error,
        file: String,
    },

    #[error(transparent)]
    Layout(#[from] sdschema::Error),

    #[error(transparent)]
    Value(#[from] sdexpr::Error),

    /// The index did not evaluate to a tuple of bits fitting in an address.
    #[error("The index of `tuple_at` must evaluate to a tuple of at most 64 bits, found {found}.")]
    InvalidIndex { found: String },

    #[error("Index {index} is out of range for a sequence of {length} elements.")]
    IndexOutOfRange { index: u64, length: u64 },

    #[error("Expected a tuple, found {found}.")]
    NotATuple { found: String },

    /// A value handed to plan initialization does not fit the plan's layout.
    #[error("Value {found} does not fit layout {layout}.")]
    LayoutMismatch { layout: String, found: String },

    #[error("Storage cannot grow to {requested} bytes.")]
    StorageExhausted { requested: u64 },

    #[error("A {kind} cannot be indexed.")]
    NotIndexable { kind: &'static str },

    #[error("`filter` expects an array stored in storage, found a {kind}.")]
    NotAnArray { kind: &'static str },

    #[error("Expected a closure to invoke, found a {kind}.")]
    NotAClosure { kind: &'static str },

    #[error("A predicate must yield a bit, found {found}.")]
    NotABoolean { found: String },

    /// Closures and unresolved storage references cannot be turned into data.
    #[error("A {kind} cannot be reduced to a value.")]
    NotReducible { kind: &'static str },

    #[error("{0} is not implemented.")]
    NotImplemented(&'static str),
}

pub type SdResult<T> = Result<T, SdError>;
