use strum::{EnumIs, EnumTryAs};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIs, EnumTryAs, Error)]
pub enum Error {
    /// The type has no physical representation.
    #[error(
        "Cannot calculate a layout for a `{kind}` type. Units and functions have no physical representation at this position."
    )]
    UnsupportedLayout { kind: &'static str },
}

pub type Result<T> = std::result::Result<T, Error>;
