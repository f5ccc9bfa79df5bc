//! Embedded engine for schema-driven, bit-packed datasets.
//!
//! A dataset is described once by a [`Type`](sdschema::types::Type). Its layout is computed
//! once by [`sdschema::layout::calculate`], then get expressions are compiled into a
//! [`plan::Plan`] and evaluated directly against packed [`storage::Storage`], decoding only
//! the bits they touch.
//!
//! - [`address`]: bit addresses with overflow-checked arithmetic.
//! - [`storage`]: the storage contract and the in-memory implementation.
//! - [`execution`]: the lazy interpreter over pseudo values.
//! - [`plan`]: the plan compiler.
//! - [`sql`]: SQL table synthesis.
//! - [`config`]: TOML configuration.
pub mod address;
pub mod config;
pub mod execution;
pub mod plan;
pub mod sql;
pub mod storage;
pub mod utils;

pub use utils::error::{SdError, SdResult};
