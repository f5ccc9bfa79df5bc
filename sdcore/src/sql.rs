//! SQL table synthesis.
//!
//! Only produces the statement text. No database driver is linked, executing the
//! statements is up to the caller.
use log::debug;
use sdexpr::expr::Expression;
use sdschema::types::Type;

use crate::{
    config::SqlConfig,
    utils::error::{SdError, SdResult},
};

/// Quote `raw` as an SQL identifier, doubling embedded quotes.
///
/// ```rust
/// # use sdcore::sql::escape_identifier;
/// assert_eq!(escape_identifier("say \"hi\""), "\"say \"\"hi\"\"\"");
/// ```
pub fn escape_identifier(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len() + 2);
    escaped.push('"');
    for c in raw.chars() {
        match c {
            '"' => escaped.push_str("\"\""),
            c => escaped.push(c),
        }
    }
    escaped.push('"');
    escaped
}

/// `CREATE TABLE` statements holding a dataset of type `root`.
///
/// Only an array of unsigned integers is supported and maps to a single table with one
/// integer column.
pub fn create_tables(root: &Type, gets: &[Expression], config: &SqlConfig) -> SdResult<Vec<String>> {
    let Type::Array(element) = root else {
        return Err(SdError::NotImplemented("tables for a root that is not an array"));
    };
    let is_integer = matches!(&**element, Type::Tuple(bits) if !bits.is_empty() && bits.iter().all(Type::is_bit));
    if !is_integer {
        return Err(SdError::NotImplemented("tables for arrays of non-integer elements"));
    }

    let statement = format!(
        "CREATE TABLE {}( element_0 INTEGER)",
        escape_identifier(&config.root_table)
    );
    debug!("Synthesized `{}` for {} getters", statement, gets.len());
    Ok(vec![statement])
}
