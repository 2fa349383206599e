//! Bracket-notation form decoding.
//!
//! Turns the flat `(name, value)` pairs a form submits, such as
//! `user[address][0]=Main St`, into nested values:
//!
//! ```
//! use serde_json::json;
//!
//! let fields = formpath::parse([("user[name]", "Ada"), ("user[tags][0]", "x")], false);
//! assert_eq!(
//!     formpath::to_value(&fields),
//!     json!({"user": {"name": "Ada", "tags": ["x"]}})
//! );
//! ```

pub mod constants;
pub mod error;
pub mod field;
pub mod flatten;
pub mod num;
pub mod options;
pub mod parse;
pub mod query;
pub mod value;

use serde::de::DeserializeOwned;

pub use crate::error::{Error, ErrorKind};
pub use crate::field::{Field, FieldEntry, FieldPath};
pub use crate::options::{Flatten, ParseOptions};
pub use crate::parse::Parsed;
pub use crate::query::{entries_from_urlencoded, group_query, to_urlencoded};
pub use crate::value::{to_value, FormMap, FormValue};

pub type Result<T> = std::result::Result<T, Error>;

/// Parses entries in order. With `flatten_nested`, top-level mappings and
/// sequences come back as JSON text.
pub fn parse<I>(entries: I, flatten_nested: bool) -> FormMap
where
    I: IntoIterator,
    I::Item: Field,
{
    parse_with_options(entries, &ParseOptions::new().with_flatten(flatten_nested.into()))
}

/// Permissive parse: never fails, whatever `options.strict` says.
pub fn parse_with_options<I>(entries: I, options: &ParseOptions) -> FormMap
where
    I: IntoIterator,
    I::Item: Field,
{
    parse::parse_entries(entries, options).fields
}

/// Parses and keeps the list of repairs made along the way.
pub fn parse_with_diagnostics<I>(entries: I, options: &ParseOptions) -> Parsed
where
    I: IntoIterator,
    I::Item: Field,
{
    parse::parse_entries(entries, options)
}

/// Like [`parse_with_options`], but with `options.strict` set the first
/// repair is returned as an error.
pub fn try_parse_with_options<I>(entries: I, options: &ParseOptions) -> Result<FormMap>
where
    I: IntoIterator,
    I::Item: Field,
{
    let parsed = parse::parse_entries(entries, options);
    if options.strict {
        if let Some(error) = parsed.diagnostics.into_iter().next() {
            return Err(error);
        }
    }
    Ok(parsed.fields)
}

/// Checks entries as a strict parse would, discarding the result.
pub fn validate_entries<I>(entries: I, options: &ParseOptions) -> Result<()>
where
    I: IntoIterator,
    I::Item: Field,
{
    let options = options.clone().with_strict(true);
    try_parse_with_options(entries, &options).map(|_| ())
}

pub fn parse_urlencoded(input: &[u8], options: &ParseOptions) -> FormMap {
    parse_with_options(entries_from_urlencoded(input), options)
}

pub fn try_parse_urlencoded(input: &[u8], options: &ParseOptions) -> Result<FormMap> {
    try_parse_with_options(entries_from_urlencoded(input), options)
}

/// Parses entries and deserializes the nested result into `T`.
pub fn from_entries<T, I>(entries: I, options: &ParseOptions) -> Result<T>
where
    T: DeserializeOwned,
    I: IntoIterator,
    I::Item: Field,
{
    let fields = try_parse_with_options(entries, options)?;
    from_fields(&fields)
}

pub fn from_fields<T: DeserializeOwned>(fields: &FormMap) -> Result<T> {
    serde_json::from_value(to_value(fields))
        .map_err(|err| Error::deserialize(format!("deserialize failed: {err}")))
}

pub fn from_urlencoded<T: DeserializeOwned>(input: &[u8], options: &ParseOptions) -> Result<T> {
    from_entries(entries_from_urlencoded(input), options)
}

pub fn to_json_string(fields: &FormMap) -> String {
    to_value(fields).to_string()
}
