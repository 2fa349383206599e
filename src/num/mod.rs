pub mod number;

pub use number::{canonical_f64, canonical_i64, coerce_scalar, parse_index};
