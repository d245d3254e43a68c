//! Conversion of raw result-set cells into numbers.
//!
//! Result sets mix real numbers with pre-formatted strings (`"$1,234.56"`, `"45%"`,
//! `"1,724,656"`). Everything the aggregator sums goes through this module.

mod number;

pub use number::{coerce_existing_cell_to_number, coerce_to_number};
pub(crate) use number::parse_formatted_number;
