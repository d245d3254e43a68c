//! Row filtering applied ahead of pivot aggregation.

mod filter;

pub use filter::{apply_filters, evaluate_operator, resolve_filter_column};
