#![forbid(unsafe_code)]
#![deny(unreachable_patterns)]

//! Pivot aggregation over flat query result sets.
//!
//! Given a result set (column metadata + rows of heterogeneous cells), the engine produces a
//! 2-D pivot matrix (categories x legend values) with summed numeric cells, plus the synthetic
//! column metadata a table or chart renderer needs to display it.
//!
//! The pipeline is a pure function of its input:
//!
//! 1. rows are validated against the column list
//! 2. category/legend/measure columns are resolved, repairing stale configuration
//!    ([`pivot::resolve_column_roles`])
//! 3. active filters narrow the rows ([`sort_filter::apply_filters`])
//! 4. rows are grouped and summed ([`pivot::aggregate`])
//! 5. pivot columns are synthesized ([`pivot::synthesize_columns`])
//!
//! [`PivotEngine::compute`] runs the whole pipeline; [`compute_pivot_json`] wraps it for
//! JSON hosts.

pub mod coercion;
pub mod pivot;
pub mod sort_filter;

pub use coercion::{coerce_existing_cell_to_number, coerce_to_number};
pub use pivot::{
    compute_pivot_json, CategoryBucketer, ColumnRoles, DateBucketer, PivotColumn, PivotEngine,
    PivotError, PivotRequest, PivotResult,
};
pub use sort_filter::apply_filters;

pub use datapivot_model as model;
