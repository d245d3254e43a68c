//! `datapivot-model` defines the in-memory data structures shared by the pivot engine and its
//! hosts.
//!
//! The crate is intentionally free of computation beyond validation and ordering so it can be
//! reused by:
//! - the pivot engine (`datapivot-engine`)
//! - IPC/WASM boundaries via `serde` (JSON-safe schema, camelCase keys)

mod column;
pub mod config;
pub mod filter;
mod input;
mod serde_defaults;
mod value;

pub use column::{Column, ColumnType};
pub use config::{AxisOrder, DatePrecision, PivotOptions, TableConfig};
pub use filter::{Filter, FilterOperator};
pub use input::{validate_rows, InputError, PivotInput};
pub use value::{CellValue, GroupKey, Row};
