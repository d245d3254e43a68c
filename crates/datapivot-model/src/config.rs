//! Host-supplied configuration for a pivot pass.
//!
//! Both types deserialize from partially specified camelCase JSON; every field has a default.

use serde::{Deserialize, Serialize};

/// Column roles chosen by the host.
///
/// Indices are signed because hosts routinely send `-1` or stale positions after a column was
/// removed. Invalid values are repaired by the engine, never rejected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableConfig {
    #[serde(default)]
    pub string_column_index: Option<i64>,
    #[serde(default)]
    pub legend_column_index: Option<i64>,
    #[serde(default)]
    pub number_column_index: Option<i64>,
}

impl TableConfig {
    pub fn new(string_column_index: i64, legend_column_index: i64, number_column_index: i64) -> Self {
        Self {
            string_column_index: Some(string_column_index),
            legend_column_index: Some(legend_column_index),
            number_column_index: Some(number_column_index),
        }
    }

    /// Returns `index` as a position inside `[0, len)`, or `None` when absent or out of range.
    pub fn position(index: Option<i64>, len: usize) -> Option<usize> {
        let idx = usize::try_from(index?).ok()?;
        (idx < len).then_some(idx)
    }
}

/// Ordering applied to the distinct values of a pivot axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AxisOrder {
    /// Order in which values first appear in the (filtered) rows.
    #[default]
    FirstSeen,
    /// Numbers ascending, then text case-insensitively, blanks last.
    Ascending,
}

/// Calendar precision used to bucket date-typed category values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DatePrecision {
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotOptions {
    #[serde(default)]
    pub category_order: AxisOrder,
    #[serde(default)]
    pub legend_order: AxisOrder,
    /// When set, date-typed category values are bucketed to this precision before grouping.
    #[serde(default)]
    pub date_precision: Option<DatePrecision>,
    #[serde(default = "crate::serde_defaults::default_total_label")]
    pub total_label: String,
}

impl Default for PivotOptions {
    fn default() -> Self {
        Self {
            category_order: AxisOrder::default(),
            legend_order: AxisOrder::default(),
            date_precision: None,
            total_label: crate::serde_defaults::default_total_label(),
        }
    }
}
