//! Pivot engine.
//!
//! This module is self-contained: it operates on a host-supplied result set (column metadata +
//! rows) and produces a 2D matrix plus the column descriptors a table or chart renderer needs.
//!
//! One pass:
//! - validate rows against the column list
//! - resolve category/legend/measure columns ([`resolve_column_roles`])
//! - apply active filters
//! - group and sum ([`aggregate`]), bucketing date categories when configured
//! - synthesize pivot columns ([`synthesize_columns`])
//!
//! Every pass allocates a fresh [`PivotResult`]; nothing is cached between passes.

mod aggregate;
mod bucket;
mod columns;
mod roles;

pub use aggregate::{aggregate, PivotAggregate, PivotCell};
pub use bucket::{CategoryBucketer, DateBucketer};
pub use columns::{synthesize_columns, PivotColumn, PIVOT_CATEGORY_CSS_CLASS};
pub use roles::{is_pivot_possible, resolve_column_roles, ColumnRoles};

use datapivot_model::{CellValue, InputError, PivotInput, PivotOptions};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sort_filter::apply_filters;

#[derive(Debug, Error)]
pub enum PivotError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("invalid pivot request: {0}")]
    InvalidRequest(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotResult {
    /// One row per category: `[category, sum for legend 0, sum for legend 1, ...]`.
    pub pivot_table_data: Vec<Vec<CellValue>>,
    pub pivot_table_columns: Vec<PivotColumn>,
    /// Roles used for this pass; `None` when the result set has no columns.
    pub roles: Option<ColumnRoles>,
}

impl PivotResult {
    pub fn empty() -> Self {
        Self {
            pivot_table_data: Vec::new(),
            pivot_table_columns: Vec::new(),
            roles: None,
        }
    }

    /// Looks up a cell by category label and pivot column display name.
    pub fn value(&self, category: &str, legend: &str) -> Option<&CellValue> {
        let col = self
            .pivot_table_columns
            .iter()
            .skip(1)
            .find(|c| c.display_name == legend)?
            .index;
        self.pivot_table_data
            .iter()
            .find(|row| row.first().is_some_and(|c| c.display_string() == category))?
            .get(col)
    }
}

pub struct PivotEngine;

impl PivotEngine {
    /// Runs one pivot pass, bucketing date categories with a [`DateBucketer`] when
    /// `options.date_precision` is set.
    pub fn compute(input: &PivotInput, options: &PivotOptions) -> Result<PivotResult, PivotError> {
        match options.date_precision {
            Some(precision) => {
                Self::compute_with_bucketer(input, options, Some(&DateBucketer::new(precision)))
            }
            None => Self::compute_with_bucketer(input, options, None),
        }
    }

    /// Runs one pivot pass with a caller-supplied bucketer for date categories.
    pub fn compute_with_bucketer(
        input: &PivotInput,
        options: &PivotOptions,
        bucketer: Option<&dyn CategoryBucketer>,
    ) -> Result<PivotResult, PivotError> {
        input.validate()?;

        let Some(roles) = resolve_column_roles(&input.columns, &input.table_config) else {
            return Ok(PivotResult::empty());
        };

        let rows = apply_filters(&input.rows, &input.columns, &input.filters);
        log::trace!(
            "pivot pass: {} of {} rows after {} filter(s), roles {:?}",
            rows.len(),
            input.rows.len(),
            input.filters.len(),
            roles
        );

        let aggregate = aggregate(&rows, &input.columns, &roles, bucketer, options);
        let pivot_table_columns = synthesize_columns(&aggregate, &input.columns, &roles);

        Ok(PivotResult {
            pivot_table_data: aggregate.matrix(),
            pivot_table_columns,
            roles: Some(roles),
        })
    }
}

/// JSON request accepted by [`compute_pivot_json`]: a [`PivotInput`] plus optional options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotRequest {
    #[serde(flatten)]
    pub input: PivotInput,
    #[serde(default)]
    pub options: PivotOptions,
}

/// Runs one pivot pass over a JSON request and returns the camelCase JSON result.
pub fn compute_pivot_json(request: &str) -> Result<String, PivotError> {
    let request: PivotRequest = serde_json::from_str(request)?;
    let result = PivotEngine::compute(&request.input, &request.options)?;
    Ok(serde_json::to_string(&result)?)
}
