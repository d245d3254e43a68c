use std::collections::BTreeMap;

use datapivot_model::{CellValue, Column, ColumnType};
use serde::{Deserialize, Serialize};

use super::{ColumnRoles, PivotAggregate};

pub const PIVOT_CATEGORY_CSS_CLASS: &str = "pivot-category";

/// Column descriptor for one column of the pivot matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotColumn {
    /// Position in the pivot matrix, as a string (`"0"`, `"1"`, ...).
    pub field: String,
    pub name: String,
    #[serde(rename = "display_name")]
    pub display_name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pivot: Option<bool>,
    pub visible: bool,
    /// Source column supplying this column's values (category column or measure column).
    pub orig_column: Column,
    /// Matrix row index -> raw source cells behind that row's value.
    pub orig_values: BTreeMap<usize, Vec<CellValue>>,
}

impl PivotColumn {
    pub fn is_category(&self) -> bool {
        self.css_class.as_deref() == Some(PIVOT_CATEGORY_CSS_CLASS)
    }
}

/// Builds the category column followed by one value column per legend value.
///
/// Always returns `1 + aggregate.legend_values.len()` columns.
pub fn synthesize_columns(
    aggregate: &PivotAggregate,
    columns: &[Column],
    roles: &ColumnRoles,
) -> Vec<PivotColumn> {
    let category_column = columns
        .get(roles.category_index)
        .cloned()
        .unwrap_or_else(|| Column::new("", ColumnType::Unknown));
    let measure_column = columns
        .get(roles.measure_index)
        .cloned()
        .unwrap_or_else(|| Column::new("", ColumnType::Unknown));

    let mut out = Vec::with_capacity(1 + aggregate.legend_values.len());

    out.push(PivotColumn {
        field: "0".to_string(),
        name: category_column.name.clone(),
        display_name: category_column.label().to_string(),
        column_type: category_column.column_type,
        index: 0,
        css_class: Some(PIVOT_CATEGORY_CSS_CLASS.to_string()),
        pivot: None,
        visible: true,
        orig_values: aggregate
            .category_sources
            .iter()
            .cloned()
            .enumerate()
            .collect(),
        orig_column: category_column,
    });

    for (legend_idx, legend_value) in aggregate.legend_values.iter().enumerate() {
        let label = legend_value.to_group_key().display_string();
        let orig_values = aggregate
            .cells
            .iter()
            .enumerate()
            .filter_map(|(row_idx, row)| {
                let cell = row.get(legend_idx)?.as_ref()?;
                Some((row_idx, cell.sources.clone()))
            })
            .collect();

        out.push(PivotColumn {
            field: (legend_idx + 1).to_string(),
            name: label.clone(),
            display_name: label,
            column_type: measure_column.column_type,
            index: legend_idx + 1,
            css_class: None,
            pivot: Some(true),
            visible: true,
            orig_column: measure_column.clone(),
            orig_values,
        });
    }

    out
}
