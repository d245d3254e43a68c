use datapivot_model::{Column, TableConfig};
use serde::{Deserialize, Serialize};

/// Column positions feeding one pivot pass.
///
/// Resolved once per pass and never reused across passes: hosts reorder and hide columns
/// between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnRoles {
    /// Column whose distinct values become matrix rows.
    pub category_index: usize,
    /// Column whose distinct values become matrix columns. `None` sums every row into a single
    /// synthetic total column.
    pub legend_index: Option<usize>,
    /// Column summed into each cell.
    pub measure_index: usize,
}

/// Picks the category, legend and measure columns, repairing missing or invalid configuration.
///
/// Returns `None` only when there are no columns. Every returned index is inside
/// `[0, columns.len())`. Roles are pairwise distinct unless there are too few columns.
pub fn resolve_column_roles(columns: &[Column], config: &TableConfig) -> Option<ColumnRoles> {
    if columns.is_empty() {
        return None;
    }

    let category_index = resolve_category(columns, config);
    let legend_index = resolve_legend(columns, config, category_index);
    let measure_index = resolve_measure(columns, config, category_index, legend_index);

    Some(ColumnRoles {
        category_index,
        legend_index,
        measure_index,
    })
}

/// Whether `columns` can produce a meaningful pivot: something to group by and something to
/// sum.
pub fn is_pivot_possible(columns: &[Column]) -> bool {
    columns.iter().any(|c| c.is_visible && c.groupable)
        && columns.iter().any(|c| c.column_type.is_numeric())
}

fn first_visible_groupable(columns: &[Column], exclude: &[usize]) -> Option<usize> {
    columns
        .iter()
        .enumerate()
        .position(|(idx, c)| c.is_visible && c.groupable && !exclude.contains(&idx))
}

fn resolve_category(columns: &[Column], config: &TableConfig) -> usize {
    if let Some(idx) = TableConfig::position(config.string_column_index, columns.len()) {
        return idx;
    }

    if let Some(idx) = first_visible_groupable(columns, &[]) {
        log::debug!(
            "string column index {:?} unusable; using first visible groupable column {idx}",
            config.string_column_index
        );
        return idx;
    }

    log::debug!(
        "string column index {:?} unusable and no groupable column; using position 0",
        config.string_column_index
    );
    0
}

fn resolve_legend(columns: &[Column], config: &TableConfig, category: usize) -> Option<usize> {
    if let Some(idx) = TableConfig::position(config.legend_column_index, columns.len()) {
        if idx != category {
            return Some(idx);
        }
    }

    if let Some(idx) = first_visible_groupable(columns, &[category]) {
        log::debug!(
            "legend column index {:?} unusable; using visible groupable column {idx}",
            config.legend_column_index
        );
        return Some(idx);
    }

    // Positional fallback. A numeric legend would emit one pivot column per distinct amount,
    // so numeric columns never qualify here.
    let positional = (0..columns.len()).find(|&idx| idx != category && !columns[idx].is_numeric());
    if let Some(idx) = positional {
        log::debug!(
            "legend column index {:?} unusable and no second groupable column; using position {idx}",
            config.legend_column_index
        );
        return Some(idx);
    }

    log::debug!("no legend column available; aggregating into a single total column");
    None
}

fn resolve_measure(
    columns: &[Column],
    config: &TableConfig,
    category: usize,
    legend: Option<usize>,
) -> usize {
    if let Some(idx) = TableConfig::position(config.number_column_index, columns.len()) {
        if columns[idx].is_numeric() {
            return idx;
        }
        log::debug!("configured number column {idx} is not numeric-typed");
    }

    let claimed = |idx: usize| idx == category || legend == Some(idx);

    let numeric = columns
        .iter()
        .enumerate()
        .position(|(idx, c)| c.is_visible && c.is_numeric() && !claimed(idx));
    if let Some(idx) = numeric {
        log::debug!(
            "number column index {:?} unusable; using visible numeric column {idx}",
            config.number_column_index
        );
        return idx;
    }

    if let Some(idx) = (0..columns.len()).find(|&idx| !claimed(idx)) {
        log::debug!("no visible numeric column; using unclaimed column {idx} as the measure");
        return idx;
    }

    log::debug!(
        "only {} column(s); measure shares a position with another role",
        columns.len()
    );
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use datapivot_model::ColumnType;

    use pretty_assertions::assert_eq;

    fn roles(category: usize, legend: Option<usize>, measure: usize) -> ColumnRoles {
        ColumnRoles {
            category_index: category,
            legend_index: legend,
            measure_index: measure,
        }
    }

    fn three_columns() -> Vec<Column> {
        vec![
            Column::new("region", ColumnType::String).groupable(),
            Column::new("segment", ColumnType::String).groupable(),
            Column::new("sales", ColumnType::DollarAmt),
        ]
    }

    #[test]
    fn uses_valid_configuration_verbatim() {
        let cols = vec![
            Column::new("sales", ColumnType::DollarAmt),
            Column::new("segment", ColumnType::String).groupable(),
            Column::new("region", ColumnType::String).groupable(),
        ];
        assert_eq!(
            resolve_column_roles(&cols, &TableConfig::new(2, 1, 0)),
            Some(roles(2, Some(1), 0))
        );
    }

    #[test]
    fn defaults_from_groupable_and_numeric_columns() {
        assert_eq!(
            resolve_column_roles(&three_columns(), &TableConfig::default()),
            Some(roles(0, Some(1), 2))
        );
    }

    #[test]
    fn repairs_out_of_range_and_negative_indices() {
        assert_eq!(
            resolve_column_roles(&three_columns(), &TableConfig::new(7, -1, 42)),
            Some(roles(0, Some(1), 2))
        );
    }

    #[test]
    fn non_numeric_number_column_is_replaced() {
        let mut cols = three_columns();
        cols.push(Column::new("units", ColumnType::Quantity));
        assert_eq!(
            resolve_column_roles(&cols, &TableConfig::new(0, 1, 1)),
            Some(roles(0, Some(1), 2))
        );
    }

    #[test]
    fn legend_equal_to_category_is_replaced() {
        assert_eq!(
            resolve_column_roles(&three_columns(), &TableConfig::new(1, 1, 2)),
            Some(roles(1, Some(0), 2))
        );
    }

    #[test]
    fn hidden_columns_are_skipped_by_scans() {
        let cols = vec![
            Column::new("region", ColumnType::String).groupable(),
            Column::new("hidden_sales", ColumnType::DollarAmt).hidden(),
            Column::new("segment", ColumnType::String).groupable(),
            Column::new("sales", ColumnType::DollarAmt),
        ];
        assert_eq!(
            resolve_column_roles(&cols, &TableConfig::default()),
            Some(roles(0, Some(2), 3))
        );
    }

    #[test]
    fn single_groupable_and_numeric_column_has_no_legend() {
        let cols = vec![
            Column::new("region", ColumnType::String).groupable(),
            Column::new("sales", ColumnType::DollarAmt),
        ];
        assert_eq!(
            resolve_column_roles(&cols, &TableConfig::default()),
            Some(roles(0, None, 1))
        );
    }

    #[test]
    fn positional_fallbacks_without_groupable_columns() {
        let cols = vec![
            Column::new("a", ColumnType::String),
            Column::new("b", ColumnType::String),
            Column::new("c", ColumnType::String),
        ];
        assert_eq!(
            resolve_column_roles(&cols, &TableConfig::default()),
            Some(roles(0, Some(1), 2))
        );
    }

    #[test]
    fn roles_coincide_only_when_columns_run_out() {
        let cols = vec![Column::new("only", ColumnType::String)];
        assert_eq!(
            resolve_column_roles(&cols, &TableConfig::default()),
            Some(roles(0, None, 0))
        );
        assert_eq!(resolve_column_roles(&[], &TableConfig::default()), None);
    }

    #[test]
    fn pivot_possibility_requires_groupable_and_numeric_columns() {
        assert!(is_pivot_possible(&three_columns()));
        assert!(!is_pivot_possible(&[Column::new("sales", ColumnType::DollarAmt)]));
        assert!(!is_pivot_possible(&[
            Column::new("region", ColumnType::String).groupable().hidden(),
            Column::new("sales", ColumnType::DollarAmt),
        ]));
    }
}
