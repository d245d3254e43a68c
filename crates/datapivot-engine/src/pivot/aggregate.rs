use std::collections::{HashMap, HashSet};

use datapivot_model::{AxisOrder, CellValue, Column, GroupKey, PivotOptions, Row};

use super::{CategoryBucketer, ColumnRoles};
use crate::coercion::coerce_existing_cell_to_number;

static BLANK: CellValue = CellValue::Null;

/// Summed measure for one (category, legend) pair plus the raw cells that contributed to it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PivotCell {
    pub sum: f64,
    pub sources: Vec<CellValue>,
}

/// Grouped and summed rows, before column synthesis.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotAggregate {
    /// Distinct (possibly bucketed) category values, one per matrix row.
    pub categories: Vec<CellValue>,
    /// Distinct raw category values folded into each category.
    pub category_sources: Vec<Vec<CellValue>>,
    /// Distinct legend values, one per pivot value column. Never empty.
    pub legend_values: Vec<CellValue>,
    /// `cells[category][legend]`; `None` when no row had that pair.
    pub cells: Vec<Vec<Option<PivotCell>>>,
}

impl PivotAggregate {
    /// Renders the 2-D matrix: index 0 holds the category label, `1 + legend` the summed
    /// measure or `Null` for never-observed pairs.
    pub fn matrix(&self) -> Vec<Vec<CellValue>> {
        self.categories
            .iter()
            .zip(&self.cells)
            .map(|(category, row)| {
                let mut out = Vec::with_capacity(1 + row.len());
                out.push(category.clone());
                out.extend(row.iter().map(|cell| match cell {
                    Some(cell) => CellValue::Number(cell.sum),
                    None => CellValue::Null,
                }));
                out
            })
            .collect()
    }

    pub fn sum(&self, category: usize, legend: usize) -> Option<f64> {
        self.cells
            .get(category)?
            .get(legend)?
            .as_ref()
            .map(|cell| cell.sum)
    }
}

/// Distinct values of one pivot axis in first-seen order.
#[derive(Default)]
struct Axis {
    values: Vec<CellValue>,
    keys: Vec<GroupKey>,
    lookup: HashMap<GroupKey, usize>,
}

impl Axis {
    fn intern(&mut self, value: CellValue) -> usize {
        let key = value.to_group_key();
        if let Some(&idx) = self.lookup.get(&key) {
            return idx;
        }
        let idx = self.values.len();
        self.lookup.insert(key.clone(), idx);
        self.keys.push(key);
        self.values.push(value);
        idx
    }

    /// Positions of the interned values in output order.
    fn order(&self, order: AxisOrder) -> Vec<usize> {
        let mut positions: Vec<usize> = (0..self.values.len()).collect();
        if order == AxisOrder::Ascending {
            positions.sort_by(|a, b| self.keys[*a].cmp(&self.keys[*b]));
        }
        positions
    }
}

/// Groups `rows` by (category, legend) and sums the measure of each pair.
///
/// Date-typed category values are passed through `bucketer` (when given) before grouping.
/// Without a legend column every row lands in a single column labelled
/// [`PivotOptions::total_label`].
pub fn aggregate(
    rows: &[&Row],
    columns: &[Column],
    roles: &ColumnRoles,
    bucketer: Option<&dyn CategoryBucketer>,
    options: &PivotOptions,
) -> PivotAggregate {
    let category_is_date = columns
        .get(roles.category_index)
        .is_some_and(|c| c.column_type.is_date());
    let bucketer = bucketer.filter(|_| category_is_date);
    let total = CellValue::Text(options.total_label.clone());

    let mut categories = Axis::default();
    let mut legends = Axis::default();
    let mut category_sources: Vec<Vec<CellValue>> = Vec::new();
    let mut seen_sources: Vec<HashSet<GroupKey>> = Vec::new();
    let mut cells: HashMap<(usize, usize), PivotCell> = HashMap::new();

    for row in rows {
        let raw_category = row.get(roles.category_index).unwrap_or(&BLANK);
        let category = match bucketer {
            Some(bucketer) => bucketer.bucket(raw_category),
            None => raw_category.clone(),
        };
        let c = categories.intern(category);
        if c == category_sources.len() {
            category_sources.push(Vec::new());
            seen_sources.push(HashSet::new());
        }
        if seen_sources[c].insert(raw_category.to_group_key()) {
            category_sources[c].push(raw_category.clone());
        }

        let legend = match roles.legend_index {
            Some(idx) => row.get(idx).unwrap_or(&BLANK).clone(),
            None => total.clone(),
        };
        let l = legends.intern(legend);

        let raw_measure = row.get(roles.measure_index).unwrap_or(&BLANK);
        let cell = cells.entry((c, l)).or_default();
        cell.sum += coerce_existing_cell_to_number(raw_measure);
        cell.sources.push(raw_measure.clone());
    }

    if legends.values.is_empty() {
        legends.intern(total);
    }

    log::trace!(
        "pivot aggregated {} rows into {} categories x {} legend values",
        rows.len(),
        categories.values.len(),
        legends.values.len()
    );

    let category_order = categories.order(options.category_order);
    let legend_order = legends.order(options.legend_order);

    let out_cells = category_order
        .iter()
        .map(|&c| {
            legend_order
                .iter()
                .map(|&l| cells.remove(&(c, l)))
                .collect()
        })
        .collect();

    PivotAggregate {
        categories: category_order
            .iter()
            .map(|&c| categories.values[c].clone())
            .collect(),
        category_sources: category_order
            .iter()
            .map(|&c| std::mem::take(&mut category_sources[c]))
            .collect(),
        legend_values: legend_order
            .iter()
            .map(|&l| legends.values[l].clone())
            .collect(),
        cells: out_cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pivot::resolve_column_roles;
    use datapivot_model::{ColumnType, TableConfig};

    use pretty_assertions::assert_eq;

    fn columns() -> Vec<Column> {
        vec![
            Column::new("region", ColumnType::String).groupable(),
            Column::new("segment", ColumnType::String).groupable(),
            Column::new("label", ColumnType::String),
            Column::new("sales", ColumnType::DollarAmt),
        ]
    }

    fn run(rows: &[Row], options: &PivotOptions) -> PivotAggregate {
        let cols = columns();
        let roles = resolve_column_roles(&cols, &TableConfig::default()).unwrap();
        let refs: Vec<&Row> = rows.iter().collect();
        aggregate(&refs, &cols, &roles, None, options)
    }

    #[test]
    fn sums_numeric_strings_as_numbers() {
        let rows = vec![
            vec!["A".into(), "L1".into(), "x".into(), "1724656".into()],
            vec!["A".into(), "L1".into(), "x".into(), "526858".into()],
        ];
        let agg = run(&rows, &PivotOptions::default());
        assert_eq!(agg.sum(0, 0), Some(2251514.0));
        assert_eq!(agg.matrix(), vec![vec!["A".into(), CellValue::Number(2251514.0)]]);
    }

    #[test]
    fn distinguishes_unobserved_from_zero() {
        let rows = vec![
            vec!["A".into(), "L1".into(), "x".into(), 5.into()],
            vec!["A".into(), "L1".into(), "x".into(), (-5).into()],
            vec!["B".into(), "L2".into(), "x".into(), CellValue::Null],
        ];
        let agg = run(&rows, &PivotOptions::default());
        assert_eq!(
            agg.matrix(),
            vec![
                vec!["A".into(), CellValue::Number(0.0), CellValue::Null],
                vec!["B".into(), CellValue::Null, CellValue::Number(0.0)],
            ]
        );
    }

    #[test]
    fn keeps_first_seen_order_and_sources() {
        let rows = vec![
            vec!["B".into(), "L2".into(), "x".into(), "$10".into()],
            vec!["A".into(), "L1".into(), "x".into(), 1.into()],
            vec!["B".into(), "L1".into(), "x".into(), "oops".into()],
            vec!["B".into(), "L2".into(), "x".into(), 2.5.into()],
        ];
        let agg = run(&rows, &PivotOptions::default());
        assert_eq!(agg.categories, vec!["B".into(), "A".into()]);
        assert_eq!(agg.legend_values, vec!["L2".into(), "L1".into()]);
        assert_eq!(agg.sum(0, 0), Some(12.5));
        assert_eq!(agg.sum(0, 1), Some(0.0));
        assert_eq!(agg.sum(1, 0), None);
        assert_eq!(
            agg.cells[0][0].as_ref().unwrap().sources,
            vec![CellValue::from("$10"), CellValue::Number(2.5)]
        );
        assert_eq!(agg.category_sources[0], vec![CellValue::from("B")]);
    }

    #[test]
    fn ascending_order_sorts_both_axes() {
        let rows = vec![
            vec!["b".into(), "L2".into(), "x".into(), 1.into()],
            vec![CellValue::Null, "L1".into(), "x".into(), 2.into()],
            vec!["A".into(), "L3".into(), "x".into(), 3.into()],
        ];
        let options = PivotOptions {
            category_order: AxisOrder::Ascending,
            legend_order: AxisOrder::Ascending,
            ..PivotOptions::default()
        };
        let agg = run(&rows, &options);
        assert_eq!(agg.categories, vec!["A".into(), "b".into(), CellValue::Null]);
        assert_eq!(agg.legend_values, vec!["L1".into(), "L2".into(), "L3".into()]);
        assert_eq!(agg.sum(0, 2), Some(3.0));
        assert_eq!(agg.sum(1, 1), Some(1.0));
        assert_eq!(agg.sum(2, 0), Some(2.0));
    }

    #[test]
    fn empty_rows_still_yield_total_legend() {
        let agg = run(&[], &PivotOptions::default());
        assert!(agg.categories.is_empty());
        assert_eq!(agg.legend_values, vec![CellValue::from("Total")]);
        assert!(agg.matrix().is_empty());
    }

    #[test]
    fn buckets_date_categories_only() {
        let cols = vec![
            Column::new("month", ColumnType::Date).groupable(),
            Column::new("sales", ColumnType::Quantity),
        ];
        let rows: Vec<Row> = vec![
            vec!["2024-01-03".into(), 1.into()],
            vec!["2024-01-28".into(), 2.into()],
            vec!["2024-02-01".into(), 4.into()],
        ];
        let refs: Vec<&Row> = rows.iter().collect();
        let roles = resolve_column_roles(&cols, &TableConfig::default()).unwrap();
        let month = |value: &CellValue| CellValue::Text(value.display_string()[..7].to_string());

        let agg = aggregate(&refs, &cols, &roles, Some(&month), &PivotOptions::default());
        assert_eq!(agg.categories, vec!["2024-01".into(), "2024-02".into()]);
        assert_eq!(agg.sum(0, 0), Some(3.0));
        assert_eq!(
            agg.category_sources[0],
            vec![CellValue::from("2024-01-03"), CellValue::from("2024-01-28")]
        );

        let mut text_cols = cols.clone();
        text_cols[0].column_type = ColumnType::String;
        let agg = aggregate(&refs, &text_cols, &roles, Some(&month), &PivotOptions::default());
        assert_eq!(agg.categories.len(), 3);
    }
}
