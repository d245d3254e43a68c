use std::cmp::Ordering;

use datapivot_model::{CellValue, Column, Filter, FilterOperator, Row};

use crate::coercion::parse_formatted_number;

static BLANK: CellValue = CellValue::Null;

/// Narrows `rows` to those satisfying every filter (logical AND).
///
/// Filters whose target column cannot be resolved are skipped rather than excluding every row:
/// a stale filter id must not blank the whole table.
pub fn apply_filters<'a>(rows: &'a [Row], columns: &[Column], filters: &[Filter]) -> Vec<&'a Row> {
    let mut resolved: Vec<(usize, &Filter)> = Vec::with_capacity(filters.len());
    for filter in filters {
        match resolve_filter_column(columns, filter) {
            Some(idx) => resolved.push((idx, filter)),
            None => log::warn!(
                "ignoring filter with unresolvable column (id={:?}, name={:?}, field={:?})",
                filter.id,
                filter.name,
                filter.field
            ),
        }
    }

    if resolved.is_empty() {
        return rows.iter().collect();
    }

    rows.iter()
        .filter(|row| {
            resolved.iter().all(|(idx, filter)| {
                let cell = row.get(*idx).unwrap_or(&BLANK);
                evaluate_operator(filter.operator, cell, &filter.value)
            })
        })
        .collect()
}

/// Finds the column a filter targets.
///
/// Resolution order:
/// 1. a column whose `id` or `field` equals the filter's `id` or `field`
/// 2. a column whose `name` equals the filter's `name` (or `id`)
/// 3. the filter's `field` (or `id`) read as a column position
pub fn resolve_filter_column(columns: &[Column], filter: &Filter) -> Option<usize> {
    let id = filter.id.as_deref();
    let field = filter.field.as_deref();

    for key in [id, field].into_iter().flatten() {
        let found = columns.iter().position(|c| {
            c.id.as_deref() == Some(key) || c.field.as_deref() == Some(key)
        });
        if found.is_some() {
            return found;
        }
    }

    for key in [filter.name.as_deref(), id].into_iter().flatten() {
        let found = columns.iter().position(|c| c.name == key);
        if found.is_some() {
            return found;
        }
    }

    for key in [field, id].into_iter().flatten() {
        if let Ok(pos) = key.trim().parse::<usize>() {
            if pos < columns.len() {
                return Some(pos);
            }
        }
    }

    None
}

/// Evaluates `cell <operator> value`.
pub fn evaluate_operator(operator: FilterOperator, cell: &CellValue, value: &CellValue) -> bool {
    match operator {
        FilterOperator::Equals => values_equal(cell, value),
        FilterOperator::NotEquals => !values_equal(cell, value),
        FilterOperator::GreaterThan => compare(cell, value) == Some(Ordering::Greater),
        FilterOperator::GreaterThanOrEqual => {
            matches!(compare(cell, value), Some(Ordering::Greater | Ordering::Equal))
        }
        FilterOperator::LessThan => compare(cell, value) == Some(Ordering::Less),
        FilterOperator::LessThanOrEqual => {
            matches!(compare(cell, value), Some(Ordering::Less | Ordering::Equal))
        }
        FilterOperator::Like => {
            if value.is_blank() {
                return cell.is_blank();
            }
            let pattern = value.display_string();
            casefold(&cell.display_string()).contains(casefold(&pattern).as_str())
        }
    }
}

fn values_equal(cell: &CellValue, value: &CellValue) -> bool {
    if value.is_blank() || cell.is_blank() {
        return value.is_blank() && cell.is_blank();
    }

    match (strict_number(cell), strict_number(value)) {
        (Some(a), Some(b)) => a == b,
        (None, Some(_)) if matches!(value, CellValue::Number(_)) => false,
        _ => eq_case_insensitive(&cell.display_string(), &value.display_string()),
    }
}

/// Orders `cell` relative to `value`; `None` when either side is blank or numbers are
/// unordered (NaN).
fn compare(cell: &CellValue, value: &CellValue) -> Option<Ordering> {
    if cell.is_blank() || value.is_blank() {
        return None;
    }

    match (strict_number(cell), strict_number(value)) {
        (Some(a), Some(b)) => a.partial_cmp(&b),
        _ => Some(casefold(&cell.display_string()).cmp(&casefold(&value.display_string()))),
    }
}

/// Numeric reading used for filter comparisons.
///
/// Unlike aggregation coercion, text containing letters is never numeric here, so a legend
/// value like `"L1"` does not compare equal to `1`.
fn strict_number(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::Number(n) => Some(*n),
        CellValue::Text(s) => {
            let numeric_shape = s.chars().all(|c| {
                c.is_ascii_digit()
                    || c.is_whitespace()
                    || matches!(c, '.' | '-' | ',' | '$' | '%' | '€' | '£' | '¥')
            });
            if numeric_shape {
                parse_formatted_number(s)
            } else {
                None
            }
        }
        CellValue::Null => None,
    }
}

fn eq_case_insensitive(a: &str, b: &str) -> bool {
    if a.is_ascii() && b.is_ascii() {
        return a.eq_ignore_ascii_case(b);
    }
    casefold(a) == casefold(b)
}

fn casefold(s: &str) -> String {
    if s.is_ascii() {
        s.to_ascii_lowercase()
    } else {
        s.to_lowercase()
    }
}
