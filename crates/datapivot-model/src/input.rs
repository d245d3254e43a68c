use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Column, Filter, Row, TableConfig};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("result set has {column_count} columns but row {row_index} has {row_width} cells")]
    RowWidthMismatch {
        column_count: usize,
        row_index: usize,
        row_width: usize,
    },
}

/// Everything the host supplies for one pivot pass.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotInput {
    pub columns: Vec<Column>,
    #[serde(default)]
    pub rows: Vec<Row>,
    #[serde(default)]
    pub table_config: TableConfig,
    #[serde(default)]
    pub filters: Vec<Filter>,
}

impl PivotInput {
    pub fn new(columns: Vec<Column>, rows: Vec<Row>) -> Self {
        Self {
            columns,
            rows,
            table_config: TableConfig::default(),
            filters: Vec::new(),
        }
    }

    pub fn with_config(mut self, table_config: TableConfig) -> Self {
        self.table_config = table_config;
        self
    }

    pub fn with_filters(mut self, filters: Vec<Filter>) -> Self {
        self.filters = filters;
        self
    }

    /// Checks that every row has exactly one cell per column.
    pub fn validate(&self) -> Result<(), InputError> {
        validate_rows(&self.columns, &self.rows)
    }
}

/// Checks the positional correspondence between `columns` and every row.
pub fn validate_rows(columns: &[Column], rows: &[Row]) -> Result<(), InputError> {
    let column_count = columns.len();
    for (row_index, row) in rows.iter().enumerate() {
        if row.len() != column_count {
            return Err(InputError::RowWidthMismatch {
                column_count,
                row_index,
                row_width: row.len(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CellValue, ColumnType};

    use pretty_assertions::assert_eq;

    fn columns() -> Vec<Column> {
        vec![
            Column::new("region", ColumnType::String).groupable(),
            Column::new("sales", ColumnType::DollarAmt),
        ]
    }

    #[test]
    fn accepts_rows_matching_column_count() {
        let input = PivotInput::new(
            columns(),
            vec![vec!["East".into(), 10.into()], vec![CellValue::Null, CellValue::Null]],
        );
        assert_eq!(input.validate(), Ok(()));
    }

    #[test]
    fn reports_first_row_with_wrong_width() {
        let input = PivotInput::new(
            columns(),
            vec![vec!["East".into(), 10.into()], vec!["West".into()]],
        );
        assert_eq!(
            input.validate(),
            Err(InputError::RowWidthMismatch {
                column_count: 2,
                row_index: 1,
                row_width: 1,
            })
        );
    }

    #[test]
    fn deserializes_camel_case_payload() {
        let json = r#"{
            "columns": [{"name": "region", "type": "STRING", "groupable": true}],
            "rows": [["East"]],
            "tableConfig": {"stringColumnIndex": 0}
        }"#;
        let input: PivotInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.table_config.string_column_index, Some(0));
        assert!(input.filters.is_empty());
        assert_eq!(input.rows, vec![vec![CellValue::from("East")]]);
    }
}
