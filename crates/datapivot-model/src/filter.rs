//! Column-value filters applied to a result set before pivoting.

use serde::{Deserialize, Serialize};

use crate::CellValue;

/// Comparison applied between a row's cell and a filter value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterOperator {
    #[default]
    #[serde(rename = "=")]
    Equals,
    #[serde(rename = "!=")]
    NotEquals,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = ">=")]
    GreaterThanOrEqual,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "<=")]
    LessThanOrEqual,
    /// Case-insensitive substring match. A blank pattern matches only blank cells.
    #[serde(rename = "like")]
    Like,
}

/// A single active filter.
///
/// The target column is identified by whichever of `id`, `name` or `field` the host supplies;
/// `field` may also be a column position written as an integer string.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default)]
    pub value: CellValue,
    #[serde(default)]
    pub operator: FilterOperator,
}

impl Filter {
    /// Equality filter on the column with the given `id`.
    pub fn by_id(id: impl Into<String>, value: impl Into<CellValue>) -> Self {
        Self {
            id: Some(id.into()),
            value: value.into(),
            ..Self::default()
        }
    }

    /// Equality filter on the column with the given `name`.
    pub fn by_name(name: impl Into<String>, value: impl Into<CellValue>) -> Self {
        Self {
            name: Some(name.into()),
            value: value.into(),
            ..Self::default()
        }
    }

    /// Equality filter on the column at `position`.
    pub fn by_position(position: usize, value: impl Into<CellValue>) -> Self {
        Self {
            field: Some(position.to_string()),
            value: value.into(),
            ..Self::default()
        }
    }

    pub fn with_operator(mut self, operator: FilterOperator) -> Self {
        self.operator = operator;
        self
    }
}
