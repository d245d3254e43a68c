use serde::{Deserialize, Serialize};

/// Semantic type of a result-set column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColumnType {
    String,
    Date,
    DateString,
    Quantity,
    DollarAmt,
    Ratio,
    Percent,
    Integer,
    Decimal,
    Float,
    #[default]
    #[serde(other)]
    Unknown,
}

impl ColumnType {
    /// Columns whose values can be summed into a pivot cell.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            ColumnType::Quantity
                | ColumnType::DollarAmt
                | ColumnType::Ratio
                | ColumnType::Percent
                | ColumnType::Integer
                | ColumnType::Decimal
                | ColumnType::Float
        )
    }

    pub fn is_date(self) -> bool {
        matches!(self, ColumnType::Date | ColumnType::DateString)
    }
}

/// Describes one field of a result set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub name: String,
    #[serde(default, rename = "display_name", alias = "displayName")]
    pub display_name: String,
    #[serde(default, rename = "type")]
    pub column_type: ColumnType,
    /// Eligible as a category or legend axis.
    #[serde(default)]
    pub groupable: bool,
    #[serde(
        default = "crate::serde_defaults::default_true",
        rename = "is_visible",
        alias = "isVisible",
        alias = "visible"
    )]
    pub is_visible: bool,
    /// Position hint supplied by the host. Row cells are always addressed by the column's
    /// position in the column list, not by this value.
    #[serde(default)]
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            column_type,
            groupable: false,
            is_visible: true,
            index: 0,
            id: None,
            field: None,
        }
    }

    pub fn groupable(mut self) -> Self {
        self.groupable = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.is_visible = false;
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    pub fn is_numeric(&self) -> bool {
        self.column_type.is_numeric()
    }

    /// Human label, falling back to `name` when no display name was supplied.
    pub fn label(&self) -> &str {
        if self.display_name.is_empty() {
            &self.name
        } else {
            &self.display_name
        }
    }
}
