use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One row of a result set. Cells correspond positionally to the result set's columns.
pub type Row = Vec<CellValue>;

/// Scalar cell value used for result-set rows and pivot output payloads.
///
/// Serialized untagged so JSON result sets (`null`, numbers, strings) map directly onto it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Null,
    Number(f64),
    /// Raw or pre-formatted text, e.g. `"East"` or `"$1,234.56"`.
    Text(String),
}

impl CellValue {
    /// Returns a canonical bit pattern for numeric group keys.
    ///
    /// `0.0` and `-0.0` are treated as the same item, and all NaN payloads are treated as the
    /// same item.
    pub fn canonical_number_bits(n: f64) -> u64 {
        if n == 0.0 {
            return 0.0_f64.to_bits();
        }
        if n.is_nan() {
            return f64::NAN.to_bits();
        }
        n.to_bits()
    }

    /// Converts this value into a typed key suitable for grouping and sorting.
    pub fn to_group_key(&self) -> GroupKey {
        match self {
            CellValue::Null => GroupKey::Blank,
            CellValue::Number(n) => GroupKey::Number(Self::canonical_number_bits(*n)),
            CellValue::Text(s) => GroupKey::Text(s.clone()),
        }
    }

    /// Returns a display-oriented string for this value (not a stable serialization).
    pub fn display_string(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Text(s) => s.clone(),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// `true` for null cells and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) => false,
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Number(f64::from(value))
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Null)
    }
}

/// Hashable, totally ordered key derived from a [`CellValue`].
///
/// Used to detect distinct category/legend values. Two cells map to the same key when they
/// would render as the same pivot item.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Blank,
    Number(u64),
    Text(String),
}

impl GroupKey {
    fn kind_rank(&self) -> u8 {
        match self {
            GroupKey::Number(_) => 0,
            GroupKey::Text(_) => 1,
            GroupKey::Blank => 2,
        }
    }

    /// Human-friendly label for this item, as used for synthesized pivot column names.
    pub fn display_string(&self) -> String {
        match self {
            GroupKey::Blank => "(blank)".to_string(),
            GroupKey::Number(bits) => CellValue::Number(f64::from_bits(*bits)).display_string(),
            GroupKey::Text(s) => s.clone(),
        }
    }

    pub fn to_cell_value(&self) -> CellValue {
        match self {
            GroupKey::Blank => CellValue::Null,
            GroupKey::Number(bits) => CellValue::Number(f64::from_bits(*bits)),
            GroupKey::Text(s) => CellValue::Text(s.clone()),
        }
    }
}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GroupKey {
    fn cmp(&self, other: &Self) -> Ordering {
        // Fixed cross-type ordering: numbers, then text, blanks last.
        let rank_cmp = self.kind_rank().cmp(&other.kind_rank());
        if rank_cmp != Ordering::Equal {
            return rank_cmp;
        }

        match (self, other) {
            (GroupKey::Number(a), GroupKey::Number(b)) => {
                f64::from_bits(*a).total_cmp(&f64::from_bits(*b))
            }
            (GroupKey::Text(a), GroupKey::Text(b)) => {
                // Case-insensitive primary order with a case-sensitive tiebreak keeps the
                // ordering total.
                let ord = cmp_text_case_insensitive(a, b);
                if ord != Ordering::Equal {
                    ord
                } else {
                    a.cmp(b)
                }
            }
            _ => Ordering::Equal,
        }
    }
}

fn cmp_text_case_insensitive(a: &str, b: &str) -> Ordering {
    if a.is_ascii() && b.is_ascii() {
        return a
            .bytes()
            .map(|c| c.to_ascii_lowercase())
            .cmp(b.bytes().map(|c| c.to_ascii_lowercase()));
    }
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}
