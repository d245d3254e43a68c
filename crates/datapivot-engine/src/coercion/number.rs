use datapivot_model::CellValue;

/// Converts a cell into a number, returning `NaN` when it has no numeric reading.
///
/// - numbers pass through unchanged
/// - null and empty text are `NaN`
/// - text keeps only ASCII digits, `.` and `-` (dropping currency symbols, thousands
///   separators, percent signs and whitespace) and parses the leading float literal
pub fn coerce_to_number(value: &CellValue) -> f64 {
    match value {
        CellValue::Number(n) => *n,
        CellValue::Null => f64::NAN,
        CellValue::Text(text) => parse_formatted_number(text).unwrap_or(f64::NAN),
    }
}

/// Like [`coerce_to_number`], but missing or unparsable cells read as `0` so they act as the
/// additive identity when accumulated into a running sum.
pub fn coerce_existing_cell_to_number(value: &CellValue) -> f64 {
    if value.is_blank() {
        return 0.0;
    }
    let n = coerce_to_number(value);
    if n.is_nan() {
        0.0
    } else {
        n
    }
}

pub(crate) fn parse_formatted_number(text: &str) -> Option<f64> {
    let stripped: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    leading_float_literal(&stripped)?.parse().ok()
}

/// Returns the longest prefix of `s` shaped like `-?digits[.digits]` with at least one digit.
fn leading_float_literal(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let mut end = 0;
    if bytes.first() == Some(&b'-') {
        end = 1;
    }

    let mut digits = 0usize;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        digits += 1;
    }

    if end < bytes.len() && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        let frac_digits = frac_end - end - 1;
        if digits + frac_digits > 0 {
            digits += frac_digits;
            end = frac_end;
        }
    }

    (digits > 0).then(|| &s[..end])
}
