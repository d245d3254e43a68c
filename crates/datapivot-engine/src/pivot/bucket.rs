use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use datapivot_model::{CellValue, DatePrecision};

/// Maps a raw date-typed category value to the bucket it is grouped under.
///
/// Only applied when the category column is date-typed. Implemented for plain closures so hosts
/// can supply their own precision logic.
pub trait CategoryBucketer {
    fn bucket(&self, value: &CellValue) -> CellValue;
}

impl<F> CategoryBucketer for F
where
    F: Fn(&CellValue) -> CellValue,
{
    fn bucket(&self, value: &CellValue) -> CellValue {
        self(value)
    }
}

/// Calendar bucketing of timestamps.
///
/// Numbers are read as Unix epoch seconds. Text is read as RFC 3339, an ISO-style
/// date/datetime, or a compact calendar value: `YYYY`, `YYYYMM` or `YYYYMMDD`. Labels sort
/// chronologically as plain strings:
///
/// | precision | label        |
/// |-----------|--------------|
/// | day       | `2024-03-05` |
/// | week      | `2024-W10`   |
/// | month     | `2024-03`    |
/// | quarter   | `2024-Q1`    |
/// | year      | `2024`       |
///
/// Values that cannot be read as a date are returned unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateBucketer {
    precision: DatePrecision,
}

impl DateBucketer {
    pub fn new(precision: DatePrecision) -> Self {
        Self { precision }
    }
}

impl CategoryBucketer for DateBucketer {
    fn bucket(&self, value: &CellValue) -> CellValue {
        match parse_datetime(value) {
            Some(dt) => CellValue::Text(bucket_label(dt, self.precision)),
            None => value.clone(),
        }
    }
}

fn bucket_label(dt: NaiveDateTime, precision: DatePrecision) -> String {
    match precision {
        DatePrecision::Day => dt.format("%Y-%m-%d").to_string(),
        DatePrecision::Week => {
            let week = dt.date().iso_week();
            format!("{}-W{:02}", week.year(), week.week())
        }
        DatePrecision::Month => dt.format("%Y-%m").to_string(),
        DatePrecision::Quarter => format!("{}-Q{}", dt.year(), dt.month0() / 3 + 1),
        DatePrecision::Year => dt.year().to_string(),
    }
}

fn parse_datetime(value: &CellValue) -> Option<NaiveDateTime> {
    match value {
        CellValue::Null => None,
        CellValue::Number(secs) => from_epoch_seconds(*secs),
        CellValue::Text(text) => parse_text_datetime(text),
    }
}

fn from_epoch_seconds(secs: f64) -> Option<NaiveDateTime> {
    if !secs.is_finite() {
        return None;
    }
    DateTime::from_timestamp(secs.trunc() as i64, 0).map(|dt| dt.naive_utc())
}

fn parse_text_datetime(text: &str) -> Option<NaiveDateTime> {
    let s = text.trim();
    if s.is_empty() {
        return None;
    }

    if s.bytes().all(|b| b.is_ascii_digit()) {
        return parse_compact_date(s);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Digit-only text is a calendar value, never a timestamp: `2019` is a year, not 1970.
fn parse_compact_date(s: &str) -> Option<NaiveDateTime> {
    let date = match s.len() {
        4 => NaiveDate::from_ymd_opt(s.parse().ok()?, 1, 1),
        6 => NaiveDate::from_ymd_opt(s[..4].parse().ok()?, s[4..].parse().ok()?, 1),
        8 => NaiveDate::parse_from_str(s, "%Y%m%d").ok(),
        _ => None,
    }?;
    date.and_hms_opt(0, 0, 0)
}
