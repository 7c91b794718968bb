//! Cell value types

use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Represents the value stored in a cell
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", content = "value", rename_all = "lowercase")
)]
pub enum CellValue {
    /// Empty cell (no value)
    #[default]
    Empty,

    /// Boolean value (TRUE/FALSE)
    Boolean(bool),

    /// Numeric value
    Number(f64),

    /// String value
    String(String),

    /// Date or date-time value
    Date(NaiveDateTime),
}

impl CellValue {
    /// Create a new string value
    pub fn string<S: Into<String>>(s: S) -> Self {
        CellValue::String(s.into())
    }

    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Try to get the value as a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get the value as a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get the value as a string
    pub fn as_string(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Try to get the value as a date-time
    pub fn as_date(&self) -> Option<NaiveDateTime> {
        match self {
            CellValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Check whether `text`, coerced to this value's type, equals this value
    ///
    /// Numbers compare numerically ("15" and "15.0" both match `15`),
    /// booleans accept TRUE/FALSE in any case, dates accept ISO dates or
    /// date-times, and text compares exactly. An empty cell only matches
    /// empty text.
    pub fn matches_text(&self, text: &str) -> bool {
        match self {
            CellValue::Empty => text.is_empty(),
            CellValue::Boolean(b) => parse_bool(text) == Some(*b),
            CellValue::Number(n) => text.trim().parse::<f64>().map_or(false, |p| p == *n),
            CellValue::String(s) => s == text,
            CellValue::Date(d) => parse_date(text).map_or(false, |p| p == *d),
        }
    }

    /// Detect a value from its text form
    ///
    /// A number, boolean or date is only detected when `text` is exactly how
    /// that value displays, so "15" and "TRUE" are typed while "007",
    /// "15.0" or "true" stay text.
    pub fn infer(text: &str) -> Self {
        if text.is_empty() {
            return CellValue::Empty;
        }

        let typed = parse_bool(text)
            .map(CellValue::Boolean)
            .or_else(|| {
                text.parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite())
                    .map(CellValue::Number)
            })
            .or_else(|| parse_date(text).map(CellValue::Date));

        match typed {
            Some(value) if value.to_string() == text => value,
            _ => CellValue::string(text),
        }
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn parse_date(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, DATE_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => write!(f, ""),
            CellValue::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            CellValue::String(s) => write!(f, "{}", s),
            CellValue::Date(d) => {
                if d.time() == chrono::NaiveTime::MIN {
                    write!(f, "{}", d.format(DATE_FORMAT))
                } else {
                    write!(f, "{}", d.format(DATETIME_FORMATS[0]))
                }
            }
        }
    }
}

// Conversions from common types

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::string(s)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(d: NaiveDateTime) -> Self {
        CellValue::Date(d)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(d: NaiveDate) -> Self {
        CellValue::Date(d.and_time(chrono::NaiveTime::MIN))
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(CellValue::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_coercion() {
        let v = CellValue::Number(15.0);
        assert!(v.matches_text("15"));
        assert!(v.matches_text("15.0"));
        assert!(v.matches_text(" 15 "));
        assert!(!v.matches_text("015x"));
        assert!(!v.matches_text("16"));
    }

    #[test]
    fn test_text_is_exact() {
        let v = CellValue::string("North");
        assert!(v.matches_text("North"));
        assert!(!v.matches_text("north"));
        assert!(!v.matches_text("North "));
    }

    #[test]
    fn test_bool_and_date_coercion() {
        assert!(CellValue::Boolean(true).matches_text("TRUE"));
        assert!(CellValue::Boolean(false).matches_text("false"));
        assert!(!CellValue::Boolean(false).matches_text("0"));

        let d = CellValue::from(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert!(d.matches_text("2024-03-01"));
        assert!(d.matches_text("2024-03-01 00:00:00"));
        assert!(!d.matches_text("2024-03-02"));
        assert!(CellValue::Empty.matches_text(""));
    }

    #[test]
    fn test_infer() {
        assert_eq!(CellValue::infer("42"), CellValue::Number(42.0));
        assert_eq!(CellValue::infer("-2.5"), CellValue::Number(-2.5));
        assert_eq!(CellValue::infer("TRUE"), CellValue::Boolean(true));
        assert_eq!(CellValue::infer(""), CellValue::Empty);

        // Only canonical text is typed
        for text in ["007", "15.0", "+5", "1e3", " 42", "true", "2024-1-31", "2024-01-31 00:00:00"] {
            assert_eq!(CellValue::infer(text), CellValue::string(text), "{text:?}");
        }

        assert_eq!(CellValue::infer("NaN"), CellValue::string("NaN"));
        assert_eq!(CellValue::infer("hello"), CellValue::string("hello"));
        assert!(CellValue::infer("2024-01-31").as_date().is_some());
    }

    #[test]
    fn test_display() {
        assert_eq!(CellValue::Number(15.0).to_string(), "15");
        assert_eq!(CellValue::Number(2.5).to_string(), "2.5");
        assert_eq!(CellValue::Boolean(true).to_string(), "TRUE");
        let d = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(CellValue::from(d).to_string(), "2024-03-01");
    }
}
