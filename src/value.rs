//! Cell values and declared column types

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Declared type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Integer,
    Float,
    Text,
    Boolean,
    Timestamp,
}

impl DataType {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "int" | "integer" | "bigint" => Ok(Self::Integer),
            "float" | "double" | "real" => Ok(Self::Float),
            "text" | "string" | "varchar" => Ok(Self::Text),
            "bool" | "boolean" => Ok(Self::Boolean),
            "timestamp" | "datetime" => Ok(Self::Timestamp),
            other => Err(format!(
                "Invalid column type: {}. Use 'integer', 'float', 'text', 'boolean' or 'timestamp'",
                other
            )),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Integer => "INTEGER",
            DataType::Float => "FLOAT",
            DataType::Text => "TEXT",
            DataType::Boolean => "BOOLEAN",
            DataType::Timestamp => "TIMESTAMP",
        };
        f.write_str(name)
    }
}

/// A single cell as read from a row cursor
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
    Boolean(bool),
    Timestamp(NaiveDateTime),
}

/// Timestamp layouts accepted when parsing text
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Parse a raw text field into a value of the given declared type
    pub fn parse_as(raw: &str, data_type: DataType) -> Result<Self, String> {
        if data_type == DataType::Text {
            return Ok(Self::Text(raw.to_string()));
        }
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Self::Null);
        }
        match data_type {
            DataType::Integer => trimmed
                .parse::<i64>()
                .map(Self::Integer)
                .map_err(|_| format!("'{}' is not an integer", trimmed)),
            DataType::Float => trimmed
                .parse::<f64>()
                .map(Self::Float)
                .map_err(|_| format!("'{}' is not a float", trimmed)),
            DataType::Boolean => {
                if trimmed.eq_ignore_ascii_case("true") {
                    Ok(Self::Boolean(true))
                } else if trimmed.eq_ignore_ascii_case("false") {
                    Ok(Self::Boolean(false))
                } else {
                    Err(format!("'{}' is not a boolean", trimmed))
                }
            }
            DataType::Timestamp => {
                if let Ok(date) = chrono::NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
                    if let Some(ts) = date.and_hms_opt(0, 0, 0) {
                        return Ok(Self::Timestamp(ts));
                    }
                }
                TIMESTAMP_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
                    .map(Self::Timestamp)
                    .ok_or_else(|| format!("'{}' is not a timestamp", trimmed))
            }
            DataType::Text => Ok(Self::Text(raw.to_string())),
        }
    }

    /// Ordering used between key values.
    ///
    /// Values of the same kind use their natural order; mixed kinds fall back
    /// to the lexical order of their rendered text.
    pub fn key_cmp(&self, other: &CellValue) -> Ordering {
        match (self, other) {
            (CellValue::Integer(a), CellValue::Integer(b)) => a.cmp(b),
            (CellValue::Float(a), CellValue::Float(b)) => a.total_cmp(b),
            (CellValue::Text(a), CellValue::Text(b)) => a.cmp(b),
            (CellValue::Boolean(a), CellValue::Boolean(b)) => a.cmp(b),
            (CellValue::Timestamp(a), CellValue::Timestamp(b)) => a.cmp(b),
            (CellValue::Null, CellValue::Null) => Ordering::Equal,
            _ => self.to_string().cmp(&other.to_string()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Integer(i) => write!(f, "{}", i),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Boolean(b) => write!(f, "{}", b),
            CellValue::Timestamp(ts) if ts.nanosecond() == 0 => {
                write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S"))
            }
            CellValue::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S%.f")),
        }
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Integer(v)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float(v)
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        CellValue::Text(v.to_string())
    }
}

impl From<String> for CellValue {
    fn from(v: String) -> Self {
        CellValue::Text(v)
    }
}

impl From<bool> for CellValue {
    fn from(v: bool) -> Self {
        CellValue::Boolean(v)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(v: NaiveDateTime) -> Self {
        CellValue::Timestamp(v)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(CellValue::Null)
    }
}
