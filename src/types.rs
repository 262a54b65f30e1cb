//! Type definitions for connector records and operation results

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use std::fmt;
use std::time::Duration;

/// A single field value inside a connector record
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// Absent or blank cell
    Null,
    /// String value
    String(String),
    /// Boolean value
    Bool(bool),
    /// Integer value (integral spreadsheet numerics narrow to this)
    Int(i64),
    /// Float value
    Float(f64),
    /// Date/time instant from a date-formatted cell
    DateTime(NaiveDateTime),
}

impl Value {
    /// Convert the value to its string form. `Null` stringifies to the
    /// empty string.
    pub fn as_string(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::DateTime(d) => d.to_string(),
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Try to convert to integer
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Float(f) => Some(*f as i64),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Try to convert to float
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Try to convert to boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Int(i) => Some(*i != 0),
            Value::String(s) => match s.to_lowercase().as_str() {
                "true" | "yes" | "1" => Some(true),
                "false" | "no" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(d: NaiveDateTime) -> Self {
        Value::DateTime(d)
    }
}

/// An ordered mapping from field name to value.
///
/// Field order follows the column order resolved at materialization time;
/// records are constructed fresh per row and owned by the caller.
pub type Record = IndexMap<String, Value>;

/// Outcome of a bulk read or write operation.
///
/// Sheet-not-found is reported here as `success == false` rather than as an
/// error so callers can branch without error handling.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConnectorOutcome {
    /// Whether the operation completed
    pub success: bool,
    /// Human-readable summary
    pub message: String,
    /// Records read, or echoed back after a write
    pub records: Vec<Record>,
    /// Number of records processed
    pub records_processed: usize,
    /// Wall-clock time the operation took
    pub elapsed: Duration,
}

impl ConnectorOutcome {
    /// Successful outcome carrying the processed records
    pub fn completed(message: impl Into<String>, records: Vec<Record>, elapsed: Duration) -> Self {
        ConnectorOutcome {
            success: true,
            message: message.into(),
            records_processed: records.len(),
            records,
            elapsed,
        }
    }

    /// Structured failure outcome (no records, zero elapsed)
    pub fn failed(message: impl Into<String>) -> Self {
        ConnectorOutcome {
            success: false,
            message: message.into(),
            records: Vec::new(),
            records_processed: 0,
            elapsed: Duration::ZERO,
        }
    }
}

/// Descriptive metadata for a connector implementation
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ConnectorMetadata {
    pub name: &'static str,
    pub description: &'static str,
    pub version: &'static str,
    pub author: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_conversions() {
        let val = Value::Int(42);
        assert_eq!(val.as_i64(), Some(42));
        assert_eq!(val.as_f64(), Some(42.0));

        let val = Value::String("true".to_string());
        assert_eq!(val.as_bool(), Some(true));

        assert!(Value::Null.is_null());
        assert_eq!(Value::Null.as_string(), "");
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::from("abc").to_string(), "abc");
        assert_eq!(Value::from(5i64).to_string(), "5");
        assert_eq!(Value::from(false).to_string(), "false");
    }

    #[test]
    fn test_record_preserves_insertion_order() {
        let mut record = Record::new();
        record.insert("z".to_string(), Value::Int(1));
        record.insert("a".to_string(), Value::Int(2));
        record.insert("m".to_string(), Value::Int(3));

        let keys: Vec<_> = record.keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_outcome_constructors() {
        let ok = ConnectorOutcome::completed("done", vec![Record::new()], Duration::from_millis(5));
        assert!(ok.success);
        assert_eq!(ok.records_processed, 1);

        let failed = ConnectorOutcome::failed("Sheet not found");
        assert!(!failed.success);
        assert_eq!(failed.records_processed, 0);
        assert!(failed.records.is_empty());
    }
}
