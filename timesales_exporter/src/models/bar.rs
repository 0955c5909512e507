//! Canonical in-memory representation of one time-and-sales bar (OHLCV).
//!
//! Values are kept exactly as the API rendered them. Nothing downstream parses
//! prices or volumes, so a bar written to CSV carries the same digits the
//! provider sent.

use std::fmt;

use serde::{Deserialize, Deserializer, de};
use serde_json::Value;

/// A single field value in its source text form.
///
/// JSON strings are stored verbatim; JSON numbers keep their literal text
/// (`100.25` stays `100.25`, `12345` stays `12345`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValue(String);

impl FieldValue {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(Self(s)),
            // serde_json is built with `arbitrary_precision`, so this is the
            // literal from the body, not a reformatted f64.
            Value::Number(n) => Ok(Self(n.to_string())),
            other => Err(de::Error::invalid_type(
                unexpected(&other),
                &"a string or a number",
            )),
        }
    }
}

fn unexpected(value: &Value) -> de::Unexpected<'_> {
    match value {
        Value::Null => de::Unexpected::Unit,
        Value::Bool(b) => de::Unexpected::Bool(*b),
        Value::Array(_) => de::Unexpected::Seq,
        Value::Object(_) => de::Unexpected::Map,
        // Strings and numbers are accepted above.
        Value::String(s) => de::Unexpected::Str(s),
        Value::Number(_) => de::Unexpected::Other("number"),
    }
}

/// One intraday sample as returned under `series.data`.
///
/// Extra fields the provider sends (`time`, `price`, `vwap`) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Bar {
    /// Exchange-local timestamp of the bar.
    pub timestamp: FieldValue,
    pub open: FieldValue,
    pub high: FieldValue,
    pub low: FieldValue,
    pub close: FieldValue,
    pub volume: FieldValue,
}

impl Bar {
    /// The six output columns in CSV order.
    pub fn fields(&self) -> [&str; 6] {
        [
            self.timestamp.as_str(),
            self.open.as_str(),
            self.high.as_str(),
            self.low.as_str(),
            self.close.as_str(),
            self.volume.as_str(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_string_values_verbatim() {
        let bar: Bar = serde_json::from_str(
            r#"{"timestamp":"2024-01-02T09:30","open":"100.0","high":"100.5",
                "low":"99.8","close":"100.2","volume":"12345"}"#,
        )
        .unwrap();
        assert_eq!(
            bar.fields(),
            ["2024-01-02T09:30", "100.0", "100.5", "99.8", "100.2", "12345"]
        );
    }

    #[test]
    fn keeps_numeric_literals() {
        let bar: Bar = serde_json::from_str(
            r#"{"time":"2019-05-06T09:30:00","timestamp":1557149400,"price":289.07,
                "open":288.7,"high":289.5,"low":288.61,"close":289.26,"volume":1123744,
                "vwap":289.1}"#,
        )
        .unwrap();
        assert_eq!(bar.timestamp.as_str(), "1557149400");
        assert_eq!(bar.open.as_str(), "288.7");
        assert_eq!(bar.low.as_str(), "288.61");
        assert_eq!(bar.volume.as_str(), "1123744");
    }

    #[test]
    fn numeric_literals_are_not_reformatted() {
        let bar: Bar = serde_json::from_str(
            r#"{"timestamp":"t","open":100.50,"high":1.0e2,"low":289.10,
                "close":0.30000000000000004441,"volume":1}"#,
        )
        .unwrap();
        assert_eq!(
            bar.fields(),
            ["t", "100.50", "1.0e2", "289.10", "0.30000000000000004441", "1"]
        );
    }

    #[test]
    fn rejects_missing_fields() {
        let err = serde_json::from_str::<Bar>(
            r#"{"timestamp":"2024-01-02T09:30","open":1,"high":1,"low":1,"close":1}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("volume"), "{err}");
    }

    #[test]
    fn rejects_null_and_nested_values() {
        let null_close = r#"{"timestamp":"t","open":1,"high":1,"low":1,"close":null,"volume":1}"#;
        assert!(serde_json::from_str::<Bar>(null_close).is_err());

        let nested = r#"{"timestamp":"t","open":[1],"high":1,"low":1,"close":1,"volume":1}"#;
        assert!(serde_json::from_str::<Bar>(nested).is_err());
    }
}
