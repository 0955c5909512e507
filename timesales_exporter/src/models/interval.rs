use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::models::ModelError;

/// Sampling interval accepted by the time-and-sales endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Interval {
    Tick,
    OneMinute,
    #[default]
    FiveMinutes,
    FifteenMinutes,
}

impl Interval {
    /// The wire value sent as the `interval` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Tick => "tick",
            Interval::OneMinute => "1min",
            Interval::FiveMinutes => "5min",
            Interval::FifteenMinutes => "15min",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tick" => Ok(Interval::Tick),
            "1min" | "1m" => Ok(Interval::OneMinute),
            "5min" | "5m" => Ok(Interval::FiveMinutes),
            "15min" | "15m" => Ok(Interval::FifteenMinutes),
            _ => Err(ModelError::InvalidInterval {
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Interval {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Interval> for String {
    fn from(value: Interval) -> Self {
        value.as_str().to_string()
    }
}
