//! Exchange time zone handling.
//!
//! Window timestamps are sent without an offset and the API reads them in the
//! exchange's local time, so "now" has to be taken in that zone rather than in
//! whatever zone the host happens to run in.
//!
//! - [`ExchangeTz::Named`]: an IANA zone parsed with `chrono-tz`
//!   (default `America/New_York`).
//! - [`ExchangeTz::Local`]: the host's local zone, selected with the literal `local`.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Zone used when nothing else is configured.
pub const DEFAULT_EXCHANGE_TZ: Tz = chrono_tz::America::New_York;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown time zone {0:?}: expected an IANA name such as America/New_York, or `local`")]
pub struct UnknownTimeZone(pub String);

/// The zone in which the trading window is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ExchangeTz {
    Local,
    Named(Tz),
}

impl Default for ExchangeTz {
    fn default() -> Self {
        ExchangeTz::Named(DEFAULT_EXCHANGE_TZ)
    }
}

impl ExchangeTz {
    /// Wall-clock time in this zone at `instant`.
    pub fn wall_clock_at(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        match self {
            ExchangeTz::Local => instant.with_timezone(&Local).naive_local(),
            ExchangeTz::Named(tz) => instant.with_timezone(tz).naive_local(),
        }
    }

    /// Current wall-clock time in this zone.
    pub fn now(&self) -> NaiveDateTime {
        self.wall_clock_at(Utc::now())
    }
}

impl fmt::Display for ExchangeTz {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExchangeTz::Local => f.write_str("local"),
            ExchangeTz::Named(tz) => f.write_str(tz.name()),
        }
    }
}

impl FromStr for ExchangeTz {
    type Err = UnknownTimeZone;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("local") {
            return Ok(ExchangeTz::Local);
        }
        trimmed
            .parse::<Tz>()
            .map(ExchangeTz::Named)
            .map_err(|_| UnknownTimeZone(s.to_string()))
    }
}

impl TryFrom<String> for ExchangeTz {
    type Error = UnknownTimeZone;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ExchangeTz> for String {
    fn from(value: ExchangeTz) -> Self {
        value.to_string()
    }
}
