//! Trading window for a same-day intraday request.
//!
//! The window always starts at the 09:30 market open of the current exchange
//! day and ends at the current minute. Both ends are sent as
//! `YYYY-MM-DDTHH:MM` without seconds or offset.

use chrono::{NaiveDateTime, Timelike};

use crate::tz::ExchangeTz;

/// Format used for the `start` and `end` query parameters.
pub const WINDOW_FORMAT: &str = "%Y-%m-%dT%H:%M";

const MARKET_OPEN_HOUR: u32 = 9;
const MARKET_OPEN_MINUTE: u32 = 30;

/// A `[start, end]` window in exchange wall-clock time, minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradingWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TradingWindow {
    /// Window from today's open up to `now`.
    ///
    /// Returns `None` when `now` is before 09:30, since the window would be
    /// empty or negative.
    pub fn for_wall_clock(now: NaiveDateTime) -> Option<Self> {
        let start = now
            .date()
            .and_hms_opt(MARKET_OPEN_HOUR, MARKET_OPEN_MINUTE, 0)?;
        let end = now.with_second(0)?.with_nanosecond(0)?;

        (end >= start).then_some(Self { start, end })
    }

    /// Window for the current moment in `tz`.
    pub fn current(tz: ExchangeTz) -> Option<Self> {
        Self::for_wall_clock(tz.now())
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// `start` formatted for the query string.
    pub fn start_param(&self) -> String {
        self.start.format(WINDOW_FORMAT).to_string()
    }

    /// `end` formatted for the query string.
    pub fn end_param(&self) -> String {
        self.end.format(WINDOW_FORMAT).to_string()
    }
}
