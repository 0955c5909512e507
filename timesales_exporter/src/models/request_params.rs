use crate::{
    models::{interval::Interval, session_filter::SessionFilter, symbol::Symbol},
    window::TradingWindow,
};

/// Parameters for one time-and-sales request.
///
/// This is the standard input for [`DataProvider`](crate::providers::DataProvider)
/// implementations. Providers turn it into their own wire format.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimesalesParams {
    /// Ticker to request (e.g. `QQQ`).
    pub symbol: Symbol,

    /// Sampling interval for each bar.
    pub interval: Interval,

    /// Exchange-local `[start, end]` window, minute precision.
    pub window: TradingWindow,

    /// Regular hours only (`open`) or the full session (`all`).
    pub session_filter: SessionFilter,
}
