//! Tradier REST implementation of [`DataProvider`](crate::providers::DataProvider)
//! for the `markets/timesales` endpoint.

pub mod params;
pub mod provider;
pub mod response;

use std::time::Duration;

use secrecy::SecretString;

pub use provider::TradierProvider;

/// Production API root.
pub const LIVE_BASE_URL: &str = "https://api.tradier.com/v1";

/// Sandbox API root (delayed data, separate token).
pub const SANDBOX_BASE_URL: &str = "https://sandbox.tradier.com/v1";

/// Path of the time-and-sales endpoint below the API root.
pub const TIMESALES_PATH: &str = "markets/timesales";

/// Default bound on the whole request, connect through body.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Everything needed to talk to Tradier.
#[derive(Debug)]
pub struct TradierSettings {
    /// Bearer token. Never logged.
    pub token: SecretString,
    /// API root, e.g. [`LIVE_BASE_URL`].
    pub base_url: String,
    pub timeout: Duration,
}
