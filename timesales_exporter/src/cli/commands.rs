use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::{config::ConfigLayer, io::csv_file::Quoting};

/// Fetch today's intraday bars for one symbol from Tradier and write them as CSV.
///
/// Requires TRADIER_TOKEN in the environment (a `.env` file is honored).
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to a TOML config file with an [export] table
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Dotenv file to load instead of ./.env and ./.env.live (or ./.env.sandbox)
    #[arg(long, value_name = "FILE")]
    pub env_file: Option<PathBuf>,

    /// Ticker symbol (default QQQ)
    #[arg(short, long)]
    pub symbol: Option<String>,

    /// Sampling interval: tick, 1min, 5min, 15min (default 5min)
    #[arg(short, long)]
    pub interval: Option<String>,

    /// Session filter: open (regular hours) or all (default open)
    #[arg(long)]
    pub session_filter: Option<String>,

    /// Destination CSV file; replaced on every run
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Exchange time zone as an IANA name, or `local` (default America/New_York)
    #[arg(long)]
    pub timezone: Option<String>,

    /// Request timeout in seconds (default 30)
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Quote every data field, or only where needed
    #[arg(long, value_enum)]
    pub quoting: Option<Quoting>,

    /// Use the Tradier sandbox API
    #[arg(long)]
    pub sandbox: bool,

    /// Override the API root (e.g. https://sandbox.tradier.com/v1)
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// The command-line layer of the configuration.
    pub fn overrides(&self) -> ConfigLayer {
        ConfigLayer {
            symbol: self.symbol.clone(),
            interval: self.interval.clone(),
            session_filter: self.session_filter.clone(),
            output: self.output.clone(),
            timezone: self.timezone.clone(),
            timeout_secs: self.timeout_secs,
            quoting: self.quoting.map(|q| q.to_string()),
            sandbox: self.sandbox.then_some(true),
            base_url: self.base_url.clone(),
        }
    }
}
