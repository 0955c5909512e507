//! Exports Tradier intraday time-and-sales bars for one symbol to a CSV file.
//!
//! The pipeline is linear: compute today's window from the 09:30 open to now,
//! fetch `markets/timesales` once, and write `datetime,open,high,low,close,volume`
//! rows to the destination. See [`pipeline::run`].

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod errors;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod providers;
pub mod tz;
pub mod window;

pub use errors::{Error, ErrorKind};
