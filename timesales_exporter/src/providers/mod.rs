//! Provider abstraction for market data sources.
//!
//! This module defines the [`DataProvider`] trait, the seam between the export
//! pipeline and a concrete vendor API. [`tradier_rest`] is the implementation
//! used by the binary; tests substitute in-memory providers.
//!
//! The trait is async and object safe, so callers can hold a
//! `Box<dyn DataProvider>` chosen at runtime.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use timesales_exporter::models::{bar::Bar, request_params::TimesalesParams};
//! use timesales_exporter::providers::{DataProvider, ProviderError};
//!
//! struct FixedProvider(Vec<Bar>);
//!
//! #[async_trait]
//! impl DataProvider for FixedProvider {
//!     async fn fetch_bars(&self, _params: &TimesalesParams) -> Result<Vec<Bar>, ProviderError> {
//!         Ok(self.0.clone())
//!     }
//! }
//! ```

pub mod tradier_rest;

use async_trait::async_trait;
use snafu::{Backtrace, Snafu};

use crate::models::{bar::Bar, request_params::TimesalesParams};

/// Trait for fetching intraday bars from a market data provider.
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Fetches the bars for `params`, in the order the provider returns them.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Bar>)` - Possibly empty when the window has no trades.
    /// * `Err(ProviderError)` - Network, HTTP status or response shape failures.
    async fn fetch_bars(&self, params: &TimesalesParams) -> Result<Vec<Bar>, ProviderError>;
}

/// Errors that can occur during the creation of a provider instance.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderInitError {
    /// failed to init reqwest client
    #[snafu(display("Failed to build HTTP client: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// API token contains characters that cannot go in a header.
    #[snafu(display("Invalid API token format: {source}"))]
    InvalidToken {
        source: reqwest::header::InvalidHeaderValue,
        backtrace: Backtrace,
    },

    /// Base URL does not parse or is not http(s).
    #[snafu(display("Invalid base URL {url:?}: {message}"))]
    InvalidBaseUrl {
        url: String,
        message: String,
        backtrace: Backtrace,
    },
}

/// Errors that can occur within a `DataProvider` implementation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderError {
    /// The request never produced a response (connect, DNS, timeout, body read).
    #[snafu(display("Request to {url} failed: {source}"))]
    Network {
        url: String,
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// The API answered with a non-success status or an error payload.
    #[snafu(display("API error (HTTP {status}): {body}"))]
    Api {
        status: u16,
        body: String,
        backtrace: Backtrace,
    },

    /// The response body is not valid JSON.
    #[snafu(display("Response is not valid JSON: {source}"))]
    Parse {
        source: serde_json::Error,
        backtrace: Backtrace,
    },

    /// The response parsed but carries no `series.data`.
    #[snafu(display("Response has no `series.data` field"))]
    MissingSeries { backtrace: Backtrace },

    /// One element of `series.data` lacks a field or has an unusable value.
    #[snafu(display("Record {index} in `series.data` is malformed: {source}"))]
    InvalidRecord {
        index: usize,
        source: serde_json::Error,
        backtrace: Backtrace,
    },
}
