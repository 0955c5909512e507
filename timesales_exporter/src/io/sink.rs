use std::path::PathBuf;

use async_trait::async_trait;
use snafu::{Backtrace, Snafu};

use crate::models::bar::Bar;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SinkError {
    /// A record could not be encoded as CSV.
    #[snafu(display("Failed to format CSV rows: {source}"))]
    Render {
        source: csv::Error,
        backtrace: Backtrace,
    },

    /// The in-memory CSV buffer could not be flushed or decoded.
    #[snafu(display("Failed to finish CSV buffer: {source}"))]
    Buffer {
        source: std::io::Error,
        backtrace: Backtrace,
    },

    /// The destination's directory does not exist. It is never created implicitly.
    #[snafu(display("Output directory {} does not exist", dir.display()))]
    MissingParent { dir: PathBuf, backtrace: Backtrace },

    #[snafu(display("Failed to create a temporary file in {}: {source}", dir.display()))]
    CreateTemp {
        dir: PathBuf,
        source: std::io::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("Failed to write {}: {source}", path.display()))]
    Write {
        path: PathBuf,
        source: std::io::Error,
        backtrace: Backtrace,
    },

    /// The existing destination is marked read-only. It is never replaced.
    #[snafu(display("Output file {} is read-only", path.display()))]
    ReadOnly { path: PathBuf, backtrace: Backtrace },

    /// Renaming the finished temporary file over the destination failed.
    #[snafu(display("Failed to replace {}: {source}", path.display()))]
    Persist {
        path: PathBuf,
        source: tempfile::PersistError,
        backtrace: Backtrace,
    },

    /// The blocking write task panicked or was cancelled.
    #[snafu(display("Write task failed: {source}"))]
    Task {
        source: tokio::task::JoinError,
        backtrace: Backtrace,
    },
}

#[async_trait]
pub trait DataSink {
    /// The type of output returned after a successful write operation.
    ///
    /// A file sink returns where it wrote and how many rows; other sinks can
    /// report whatever fits their destination.
    type Output;

    /// Writes `bars`, in order, to the destination.
    ///
    /// Either the whole set is written or the destination is left as it was.
    async fn write(&self, bars: &[Bar]) -> Result<Self::Output, SinkError>;
}
