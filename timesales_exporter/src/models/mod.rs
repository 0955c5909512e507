use thiserror::Error;

pub mod bar;
pub mod interval;
pub mod request_params;
pub mod session_filter;
pub mod symbol;

/// Errors raised when a request parameter fails to parse or validate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("Invalid interval {value:?}: expected one of tick, 1min, 5min, 15min")]
    InvalidInterval { value: String },

    #[error("Invalid session filter {value:?}: expected `all` or `open`")]
    InvalidSessionFilter { value: String },

    #[error("Invalid symbol {value:?}: {message}")]
    InvalidSymbol { value: String, message: String },
}
