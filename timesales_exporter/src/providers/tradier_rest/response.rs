//! Decoding of the `markets/timesales` response body.
//!
//! Expected shape:
//!
//! ```json
//! {"series": {"data": [{"timestamp": "...", "open": .., "high": .., "low": .., "close": .., "volume": ..}]}}
//! ```
//!
//! Tradier collapses a one-element array into a bare object, reports an
//! empty range as `"series": null`, and sometimes returns request errors with
//! a 200 status under `errors.error` or `fault.faultstring`.

use serde::Deserialize;
use serde_json::Value;
use snafu::{OptionExt, ResultExt};

use crate::{
    models::bar::Bar,
    providers::{
        ApiSnafu, InvalidRecordSnafu, MissingSeriesSnafu, ParseSnafu, ProviderError,
    },
};

/// Longest slice of a response body carried in an error message.
const MAX_ERROR_BODY: usize = 512;

/// Parses a successful response body into bars, in response order.
///
/// `status` is only used to label error payloads found in the body.
pub fn parse_timesales(status: u16, body: &str) -> Result<Vec<Bar>, ProviderError> {
    let value: Value = serde_json::from_str(body).context(ParseSnafu)?;

    if let Some(message) = error_payload(&value) {
        return ApiSnafu {
            status,
            body: message,
        }
        .fail();
    }

    let data = value
        .pointer("/series/data")
        .filter(|data| !data.is_null())
        .context(MissingSeriesSnafu)?;

    match data {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| Bar::deserialize(item).context(InvalidRecordSnafu { index }))
            .collect(),
        single => Ok(vec![
            Bar::deserialize(single).context(InvalidRecordSnafu { index: 0usize })?,
        ]),
    }
}

/// Error text from an error payload, if the body is one.
fn error_payload(value: &Value) -> Option<String> {
    if let Some(errors) = value.pointer("/errors/error") {
        return Some(match errors {
            Value::String(s) => s.clone(),
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_str().map_or_else(|| item.to_string(), str::to_string))
                .collect::<Vec<_>>()
                .join("; "),
            other => other.to_string(),
        });
    }

    value
        .pointer("/fault/faultstring")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Message for a non-success response: the API's own error text when the
/// body is an error payload, otherwise the (trimmed) raw body.
pub fn describe_failure(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| error_payload(&value))
        .unwrap_or_else(|| summarize_body(body))
}

/// Trims a body for inclusion in an error message.
pub fn summarize_body(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return "<empty body>".to_string();
    }
    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((cut, _)) => format!("{}…", &body[..cut]),
        None => body.to_string(),
    }
}
