use crate::models::request_params::TimesalesParams;

/// Builds the query string for `markets/timesales`.
///
/// The endpoint takes exactly these five arguments; order matches the
/// documented parameter list.
pub fn construct_params(params: &TimesalesParams) -> Vec<(&'static str, String)> {
    vec![
        ("symbol", params.symbol.to_string()),
        ("interval", params.interval.as_str().to_string()),
        ("start", params.window.start_param()),
        ("end", params.window.end_param()),
        ("session_filter", params.session_filter.as_str().to_string()),
    ]
}
