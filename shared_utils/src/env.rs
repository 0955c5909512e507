use thiserror::Error;

/// An environment variable required by the application is not set.
#[derive(Debug, Error)]
#[error("Missing environment variable: {0}")]
pub struct MissingEnvVarError(pub String);

/// Reads an optional variable from the process environment.
///
/// Empty and whitespace-only values count as unset, matching [`require_var`],
/// so this can be passed directly as the lookup for it.
pub fn get_optional_env_var(name: &str) -> Option<String> {
    non_empty(std::env::var(name).ok())
}

/// Looks up `name` through `lookup`, treating blank values as missing.
///
/// Callers that resolve configuration from something other than the process
/// environment (a map in tests, for instance) pass their own lookup.
pub fn require_var<F>(name: &str, lookup: F) -> Result<String, MissingEnvVarError>
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup(name)).ok_or_else(|| MissingEnvVarError(name.to_string()))
}

/// Parses a boolean flag such as `SANDBOX=true`.
///
/// Accepts `true/false`, `1/0`, `yes/no` and `on/off`, case-insensitively.
/// Returns `None` for anything else.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
