//! Export configuration: layering, parsing and validation.
//!
//! Values are resolved from four layers, lowest precedence first:
//!
//! 1. built-in defaults (`QQQ`, `5min`, `open`, `America/New_York`, 30 s timeout);
//! 2. an optional TOML file with an `[export]` table;
//! 3. environment variables (optionally seeded from a `.env` file);
//! 4. command-line overrides.
//!
//! The API token is only ever read from `TRADIER_TOKEN`, never from the file,
//! and is kept in a [`SecretString`]. Resolution takes an environment lookup
//! function so callers and tests can supply variables without touching the
//! process environment.
//!
//! Example file:
//!
//! ```toml
//! [export]
//! symbol = "QQQ"
//! interval = "5min"
//! session_filter = "open"
//! output = "/var/lib/timesales/qqq_intraday_data.csv"
//! timezone = "America/New_York"
//! timeout_secs = 20
//! quoting = "always"
//! sandbox = false
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use secrecy::SecretString;
use serde::Deserialize;
use shared_utils::env::{MissingEnvVarError, get_optional_env_var, parse_flag, require_var};
use thiserror::Error;

use crate::{
    io::csv_file::Quoting,
    models::{interval::Interval, session_filter::SessionFilter, symbol::Symbol},
    providers::tradier_rest::{DEFAULT_TIMEOUT, LIVE_BASE_URL, SANDBOX_BASE_URL, TradierSettings},
    tz::ExchangeTz,
};

pub const TOKEN_VAR: &str = "TRADIER_TOKEN";
pub const BASE_URL_VAR: &str = "TRADIER_BASE_URL";
pub const SANDBOX_VAR: &str = "SANDBOX";
pub const SYMBOL_VAR: &str = "TIMESALES_SYMBOL";
pub const INTERVAL_VAR: &str = "TIMESALES_INTERVAL";
pub const SESSION_FILTER_VAR: &str = "TIMESALES_SESSION_FILTER";
pub const OUTPUT_VAR: &str = "TIMESALES_OUTPUT";
pub const TZ_VAR: &str = "TIMESALES_TZ";

pub const DEFAULT_SYMBOL: &str = "QQQ";

/// Errors related to application configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The API token is not set.
    #[error(transparent)]
    MissingEnvVar(#[from] MissingEnvVarError),

    /// A required setting has no value in any layer.
    #[error("Missing required setting `{field}`: {hint}")]
    Missing {
        field: &'static str,
        hint: &'static str,
    },

    /// A setting is present but unusable.
    #[error("Invalid value for `{field}`: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },

    #[error("Failed to read config file {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {source}", path.display())]
    ParseFile {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to load env file {}: {source}", path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
}

/// One layer of optional settings. Used for the file's `[export]` table, the
/// environment and command-line overrides alike.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    pub symbol: Option<String>,
    pub interval: Option<String>,
    pub session_filter: Option<String>,
    pub output: Option<PathBuf>,
    pub timezone: Option<String>,
    pub timeout_secs: Option<u64>,
    pub quoting: Option<String>,
    pub sandbox: Option<bool>,
    pub base_url: Option<String>,
}

impl ConfigLayer {
    /// Combines two layers; values set in `higher` win.
    pub fn overlay(self, higher: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            symbol: higher.symbol.or(self.symbol),
            interval: higher.interval.or(self.interval),
            session_filter: higher.session_filter.or(self.session_filter),
            output: higher.output.or(self.output),
            timezone: higher.timezone.or(self.timezone),
            timeout_secs: higher.timeout_secs.or(self.timeout_secs),
            quoting: higher.quoting.or(self.quoting),
            sandbox: higher.sandbox.or(self.sandbox),
            base_url: higher.base_url.or(self.base_url),
        }
    }

    /// Reads the environment-backed settings through `lookup`.
    pub fn from_env<F>(lookup: F) -> Result<ConfigLayer, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let sandbox = match get(SANDBOX_VAR) {
            Some(raw) => Some(parse_flag(&raw).ok_or_else(|| ConfigError::Invalid {
                field: "sandbox",
                message: format!("{SANDBOX_VAR}={raw:?} is not a boolean"),
            })?),
            None => None,
        };

        Ok(ConfigLayer {
            symbol: get(SYMBOL_VAR),
            interval: get(INTERVAL_VAR),
            session_filter: get(SESSION_FILTER_VAR),
            output: get(OUTPUT_VAR).map(PathBuf::from),
            timezone: get(TZ_VAR),
            timeout_secs: None,
            quoting: None,
            sandbox,
            base_url: get(BASE_URL_VAR),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    export: ConfigLayer,
}

/// Parses the TOML config format.
pub fn parse_config_str(s: &str) -> Result<ConfigLayer, toml::de::Error> {
    toml::from_str::<FileConfig>(s).map(|file| file.export)
}

/// Reads and parses a TOML config file.
pub fn load_config_file(path: &Path) -> Result<ConfigLayer, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config_str(&content).map_err(|source| ConfigError::ParseFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Profile file loaded when sandbox mode is on.
pub const SANDBOX_ENV_FILE: &str = ".env.sandbox";
/// Profile file loaded otherwise.
pub const LIVE_ENV_FILE: &str = ".env.live";

/// Loads dotenv files into the process environment and returns the ones read.
///
/// With an explicit `path` only that file is loaded, and it must exist.
/// Without one, `.env` in the current directory (or a parent) is loaded if
/// present, then `.env.sandbox` or `.env.live` from the current directory
/// depending on `SANDBOX`. Variables that are already set are never
/// overridden, so the shell beats `.env`, which beats the profile file.
pub fn load_env_file(path: Option<&Path>) -> Result<Vec<PathBuf>, ConfigError> {
    if let Some(path) = path {
        load_dotenv_from(path)?;
        return Ok(vec![path.to_path_buf()]);
    }

    let mut loaded = Vec::new();
    match dotenvy::dotenv() {
        Ok(found) => loaded.push(found),
        Err(e) if e.not_found() => {}
        Err(source) => {
            return Err(ConfigError::EnvFile {
                path: PathBuf::from(".env"),
                source,
            });
        }
    }

    // An unparsable SANDBOX is reported later by `ConfigLayer::from_env`.
    let sandbox = get_optional_env_var(SANDBOX_VAR)
        .and_then(|raw| parse_flag(&raw))
        .unwrap_or(false);
    loaded.extend(load_profile_env_file(Path::new("."), sandbox)?);
    Ok(loaded)
}

/// Loads `.env.sandbox` or `.env.live` from `dir`, if that file exists.
pub fn load_profile_env_file(dir: &Path, sandbox: bool) -> Result<Option<PathBuf>, ConfigError> {
    let path = dir.join(if sandbox { SANDBOX_ENV_FILE } else { LIVE_ENV_FILE });
    if !path.is_file() {
        return Ok(None);
    }
    load_dotenv_from(&path)?;
    Ok(Some(path))
}

fn load_dotenv_from(path: &Path) -> Result<(), ConfigError> {
    dotenvy::from_path(path).map_err(|source| ConfigError::EnvFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Fully resolved settings for one export run.
#[derive(Debug)]
pub struct ExportConfig {
    pub tradier: TradierSettings,
    pub symbol: Symbol,
    pub interval: Interval,
    pub session_filter: SessionFilter,
    pub output: PathBuf,
    pub timezone: ExchangeTz,
    pub quoting: Quoting,
}

impl ExportConfig {
    /// Resolves the final configuration.
    ///
    /// `file` and `overrides` are the file and command-line layers; the
    /// environment layer and the token come from `lookup`.
    pub fn resolve<F>(
        file: Option<ConfigLayer>,
        overrides: ConfigLayer,
        lookup: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = SecretString::from(require_var(TOKEN_VAR, &lookup)?);
        let env = ConfigLayer::from_env(&lookup)?;
        let layer = file.unwrap_or_default().overlay(env).overlay(overrides);

        let symbol = parse_field("symbol", layer.symbol.as_deref().unwrap_or(DEFAULT_SYMBOL))?;
        let interval = parse_optional("interval", layer.interval.as_deref())?;
        let session_filter = parse_optional("session_filter", layer.session_filter.as_deref())?;
        let timezone = parse_optional("timezone", layer.timezone.as_deref())?;
        let quoting = parse_optional("quoting", layer.quoting.as_deref())?;

        let output = layer
            .output
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or(ConfigError::Missing {
                field: "output",
                hint: "set TIMESALES_OUTPUT, `output` in the config file, or pass --output",
            })?;

        let timeout = match layer.timeout_secs {
            Some(0) => {
                return Err(ConfigError::Invalid {
                    field: "timeout_secs",
                    message: "must be at least 1 second".to_string(),
                });
            }
            Some(secs) => Duration::from_secs(secs),
            None => DEFAULT_TIMEOUT,
        };

        let sandbox = layer.sandbox.unwrap_or(false);
        let base_url = layer.base_url.unwrap_or_else(|| {
            if sandbox {
                SANDBOX_BASE_URL.to_string()
            } else {
                LIVE_BASE_URL.to_string()
            }
        });

        Ok(ExportConfig {
            tradier: TradierSettings {
                token,
                base_url,
                timeout,
            },
            symbol,
            interval,
            session_filter,
            output,
            timezone,
            quoting,
        })
    }
}

fn parse_field<T>(field: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
        field,
        message: e.to_string(),
    })
}

fn parse_optional<T>(field: &'static str, raw: Option<&str>) -> Result<T, ConfigError>
where
    T: std::str::FromStr + Default,
    T::Err: std::fmt::Display,
{
    raw.map_or_else(|| Ok(T::default()), |raw| parse_field(field, raw))
}
