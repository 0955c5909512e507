use std::fmt;

use thiserror::Error;

use crate::{
    config::ConfigError,
    io::sink::SinkError,
    providers::{ProviderError, ProviderInitError},
};

/// The unified error type for the `timesales_exporter` crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Settings are missing or invalid. Raised before any network call.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The HTTP client could not be set up from the settings.
    #[error("Provider initialization error: {0}")]
    ProviderInit(#[from] ProviderInitError),

    /// Fetching or decoding bars failed.
    #[error("Fetch failed: {0}")]
    Provider(#[from] ProviderError),

    /// Writing the CSV file failed.
    #[error("Write failed: {0}")]
    Sink(#[from] SinkError),
}

/// Coarse failure category, one per row of the error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Network,
    Api,
    Parse,
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::Config => "configuration",
            ErrorKind::Network => "network",
            ErrorKind::Api => "api",
            ErrorKind::Parse => "parse",
            ErrorKind::Io => "io",
        })
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(_) | Error::ProviderInit(_) => ErrorKind::Config,
            Error::Provider(ProviderError::Network { .. }) => ErrorKind::Network,
            Error::Provider(ProviderError::Api { .. }) => ErrorKind::Api,
            Error::Provider(
                ProviderError::Parse { .. }
                | ProviderError::MissingSeries { .. }
                | ProviderError::InvalidRecord { .. },
            ) => ErrorKind::Parse,
            Error::Sink(_) => ErrorKind::Io,
        }
    }

    /// Process exit status for this failure. Success is 0; every failure
    /// kind gets its own non-zero code.
    pub fn exit_code(&self) -> u8 {
        match self.kind() {
            ErrorKind::Config => 2,
            ErrorKind::Network => 3,
            ErrorKind::Api => 4,
            ErrorKind::Parse => 5,
            ErrorKind::Io => 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use snafu::IntoError;

    use super::*;
    use crate::{io::sink::MissingParentSnafu, providers::{ApiSnafu, MissingSeriesSnafu}};

    #[test]
    fn kinds_map_to_distinct_exit_codes() {
        let config: Error = ConfigError::Missing {
            field: "output",
            hint: "",
        }
        .into();
        assert_eq!(config.kind(), ErrorKind::Config);
        assert_eq!(config.exit_code(), 2);

        let api: Error = ApiSnafu {
            status: 500u16,
            body: "boom",
        }
        .build()
        .into();
        assert_eq!(api.kind(), ErrorKind::Api);
        assert_eq!(api.exit_code(), 4);

        let parse: Error = MissingSeriesSnafu.build().into();
        assert_eq!(parse.kind(), ErrorKind::Parse);
        assert_eq!(parse.exit_code(), 5);

        let io: Error = MissingParentSnafu {
            dir: PathBuf::from("/nope"),
        }
        .build()
        .into();
        assert_eq!(io.kind(), ErrorKind::Io);
        assert_eq!(io.exit_code(), 6);
    }

    #[test]
    fn parse_errors_from_serde_are_parse_kind() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = crate::providers::ParseSnafu.into_error(source).into();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(err.to_string().starts_with("Fetch failed: Response is not valid JSON"));
    }
}
