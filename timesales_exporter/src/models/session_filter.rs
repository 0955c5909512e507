use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::models::ModelError;

/// Restricts bars to regular trading hours (`open`) or includes
/// pre/post-market activity (`all`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SessionFilter {
    All,
    #[default]
    Open,
}

impl SessionFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionFilter::All => "all",
            SessionFilter::Open => "open",
        }
    }
}

impl fmt::Display for SessionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionFilter {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(SessionFilter::All),
            "open" => Ok(SessionFilter::Open),
            _ => Err(ModelError::InvalidSessionFilter {
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for SessionFilter {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SessionFilter> for String {
    fn from(value: SessionFilter) -> Self {
        value.as_str().to_string()
    }
}
