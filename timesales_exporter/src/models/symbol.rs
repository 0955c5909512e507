use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::models::ModelError;

/// An equity ticker, normalized to uppercase (e.g. `QQQ`, `BRK.B`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Symbol {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = |message: &str| ModelError::InvalidSymbol {
            value: s.to_string(),
            message: message.to_string(),
        };

        if trimmed.is_empty() {
            return Err(invalid("symbol is empty"));
        }
        if trimmed.len() > 16 {
            return Err(invalid("symbol is longer than 16 characters"));
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '/' | '-'))
        {
            return Err(invalid("only letters, digits, '.', '/' and '-' are allowed"));
        }

        Ok(Self(trimmed.to_ascii_uppercase()))
    }
}

impl TryFrom<String> for Symbol {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}
