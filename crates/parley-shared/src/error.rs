//! Error types for Parley.

use std::path::PathBuf;

use thiserror::Error;

use crate::router::RuleKind;

/// Failure of the arithmetic evaluator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalcError {
    #[error("Invalid expression: {0}")]
    InvalidExpression(String),

    #[error("Division by zero")]
    DivisionByZero,
}

impl CalcError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        CalcError::InvalidExpression(reason.into())
    }
}

/// Internal router failure. Never leaves `Responder::respond`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("No replies configured for rule {0}")]
    EmptyReplySet(RuleKind),
}

/// Failure to load or validate a rule book.
#[derive(Error, Debug)]
pub enum RuleBookError {
    #[error("Failed to read rule file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Rule file is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Rule file could not be serialized: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid rule book: {0}")]
    Invalid(String),
}

/// Unknown mode name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown mode '{0}' (expected normal, faq or joke)")]
pub struct ParseModeError(pub String);
