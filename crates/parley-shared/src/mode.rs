//! Conversation mode, selected by the front end for each turn.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseModeError;

/// Reply mode for a single turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    #[serde(alias = "Normal")]
    Normal,
    /// FAQ table is consulted before the normal cascade
    #[serde(alias = "FAQ")]
    Faq,
    /// Every input gets a joke
    #[serde(alias = "Joke")]
    Joke,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Normal, Mode::Faq, Mode::Joke];

    /// Canonical label as shown in the mode selector.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Normal => "Normal",
            Mode::Faq => "FAQ",
            Mode::Joke => "Joke",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Ok(Mode::Normal),
            "faq" => Ok(Mode::Faq),
            "joke" => Ok(Mode::Joke),
            other => Err(ParseModeError(other.to_string())),
        }
    }
}
