use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Page removal semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Delete the selected pages
    #[default]
    Remove,
    /// Keep only the selected pages, delete everything else
    Keep,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Remove => "remove",
            Mode::Keep => "keep",
        }
    }

    /// Parse an optional boundary value; absent or blank means `remove`.
    pub fn parse_or_default(raw: Option<&str>) -> Result<Self> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Mode::default()),
            Some(s) => s.parse(),
        }
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "remove" => Ok(Mode::Remove),
            "keep" => Ok(Mode::Keep),
            other => Err(Error::InvalidMode {
                mode: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
