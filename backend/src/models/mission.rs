use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Space telescope or survey that produced a light curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mission {
    #[default]
    Kepler,
    K2,
    #[serde(rename = "TESS")]
    Tess,
}

impl Mission {
    pub const ALL: [Mission; 3] = [Mission::Kepler, Mission::K2, Mission::Tess];

    /// Canonical spelling used in queries, archive layouts and responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mission::Kepler => "Kepler",
            Mission::K2 => "K2",
            Mission::Tess => "TESS",
        }
    }

    /// Pipeline author searched when the caller does not name one.
    ///
    /// Kepler and K2 products come from the Kepler pipeline, TESS products from SPOC.
    pub fn default_author(&self) -> &'static str {
        match self {
            Mission::Kepler | Mission::K2 => "Kepler",
            Mission::Tess => "SPOC",
        }
    }
}

impl fmt::Display for Mission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mission::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("Unknown mission '{}'. Expected one of Kepler, K2, TESS.", s))
    }
}
