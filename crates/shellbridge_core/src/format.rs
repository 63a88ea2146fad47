//! Choice between ShellCheck's two JSON output formats.

use std::fmt;
use std::str::FromStr;

use semver::Version;
use serde::{Deserialize, Serialize};

use crate::BridgeError;

/// First ShellCheck release that understands `--format=json1`.
pub const DEFAULT_CAPABILITY_THRESHOLD: Version = Version::new(0, 7, 0);

/// ShellCheck JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Bare array of findings, columns count tabs as 8.
    Json,
    /// `{"comments": [...]}`, columns count characters.
    Json1,
}

impl OutputFormat {
    /// Value passed to `--format=`.
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Json1 => "json1",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(OutputFormat::Json),
            "json1" => Ok(OutputFormat::Json1),
            other => Err(BridgeError::config(format!(
                "Unknown output format '{}', expected 'json' or 'json1'",
                other
            ))),
        }
    }
}

/// Picks the output format a given tool version supports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSelector {
    threshold: Version,
}

impl FormatSelector {
    pub fn new(threshold: Version) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> &Version {
        &self.threshold
    }

    /// Returns `json1` when the version is known and at least the threshold.
    pub fn select(&self, version: Option<&Version>) -> OutputFormat {
        match version {
            Some(version) if *version >= self.threshold => OutputFormat::Json1,
            _ => OutputFormat::Json,
        }
    }
}

impl Default for FormatSelector {
    fn default() -> Self {
        Self::new(DEFAULT_CAPABILITY_THRESHOLD)
    }
}
