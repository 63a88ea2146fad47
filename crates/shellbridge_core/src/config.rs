//! Bridge configuration.

use std::fs;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use jsonc_parser::ParseOptions;
use semver::Version;
use serde::{Deserialize, Serialize};

use crate::BridgeError;
use crate::format::{DEFAULT_CAPABILITY_THRESHOLD, FormatSelector};

/// When the language server runs ShellCheck.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RunTrigger {
    /// On open, on every change (debounced) and on save.
    #[default]
    OnType,
    /// On open and on save only.
    OnSave,
}

/// Configuration for running and translating ShellCheck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BridgeConfig {
    /// ShellCheck executable.
    #[serde(default = "default_executable_path")]
    pub executable_path: PathBuf,

    /// Extra arguments passed to ShellCheck.
    #[serde(default)]
    pub custom_args: Vec<String>,

    /// Rule codes to exclude (`"SC2034"` or `"2034"`).
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Glob patterns of files that are never checked.
    #[serde(default)]
    pub ignore_patterns: Vec<String>,

    /// Whether quick fixes are generated.
    #[serde(default = "default_true")]
    pub enable_quick_fix: bool,

    /// Whether "disable rule" code actions are offered.
    #[serde(default = "default_true")]
    pub disable_rule_action: bool,

    #[serde(default)]
    pub run: RunTrigger,

    /// Minimum ShellCheck version for the `json1` format.
    #[serde(default = "default_capability_threshold")]
    pub capability_threshold: Version,

    /// Base directory for resolving ignore patterns.
    /// This is usually the directory containing the configuration file.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

fn default_executable_path() -> PathBuf {
    PathBuf::from("shellcheck")
}

fn default_true() -> bool {
    true
}

fn default_capability_threshold() -> Version {
    DEFAULT_CAPABILITY_THRESHOLD
}

impl BridgeConfig {
    /// Configuration file names, in lookup order.
    pub const CONFIG_FILES: &'static [&'static str] = &[".shellbridge.jsonc", ".shellbridge.json"];

    /// Creates the default configuration.
    pub fn new() -> Self {
        Self {
            executable_path: default_executable_path(),
            custom_args: Vec::new(),
            exclude: Vec::new(),
            ignore_patterns: Vec::new(),
            enable_quick_fix: true,
            disable_rule_action: true,
            run: RunTrigger::default(),
            capability_threshold: DEFAULT_CAPABILITY_THRESHOLD,
            base_dir: None,
        }
    }

    /// Finds a configuration file directly inside `dir`.
    pub fn discover(dir: impl AsRef<Path>) -> Option<PathBuf> {
        let dir = dir.as_ref();
        Self::CONFIG_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Loads configuration from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, BridgeError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| BridgeError::config(format!("Failed to read config: {}", e)))?;

        let mut config = Self::from_json(&content)?;

        if let Some(parent) = path.parent() {
            config.base_dir = Some(parent.to_path_buf());
        }

        Ok(config)
    }

    /// Parses configuration from JSON. Comments and trailing commas are
    /// accepted.
    pub fn from_json(json: &str) -> Result<Self, BridgeError> {
        let value = jsonc_parser::parse_to_serde_value(json, &ParseOptions::default())
            .map_err(|e| BridgeError::config(format!("Invalid JSON: {}", e)))?
            .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new()));

        let config: Self = serde_json::from_value(value)
            .map_err(|e| BridgeError::config(format!("Invalid config: {}", e)))?;

        // Fail early on bad globs rather than on the first checked file.
        config.ignore_globs()?;
        Ok(config)
    }

    /// The format selector for the configured threshold.
    pub fn format_selector(&self) -> FormatSelector {
        FormatSelector::new(self.capability_threshold.clone())
    }

    /// Excluded rule codes without the `SC` prefix.
    pub fn normalized_excludes(&self) -> Vec<String> {
        self.exclude
            .iter()
            .map(|code| {
                let code = code.trim();
                code.strip_prefix("SC")
                    .or_else(|| code.strip_prefix("sc"))
                    .unwrap_or(code)
                    .to_string()
            })
            .filter(|code| !code.is_empty())
            .collect()
    }

    /// Compiles the ignore patterns.
    pub fn ignore_globs(&self) -> Result<Option<GlobSet>, BridgeError> {
        if self.ignore_patterns.is_empty() {
            return Ok(None);
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in &self.ignore_patterns {
            let glob = Glob::new(pattern).map_err(|e| {
                BridgeError::config(format!("Invalid ignore pattern '{}': {}", pattern, e))
            })?;
            builder.add(glob);
        }

        builder
            .build()
            .map(Some)
            .map_err(|e| BridgeError::config(format!("Failed to build globset: {}", e)))
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::new()
    }
}
