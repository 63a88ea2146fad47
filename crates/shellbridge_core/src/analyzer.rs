//! Orchestration of tool invocation and translation.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use globset::GlobSet;
use semver::Version;
use serde::Serialize;
use tracing::{debug, info};

use crate::diagnostic::Severity;
use crate::document::TextDocument;
use crate::format::FormatSelector;
use crate::runner::ShellcheckRunner;
use crate::translator::{ParseResult, ResultTranslator};
use crate::{BridgeConfig, BridgeError};

/// Results for one checked file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    #[serde(skip)]
    pub source: String,
    pub results: Vec<ParseResult>,
}

impl FileReport {
    /// Returns true if any diagnostic is an error.
    pub fn has_errors(&self) -> bool {
        self.results
            .iter()
            .any(|r| r.diagnostic.severity == Severity::Error)
    }
}

/// Runs ShellCheck on documents and translates what it reports.
pub struct Analyzer {
    config: BridgeConfig,
    runner: ShellcheckRunner,
    selector: FormatSelector,
    ignore_globs: Option<GlobSet>,
    /// Tool version, detected on first use.
    tool_version: OnceLock<Option<Version>>,
}

impl Analyzer {
    /// Creates an analyzer with the given configuration.
    pub fn new(config: BridgeConfig) -> Result<Self, BridgeError> {
        let ignore_globs = config.ignore_globs()?;
        Ok(Self {
            runner: ShellcheckRunner::from_config(&config),
            selector: config.format_selector(),
            ignore_globs,
            tool_version: OnceLock::new(),
            config,
        })
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Returns true if `path` matches one of the ignore patterns.
    pub fn is_ignored(&self, path: &Path) -> bool {
        let Some(globs) = &self.ignore_globs else {
            return false;
        };

        let relative = self
            .config
            .base_dir
            .as_deref()
            .and_then(|base| path.strip_prefix(base).ok())
            .unwrap_or(path);
        globs.is_match(relative) || globs.is_match(path)
    }

    /// The ShellCheck version, detected once per analyzer.
    pub fn tool_version(&self) -> Result<Option<Version>, BridgeError> {
        if let Some(version) = self.tool_version.get() {
            return Ok(version.clone());
        }

        let version = self.runner.detect_version()?;
        match &version {
            Some(v) => info!("Using ShellCheck {}", v),
            None => info!("ShellCheck version unknown"),
        }
        Ok(self.tool_version.get_or_init(|| version).clone())
    }

    /// Checks `text` and translates the findings.
    ///
    /// `path` is matched against the ignore patterns and its directory is
    /// the working directory for `source` resolution.
    pub fn analyze(&self, text: &str, path: Option<&Path>) -> Result<Vec<ParseResult>, BridgeError> {
        if let Some(path) = path
            && self.is_ignored(path)
        {
            debug!("Ignoring {}", path.display());
            return Ok(Vec::new());
        }

        let version = self.tool_version()?;
        let format = self.selector.select(version.as_ref());
        let cwd = path.and_then(Path::parent).filter(|p| p.is_dir());

        let output = self.runner.run(text, format, cwd)?;

        ResultTranslator::for_format(format)
            .with_quick_fixes(self.config.enable_quick_fix)
            .translate(&output, &TextDocument::new(text))
    }

    /// Reads and checks a file.
    pub fn analyze_file(&self, path: &Path) -> Result<FileReport, BridgeError> {
        let source = fs::read_to_string(path)?;
        let results = self.analyze(&source, Some(path))?;
        Ok(FileReport {
            path: path.to_path_buf(),
            source,
            results,
        })
    }
}
