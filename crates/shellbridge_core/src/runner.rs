//! Invocation of the ShellCheck executable.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use semver::Version;
use tracing::{debug, warn};

use crate::{BridgeConfig, BridgeError, OutputFormat};

/// Runs ShellCheck with the configured executable and arguments.
#[derive(Debug, Clone)]
pub struct ShellcheckRunner {
    executable: PathBuf,
    excludes: Vec<String>,
    custom_args: Vec<String>,
}

impl ShellcheckRunner {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            excludes: Vec::new(),
            custom_args: Vec::new(),
        }
    }

    pub fn from_config(config: &BridgeConfig) -> Self {
        Self {
            executable: config.executable_path.clone(),
            excludes: config.normalized_excludes(),
            custom_args: config.custom_args.clone(),
        }
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Queries `shellcheck --version`.
    ///
    /// Returns `None` when the version line is missing or not semver, which
    /// makes callers fall back to the legacy format.
    pub fn detect_version(&self) -> Result<Option<Version>, BridgeError> {
        let output = Command::new(&self.executable)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .map_err(|source| BridgeError::Spawn {
                executable: self.executable.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        match parse_version_output(&stdout) {
            Some(Ok(version)) => {
                debug!("Detected ShellCheck {}", version);
                Ok(Some(version))
            }
            Some(Err(e)) => {
                warn!("Unrecognized ShellCheck version: {}", e);
                Ok(None)
            }
            None => {
                warn!("ShellCheck did not report a version");
                Ok(None)
            }
        }
    }

    /// Arguments for one run, ending with `-` to read the script from stdin.
    pub fn args(&self, format: OutputFormat) -> Vec<String> {
        let mut args = vec![format!("--format={}", format)];
        if !self.excludes.is_empty() {
            args.push(format!("--exclude={}", self.excludes.join(",")));
        }
        args.extend(self.custom_args.iter().cloned());
        args.push("-".to_string());
        args
    }

    /// Checks `text` and returns ShellCheck's raw stdout.
    ///
    /// Exit status 1 only means that findings were reported.
    pub fn run(
        &self,
        text: &str,
        format: OutputFormat,
        cwd: Option<&Path>,
    ) -> Result<String, BridgeError> {
        let args = self.args(format);
        debug!("Running {} {}", self.executable.display(), args.join(" "));

        let mut command = Command::new(&self.executable);
        command
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(cwd) = cwd {
            command.current_dir(cwd);
        }

        let mut child = command.spawn().map_err(|source| BridgeError::Spawn {
            executable: self.executable.clone(),
            source,
        })?;

        // Feed stdin from another thread so a full stdout pipe cannot stall the write.
        let mut stdin = child.stdin.take();
        let output = std::thread::scope(|scope| {
            let writer = scope.spawn(move || match stdin.as_mut() {
                Some(stdin) => match stdin.write_all(text.as_bytes()) {
                    // The tool may exit before reading its input, e.g. on bad options.
                    Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
                    result => result,
                },
                None => Ok(()),
            });
            let output = child.wait_with_output();
            let written = writer.join().unwrap_or(Ok(()));
            output.and_then(|output| written.map(|_| output))
        })?;

        match output.status.code() {
            Some(0) | Some(1) => Ok(String::from_utf8_lossy(&output.stdout).into_owned()),
            _ => Err(BridgeError::ToolFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }),
        }
    }
}

/// Extracts the `version:` line of `shellcheck --version` output.
pub fn parse_version_output(output: &str) -> Option<Result<Version, semver::Error>> {
    output.lines().find_map(|line| {
        let value = line.trim().strip_prefix("version:")?.trim();
        Some(Version::parse(value.trim_start_matches('v')))
    })
}
