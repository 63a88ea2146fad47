//! Init command implementation

use std::io::Write;
use std::path::{Path, PathBuf};

use miette::{IntoDiagnostic, Result};
use tracing::info;

use shellbridge_core::BridgeConfig;

/// File written by `init`.
const INIT_FILE: &str = ".shellbridge.json";

pub fn run_init(force: bool) -> Result<()> {
    let path = write_default_config(Path::new("."), force)?;
    info!("Created {}", path.display());
    Ok(())
}

/// Writes the default configuration into `dir`.
///
/// Existing files are only replaced with `force`; symlinks are never followed.
fn write_default_config(dir: &Path, force: bool) -> Result<PathBuf> {
    let config_path = dir.join(INIT_FILE);
    let mut contents = serde_json::to_string_pretty(&BridgeConfig::new()).into_diagnostic()?;
    contents.push('\n');

    loop {
        let mut options = std::fs::OpenOptions::new();
        options.write(true).create_new(true);

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.custom_flags(libc::O_NOFOLLOW);
        }

        match options.open(&config_path) {
            Ok(mut file) => {
                file.write_all(contents.as_bytes()).into_diagnostic()?;
                return Ok(config_path);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                if !force {
                    return Err(miette::miette!(
                        "{} already exists. Use --force to overwrite.",
                        config_path.display()
                    ));
                }

                match std::fs::remove_file(&config_path) {
                    Ok(()) => {}
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                    Err(e) => return Err(e).into_diagnostic(),
                }
            }
            Err(e) => return Err(e).into_diagnostic(),
        }
    }
}
