//! Configuration loading for the server.

use std::path::Path;

use tracing::{error, info};

use shellbridge_core::{Analyzer, BridgeConfig, BridgeError};

use crate::state::BackendState;

/// Loads the configuration found in `root`, or the defaults.
pub fn load_config(root: &Path) -> Result<BridgeConfig, BridgeError> {
    match BridgeConfig::discover(root) {
        Some(config_path) => {
            info!("Found config file: {}", config_path.display());
            BridgeConfig::from_file(&config_path)
        }
        None => {
            let mut config = BridgeConfig::new();
            config.base_dir = Some(root.to_path_buf());
            Ok(config)
        }
    }
}

/// Reloads configuration from the workspace root and rebuilds the analyzer.
///
/// On failure the previous analyzer stays active and the error is returned
/// for reporting to the user.
pub fn reload_config(state: &BackendState) -> Result<(), BridgeError> {
    let root = match state.workspace_root.read() {
        Ok(guard) => guard.clone(),
        Err(e) => {
            error!("Workspace root lock poisoned: {}", e);
            return Ok(());
        }
    };

    let Some(root) = root else {
        return Ok(());
    };

    let analyzer = load_config(&root).and_then(Analyzer::new)?;
    state.replace_analyzer(analyzer)?;
    info!("Analyzer re-initialized with new config");
    Ok(())
}
