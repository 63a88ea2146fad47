//! Watched files handler.

use tower_lsp::lsp_types::*;
use tracing::{debug, info};

use shellbridge_core::BridgeConfig;

/// Handles `workspace/didChangeWatchedFiles`.
///
/// Returns true if a configuration file changed and the configuration
/// should be reloaded.
pub async fn handle_did_change_watched_files(params: &DidChangeWatchedFilesParams) -> bool {
    debug!("Watched files changed: {:?}", params.changes);

    let config_changed = params.changes.iter().any(|change| {
        let path = change.uri.path();
        BridgeConfig::CONFIG_FILES
            .iter()
            .any(|name| path.ends_with(name))
    });

    if config_changed {
        info!("Configuration file changed, reloading...");
    }
    config_changed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(uri: &str) -> FileEvent {
        FileEvent {
            uri: Url::parse(uri).unwrap(),
            typ: FileChangeType::CHANGED,
        }
    }

    #[tokio::test]
    async fn test_config_change_detected() {
        let params = DidChangeWatchedFilesParams {
            changes: vec![
                change("file:///work/run.sh"),
                change("file:///work/.shellbridge.jsonc"),
            ],
        };
        assert!(handle_did_change_watched_files(&params).await);
    }

    #[tokio::test]
    async fn test_other_files_ignored() {
        let params = DidChangeWatchedFilesParams {
            changes: vec![change("file:///work/run.sh")],
        };
        assert!(!handle_did_change_watched_files(&params).await);
    }
}
