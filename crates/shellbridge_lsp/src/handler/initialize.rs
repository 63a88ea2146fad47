//! Initialize and shutdown handlers.

use tower_lsp::Client;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tracing::{error, info};

use crate::config::reload_config;
use crate::state::BackendState;

/// Name reported in `serverInfo`.
pub const SERVER_NAME: &str = "shellbridge-lsp";

/// Handles the `initialize` LSP request.
pub async fn handle_initialize(
    state: &BackendState,
    client: &Client,
    params: InitializeParams,
) -> Result<InitializeResult> {
    info!("ShellCheck bridge LSP server initializing...");

    #[allow(deprecated)]
    let root = params
        .workspace_folders
        .as_ref()
        .and_then(|folders| folders.first())
        .map(|folder| folder.uri.clone())
        .or(params.root_uri)
        .and_then(|uri| uri.to_file_path().ok());

    if let Some(path) = root {
        match state.workspace_root.write() {
            Ok(mut guard) => *guard = Some(path),
            Err(e) => {
                error!("Workspace root lock poisoned: {}", e);
                return Ok(InitializeResult::default());
            }
        }

        if let Err(e) = reload_config(state) {
            error!("Failed to load config: {}", e);
            client
                .show_message(MessageType::ERROR, format!("shellbridge: {e}"))
                .await;
        }
    }

    Ok(InitializeResult {
        capabilities: capabilities(),
        server_info: Some(ServerInfo {
            name: SERVER_NAME.to_string(),
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
        }),
    })
}

fn capabilities() -> ServerCapabilities {
    ServerCapabilities {
        text_document_sync: Some(TextDocumentSyncCapability::Options(
            TextDocumentSyncOptions {
                open_close: Some(true),
                change: Some(TextDocumentSyncKind::FULL),
                save: Some(TextDocumentSyncSaveOptions::SaveOptions(SaveOptions {
                    include_text: Some(true),
                })),
                ..Default::default()
            },
        )),
        code_action_provider: Some(CodeActionProviderCapability::Options(CodeActionOptions {
            code_action_kinds: Some(vec![
                CodeActionKind::QUICKFIX,
                CodeActionKind::SOURCE_FIX_ALL,
            ]),
            resolve_provider: Some(false),
            work_done_progress_options: Default::default(),
        })),
        ..Default::default()
    }
}

/// Handles the `initialized` LSP notification.
pub async fn handle_initialized(client: &Client) {
    client
        .log_message(MessageType::INFO, "ShellCheck bridge initialized")
        .await;
}

/// Handles the `shutdown` LSP request.
pub async fn handle_shutdown() -> Result<()> {
    info!("ShellCheck bridge LSP server shutting down...");
    Ok(())
}
