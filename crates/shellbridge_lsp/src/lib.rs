//! ShellCheck bridge LSP server
//!
//! Runs ShellCheck on open shell scripts and publishes its findings as
//! diagnostics, with quick fixes and rule suppression as code actions.

mod config;
mod conversion;
mod debounce;
mod handler;
mod state;

use std::path::PathBuf;
use std::sync::Arc;

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService, Server};
use tracing::{debug, error, info};

use shellbridge_core::{Analyzer, BridgeConfig, BridgeError, ParseResult, RunTrigger, TextDocument};

use crate::config::reload_config;
use crate::conversion::to_lsp_diagnostic;
use crate::debounce::spawn_debounced_validation;
use crate::state::{BackendState, SharedState};

pub use crate::handler::SERVER_NAME;

/// The LSP backend.
#[derive(Clone)]
pub struct Backend {
    /// LSP client for sending notifications.
    client: Client,
    state: SharedState,
}

impl Backend {
    /// Creates a backend using the default configuration until a workspace
    /// configuration is loaded during `initialize`.
    pub fn new(client: Client) -> Self {
        let analyzer = match Analyzer::new(BridgeConfig::new()) {
            Ok(analyzer) => Some(analyzer),
            Err(e) => {
                error!("Failed to initialize analyzer: {}", e);
                None
            }
        };

        Self {
            client,
            state: Arc::new(BackendState::with_analyzer(analyzer)),
        }
    }

    /// Runs ShellCheck on a document and publishes the diagnostics.
    ///
    /// A failed run is reported to the user and publishes nothing, so the
    /// previous diagnostics stay visible.
    async fn validate_document(&self, uri: Url, text: String, version: Option<i32>) {
        debug!("Validating document: {}", uri);

        let path = uri.to_file_path().ok();
        let results = match self.analyze_text(text.clone(), path).await {
            Ok(results) => results,
            Err(e) => {
                error!("Analysis of {} failed: {}", uri, e);
                self.client
                    .show_message(MessageType::ERROR, format!("shellbridge: {e}"))
                    .await;
                return;
            }
        };

        if !self.state.is_open(&uri) {
            debug!("{} was closed during validation", uri);
            return;
        }

        let document = TextDocument::new(&text);
        let diagnostics = results
            .iter()
            .map(|result| to_lsp_diagnostic(&result.diagnostic, &document))
            .collect();

        self.state.store_analysis(&uri, &text, results);
        self.client
            .publish_diagnostics(uri, diagnostics, version)
            .await;
    }

    /// Runs the analyzer off the async runtime.
    async fn analyze_text(
        &self,
        text: String,
        path: Option<PathBuf>,
    ) -> std::result::Result<Vec<ParseResult>, BridgeError> {
        let Some(analyzer) = self.state.analyzer()? else {
            debug!("Analyzer not available, skipping");
            return Ok(Vec::new());
        };

        tokio::task::spawn_blocking(move || analyzer.analyze(&text, path.as_deref()))
            .await
            .map_err(|e| BridgeError::analysis(format!("analysis task failed: {e}")))?
    }

    /// Re-checks every open document, e.g. after a configuration change.
    async fn revalidate_open_documents(&self) {
        for (uri, text, version) in self.state.open_documents() {
            self.validate_document(uri, text, Some(version)).await;
        }
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        handler::handle_initialize(&self.state, &self.client, params).await
    }

    async fn initialized(&self, _: InitializedParams) {
        handler::handle_initialized(&self.client).await;
    }

    async fn shutdown(&self) -> Result<()> {
        handler::handle_shutdown().await
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let (uri, text, version) = handler::handle_did_open(&self.state, params).await;
        self.validate_document(uri, text, Some(version)).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let Some((uri, text, version)) = handler::handle_did_change(&self.state, params).await
        else {
            return;
        };

        if self.state.run_trigger() == RunTrigger::OnSave {
            debug!("Deferring validation of {} until save", uri);
            return;
        }

        let backend = self.clone();
        spawn_debounced_validation(
            self.state.clone(),
            uri,
            text,
            version,
            move |uri, text, version| async move {
                backend.validate_document(uri, text, Some(version)).await;
            },
        );
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        if let Some((uri, text)) = handler::handle_did_save(&self.state, params).await {
            self.validate_document(uri, text, None).await;
        }
    }

    async fn did_change_watched_files(&self, params: DidChangeWatchedFilesParams) {
        if !handler::handle_did_change_watched_files(&params).await {
            return;
        }

        match reload_config(&self.state) {
            Ok(()) => self.revalidate_open_documents().await,
            Err(e) => {
                error!("Failed to reload config: {}", e);
                self.client
                    .show_message(MessageType::ERROR, format!("shellbridge: {e}"))
                    .await;
            }
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = handler::handle_did_close(&self.state, params).await;
        self.client.publish_diagnostics(uri, vec![], None).await;
    }

    async fn code_action(&self, params: CodeActionParams) -> Result<Option<CodeActionResponse>> {
        handler::handle_code_action(&self.state, params).await
    }
}

/// Starts the LSP server on stdin/stdout.
///
/// This function does not return unless an error occurs or the server shuts down.
pub async fn run() {
    info!("ShellCheck bridge LSP server starting...");

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(Backend::new);
    Server::new(stdin, stdout, socket).serve(service).await;
}
