//! Document lifecycle handlers.

use tower_lsp::lsp_types::*;
use tracing::{debug, error};

use crate::state::{DocumentData, SharedState};

/// Records an opened document and returns what should be validated.
pub async fn handle_did_open(
    state: &SharedState,
    params: DidOpenTextDocumentParams,
) -> (Url, String, i32) {
    let TextDocumentItem {
        uri, text, version, ..
    } = params.text_document;
    debug!("Document opened: {}", uri);

    store_document(state, &uri, &text, version);
    (uri, text, version)
}

/// Records the new full text of a changed document.
///
/// Returns the URI, text, and version for debounced validation.
pub async fn handle_did_change(
    state: &SharedState,
    params: DidChangeTextDocumentParams,
) -> Option<(Url, String, i32)> {
    debug!("Document changed: {}", params.text_document.uri);

    // Full sync: the last change carries the whole document.
    let change = params.content_changes.into_iter().last()?;
    let uri = params.text_document.uri;
    let version = params.text_document.version;

    if !store_document(state, &uri, &change.text, version) {
        return None;
    }
    Some((uri, change.text, version))
}

/// Returns the saved document with the text to validate.
///
/// Falls back to the cached text when the client did not include it.
pub async fn handle_did_save(
    state: &SharedState,
    params: DidSaveTextDocumentParams,
) -> Option<(Url, String)> {
    let uri = params.text_document.uri;
    debug!("Document saved: {}", uri);

    let text = params.text.or_else(|| state.document_text(&uri))?;
    Some((uri, text))
}

/// Forgets a closed document and its results.
pub async fn handle_did_close(state: &SharedState, params: DidCloseTextDocumentParams) -> Url {
    let uri = params.text_document.uri;
    debug!("Document closed: {}", uri);

    match state.documents.write() {
        Ok(mut docs) => {
            docs.remove(&uri);
        }
        Err(e) => error!("Documents lock poisoned: {}", e),
    }
    state.forget_analysis(&uri);

    uri
}

fn store_document(state: &SharedState, uri: &Url, text: &str, version: i32) -> bool {
    match state.documents.write() {
        Ok(mut docs) => {
            docs.insert(
                uri.clone(),
                DocumentData {
                    text: text.to_string(),
                    version,
                },
            );
            true
        }
        Err(e) => {
            error!("Documents lock poisoned: {}", e);
            false
        }
    }
}
