//! Debounced validation of edited documents.

use std::time::Duration;

use tower_lsp::lsp_types::Url;
use tracing::{debug, error};

use crate::state::{BackendState, SharedState};

/// Default debounce delay in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Spawns a validation that runs after the debounce delay, unless the
/// document changed again in the meantime.
pub fn spawn_debounced_validation<F, Fut>(
    state: SharedState,
    uri: Url,
    text: String,
    version: i32,
    validate: F,
) where
    F: FnOnce(Url, String, i32) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(DEFAULT_DEBOUNCE_MS)).await;

        if is_current_version(&state, &uri, version) {
            validate(uri, text, version).await;
        } else {
            debug!("Skipping stale version {} of {}", version, uri);
        }
    });
}

/// Checks if `version` is still the latest version of the document.
fn is_current_version(state: &BackendState, uri: &Url, version: i32) -> bool {
    let docs = match state.documents.read() {
        Ok(g) => g,
        Err(e) => {
            error!("Documents lock poisoned: {}", e);
            return false;
        }
    };

    docs.get(uri).is_some_and(|doc| doc.version == version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::DocumentData;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn state_with(uri: &Url, version: i32) -> SharedState {
        let state = Arc::new(BackendState::with_analyzer(None));
        state.documents.write().unwrap().insert(
            uri.clone(),
            DocumentData {
                text: "echo".to_string(),
                version,
            },
        );
        state
    }

    #[test]
    fn test_is_current_version() {
        let uri = Url::parse("file:///tmp/a.sh").unwrap();
        let state = state_with(&uri, 3);

        assert!(is_current_version(&state, &uri, 3));
        assert!(!is_current_version(&state, &uri, 2));
        assert!(!is_current_version(
            &state,
            &Url::parse("file:///tmp/b.sh").unwrap(),
            3
        ));
    }

    #[tokio::test]
    async fn test_stale_version_is_skipped() {
        let uri = Url::parse("file:///tmp/a.sh").unwrap();
        let state = state_with(&uri, 2);
        let calls = Arc::new(AtomicUsize::new(0));

        for version in [1, 2] {
            let calls = calls.clone();
            spawn_debounced_validation(
                state.clone(),
                uri.clone(),
                "echo".to_string(),
                version,
                move |_, _, _| async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                },
            );
        }

        tokio::time::sleep(Duration::from_millis(DEFAULT_DEBOUNCE_MS + 200)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
