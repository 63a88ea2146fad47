//! Shared server state.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use tower_lsp::lsp_types::Url;
use tracing::error;

use shellbridge_core::{Analyzer, BridgeError, ParseResult, RunTrigger};

/// Open document text and the version the client reported for it.
#[derive(Debug, Clone)]
pub(crate) struct DocumentData {
    pub text: String,
    pub version: i32,
}

/// Translated results of the last run for one document.
#[derive(Debug, Clone)]
pub(crate) struct AnalysisData {
    /// The text the results were computed against.
    pub text: String,
    pub results: Vec<ParseResult>,
}

pub(crate) struct BackendState {
    pub documents: RwLock<HashMap<Url, DocumentData>>,
    /// `None` when the configuration could not be turned into an analyzer.
    pub analyzer: RwLock<Option<Arc<Analyzer>>>,
    pub workspace_root: RwLock<Option<PathBuf>>,
    /// Results backing code action requests.
    pub analyses: RwLock<HashMap<Url, AnalysisData>>,
}

impl fmt::Debug for BackendState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendState")
            .field("documents", &"<HashMap<Url, DocumentData>>")
            .field("analyzer", &"<Option<Analyzer>>")
            .field("workspace_root", &self.workspace_root)
            .field("analyses", &"<HashMap<Url, AnalysisData>>")
            .finish()
    }
}

impl BackendState {
    pub fn with_analyzer(analyzer: Option<Analyzer>) -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
            analyzer: RwLock::new(analyzer.map(Arc::new)),
            workspace_root: RwLock::new(None),
            analyses: RwLock::new(HashMap::new()),
        }
    }

    /// The active analyzer. The lock is released before returning, so a
    /// running check never holds up a configuration reload.
    pub fn analyzer(&self) -> Result<Option<Arc<Analyzer>>, BridgeError> {
        self.analyzer
            .read()
            .map(|guard| guard.clone())
            .map_err(|e| BridgeError::analysis(format!("analyzer lock poisoned: {e}")))
    }

    pub fn replace_analyzer(&self, analyzer: Analyzer) -> Result<(), BridgeError> {
        let mut guard = self
            .analyzer
            .write()
            .map_err(|e| BridgeError::analysis(format!("analyzer lock poisoned: {e}")))?;
        *guard = Some(Arc::new(analyzer));
        Ok(())
    }

    /// When documents should be checked, per the active configuration.
    pub fn run_trigger(&self) -> RunTrigger {
        match self.analyzer.read() {
            Ok(guard) => guard
                .as_ref()
                .map(|analyzer| analyzer.config().run)
                .unwrap_or_default(),
            Err(e) => {
                error!("Analyzer lock poisoned: {}", e);
                RunTrigger::default()
            }
        }
    }

    /// Whether "disable rule" actions are offered.
    pub fn disable_rule_actions(&self) -> bool {
        match self.analyzer.read() {
            Ok(guard) => guard
                .as_ref()
                .is_some_and(|analyzer| analyzer.config().disable_rule_action),
            Err(e) => {
                error!("Analyzer lock poisoned: {}", e);
                false
            }
        }
    }

    pub fn is_open(&self, uri: &Url) -> bool {
        match self.documents.read() {
            Ok(docs) => docs.contains_key(uri),
            Err(e) => {
                error!("Documents lock poisoned: {}", e);
                false
            }
        }
    }

    pub fn document_text(&self, uri: &Url) -> Option<String> {
        match self.documents.read() {
            Ok(docs) => docs.get(uri).map(|doc| doc.text.clone()),
            Err(e) => {
                error!("Documents lock poisoned: {}", e);
                None
            }
        }
    }

    /// Open documents with their current text and version.
    pub fn open_documents(&self) -> Vec<(Url, String, i32)> {
        match self.documents.read() {
            Ok(docs) => docs
                .iter()
                .map(|(uri, doc)| (uri.clone(), doc.text.clone(), doc.version))
                .collect(),
            Err(e) => {
                error!("Documents lock poisoned: {}", e);
                Vec::new()
            }
        }
    }

    pub fn store_analysis(&self, uri: &Url, text: &str, results: Vec<ParseResult>) {
        match self.analyses.write() {
            Ok(mut analyses) => {
                analyses.insert(
                    uri.clone(),
                    AnalysisData {
                        text: text.to_string(),
                        results,
                    },
                );
            }
            Err(e) => error!("Analyses lock poisoned: {}", e),
        }
    }

    pub fn analysis(&self, uri: &Url) -> Option<AnalysisData> {
        match self.analyses.read() {
            Ok(analyses) => analyses.get(uri).cloned(),
            Err(e) => {
                error!("Analyses lock poisoned: {}", e);
                None
            }
        }
    }

    pub fn forget_analysis(&self, uri: &Url) {
        match self.analyses.write() {
            Ok(mut analyses) => {
                analyses.remove(uri);
            }
            Err(e) => error!("Analyses lock poisoned: {}", e),
        }
    }
}

/// Type alias for shared state.
pub type SharedState = Arc<BackendState>;
