//! Parsing of the top-level structure of ShellCheck's JSON output.

use serde::Deserialize;

use crate::finding::RawFinding;
use crate::{BridgeError, OutputFormat};

/// Strategy turning raw tool output into findings.
///
/// `null` entries are dropped; anything that does not match the expected
/// shape fails the whole call.
pub trait EnvelopeParser: Send + Sync {
    fn format(&self) -> OutputFormat;

    fn parse(&self, output: &str) -> Result<Vec<RawFinding>, BridgeError>;
}

/// `--format=json`: a bare array of findings.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEnvelope;

impl EnvelopeParser for JsonEnvelope {
    fn format(&self) -> OutputFormat {
        OutputFormat::Json
    }

    fn parse(&self, output: &str) -> Result<Vec<RawFinding>, BridgeError> {
        let entries: Vec<Option<RawFinding>> = serde_json::from_str(output)
            .map_err(|e| BridgeError::malformed(self.format(), e))?;
        Ok(entries.into_iter().flatten().collect())
    }
}

/// `--format=json1`: findings wrapped in a `comments` field.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json1Envelope;

#[derive(Deserialize)]
struct Comments {
    comments: Vec<Option<RawFinding>>,
}

impl EnvelopeParser for Json1Envelope {
    fn format(&self) -> OutputFormat {
        OutputFormat::Json1
    }

    fn parse(&self, output: &str) -> Result<Vec<RawFinding>, BridgeError> {
        let envelope: Comments = serde_json::from_str(output)
            .map_err(|e| BridgeError::malformed(self.format(), e))?;
        Ok(envelope.comments.into_iter().flatten().collect())
    }
}
