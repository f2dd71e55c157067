use thiserror::Error;

use crate::embeddings::EmbeddingError;
use crate::llm_client::LlmError;

/// Core error type shared by every advisor operation.
///
/// "No match" outcomes (empty extraction, empty retrieval, uniform ranking) are
/// never errors; only missing required inputs and failing dependencies are.
#[derive(Debug, Error)]
pub enum AdvisorError {
    /// Missing or empty corpus, vocabulary or rule table. Fatal at startup.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Bad caller input, e.g. an empty record collection or an empty query.
    #[error("Input error: {0}")]
    Input(String),

    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
}

impl AdvisorError {
    /// Stable machine-readable code for command output.
    pub fn code(&self) -> &'static str {
        match self {
            AdvisorError::Configuration(_) => "CONFIGURATION_ERROR",
            AdvisorError::Input(_) => "INPUT_ERROR",
            AdvisorError::Embedding(_) | AdvisorError::Llm(_) => "DEPENDENCY_ERROR",
        }
    }

    /// True for failures of an external collaborator (embedding model, LLM).
    pub fn is_dependency(&self) -> bool {
        matches!(self, AdvisorError::Embedding(_) | AdvisorError::Llm(_))
    }

    /// Logs the error at a level matching its kind and returns the code/message
    /// pair rendered by the binary.
    pub fn report(&self) -> (&'static str, String) {
        match self {
            AdvisorError::Configuration(msg) => {
                tracing::error!("Configuration error: {msg}");
            }
            AdvisorError::Input(msg) => {
                tracing::warn!("Rejected input: {msg}");
            }
            AdvisorError::Embedding(e) => {
                tracing::error!("Embedding error: {e}");
            }
            AdvisorError::Llm(e) => {
                tracing::error!("LLM error: {e}");
            }
        }
        (self.code(), self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_follow_taxonomy() {
        assert_eq!(
            AdvisorError::Configuration("x".into()).code(),
            "CONFIGURATION_ERROR"
        );
        assert_eq!(AdvisorError::Input("x".into()).code(), "INPUT_ERROR");
        assert_eq!(
            AdvisorError::Llm(LlmError::EmptyContent).code(),
            "DEPENDENCY_ERROR"
        );
    }

    #[test]
    fn test_dependency_classification() {
        assert!(AdvisorError::Embedding(EmbeddingError::Model("down".into())).is_dependency());
        assert!(!AdvisorError::Input("empty".into()).is_dependency());
    }

    #[test]
    fn test_report_returns_message() {
        let (code, message) = AdvisorError::Input("records are empty".into()).report();
        assert_eq!(code, "INPUT_ERROR");
        assert!(message.contains("records are empty"));
    }
}
