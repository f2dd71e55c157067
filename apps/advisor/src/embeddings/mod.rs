//! Embedding providers: the leaf dependency of every matching subsystem.
//!
//! All callers go through the [`EmbeddingProvider`] trait so the pretrained
//! model can be swapped for the lexical [`HashEmbedder`] (offline use) or a test
//! double without touching extraction, retrieval or ranking code.

use std::sync::Arc;

use thiserror::Error;

mod hash;
mod onnx;

pub use self::hash::HashEmbedder;
pub use self::onnx::FastEmbedProvider;

/// Default model: all-MiniLM-L6-v2 (384 dimensions).
pub const DEFAULT_MODEL: &str = "all-MiniLM-L6-v2";

/// Embedding dimension of the default model.
pub const EMBEDDING_DIM: usize = 384;

/// A dense vector produced for exactly one source string.
pub type Embedding = Vec<f32>;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding model failed: {0}")]
    Model(String),

    #[error("model returned {got} vectors for {expected} inputs")]
    CountMismatch { expected: usize, got: usize },
}

/// Maps batches of strings to fixed-length dense vectors.
///
/// Implementations must be safe for unsynchronized concurrent reads: the
/// provider is loaded once at startup and shared behind an `Arc`.
pub trait EmbeddingProvider: Send + Sync {
    /// Model identifier, for logging.
    fn model_name(&self) -> &str;

    /// Output vector length.
    fn dimensions(&self) -> usize;

    /// Embeds all texts in one call. The output has one vector per input, in
    /// input order.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError>;

    fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        let vectors = ensure_count(1, self.embed_batch(&[text.to_string()])?)?;
        vectors
            .into_iter()
            .next()
            .ok_or(EmbeddingError::CountMismatch {
                expected: 1,
                got: 0,
            })
    }
}

pub type SharedEmbedder = Arc<dyn EmbeddingProvider>;

/// Which provider the process should load at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingBackend {
    FastEmbed,
    Hash,
}

impl std::str::FromStr for EmbeddingBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fastembed" | "onnx" => Ok(EmbeddingBackend::FastEmbed),
            "hash" => Ok(EmbeddingBackend::Hash),
            other => Err(format!(
                "unknown embedding backend '{other}' (expected 'fastembed' or 'hash')"
            )),
        }
    }
}

/// Checks that a provider honoured the one-vector-per-input contract.
pub(crate) fn ensure_count(
    expected: usize,
    vectors: Vec<Embedding>,
) -> Result<Vec<Embedding>, EmbeddingError> {
    if vectors.len() != expected {
        return Err(EmbeddingError::CountMismatch {
            expected,
            got: vectors.len(),
        });
    }
    Ok(vectors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::ShortBatchEmbedder;

    #[test]
    fn test_backend_parses_known_names() {
        assert_eq!(
            "fastembed".parse::<EmbeddingBackend>().unwrap(),
            EmbeddingBackend::FastEmbed
        );
        assert_eq!(
            " HASH ".parse::<EmbeddingBackend>().unwrap(),
            EmbeddingBackend::Hash
        );
    }

    #[test]
    fn test_backend_rejects_unknown_name() {
        let err = "word2vec".parse::<EmbeddingBackend>().unwrap_err();
        assert!(err.contains("word2vec"));
    }

    #[test]
    fn test_default_embed_delegates_to_batch() {
        let embedder = HashEmbedder::new(16);
        let single = embedder.embed("rust developer").unwrap();
        let batch = embedder
            .embed_batch(&["rust developer".to_string()])
            .unwrap();
        assert_eq!(single, batch[0]);
    }

    #[test]
    fn test_default_embed_reports_missing_vector() {
        let err = ShortBatchEmbedder::new(0).embed("rust developer").unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::CountMismatch { expected: 1, got: 0 }
        ));
        assert_eq!(err.to_string(), "model returned 0 vectors for 1 inputs");
    }

    #[test]
    fn test_ensure_count_detects_mismatch() {
        let err = ensure_count(2, vec![vec![0.0]]).unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::CountMismatch { expected: 2, got: 1 }
        ));
    }
}
