use std::path::PathBuf;

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tracing::{debug, info};

use super::{ensure_count, Embedding, EmbeddingError, EmbeddingProvider, DEFAULT_MODEL, EMBEDDING_DIM};

/// Sentence-transformer embeddings through fastembed's ONNX runtime.
pub struct FastEmbedProvider {
    model: TextEmbedding,
    batch_size: Option<usize>,
}

impl FastEmbedProvider {
    /// Loads all-MiniLM-L6-v2, downloading it into `cache_dir` on first use.
    pub fn new(cache_dir: Option<PathBuf>) -> Result<Self, EmbeddingError> {
        let mut options =
            InitOptions::new(EmbeddingModel::AllMiniLML6V2).with_show_download_progress(false);
        if let Some(dir) = cache_dir {
            options = options.with_cache_dir(dir);
        }

        let model =
            TextEmbedding::try_new(options).map_err(|e| EmbeddingError::Model(e.to_string()))?;
        info!("Loaded embedding model {DEFAULT_MODEL}");

        Ok(Self {
            model,
            batch_size: None,
        })
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = Some(batch_size);
        self
    }
}

impl EmbeddingProvider for FastEmbedProvider {
    fn model_name(&self) -> &str {
        DEFAULT_MODEL
    }

    fn dimensions(&self) -> usize {
        EMBEDDING_DIM
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(count = texts.len(), "embedding batch");
        let vectors = self
            .model
            .embed(texts.to_vec(), self.batch_size)
            .map_err(|e| EmbeddingError::Model(e.to_string()))?;

        ensure_count(texts.len(), vectors)
    }
}
