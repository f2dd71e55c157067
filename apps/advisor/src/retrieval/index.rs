use serde::Serialize;
use tracing::{debug, info};

use crate::embeddings::{ensure_count, Embedding, SharedEmbedder};
use crate::errors::AdvisorError;
use crate::similarity::nearest_neighbors;

/// A corpus chunk returned by a search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievedChunk {
    /// Position of the chunk in the corpus.
    pub index: usize,
    pub text: String,
    /// Squared Euclidean distance between query and chunk embeddings.
    pub distance: f32,
}

/// Exact nearest-neighbour index over a fixed corpus.
///
/// Built once at startup; there is no insert/update/delete path, so the index
/// can be shared across threads without locking.
pub struct RetrievalIndex {
    embedder: SharedEmbedder,
    chunks: Vec<String>,
    embeddings: Vec<Embedding>,
}

impl RetrievalIndex {
    /// Embeds every chunk once. An empty corpus is a configuration error.
    pub fn build(chunks: Vec<String>, embedder: SharedEmbedder) -> Result<Self, AdvisorError> {
        if chunks.is_empty() {
            return Err(AdvisorError::Configuration(
                "cannot build a retrieval index from an empty corpus".to_string(),
            ));
        }

        let embeddings = ensure_count(chunks.len(), embedder.embed_batch(&chunks)?)?;
        info!(
            chunks = chunks.len(),
            dimensions = embedder.dimensions(),
            "Built retrieval index"
        );

        Ok(Self {
            embedder,
            chunks,
            embeddings,
        })
    }

    /// Up to `top_k` chunks nearest to `query`, closest first.
    pub fn search(&self, query: &str, top_k: usize) -> Result<Vec<RetrievedChunk>, AdvisorError> {
        if top_k == 0 {
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed(query)?;
        let hits: Vec<RetrievedChunk> = nearest_neighbors(&query_embedding, &self.embeddings, top_k)
            .into_iter()
            .filter_map(|n| {
                self.chunks.get(n.index).map(|text| RetrievedChunk {
                    index: n.index,
                    text: text.clone(),
                    distance: n.distance,
                })
            })
            .collect();

        debug!(top_k, hits = hits.len(), "retrieval search");
        Ok(hits)
    }

    pub fn chunks(&self) -> &[String] {
        &self.chunks
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}
