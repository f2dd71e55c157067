//! Test doubles shared across module tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::embeddings::{Embedding, EmbeddingError, EmbeddingProvider};

/// Concept axes: every listed token adds one unit along its concept's axis.
/// Unknown tokens contribute nothing, so similarity is driven only by shared
/// concepts.
const CONCEPTS: &[(&str, &[&str])] = &[
    ("python", &["python"]),
    ("react", &["react"]),
    ("docker", &["docker", "container", "containers"]),
    ("sql", &["sql", "database", "databases"]),
    ("html", &["html"]),
    ("css", &["css"]),
    ("javascript", &["javascript", "js"]),
    ("ml", &["machine", "learning", "neural", "networks", "ml", "ai"]),
    ("pytorch", &["pytorch"]),
    ("cloud", &["cloud", "computing", "aws", "kubernetes"]),
    ("mobile", &["flutter", "android", "kotlin"]),
    ("food", &["cooking", "recipes", "baking"]),
];

/// Deterministic "semantic" embedder for tests: tokens map onto a fixed table
/// of concept axes and the result is L2-normalized.
pub struct ConceptEmbedder {
    axes: HashMap<&'static str, usize>,
    dim: usize,
}

impl ConceptEmbedder {
    pub fn new() -> Self {
        let mut axes = HashMap::new();
        for (axis, (_, tokens)) in CONCEPTS.iter().enumerate() {
            for token in tokens.iter() {
                axes.insert(*token, axis);
            }
        }
        Self {
            axes,
            dim: CONCEPTS.len(),
        }
    }

    fn embed_one(&self, text: &str) -> Embedding {
        let mut vector = vec![0.0_f32; self.dim];
        let lowered = text.to_lowercase();
        for token in lowered.split(|c: char| !c.is_alphanumeric()) {
            if let Some(&axis) = self.axes.get(token) {
                vector[axis] += 1.0;
            }
        }
        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|x| *x /= norm);
        }
        vector
    }
}

impl EmbeddingProvider for ConceptEmbedder {
    fn model_name(&self) -> &str {
        "concept-test"
    }

    fn dimensions(&self) -> usize {
        self.dim
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}

/// Embedder whose model is permanently unavailable.
pub struct FailingEmbedder;

impl EmbeddingProvider for FailingEmbedder {
    fn model_name(&self) -> &str {
        "failing"
    }

    fn dimensions(&self) -> usize {
        1
    }

    fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
        Err(EmbeddingError::Model("model offline".to_string()))
    }
}

/// Embedder that silently drops vectors: returns at most `limit` of them.
pub struct ShortBatchEmbedder {
    inner: ConceptEmbedder,
    limit: usize,
}

impl ShortBatchEmbedder {
    pub fn new(limit: usize) -> Self {
        Self {
            inner: ConceptEmbedder::new(),
            limit,
        }
    }
}

impl EmbeddingProvider for ShortBatchEmbedder {
    fn model_name(&self) -> &str {
        "short-batch"
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
        let mut vectors = self.inner.embed_batch(texts)?;
        vectors.truncate(self.limit);
        Ok(vectors)
    }
}

/// Concept embedder that counts how many texts it has been asked to embed.
pub struct CountingEmbedder {
    inner: ConceptEmbedder,
    texts: AtomicUsize,
}

impl CountingEmbedder {
    pub fn new() -> Self {
        Self {
            inner: ConceptEmbedder::new(),
            texts: AtomicUsize::new(0),
        }
    }

    pub fn embedded(&self) -> usize {
        self.texts.load(Ordering::SeqCst)
    }
}

impl EmbeddingProvider for CountingEmbedder {
    fn model_name(&self) -> &str {
        "counting"
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
        self.texts.fetch_add(texts.len(), Ordering::SeqCst);
        self.inner.embed_batch(texts)
    }
}
