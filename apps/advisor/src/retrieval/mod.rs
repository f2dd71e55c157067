// Retrieval: the load-once grounding corpus and its nearest-neighbour index.

pub mod corpus;
pub mod index;

pub use corpus::load_chunks;
pub use index::{RetrievalIndex, RetrievedChunk};

/// Chunks handed to the generation step by default.
pub const DEFAULT_TOP_K: usize = 5;
