use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::careers::CareerRules;
use crate::config::Config;
use crate::embeddings::{EmbeddingBackend, FastEmbedProvider, HashEmbedder, SharedEmbedder, EMBEDDING_DIM};
use crate::errors::AdvisorError;
use crate::llm_client::{ChatClient, CompletionService};
use crate::ranking::{builtin_roles, load_roles, Role, RoleCatalog};
use crate::retrieval::{load_chunks, RetrievalIndex};
use crate::skills::{SkillMatcher, Vocabulary};

/// Per-call tunables. Loaded from [`Config`] and overridable per invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub extraction_threshold: f32,
    pub cluster_k: usize,
    pub cluster_seed: u64,
    pub retrieval_top_k: usize,
    pub rank_top_n: usize,
    /// Upper bound on a single generation call.
    pub generation_timeout: Duration,
}

impl From<&Config> for Settings {
    fn from(config: &Config) -> Self {
        Self {
            extraction_threshold: config.extraction_threshold,
            cluster_k: config.cluster_k,
            cluster_seed: config.cluster_seed,
            retrieval_top_k: config.retrieval_top_k,
            rank_top_n: config.rank_top_n,
            generation_timeout: config.llm_timeout,
        }
    }
}

/// Load-once context handed to every handler.
///
/// Everything here is read-only after [`AdvisorState::initialize`], so a
/// single instance can be shared across tasks behind an `Arc` without locks.
pub struct AdvisorState {
    pub embedder: SharedEmbedder,
    pub matcher: SkillMatcher,
    pub index: RetrievalIndex,
    pub rules: CareerRules,
    /// Role catalog with cached profile embeddings.
    pub roles: RoleCatalog,
    /// Pluggable generation backend. Default: ChatClient.
    pub llm: Arc<dyn CompletionService>,
    pub settings: Settings,
}

impl AdvisorState {
    /// Loads the embedding model, vocabulary, rule table, role catalog and
    /// corpus. Any missing or empty required source fails initialization.
    pub fn initialize(config: &Config) -> Result<Self, AdvisorError> {
        let embedder: SharedEmbedder = match config.embedding_backend {
            EmbeddingBackend::FastEmbed => {
                Arc::new(FastEmbedProvider::new(config.embedding_cache_dir.clone())?)
            }
            EmbeddingBackend::Hash => Arc::new(HashEmbedder::new(EMBEDDING_DIM)),
        };
        info!(
            "Embedding provider initialized (model: {}, dimensions: {})",
            embedder.model_name(),
            embedder.dimensions()
        );

        let vocabulary = match &config.vocabulary_path {
            Some(path) => Vocabulary::load(path)?,
            None => Vocabulary::builtin(),
        };
        let rules = match &config.career_rules_path {
            Some(path) => CareerRules::load(path)?,
            None => CareerRules::default(),
        };
        let roles = match &config.roles_path {
            Some(path) => load_roles(path)?,
            None => builtin_roles(),
        };
        let chunks = load_chunks(&config.corpus_path)?;

        let llm = Arc::new(ChatClient::new(
            config.llm_api_url.clone(),
            config.llm_api_key.clone(),
            config.llm_model.clone(),
            config.llm_max_tokens,
            config.llm_timeout,
        ));
        if config.llm_api_key.is_none() {
            warn!("LLM_API_KEY is not set; generation requests will fail");
        }
        info!("LLM client initialized (model: {})", llm.model());

        Self::from_parts(
            embedder,
            vocabulary,
            rules,
            roles,
            chunks,
            llm,
            Settings::from(config),
        )
    }

    /// Assembles a state from already-loaded parts.
    pub fn from_parts(
        embedder: SharedEmbedder,
        vocabulary: Vocabulary,
        rules: CareerRules,
        roles: Vec<Role>,
        chunks: Vec<String>,
        llm: Arc<dyn CompletionService>,
        settings: Settings,
    ) -> Result<Self, AdvisorError> {
        let unreachable = rules.unreachable_indicators(&vocabulary);
        if !unreachable.is_empty() {
            warn!(
                indicators = ?unreachable,
                "Career rule indicators missing from the skill vocabulary can never match"
            );
        }

        info!("Skill vocabulary: {} skills", vocabulary.len());
        let matcher = SkillMatcher::new(embedder.clone(), Arc::new(vocabulary))?;
        let index = RetrievalIndex::build(chunks, embedder.clone())?;
        let roles = RoleCatalog::build(roles, embedder.as_ref())?;
        info!("Role catalog: {} roles", roles.len());

        Ok(Self {
            embedder,
            matcher,
            index,
            rules,
            roles,
            llm,
            settings,
        })
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        self.matcher.vocabulary()
    }

    /// Releases nothing: every resource is owned and dropped with the state.
    pub fn teardown(self) {
        info!("Advisor state released");
    }
}
