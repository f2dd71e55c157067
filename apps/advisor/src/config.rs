use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::careers::{DEFAULT_CLUSTER_COUNT, DEFAULT_SEED};
use crate::embeddings::EmbeddingBackend;
use crate::llm_client::{DEFAULT_API_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
use crate::ranking::DEFAULT_TOP_N;
use crate::retrieval::DEFAULT_TOP_K;
use crate::skills::matcher::DEFAULT_THRESHOLD;

/// Advisor configuration loaded from environment variables.
/// Every key has a default except the LLM API key, which only generation needs.
#[derive(Debug, Clone)]
pub struct Config {
    pub corpus_path: PathBuf,
    pub vocabulary_path: Option<PathBuf>,
    pub career_rules_path: Option<PathBuf>,
    pub roles_path: Option<PathBuf>,
    pub embedding_backend: EmbeddingBackend,
    pub embedding_cache_dir: Option<PathBuf>,
    pub llm_api_url: String,
    pub llm_api_key: Option<String>,
    pub llm_model: String,
    pub llm_max_tokens: u32,
    pub llm_timeout: Duration,
    pub extraction_threshold: f32,
    pub cluster_k: usize,
    pub cluster_seed: u64,
    pub retrieval_top_k: usize,
    pub rank_top_n: usize,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let embedding_backend = match get("EMBEDDING_BACKEND") {
            Some(raw) => raw
                .parse::<EmbeddingBackend>()
                .map_err(|e| anyhow!(e))
                .context("EMBEDDING_BACKEND is invalid")?,
            None => EmbeddingBackend::FastEmbed,
        };

        let extraction_threshold: f32 =
            parse_or(get("EXTRACTION_THRESHOLD"), "EXTRACTION_THRESHOLD", DEFAULT_THRESHOLD)?;
        if !extraction_threshold.is_finite() {
            return Err(anyhow!("EXTRACTION_THRESHOLD must be a finite number"));
        }

        Ok(Config {
            corpus_path: get("CORPUS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("text_chunks.txt")),
            vocabulary_path: get("VOCABULARY_PATH").map(PathBuf::from),
            career_rules_path: get("CAREER_RULES_PATH").map(PathBuf::from),
            roles_path: get("ROLES_PATH").map(PathBuf::from),
            embedding_backend,
            embedding_cache_dir: get("EMBEDDING_CACHE_DIR").map(PathBuf::from),
            llm_api_url: get("LLM_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            llm_api_key: get("LLM_API_KEY"),
            llm_model: get("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            llm_max_tokens: parse_or(get("LLM_MAX_TOKENS"), "LLM_MAX_TOKENS", DEFAULT_MAX_TOKENS)?,
            llm_timeout: Duration::from_secs(parse_or(
                get("LLM_TIMEOUT_SECS"),
                "LLM_TIMEOUT_SECS",
                30u64,
            )?),
            extraction_threshold,
            cluster_k: parse_or(get("CLUSTER_K"), "CLUSTER_K", DEFAULT_CLUSTER_COUNT)?,
            cluster_seed: parse_or(get("CLUSTER_SEED"), "CLUSTER_SEED", DEFAULT_SEED)?,
            retrieval_top_k: parse_or(get("RETRIEVAL_TOP_K"), "RETRIEVAL_TOP_K", DEFAULT_TOP_K)?,
            rank_top_n: parse_or(get("RANK_TOP_N"), "RANK_TOP_N", DEFAULT_TOP_N)?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(value) => value
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{value}'")),
        None => Ok(default),
    }
}
