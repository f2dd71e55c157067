//! Advisor operations: the call-style entry points the binary (or any other
//! front end) drives against a shared [`AdvisorState`].

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::careers::{self, ClusterSummary};
use crate::errors::AdvisorError;
use crate::llm_client::prompts::{build_grounded_prompt, ADVISOR_SYSTEM};
use crate::ranking::{rank_records, RankedRecord, RankedRole, Record};
use crate::retrieval::RetrievedChunk;
use crate::skills::SkillSet;
use crate::state::AdvisorState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// One input document for batch career suggestion.
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    pub name: String,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct CareerSuggestion {
    pub name: String,
    pub skills: SkillSet,
    pub cluster: usize,
    pub career: String,
}

#[derive(Debug, Serialize)]
pub struct CareerSuggestionsResponse {
    pub request_id: Uuid,
    pub suggestions: Vec<CareerSuggestion>,
    pub clusters: Vec<ClusterSummary>,
}

#[derive(Debug, Serialize)]
pub struct GroundedAnswer {
    pub request_id: Uuid,
    pub query: String,
    /// Retrieved grounding chunks, present even when generation fails.
    pub context: Vec<RetrievedChunk>,
    pub answer: Option<String>,
    pub generation_error: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// Skills mentioned in `text`, at the configured threshold.
pub fn extract_skills(state: &AdvisorState, text: &str) -> Result<SkillSet, AdvisorError> {
    state
        .matcher
        .extract(text, state.settings.extraction_threshold)
}

/// Extracts skills from every document, clusters the skill sets and labels
/// each document with its cluster's career.
pub fn suggest_careers(
    state: &AdvisorState,
    documents: &[Document],
) -> Result<CareerSuggestionsResponse, AdvisorError> {
    let request_id = Uuid::new_v4();

    let skill_sets = documents
        .iter()
        .map(|doc| extract_skills(state, &doc.text))
        .collect::<Result<Vec<_>, _>>()?;

    let clustering = careers::cluster(
        &skill_sets,
        state.settings.cluster_k,
        state.settings.cluster_seed,
        &state.rules,
    );

    let suggestions: Vec<CareerSuggestion> = documents
        .iter()
        .zip(skill_sets)
        .zip(&clustering.assignments)
        .map(|((doc, skills), assignment)| CareerSuggestion {
            name: doc.name.clone(),
            skills,
            cluster: assignment.cluster,
            career: assignment.label.clone(),
        })
        .collect();

    info!(
        %request_id,
        documents = documents.len(),
        clusters = clustering.clusters.len(),
        "Suggested careers"
    );

    Ok(CareerSuggestionsResponse {
        request_id,
        suggestions,
        clusters: clustering.clusters,
    })
}

/// Ranks job or course records against a skill list.
pub fn recommend_records(
    state: &AdvisorState,
    skills: &[String],
    records: &[Record],
    text_field: &str,
) -> Result<Vec<RankedRecord>, AdvisorError> {
    let request_id = Uuid::new_v4();
    let ranked = rank_records(skills, records, text_field, state.settings.rank_top_n)?;
    info!(
        %request_id,
        records = records.len(),
        returned = ranked.len(),
        "Ranked records"
    );
    Ok(ranked)
}

/// Ranks the role catalog against free text (a resume or a list of interests).
pub fn recommend_roles(state: &AdvisorState, text: &str) -> Result<Vec<RankedRole>, AdvisorError> {
    let request_id = Uuid::new_v4();
    let ranked = state
        .roles
        .rank(text, state.embedder.as_ref(), state.settings.rank_top_n)?;
    info!(%request_id, returned = ranked.len(), "Ranked roles");
    Ok(ranked)
}

pub fn retrieve_context(
    state: &AdvisorState,
    query: &str,
) -> Result<Vec<RetrievedChunk>, AdvisorError> {
    state.index.search(query, state.settings.retrieval_top_k)
}

/// Retrieves grounding context for `query` and asks the generation service
/// for an answer.
///
/// Generation failures and timeouts do not fail the call: the retrieved
/// context is still returned with `generation_error` set.
pub async fn answer_query(state: &AdvisorState, query: &str) -> Result<GroundedAnswer, AdvisorError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(AdvisorError::Input("query cannot be empty".to_string()));
    }

    let request_id = Uuid::new_v4();
    let context = retrieve_context(state, query)?;
    info!(
        %request_id,
        chunks = context.len(),
        indices = ?context.iter().map(|c| c.index).collect::<Vec<_>>(),
        "Retrieved grounding context"
    );

    let texts: Vec<&str> = context.iter().map(|c| c.text.as_str()).collect();
    let prompt = build_grounded_prompt(state.vocabulary(), &texts, query);

    let timeout = state.settings.generation_timeout;
    let outcome = tokio::time::timeout(timeout, state.llm.complete(ADVISOR_SYSTEM, &prompt)).await;

    let (answer, generation_error) = match outcome {
        Ok(Ok(answer)) => (Some(answer), None),
        Ok(Err(e)) => {
            let (_, message) = AdvisorError::from(e).report();
            (None, Some(message))
        }
        Err(_) => {
            warn!(%request_id, timeout_secs = timeout.as_secs_f32(), "Generation timed out");
            (
                None,
                Some(format!("generation timed out after {}s", timeout.as_secs_f32())),
            )
        }
    };

    Ok(GroundedAnswer {
        request_id,
        query: query.to_string(),
        context,
        answer,
        generation_error,
    })
}
