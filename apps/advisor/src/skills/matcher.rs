use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::embeddings::{ensure_count, Embedding, SharedEmbedder};
use crate::errors::AdvisorError;
use crate::similarity::best_match;
use crate::skills::normalize::{clean_text, segment_phrases};
use crate::skills::vocabulary::Vocabulary;

/// Minimum cosine similarity for a phrase to count as a skill mention.
pub const DEFAULT_THRESHOLD: f32 = 0.3;

/// Sorted, duplicate-free canonical skills extracted from one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillSet(BTreeSet<String>);

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.0.contains(skill)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_subset(&self, other: &SkillSet) -> bool {
        self.0.is_subset(&other.0)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for SkillSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// How a single phrase lined up against the vocabulary.
#[derive(Debug, Clone, Serialize)]
pub struct PhraseMatch {
    pub phrase: String,
    pub skill: String,
    pub score: f32,
}

/// Maps free text onto the controlled skill vocabulary.
///
/// Vocabulary embeddings are computed once here and reused by every call.
pub struct SkillMatcher {
    embedder: SharedEmbedder,
    vocabulary: Arc<Vocabulary>,
    vocabulary_embeddings: Vec<Embedding>,
}

impl SkillMatcher {
    pub fn new(embedder: SharedEmbedder, vocabulary: Arc<Vocabulary>) -> Result<Self, AdvisorError> {
        let vocabulary_embeddings =
            ensure_count(vocabulary.len(), embedder.embed_batch(vocabulary.skills())?)?;
        debug!(
            skills = vocabulary.len(),
            model = embedder.model_name(),
            "cached vocabulary embeddings"
        );

        Ok(Self {
            embedder,
            vocabulary,
            vocabulary_embeddings,
        })
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Best vocabulary entry for every phrase of `text`, regardless of score.
    pub fn match_phrases(&self, text: &str) -> Result<Vec<PhraseMatch>, AdvisorError> {
        let phrases = segment_phrases(&clean_text(text));
        if phrases.is_empty() {
            return Ok(Vec::new());
        }

        let phrase_embeddings = ensure_count(phrases.len(), self.embedder.embed_batch(&phrases)?)?;

        let matches = phrases
            .into_iter()
            .zip(&phrase_embeddings)
            .filter_map(|(phrase, embedding)| {
                let (idx, score) = best_match(embedding, &self.vocabulary_embeddings)?;
                let skill = self.vocabulary.get(idx)?.to_string();
                Some(PhraseMatch {
                    phrase,
                    skill,
                    score,
                })
            })
            .collect();

        Ok(matches)
    }

    /// Extracts every vocabulary skill whose best-matching phrase scores at
    /// least `threshold`.
    pub fn extract(&self, text: &str, threshold: f32) -> Result<SkillSet, AdvisorError> {
        if threshold.is_nan() {
            return Err(AdvisorError::Input(
                "similarity threshold must be a number".to_string(),
            ));
        }

        let matches = self.match_phrases(text)?;
        let phrase_count = matches.len();
        let skills: SkillSet = matches
            .into_iter()
            .filter(|m| m.score >= threshold)
            .map(|m| m.skill)
            .collect();

        debug!(
            phrases = phrase_count,
            skills = skills.len(),
            threshold,
            "extracted skills"
        );
        Ok(skills)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::EmbeddingError;
    use crate::test_utils::{ConceptEmbedder, ShortBatchEmbedder};

    fn matcher(skills: &[&str]) -> SkillMatcher {
        let vocabulary = Arc::new(Vocabulary::new(skills.iter().copied()).unwrap());
        SkillMatcher::new(Arc::new(ConceptEmbedder::new()), vocabulary).unwrap()
    }

    #[test]
    fn test_python_react_scenario() {
        let m = matcher(&["python", "react", "docker"]);
        let skills = m
            .extract("Experienced in Python and React development", 0.3)
            .unwrap();
        assert_eq!(skills.to_vec(), vec!["python", "react"]);
        assert!(!skills.contains("docker"));
    }

    #[test]
    fn test_empty_text_is_empty_result() {
        let m = matcher(&["python"]);
        assert!(m.extract("", 0.3).unwrap().is_empty());
        assert!(m.extract("  \n ; , ", 0.3).unwrap().is_empty());
    }

    #[test]
    fn test_nothing_above_threshold_is_empty_result() {
        let m = matcher(&["python", "docker"]);
        let skills = m.extract("Enjoys cooking and gardening", 0.3).unwrap();
        assert!(skills.is_empty());
    }

    #[test]
    fn test_results_are_vocabulary_entries_without_duplicates() {
        let m = matcher(&["python", "react", "docker", "sql"]);
        let text = "Python, python scripting, PYTHON • React • docker compose, docker";
        let skills = m.extract(text, 0.3).unwrap();
        let as_vec = skills.to_vec();
        let mut deduped = as_vec.clone();
        deduped.dedup();
        assert_eq!(as_vec, deduped);
        assert!(skills.iter().all(|s| m.vocabulary().contains(s)));
        assert_eq!(as_vec, vec!["docker", "python", "react"]);
    }

    #[test]
    fn test_threshold_is_monotonic() {
        let m = matcher(&["python", "react", "docker", "machine learning"]);
        let text = "Built machine learning pipelines in python, some docker, \
                    dabbled in react native apps for a local startup team";
        let low = m.extract(text, 0.3).unwrap();
        let mid = m.extract(text, 0.5).unwrap();
        let high = m.extract(text, 0.9).unwrap();
        assert!(mid.is_subset(&low));
        assert!(high.is_subset(&mid));
    }

    #[test]
    fn test_nan_threshold_rejected() {
        let m = matcher(&["python"]);
        assert!(matches!(
            m.extract("python", f32::NAN),
            Err(AdvisorError::Input(_))
        ));
    }

    #[test]
    fn test_match_phrases_reports_best_skill_per_phrase() {
        let m = matcher(&["python", "docker"]);
        let matches = m.match_phrases("Docker, Python").unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].phrase, "docker");
        assert_eq!(matches[0].skill, "docker");
        assert!((matches[0].score - 1.0).abs() < 1e-5);
        assert_eq!(matches[1].skill, "python");
    }

    #[test]
    fn test_short_vocabulary_batch_rejected() {
        let vocabulary = Arc::new(Vocabulary::new(["python", "react", "docker"]).unwrap());
        let err = SkillMatcher::new(Arc::new(ShortBatchEmbedder::new(2)), vocabulary).err();
        assert!(matches!(
            err,
            Some(AdvisorError::Embedding(EmbeddingError::CountMismatch {
                expected: 3,
                got: 2
            }))
        ));
    }

    #[test]
    fn test_short_phrase_batch_rejected() {
        // the vocabulary fits the limit, the three phrases do not
        let vocabulary = Arc::new(Vocabulary::new(["python", "react"]).unwrap());
        let m = SkillMatcher::new(Arc::new(ShortBatchEmbedder::new(2)), vocabulary).unwrap();
        let err = m.extract("Python, React, Docker", 0.3).unwrap_err();
        assert!(err.is_dependency());
    }
}
