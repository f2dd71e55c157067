use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::AdvisorError;
use crate::ranking::tfidf::TfIdfVectorizer;
use crate::similarity::top_n_indices;

/// Column that holds the skills text in job and course records.
pub const DEFAULT_TEXT_FIELD: &str = "Required_Skills";

/// A job or course row with named fields, kept as-is for output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(pub Map<String, Value>);

impl Record {
    /// Text of `field`. A list of strings reads as its items joined with
    /// ", "; missing, null and other non-string fields read as empty.
    pub fn text(&self, field: &str) -> Cow<'_, str> {
        match self.0.get(field) {
            Some(Value::String(s)) => Cow::Borrowed(s.as_str()),
            Some(Value::Array(items)) => Cow::Owned(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            _ => Cow::Borrowed(""),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Parses a JSON array of objects into records.
pub fn parse_records(json: &str) -> Result<Vec<Record>, AdvisorError> {
    serde_json::from_str(json)
        .map_err(|e| AdvisorError::Input(format!("records must be a JSON array of objects: {e}")))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRecord {
    /// 1-based position in the result.
    pub rank: usize,
    /// Cosine similarity in `[0, 1]`.
    pub score: f32,
    pub record: Record,
}

/// Ranks `records` by TF-IDF cosine similarity between their `text_field` and
/// the comma-joined `skills`.
///
/// The vector space is fitted on the whole collection. Ties, including the
/// all-zero scores of an empty skill list, keep record order. An empty
/// collection is an input error.
pub fn rank_records(
    skills: &[String],
    records: &[Record],
    text_field: &str,
    top_n: usize,
) -> Result<Vec<RankedRecord>, AdvisorError> {
    if records.is_empty() {
        return Err(AdvisorError::Input(
            "no records to rank against".to_string(),
        ));
    }

    let texts: Vec<Cow<'_, str>> = records.iter().map(|r| r.text(text_field)).collect();
    let vectorizer = TfIdfVectorizer::fit(&texts);
    let record_vectors: Vec<_> = texts.iter().map(|t| vectorizer.transform(t)).collect();

    let query_text = skills
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    let query = vectorizer.transform(&query_text);

    let scores: Vec<f32> = record_vectors
        .iter()
        .map(|v| query.dot(v).clamp(0.0, 1.0))
        .collect();

    debug!(
        records = records.len(),
        terms = vectorizer.vocabulary_size(),
        zero_query = query.is_zero(),
        "ranked records"
    );

    Ok(top_n_indices(&scores, top_n)
        .into_iter()
        .enumerate()
        .map(|(position, idx)| RankedRecord {
            rank: position + 1,
            score: scores[idx],
            record: records[idx].clone(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn job(title: &str, skills: Option<&str>) -> Record {
        let mut record: Record = [("Job_Title", json!(title))].into_iter().collect();
        if let Some(s) = skills {
            record.0.insert(DEFAULT_TEXT_FIELD.to_string(), json!(s));
        }
        record
    }

    fn jobs() -> Vec<Record> {
        vec![
            job("Data Scientist", Some("Python, Machine Learning, SQL")),
            job("Frontend Developer", Some("JavaScript, React, CSS")),
            job("DevOps Engineer", Some("Docker, Kubernetes, Linux")),
            job("ML Engineer", Some("Python, PyTorch, Machine Learning, Docker")),
            job("Recruiter", None),
        ]
    }

    fn skills(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_best_match_ranks_first() {
        let ranked =
            rank_records(&skills(&["react", "css"]), &jobs(), DEFAULT_TEXT_FIELD, 3).unwrap();
        assert_eq!(ranked[0].record.text("Job_Title"), "Frontend Developer");
        assert_eq!(ranked[0].rank, 1);
        assert!(ranked[0].score > 0.0);
    }

    #[test]
    fn test_scores_non_increasing_and_bounded_by_top_n() {
        let ranked = rank_records(
            &skills(&["python", "machine learning", "docker"]),
            &jobs(),
            DEFAULT_TEXT_FIELD,
            3,
        )
        .unwrap();
        assert!(ranked.len() <= 3);
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(ranked.iter().all(|r| (0.0..=1.0).contains(&r.score)));
        assert_eq!(ranked[0].record.text("Job_Title"), "ML Engineer");
    }

    #[test]
    fn test_empty_collection_is_input_error() {
        let err = rank_records(&skills(&["python"]), &[], DEFAULT_TEXT_FIELD, 5).unwrap_err();
        assert!(matches!(err, AdvisorError::Input(_)));
    }

    #[test]
    fn test_empty_skill_list_keeps_original_order() {
        let ranked = rank_records(&[], &jobs(), DEFAULT_TEXT_FIELD, 2).unwrap();
        assert_eq!(ranked.len(), 2);
        assert!(ranked.iter().all(|r| r.score == 0.0));
        assert_eq!(ranked[0].record.text("Job_Title"), "Data Scientist");
        assert_eq!(ranked[1].record.text("Job_Title"), "Frontend Developer");
    }

    #[test]
    fn test_missing_text_field_scores_zero() {
        let ranked =
            rank_records(&skills(&["python"]), &jobs(), DEFAULT_TEXT_FIELD, 5).unwrap();
        let recruiter = ranked
            .iter()
            .find(|r| r.record.text("Job_Title") == "Recruiter")
            .unwrap();
        assert_eq!(recruiter.score, 0.0);
    }

    #[test]
    fn test_top_n_larger_than_collection() {
        let ranked = rank_records(&skills(&["linux"]), &jobs(), DEFAULT_TEXT_FIELD, 50).unwrap();
        assert_eq!(ranked.len(), 5);
        let ranks: Vec<usize> = ranked.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_record_text_handles_non_strings() {
        let record: Record = [("Salary_USD", json!(120000)), ("Notes", Value::Null)]
            .into_iter()
            .collect();
        assert_eq!(record.text("Salary_USD"), "");
        assert_eq!(record.text("Notes"), "");
        assert_eq!(record.text("Missing"), "");
    }

    #[test]
    fn test_record_text_joins_string_lists() {
        let record: Record = [("Required_Skills", json!(["Python", "SQL", 3, "Docker"]))]
            .into_iter()
            .collect();
        assert_eq!(record.text(DEFAULT_TEXT_FIELD), "Python, SQL, Docker");
    }

    #[test]
    fn test_list_valued_skills_are_ranked() {
        let records: Vec<Record> = vec![
            [("Job_Title", json!("Chef")), ("Required_Skills", json!(["Cooking", "Baking"]))]
                .into_iter()
                .collect(),
            [("Job_Title", json!("Analyst")), ("Required_Skills", json!(["SQL", "Excel"]))]
                .into_iter()
                .collect(),
        ];
        let ranked = rank_records(&skills(&["SQL"]), &records, DEFAULT_TEXT_FIELD, 2).unwrap();
        assert_eq!(ranked[0].record.text("Job_Title"), "Analyst");
        assert!(ranked[0].score > 0.0);
        assert_eq!(ranked[1].score, 0.0);
    }

    #[test]
    fn test_parse_records() {
        let records =
            parse_records(r#"[{"Job_Title": "Analyst", "Required_Skills": "SQL, Excel"}]"#)
                .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text(DEFAULT_TEXT_FIELD), "SQL, Excel");
        assert!(matches!(
            parse_records("{\"not\": \"an array\"}"),
            Err(AdvisorError::Input(_))
        ));
    }
}
