//! TF-IDF vector space fitted on a record collection.
//!
//! Tokens are lower-cased runs of two or more word characters, English stop
//! words are dropped, idf is smoothed (`ln((1 + n) / (1 + df)) + 1`) and every
//! vector is L2-normalized, so cosine similarity is a plain dot product.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::OnceLock;

use regex::Regex;

use crate::ranking::stop_words::is_stop_word;

fn token_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\w\w+\b").expect("valid regex"))
}

pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    token_pattern()
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|t| !is_stop_word(t))
        .map(String::from)
        .collect()
}

/// Sparse vector as `(term index, weight)` pairs sorted by term index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f32)>,
}

impl SparseVector {
    pub fn is_zero(&self) -> bool {
        self.entries.iter().all(|(_, w)| *w == 0.0)
    }

    pub fn entries(&self) -> &[(usize, f32)] {
        &self.entries
    }

    pub fn dot(&self, other: &SparseVector) -> f32 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (a_idx, a_w) = self.entries[i];
            let (b_idx, b_w) = other.entries[j];
            match a_idx.cmp(&b_idx) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a_w * b_w;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

#[derive(Debug, Clone)]
pub struct TfIdfVectorizer {
    /// term → column, columns assigned in sorted term order
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
}

impl TfIdfVectorizer {
    /// Learns the vocabulary and idf weights from `documents`.
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Self {
        let tokenized: Vec<BTreeSet<String>> = documents
            .iter()
            .map(|d| tokenize(d.as_ref()).into_iter().collect())
            .collect();

        let mut doc_freq: BTreeMap<String, usize> = BTreeMap::new();
        for terms in &tokenized {
            for term in terms {
                *doc_freq.entry(term.clone()).or_insert(0) += 1;
            }
        }

        let n = documents.len() as f32;
        let mut vocabulary = HashMap::with_capacity(doc_freq.len());
        let mut idf = Vec::with_capacity(doc_freq.len());
        for (column, (term, df)) in doc_freq.into_iter().enumerate() {
            idf.push(((1.0 + n) / (1.0 + df as f32)).ln() + 1.0);
            vocabulary.insert(term, column);
        }

        Self { vocabulary, idf }
    }

    pub fn vocabulary_size(&self) -> usize {
        self.idf.len()
    }

    pub fn column(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    /// Projects text into the fitted space. Terms unseen during fitting are
    /// ignored; text with no known terms maps to the zero vector.
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut counts: BTreeMap<usize, f32> = BTreeMap::new();
        for token in tokenize(text) {
            if let Some(column) = self.column(&token) {
                *counts.entry(column).or_insert(0.0) += 1.0;
            }
        }

        let mut entries: Vec<(usize, f32)> = counts
            .into_iter()
            .map(|(column, tf)| (column, tf * self.idf[column]))
            .collect();

        let norm = entries.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
        if norm > 0.0 {
            entries.iter_mut().for_each(|(_, w)| *w /= norm);
        }

        SparseVector { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_drops_stop_words_and_single_chars() {
        assert_eq!(
            tokenize("Python and the C language, SQL!"),
            vec!["python", "language", "sql"]
        );
    }

    #[test]
    fn test_idf_is_smoothed() {
        let v = TfIdfVectorizer::fit(&["python sql", "python", "docker"]);
        // python: df=2 -> ln(4/3)+1 ; docker: df=1 -> ln(4/2)+1
        let python = v.column("python").unwrap();
        let docker = v.column("docker").unwrap();
        assert!((v.idf[python] - ((4.0_f32 / 3.0).ln() + 1.0)).abs() < 1e-6);
        assert!((v.idf[docker] - (2.0_f32.ln() + 1.0)).abs() < 1e-6);
    }

    #[test]
    fn test_columns_follow_sorted_terms() {
        let v = TfIdfVectorizer::fit(&["zeta alpha", "mid"]);
        assert_eq!(v.column("alpha"), Some(0));
        assert_eq!(v.column("mid"), Some(1));
        assert_eq!(v.column("zeta"), Some(2));
        assert_eq!(v.vocabulary_size(), 3);
    }

    #[test]
    fn test_transform_is_unit_length() {
        let v = TfIdfVectorizer::fit(&["python sql docker", "python"]);
        let vec = v.transform("python python docker");
        let norm: f32 = vec.entries().iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
        assert!((vec.dot(&vec) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_unknown_terms_give_zero_vector() {
        let v = TfIdfVectorizer::fit(&["python sql"]);
        assert!(v.transform("haskell erlang").is_zero());
        assert!(v.transform("").is_zero());
    }

    #[test]
    fn test_dot_of_disjoint_vectors_is_zero() {
        let v = TfIdfVectorizer::fit(&["python", "docker"]);
        assert_eq!(v.transform("python").dot(&v.transform("docker")), 0.0);
    }
}
