use std::collections::HashSet;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::errors::AdvisorError;

/// Skills recognised out of the box. The mobile and cloud indicators at the end
/// are the ones the default career rules look for.
const BUILTIN_SKILLS: &[&str] = &[
    "python",
    "numpy",
    "pandas",
    "matplotlib",
    "seaborn",
    "plotly",
    "cufflinks",
    "geoplotting",
    "machine learning",
    "deep learning",
    "cnn",
    "ann",
    "supervised learning",
    "unsupervised learning",
    "php",
    "django",
    "html",
    "css",
    "sql",
    "javascript",
    "c",
    "c++",
    "data structures",
    "algorithms",
    "xgboost",
    "k-means",
    "transformers",
    "llms",
    "hugging face",
    "t5",
    "wav2vec2",
    "google colab",
    "flask",
    "streamlit",
    "react",
    "pytorch",
    "tensorflow",
    "linux",
    "git",
    "docker",
    "mysql",
    "postgresql",
    // mobile
    "android",
    "flutter",
    "kotlin",
    "swift",
    "dart",
    "react native",
    // cloud
    "aws",
    "azure",
    "gcp",
    "kubernetes",
];

/// Ordered, duplicate-free list of lower-cased canonical skills.
///
/// Immutable once built; its order defines the index space of the cached
/// vocabulary embeddings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Vocabulary {
    skills: Vec<String>,
}

impl Vocabulary {
    /// Builds a vocabulary, lower-casing and trimming entries and dropping
    /// blanks and repeats (first occurrence keeps its position).
    pub fn new<I, S>(skills: I) -> Result<Self, AdvisorError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let skills: Vec<String> = skills
            .into_iter()
            .map(|s| s.as_ref().trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .filter(|s| seen.insert(s.clone()))
            .collect();

        if skills.is_empty() {
            return Err(AdvisorError::Configuration(
                "skill vocabulary is empty".to_string(),
            ));
        }

        Ok(Self { skills })
    }

    /// The built-in vocabulary, sorted.
    pub fn builtin() -> Self {
        let mut skills: Vec<String> = BUILTIN_SKILLS.iter().map(|s| s.to_string()).collect();
        skills.sort();
        skills.dedup();
        Self { skills }
    }

    /// Loads one skill per line. Blank lines and `#` comments are skipped.
    pub fn load(path: &Path) -> Result<Self, AdvisorError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AdvisorError::Configuration(format!(
                "cannot read vocabulary file {}: {e}",
                path.display()
            ))
        })?;

        let vocabulary = Self::new(
            raw.lines()
                .map(str::trim)
                .filter(|line| !line.starts_with('#')),
        )
        .map_err(|_| {
            AdvisorError::Configuration(format!(
                "vocabulary file {} contains no skills",
                path.display()
            ))
        })?;

        info!(
            path = %path.display(),
            skills = vocabulary.len(),
            "Loaded skill vocabulary"
        );
        Ok(vocabulary)
    }

    pub fn skills(&self) -> &[String] {
        &self.skills
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.skills.get(index).map(String::as_str)
    }

    pub fn contains(&self, skill: &str) -> bool {
        let skill = skill.to_lowercase();
        self.skills.iter().any(|s| *s == skill)
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_new_lowercases_and_dedups() {
        let vocab = Vocabulary::new(["Python", "python ", "React", "", "docker"]).unwrap();
        assert_eq!(vocab.skills(), &["python", "react", "docker"]);
    }

    #[test]
    fn test_empty_vocabulary_is_configuration_error() {
        let err = Vocabulary::new(Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, AdvisorError::Configuration(_)));
    }

    #[test]
    fn test_builtin_is_sorted_and_unique() {
        let vocab = Vocabulary::builtin();
        let mut sorted = vocab.skills().to_vec();
        sorted.sort();
        sorted.dedup();
        assert_eq!(vocab.skills(), sorted.as_slice());
        assert!(vocab.contains("machine learning"));
        assert!(vocab.contains("Flutter"));
    }

    #[test]
    fn test_load_skips_comments_and_blanks() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# core skills\nRust\n\nGo\nrust").unwrap();

        let vocab = Vocabulary::load(file.path()).unwrap();
        assert_eq!(vocab.skills(), &["rust", "go"]);
    }

    #[test]
    fn test_load_missing_file_fails_fast() {
        let err = Vocabulary::load(Path::new("/nonexistent/skills.txt")).unwrap_err();
        assert!(matches!(err, AdvisorError::Configuration(_)));
    }

    #[test]
    fn test_load_comment_only_file_fails_fast() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# nothing here").unwrap();
        assert!(Vocabulary::load(file.path()).is_err());
    }
}
