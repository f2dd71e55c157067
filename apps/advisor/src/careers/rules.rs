use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AdvisorError;
use crate::skills::Vocabulary;

pub const FALLBACK_LABEL: &str = "Generalist / Software Engineer";

/// One row of the priority table: a cluster whose signature contains any of
/// `indicators` gets `label`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerRule {
    pub label: String,
    pub indicators: Vec<String>,
}

impl CareerRule {
    pub fn new(label: &str, indicators: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            indicators: indicators.iter().map(|s| s.to_lowercase()).collect(),
        }
    }

    pub fn matches(&self, signature: &[String]) -> bool {
        signature
            .iter()
            .any(|skill| self.indicators.iter().any(|i| i.eq_ignore_ascii_case(skill)))
    }
}

/// Ordered rule list. Rules are tried top to bottom and the first match wins;
/// a signature no rule matches gets `fallback`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerRules {
    rules: Vec<CareerRule>,
    fallback: String,
}

impl Default for CareerRules {
    fn default() -> Self {
        Self {
            rules: vec![
                CareerRule::new(
                    "Machine Learning Engineer",
                    &["machine learning", "pytorch", "tensorflow"],
                ),
                CareerRule::new("Frontend Web Developer", &["html", "css", "javascript"]),
                CareerRule::new("Backend Web Developer", &["django", "flask", "sql"]),
                CareerRule::new("App Developer", &["flutter", "android"]),
                CareerRule::new("Cloud Engineer", &["docker", "linux", "aws"]),
            ],
            fallback: FALLBACK_LABEL.to_string(),
        }
    }
}

impl CareerRules {
    pub fn new(rules: Vec<CareerRule>, fallback: impl Into<String>) -> Result<Self, AdvisorError> {
        let fallback = fallback.into();
        if fallback.trim().is_empty() {
            return Err(AdvisorError::Configuration(
                "career rules need a non-empty fallback label".to_string(),
            ));
        }
        if let Some(rule) = rules.iter().find(|r| r.label.trim().is_empty()) {
            return Err(AdvisorError::Configuration(format!(
                "career rule with indicators {:?} has an empty label",
                rule.indicators
            )));
        }

        let rules = rules
            .into_iter()
            .map(|r| CareerRule {
                indicators: r.indicators.iter().map(|i| i.trim().to_lowercase()).collect(),
                label: r.label,
            })
            .collect();

        Ok(Self { rules, fallback })
    }

    /// Loads a JSON table: `{"rules": [{"label": .., "indicators": [..]}], "fallback": ..}`.
    pub fn load(path: &Path) -> Result<Self, AdvisorError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AdvisorError::Configuration(format!(
                "cannot read career rules {}: {e}",
                path.display()
            ))
        })?;
        let parsed: CareerRules = serde_json::from_str(&raw).map_err(|e| {
            AdvisorError::Configuration(format!(
                "invalid career rules {}: {e}",
                path.display()
            ))
        })?;
        let rules = Self::new(parsed.rules, parsed.fallback)?;
        info!(path = %path.display(), rules = rules.rules.len(), "Loaded career rules");
        Ok(rules)
    }

    pub fn rules(&self) -> &[CareerRule] {
        &self.rules
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// First rule matching the signature, if any.
    pub fn matching_rule(&self, signature: &[String]) -> Option<&CareerRule> {
        self.rules.iter().find(|rule| rule.matches(signature))
    }

    /// Label for a cluster signature. Total: never fails.
    pub fn label_for(&self, signature: &[String]) -> &str {
        self.matching_rule(signature)
            .map(|rule| rule.label.as_str())
            .unwrap_or(self.fallback.as_str())
    }

    /// Indicators the extraction vocabulary can never produce. Rules made up
    /// only of these can never fire.
    pub fn unreachable_indicators<'a>(&'a self, vocabulary: &Vocabulary) -> Vec<&'a str> {
        self.rules
            .iter()
            .flat_map(|r| r.indicators.iter())
            .filter(|i| !vocabulary.contains(i))
            .map(String::as_str)
            .collect()
    }
}
