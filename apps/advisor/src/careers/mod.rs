//! Career clustering: groups skill sets with seeded k-means over a presence
//! matrix and labels every cluster through the ordered career rule table.
//!
//! Everything here is request-local: a batch builds its own matrix, clusters
//! and labels, and nothing survives the call.

pub mod kmeans;
pub mod matrix;
pub mod rules;

use serde::Serialize;
use tracing::debug;

use crate::skills::SkillSet;

pub use kmeans::{KMeansConfig, KMeansResult};
pub use matrix::PresenceMatrix;
pub use rules::{CareerRule, CareerRules, FALLBACK_LABEL};

pub const DEFAULT_CLUSTER_COUNT: usize = 6;
pub const DEFAULT_SEED: u64 = 42;
/// Number of top co-occurring skills that describe a cluster.
pub const SIGNATURE_SIZE: usize = 5;

/// Where one document landed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterAssignment {
    pub document: usize,
    pub cluster: usize,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterSummary {
    pub cluster: usize,
    pub label: String,
    pub signature: Vec<String>,
    pub size: usize,
}

/// Output of one clustering call. `clusters` has one entry for every id in
/// `[0, k)`, including clusters that ended up empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Clustering {
    pub assignments: Vec<ClusterAssignment>,
    pub clusters: Vec<ClusterSummary>,
}

impl Clustering {
    pub fn label_of(&self, cluster: usize) -> Option<&str> {
        self.clusters
            .get(cluster)
            .map(|summary| summary.label.as_str())
    }
}

/// Clusters skill sets into at most `k` groups (clamped to the document count)
/// and labels each group. Deterministic for identical input, `k` and `seed`.
pub fn cluster(skill_sets: &[SkillSet], k: usize, seed: u64, rules: &CareerRules) -> Clustering {
    if skill_sets.is_empty() {
        return Clustering {
            assignments: Vec::new(),
            clusters: Vec::new(),
        };
    }

    let matrix = PresenceMatrix::build(skill_sets);
    let fitted = kmeans::fit(&matrix.points(), &KMeansConfig::new(k, seed));

    let clusters: Vec<ClusterSummary> = (0..fitted.k)
        .map(|id| {
            let members: Vec<usize> = fitted
                .labels
                .iter()
                .enumerate()
                .filter(|(_, &label)| label == id)
                .map(|(doc, _)| doc)
                .collect();
            let signature = matrix.signature(&members, SIGNATURE_SIZE);
            let label = rules.label_for(&signature).to_string();
            ClusterSummary {
                cluster: id,
                label,
                signature,
                size: members.len(),
            }
        })
        .collect();

    let assignments = fitted
        .labels
        .iter()
        .enumerate()
        .map(|(document, &cluster)| ClusterAssignment {
            document,
            cluster,
            label: clusters[cluster].label.clone(),
        })
        .collect();

    debug!(
        documents = skill_sets.len(),
        skills = matrix.skills().len(),
        k = fitted.k,
        inertia = fitted.inertia,
        "clustered skill sets"
    );

    Clustering {
        assignments,
        clusters,
    }
}
