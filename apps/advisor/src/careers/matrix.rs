use std::collections::{BTreeSet, HashSet};

use crate::skills::SkillSet;

/// Binary document × skill table over the skills observed in one batch.
///
/// Columns are the sorted union of the input skill sets, so column order is
/// stable for identical input. Built per batch and dropped after clustering.
#[derive(Debug, Clone, PartialEq)]
pub struct PresenceMatrix {
    skills: Vec<String>,
    rows: Vec<Vec<u8>>,
}

impl PresenceMatrix {
    pub fn build(skill_sets: &[SkillSet]) -> Self {
        let lowered: Vec<HashSet<String>> = skill_sets
            .iter()
            .map(|set| set.iter().map(str::to_lowercase).collect())
            .collect();

        let skills: Vec<String> = lowered
            .iter()
            .flatten()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let rows = lowered
            .iter()
            .map(|doc| {
                skills
                    .iter()
                    .map(|skill| u8::from(doc.contains(skill)))
                    .collect()
            })
            .collect();

        Self { skills, rows }
    }

    pub fn skills(&self) -> &[String] {
        &self.skills
    }

    pub fn rows(&self) -> &[Vec<u8>] {
        &self.rows
    }

    pub fn document_count(&self) -> usize {
        self.rows.len()
    }

    /// Rows as `f64` points for centroid-based clustering.
    pub fn points(&self) -> Vec<Vec<f64>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|&cell| f64::from(cell)).collect())
            .collect()
    }

    /// Per-column presence totals over the given member rows.
    pub fn column_sums(&self, members: &[usize]) -> Vec<u32> {
        let mut sums = vec![0_u32; self.skills.len()];
        for row in members.iter().filter_map(|&m| self.rows.get(m)) {
            for (sum, &cell) in sums.iter_mut().zip(row) {
                *sum += u32::from(cell);
            }
        }
        sums
    }

    /// Up to `size` skills with the highest totals among `members`. Ties keep
    /// column order; skills nobody in the group has are left out.
    pub fn signature(&self, members: &[usize], size: usize) -> Vec<String> {
        let sums = self.column_sums(members);
        let mut columns: Vec<usize> = (0..sums.len()).filter(|&c| sums[c] > 0).collect();
        columns.sort_by(|&a, &b| sums[b].cmp(&sums[a]));
        columns
            .into_iter()
            .take(size)
            .map(|c| self.skills[c].clone())
            .collect()
    }
}
