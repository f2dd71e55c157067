//! Vector comparator: similarity/distance kernels and ranked matching shared by
//! skill extraction, retrieval and ranking.

use std::cmp::Ordering;

use serde::Serialize;

/// Cosine similarity in `[-1.0, 1.0]`. Returns `0.0` for empty, zero-norm or
/// mismatched-length inputs.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        if a.len() != b.len() {
            tracing::warn!(
                a_len = a.len(),
                b_len = b.len(),
                "embedding dimension mismatch; returning zero similarity"
            );
        }
        return 0.0;
    }

    let mut dot = 0.0_f32;
    let mut norm_a = 0.0_f32;
    let mut norm_b = 0.0_f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < f32::EPSILON {
        return 0.0;
    }
    dot / denom
}

/// Squared Euclidean distance. Mismatched lengths compare as infinitely far.
pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return f32::INFINITY;
    }
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Index and score of the most similar reference vector. The first maximal
/// index wins ties, so identical inputs always give the same answer.
pub fn best_match(query: &[f32], references: &[Vec<f32>]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (i, reference) in references.iter().enumerate() {
        let score = cosine_similarity(query, reference);
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((i, score)),
        }
    }
    best
}

/// A reference vector found by nearest-neighbour search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Neighbor {
    pub index: usize,
    pub distance: f32,
}

/// Exact k-nearest-neighbour search under squared Euclidean distance.
///
/// Results are in non-decreasing distance order; equal distances keep
/// reference order.
pub fn nearest_neighbors(query: &[f32], references: &[Vec<f32>], k: usize) -> Vec<Neighbor> {
    if k == 0 {
        return Vec::new();
    }

    let mut neighbors: Vec<Neighbor> = references
        .iter()
        .enumerate()
        .map(|(index, reference)| Neighbor {
            index,
            distance: squared_l2(query, reference),
        })
        .filter(|n| n.distance.is_finite())
        .collect();

    neighbors.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap_or(Ordering::Equal));
    neighbors.truncate(k);
    neighbors
}

/// Indices of the `n` highest scores, descending. `sort_by` is stable, so ties
/// keep their original order.
pub fn top_n_indices(scores: &[f32], n: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(Ordering::Equal)
    });
    order.truncate(n);
    order
}
