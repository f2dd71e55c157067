//! Seeded k-means (k-means++ seeding, Lloyd iterations, best of `n_init` runs).
//!
//! The RNG is seeded from the config, so identical points and config always
//! produce identical labels.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone)]
pub struct KMeansConfig {
    pub k: usize,
    pub seed: u64,
    pub n_init: usize,
    pub max_iter: usize,
    /// Stop once the total squared centroid shift falls to this value.
    pub tolerance: f64,
}

impl KMeansConfig {
    pub fn new(k: usize, seed: u64) -> Self {
        Self {
            k,
            seed,
            n_init: 10,
            max_iter: 300,
            tolerance: 1e-8,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KMeansResult {
    /// Cluster id per point, in `[0, k)`.
    pub labels: Vec<usize>,
    pub centroids: Vec<Vec<f64>>,
    /// Sum of squared distances of points to their centroid.
    pub inertia: f64,
    /// Effective k after clamping to the number of points.
    pub k: usize,
}

/// Partitions `points` into `min(config.k, points.len())` clusters (at least
/// one when there are points).
pub fn fit(points: &[Vec<f64>], config: &KMeansConfig) -> KMeansResult {
    let n = points.len();
    if n == 0 {
        return KMeansResult {
            labels: Vec::new(),
            centroids: Vec::new(),
            inertia: 0.0,
            k: 0,
        };
    }

    let k = config.k.clamp(1, n);
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut best: Option<KMeansResult> = None;

    for _ in 0..config.n_init.max(1) {
        let seeds = plus_plus_init(points, k, &mut rng);
        let run = lloyd(points, seeds, config);
        let better = match &best {
            Some(current) => run.inertia < current.inertia,
            None => true,
        };
        if better {
            best = Some(run);
        }
    }

    // n_init >= 1 and n > 0, so at least one run happened.
    best.unwrap_or_else(|| KMeansResult {
        labels: vec![0; n],
        centroids: vec![points[0].clone()],
        inertia: 0.0,
        k: 1,
    })
}

/// k-means++ seeding: each further centroid is drawn with probability
/// proportional to its squared distance from the nearest chosen one.
fn plus_plus_init(points: &[Vec<f64>], k: usize, rng: &mut StdRng) -> Vec<Vec<f64>> {
    let n = points.len();
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.gen_range(0..n)].clone());

    let mut closest: Vec<f64> = points
        .iter()
        .map(|p| squared_distance(p, &centroids[0]))
        .collect();

    while centroids.len() < k {
        let total: f64 = closest.iter().sum();
        let pick = if total <= 0.0 {
            // every point coincides with a centroid already
            rng.gen_range(0..n)
        } else {
            let target = rng.gen::<f64>() * total;
            let mut cumulative = 0.0;
            let mut chosen = None;
            for (i, &d) in closest.iter().enumerate() {
                cumulative += d;
                if d > 0.0 && cumulative > target {
                    chosen = Some(i);
                    break;
                }
            }
            chosen
                .or_else(|| closest.iter().rposition(|&d| d > 0.0))
                .unwrap_or(0)
        };

        let centroid = points[pick].clone();
        for (d, p) in closest.iter_mut().zip(points) {
            *d = d.min(squared_distance(p, &centroid));
        }
        centroids.push(centroid);
    }

    centroids
}

fn lloyd(points: &[Vec<f64>], mut centroids: Vec<Vec<f64>>, config: &KMeansConfig) -> KMeansResult {
    let k = centroids.len();
    let dim = points[0].len();
    let mut labels = assign(points, &centroids);

    for _ in 0..config.max_iter {
        let mut sums = vec![vec![0.0; dim]; k];
        let mut counts = vec![0_usize; k];
        for (p, &label) in points.iter().zip(&labels) {
            counts[label] += 1;
            for (s, v) in sums[label].iter_mut().zip(p) {
                *s += v;
            }
        }

        let mut next = centroids.clone();
        for c in 0..k {
            if counts[c] > 0 {
                next[c] = sums[c].iter().map(|s| s / counts[c] as f64).collect();
            }
        }
        relocate_empty(points, &labels, &counts, &mut next);

        let shift: f64 = centroids
            .iter()
            .zip(&next)
            .map(|(a, b)| squared_distance(a, b))
            .sum();
        centroids = next;

        let relabelled = assign(points, &centroids);
        let unchanged = relabelled == labels;
        labels = relabelled;
        if unchanged || shift <= config.tolerance {
            break;
        }
    }

    let inertia = points
        .iter()
        .zip(&labels)
        .map(|(p, &l)| squared_distance(p, &centroids[l]))
        .sum();

    KMeansResult {
        labels,
        centroids,
        inertia,
        k,
    }
}

/// Moves each empty cluster's centroid onto the point farthest from its own
/// centroid, taking points from clusters with more than one member.
fn relocate_empty(
    points: &[Vec<f64>],
    labels: &[usize],
    counts: &[usize],
    centroids: &mut [Vec<f64>],
) {
    let mut counts = counts.to_vec();
    for c in 0..centroids.len() {
        if counts[c] > 0 {
            continue;
        }
        let farthest = points
            .iter()
            .zip(labels)
            .enumerate()
            .filter(|(_, (_, &l))| counts[l] > 1)
            .map(|(i, (p, &l))| (i, squared_distance(p, &centroids[l])))
            .filter(|(_, d)| *d > 0.0)
            .fold(None, |best: Option<(usize, f64)>, (i, d)| match best {
                Some((_, bd)) if d <= bd => best,
                _ => Some((i, d)),
            });

        if let Some((i, _)) = farthest {
            counts[labels[i]] -= 1;
            counts[c] += 1;
            centroids[c] = points[i].clone();
        }
    }
}

/// Nearest centroid per point; the lowest cluster id wins ties.
fn assign(points: &[Vec<f64>], centroids: &[Vec<f64>]) -> Vec<usize> {
    points
        .iter()
        .map(|p| {
            let mut best = 0;
            let mut best_d = f64::INFINITY;
            for (c, centroid) in centroids.iter().enumerate() {
                let d = squared_distance(p, centroid);
                if d < best_d {
                    best = c;
                    best_d = d;
                }
            }
            best
        })
        .collect()
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}
