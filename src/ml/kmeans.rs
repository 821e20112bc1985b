//! Batch k-means (Lloyd's algorithm) with k-means++ seeding.
//!
//! Runs `n_init` independently seeded restarts and keeps the one with the
//! lowest inertia (sum of squared distances to the assigned centroid).
//! An empty cluster keeps its previous centroid.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Clustering hyperparameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KMeansParams {
    pub k: usize,
    pub max_iter: usize,
    pub n_init: usize,
    /// Stop once the summed squared centroid shift falls to this value.
    pub tolerance: f64,
    pub seed: u64,
}

impl Default for KMeansParams {
    fn default() -> Self {
        Self {
            k: 3,
            max_iter: 300,
            n_init: 10,
            tolerance: 1e-4,
            seed: 42,
        }
    }
}

/// Result of a k-means fit.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansFit<const N: usize> {
    pub centroids: Vec<[f64; N]>,
    /// Cluster index per input point
    pub labels: Vec<usize>,
    pub inertia: f64,
}

/// Squared Euclidean distance.
fn sq_dist<const N: usize>(a: &[f64; N], b: &[f64; N]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Index of the nearest centroid (lowest index on ties) and its distance.
fn nearest<const N: usize>(point: &[f64; N], centroids: &[[f64; N]]) -> (usize, f64) {
    let mut best_k = 0usize;
    let mut best_dist = f64::MAX;
    for (i, centroid) in centroids.iter().enumerate() {
        let dist = sq_dist(point, centroid);
        if dist < best_dist {
            best_dist = dist;
            best_k = i;
        }
    }
    (best_k, best_dist)
}

/// Cluster `points` into `min(k, points.len())` groups.
///
/// Returns `None` for an empty input or `k == 0`.
pub fn fit<const N: usize>(points: &[[f64; N]], params: &KMeansParams) -> Option<KMeansFit<N>> {
    let k = params.k.min(points.len());
    if k == 0 {
        return None;
    }

    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut best: Option<KMeansFit<N>> = None;

    for _ in 0..params.n_init.max(1) {
        let seeds = plus_plus_init(points, k, &mut rng);
        let run = lloyd(points, seeds, params);
        if best.as_ref().map_or(true, |b| run.inertia < b.inertia) {
            best = Some(run);
        }
    }

    best
}

/// k-means++: first centre uniform, each further centre drawn with
/// probability proportional to its squared distance from the nearest centre.
fn plus_plus_init<const N: usize>(points: &[[f64; N]], k: usize, rng: &mut StdRng) -> Vec<[f64; N]> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.gen_range(0..points.len())]);

    let mut dist: Vec<f64> = points.iter().map(|p| sq_dist(p, &centroids[0])).collect();

    while centroids.len() < k {
        let total: f64 = dist.iter().sum();
        let chosen = if total > 0.0 {
            let mut target = rng.gen::<f64>() * total;
            let mut pick = points.len() - 1;
            for (i, d) in dist.iter().enumerate() {
                if target < *d {
                    pick = i;
                    break;
                }
                target -= d;
            }
            pick
        } else {
            // Every point coincides with a centre already
            rng.gen_range(0..points.len())
        };

        let centre = points[chosen];
        for (d, p) in dist.iter_mut().zip(points.iter()) {
            *d = d.min(sq_dist(p, &centre));
        }
        centroids.push(centre);
    }

    centroids
}

fn lloyd<const N: usize>(points: &[[f64; N]], mut centroids: Vec<[f64; N]>, params: &KMeansParams) -> KMeansFit<N> {
    let k = centroids.len();
    let mut labels = vec![0usize; points.len()];

    for _ in 0..params.max_iter.max(1) {
        for (label, p) in labels.iter_mut().zip(points.iter()) {
            *label = nearest(p, &centroids).0;
        }

        let mut sums = vec![[0.0; N]; k];
        let mut counts = vec![0usize; k];
        for (label, p) in labels.iter().zip(points.iter()) {
            counts[*label] += 1;
            for d in 0..N {
                sums[*label][d] += p[d];
            }
        }

        let mut shift = 0.0;
        for c in 0..k {
            if counts[c] == 0 {
                continue;
            }
            let mut updated = [0.0; N];
            for d in 0..N {
                updated[d] = sums[c][d] / counts[c] as f64;
            }
            shift += sq_dist(&updated, &centroids[c]);
            centroids[c] = updated;
        }

        if shift <= params.tolerance {
            break;
        }
    }

    // Final assignment against the settled centroids
    let mut inertia = 0.0;
    for (label, p) in labels.iter_mut().zip(points.iter()) {
        let (c, d) = nearest(p, &centroids);
        *label = c;
        inertia += d;
    }

    KMeansFit { centroids, labels, inertia }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blobs() -> Vec<[f64; 2]> {
        vec![
            [0.0, 0.0], [0.1, 0.2], [0.2, 0.1],
            [10.0, 10.0], [10.1, 9.9], [9.9, 10.2],
            [-10.0, 5.0], [-10.2, 5.1], [-9.8, 4.9],
        ]
    }

    #[test]
    fn test_empty_or_zero_k() {
        assert!(fit::<2>(&[], &KMeansParams::default()).is_none());
        let params = KMeansParams { k: 0, ..KMeansParams::default() };
        assert!(fit(&blobs(), &params).is_none());
    }

    #[test]
    fn test_separates_obvious_blobs() {
        let result = fit(&blobs(), &KMeansParams::default()).unwrap();
        assert_eq!(result.centroids.len(), 3);

        let l = &result.labels;
        assert!(l[0] == l[1] && l[1] == l[2]);
        assert!(l[3] == l[4] && l[4] == l[5]);
        assert!(l[6] == l[7] && l[7] == l[8]);
        assert!(l[0] != l[3] && l[3] != l[6] && l[0] != l[6]);
        assert!(result.inertia < 1.0);
    }

    #[test]
    fn test_k_capped_by_point_count() {
        let params = KMeansParams { k: 5, ..KMeansParams::default() };
        let result = fit(&[[1.0], [2.0]], &params).unwrap();
        assert_eq!(result.centroids.len(), 2);
        assert_ne!(result.labels[0], result.labels[1]);
        assert_eq!(result.inertia, 0.0);
    }

    #[test]
    fn test_duplicate_points() {
        let points = [[3.0, 3.0]; 4];
        let result = fit(&points, &KMeansParams::default()).unwrap();
        assert_eq!(result.labels.len(), 4);
        assert_eq!(result.inertia, 0.0);
    }

    #[test]
    fn test_deterministic_for_seed() {
        let a = fit(&blobs(), &KMeansParams::default()).unwrap();
        let b = fit(&blobs(), &KMeansParams::default()).unwrap();
        assert_eq!(a, b);
    }
}
