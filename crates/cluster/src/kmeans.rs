//! K-means clustering over standardized score points.
//!
//! # Algorithm
//!
//! 1. Seed k centroids with k-means++ (D² weighted sampling)
//! 2. Assign each point to its nearest centroid (Euclidean distance)
//! 3. Recompute centroids as the mean of assigned points
//! 4. Repeat until assignments stop changing, centroid shift drops to the
//!    tolerance, or the iteration cap is reached
//!
//! The whole procedure runs `restarts` times and the lowest-inertia
//! solution is kept. Label order is whatever the winning run produced.

use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, trace};

use crate::config::ClusterConfig;
use crate::error::{ClusterError, Result};

/// A point in standardized (math, reading) space.
pub type Point = [f64; 2];

/// Outcome of a k-means fit.
#[derive(Debug, Clone)]
pub struct KMeansFit {
    /// Final centroids, indexed by label
    pub centroids: Vec<Point>,

    /// Label per input point, in input order
    pub labels: Vec<usize>,

    /// Within-cluster sum of squared distances
    pub inertia: f64,

    /// Iterations used by the winning restart
    pub iterations: usize,

    /// Whether the winning restart converged before the cap
    pub converged: bool,
}

/// Fit k-means with restarts and return the lowest-inertia solution.
///
/// # Errors
///
/// - `InvalidConfig` if the configuration does not validate
/// - `InsufficientData` if there are fewer points than `config.k`
pub fn fit(points: &[Point], config: &ClusterConfig, rng: &mut StdRng) -> Result<KMeansFit> {
    config.validate()?;
    if points.len() < config.k {
        return Err(ClusterError::InsufficientData {
            required: config.k,
            actual: points.len(),
        });
    }

    let mut best: Option<KMeansFit> = None;
    for restart in 0..config.restarts {
        let run = lloyd(points, config, rng);
        trace!(
            restart,
            inertia = run.inertia,
            iterations = run.iterations,
            converged = run.converged,
            "k-means restart finished"
        );
        if best.as_ref().map_or(true, |b| run.inertia < b.inertia) {
            best = Some(run);
        }
    }

    let best = best.ok_or_else(|| ClusterError::config("restarts must be > 0"))?;
    debug!(
        k = config.k,
        n = points.len(),
        restarts = config.restarts,
        inertia = best.inertia,
        "k-means fit complete"
    );
    Ok(best)
}

/// Index of the centroid nearest to `point`. Ties go to the lower index.
pub fn nearest(point: &Point, centroids: &[Point]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (j, centroid) in centroids.iter().enumerate() {
        let dist = distance_squared(point, centroid);
        if dist < best_dist {
            best_dist = dist;
            best = j;
        }
    }
    best
}

/// Squared Euclidean distance.
#[inline]
pub fn distance_squared(a: &Point, b: &Point) -> f64 {
    (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)
}

/// One full Lloyd run from a fresh k-means++ seeding.
fn lloyd(points: &[Point], config: &ClusterConfig, rng: &mut StdRng) -> KMeansFit {
    let mut centroids = kmeans_plus_plus(points, config.k, rng);
    let mut labels = vec![0usize; points.len()];
    assign_labels(points, &centroids, &mut labels);

    let mut iterations = 0;
    let mut converged = false;
    while iterations < config.max_iterations {
        iterations += 1;

        let updated = recompute_centroids(points, &labels, &centroids);
        let shift = centroids
            .iter()
            .zip(updated.iter())
            .map(|(old, new)| distance_squared(old, new))
            .fold(0.0f64, f64::max);
        centroids = updated;

        let changed = assign_labels(points, &centroids, &mut labels);
        if !changed || shift <= config.tolerance {
            converged = true;
            break;
        }
    }

    let inertia = inertia(points, &labels, &centroids);
    KMeansFit {
        centroids,
        labels,
        inertia,
        iterations,
        converged,
    }
}

/// k-means++ seeding: first centroid uniform, the rest sampled with
/// probability proportional to squared distance from the nearest chosen one.
fn kmeans_plus_plus(points: &[Point], k: usize, rng: &mut StdRng) -> Vec<Point> {
    let n = points.len();
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.gen_range(0..n)]);

    let mut min_distances: Vec<f64> = points
        .iter()
        .map(|p| distance_squared(p, &centroids[0]))
        .collect();

    while centroids.len() < k {
        let total: f64 = min_distances.iter().sum();
        let next = if total > 0.0 {
            let target = rng.gen::<f64>() * total;
            let mut cumulative = 0.0;
            let mut chosen = None;
            for (i, &d) in min_distances.iter().enumerate() {
                cumulative += d;
                if d > 0.0 && cumulative >= target {
                    chosen = Some(i);
                    break;
                }
            }
            // Rounding can leave the target just past the final sum.
            chosen.unwrap_or_else(|| {
                min_distances
                    .iter()
                    .rposition(|&d| d > 0.0)
                    .unwrap_or(n - 1)
            })
        } else {
            // Every point coincides with a chosen centroid.
            rng.gen_range(0..n)
        };

        let centroid = points[next];
        for (i, p) in points.iter().enumerate() {
            let d = distance_squared(p, &centroid);
            if d < min_distances[i] {
                min_distances[i] = d;
            }
        }
        centroids.push(centroid);
    }

    centroids
}

/// Assign each point to its nearest centroid. Returns whether any label changed.
fn assign_labels(points: &[Point], centroids: &[Point], labels: &mut [usize]) -> bool {
    let mut changed = false;
    for (point, label) in points.iter().zip(labels.iter_mut()) {
        let best = nearest(point, centroids);
        if *label != best {
            *label = best;
            changed = true;
        }
    }
    changed
}

/// Mean of assigned points per cluster.
///
/// A cluster left empty is moved onto the point farthest from its current
/// centroid, so every label stays in use whenever the data allows it.
fn recompute_centroids(points: &[Point], labels: &[usize], previous: &[Point]) -> Vec<Point> {
    let k = previous.len();
    let mut sums = vec![[0.0f64; 2]; k];
    let mut counts = vec![0usize; k];

    for (point, &label) in points.iter().zip(labels.iter()) {
        counts[label] += 1;
        sums[label][0] += point[0];
        sums[label][1] += point[1];
    }

    let mut centroids: Vec<Point> = sums
        .iter()
        .zip(counts.iter())
        .zip(previous.iter())
        .map(|((sum, &count), prev)| {
            if count > 0 {
                [sum[0] / count as f64, sum[1] / count as f64]
            } else {
                *prev
            }
        })
        .collect();

    let empty: Vec<usize> = (0..k).filter(|&j| counts[j] == 0).collect();
    if !empty.is_empty() {
        let mut by_distance: Vec<(usize, f64)> = points
            .iter()
            .zip(labels.iter())
            .enumerate()
            .map(|(i, (p, &label))| (i, distance_squared(p, &previous[label])))
            .collect();
        by_distance.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        for (j, (i, _)) in empty.into_iter().zip(by_distance) {
            trace!(cluster = j, point = i, "relocating empty cluster");
            centroids[j] = points[i];
        }
    }

    centroids
}

fn inertia(points: &[Point], labels: &[usize], centroids: &[Point]) -> f64 {
    points
        .iter()
        .zip(labels.iter())
        .map(|(p, &label)| distance_squared(p, &centroids[label]))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn blobs() -> Vec<Point> {
        vec![
            [-5.0, -5.0],
            [-5.1, -4.9],
            [-4.9, -5.2],
            [0.0, 0.1],
            [0.1, -0.1],
            [-0.1, 0.0],
            [5.0, 5.1],
            [5.2, 4.9],
            [4.9, 5.0],
        ]
    }

    #[test]
    fn test_separated_blobs_are_grouped() {
        let points = blobs();
        let mut rng = StdRng::seed_from_u64(11);
        let fit = fit(&points, &ClusterConfig::default(), &mut rng).unwrap();

        for group in 0..3 {
            let base = group * 3;
            assert_eq!(fit.labels[base], fit.labels[base + 1]);
            assert_eq!(fit.labels[base], fit.labels[base + 2]);
        }
        assert_ne!(fit.labels[0], fit.labels[3]);
        assert_ne!(fit.labels[3], fit.labels[6]);
        assert_ne!(fit.labels[0], fit.labels[6]);
        assert!(fit.converged);
        assert!(fit.inertia < 1.0);
    }

    #[test]
    fn test_fit_rejects_too_few_points() {
        let points = vec![[0.0, 0.0], [1.0, 1.0]];
        let mut rng = StdRng::seed_from_u64(1);
        let err = fit(&points, &ClusterConfig::default(), &mut rng).unwrap_err();
        assert_eq!(err, ClusterError::InsufficientData { required: 3, actual: 2 });
    }

    #[test]
    fn test_same_seed_same_fit() {
        let points = blobs();
        let a = fit(&points, &ClusterConfig::default(), &mut StdRng::seed_from_u64(3)).unwrap();
        let b = fit(&points, &ClusterConfig::default(), &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(a.labels, b.labels);
        assert_eq!(a.centroids, b.centroids);
    }

    #[test]
    fn test_more_restarts_never_worse() {
        let points: Vec<Point> = (0..30)
            .map(|i| {
                let x = (i as f64 * 0.37).sin() * 3.0;
                let y = (i as f64 * 0.91).cos() * 3.0;
                [x, y]
            })
            .collect();
        let single = ClusterConfig::default().with_restarts(1);
        let many = ClusterConfig::default().with_restarts(10);

        // Both draw their first restart from the same stream.
        let one = fit(&points, &single, &mut StdRng::seed_from_u64(5)).unwrap();
        let best = fit(&points, &many, &mut StdRng::seed_from_u64(5)).unwrap();
        assert!(best.inertia <= one.inertia + 1e-12);
    }

    #[test]
    fn test_identical_points_stay_in_range() {
        let points = vec![[1.0, 1.0]; 5];
        let mut rng = StdRng::seed_from_u64(9);
        let fit = fit(&points, &ClusterConfig::default(), &mut rng).unwrap();
        assert!(fit.labels.iter().all(|&l| l < 3));
        assert_eq!(fit.inertia, 0.0);
    }

    #[test]
    fn test_empty_cluster_is_relocated() {
        let points = vec![[0.0, 0.0], [0.0, 0.1], [10.0, 10.0]];
        let labels = vec![0, 0, 0];
        let previous = vec![[0.0, 0.0], [50.0, 50.0], [60.0, 60.0]];
        let centroids = recompute_centroids(&points, &labels, &previous);
        assert_eq!(centroids[1], [10.0, 10.0]);
    }

    #[test]
    fn test_nearest_prefers_lower_index_on_tie() {
        let centroids = vec![[1.0, 0.0], [-1.0, 0.0]];
        assert_eq!(nearest(&[0.0, 0.0], &centroids), 0);
        assert_eq!(nearest(&[-0.9, 0.0], &centroids), 1);
    }
}
