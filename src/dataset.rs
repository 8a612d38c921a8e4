//! Synthetic point sets for tests and benchmarks.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::Result;
use crate::point::PointSet;

/// `n` points uniformly distributed in `[0, 1]^dimension`.
///
/// A baseline with no structure. Real data usually has clusters or lies on a
/// manifold, which graph indices exploit.
pub fn uniform(n: usize, dimension: usize, seed: u64) -> Result<PointSet> {
    let mut rng = StdRng::seed_from_u64(seed);
    let vectors: Vec<f32> = (0..n * dimension).map(|_| rng.random::<f32>()).collect();
    PointSet::from_flat(dimension, vectors)
}

/// `n` points sampled around `n_clusters` random centers with Gaussian noise,
/// clamped to `[0, 1]^dimension`.
pub fn clustered(
    n: usize,
    dimension: usize,
    n_clusters: usize,
    cluster_std: f32,
    seed: u64,
) -> Result<PointSet> {
    let mut rng = StdRng::seed_from_u64(seed);
    let n_clusters = n_clusters.max(1);

    let centers: Vec<Vec<f32>> = (0..n_clusters)
        .map(|_| (0..dimension).map(|_| rng.random::<f32>()).collect())
        .collect();

    let mut vectors = Vec::with_capacity(n * dimension);
    for _ in 0..n {
        let center = &centers[rng.random_range(0..n_clusters)];
        for &c in center {
            // Box-Muller for Gaussian
            let u1: f32 = rng.random::<f32>().max(f32::MIN_POSITIVE);
            let u2: f32 = rng.random();
            let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f32::consts::PI * u2).cos();
            vectors.push((c + z * cluster_std).clamp(0.0, 1.0));
        }
    }

    PointSet::from_flat(dimension, vectors)
}
