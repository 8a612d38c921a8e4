//! Seed k-NN graphs for the randomized-walk index.
//!
//! GNNS does not construct its routing graph itself. It asks a [`SeedGraph`]
//! for the `k` nearest neighbors of every point and walks the result. Any
//! approximate k-NN source works; two are provided:
//!
//! - [`ExactSeed`]: brute-force ranking. Deterministic, O(n²) to build a full graph.
//! - [`LshSeed`] (feature `lsh`): Euclidean locality sensitive hashing, ranking only
//!   the points that share a bucket with the query point.

#[cfg(feature = "lsh")]
mod lsh;

#[cfg(feature = "lsh")]
pub use lsh::{LshParams, LshSeed};

use crate::brute_force;
use crate::distance::DistanceMetric;
use crate::neighbor::Neighbor;
use crate::point::{PointId, PointSet};

/// Source of approximate nearest neighbors for points of the indexed set.
///
/// Implementations are queried concurrently by the build workers.
pub trait SeedGraph: Sync {
    /// Up to `k` neighbors of point `id`, ascending by distance, with `id`
    /// itself included at distance 0.
    fn nearest(&self, id: PointId, k: usize) -> Vec<Neighbor>;
}

/// Exact seed graph: every row is a brute-force ranking.
#[derive(Debug, Clone, Copy)]
pub struct ExactSeed<'a> {
    points: &'a PointSet,
    metric: DistanceMetric,
}

impl<'a> ExactSeed<'a> {
    pub fn new(points: &'a PointSet, metric: DistanceMetric) -> Self {
        Self { points, metric }
    }
}

impl SeedGraph for ExactSeed<'_> {
    fn nearest(&self, id: PointId, k: usize) -> Vec<Neighbor> {
        brute_force::knn(self.points, self.points.vector(id), k, self.metric)
    }
}
