//! MRNG index structure and construction.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::brute_force;
use crate::distance::DistanceMetric;
use crate::error::Result;
use crate::neighbor::Neighbor;
use crate::parallel::WorkerPool;
use crate::point::{PointId, PointSet};

/// MRNG parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MrngParams {
    /// Neighbors returned by [`GraphSearch::search`](crate::GraphSearch).
    pub num_nn: usize,
    /// Candidate budget (L): nodes admitted before best-first search stops.
    /// Must be at least `num_nn` for full-length results.
    pub candidates: usize,
}

impl Default for MrngParams {
    fn default() -> Self {
        Self {
            num_nn: 1,
            candidates: 20,
        }
    }
}

impl MrngParams {
    /// Small candidate budget.
    pub fn fast() -> Self {
        Self {
            candidates: 10,
            ..Self::default()
        }
    }

    /// Large candidate budget.
    pub fn high_quality() -> Self {
        Self {
            candidates: 100,
            ..Self::default()
        }
    }
}

/// Monotonic relative neighborhood graph over a borrowed point set.
///
/// Immutable once built; queries take `&self` and may run concurrently.
#[derive(Debug)]
pub struct MrngIndex<'a> {
    pub(super) points: &'a PointSet,
    pub(super) metric: DistanceMetric,
    pub(super) params: MrngParams,
    /// Variable-length rows, each in admission order (ascending distance).
    pub(super) graph: Vec<SmallVec<[PointId; 16]>>,
    pub(super) navigation: PointId,
    pub(super) centroid: Vec<f32>,
}

impl<'a> MrngIndex<'a> {
    /// Build on the default 4-worker pool.
    pub fn new(points: &'a PointSet, metric: DistanceMetric, params: MrngParams) -> Result<Self> {
        Self::build(points, metric, params, WorkerPool::default())
    }

    /// Build on `pool`: each worker ranks and prunes its slice of points and
    /// sums its slice's coordinates for the centroid.
    pub fn build(
        points: &'a PointSet,
        metric: DistanceMetric,
        params: MrngParams,
        pool: WorkerPool,
    ) -> Result<Self> {
        let started = Instant::now();
        let n = points.len();

        tracing::info!(points = n, workers = pool.workers(), "building MRNG index");

        let mut graph: Vec<SmallVec<[PointId; 16]>> = vec![SmallVec::new(); n];
        let partial_sums = pool.fork_join(&mut graph, |range, rows| {
            for (row, id) in rows.iter_mut().zip(range.clone()) {
                *row = monotonic_row(points, id as PointId, metric);
            }
            points.partial_sum(range)
        })?;

        let centroid = merge_centroid(&partial_sums, points.dimension(), n);
        tracing::debug!(dimension = centroid.len(), "centroid computed");

        let navigation = brute_force::knn(points, &centroid, 1, metric)
            .first()
            .map_or(0, |nearest| nearest.id);
        tracing::debug!(navigation, "navigation node selected");

        let index = Self {
            points,
            metric,
            params,
            graph,
            navigation,
            centroid,
        };

        tracing::info!(
            points = n,
            edges = index.num_edges(),
            avg_degree = index.average_degree(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "MRNG index built"
        );

        Ok(index)
    }

    /// Entry point of every search: the point nearest the centroid.
    pub fn navigation_node(&self) -> PointId {
        self.navigation
    }

    /// Per-dimension mean of the indexed points.
    pub fn centroid(&self) -> &[f32] {
        &self.centroid
    }

    /// Out-neighbors of `id`, in admission order.
    pub fn neighbors(&self, id: PointId) -> Option<&[PointId]> {
        self.graph.get(id as usize).map(|row| row.as_slice())
    }

    pub fn num_edges(&self) -> usize {
        self.graph.iter().map(|row| row.len()).sum()
    }

    pub fn average_degree(&self) -> f64 {
        if self.graph.is_empty() {
            return 0.0;
        }
        self.num_edges() as f64 / self.graph.len() as f64
    }

    /// The indexed points.
    pub fn points(&self) -> &'a PointSet {
        self.points
    }

    pub fn params(&self) -> &MrngParams {
        &self.params
    }

    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    pub fn num_points(&self) -> usize {
        self.points.len()
    }
}

/// Sum the per-partition coordinate sums and divide by `n`.
fn merge_centroid(partial_sums: &[Vec<f64>], dimension: usize, n: usize) -> Vec<f32> {
    let mut total = vec![0.0f64; dimension];
    for sum in partial_sums {
        for (acc, &x) in total.iter_mut().zip(sum) {
            *acc += x;
        }
    }
    total.iter().map(|&s| (s / n as f64) as f32).collect()
}

/// Full ranking of the other points, then monotonic selection.
fn monotonic_row(points: &PointSet, id: PointId, metric: DistanceMetric) -> SmallVec<[PointId; 16]> {
    let ranked = brute_force::knn_excluding(points, id, metric);
    select_monotonic(&ranked, |a, b| {
        metric.distance(points.vector(a), points.vector(b))
    })
    .into_iter()
    .collect()
}

/// MRNG edge selection for one point p.
///
/// `ranked` holds every candidate with its distance to p, ascending.
/// `distance_fn` measures the distance between two candidates.
///
/// All candidates tied for the minimum distance are admitted. Each remaining
/// candidate r is admitted unless some already-admitted t has
/// `d(p,r) > d(r,t)` and `d(p,r) > d(p,t)`.
pub fn select_monotonic<F>(ranked: &[Neighbor], distance_fn: F) -> Vec<PointId>
where
    F: Fn(PointId, PointId) -> f32,
{
    let Some(nearest) = ranked.first() else {
        return Vec::new();
    };

    let tied = ranked
        .iter()
        .take_while(|c| c.distance <= nearest.distance)
        .count();
    let mut admitted: Vec<Neighbor> = ranked[..tied].to_vec();

    for &r in &ranked[tied..] {
        let occluded = admitted.iter().any(|t| {
            r.distance > t.distance && r.distance > distance_fn(r.id, t.id)
        });
        if !occluded {
            admitted.push(r);
        }
    }

    admitted.into_iter().map(|n| n.id).collect()
}
