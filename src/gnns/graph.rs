//! GNNS index structure and construction.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::distance::DistanceMetric;
use crate::error::Result;
use crate::parallel::WorkerPool;
use crate::point::{PointId, PointSet};
#[cfg(feature = "lsh")]
use crate::seed::{LshParams, LshSeed};
use crate::seed::{ExactSeed, SeedGraph};

/// Where the k-NN routing graph comes from.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedSource {
    /// Brute-force k-NN rows.
    Exact,
    /// Euclidean LSH rows.
    #[cfg(feature = "lsh")]
    Lsh(LshParams),
    /// LSH with its default parameters when available, exact otherwise.
    #[default]
    Auto,
}

/// GNNS parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GnnsParams {
    /// Neighbors per node in the routing graph (k).
    pub graph_nn: usize,
    /// Neighbors inspected per greedy step (E).
    pub expansions: usize,
    /// Independent random restarts per query (R).
    pub restarts: usize,
    /// Neighbors returned by [`GraphSearch::search`](crate::GraphSearch).
    pub num_nn: usize,
    /// Fixed seed for the restart nodes. `None` draws from thread-local entropy.
    pub seed: Option<u64>,
    /// Routing graph source.
    pub seed_graph: SeedSource,
}

impl Default for GnnsParams {
    fn default() -> Self {
        Self {
            graph_nn: 50,
            expansions: 30,
            restarts: 1,
            num_nn: 1,
            seed: None,
            seed_graph: SeedSource::Auto,
        }
    }
}

impl GnnsParams {
    /// Small graph, few restarts.
    pub fn fast() -> Self {
        Self {
            graph_nn: 10,
            expansions: 10,
            restarts: 1,
            ..Self::default()
        }
    }

    /// Dense graph, many restarts.
    pub fn high_quality() -> Self {
        Self {
            graph_nn: 50,
            expansions: 30,
            restarts: 10,
            ..Self::default()
        }
    }
}

/// Randomized-walk index over a k-NN seed graph.
///
/// Immutable once built; queries take `&self` and may run concurrently.
#[derive(Debug)]
pub struct GnnsIndex<'a> {
    pub(super) points: &'a PointSet,
    pub(super) metric: DistanceMetric,
    pub(super) params: GnnsParams,
    /// Row `i` is `[i, nearest others...]`, `min(graph_nn, n - 1) + 1` long.
    pub(super) adjacency: Vec<Vec<PointId>>,
}

impl<'a> GnnsIndex<'a> {
    /// Build with the seed graph named in `params` on the default 4-worker pool.
    pub fn new(points: &'a PointSet, metric: DistanceMetric, params: GnnsParams) -> Result<Self> {
        Self::build(points, metric, params, WorkerPool::default())
    }

    /// Build with the seed graph named in `params` on `pool`.
    pub fn build(
        points: &'a PointSet,
        metric: DistanceMetric,
        params: GnnsParams,
        pool: WorkerPool,
    ) -> Result<Self> {
        match &params.seed_graph {
            SeedSource::Exact => {
                let seed = ExactSeed::new(points, metric);
                Self::with_seed_graph(points, metric, params, &seed, pool)
            }
            #[cfg(feature = "lsh")]
            SeedSource::Lsh(lsh) => {
                let seed = LshSeed::build(points, metric, lsh);
                Self::with_seed_graph(points, metric, params, &seed, pool)
            }
            #[cfg(feature = "lsh")]
            SeedSource::Auto => {
                let seed = LshSeed::build(points, metric, &LshParams::default());
                Self::with_seed_graph(points, metric, params, &seed, pool)
            }
            #[cfg(not(feature = "lsh"))]
            SeedSource::Auto => {
                let seed = ExactSeed::new(points, metric);
                Self::with_seed_graph(points, metric, params, &seed, pool)
            }
        }
    }

    /// Build from any seed graph.
    ///
    /// Rows are filled by the workers of `pool`, one contiguous slice each.
    pub fn with_seed_graph<S: SeedGraph + ?Sized>(
        points: &'a PointSet,
        metric: DistanceMetric,
        params: GnnsParams,
        seed: &S,
        pool: WorkerPool,
    ) -> Result<Self> {
        let started = Instant::now();
        let n = points.len();
        let graph_nn = params.graph_nn;

        tracing::info!(
            points = n,
            graph_nn,
            workers = pool.workers(),
            "building GNNS index"
        );

        let mut adjacency: Vec<Vec<PointId>> = vec![Vec::new(); n];
        pool.fork_join(&mut adjacency, |range, rows| {
            for (row, id) in rows.iter_mut().zip(range) {
                *row = seed_row(seed, id as PointId, graph_nn, n);
            }
        })?;

        tracing::info!(
            points = n,
            edges = adjacency.iter().map(|r| r.len().saturating_sub(1)).sum::<usize>(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "GNNS index built"
        );

        Ok(Self {
            points,
            metric,
            params,
            adjacency,
        })
    }

    /// Routing row of `id`: the point itself, then its neighbors ascending.
    pub fn neighbors(&self, id: PointId) -> Option<&[PointId]> {
        self.adjacency.get(id as usize).map(Vec::as_slice)
    }

    /// The indexed points.
    pub fn points(&self) -> &'a PointSet {
        self.points
    }

    pub fn params(&self) -> &GnnsParams {
        &self.params
    }

    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    pub fn num_points(&self) -> usize {
        self.points.len()
    }
}

/// `[id, up to graph_nn nearest others]`, normalizing whatever the seed returned.
///
/// A row never holds more than the `n` points of the set.
fn seed_row<S: SeedGraph + ?Sized>(seed: &S, id: PointId, graph_nn: usize, n: usize) -> Vec<PointId> {
    let wanted = graph_nn.saturating_add(1);
    let mut row = Vec::with_capacity(wanted.min(n));
    row.push(id);
    row.extend(
        seed.nearest(id, wanted)
            .into_iter()
            .filter(|n| n.id != id)
            .map(|n| n.id)
            .take(graph_nn),
    );
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset;
    use crate::neighbor::Neighbor;

    /// Seed that returns its rows with the point itself missing or misplaced.
    struct ShuffledSeed;

    impl SeedGraph for ShuffledSeed {
        fn nearest(&self, id: PointId, k: usize) -> Vec<Neighbor> {
            (0..k as u32)
                .map(|i| Neighbor::new((id + i + 1) % 10, i as f32))
                .collect()
        }
    }

    #[test]
    fn rows_start_with_self() {
        let points = dataset::uniform(100, 8, 1).unwrap();
        let params = GnnsParams {
            graph_nn: 10,
            seed_graph: SeedSource::Exact,
            ..GnnsParams::default()
        };
        let index = GnnsIndex::new(&points, DistanceMetric::L2, params).unwrap();

        for id in 0..100u32 {
            let row = index.neighbors(id).unwrap();
            assert_eq!(row.len(), 11);
            assert_eq!(row[0], id);
            assert!(!row[1..].contains(&id));
        }
    }

    #[test]
    fn seed_rows_are_normalized() {
        let row = seed_row(&ShuffledSeed, 3, 4, 10);
        assert_eq!(row[0], 3);
        assert_eq!(row.len(), 5);
        assert!(!row[1..].contains(&3));
    }

    #[test]
    fn rows_shrink_on_tiny_sets() {
        let points = PointSet::from_rows(vec![vec![0.0], vec![1.0], vec![3.0]]).unwrap();
        let params = GnnsParams {
            graph_nn: 10,
            seed_graph: SeedSource::Exact,
            ..GnnsParams::default()
        };
        let index = GnnsIndex::new(&points, DistanceMetric::L2, params).unwrap();
        assert_eq!(index.neighbors(0), Some(&[0, 1, 2][..]));
        assert_eq!(index.neighbors(2), Some(&[2, 1, 0][..]));
        assert!(index.neighbors(3).is_none());
    }

    #[test]
    fn huge_graph_nn_keeps_every_point() {
        let points = dataset::uniform(30, 3, 4).unwrap();
        for seed_graph in [SeedSource::Exact, SeedSource::Auto] {
            let params = GnnsParams {
                graph_nn: usize::MAX,
                seed_graph,
                ..GnnsParams::default()
            };
            let index = GnnsIndex::new(&points, DistanceMetric::L2, params).unwrap();
            for id in 0..30u32 {
                let row = index.neighbors(id).unwrap();
                assert_eq!(row.len(), 30);
                assert_eq!(row[0], id);
            }
        }
    }

    #[test]
    fn presets_are_ordered() {
        let fast = GnnsParams::fast();
        let hq = GnnsParams::high_quality();
        assert!(fast.graph_nn < hq.graph_nn);
        assert!(fast.restarts < hq.restarts);
    }
}
