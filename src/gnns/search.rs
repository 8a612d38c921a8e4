//! GNNS query: randomized restarts of a bounded greedy walk.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::graph::GnnsIndex;
use super::MAX_GREEDY_STEPS;
use crate::neighbor::{Neighbor, NeighborList};
use crate::point::PointId;

impl GnnsIndex<'_> {
    /// Approximate `k` nearest neighbors of `query`, ascending by distance.
    ///
    /// Restart nodes come from `params.seed` when it is set, so repeated
    /// queries are reproducible; otherwise from thread-local entropy.
    ///
    /// Fewer than `k` results is a valid outcome when the walks saw fewer
    /// distinct points. `restarts == 0` or `expansions == 0` yield nothing.
    pub fn approximate_knn(&self, query: &[f32], k: usize) -> Vec<Neighbor> {
        match self.params.seed {
            Some(seed) => self.search_with_rng(query, k, &mut StdRng::seed_from_u64(seed)),
            None => self.search_with_rng(query, k, &mut rand::rng()),
        }
    }

    /// [`approximate_knn`](Self::approximate_knn) drawing restart nodes from `rng`.
    pub fn search_with_rng<R: Rng + ?Sized>(
        &self,
        query: &[f32],
        k: usize,
        rng: &mut R,
    ) -> Vec<Neighbor> {
        let n = self.adjacency.len();
        let expansions = self.params.expansions;
        let capacity = self.params.restarts.saturating_mul(expansions).min(n);
        let mut found = NeighborList::with_capacity(capacity);

        for _ in 0..self.params.restarts {
            let mut current = rng.random_range(0..n) as PointId;

            for _ in 0..MAX_GREEDY_STEPS {
                let mut step_best: Option<Neighbor> = None;

                // Entry 0 is the node itself.
                for &id in self.adjacency[current as usize].iter().skip(1).take(expansions) {
                    let candidate = Neighbor::new(id, self.metric.distance(query, self.points.vector(id)));
                    found.insert(candidate);
                    if step_best.map_or(true, |best| candidate.distance < best.distance) {
                        step_best = Some(candidate);
                    }
                }

                // Dead end.
                let Some(step_best) = step_best else {
                    break;
                };

                // Local optimum: this step did not produce the best point seen so far.
                if found.len() > 1
                    && found
                        .first()
                        .is_some_and(|best| step_best.distance > best.distance)
                {
                    break;
                }

                current = step_best.id;
            }
        }

        found.into_truncated(k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset;
    use crate::distance::DistanceMetric;
    use crate::gnns::{GnnsParams, SeedSource};
    use crate::point::PointSet;
    use crate::WorkerPool;

    fn params(expansions: usize, restarts: usize) -> GnnsParams {
        GnnsParams {
            graph_nn: 10,
            expansions,
            restarts,
            num_nn: 5,
            seed: Some(7),
            seed_graph: SeedSource::Exact,
        }
    }

    #[test]
    fn returns_k_ascending_distinct_results() {
        let points = dataset::uniform(100, 8, 42).unwrap();
        let index = GnnsIndex::new(&points, DistanceMetric::L2, params(5, 3)).unwrap();
        let query = dataset::uniform(1, 8, 1000).unwrap();

        let results = index.approximate_knn(query.vector(0), 5);
        assert_eq!(results.len(), 5);
        for pair in results.windows(2) {
            assert!(pair[0].distance < pair[1].distance);
        }
        assert!(results.iter().all(|n| n.distance >= 0.0));
    }

    #[test]
    fn seeded_queries_are_reproducible() {
        let points = dataset::uniform(300, 8, 3).unwrap();
        let index = GnnsIndex::new(&points, DistanceMetric::L2, params(5, 4)).unwrap();
        let q = points.vector(17);
        assert_eq!(index.approximate_knn(q, 5), index.approximate_knn(q, 5));
    }

    #[test]
    fn degenerate_parameters_give_empty_results() {
        let points = dataset::uniform(50, 4, 9).unwrap();

        let no_restarts = GnnsIndex::new(&points, DistanceMetric::L2, params(5, 0)).unwrap();
        assert!(no_restarts.approximate_knn(points.vector(0), 5).is_empty());

        let no_expansions = GnnsIndex::new(&points, DistanceMetric::L2, params(0, 3)).unwrap();
        assert!(no_expansions.approximate_knn(points.vector(0), 5).is_empty());
    }

    #[test]
    fn single_point_set_is_a_dead_end() {
        let points = PointSet::from_rows(vec![vec![1.0, 1.0]]).unwrap();
        let index = GnnsIndex::new(&points, DistanceMetric::L2, params(5, 3)).unwrap();
        assert!(index.approximate_knn(&[0.0, 0.0], 3).is_empty());
    }

    #[test]
    fn walk_descends_a_line() {
        // Points on a line; each row holds the two nearest others.
        let rows: Vec<Vec<f32>> = (0..20).map(|i| vec![i as f32]).collect();
        let points = PointSet::from_rows(rows).unwrap();
        let p = GnnsParams {
            graph_nn: 2,
            expansions: 2,
            restarts: 1,
            ..params(2, 1)
        };
        let index =
            GnnsIndex::build(&points, DistanceMetric::L2, p, WorkerPool::new(2)).unwrap();

        let mut rng = StdRng::seed_from_u64(11);
        let results = index.search_with_rng(&[0.0], 1, &mut rng);
        // 30 steps are enough to walk the whole line from any start.
        assert_eq!(results[0].id, 0);
        assert_eq!(results[0].distance, 0.0);
    }

    #[test]
    fn huge_expansions_read_whole_rows() {
        let points = dataset::uniform(50, 4, 6).unwrap();
        let index = GnnsIndex::new(&points, DistanceMetric::L2, params(usize::MAX / 2, 3)).unwrap();
        let results = index.approximate_knn(points.vector(9), 5);
        assert_eq!(results.len(), 5);

        let index = GnnsIndex::new(&points, DistanceMetric::L2, params(usize::MAX, 4)).unwrap();
        assert!(index.approximate_knn(points.vector(9), usize::MAX).len() <= points.len());
    }

    #[test]
    fn never_returns_more_than_the_pool() {
        let points = dataset::uniform(40, 4, 5).unwrap();
        let index = GnnsIndex::new(&points, DistanceMetric::L2, params(3, 1)).unwrap();
        let results = index.approximate_knn(points.vector(3), 1000);
        assert!(results.len() <= 3 * MAX_GREEDY_STEPS);
        assert!(results.len() <= points.len());
    }
}
