//! MRNG query: bounded best-first search from the navigation node.

use super::graph::MrngIndex;
use crate::neighbor::{Neighbor, NeighborList};

impl MrngIndex<'_> {
    /// Approximate `k` nearest neighbors of `query`, ascending by distance.
    ///
    /// The search stops once `params.candidates` nodes have been admitted
    /// (the navigation node counts as the first) or every admitted node has
    /// been expanded. A node's neighbors are all admitted together, so the
    /// budget can be overshot by up to one row.
    ///
    /// Returns fewer than `k` results when fewer were admitted, which happens
    /// whenever `candidates < k`.
    pub fn approximate_knn(&self, query: &[f32], k: usize) -> Vec<Neighbor> {
        self.best_first(query, k).into_truncated(k)
    }

    /// Every candidate admitted while searching for `query`.
    pub(super) fn best_first(&self, query: &[f32], k: usize) -> NeighborList {
        let budget = self.params.candidates;
        let mut pool = NeighborList::with_capacity(budget.max(k).min(self.points.len()));

        let start = self.navigation;
        pool.insert(Neighbor::new(
            start,
            self.metric.distance(query, self.points.vector(start)),
        ));
        let mut admitted = 1usize;

        while admitted < budget && pool.len() > pool.checked_count() {
            let Some(p) = pool.check_first_unchecked() else {
                break;
            };

            for &id in &self.graph[p.id as usize] {
                if pool.contains(id) {
                    continue;
                }
                let distance = self.metric.distance(query, self.points.vector(id));
                if pool.insert(Neighbor::new(id, distance)) {
                    admitted += 1;
                }
            }
        }

        pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brute_force;
    use crate::dataset;
    use crate::distance::DistanceMetric;
    use crate::mrng::MrngParams;
    use crate::point::{PointId, PointSet};
    use crate::WorkerPool;

    fn build(points: &PointSet, num_nn: usize, candidates: usize) -> MrngIndex<'_> {
        MrngIndex::build(
            points,
            DistanceMetric::L2,
            MrngParams { num_nn, candidates },
            WorkerPool::new(4),
        )
        .unwrap()
    }

    #[test]
    fn unit_square_query() {
        let points = PointSet::from_rows(vec![
            vec![0.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 0.0],
            vec![1.0, 1.0],
        ])
        .unwrap();
        let index = build(&points, 2, 4);

        let results = index.approximate_knn(&[0.9, 0.9], 2);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, 3);
        // (0,1) and (1,0) tie; both are valid second neighbors.
        assert!(results[1].id == 1 || results[1].id == 2);
    }

    #[test]
    fn equal_distance_candidates_are_not_merged() {
        // Query at the center of the square: all four corners are equally far.
        let points = PointSet::from_rows(vec![
            vec![0.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 0.0],
            vec![1.0, 1.0],
        ])
        .unwrap();
        let index = build(&points, 4, 10);

        let results = index.approximate_knn(&[0.5, 0.5], 4);
        let mut ids: Vec<PointId> = results.iter().map(|n| n.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }

    #[test]
    fn budget_below_k_truncates_results() {
        let points = dataset::uniform(200, 8, 21).unwrap();
        let index = build(&points, 10, 1);
        // Budget 1 admits only the navigation node.
        let results = index.approximate_knn(points.vector(0), 10);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, index.navigation_node());
    }

    #[test]
    fn mid_range_budget_stops_expansion() {
        let points = dataset::uniform(400, 4, 8).unwrap();
        let reference = build(&points, 5, 10);
        let max_degree = (0..400u32)
            .map(|id| reference.neighbors(id).unwrap().len())
            .max()
            .unwrap();
        let query = dataset::uniform(1, 4, 81).unwrap();

        for budget in [2usize, 10, 37, 100] {
            let index = build(&points, 5, budget);
            let pool = index.best_first(query.vector(0), 5);

            // The graph is connected, so the budget is always reached,
            // overshot by at most the last expanded row.
            assert!(pool.len() >= budget, "budget {budget}: admitted {}", pool.len());
            assert!(pool.len() < budget + max_degree, "budget {budget}: admitted {}", pool.len());
            assert!(pool.checked_count() < pool.len());

            let results = index.approximate_knn(query.vector(0), 5);
            assert!(results.len() <= 5);
            assert!(results.len() <= pool.len());
            assert_eq!(results[0], *pool.first().unwrap());
        }
    }

    #[test]
    fn huge_budgets_are_clamped_to_the_point_set() {
        let points = dataset::uniform(60, 4, 12).unwrap();
        let query = dataset::uniform(1, 4, 13).unwrap();

        for candidates in [usize::MAX, 1 << 40] {
            let index = build(&points, 3, candidates);
            let results = index.approximate_knn(query.vector(0), 3);
            assert_eq!(results.len(), 3);
            // Everything reachable is admitted, so the result is exact.
            let exact = brute_force::knn(&points, query.vector(0), 3, DistanceMetric::L2);
            assert_eq!(results, exact);
        }

        let index = build(&points, 3, 20);
        let pool = index.best_first(query.vector(0), usize::MAX);
        assert_eq!(index.approximate_knn(query.vector(0), usize::MAX).len(), pool.len());
    }

    #[test]
    fn single_point_returns_navigation_node() {
        let points = PointSet::from_rows(vec![vec![1.0]]).unwrap();
        let index = build(&points, 3, 10);
        let results = index.approximate_knn(&[4.0], 3);
        assert_eq!(results, vec![Neighbor::new(0, 3.0)]);
    }

    #[test]
    fn large_budget_finds_exact_neighbors_of_indexed_points() {
        let points = dataset::clustered(300, 8, 6, 0.05, 13).unwrap();
        let index = build(&points, 5, 300);

        for id in [0u32, 100, 299] {
            let approx = index.approximate_knn(points.vector(id), 5);
            let exact = brute_force::knn(&points, points.vector(id), 5, DistanceMetric::L2);
            assert_eq!(approx.len(), 5);
            assert_eq!(approx[0].distance, 0.0);
            for (a, e) in approx.iter().zip(&exact) {
                assert!(a.distance >= e.distance - 1e-6);
            }
        }
    }

    #[test]
    fn results_are_ascending_and_bounded() {
        let points = dataset::uniform(150, 6, 4).unwrap();
        let index = build(&points, 7, 30);
        let query = dataset::uniform(1, 6, 99).unwrap();
        let results = index.approximate_knn(query.vector(0), 7);
        assert!(results.len() <= 7);
        for pair in results.windows(2) {
            assert!(pair[0].distance <= pair[1].distance);
        }
    }
}
