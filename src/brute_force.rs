//! Exact k-nearest-neighbor search by full scan.
//!
//! The accuracy oracle for the graph indices, and the ranking step inside
//! MRNG construction, which ranks every point against every other point.

use crate::distance::DistanceMetric;
use crate::neighbor::Neighbor;
use crate::point::{PointId, PointSet};

/// The `min(k, |points|)` points closest to `query`, ascending by distance.
///
/// Equal distances keep scan order: the point loaded first ranks first.
pub fn knn(points: &PointSet, query: &[f32], k: usize, metric: DistanceMetric) -> Vec<Neighbor> {
    let mut ranked = rank(points, query, metric, |_| true);
    ranked.truncate(k);
    ranked
}

/// Every point except `id`, ranked by ascending distance to `id`.
pub fn knn_excluding(points: &PointSet, id: PointId, metric: DistanceMetric) -> Vec<Neighbor> {
    rank(points, points.vector(id), metric, |other| other != id)
}

fn rank<F>(points: &PointSet, query: &[f32], metric: DistanceMetric, keep: F) -> Vec<Neighbor>
where
    F: Fn(PointId) -> bool,
{
    let mut ranked: Vec<Neighbor> = points
        .iter()
        .filter(|p| keep(p.id))
        .map(|p| Neighbor::new(p.id, metric.distance(query, p.vector)))
        .collect();

    // Stable, so ties stay in scan order.
    ranked.sort_by(Neighbor::by_distance);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn square() -> PointSet {
        PointSet::from_rows(vec![
            vec![0.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 0.0],
            vec![1.0, 1.0],
        ])
        .unwrap()
    }

    #[test]
    fn finds_closest_first() {
        let points = square();
        let result = knn(&points, &[0.1, 0.1], 2, DistanceMetric::L2);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].id, 0);
        // (0,1) and (1,0) tie; scan order puts 1 first.
        assert_eq!(result[1].id, 1);
    }

    #[test]
    fn ties_break_by_scan_order() {
        let points = square();
        let ids: Vec<PointId> = knn(&points, &[0.5, 0.5], 4, DistanceMetric::L2)
            .iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }

    #[test]
    fn k_larger_than_set_returns_everything() {
        let points = square();
        assert_eq!(knn(&points, &[0.0, 0.0], 10, DistanceMetric::L1).len(), 4);
    }

    #[test]
    fn excluding_drops_only_the_point_itself() {
        let points = PointSet::from_rows(vec![vec![0.0], vec![0.0], vec![2.0]]).unwrap();
        let ranked = knn_excluding(&points, 0, DistanceMetric::L2);
        let ids: Vec<PointId> = ranked.iter().map(|n| n.id).collect();
        // Point 1 is a duplicate of point 0 and must stay.
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(ranked[0].distance, 0.0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn returns_min_k_n_sorted_and_idempotent(
            raw in prop::collection::vec(-5.0f32..5.0, 3..120),
            query in prop::collection::vec(-5.0f32..5.0, 3),
            k in 1usize..50,
        ) {
            let n = raw.len() / 3;
            let points = PointSet::from_flat(3, raw[..n * 3].to_vec()).unwrap();

            let first = knn(&points, &query, k, DistanceMetric::L2);
            prop_assert_eq!(first.len(), k.min(n));
            for pair in first.windows(2) {
                prop_assert!(pair[0].distance <= pair[1].distance);
            }

            let second = knn(&points, &query, k, DistanceMetric::L2);
            prop_assert_eq!(first, second);
        }
    }
}
