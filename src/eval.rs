//! Accuracy of approximate results against an exact scan.
//!
//! - Recall@k: fraction of the true k nearest neighbors that were retrieved
//! - Approximation factor: how much farther the i-th returned neighbor is
//!   than the true i-th neighbor, averaged (AAF) and maximized (MAF)

use std::collections::HashSet;

use crate::neighbor::Neighbor;
use crate::point::PointId;

/// recall@k = |retrieved ∩ ground_truth| / k, over the first `k` of each.
pub fn recall_at_k(ground_truth: &[PointId], retrieved: &[PointId], k: usize) -> f32 {
    if k == 0 || ground_truth.is_empty() {
        return 0.0;
    }

    let truth: HashSet<PointId> = ground_truth.iter().take(k).copied().collect();
    let hits = retrieved
        .iter()
        .take(k)
        .collect::<HashSet<_>>()
        .into_iter()
        .filter(|id| truth.contains(id))
        .count();
    hits as f32 / k as f32
}

/// Mean recall@k over paired queries.
pub fn mean_recall(ground_truths: &[Vec<PointId>], retrievals: &[Vec<PointId>], k: usize) -> f32 {
    if ground_truths.is_empty() {
        return 0.0;
    }

    let total: f32 = ground_truths
        .iter()
        .zip(retrievals)
        .map(|(truth, retrieved)| recall_at_k(truth, retrieved, k))
        .sum();
    total / ground_truths.len() as f32
}

/// Distance ratios of one query's approximate results to its exact results.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproximationFactor {
    /// Mean of `approx[i] / exact[i]` (AAF).
    pub average: f64,
    /// Largest `approx[i] / exact[i]` (MAF).
    pub maximum: f64,
}

/// Compare rank by rank. Ranks whose exact distance is zero carry no ratio
/// and are skipped; with nothing left to compare both factors are 1.
pub fn approximation_factor(approx: &[Neighbor], exact: &[Neighbor]) -> ApproximationFactor {
    let mut sum = 0.0f64;
    let mut maximum = 1.0f64;
    let mut counted = 0usize;

    for (a, e) in approx.iter().zip(exact) {
        if e.distance == 0.0 {
            continue;
        }
        let ratio = f64::from(a.distance) / f64::from(e.distance);
        sum += ratio;
        maximum = maximum.max(ratio);
        counted += 1;
    }

    if counted == 0 {
        return ApproximationFactor {
            average: 1.0,
            maximum: 1.0,
        };
    }

    ApproximationFactor {
        average: sum / counted as f64,
        maximum,
    }
}
