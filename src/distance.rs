//! Distance metrics for dense vectors.
//!
//! Every index in this crate is built and queried under a single
//! [`DistanceMetric`]. It is chosen once, handed to the index constructor,
//! and stored in the built index, so every query on that index uses the
//! metric the graph was built with. There is no process-wide setting.
//!
//! ## Important nuance
//!
//! All metrics here are symmetric, non-negative and zero for identical
//! vectors. The graph pruning rule compares triangle sides, so a metric that
//! can go negative (such as raw inner product) is not offered.

use serde::{Deserialize, Serialize};

use crate::simd;

/// Distance metric for dense vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// Euclidean (L2) distance.
    #[default]
    L2,
    /// Manhattan (L1) distance.
    L1,
    /// Cosine distance $1 - \cos(a,b)$, in `[0,2]`.
    Cosine,
    /// Angular distance $\arccos(\cos(a,b)) / \pi$, in `[0,1]`.
    Angular,
}

impl DistanceMetric {
    /// Compute distance between two vectors.
    ///
    /// If dimensions mismatch, this returns `f32::INFINITY` (so it is never selected as a
    /// nearest neighbor).
    #[inline]
    #[must_use]
    pub fn distance(self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            DistanceMetric::L2 => l2_distance(a, b),
            DistanceMetric::L1 => l1_distance(a, b),
            DistanceMetric::Cosine => cosine_distance(a, b),
            DistanceMetric::Angular => angular_distance(a, b),
        }
    }

    /// Short lowercase name, as used in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            DistanceMetric::L2 => "l2",
            DistanceMetric::L1 => "l1",
            DistanceMetric::Cosine => "cosine",
            DistanceMetric::Angular => "angular",
        }
    }
}

/// L2 (Euclidean) distance.
#[inline]
#[must_use]
pub fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return f32::INFINITY;
    }
    simd::l2_distance(a, b)
}

/// L1 (Manhattan) distance.
#[inline]
#[must_use]
pub fn l1_distance(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return f32::INFINITY;
    }
    simd::l1_distance(a, b)
}

/// Cosine distance $1 - \cos(a,b)$.
///
/// This computes cosine similarity (including norms), so it does **not** require pre-normalized
/// vectors.
#[inline]
#[must_use]
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return f32::INFINITY;
    }
    if a == b {
        return 0.0;
    }
    (1.0 - simd::cosine(a, b).clamp(-1.0, 1.0)).max(0.0)
}

/// Angular distance $\arccos(\cos(a,b)) / \pi$, in `[0,1]`.
#[inline]
#[must_use]
pub fn angular_distance(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return f32::INFINITY;
    }
    if a == b {
        return 0.0;
    }
    let cos_sim = simd::cosine(a, b).clamp(-1.0, 1.0);
    cos_sim.acos() / std::f32::consts::PI
}
