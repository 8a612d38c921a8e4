//! Euclidean (p-stable) LSH used as a seed graph.
//!
//! Each table hashes a vector with `k` functions
//! `h(v) = floor((a·v + t) / w)`, `a ~ N(0, I)`, `t ~ U[0, w)`, and combines
//! them into one 64-bit id. Points land in `id mod table_size`, but only
//! points with the *same* id are treated as candidates, which keeps buckets
//! from mixing unrelated regions when the table is small.
//!
//! A point's neighbors are the exact ranking of its candidates across all
//! tables. If the tables yield fewer than `k` candidates the point falls back
//! to a full scan, so every seed row has the requested length.
//!
//! # References
//!
//! - Datar, Immorlica, Indyk & Mirrokni (2004): "Locality-sensitive hashing
//!   scheme based on p-stable distributions"

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::SeedGraph;
use crate::brute_force;
use crate::distance::DistanceMetric;
use crate::neighbor::Neighbor;
use crate::point::{PointId, PointSet};
use crate::simd;

/// Large prime used to fold the `k` hash values into one id.
const FOLD_PRIME: u64 = (1 << 32) - 5;

/// LSH parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LshParams {
    /// Hash functions per table (k).
    pub hash_functions: usize,
    /// Number of tables (L).
    pub tables: usize,
    /// Bucket window width (w), in distance units of the data.
    pub window: f32,
    /// Buckets per table. `None` means `n / 8`.
    pub table_size: Option<usize>,
    /// Seed for the random projections.
    pub seed: u64,
}

impl Default for LshParams {
    fn default() -> Self {
        Self {
            hash_functions: 4,
            tables: 5,
            window: 2240.0,
            table_size: None,
            seed: 42,
        }
    }
}

struct HashTable {
    /// `hash_functions * dimension` projection coefficients.
    projections: Vec<f32>,
    offsets: Vec<f32>,
    /// Multipliers folding the individual hash values together.
    folds: Vec<u64>,
    buckets: Vec<Vec<(PointId, u64)>>,
}

impl HashTable {
    fn new(dimension: usize, k: usize, window: f32, table_size: usize, rng: &mut StdRng) -> Self {
        let projections = (0..k * dimension).map(|_| gaussian(rng)).collect();
        let offsets = (0..k).map(|_| rng.random::<f32>() * window).collect();
        let folds = (0..k).map(|_| rng.random_range(1..FOLD_PRIME)).collect();

        Self {
            projections,
            offsets,
            folds,
            buckets: vec![Vec::new(); table_size],
        }
    }

    fn id(&self, v: &[f32], window: f32) -> u64 {
        let dimension = v.len();
        let mut id = 0u64;
        for (i, (&offset, &fold)) in self.offsets.iter().zip(&self.folds).enumerate() {
            let a = &self.projections[i * dimension..(i + 1) * dimension];
            let h = ((simd::dot(a, v) + offset) / window).floor() as i64;
            id = (id + fold.wrapping_mul(h as u64) % FOLD_PRIME) % FOLD_PRIME;
        }
        id
    }

    fn bucket(&self, id: u64) -> usize {
        (id % self.buckets.len() as u64) as usize
    }
}

/// Box-Muller standard normal sample.
fn gaussian(rng: &mut StdRng) -> f32 {
    let u1: f32 = rng.random::<f32>().max(f32::MIN_POSITIVE);
    let u2: f32 = rng.random();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f32::consts::PI * u2).cos()
}

/// LSH-backed seed graph over a borrowed point set.
pub struct LshSeed<'a> {
    points: &'a PointSet,
    metric: DistanceMetric,
    tables: Vec<HashTable>,
    /// Per point, its id in each table.
    ids: Vec<Vec<u64>>,
}

impl<'a> LshSeed<'a> {
    /// Hash every point into `params.tables` tables.
    pub fn build(points: &'a PointSet, metric: DistanceMetric, params: &LshParams) -> Self {
        let mut rng = StdRng::seed_from_u64(params.seed);
        let table_size = params.table_size.unwrap_or(points.len() / 8).max(1);
        let window = if params.window > 0.0 {
            params.window
        } else {
            1.0
        };

        let mut tables: Vec<HashTable> = (0..params.tables)
            .map(|_| {
                HashTable::new(
                    points.dimension(),
                    params.hash_functions,
                    window,
                    table_size,
                    &mut rng,
                )
            })
            .collect();

        let mut ids = Vec::with_capacity(points.len());
        for p in points.iter() {
            let per_table: Vec<u64> = tables
                .iter_mut()
                .map(|table| {
                    let id = table.id(p.vector, window);
                    let bucket = table.bucket(id);
                    table.buckets[bucket].push((p.id, id));
                    id
                })
                .collect();
            ids.push(per_table);
        }

        tracing::debug!(
            tables = params.tables,
            hash_functions = params.hash_functions,
            table_size,
            "lsh seed tables built"
        );

        Self {
            points,
            metric,
            tables,
            ids,
        }
    }

    /// Points sharing a full hash id with `id` in at least one table, `id` included.
    fn candidates(&self, id: PointId) -> Vec<PointId> {
        let mut seen: HashSet<PointId> = HashSet::new();
        let mut out = vec![id];
        seen.insert(id);

        for (table, &hash_id) in self.tables.iter().zip(&self.ids[id as usize]) {
            for &(other, other_id) in &table.buckets[table.bucket(hash_id)] {
                if other_id == hash_id && seen.insert(other) {
                    out.push(other);
                }
            }
        }
        out
    }
}

impl SeedGraph for LshSeed<'_> {
    fn nearest(&self, id: PointId, k: usize) -> Vec<Neighbor> {
        let query = self.points.vector(id);
        let candidates = self.candidates(id);

        if candidates.len() < k.min(self.points.len()) {
            return brute_force::knn(self.points, query, k, self.metric);
        }

        let mut ranked: Vec<Neighbor> = candidates
            .into_iter()
            .map(|c| Neighbor::new(c, self.metric.distance(query, self.points.vector(c))))
            .collect();
        ranked.sort_by(Neighbor::by_distance);
        ranked.truncate(k);
        ranked
    }
}
