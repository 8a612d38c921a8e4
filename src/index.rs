//! One query interface over both graph indices.
//!
//! The variant is chosen once, from an [`IndexConfig`], when the index is
//! built. After that every query goes to the same implementation.

use crate::config::{Algorithm, IndexConfig};
use crate::distance::DistanceMetric;
use crate::error::{GraphError, Result};
#[cfg(feature = "gnns")]
use crate::gnns::GnnsIndex;
#[cfg(feature = "mrng")]
use crate::mrng::MrngIndex;
use crate::neighbor::Neighbor;
use crate::point::PointSet;

/// Approximate k-NN over a built, immutable graph.
pub trait GraphSearch {
    /// Up to `k` approximate nearest neighbors of `query`, ascending by distance.
    fn approximate_knn(&self, query: &[f32], k: usize) -> Vec<Neighbor>;

    /// Neighbors per query from the index parameters.
    fn num_nn(&self) -> usize;

    /// [`approximate_knn`](Self::approximate_knn) with `k = num_nn()`.
    fn search(&self, query: &[f32]) -> Vec<Neighbor> {
        self.approximate_knn(query, self.num_nn())
    }

    fn num_points(&self) -> usize;

    fn metric(&self) -> DistanceMetric;

    /// Algorithm name for reports.
    fn name(&self) -> &'static str;
}

#[cfg(feature = "gnns")]
impl GraphSearch for GnnsIndex<'_> {
    fn approximate_knn(&self, query: &[f32], k: usize) -> Vec<Neighbor> {
        GnnsIndex::approximate_knn(self, query, k)
    }

    fn num_nn(&self) -> usize {
        self.params().num_nn
    }

    fn num_points(&self) -> usize {
        GnnsIndex::num_points(self)
    }

    fn metric(&self) -> DistanceMetric {
        GnnsIndex::metric(self)
    }

    fn name(&self) -> &'static str {
        "GNNS"
    }
}

#[cfg(feature = "mrng")]
impl GraphSearch for MrngIndex<'_> {
    fn approximate_knn(&self, query: &[f32], k: usize) -> Vec<Neighbor> {
        MrngIndex::approximate_knn(self, query, k)
    }

    fn num_nn(&self) -> usize {
        self.params().num_nn
    }

    fn num_points(&self) -> usize {
        MrngIndex::num_points(self)
    }

    fn metric(&self) -> DistanceMetric {
        MrngIndex::metric(self)
    }

    fn name(&self) -> &'static str {
        "MRNG"
    }
}

/// A built graph index of either kind.
#[derive(Debug)]
pub enum GraphIndex<'a> {
    #[cfg(feature = "gnns")]
    Gnns(GnnsIndex<'a>),
    #[cfg(feature = "mrng")]
    Mrng(MrngIndex<'a>),
}

impl<'a> GraphIndex<'a> {
    /// Validate `config` and build the index it describes over `points`.
    pub fn build(points: &'a PointSet, config: &IndexConfig) -> Result<Self> {
        config.validate()?;
        let pool = config.pool();

        match &config.algorithm {
            #[cfg(feature = "gnns")]
            Algorithm::Gnns(params) => Ok(GraphIndex::Gnns(GnnsIndex::build(
                points,
                config.metric,
                params.clone(),
                pool,
            )?)),
            #[cfg(feature = "mrng")]
            Algorithm::Mrng(params) => Ok(GraphIndex::Mrng(MrngIndex::build(
                points,
                config.metric,
                params.clone(),
                pool,
            )?)),
        }
    }

    fn inner(&self) -> &dyn GraphSearch {
        match self {
            #[cfg(feature = "gnns")]
            GraphIndex::Gnns(index) => index,
            #[cfg(feature = "mrng")]
            GraphIndex::Mrng(index) => index,
        }
    }

    /// Like [`GraphSearch::approximate_knn`], but rejects a query whose
    /// dimension differs from the indexed points.
    pub fn query(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        let expected = self.dimension();
        if query.len() != expected {
            return Err(GraphError::DimensionMismatch {
                expected,
                found: query.len(),
            });
        }
        Ok(self.approximate_knn(query, k))
    }

    pub fn dimension(&self) -> usize {
        match self {
            #[cfg(feature = "gnns")]
            GraphIndex::Gnns(index) => index.points().dimension(),
            #[cfg(feature = "mrng")]
            GraphIndex::Mrng(index) => index.points().dimension(),
        }
    }
}

impl GraphSearch for GraphIndex<'_> {
    fn approximate_knn(&self, query: &[f32], k: usize) -> Vec<Neighbor> {
        self.inner().approximate_knn(query, k)
    }

    fn num_nn(&self) -> usize {
        self.inner().num_nn()
    }

    fn num_points(&self) -> usize {
        self.inner().num_points()
    }

    fn metric(&self) -> DistanceMetric {
        self.inner().metric()
    }

    fn name(&self) -> &'static str {
        self.inner().name()
    }
}
