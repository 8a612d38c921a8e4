//! navgraph: graph-based approximate nearest neighbor search.
//!
//! Two graph indices over an immutable, in-memory set of `f32` vectors:
//!
//! - [`gnns`]: Graph Nearest Neighbor Search. A k-NN routing graph (exact or
//!   LSH-seeded), queried by randomized restarts of a short greedy walk.
//! - [`mrng`]: Monotonic Relative Neighborhood Graph. Triangle-pruned edges
//!   from an all-pairs ranking, queried by best-first search from the point
//!   nearest the centroid.
//!
//! Both builds split the per-point work into contiguous slices and run them
//! on a fixed-size pool ([`WorkerPool`]). A built index is read-only, so
//! queries may run from any number of threads.
//!
//! # Quick Start
//!
//! ```rust
//! # #[cfg(feature = "mrng")]
//! # fn main() -> navgraph::Result<()> {
//! use navgraph::{dataset, Algorithm, GraphIndex, GraphSearch, IndexConfig};
//! use navgraph::mrng::MrngParams;
//!
//! let points = dataset::uniform(500, 16, 7)?;
//! let config = IndexConfig::new(Algorithm::Mrng(MrngParams {
//!     num_nn: 10,
//!     candidates: 40,
//! }));
//!
//! let index = GraphIndex::build(&points, &config)?;
//! let results = index.search(points.vector(0));
//! assert!(results.len() <= 10);
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "mrng"))]
//! # fn main() {}
//! ```
//!
//! # Choosing an Index
//!
//! | | GNNS | MRNG |
//! |---|---|---|
//! | Build | k-NN per point (LSH: sublinear) | all-pairs ranking, O(n²) |
//! | Degree | fixed (`graph_nn`) | variable, usually small |
//! | Query | randomized, non-deterministic unless seeded | deterministic |
//!
//! Exact scans ([`brute_force`]) are the accuracy reference; [`eval`] turns
//! the two into recall and approximation factors.
//!
//! # Feature Flags
//!
//! - `gnns`, `mrng`: the two indices. [`config`] and [`index`] exist only
//!   when at least one of them is enabled.
//! - `lsh`: LSH seed graph for GNNS.
//!
//! All three are on by default.

pub mod brute_force;
#[cfg(any(feature = "gnns", feature = "mrng"))]
pub mod config;
pub mod dataset;
pub mod distance;
pub mod error;
pub mod eval;
#[cfg(feature = "gnns")]
pub mod gnns;
#[cfg(any(feature = "gnns", feature = "mrng"))]
pub mod index;
#[cfg(feature = "mrng")]
pub mod mrng;
pub mod neighbor;
pub mod parallel;
pub mod point;
pub mod seed;
pub mod simd;

// Re-exports
#[cfg(any(feature = "gnns", feature = "mrng"))]
pub use config::{Algorithm, IndexConfig};
pub use distance::DistanceMetric;
pub use error::{GraphError, Result};
#[cfg(any(feature = "gnns", feature = "mrng"))]
pub use index::{GraphIndex, GraphSearch};
pub use neighbor::{Neighbor, NeighborList};
pub use parallel::WorkerPool;
pub use point::{Point, PointId, PointSet};
