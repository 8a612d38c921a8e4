//! Graph Nearest Neighbor Search (GNNS): randomized greedy walks over a k-NN graph.
//!
//! # Feature Flag
//!
//! Requires the `gnns` feature (on by default).
//!
//! # Algorithm
//!
//! Construction asks a [`SeedGraph`](crate::seed::SeedGraph) for the
//! `graph_nn` nearest neighbors of every point (approximate is fine) and
//! stores them as fixed-length rows, the point itself first.
//!
//! A query runs `restarts` independent trials. Each trial starts at a
//! uniformly random node and takes up to 30 greedy steps:
//!
//! ```text
//! Y ← random node
//! repeat ≤ 30:
//!     look at up to E neighbors of Y, add each to the result pool S
//!     stop if Y has no neighbors
//!     stop if the best of them is farther than the best in S
//!     Y ← best of them
//! ```
//!
//! The answer is the `num_nn` closest entries of S.
//!
//! # Quick Start
//!
//! ```rust
//! use navgraph::dataset;
//! use navgraph::gnns::{GnnsIndex, GnnsParams};
//! use navgraph::DistanceMetric;
//!
//! # fn main() -> navgraph::Result<()> {
//! let points = dataset::uniform(200, 8, 42)?;
//! let params = GnnsParams { graph_nn: 10, expansions: 5, restarts: 3, num_nn: 5, ..Default::default() };
//! let index = GnnsIndex::new(&points, DistanceMetric::L2, params)?;
//!
//! let results = index.approximate_knn(points.vector(0), 5);
//! assert!(results.len() <= 5);
//! # Ok(())
//! # }
//! ```
//!
//! # References
//!
//! - Hajebi, Abbasi-Yadkori, Shahbazi & Zhang (2011): "Fast Approximate
//!   Nearest-Neighbor Search with k-Nearest Neighbor Graph"

mod graph;
mod search;

pub use graph::{GnnsIndex, GnnsParams, SeedSource};

/// Greedy steps per restart before a trial is cut off.
pub const MAX_GREEDY_STEPS: usize = 30;
