//! Monotonic Relative Neighborhood Graph (MRNG) with best-first search.
//!
//! # Feature Flag
//!
//! Requires the `mrng` feature (on by default).
//!
//! # Construction
//!
//! For every point p, rank all other points by distance (exact, O(n) each,
//! O(n²) total, split across the build workers), then walk the ranking:
//!
//! 1. Admit every point tied for the smallest distance.
//! 2. Admit each further candidate r unless an admitted neighbor t makes
//!    pr the strictly longest side of triangle (p, r, t):
//!
//! ```text
//!        t
//!       / \            reject r if  |pr| > |pt|  and  |pr| > |rt|
//!      /   \
//!     p-----r
//! ```
//!
//! The surviving edges guarantee a monotonic (distance-decreasing) path
//! between graph nodes, so greedy search does not get trapped.
//!
//! The navigation node is the point closest to the dataset centroid.
//!
//! # Search
//!
//! Best-first from the navigation node: repeatedly expand the closest
//! unexpanded candidate, adding its graph neighbors, until `candidates` (L)
//! nodes have been admitted or nothing is left to expand.
//!
//! # Quick Start
//!
//! ```rust
//! use navgraph::dataset;
//! use navgraph::mrng::{MrngIndex, MrngParams};
//! use navgraph::DistanceMetric;
//!
//! # fn main() -> navgraph::Result<()> {
//! let points = dataset::uniform(200, 8, 42)?;
//! let index = MrngIndex::new(&points, DistanceMetric::L2, MrngParams { num_nn: 5, candidates: 20 })?;
//!
//! let results = index.approximate_knn(points.vector(3), 5);
//! assert!(results.len() <= 5);
//! # Ok(())
//! # }
//! ```
//!
//! # References
//!
//! - Fu, Xiang, Wang & Cai (2019): "Fast Approximate Nearest Neighbor Search
//!   With The Navigating Spreading-out Graph"

mod graph;
mod search;

pub use graph::{select_monotonic, MrngIndex, MrngParams};
