//! Index configuration.
//!
//! An [`IndexConfig`] picks one graph algorithm and its parameters, the
//! distance metric and the number of build workers. It round-trips through
//! JSON:
//!
//! ```json
//! {
//!   "metric": "l2",
//!   "workers": 4,
//!   "algorithm": { "type": "mrng", "num_nn": 10, "candidates": 40 }
//! }
//! ```
//!
//! The index constructors trust their parameters; [`IndexConfig::validate`]
//! is where bad values get rejected.

use serde::{Deserialize, Serialize};

use crate::distance::DistanceMetric;
use crate::error::{GraphError, Result};
#[cfg(feature = "gnns")]
use crate::gnns::GnnsParams;
#[cfg(feature = "mrng")]
use crate::mrng::MrngParams;
use crate::parallel::{WorkerPool, DEFAULT_WORKERS};

/// Graph algorithm and its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Algorithm {
    /// Randomized greedy walks over a k-NN seed graph.
    #[cfg(feature = "gnns")]
    Gnns(GnnsParams),
    /// Best-first search over a monotonic relative neighborhood graph.
    #[cfg(feature = "mrng")]
    Mrng(MrngParams),
}

impl Algorithm {
    pub fn name(&self) -> &'static str {
        match self {
            #[cfg(feature = "gnns")]
            Algorithm::Gnns(_) => "GNNS",
            #[cfg(feature = "mrng")]
            Algorithm::Mrng(_) => "MRNG",
        }
    }

    /// Neighbors returned per query.
    pub fn num_nn(&self) -> usize {
        match self {
            #[cfg(feature = "gnns")]
            Algorithm::Gnns(p) => p.num_nn,
            #[cfg(feature = "mrng")]
            Algorithm::Mrng(p) => p.num_nn,
        }
    }
}

fn default_workers() -> usize {
    DEFAULT_WORKERS
}

/// Complete description of an index to build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexConfig {
    #[serde(default)]
    pub metric: DistanceMetric,
    #[serde(default = "default_workers")]
    pub workers: usize,
    pub algorithm: Algorithm,
}

impl IndexConfig {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            metric: DistanceMetric::default(),
            workers: DEFAULT_WORKERS,
            algorithm,
        }
    }

    #[must_use]
    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub(crate) fn pool(&self) -> WorkerPool {
        WorkerPool::new(self.workers)
    }

    /// Reject parameters the indices would silently degrade on.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(invalid("workers must be at least 1"));
        }
        if self.algorithm.num_nn() == 0 {
            return Err(invalid("the number of nearest neighbors has to be positive"));
        }

        match &self.algorithm {
            #[cfg(feature = "gnns")]
            Algorithm::Gnns(p) => {
                if p.graph_nn == 0 {
                    return Err(invalid("graph_nn must be at least 1"));
                }
                if p.expansions == 0 {
                    return Err(invalid("expansions must be at least 1"));
                }
                if p.restarts == 0 {
                    return Err(invalid("restarts must be at least 1"));
                }
            }
            #[cfg(feature = "mrng")]
            Algorithm::Mrng(p) => {
                if p.candidates < p.num_nn {
                    return Err(invalid(
                        "the number of candidates must be greater or equal to the number of nearest neighbors",
                    ));
                }
            }
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> GraphError {
    GraphError::InvalidParameter(msg.to_string())
}
