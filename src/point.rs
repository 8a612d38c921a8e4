//! Immutable point storage.
//!
//! A [`PointSet`] owns every feature vector in one flat row-major buffer
//! (structure of arrays). A point's identity is its load position, so graphs
//! built over the set store plain [`PointId`]s and borrow the set for as long
//! as they live.

use crate::error::{GraphError, Result};

/// Stable identity of a point: its position in the loaded dataset.
pub type PointId = u32;

/// Borrowed view of one point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point<'a> {
    pub id: PointId,
    pub vector: &'a [f32],
}

/// Loaded dataset. Never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSet {
    vectors: Vec<f32>,
    dimension: usize,
    len: usize,
}

impl PointSet {
    /// Build from one vector per point.
    ///
    /// Every row must have the same, non-zero length.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self> {
        let dimension = rows.first().map(Vec::len).ok_or(GraphError::EmptyPointSet)?;
        if dimension == 0 {
            return Err(GraphError::InvalidParameter(
                "points must have at least one dimension".to_string(),
            ));
        }

        let mut vectors = Vec::with_capacity(rows.len() * dimension);
        for row in &rows {
            if row.len() != dimension {
                return Err(GraphError::DimensionMismatch {
                    expected: dimension,
                    found: row.len(),
                });
            }
            vectors.extend_from_slice(row);
        }

        Self::check_len(rows.len())?;
        Ok(Self {
            vectors,
            dimension,
            len: rows.len(),
        })
    }

    /// Build from a flat row-major buffer of `len * dimension` values.
    pub fn from_flat(dimension: usize, vectors: Vec<f32>) -> Result<Self> {
        if dimension == 0 {
            return Err(GraphError::InvalidParameter(
                "points must have at least one dimension".to_string(),
            ));
        }
        if vectors.is_empty() {
            return Err(GraphError::EmptyPointSet);
        }
        if vectors.len() % dimension != 0 {
            return Err(GraphError::DimensionMismatch {
                expected: dimension,
                found: vectors.len() % dimension,
            });
        }

        let len = vectors.len() / dimension;
        Self::check_len(len)?;
        Ok(Self {
            vectors,
            dimension,
            len,
        })
    }

    fn check_len(len: usize) -> Result<()> {
        if len > PointId::MAX as usize {
            return Err(GraphError::InvalidParameter(format!(
                "{len} points exceed the PointId range"
            )));
        }
        Ok(())
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the set holds no points. False for any set built by the constructors.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Length of every feature vector.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Feature vector of point `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range. Ids come from this set, so an out of
    /// range id is a logic error.
    #[inline]
    pub fn vector(&self, id: PointId) -> &[f32] {
        let start = id as usize * self.dimension;
        &self.vectors[start..start + self.dimension]
    }

    /// Point view, or `None` if `id` is out of range.
    pub fn get(&self, id: PointId) -> Option<Point<'_>> {
        if (id as usize) < self.len {
            Some(Point {
                id,
                vector: self.vector(id),
            })
        } else {
            None
        }
    }

    /// All points in load order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Point<'_>> + '_ {
        self.vectors
            .chunks_exact(self.dimension)
            .enumerate()
            .map(|(i, vector)| Point {
                id: i as PointId,
                vector,
            })
    }

    /// Per-dimension sum over the points in `range`, accumulated in `f64`.
    pub(crate) fn partial_sum(&self, range: std::ops::Range<usize>) -> Vec<f64> {
        let mut sum = vec![0.0f64; self.dimension];
        for id in range {
            for (acc, &x) in sum.iter_mut().zip(self.vector(id as PointId)) {
                *acc += f64::from(x);
            }
        }
        sum
    }
}
