//! Fixed-parameter Takens delay embedding.

use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use super::TimeSeries;
use crate::error::{Result, TdaError};

/// Ordered points in ℝ^d, one per row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointCloud {
    points: Array2<f64>,
}

impl PointCloud {
    pub fn new(points: Array2<f64>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &Array2<f64> {
        &self.points
    }

    pub fn n_points(&self) -> usize {
        self.points.nrows()
    }

    /// Ambient dimension d
    pub fn dimension(&self) -> usize {
        self.points.ncols()
    }

    pub fn point(&self, i: usize) -> ArrayView1<'_, f64> {
        self.points.row(i)
    }

    pub fn into_inner(self) -> Array2<f64> {
        self.points
    }
}

impl From<Array2<f64>> for PointCloud {
    fn from(points: Array2<f64>) -> Self {
        Self::new(points)
    }
}

/// Delay-embed a scalar sequence.
///
/// Row `i` is `[v[i], v[i+lag], ..., v[i+(dimension-1)*lag]]` for
/// `i < n - (dimension-1)*lag`.
///
/// # Errors
/// `InvalidParameter` if `dimension == 0`, `lag == 0`, or the series is too
/// short to hold a single delay vector.
pub fn embed(values: &[f64], dimension: usize, lag: usize) -> Result<PointCloud> {
    if dimension == 0 {
        return Err(TdaError::invalid("dimension", "must be a positive integer"));
    }
    if lag == 0 {
        return Err(TdaError::invalid("lag", "must be a positive integer"));
    }

    let n = values.len();
    let span = (dimension - 1)
        .checked_mul(lag)
        .ok_or_else(|| TdaError::invalid("lag", "(dimension - 1) * lag overflows"))?;
    if n <= span {
        return Err(TdaError::invalid(
            "dimension",
            format!(
                "series of length {} is too short for dimension {} and lag {} \
                 (needs more than {} samples)",
                n, dimension, lag, span
            ),
        ));
    }

    let rows = n - span;
    let cloud = Array2::from_shape_fn((rows, dimension), |(i, k)| values[i + k * lag]);

    tracing::debug!(rows, dimension, lag, "delay embedding built");
    Ok(PointCloud::new(cloud))
}

/// Delay-embed the signal column of a validated series.
pub fn embed_series(series: &TimeSeries, dimension: usize, lag: usize) -> Result<PointCloud> {
    embed(&series.values(), dimension, lag)
}
