//! Analysis Configuration
//!
//! Every knob of the pipeline in one place. All structs implement
//! `Default` with the standard settings (embedding dimension 2, lag 1,
//! homology up to H₂, Wasserstein p = 2 over H₀ and H₁) and deserialize
//! with missing fields filled from those defaults.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::embedding::SeriesBounds;
use crate::error::{Result, TdaError};
use crate::topology::MAX_HOMOLOGY_DIM;

/// Delay embedding parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Embedding dimension d
    pub dimension: usize,
    /// Time lag τ in samples
    pub lag: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            dimension: 2,
            lag: 1,
        }
    }
}

/// Vietoris-Rips filtration parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FiltrationConfig {
    /// Highest homology dimension reported
    pub max_dim: usize,
    /// Simplices born above this radius are left out (`None` = full complex)
    pub max_radius: Option<f64>,
}

impl Default for FiltrationConfig {
    fn default() -> Self {
        Self {
            max_dim: 2,
            max_radius: None,
        }
    }
}

/// How requested homology dimensions enter a single distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pooling {
    /// All requested dimensions form one transport problem.
    #[default]
    Stacked,
    /// Each dimension is solved on its own; Wasserstein costs are summed
    /// before the p-th root, bottleneck takes the maximum.
    PerDimension,
}

/// Distance between two diagram points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroundMetric {
    /// L2; a point's distance to the diagonal is (death - birth) / √2.
    #[default]
    Euclidean,
    /// L∞; a point's distance to the diagonal is (death - birth) / 2.
    Chebyshev,
}

/// Diagram distance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricConfig {
    /// Wasserstein exponent, p ≥ 1
    pub p: f64,
    /// Homology dimensions compared
    pub dims: BTreeSet<usize>,
    pub pooling: Pooling,
    pub ground: GroundMetric,
    /// Also compute the bottleneck distance
    pub compute_bottleneck: bool,
}

impl Default for MetricConfig {
    fn default() -> Self {
        Self {
            p: 2.0,
            dims: [0, 1].into_iter().collect(),
            pooling: Pooling::default(),
            ground: GroundMetric::default(),
            compute_bottleneck: true,
        }
    }
}

impl MetricConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.p.is_finite() || self.p < 1.0 {
            return Err(TdaError::invalid(
                "p",
                format!("Wasserstein exponent must be finite and at least 1, got {}", self.p),
            ));
        }
        if let Some(&d) = self.dims.iter().find(|&&d| d > MAX_HOMOLOGY_DIM) {
            return Err(TdaError::invalid(
                "dims",
                format!("homology dimension {} is above {}", d, MAX_HOMOLOGY_DIM),
            ));
        }
        Ok(())
    }
}

/// Full pipeline configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub embedding: EmbeddingConfig,
    pub filtration: FiltrationConfig,
    pub metric: MetricConfig,
    pub series_bounds: SeriesBounds,
}

impl AnalysisConfig {
    /// Parse from JSON; absent fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| TdaError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.embedding.dimension == 0 {
            return Err(TdaError::invalid("dimension", "must be a positive integer"));
        }
        if self.embedding.lag == 0 {
            return Err(TdaError::invalid("lag", "must be a positive integer"));
        }
        if self.filtration.max_dim > MAX_HOMOLOGY_DIM {
            return Err(TdaError::invalid(
                "max_dim",
                format!("homology above dimension {} is not supported", MAX_HOMOLOGY_DIM),
            ));
        }
        if let Some(&d) = self.metric.dims.iter().find(|&&d| d > self.filtration.max_dim) {
            return Err(TdaError::invalid(
                "dims",
                format!(
                    "dimension {} is compared but max_dim is {}",
                    d, self.filtration.max_dim
                ),
            ));
        }
        if self.series_bounds.min_rows > self.series_bounds.max_rows {
            return Err(TdaError::invalid("series_bounds", "min_rows exceeds max_rows"));
        }
        self.metric.validate()
    }
}
