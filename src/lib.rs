//! # TDA-Series
//!
//! Comparing Time Series by the Shape of their Delay Embeddings
//!
//! ## Theoretical Framework
//!
//! A scalar signal sampled from a dynamical system carries the geometry of
//! its attractor. Takens' theorem says the delay map
//!
//!   x(t) ↦ (x(t), x(t+τ), ..., x(t+(d-1)τ))
//!
//! reconstructs that attractor up to a smooth change of coordinates, so the
//! topology of the embedded point cloud is a property of the system rather
//! than of the measurement.
//!
//! ### Methodology
//!
//! 1. **Delay Embedding**: series → point cloud in ℝ^d
//!
//! 2. **Persistent Homology**: Vietoris-Rips filtration of the cloud,
//!    reduced into a persistence diagram for H₀, H₁, H₂
//!
//! 3. **Diagram Distance**: Wasserstein (and bottleneck) distance between
//!    the two diagrams, normalized by each diagram's lifetime spread
//!
//! ## Key Result
//!
//! A periodic signal embeds onto a loop and produces one long-lived H₁
//! class; white noise produces a cloud whose H₁ pairs all hug the diagonal.
//! The normalized distance between the two is large, while two noisy
//! recordings of the same oscillator stay close.
//!
//! ## References
//!
//! - Takens, "Detecting strange attractors in turbulence" (1981)
//! - Edelsbrunner & Harer, "Computational Topology" (2010)
//! - Cohen-Steiner, Edelsbrunner, Harer, "Stability of Persistence Diagrams" (2007)

pub mod cancel;
pub mod config;
pub mod embedding;
pub mod error;
pub mod metric;
pub mod report;
pub mod topology;

pub use cancel::CancellationToken;
pub use config::{AnalysisConfig, EmbeddingConfig, FiltrationConfig};
pub use error::{Result, TdaError};

// Re-exports from embedding
pub use embedding::{embed, embed_series, PointCloud, Sample, SeriesBounds, TimeSeries};

// Re-exports from topology
pub use topology::{
    analyze,
    analyze_with,
    // Filtration construction
    Filtration,
    VietorisRips,
    // Diagrams and summaries
    PersistenceDiagram,
    PersistencePair,
    BettiNumbers,
    BettiCurve,
};

// Re-exports from metric
pub use metric::{
    bottleneck, wasserstein, wasserstein_with_matching, DiagramMetric, GroundMetric, MetricConfig,
    Pooling, WassersteinMatching,
};

// Re-exports from report
pub use report::{compare, ComparisonReport, DistanceResult, Pipeline, ReportWarning, Side};

/// Compare two point clouds with the default configuration, homology up
/// to `max_dim`.
pub fn compare_clouds(
    cloud_a: PointCloud,
    cloud_b: PointCloud,
    max_dim: usize,
) -> Result<ComparisonReport> {
    let mut config = AnalysisConfig::default();
    config.filtration.max_dim = max_dim;
    config.metric.dims.retain(|&d| d <= max_dim);
    Pipeline::new(config)?.compare_clouds("comparison", cloud_a, cloud_b)
}
