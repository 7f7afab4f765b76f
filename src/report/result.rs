//! Distance results between two diagrams.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::MetricConfig;
use crate::error::Result;
use crate::metric::DiagramMetric;
use crate::topology::PersistenceDiagram;

/// Which input series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    A,
    B,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::A => write!(f, "a"),
            Side::B => write!(f, "b"),
        }
    }
}

/// Why a normalized distance is undefined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationIssue {
    /// The diagram has no finite pairs
    NoFiniteLifetimes,
    /// All finite lifetimes are equal
    ZeroLifetimeSpread,
}

/// Conditions that leave part of a result undefined
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportWarning {
    /// Essential pair counts differ; the distance is infinite
    EssentialCountMismatch { dimensions: Vec<usize> },
    UndefinedNormalization { side: Side, issue: NormalizationIssue },
}

impl fmt::Display for ReportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportWarning::EssentialCountMismatch { dimensions } => write!(
                f,
                "essential pair counts differ in dimensions {:?}; distance is infinite",
                dimensions
            ),
            ReportWarning::UndefinedNormalization { side, issue } => {
                let why = match issue {
                    NormalizationIssue::NoFiniteLifetimes => "it has no finite lifetimes",
                    NormalizationIssue::ZeroLifetimeSpread => "its finite lifetimes are all equal",
                };
                write!(f, "normalized distance for series {} is undefined: {}", side, why)
            }
        }
    }
}

/// Distance between two diagrams plus lifetime normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceResult {
    pub wasserstein: f64,
    pub bottleneck: Option<f64>,
    pub std_lifetime_a: Option<f64>,
    pub std_lifetime_b: Option<f64>,
    pub normalized_a: Option<f64>,
    pub normalized_b: Option<f64>,
    /// Dimensions whose essential counts differ
    pub essential_mismatch: Vec<usize>,
}

impl DistanceResult {
    /// Every undefined or infinite part of this result
    pub fn warnings(&self) -> Vec<ReportWarning> {
        let mut warnings = Vec::new();
        if !self.essential_mismatch.is_empty() {
            warnings.push(ReportWarning::EssentialCountMismatch {
                dimensions: self.essential_mismatch.clone(),
            });
        }
        for (side, std, normalized) in [
            (Side::A, self.std_lifetime_a, self.normalized_a),
            (Side::B, self.std_lifetime_b, self.normalized_b),
        ] {
            if normalized.is_none() {
                let issue = match std {
                    None => NormalizationIssue::NoFiniteLifetimes,
                    Some(_) => NormalizationIssue::ZeroLifetimeSpread,
                };
                warnings.push(ReportWarning::UndefinedNormalization { side, issue });
            }
        }
        warnings
    }
}

fn normalize(distance: f64, std: Option<f64>, side: Side) -> Option<f64> {
    match std {
        Some(s) if s > 0.0 => Some(distance / s),
        // identical diagrams: nothing to normalize
        Some(_) if distance == 0.0 => Some(0.0),
        _ => {
            tracing::warn!(%side, ?std, "lifetime spread unusable; normalized distance undefined");
            None
        }
    }
}

/// Compare two diagrams under `config`.
pub fn compare(
    a: &PersistenceDiagram,
    b: &PersistenceDiagram,
    config: &MetricConfig,
) -> Result<DistanceResult> {
    compare_with(&DiagramMetric::new(config.clone())?, a, b)
}

/// Compare two diagrams with a prepared metric.
pub fn compare_with(
    metric: &DiagramMetric,
    a: &PersistenceDiagram,
    b: &PersistenceDiagram,
) -> Result<DistanceResult> {
    let matching = metric.wasserstein_with_matching(a, b)?;
    let wasserstein = matching.distance;
    let bottleneck = if metric.config().compute_bottleneck {
        Some(metric.bottleneck(a, b)?)
    } else {
        None
    };

    let std_lifetime_a = a.lifetime_std();
    let std_lifetime_b = b.lifetime_std();

    let result = DistanceResult {
        wasserstein,
        bottleneck,
        std_lifetime_a,
        std_lifetime_b,
        normalized_a: normalize(wasserstein, std_lifetime_a, Side::A),
        normalized_b: normalize(wasserstein, std_lifetime_b, Side::B),
        essential_mismatch: matching.essential_mismatch,
    };

    tracing::info!(
        wasserstein = result.wasserstein,
        bottleneck = ?result.bottleneck,
        normalized_a = ?result.normalized_a,
        normalized_b = ?result.normalized_b,
        "diagrams compared"
    );
    Ok(result)
}
