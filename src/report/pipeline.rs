//! End-to-end comparison of two inputs.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::result::{compare_with, DistanceResult, ReportWarning, Side};
use crate::cancel::CancellationToken;
use crate::config::AnalysisConfig;
use crate::embedding::{embed_series, PointCloud, TimeSeries};
use crate::error::{Result, TdaError};
use crate::metric::DiagramMetric;
use crate::topology::{analyze_with, PersistenceDiagram};

/// Kinds of artifact a presentation layer may write for a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    PointCloud,
    PersistenceDiagram,
    Distance,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArtifactKind::PointCloud => "point_cloud",
            ArtifactKind::PersistenceDiagram => "diagram",
            ArtifactKind::Distance => "distance",
        };
        f.write_str(name)
    }
}

/// Everything computed for one comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Caller-chosen name for this run
    pub label: String,
    pub cloud_a: PointCloud,
    pub cloud_b: PointCloud,
    pub diagram_a: PersistenceDiagram,
    pub diagram_b: PersistenceDiagram,
    pub distance: DistanceResult,
    pub warnings: Vec<ReportWarning>,
}

impl ComparisonReport {
    /// File stem for an artifact of this report, e.g. `run7_diagram_a`.
    ///
    /// `side` is ignored for [`ArtifactKind::Distance`], which covers both.
    pub fn artifact_name(&self, kind: ArtifactKind, side: Option<Side>) -> String {
        match (kind, side) {
            (ArtifactKind::Distance, _) | (_, None) => format!("{}_{}", self.label, kind),
            (_, Some(side)) => format!("{}_{}_{}", self.label, kind, side),
        }
    }

    pub fn diagram(&self, side: Side) -> &PersistenceDiagram {
        match side {
            Side::A => &self.diagram_a,
            Side::B => &self.diagram_b,
        }
    }

    pub fn cloud(&self, side: Side) -> &PointCloud {
        match side {
            Side::A => &self.cloud_a,
            Side::B => &self.cloud_b,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| TdaError::Config(e.to_string()))
    }
}

/// Configured comparison pipeline
///
/// ```text
/// series ─embed─▶ cloud ─Rips─▶ filtration ─reduce─▶ diagram ┐
///                                                            ├─▶ distance
/// series ─embed─▶ cloud ─Rips─▶ filtration ─reduce─▶ diagram ┘
/// ```
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: AnalysisConfig,
    metric: DiagramMetric,
    cancel: CancellationToken,
}

impl Pipeline {
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        let metric = DiagramMetric::new(config.metric.clone())?;
        Ok(Self {
            config,
            metric,
            cancel: CancellationToken::new(),
        })
    }

    /// Observe `cancel` at every stage boundary.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.metric = self.metric.with_cancellation(cancel.clone());
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Validate, embed, and compare two raw series.
    pub fn analyze_series(
        &self,
        label: impl Into<String>,
        series_a: &TimeSeries,
        series_b: &TimeSeries,
    ) -> Result<ComparisonReport> {
        let bounds = &self.config.series_bounds;
        for series in [series_a, series_b] {
            if series.len() < bounds.min_rows || series.len() > bounds.max_rows {
                return Err(TdaError::InvalidSeries(format!(
                    "length must be between {} and {} rows, got {}",
                    bounds.min_rows,
                    bounds.max_rows,
                    series.len()
                )));
            }
        }

        let (dimension, lag) = (self.config.embedding.dimension, self.config.embedding.lag);
        let cloud_a = embed_series(series_a, dimension, lag)?;
        let cloud_b = embed_series(series_b, dimension, lag)?;
        self.compare_clouds(label, cloud_a, cloud_b)
    }

    /// Build both diagrams in parallel and measure their distance.
    pub fn compare_clouds(
        &self,
        label: impl Into<String>,
        cloud_a: PointCloud,
        cloud_b: PointCloud,
    ) -> Result<ComparisonReport> {
        let label = label.into();
        let filtration = &self.config.filtration;

        let (diagram_a, diagram_b) = rayon::join(
            || analyze_with(&cloud_a, filtration, &self.cancel),
            || analyze_with(&cloud_b, filtration, &self.cancel),
        );
        let (diagram_a, diagram_b) = (diagram_a?, diagram_b?);
        tracing::debug!(
            label = %label,
            pairs_a = diagram_a.len(),
            pairs_b = diagram_b.len(),
            "diagrams ready"
        );

        self.cancel.checkpoint("diagram comparison")?;
        let distance = compare_with(&self.metric, &diagram_a, &diagram_b)?;
        let warnings = distance.warnings();

        Ok(ComparisonReport {
            label,
            cloud_a,
            cloud_b,
            diagram_a,
            diagram_b,
            distance,
            warnings,
        })
    }
}
