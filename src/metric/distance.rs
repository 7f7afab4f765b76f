//! Wasserstein and bottleneck distances with pooling and essential handling.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::transport::{finite_points, match_essentials, EssentialMatching, Slot, TransportProblem};
use super::{hungarian, threshold};
use crate::cancel::CancellationToken;
use crate::config::{MetricConfig, Pooling};
use crate::error::Result;
use crate::topology::PersistenceDiagram;

/// One side of a match: a diagram point or the diagonal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchEndpoint {
    /// `diagram.pairs(dimension)[index]`
    Point { dimension: usize, index: usize },
    Diagonal,
}

/// A matched couple and its ground distance (not raised to p)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchedPair {
    pub a: MatchEndpoint,
    pub b: MatchEndpoint,
    pub cost: f64,
}

/// Wasserstein distance together with an optimal matching
///
/// Diagonal-to-diagonal matches are omitted. When essential counts differ,
/// `distance` is infinite, the affected dimensions are listed and only the
/// finite points (plus essentials of agreeing dimensions) appear in
/// `matches`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WassersteinMatching {
    pub distance: f64,
    pub matches: Vec<MatchedPair>,
    pub essential_mismatch: Vec<usize>,
}

/// Distances between persistence diagrams under one configuration
#[derive(Debug, Clone)]
pub struct DiagramMetric {
    config: MetricConfig,
    cancel: CancellationToken,
}

impl DiagramMetric {
    pub fn new(config: MetricConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            cancel: CancellationToken::new(),
        })
    }

    /// Check `cancel` before each transport solve.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &MetricConfig {
        &self.config
    }

    /// Dimensions among the requested ones whose essential counts differ
    pub fn essential_mismatch(&self, a: &PersistenceDiagram, b: &PersistenceDiagram) -> Vec<usize> {
        match_essentials(a, b, &self.config.dims).mismatched
    }

    pub fn wasserstein(&self, a: &PersistenceDiagram, b: &PersistenceDiagram) -> Result<f64> {
        Ok(self.wasserstein_with_matching(a, b)?.distance)
    }

    pub fn wasserstein_with_matching(
        &self,
        a: &PersistenceDiagram,
        b: &PersistenceDiagram,
    ) -> Result<WassersteinMatching> {
        let p = self.config.p;
        let essentials = match_essentials(a, b, &self.config.dims);
        let problems = self.problems(a, b);

        // Costs are divided by the largest one before raising to p, so that
        // d^p cannot overflow; the root is scaled back at the end.
        let scale = problems
            .iter()
            .flat_map(|problem| problem.distances.iter().copied())
            .chain(essentials.gaps())
            .filter(|d| d.is_finite())
            .fold(0.0, f64::max);
        let scale = if scale > 0.0 { scale } else { 1.0 };

        let solved: Vec<(f64, Vec<MatchedPair>)> = problems
            .par_iter()
            .map(|problem| {
                self.cancel.checkpoint("wasserstein matching")?;
                Ok(solve_transport(problem, p, scale))
            })
            .collect::<Result<_>>()?;

        let mut total = 0.0;
        let mut matches = Vec::new();
        for (cost, mut pairs) in solved {
            total += cost;
            matches.append(&mut pairs);
        }

        total += essentials.gaps().map(|g| (g / scale).powf(p)).sum::<f64>();
        matches.extend(essential_matches(&essentials));

        let distance = if essentials.mismatched.is_empty() {
            scale * total.powf(1.0 / p)
        } else {
            warn_mismatch(&essentials.mismatched, "wasserstein");
            f64::INFINITY
        };

        Ok(WassersteinMatching {
            distance,
            matches,
            essential_mismatch: essentials.mismatched,
        })
    }

    pub fn bottleneck(&self, a: &PersistenceDiagram, b: &PersistenceDiagram) -> Result<f64> {
        let essentials = match_essentials(a, b, &self.config.dims);
        if !essentials.mismatched.is_empty() {
            warn_mismatch(&essentials.mismatched, "bottleneck");
            return Ok(f64::INFINITY);
        }

        let finite: Vec<f64> = self
            .problems(a, b)
            .par_iter()
            .map(|problem| {
                self.cancel.checkpoint("bottleneck matching")?;
                Ok(threshold::solve(&problem.distances))
            })
            .collect::<Result<_>>()?;

        Ok(finite
            .into_iter()
            .chain(essentials.gaps())
            .fold(0.0, f64::max))
    }

    /// One transport problem per pooled group of finite points.
    fn problems(&self, a: &PersistenceDiagram, b: &PersistenceDiagram) -> Vec<TransportProblem> {
        let dims = &self.config.dims;
        let ground = self.config.ground;
        match self.config.pooling {
            Pooling::Stacked => vec![TransportProblem::new(
                finite_points(a, dims),
                finite_points(b, dims),
                ground,
            )],
            Pooling::PerDimension => dims
                .iter()
                .map(|&d| {
                    let single: BTreeSet<usize> = [d].into_iter().collect();
                    TransportProblem::new(
                        finite_points(a, &single),
                        finite_points(b, &single),
                        ground,
                    )
                })
                .collect(),
        }
    }
}

/// Optimal assignment of one problem: Σ (cost / scale)^p and the
/// non-trivial matches.
fn solve_transport(problem: &TransportProblem, p: f64, scale: f64) -> (f64, Vec<MatchedPair>) {
    let powered = problem.distances.mapv(|d| (d / scale).powf(p));
    let assignment = hungarian::solve(&powered);

    let mut total = 0.0;
    let mut matches = Vec::new();
    for (row, &col) in assignment.iter().enumerate() {
        total += powered[[row, col]];

        let a = match problem.row_slot(row) {
            Slot::Point(i) => endpoint(problem.a[i].dimension, problem.a[i].index),
            Slot::Diagonal => MatchEndpoint::Diagonal,
        };
        let b = match problem.col_slot(col) {
            Slot::Point(j) => endpoint(problem.b[j].dimension, problem.b[j].index),
            Slot::Diagonal => MatchEndpoint::Diagonal,
        };
        if a != MatchEndpoint::Diagonal || b != MatchEndpoint::Diagonal {
            matches.push(MatchedPair {
                a,
                b,
                cost: problem.distances[[row, col]],
            });
        }
    }

    tracing::debug!(size = problem.size(), cost = total, "transport problem solved");
    (total, matches)
}

fn endpoint(dimension: usize, index: usize) -> MatchEndpoint {
    MatchEndpoint::Point { dimension, index }
}

fn essential_matches(essentials: &EssentialMatching) -> impl Iterator<Item = MatchedPair> + '_ {
    essentials.pairs.iter().map(|(a, b)| MatchedPair {
        a: endpoint(a.dimension, a.index),
        b: endpoint(b.dimension, b.index),
        cost: (a.birth - b.birth).abs(),
    })
}

fn warn_mismatch(dims: &[usize], distance: &'static str) {
    tracing::warn!(
        ?dims,
        distance,
        "essential pair counts differ; distance is infinite"
    );
}

/// Wasserstein-p distance between two diagrams.
pub fn wasserstein(
    a: &PersistenceDiagram,
    b: &PersistenceDiagram,
    config: &MetricConfig,
) -> Result<f64> {
    DiagramMetric::new(config.clone())?.wasserstein(a, b)
}

/// Wasserstein-p distance and an optimal matching.
pub fn wasserstein_with_matching(
    a: &PersistenceDiagram,
    b: &PersistenceDiagram,
    config: &MetricConfig,
) -> Result<WassersteinMatching> {
    DiagramMetric::new(config.clone())?.wasserstein_with_matching(a, b)
}

/// Bottleneck distance between two diagrams.
pub fn bottleneck(
    a: &PersistenceDiagram,
    b: &PersistenceDiagram,
    config: &MetricConfig,
) -> Result<f64> {
    DiagramMetric::new(config.clone())?.bottleneck(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GroundMetric;
    use crate::error::TdaError;
    use crate::topology::PersistencePair;
    use approx::assert_relative_eq;

    fn h1(points: &[(f64, f64)]) -> PersistenceDiagram {
        PersistenceDiagram::from_pairs(points.iter().map(|&(b, d)| PersistencePair::new(1, b, d)))
    }

    fn config(p: f64, pooling: Pooling) -> MetricConfig {
        MetricConfig {
            p,
            dims: [0, 1].into_iter().collect(),
            pooling,
            ..MetricConfig::default()
        }
    }

    #[test]
    fn test_both_empty_is_zero() {
        let empty = PersistenceDiagram::default();
        let cfg = MetricConfig::default();
        assert_eq!(wasserstein(&empty, &empty, &cfg).unwrap(), 0.0);
        assert_eq!(bottleneck(&empty, &empty, &cfg).unwrap(), 0.0);
    }

    #[test]
    fn test_one_side_empty_goes_to_diagonal() {
        let a = h1(&[(0.0, 2.0), (1.0, 2.0)]);
        let empty = PersistenceDiagram::default();

        // p = 1: sum of diagonal distances (2 + 1) / √2
        let w1 = wasserstein(&a, &empty, &config(1.0, Pooling::Stacked)).unwrap();
        assert_relative_eq!(w1, 3.0 / 2.0_f64.sqrt(), epsilon = 1e-12);

        // p = 2: sqrt(2 + 0.5)
        let w2 = wasserstein(&empty, &a, &config(2.0, Pooling::Stacked)).unwrap();
        assert_relative_eq!(w2, 2.5_f64.sqrt(), epsilon = 1e-12);

        let b = bottleneck(&a, &empty, &MetricConfig::default()).unwrap();
        assert_relative_eq!(b, 2.0 / 2.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_prefers_diagonal_when_cheaper() {
        // two short-lived points far apart: each goes to the diagonal
        let a = h1(&[(0.0, 0.2)]);
        let b = h1(&[(5.0, 5.2)]);
        let m = wasserstein_with_matching(&a, &b, &config(1.0, Pooling::Stacked)).unwrap();
        assert_relative_eq!(m.distance, 0.4 / 2.0_f64.sqrt(), epsilon = 1e-12);
        assert_eq!(m.matches.len(), 2);
        assert!(m.matches.iter().all(|pair| {
            pair.a == MatchEndpoint::Diagonal || pair.b == MatchEndpoint::Diagonal
        }));
    }

    #[test]
    fn test_matching_points_at_each_other() {
        let a = h1(&[(0.0, 4.0)]);
        let b = h1(&[(0.0, 3.0)]);
        let m = wasserstein_with_matching(&a, &b, &config(2.0, Pooling::Stacked)).unwrap();
        assert_relative_eq!(m.distance, 1.0, epsilon = 1e-12);
        assert_eq!(
            m.matches,
            vec![MatchedPair {
                a: MatchEndpoint::Point { dimension: 1, index: 0 },
                b: MatchEndpoint::Point { dimension: 1, index: 0 },
                cost: 1.0,
            }]
        );
    }

    #[test]
    fn test_per_dimension_forbids_cross_dimension_matches() {
        let a = PersistenceDiagram::from_pairs(vec![PersistencePair::new(0, 0.0, 3.0)]);
        let b = PersistenceDiagram::from_pairs(vec![PersistencePair::new(1, 0.0, 3.0)]);

        let stacked = wasserstein(&a, &b, &config(2.0, Pooling::Stacked)).unwrap();
        assert!(stacked.abs() < 1e-12);

        let split = wasserstein(&a, &b, &config(2.0, Pooling::PerDimension)).unwrap();
        // both points go to the diagonal: sqrt(2 * (3/√2)²) = 3
        assert_relative_eq!(split, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_essential_mismatch_is_infinite() {
        let a = PersistenceDiagram::from_pairs(vec![
            PersistencePair::essential(0, 0.0),
            PersistencePair::essential(1, 1.0),
        ]);
        let b = PersistenceDiagram::from_pairs(vec![PersistencePair::essential(0, 0.0)]);
        let cfg = MetricConfig::default();

        let m = wasserstein_with_matching(&a, &b, &cfg).unwrap();
        assert!(m.distance.is_infinite());
        assert_eq!(m.essential_mismatch, vec![1]);
        assert!(bottleneck(&a, &b, &cfg).unwrap().is_infinite());

        // H1 not requested: counts only matter for compared dimensions
        let h0_only = MetricConfig {
            dims: [0].into_iter().collect(),
            ..MetricConfig::default()
        };
        assert_eq!(wasserstein(&a, &b, &h0_only).unwrap(), 0.0);
    }

    #[test]
    fn test_essential_births_contribute() {
        let a = PersistenceDiagram::from_pairs(vec![PersistencePair::essential(1, 1.0)]);
        let b = PersistenceDiagram::from_pairs(vec![PersistencePair::essential(1, 1.5)]);
        let cfg = MetricConfig::default();
        assert_relative_eq!(wasserstein(&a, &b, &cfg).unwrap(), 0.5, epsilon = 1e-12);
        assert_relative_eq!(bottleneck(&a, &b, &cfg).unwrap(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_chebyshev_ground_metric() {
        let a = h1(&[(0.0, 2.0)]);
        let empty = PersistenceDiagram::default();
        let cfg = MetricConfig {
            ground: GroundMetric::Chebyshev,
            ..MetricConfig::default()
        };
        assert_relative_eq!(bottleneck(&a, &empty, &cfg).unwrap(), 1.0);
    }

    #[test]
    fn test_large_exponent_on_large_diagrams() {
        let with_component = |birth: f64, death: f64| {
            PersistenceDiagram::from_pairs(vec![
                PersistencePair::new(1, birth, death),
                PersistencePair::essential(0, 0.0),
            ])
        };
        let a = with_component(0.0, 20.0);
        let b = with_component(100.0, 300.0);
        let cfg = MetricConfig {
            p: 200.0,
            ..MetricConfig::default()
        };

        // both points go to the diagonal; the larger one dominates
        let w = wasserstein(&a, &b, &cfg).unwrap();
        assert!(w.is_finite());
        assert_relative_eq!(w, 200.0 / 2.0_f64.sqrt(), max_relative = 1e-9);
        assert!(bottleneck(&a, &b, &cfg).unwrap() <= w + 1e-9);
    }

    #[test]
    fn test_rejects_small_exponent() {
        let empty = PersistenceDiagram::default();
        assert!(matches!(
            wasserstein(&empty, &empty, &config(0.5, Pooling::Stacked)),
            Err(TdaError::InvalidParameter { parameter: "p", .. })
        ));
    }

    #[test]
    fn test_cancelled_metric() {
        let token = CancellationToken::new();
        token.cancel();
        let metric = DiagramMetric::new(MetricConfig::default())
            .unwrap()
            .with_cancellation(token);
        let a = h1(&[(0.0, 1.0)]);
        assert!(matches!(
            metric.wasserstein(&a, &a),
            Err(TdaError::Cancelled { .. })
        ));
    }
}
