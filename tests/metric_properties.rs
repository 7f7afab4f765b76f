//! Property-based tests for diagram distances.
//!
//! Diagrams are drawn with exactly one essential H₀ class each, so every
//! distance is finite and the metric axioms can be checked directly.

use proptest::prelude::*;
use tda_series::{
    bottleneck, wasserstein, GroundMetric, MetricConfig, PersistenceDiagram, PersistencePair,
    Pooling,
};

fn pair(dimension: usize) -> impl Strategy<Value = PersistencePair> {
    (0.0..5.0f64, 0.01..3.0f64)
        .prop_map(move |(birth, life)| PersistencePair::new(dimension, birth, birth + life))
}

fn diagram() -> impl Strategy<Value = PersistenceDiagram> {
    (
        prop::collection::vec(pair(0), 0..6),
        prop::collection::vec(pair(1), 0..5),
        0.0..1.0f64,
    )
        .prop_map(|(h0, h1, essential_birth)| {
            PersistenceDiagram::from_pairs(
                h0.into_iter()
                    .chain(h1)
                    .chain(std::iter::once(PersistencePair::essential(0, essential_birth))),
            )
        })
}

fn config() -> impl Strategy<Value = MetricConfig> {
    (
        1.0..4.0f64,
        prop_oneof![Just(Pooling::Stacked), Just(Pooling::PerDimension)],
        prop_oneof![Just(GroundMetric::Euclidean), Just(GroundMetric::Chebyshev)],
    )
        .prop_map(|(p, pooling, ground)| MetricConfig {
            p,
            pooling,
            ground,
            ..MetricConfig::default()
        })
}

fn close(x: f64, y: f64) -> bool {
    (x - y).abs() <= 1e-9 * (1.0 + x.abs().max(y.abs()))
}

// =============================================================================
// Metric Axioms
// =============================================================================

proptest! {
    /// d(A, A) = 0
    #[test]
    fn prop_identity(a in diagram(), cfg in config()) {
        prop_assert!(wasserstein(&a, &a, &cfg).unwrap().abs() < 1e-9);
        prop_assert!(bottleneck(&a, &a, &cfg).unwrap().abs() < 1e-9);
    }

    /// d(A, B) = d(B, A)
    #[test]
    fn prop_symmetry(a in diagram(), b in diagram(), cfg in config()) {
        let ab = wasserstein(&a, &b, &cfg).unwrap();
        let ba = wasserstein(&b, &a, &cfg).unwrap();
        prop_assert!(close(ab, ba), "W(a,b) = {} but W(b,a) = {}", ab, ba);

        let ab = bottleneck(&a, &b, &cfg).unwrap();
        let ba = bottleneck(&b, &a, &cfg).unwrap();
        prop_assert!(close(ab, ba), "B(a,b) = {} but B(b,a) = {}", ab, ba);
    }

    /// d(A, C) ≤ d(A, B) + d(B, C)
    #[test]
    fn prop_triangle_inequality(a in diagram(), b in diagram(), c in diagram()) {
        let cfg = MetricConfig::default();
        let ac = wasserstein(&a, &c, &cfg).unwrap();
        let ab = wasserstein(&a, &b, &cfg).unwrap();
        let bc = wasserstein(&b, &c, &cfg).unwrap();
        prop_assert!(ac <= ab + bc + 1e-9, "{} > {} + {}", ac, ab, bc);

        let ac = bottleneck(&a, &c, &cfg).unwrap();
        let ab = bottleneck(&a, &b, &cfg).unwrap();
        let bc = bottleneck(&b, &c, &cfg).unwrap();
        prop_assert!(ac <= ab + bc + 1e-9, "{} > {} + {}", ac, ab, bc);
    }

    /// Distances are non-negative and finite when essential counts agree
    #[test]
    fn prop_non_negative(a in diagram(), b in diagram(), cfg in config()) {
        let w = wasserstein(&a, &b, &cfg).unwrap();
        prop_assert!(w.is_finite());
        prop_assert!(w >= 0.0);
    }
}

// =============================================================================
// Relations Between Distances
// =============================================================================

proptest! {
    /// W∞ ≤ W_p for any p ≥ 1
    #[test]
    fn prop_bottleneck_below_wasserstein(a in diagram(), b in diagram(), cfg in config()) {
        let w = wasserstein(&a, &b, &cfg).unwrap();
        let inf = bottleneck(&a, &b, &cfg).unwrap();
        prop_assert!(inf <= w + 1e-9, "bottleneck {} above wasserstein {}", inf, w);
    }

    /// Adding a zero-length pair changes nothing
    #[test]
    fn prop_diagonal_points_are_free(a in diagram(), x in 0.0..5.0f64) {
        let cfg = MetricConfig::default();
        let mut pairs: Vec<PersistencePair> = a.iter().copied().collect();
        pairs.push(PersistencePair::new(1, x, x));
        let padded = PersistenceDiagram::from_pairs(pairs);
        prop_assert!(wasserstein(&a, &padded, &cfg).unwrap().abs() < 1e-9);
    }
}
