//! Metric Module: Distances Between Persistence Diagrams
//!
//! Two diagrams are compared by optimally matching their points, where any
//! point may instead be sent to its projection on the diagonal d = b
//! ("this feature is noise"):
//!
//!   W_p(A, B) = ( min_γ Σ ‖x − γ(x)‖^p )^{1/p}
//!   W_∞(A, B) =   min_γ max ‖x − γ(x)‖          (bottleneck)
//!
//! ## Solvers
//!
//! Both distances work on the padded square matrix of size |A| + |B|:
//! rows are A's points followed by diagonal slots for B, columns are B's
//! points followed by diagonal slots for A.
//!
//! - Wasserstein: exact minimum-cost assignment (Hungarian algorithm) on
//!   the p-th powers of the ground distances.
//! - Bottleneck: binary search over the distinct matrix entries, testing
//!   each threshold for a perfect matching with Hopcroft-Karp.
//!
//! Essential pairs (death = +∞) are only matched to essential pairs of the
//! same dimension. Unequal counts make the distance infinite.

mod distance;
mod hungarian;
mod threshold;
mod transport;

pub use crate::config::{GroundMetric, MetricConfig, Pooling};
pub use distance::{
    bottleneck, wasserstein, wasserstein_with_matching, DiagramMetric, MatchEndpoint,
    MatchedPair, WassersteinMatching,
};
