//! Report Module: Comparing Two Series
//!
//! Runs the two independent pipelines (embedding → filtration → diagram)
//! on separate rayon tasks, joins them, and measures how far apart the
//! diagrams are. The raw Wasserstein distance is scale dependent, so it is
//! also divided by each diagram's spread of finite lifetimes:
//!
//!   normalized_x = W_p(A, B) / std(lifetimes of x)
//!
//! A diagram without finite lifetimes (or with all lifetimes equal) has no
//! usable spread; the normalized value is then `None` and a warning is
//! attached to the report instead of a division by zero.

mod pipeline;
mod result;

pub use pipeline::{ArtifactKind, ComparisonReport, Pipeline};
pub use result::{compare, compare_with, DistanceResult, NormalizationIssue, ReportWarning, Side};
