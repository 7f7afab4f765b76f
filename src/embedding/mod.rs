//! Embedding Module: From Scalar Series to Point Clouds
//!
//! A scalar observable s(t) of a dynamical system is unfolded into ℝ^d by
//! stacking time-lagged copies (Takens' delay embedding):
//!
//!   x(i) = (s(i), s(i+τ), ..., s(i+(d-1)τ))
//!
//! Under mild conditions the reconstructed trajectory has the same topology
//! as the underlying attractor, so a periodic signal traces out a loop that
//! persistent homology can detect as a long-lived H₁ class.
//!
//! Parameters are fixed by the caller; no autocorrelation or mutual
//! information search is performed.

mod series;
mod takens;

pub use series::{Sample, SeriesBounds, TimeSeries};
pub use takens::{embed, embed_series, PointCloud};
