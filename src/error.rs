//! Error type shared by every stage of the pipeline.
//!
//! Precondition failures (bad embedding parameters, degenerate clouds,
//! malformed series) are detected before any expensive work starts and are
//! always reported to the caller. Conditions that only make part of a result
//! undefined, such as an essential-count mismatch or a zero lifetime spread,
//! are carried as warnings on the result instead.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TdaError {
    #[error("invalid parameter `{parameter}`: {reason}")]
    InvalidParameter {
        parameter: &'static str,
        reason: String,
    },
    #[error("degenerate input: a filtration needs at least 2 points, got {points}")]
    DegenerateInput { points: usize },
    #[error("invalid series: {0}")]
    InvalidSeries(String),
    #[error("computation cancelled during {stage}")]
    Cancelled { stage: &'static str },
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl TdaError {
    pub(crate) fn invalid(parameter: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TdaError>;
