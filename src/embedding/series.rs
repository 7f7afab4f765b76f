//! Validated time series values.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TdaError};

/// One observation `(t, v)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub t: f64,
    pub v: f64,
}

impl Sample {
    pub fn new(t: f64, v: f64) -> Self {
        Self { t, v }
    }
}

/// Accepted length range for an input series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesBounds {
    pub min_rows: usize,
    pub max_rows: usize,
}

impl Default for SeriesBounds {
    fn default() -> Self {
        Self {
            min_rows: 100,
            max_rows: 10_000,
        }
    }
}

/// Ordered sequence of samples, strictly increasing in `t`.
///
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    samples: Vec<Sample>,
}

impl TimeSeries {
    /// Validate ordering, finiteness and length against `bounds`.
    pub fn new(samples: Vec<Sample>, bounds: &SeriesBounds) -> Result<Self> {
        let n = samples.len();
        if n < bounds.min_rows || n > bounds.max_rows {
            return Err(TdaError::InvalidSeries(format!(
                "length must be between {} and {} rows, got {}",
                bounds.min_rows, bounds.max_rows, n
            )));
        }

        for (i, s) in samples.iter().enumerate() {
            if !s.t.is_finite() || !s.v.is_finite() {
                return Err(TdaError::InvalidSeries(format!(
                    "sample {} is not finite: ({}, {})",
                    i, s.t, s.v
                )));
            }
        }

        if let Some(i) = samples.windows(2).position(|w| w[1].t <= w[0].t) {
            return Err(TdaError::InvalidSeries(format!(
                "timesteps must be strictly increasing (row {} has t = {} after t = {})",
                i + 1,
                samples[i + 1].t,
                samples[i].t
            )));
        }

        Ok(Self { samples })
    }

    /// Build a series with implicit timesteps `0, 1, 2, ...`.
    ///
    /// No length bounds are applied.
    pub fn from_values(values: &[f64]) -> Self {
        let samples = values
            .iter()
            .enumerate()
            .map(|(i, &v)| Sample::new(i as f64, v))
            .collect();
        Self { samples }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Signal column only.
    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.v).collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(n: usize) -> Vec<Sample> {
        (0..n).map(|i| Sample::new(i as f64, (i as f64).sin())).collect()
    }

    #[test]
    fn test_accepts_ordered_series() {
        let ts = TimeSeries::new(ramp(150), &SeriesBounds::default()).unwrap();
        assert_eq!(ts.len(), 150);
        assert_eq!(ts.values()[1], 1.0_f64.sin());
    }

    #[test]
    fn test_rejects_length_outside_bounds() {
        let bounds = SeriesBounds::default();
        assert!(matches!(
            TimeSeries::new(ramp(99), &bounds),
            Err(TdaError::InvalidSeries(_))
        ));

        let tight = SeriesBounds { min_rows: 2, max_rows: 10 };
        assert!(TimeSeries::new(ramp(11), &tight).is_err());
        assert!(TimeSeries::new(ramp(10), &tight).is_ok());
    }

    #[test]
    fn test_rejects_unordered_timesteps() {
        let mut samples = ramp(120);
        samples.swap(40, 41);
        let err = TimeSeries::new(samples, &SeriesBounds::default()).unwrap_err();
        assert!(err.to_string().contains("strictly increasing"));
    }

    #[test]
    fn test_rejects_non_finite_values() {
        let mut samples = ramp(120);
        samples[7].v = f64::NAN;
        assert!(TimeSeries::new(samples, &SeriesBounds::default()).is_err());
    }
}
