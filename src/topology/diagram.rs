//! Persistence Diagrams
//!
//! A persistence pair (b, d) records a homology class born at scale b and
//! killed at scale d; d = +∞ marks an essential class that never dies.
//! A diagram groups pairs by homology dimension, making the finite /
//! essential split and dimension pooling explicit.
//!
//! ## Interpretation
//!
//! - Long-lived features (large d-b) represent robust topological structure
//! - Short-lived features sit near the diagonal and are usually noise
//! - A delay-embedded periodic signal shows one dominant H₁ pair

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A persistence pair `[birth, death)` in one homology dimension
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersistencePair {
    pub dimension: usize,
    pub birth: f64,
    /// `f64::INFINITY` for essential classes
    #[serde(with = "death_serde")]
    pub death: f64,
}

impl PersistencePair {
    pub fn new(dimension: usize, birth: f64, death: f64) -> Self {
        debug_assert!(birth <= death, "birth {} after death {}", birth, death);
        Self {
            dimension,
            birth,
            death,
        }
    }

    pub fn essential(dimension: usize, birth: f64) -> Self {
        Self::new(dimension, birth, f64::INFINITY)
    }

    /// Lifetime of the feature (infinite for essential pairs)
    pub fn lifetime(&self) -> f64 {
        if self.is_essential() {
            f64::INFINITY
        } else {
            self.death - self.birth
        }
    }

    pub fn is_essential(&self) -> bool {
        self.death.is_infinite()
    }
}

/// JSON has no infinity; essential deaths are written as `null`.
mod death_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(death: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        let value = if death.is_infinite() { None } else { Some(*death) };
        value.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}

/// Persistence diagram: pairs grouped by homology dimension
///
/// Within a dimension, pairs keep the order they were produced in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistenceDiagram {
    groups: BTreeMap<usize, Vec<PersistencePair>>,
}

impl PersistenceDiagram {
    /// Empty diagram with the given dimensions present
    pub fn with_dimensions(dims: impl IntoIterator<Item = usize>) -> Self {
        Self {
            groups: dims.into_iter().map(|d| (d, Vec::new())).collect(),
        }
    }

    /// Group `pairs` by dimension, preserving their relative order.
    pub fn from_pairs(pairs: impl IntoIterator<Item = PersistencePair>) -> Self {
        let mut diagram = Self::default();
        for pair in pairs {
            diagram.push(pair);
        }
        diagram
    }

    pub(crate) fn push(&mut self, pair: PersistencePair) {
        self.groups.entry(pair.dimension).or_default().push(pair);
    }

    /// Dimensions present in the diagram, ascending
    pub fn dimensions(&self) -> impl Iterator<Item = usize> + '_ {
        self.groups.keys().copied()
    }

    /// All pairs of dimension `d`
    pub fn pairs(&self, d: usize) -> &[PersistencePair] {
        self.groups.get(&d).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Finite pairs of dimension `d`
    pub fn finite(&self, d: usize) -> impl Iterator<Item = &PersistencePair> + '_ {
        self.pairs(d).iter().filter(|p| !p.is_essential())
    }

    /// Essential pairs of dimension `d`
    pub fn essential(&self, d: usize) -> impl Iterator<Item = &PersistencePair> + '_ {
        self.pairs(d).iter().filter(|p| p.is_essential())
    }

    /// Every pair, by dimension then production order
    pub fn iter(&self) -> impl Iterator<Item = &PersistencePair> + '_ {
        self.groups.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Finite lifetimes pooled across all dimensions
    pub fn finite_lifetimes(&self) -> Vec<f64> {
        self.iter()
            .filter(|p| !p.is_essential())
            .map(PersistencePair::lifetime)
            .collect()
    }

    /// Population standard deviation of finite lifetimes across all
    /// dimensions; `None` when there are no finite pairs.
    pub fn lifetime_std(&self) -> Option<f64> {
        let lifetimes = self.finite_lifetimes();
        if lifetimes.is_empty() {
            return None;
        }
        let n = lifetimes.len() as f64;
        let mean = lifetimes.iter().sum::<f64>() / n;
        let variance = lifetimes.iter().map(|l| (l - mean).powi(2)).sum::<f64>() / n;
        Some(variance.sqrt())
    }

    /// Total persistence for dimension d
    pub fn total_persistence(&self, d: usize) -> f64 {
        self.finite(d).map(PersistencePair::lifetime).sum()
    }

    /// Maximum finite persistence in dimension d
    pub fn max_persistence(&self, d: usize) -> f64 {
        self.finite(d).map(PersistencePair::lifetime).fold(0.0, f64::max)
    }

    /// Shannon entropy of normalized finite lifetimes in dimension d
    ///
    /// H = -Σᵢ pᵢ ln(pᵢ), pᵢ = lᵢ / Σⱼ lⱼ
    pub fn persistence_entropy(&self, d: usize) -> f64 {
        let lifetimes: Vec<f64> = self
            .finite(d)
            .map(PersistencePair::lifetime)
            .filter(|&l| l > 0.0)
            .collect();

        let total: f64 = lifetimes.iter().sum();
        if total <= 0.0 {
            return 0.0;
        }

        lifetimes
            .iter()
            .map(|l| l / total)
            .map(|p| -p * p.ln())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample() -> PersistenceDiagram {
        PersistenceDiagram::from_pairs(vec![
            PersistencePair::new(0, 0.0, 1.0),
            PersistencePair::new(1, 0.5, 2.0),
            PersistencePair::new(0, 0.0, 3.0),
            PersistencePair::essential(0, 0.0),
        ])
    }

    #[test]
    fn test_grouping_preserves_order() {
        let pd = sample();
        assert_eq!(pd.dimensions().collect::<Vec<_>>(), vec![0, 1]);
        let deaths: Vec<f64> = pd.pairs(0).iter().map(|p| p.death).collect();
        assert_eq!(deaths[..2], [1.0, 3.0]);
        assert!(deaths[2].is_infinite());
        assert_eq!(pd.essential(0).count(), 1);
        assert!(pd.pairs(2).is_empty());
        assert_eq!(pd.len(), 4);
    }

    #[test]
    fn test_lifetime_std_pools_dimensions() {
        // lifetimes 1, 1.5, 3 -> mean 11/6
        let std = sample().lifetime_std().unwrap();
        let mean: f64 = 11.0 / 6.0;
        let var = ((1.0 - mean).powi(2) + (1.5 - mean).powi(2) + (3.0 - mean).powi(2)) / 3.0;
        assert_relative_eq!(std, var.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_lifetime_std_none_without_finite_pairs() {
        let pd = PersistenceDiagram::from_pairs(vec![
            PersistencePair::essential(0, 0.0),
            PersistencePair::essential(1, 0.7),
        ]);
        assert_eq!(pd.lifetime_std(), None);
        assert_eq!(PersistenceDiagram::default().lifetime_std(), None);
    }

    #[test]
    fn test_entropy_uniform() {
        let pd = PersistenceDiagram::from_pairs(vec![
            PersistencePair::new(1, 0.0, 1.0),
            PersistencePair::new(1, 1.0, 2.0),
            PersistencePair::new(1, 2.0, 3.0),
        ]);
        assert_relative_eq!(pd.persistence_entropy(1), 3.0_f64.ln(), epsilon = 1e-12);
        assert_relative_eq!(pd.total_persistence(1), 3.0);
        assert_eq!(pd.persistence_entropy(0), 0.0);
    }

    #[test]
    fn test_json_round_trip_keeps_essential_pairs() {
        let pd = sample();
        let json = serde_json::to_string(&pd).unwrap();
        assert!(json.contains("null"));
        let back: PersistenceDiagram = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pd);
    }
}
