//! Betti Numbers: Topological Invariants
//!
//! The k-th Betti number βₖ counts the number of k-dimensional
//! "holes" in a topological space:
//!
//! - β₀: Number of connected components
//! - β₁: Number of 1-dimensional loops/cycles
//! - β₂: Number of 2-dimensional voids/cavities
//!
//! At scale r, βₖ equals the number of pairs of dimension k with
//! birth ≤ r < death, so Betti numbers are read directly off a diagram.

use super::diagram::PersistenceDiagram;

/// Betti numbers at a specific filtration value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BettiNumbers {
    /// Connected components
    pub beta_0: usize,
    /// Loops
    pub beta_1: usize,
    /// Voids
    pub beta_2: usize,
    /// Filtration scale
    pub radius: f64,
}

impl BettiNumbers {
    /// Betti numbers of the Rips complex at `radius`
    pub fn at_radius(diagram: &PersistenceDiagram, radius: f64) -> Self {
        let alive = |d: usize| {
            diagram
                .pairs(d)
                .iter()
                .filter(|p| p.birth <= radius && radius < p.death)
                .count()
        };

        Self {
            beta_0: alive(0),
            beta_1: alive(1),
            beta_2: alive(2),
            radius,
        }
    }

    /// Total topological complexity
    pub fn total(&self) -> usize {
        self.beta_0 + self.beta_1 + self.beta_2
    }

    /// Euler characteristic χ = β₀ - β₁ + β₂
    pub fn euler_characteristic(&self) -> i64 {
        self.beta_0 as i64 - self.beta_1 as i64 + self.beta_2 as i64
    }
}

/// Betti curve: sequence of Betti numbers across filtration
#[derive(Debug, Clone)]
pub struct BettiCurve {
    pub values: Vec<BettiNumbers>,
}

impl BettiCurve {
    /// Sample `n_steps + 1` evenly spaced radii from 0 to the largest finite
    /// death in the diagram.
    pub fn compute(diagram: &PersistenceDiagram, n_steps: usize) -> Self {
        let max_radius = diagram
            .iter()
            .filter(|p| !p.is_essential())
            .map(|p| p.death)
            .fold(0.0, f64::max);
        let n_steps = n_steps.max(1);

        let values = (0..=n_steps)
            .map(|step| max_radius * step as f64 / n_steps as f64)
            .map(|r| BettiNumbers::at_radius(diagram, r))
            .collect();

        Self { values }
    }

    /// Get β₀ curve
    pub fn beta_0_curve(&self) -> Vec<(f64, usize)> {
        self.values.iter().map(|b| (b.radius, b.beta_0)).collect()
    }

    /// Get β₁ curve
    pub fn beta_1_curve(&self) -> Vec<(f64, usize)> {
        self.values.iter().map(|b| (b.radius, b.beta_1)).collect()
    }

    /// Integrated β₁ (area under curve, trapezoid rule)
    pub fn integrated_beta_1(&self) -> f64 {
        self.values
            .windows(2)
            .map(|w| {
                let dr = w[1].radius - w[0].radius;
                dr * (w[0].beta_1 + w[1].beta_1) as f64 / 2.0
            })
            .sum()
    }
}
