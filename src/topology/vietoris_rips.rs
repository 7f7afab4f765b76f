//! Vietoris-Rips Filtration Construction
//!
//! The Vietoris-Rips complex VR_ε(X) is a simplicial complex where:
//! - 0-simplices are the points in X
//! - A k-simplex [v₀, ..., vₖ] exists iff d(vᵢ, vⱼ) ≤ ε for all i,j
//!
//! Sweeping ε from 0 upwards, each simplex enters at the maximum pairwise
//! distance among its vertices (the clique rule). The builder enumerates
//! every simplex up to one dimension above the highest reported homology
//! dimension, since deaths in dimension k are certified by (k+1)-simplices.
//!
//! Cost grows as C(n, k+2), so the dimension is capped at 2. Two radius
//! caps prune the complex:
//!
//! - The enclosing radius r_enc = minᵢ maxⱼ d(i, j). At r_enc some point is
//!   joined to every other point, so VR_ε is a cone for every ε ≥ r_enc and
//!   all homology (except the one component) is dead by then. Simplices born
//!   above r_enc only produce zero-length pairs and are never emitted.
//! - An optional user cap, below which classes may be left essential.

use ndarray::{Array2, ArrayView1, Axis};
use rayon::prelude::*;

use super::filtration::{Filtration, Simplex};
use crate::cancel::CancellationToken;
use crate::embedding::PointCloud;
use crate::error::{Result, TdaError};

/// Highest homology dimension the builder supports.
pub const MAX_HOMOLOGY_DIM: usize = 2;

/// Vietoris-Rips filtration builder
#[derive(Debug, Clone)]
pub struct VietorisRips {
    /// Distance matrix (precomputed)
    distances: Array2<f64>,
    /// Simplices with a larger radius are left out
    max_radius: Option<f64>,
    /// Stop at the enclosing radius
    truncate: bool,
}

impl VietorisRips {
    /// Create from point cloud (computes distance matrix)
    pub fn new(cloud: &PointCloud) -> Self {
        Self {
            distances: compute_distance_matrix(cloud.points()),
            max_radius: None,
            truncate: true,
        }
    }

    /// Create from a precomputed symmetric distance matrix
    pub fn from_distance_matrix(distances: Array2<f64>) -> Self {
        Self {
            distances,
            max_radius: None,
            truncate: true,
        }
    }

    /// Only keep simplices born at or below `max_radius`.
    pub fn with_max_radius(mut self, max_radius: Option<f64>) -> Self {
        self.max_radius = max_radius;
        self
    }

    /// Build the full complex instead of stopping at the enclosing radius.
    ///
    /// The diagram is the same either way; only the filtration is larger.
    pub fn with_truncation(mut self, truncate: bool) -> Self {
        self.truncate = truncate;
        self
    }

    /// Smallest radius at which some point reaches every other point.
    pub fn enclosing_radius(&self) -> f64 {
        self.distances
            .axis_iter(Axis(0))
            .map(|row| row.iter().copied().fold(0.0, f64::max))
            .fold(f64::INFINITY, f64::min)
    }

    pub fn distances(&self) -> &Array2<f64> {
        &self.distances
    }

    /// Number of points
    pub fn n_points(&self) -> usize {
        self.distances.nrows()
    }

    /// Build the filtration certifying homology up to `max_dim`.
    pub fn build(&self, max_dim: usize) -> Result<Filtration> {
        self.build_with_cancel(max_dim, &CancellationToken::new())
    }

    /// As [`build`](Self::build), checking `cancel` between dimension passes.
    pub fn build_with_cancel(
        &self,
        max_dim: usize,
        cancel: &CancellationToken,
    ) -> Result<Filtration> {
        let n = self.n_points();
        if n < 2 {
            return Err(TdaError::DegenerateInput { points: n });
        }
        if max_dim > MAX_HOMOLOGY_DIM {
            return Err(TdaError::invalid(
                "max_dim",
                format!("homology above dimension {} is not supported", MAX_HOMOLOGY_DIM),
            ));
        }
        if let Some(r) = self.max_radius {
            if r.is_nan() || r < 0.0 {
                return Err(TdaError::invalid("max_radius", "must be a non-negative number"));
            }
        }

        let mut cap = self.max_radius.unwrap_or(f64::INFINITY);
        if self.truncate {
            let enclosing = self.enclosing_radius();
            tracing::debug!(enclosing, "enclosing radius");
            cap = cap.min(enclosing);
        }

        // 0-simplices (vertices) - all born at radius 0
        let mut level: Vec<Simplex> = (0..n).map(|i| Simplex::new(&[i], 0.0)).collect();
        let mut simplices: Vec<Simplex> = level.clone();

        for dim in 1..=max_dim + 1 {
            cancel.checkpoint("filtration construction")?;
            level = self.expand(&level, cap);
            tracing::debug!(dimension = dim, count = level.len(), "simplices enumerated");
            simplices.extend(level.iter().cloned());
        }

        cancel.checkpoint("filtration construction")?;
        let filtration = Filtration::from_simplices(simplices, max_dim);
        tracing::debug!(
            points = n,
            simplices = filtration.len(),
            max_dim,
            "filtration built"
        );
        Ok(filtration)
    }

    /// Extend each k-simplex by every vertex above its largest vertex.
    ///
    /// The new simplex is born at the larger of the parent's radius and the
    /// distances from the new vertex to the parent's vertices.
    /// Simplices born above `cap` are dropped.
    fn expand(&self, level: &[Simplex], cap: f64) -> Vec<Simplex> {
        let n = self.n_points();
        let dm = &self.distances;

        level
            .par_iter()
            .flat_map_iter(|parent| {
                let vertices = parent.vertices();
                let last = vertices[vertices.len() - 1];
                (last + 1..n).filter_map(move |v| {
                    let radius = vertices
                        .iter()
                        .map(|&u| dm[[u, v]])
                        .fold(parent.radius, f64::max);
                    if radius > cap {
                        return None;
                    }
                    Some(parent.extended(v, radius))
                })
            })
            .collect()
    }
}

fn euclidean(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Compute Euclidean distance matrix, one row per rayon task
pub fn compute_distance_matrix(points: &Array2<f64>) -> Array2<f64> {
    let n = points.nrows();
    let mut dm = Array2::<f64>::zeros((n, n));

    dm.axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(i, mut row)| {
            for j in 0..n {
                if i != j {
                    row[j] = euclidean(points.row(i), points.row(j));
                }
            }
        });

    dm
}
