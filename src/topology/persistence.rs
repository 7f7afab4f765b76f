//! Persistent Homology via Boundary Matrix Reduction
//!
//! The engine scans the filtration once, left to right:
//!
//! - **Vertices** open H₀ classes.
//! - **Edges** are resolved with union-find. An edge joining two components
//!   kills the younger one (elder rule); an edge inside one component closes
//!   a cycle and opens an H₁ class.
//! - **Higher simplices** are reduced as Z/2 boundary columns. `pivot[row]`
//!   names the column whose lowest entry is `row`; on collision the older
//!   column is added until the low is unique or the column vanishes.
//!   A vanishing column opens a class, a surviving one kills the class born
//!   at its low.
//!
//! Edge columns are never added into higher columns, so resolving them with
//! union-find yields the same pairing as the full reduction.
//!
//! A reduced column can only end on a class that is still open. While no
//! (k-1)-class is open, every k-column reduces to zero and is marked
//! positive without being built. Past the enclosing radius this covers
//! almost all top-dimensional simplices.
//!
//! ## Reference
//!
//! Edelsbrunner, Letscher, Zomorodian (2002). "Topological Persistence
//! and Simplification". Discrete & Computational Geometry.

use std::collections::BTreeSet;

use super::diagram::{PersistenceDiagram, PersistencePair};
use super::filtration::Filtration;
use super::vietoris_rips::VietorisRips;
use crate::cancel::CancellationToken;
use crate::config::FiltrationConfig;
use crate::embedding::PointCloud;
use crate::error::Result;

/// Columns reduced between cancellation checks.
const CANCEL_STRIDE: usize = 1 << 14;

/// Sparse column representation for boundary matrix
#[derive(Debug, Clone, Default)]
struct SparseColumn {
    /// Non-zero row indices (filtration positions)
    rows: BTreeSet<usize>,
}

impl SparseColumn {
    fn from_indices(indices: &[usize]) -> Self {
        Self {
            rows: indices.iter().copied().collect(),
        }
    }

    /// Get the lowest (maximum) non-zero index
    fn low(&self) -> Option<usize> {
        self.rows.iter().next_back().copied()
    }

    /// XOR (symmetric difference) with another column - addition in Z/2Z
    fn add_assign(&mut self, other: &SparseColumn) {
        for &row in &other.rows {
            if !self.rows.remove(&row) {
                self.rows.insert(row);
            }
        }
    }
}

/// Union-find over vertex indices, tracking the filtration position of the
/// oldest vertex in each component.
struct Components {
    parent: Vec<usize>,
    rank: Vec<usize>,
    /// Root -> filtration position of the component's oldest vertex
    oldest: Vec<usize>,
}

impl Components {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
            oldest: vec![usize::MAX; n],
        }
    }

    fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    /// Merge the components of `x` and `y`. Returns the position of the
    /// younger component's oldest vertex, or `None` if already joined.
    fn union(&mut self, x: usize, y: usize) -> Option<usize> {
        let rx = self.find(x);
        let ry = self.find(y);
        if rx == ry {
            return None;
        }

        let (elder, younger) = if self.oldest[rx] < self.oldest[ry] {
            (self.oldest[rx], self.oldest[ry])
        } else {
            (self.oldest[ry], self.oldest[rx])
        };

        let root = if self.rank[rx] < self.rank[ry] {
            self.parent[rx] = ry;
            ry
        } else {
            self.parent[ry] = rx;
            if self.rank[rx] == self.rank[ry] {
                self.rank[rx] += 1;
            }
            rx
        };
        self.oldest[root] = elder;
        Some(younger)
    }
}

/// Reduce a filtration into its persistence diagram.
pub fn reduce(filtration: &Filtration) -> PersistenceDiagram {
    match reduce_with_cancel(filtration, &CancellationToken::new()) {
        Ok(diagram) => diagram,
        Err(_) => unreachable!("a fresh token is never cancelled"),
    }
}

/// As [`reduce`], checking `cancel` periodically during the scan.
pub fn reduce_with_cancel(
    filtration: &Filtration,
    cancel: &CancellationToken,
) -> Result<PersistenceDiagram> {
    cancel.checkpoint("boundary reduction")?;

    let m = filtration.len();
    let max_dim = filtration.max_dim();
    let n_vertices = filtration
        .simplices()
        .iter()
        .filter(|s| s.dimension() == 0)
        .count();

    let mut components = Components::new(n_vertices);

    let mut positive = vec![false; m];
    let mut paired = vec![false; m];
    // pivot[row] indexes the reduced column in `columns` whose low is `row`
    let mut pivot: Vec<Option<usize>> = vec![None; m];
    let mut columns: Vec<SparseColumn> = Vec::new();
    // open[k]: positive k-simplices not yet paired
    let mut open = vec![0usize; max_dim + 2];
    let mut skipped = 0usize;

    let mut diagram = PersistenceDiagram::with_dimensions(0..=max_dim);

    for pos in 0..m {
        if pos % CANCEL_STRIDE == 0 && pos > 0 {
            cancel.checkpoint("boundary reduction")?;
        }

        let simplex = filtration.simplex(pos);
        match simplex.dimension() {
            0 => {
                components.oldest[simplex.vertices()[0]] = pos;
                positive[pos] = true;
            }
            1 => {
                let (u, v) = (simplex.vertices()[0], simplex.vertices()[1]);
                match components.union(u, v) {
                    Some(younger) => {
                        paired[younger] = true;
                        paired[pos] = true;
                        record(&mut diagram, filtration, younger, pos);
                    }
                    None => {
                        positive[pos] = true;
                        open[1] += 1;
                    }
                }
            }
            dim if open[dim - 1] == 0 => {
                positive[pos] = true;
                open[dim] += 1;
                skipped += 1;
            }
            dim => {
                let mut column = SparseColumn::from_indices(&filtration.boundary(pos));
                while let Some(low) = column.low() {
                    match pivot[low] {
                        Some(other) => column.add_assign(&columns[other]),
                        None => break,
                    }
                }

                match column.low() {
                    Some(low) => {
                        assert!(
                            positive[low] && !paired[low],
                            "column {} reduced onto row {} which cannot be killed",
                            pos,
                            low
                        );
                        pivot[low] = Some(columns.len());
                        columns.push(column);
                        paired[low] = true;
                        paired[pos] = true;
                        open[dim - 1] -= 1;
                        record(&mut diagram, filtration, low, pos);
                    }
                    None => {
                        positive[pos] = true;
                        open[dim] += 1;
                    }
                }
            }
        }
    }

    // Essential features (unpaired simplices that create homology)
    for pos in 0..m {
        let simplex = filtration.simplex(pos);
        if positive[pos] && !paired[pos] && simplex.dimension() <= max_dim {
            diagram.push(PersistencePair::essential(simplex.dimension(), simplex.radius));
        }
    }

    tracing::debug!(
        simplices = m,
        skipped,
        pairs = diagram.len(),
        essential = diagram.iter().filter(|p| p.is_essential()).count(),
        "persistence computed"
    );
    Ok(diagram)
}

/// Push the pair (birth simplex, death simplex), skipping zero persistence.
fn record(diagram: &mut PersistenceDiagram, filtration: &Filtration, birth: usize, death: usize) {
    let born = filtration.simplex(birth);
    let dies = filtration.simplex(death);
    if born.dimension() > filtration.max_dim() {
        return;
    }
    if dies.radius > born.radius {
        diagram.push(PersistencePair::new(born.dimension(), born.radius, dies.radius));
    }
}

/// Point cloud to persistence diagram for homology dimensions `0..=max_dim`.
pub fn analyze(cloud: &PointCloud, max_dim: usize) -> Result<PersistenceDiagram> {
    let config = FiltrationConfig {
        max_dim,
        ..FiltrationConfig::default()
    };
    analyze_with(cloud, &config, &CancellationToken::new())
}

/// As [`analyze`] with a full filtration config and a cancellation token.
pub fn analyze_with(
    cloud: &PointCloud,
    config: &FiltrationConfig,
    cancel: &CancellationToken,
) -> Result<PersistenceDiagram> {
    let filtration = VietorisRips::new(cloud)
        .with_max_radius(config.max_radius)
        .build_with_cancel(config.max_dim, cancel)?;
    reduce_with_cancel(&filtration, cancel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn diagram_of(points: ndarray::Array2<f64>, max_dim: usize) -> PersistenceDiagram {
        analyze(&PointCloud::new(points), max_dim).unwrap()
    }

    #[test]
    fn test_two_points() {
        let pd = diagram_of(array![[0.0, 0.0], [1.0, 0.0]], 1);

        // H0: one interval from 0 to 1, plus the final component
        let finite: Vec<_> = pd.finite(0).collect();
        assert_eq!(finite.len(), 1);
        assert_relative_eq!(finite[0].birth, 0.0);
        assert_relative_eq!(finite[0].death, 1.0);
        assert_eq!(pd.essential(0).count(), 1);
        assert!(pd.pairs(1).is_empty());
    }

    #[test]
    fn test_triangle_fills_immediately() {
        let pd = diagram_of(array![[0.0, 0.0], [1.0, 0.0], [0.5, 0.75_f64.sqrt()]], 1);

        assert_eq!(pd.finite(0).count(), 2);
        // the cycle is born and filled at the same radius
        assert!(pd.pairs(1).is_empty());
    }

    #[test]
    fn test_square_cycle() {
        let s2 = 2.0_f64.sqrt();
        let pd = diagram_of(array![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]], 1);

        let h0: Vec<_> = pd.finite(0).collect();
        assert_eq!(h0.len(), 3);
        assert!(h0.iter().all(|p| p.birth == 0.0));
        assert!(h0.iter().all(|p| (p.death - 1.0).abs() < 1e-12));
        assert_eq!(pd.essential(0).count(), 1);

        let h1 = pd.pairs(1);
        assert_eq!(h1.len(), 1, "square should have exactly one H1 cycle");
        assert_relative_eq!(h1[0].birth, 1.0, epsilon = 1e-12);
        assert_relative_eq!(h1[0].death, s2, epsilon = 1e-12);
    }

    #[test]
    fn test_merges_follow_radius_order() {
        let pd = diagram_of(array![[0.0], [1.0], [3.0], [7.0], [15.0]], 0);
        let deaths: Vec<f64> = pd.finite(0).map(|p| p.death).collect();
        assert_eq!(deaths, vec![1.0, 2.0, 4.0, 8.0]);
        assert_eq!(pd.essential(0).count(), 1);
        assert_eq!(pd.dimensions().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_octahedron_void() {
        // Vertices of an octahedron: one H2 void at the edge length,
        // filled once the antipodal diagonals appear.
        let pd = diagram_of(
            array![
                [1.0, 0.0, 0.0],
                [-1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, -1.0, 0.0],
                [0.0, 0.0, 1.0],
                [0.0, 0.0, -1.0]
            ],
            2,
        );

        let h2 = pd.pairs(2);
        assert_eq!(h2.len(), 1);
        assert_relative_eq!(h2[0].birth, 2.0_f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(h2[0].death, 2.0, epsilon = 1e-12);
        assert!(pd.pairs(1).is_empty());
    }

    #[test]
    fn test_radius_cap_leaves_cycle_essential() {
        let cloud = PointCloud::new(array![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
        let config = FiltrationConfig {
            max_dim: 1,
            max_radius: Some(1.2),
        };
        let pd = analyze_with(&cloud, &config, &CancellationToken::new()).unwrap();
        let h1: Vec<_> = pd.essential(1).collect();
        assert_eq!(h1.len(), 1);
        assert_relative_eq!(h1[0].birth, 1.0);
    }

    #[test]
    fn test_enclosing_truncation_keeps_diagram() {
        // jittered 4x4 grid: the enclosing radius is well below the diameter
        let points = ndarray::Array2::from_shape_fn((16, 2), |(k, axis)| {
            let jitter = 0.1 * ((7 * k + 3 * axis) as f64).sin();
            let cell = if axis == 0 { k % 4 } else { k / 4 };
            cell as f64 + jitter
        });
        let vr = VietorisRips::new(&PointCloud::new(points));
        let truncated = vr.build(2).unwrap();
        let full = vr.clone().with_truncation(false).build(2).unwrap();
        assert!(truncated.len() < full.len());

        let pd = reduce(&truncated);
        assert_eq!(pd, reduce(&full));
        assert_eq!(pd.essential(0).count(), 1);
        assert_eq!(pd.essential(1).count() + pd.essential(2).count(), 0);
    }

    #[test]
    fn test_duplicate_points_drop_zero_persistence() {
        let pd = diagram_of(array![[0.0, 0.0], [0.0, 0.0], [2.0, 0.0]], 1);
        let finite: Vec<_> = pd.finite(0).collect();
        assert_eq!(finite.len(), 1);
        assert_relative_eq!(finite[0].death, 2.0);
    }
}
