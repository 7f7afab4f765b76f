//! Diagram points, ground distances and the padded cost matrix.

use ndarray::Array2;
use std::collections::BTreeSet;

use crate::config::GroundMetric;
use crate::topology::PersistenceDiagram;

/// A diagram point with its position in the source diagram
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct DiagramPoint {
    pub dimension: usize,
    /// Index into `diagram.pairs(dimension)`
    pub index: usize,
    pub birth: f64,
    pub death: f64,
}

fn points_of<'a>(
    diagram: &'a PersistenceDiagram,
    dims: &'a BTreeSet<usize>,
    essential: bool,
) -> impl Iterator<Item = DiagramPoint> + 'a {
    dims.iter().flat_map(move |&d| {
        diagram
            .pairs(d)
            .iter()
            .enumerate()
            .filter(move |(_, p)| p.is_essential() == essential)
            .map(move |(index, p)| DiagramPoint {
                dimension: d,
                index,
                birth: p.birth,
                death: p.death,
            })
    })
}

/// Finite points of the requested dimensions, by dimension then index
pub(crate) fn finite_points(
    diagram: &PersistenceDiagram,
    dims: &BTreeSet<usize>,
) -> Vec<DiagramPoint> {
    points_of(diagram, dims, false).collect()
}

impl GroundMetric {
    /// Distance between two finite diagram points
    pub fn distance(self, a: (f64, f64), b: (f64, f64)) -> f64 {
        let db = (a.0 - b.0).abs();
        let dd = (a.1 - b.1).abs();
        match self {
            GroundMetric::Euclidean => db.hypot(dd),
            GroundMetric::Chebyshev => db.max(dd),
        }
    }

    /// Distance from `(birth, death)` to its closest point on the diagonal
    pub fn to_diagonal(self, birth: f64, death: f64) -> f64 {
        let lifetime = death - birth;
        match self {
            GroundMetric::Euclidean => lifetime / std::f64::consts::SQRT_2,
            GroundMetric::Chebyshev => lifetime / 2.0,
        }
    }
}

/// Which side of a padded row/column a match lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Slot {
    Point(usize),
    Diagonal,
}

/// Padded square matrix of ground distances between `a` and `b`
///
/// Rows: `a[0..m]`, then `n` diagonal slots for `b`.
/// Columns: `b[0..n]`, then `m` diagonal slots for `a`.
#[derive(Debug, Clone)]
pub(crate) struct TransportProblem {
    pub a: Vec<DiagramPoint>,
    pub b: Vec<DiagramPoint>,
    pub distances: Array2<f64>,
}

impl TransportProblem {
    pub fn new(a: Vec<DiagramPoint>, b: Vec<DiagramPoint>, ground: GroundMetric) -> Self {
        let m = a.len();
        let n = b.len();
        let distances = Array2::from_shape_fn((m + n, m + n), |(i, j)| match (i < m, j < n) {
            (true, true) => ground.distance((a[i].birth, a[i].death), (b[j].birth, b[j].death)),
            (true, false) => ground.to_diagonal(a[i].birth, a[i].death),
            (false, true) => ground.to_diagonal(b[j].birth, b[j].death),
            (false, false) => 0.0,
        });
        Self { a, b, distances }
    }

    pub fn size(&self) -> usize {
        self.distances.nrows()
    }

    pub fn row_slot(&self, row: usize) -> Slot {
        if row < self.a.len() {
            Slot::Point(row)
        } else {
            Slot::Diagonal
        }
    }

    pub fn col_slot(&self, col: usize) -> Slot {
        if col < self.b.len() {
            Slot::Point(col)
        } else {
            Slot::Diagonal
        }
    }
}

/// Essential pairs matched by sorted birth, per dimension
#[derive(Debug, Clone, Default)]
pub(crate) struct EssentialMatching {
    pub pairs: Vec<(DiagramPoint, DiagramPoint)>,
    /// Dimensions whose essential counts differ
    pub mismatched: Vec<usize>,
}

impl EssentialMatching {
    /// |Δbirth| of each matched pair
    pub fn gaps(&self) -> impl Iterator<Item = f64> + '_ {
        self.pairs.iter().map(|(a, b)| (a.birth - b.birth).abs())
    }
}

/// Sorting both sides by birth is optimal for any convex cost of |Δbirth|.
pub(crate) fn match_essentials(
    a: &PersistenceDiagram,
    b: &PersistenceDiagram,
    dims: &BTreeSet<usize>,
) -> EssentialMatching {
    let mut matching = EssentialMatching::default();

    for &d in dims {
        let single = BTreeSet::from([d]);
        let mut ea: Vec<DiagramPoint> = points_of(a, &single, true).collect();
        let mut eb: Vec<DiagramPoint> = points_of(b, &single, true).collect();

        if ea.len() != eb.len() {
            matching.mismatched.push(d);
            continue;
        }

        ea.sort_by(|x, y| x.birth.total_cmp(&y.birth));
        eb.sort_by(|x, y| x.birth.total_cmp(&y.birth));
        matching.pairs.extend(ea.into_iter().zip(eb));
    }

    matching
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::PersistencePair;
    use approx::assert_relative_eq;

    #[test]
    fn test_padded_layout() {
        let a = PersistenceDiagram::from_pairs(vec![PersistencePair::new(1, 0.0, 2.0)]);
        let b = PersistenceDiagram::from_pairs(vec![
            PersistencePair::new(1, 0.0, 1.0),
            PersistencePair::new(1, 1.0, 4.0),
        ]);
        let dims = BTreeSet::from([1]);
        let problem = TransportProblem::new(
            finite_points(&a, &dims),
            finite_points(&b, &dims),
            GroundMetric::Chebyshev,
        );

        assert_eq!(problem.size(), 3);
        assert_relative_eq!(problem.distances[[0, 0]], 1.0);
        assert_relative_eq!(problem.distances[[0, 1]], 2.0);
        assert_relative_eq!(problem.distances[[0, 2]], 1.0);
        assert_relative_eq!(problem.distances[[1, 0]], 0.5);
        assert_relative_eq!(problem.distances[[2, 1]], 1.5);
        assert_eq!(problem.distances[[2, 2]], 0.0);
        assert_eq!(problem.row_slot(0), Slot::Point(0));
        assert_eq!(problem.col_slot(2), Slot::Diagonal);
    }

    #[test]
    fn test_euclidean_diagonal_distance() {
        assert_relative_eq!(
            GroundMetric::Euclidean.to_diagonal(1.0, 3.0),
            2.0_f64.sqrt(),
            epsilon = 1e-12
        );
        assert_relative_eq!(GroundMetric::Euclidean.distance((0.0, 3.0), (4.0, 0.0)), 5.0);
    }

    #[test]
    fn test_essentials_match_by_birth_and_flag_mismatch() {
        let a = PersistenceDiagram::from_pairs(vec![
            PersistencePair::essential(0, 0.0),
            PersistencePair::essential(1, 2.0),
            PersistencePair::essential(1, 0.5),
        ]);
        let b = PersistenceDiagram::from_pairs(vec![
            PersistencePair::essential(0, 0.0),
            PersistencePair::essential(1, 0.7),
            PersistencePair::essential(1, 1.5),
        ]);

        let m = match_essentials(&a, &b, &BTreeSet::from([0, 1]));
        assert!(m.mismatched.is_empty());
        let gaps: Vec<f64> = m.gaps().collect();
        assert_relative_eq!(gaps[0], 0.0);
        assert_relative_eq!(gaps[1], 0.2, epsilon = 1e-12);
        assert_relative_eq!(gaps[2], 0.5, epsilon = 1e-12);

        let c = PersistenceDiagram::from_pairs(vec![PersistencePair::essential(0, 0.0)]);
        let m = match_essentials(&a, &c, &BTreeSet::from([0, 1]));
        assert_eq!(m.mismatched, vec![1]);
    }
}
