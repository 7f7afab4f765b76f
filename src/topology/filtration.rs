//! Filtered Simplicial Complex
//!
//! A filtration is the full list of simplices in the order they enter the
//! Vietoris-Rips complex as the scale grows, together with the boundary
//! relation (each k-simplex's (k-1)-faces, as filtration positions).
//!
//! ## Order
//!
//! Simplices are sorted by `(radius, dimension, canonical index)`. Radii that
//! agree up to a relative tolerance form one tie class and share the class's
//! leading value, so floating-point noise in the distance matrix cannot swap
//! a face and its coface or split a genuine tie. Inside a class, lower
//! dimensions come first, then the canonical index.
//!
//! ## Canonical Index
//!
//! A k-simplex {v₀ < v₁ < ... < vₖ} is numbered by the combinatorial number
//! system, Σᵢ C(vᵢ, i+1). The index is unique among simplices of the same
//! dimension and cheap to recompute for faces.
//!
//! Boundaries are looked up on demand: the reduction only asks for the
//! columns it actually has to reduce.

use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::HashMap;

use super::vietoris_rips::MAX_HOMOLOGY_DIM;

/// Relative tolerance under which two radii are considered tied.
pub const RADIUS_TOLERANCE: f64 = 1e-9;

/// Most vertices a simplex can carry: a (MAX_HOMOLOGY_DIM + 1)-simplex.
pub const MAX_VERTICES: usize = MAX_HOMOLOGY_DIM + 2;

/// A simplex with its Vietoris-Rips birth radius
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Simplex {
    vertices: [usize; MAX_VERTICES],
    len: u8,
    /// Maximum pairwise distance among the vertices
    pub radius: f64,
    /// Combinatorial number system index
    pub canonical: u64,
}

impl Simplex {
    /// `vertices` must be sorted ascending, with 1 to `MAX_VERTICES` entries.
    pub(crate) fn new(vertices: &[usize], radius: f64) -> Self {
        assert!(
            !vertices.is_empty() && vertices.len() <= MAX_VERTICES,
            "simplex with {} vertices",
            vertices.len()
        );
        let mut buf = [0usize; MAX_VERTICES];
        buf[..vertices.len()].copy_from_slice(vertices);
        Self {
            vertices: buf,
            len: vertices.len() as u8,
            radius,
            canonical: canonical_index(vertices),
        }
    }

    /// Coface obtained by appending `v`, which must exceed every vertex.
    pub(crate) fn extended(&self, v: usize, radius: f64) -> Self {
        let len = self.len as usize;
        let mut vertices = self.vertices;
        vertices[len] = v;
        Self {
            vertices,
            len: self.len + 1,
            radius,
            canonical: self.canonical + binomial(v as u64, len as u64 + 1),
        }
    }

    /// Vertex indices, ascending
    pub fn vertices(&self) -> &[usize] {
        &self.vertices[..self.len as usize]
    }

    pub fn dimension(&self) -> usize {
        self.len as usize - 1
    }
}

/// Combinatorial number system index of a sorted vertex list.
pub fn canonical_index(vertices: &[usize]) -> u64 {
    vertices
        .iter()
        .enumerate()
        .map(|(i, &v)| binomial(v as u64, i as u64 + 1))
        .sum()
}

fn binomial(n: u64, k: u64) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut c = 1u64;
    for i in 0..k {
        // exact at every step: c * (n - i) is divisible by (i + 1)
        c = c * (n - i) / (i + 1);
    }
    c
}

/// Ordered simplices plus the boundary relation
#[derive(Debug, Clone)]
pub struct Filtration {
    simplices: Vec<Simplex>,
    /// (dimension, canonical) -> position, for every simplex that can be a face
    position: HashMap<(usize, u64), usize>,
    max_dim: usize,
}

impl Filtration {
    /// Sort `simplices` into filtration order and index their positions.
    ///
    /// `max_dim` is the highest homology dimension to report; the caller is
    /// expected to pass simplices up to dimension `max_dim + 1`. Every face
    /// of every simplex must be present.
    pub(crate) fn from_simplices(mut simplices: Vec<Simplex>, max_dim: usize) -> Self {
        simplices.par_sort_unstable_by(filtration_order);
        snap_ties(&mut simplices);
        simplices.par_sort_unstable_by(filtration_order);

        // top-dimensional simplices are never faces
        let position: HashMap<(usize, u64), usize> = simplices
            .par_iter()
            .enumerate()
            .filter(|(_, s)| s.dimension() <= max_dim)
            .map(|(pos, s)| ((s.dimension(), s.canonical), pos))
            .collect();

        Self {
            simplices,
            position,
            max_dim,
        }
    }

    pub fn simplices(&self) -> &[Simplex] {
        &self.simplices
    }

    pub fn simplex(&self, pos: usize) -> &Simplex {
        &self.simplices[pos]
    }

    /// Facet positions of the simplex at `pos`, ascending.
    ///
    /// # Panics
    /// If a facet is missing, which means the filtration was not closed
    /// under taking faces.
    pub fn boundary(&self, pos: usize) -> Vec<usize> {
        let vertices = self.simplices[pos].vertices();
        if vertices.len() == 1 {
            return Vec::new();
        }

        let mut faces: Vec<usize> = (0..vertices.len())
            .map(|skip| {
                let mut face = [0usize; MAX_VERTICES];
                let mut k = 0;
                for (i, &v) in vertices.iter().enumerate() {
                    if i != skip {
                        face[k] = v;
                        k += 1;
                    }
                }
                let key = (k - 1, canonical_index(&face[..k]));
                match self.position.get(&key) {
                    Some(&face_pos) => face_pos,
                    None => panic!(
                        "face {:?} of simplex {:?} missing from filtration",
                        &face[..k],
                        vertices
                    ),
                }
            })
            .collect();
        faces.sort_unstable();
        faces
    }

    pub fn len(&self) -> usize {
        self.simplices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.simplices.is_empty()
    }

    /// Highest homology dimension this filtration certifies.
    pub fn max_dim(&self) -> usize {
        self.max_dim
    }

    /// Number of simplices in each dimension, index = dimension.
    pub fn counts_by_dimension(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.max_dim + 2];
        for s in &self.simplices {
            if s.dimension() >= counts.len() {
                counts.resize(s.dimension() + 1, 0);
            }
            counts[s.dimension()] += 1;
        }
        counts
    }
}

fn filtration_order(a: &Simplex, b: &Simplex) -> Ordering {
    a.radius
        .total_cmp(&b.radius)
        .then(a.dimension().cmp(&b.dimension()))
        .then(a.canonical.cmp(&b.canonical))
}

/// Collapse radii within `RADIUS_TOLERANCE` of a class leader onto the
/// leader's value. Input must already be sorted by radius.
fn snap_ties(simplices: &mut [Simplex]) {
    let mut leader = match simplices.first() {
        Some(s) => s.radius,
        None => return,
    };
    for s in simplices.iter_mut() {
        let scale = leader.abs().max(s.radius.abs());
        if s.radius - leader <= RADIUS_TOLERANCE * scale {
            s.radius = leader;
        } else {
            leader = s.radius;
        }
    }
}
