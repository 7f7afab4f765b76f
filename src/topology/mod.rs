//! Topology Module: Persistent Homology of Point Clouds
//!
//! Implements the mathematical structures for topological data analysis:
//! - Vietoris-Rips filtration (clique complex of the distance matrix)
//! - Exact persistent homology via boundary matrix reduction
//! - Persistence diagrams and Betti numbers
//!
//! ## Mathematical Background
//!
//! For a point cloud X we build the nested family of simplicial complexes
//! VR_ε(X) indexed by the scale parameter ε. Persistent homology tracks
//! the birth and death of topological features (connected components,
//! loops, voids) across this filtration.
//!
//! ## Pipeline
//!
//! ```text
//! PointCloud ──VietorisRips::build──▶ Filtration ──reduce──▶ PersistenceDiagram
//! ```
//!
//! [`analyze`] runs both steps.

mod betti;
mod diagram;
mod filtration;
mod persistence;
mod vietoris_rips;

pub use betti::{BettiCurve, BettiNumbers};
pub use diagram::{PersistenceDiagram, PersistencePair};
pub use filtration::{canonical_index, Filtration, Simplex, RADIUS_TOLERANCE};
pub use persistence::{analyze, analyze_with, reduce, reduce_with_cancel};
pub use vietoris_rips::{compute_distance_matrix, VietorisRips, MAX_HOMOLOGY_DIM};
