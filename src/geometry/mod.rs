//! Geometry collaborator boundary.
//!
//! The descriptor pipeline consumes neighbor geometry and site-equivalence
//! partitions through the [`Tessellation`] and [`EquivalenceFinder`] traits.
//! The built-in implementations ([`VoronoiTessellator`],
//! [`VoronoiSiteClassifier`]) cover ordinary crystal structures; callers
//! with their own tessellation or symmetry machinery can inject it through
//! the same seams.

mod equivalence;
mod polyhedron;
mod voronoi;

pub use equivalence::VoronoiSiteClassifier;
pub use voronoi::{DEFAULT_CUTOFF, VoronoiTessellator};

use crate::model::site::Occupancy;
use crate::model::structure::Structure;
use thiserror::Error;

/// One Voronoi facet between a site and a neighbor.
///
/// Ephemeral: recomputed for every sampled site, never cached across sites.
#[derive(Debug, Clone)]
pub struct NeighborRecord {
    /// Index of the neighboring site in the structure.
    pub site: usize,
    /// Lattice image the neighbor was found in.
    pub image: [i32; 3],
    /// Species occupancy of the neighboring site.
    pub occupancy: Occupancy,
    /// Cartesian position of the neighbor (possibly a periodic image).
    pub position: [f64; 3],
    /// Area of the shared Voronoi facet, Å².
    pub area: f64,
    /// Perpendicular distance to the facet plane (half the interatomic
    /// distance), Å.
    pub face_distance: f64,
    /// Volume of the polyhedron slice subtended by this facet, Å³.
    pub volume: f64,
    /// Number of vertices of the facet polygon.
    pub vertex_count: usize,
}

/// Errors from the geometry collaborators. Propagated unchanged by the
/// descriptor pipeline; no local recovery is attempted.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("site index {site} out of bounds ({len} sites)")]
    SiteOutOfBounds { site: usize, len: usize },

    #[error("site {site} has no neighbors within the {cutoff} Å cutoff")]
    NoNeighbors { site: usize, cutoff: f64 },

    #[error(
        "Voronoi cell of site {site} is truncated by the {cutoff} Å cutoff; increase the cutoff"
    )]
    CutoffExceeded { site: usize, cutoff: f64 },

    #[error("site equivalence analysis failed: {0}")]
    Equivalence(String),
}

/// Produces the Voronoi neighbor set of a single site.
///
/// Implementations must be deterministic for a fixed structure: same
/// records, same order, every call.
pub trait Tessellation {
    fn neighbors(
        &self,
        structure: &Structure,
        site: usize,
    ) -> Result<Vec<NeighborRecord>, GeometryError>;
}

/// Partitions the sites of a structure into equivalence classes.
///
/// Returns one canonical class id per site (the index of the first site of
/// the class), in site order.
pub trait EquivalenceFinder {
    fn equivalent_atoms(&self, structure: &Structure) -> Result<Vec<usize>, GeometryError>;
}
