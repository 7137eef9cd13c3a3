//! Periodic Voronoi tessellation by direct half-space clipping.
//!
//! For one site at a time: gather every periodic image of every site within
//! the cutoff sphere, then clip a bounding cube against the perpendicular
//! bisector of each candidate. The faces that survive are exactly the
//! Voronoi facets of the site.

use super::polyhedron::ConvexCell;
use super::{GeometryError, NeighborRecord, Tessellation};
use crate::model::structure::Structure;

/// Default candidate search radius, Å. Generous enough that the bounding
/// cube never truncates the cell for ordinary crystal densities.
pub const DEFAULT_CUTOFF: f64 = 13.0;

/// Facets smaller than this are clipping artifacts and are discarded.
const MIN_FACET_AREA: f64 = 1e-10;

#[derive(Debug, Clone, PartialEq)]
struct Candidate {
    delta: [f64; 3],
    dist: f64,
    site: usize,
    image: [i32; 3],
}

/// Tessellation over all periodic images within a fixed cutoff.
#[derive(Debug, Clone)]
pub struct VoronoiTessellator {
    cutoff: f64,
}

impl Default for VoronoiTessellator {
    fn default() -> Self {
        Self::new(DEFAULT_CUTOFF)
    }
}

impl VoronoiTessellator {
    pub fn new(cutoff: f64) -> Self {
        VoronoiTessellator { cutoff }
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    fn candidates(&self, structure: &Structure, site: usize) -> Vec<Candidate> {
        let center = structure.cartesian(site);
        let bounds = structure.lattice.image_bounds(self.cutoff);
        let cutoff_sq = self.cutoff * self.cutoff;
        let mut candidates = Vec::new();
        for (j, other) in structure.sites.iter().enumerate() {
            let base = structure.lattice.cartesian(other.frac);
            for ix in -bounds[0]..=bounds[0] {
                for iy in -bounds[1]..=bounds[1] {
                    for iz in -bounds[2]..=bounds[2] {
                        let image = [ix, iy, iz];
                        let t = structure.lattice.translation(image);
                        let delta = [
                            base[0] + t[0] - center[0],
                            base[1] + t[1] - center[1],
                            base[2] + t[2] - center[2],
                        ];
                        let d2 = delta[0] * delta[0] + delta[1] * delta[1] + delta[2] * delta[2];
                        // Skip the site itself (zero image distance).
                        if d2 < 1e-20 || d2 > cutoff_sq {
                            continue;
                        }
                        candidates.push(Candidate {
                            delta,
                            dist: d2.sqrt(),
                            site: j,
                            image,
                        });
                    }
                }
            }
        }
        // Total order over (distance, site, image) keeps the clipping
        // sequence, and with it every rounding decision, reproducible.
        candidates.sort_by(|a, b| {
            a.dist
                .total_cmp(&b.dist)
                .then(a.site.cmp(&b.site))
                .then(a.image.cmp(&b.image))
        });
        candidates
    }
}

impl Tessellation for VoronoiTessellator {
    fn neighbors(
        &self,
        structure: &Structure,
        site: usize,
    ) -> Result<Vec<NeighborRecord>, GeometryError> {
        let len = structure.site_count();
        if site >= len {
            return Err(GeometryError::SiteOutOfBounds { site, len });
        }
        let candidates = self.candidates(structure, site);
        if candidates.is_empty() {
            return Err(GeometryError::NoNeighbors {
                site,
                cutoff: self.cutoff,
            });
        }

        let center = structure.cartesian(site);
        let mut cell = ConvexCell::cube(self.cutoff);
        for (idx, c) in candidates.iter().enumerate() {
            let n = [
                c.delta[0] / c.dist,
                c.delta[1] / c.dist,
                c.delta[2] / c.dist,
            ];
            cell.clip(n, c.dist / 2.0, idx);
        }

        let mut records = Vec::new();
        for face in &cell.faces {
            let area = face.area();
            if area <= MIN_FACET_AREA {
                continue;
            }
            let Some(idx) = face.source else {
                // A surviving bounding-cube face means the cell reaches
                // beyond the candidate sphere.
                return Err(GeometryError::CutoffExceeded {
                    site,
                    cutoff: self.cutoff,
                });
            };
            let c = &candidates[idx];
            records.push(NeighborRecord {
                site: c.site,
                image: c.image,
                occupancy: structure.sites[c.site].occupancy.clone(),
                position: [
                    center[0] + c.delta[0],
                    center[1] + c.delta[1],
                    center[2] + c.delta[2],
                ],
                area,
                face_distance: c.dist / 2.0,
                volume: area * c.dist / 6.0,
                vertex_count: face.verts.len(),
            });
        }
        if records.is_empty() {
            return Err(GeometryError::NoNeighbors {
                site,
                cutoff: self.cutoff,
            });
        }
        records.sort_by(|a, b| {
            a.face_distance
                .total_cmp(&b.face_distance)
                .then(a.site.cmp(&b.site))
                .then(a.image.cmp(&b.image))
        });
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::lattice::Lattice;
    use crate::model::site::Site;
    use crate::model::types::Element;

    fn simple_cubic(a: f64) -> Structure {
        Structure::new(
            Lattice::cubic(a),
            vec![Site::ordered(Element::Po, [0.0, 0.0, 0.0])],
        )
    }

    fn fcc_conventional(a: f64) -> Structure {
        let frac = [
            [0.0, 0.0, 0.0],
            [0.0, 0.5, 0.5],
            [0.5, 0.0, 0.5],
            [0.5, 0.5, 0.0],
        ];
        Structure::new(
            Lattice::cubic(a),
            frac.iter().map(|&f| Site::ordered(Element::Ni, f)).collect(),
        )
    }

    #[test]
    fn simple_cubic_cell_is_a_cube() {
        let s = simple_cubic(3.0);
        let records = VoronoiTessellator::default().neighbors(&s, 0).unwrap();
        assert_eq!(records.len(), 6);
        let mut volume = 0.0;
        for r in &records {
            assert!((r.area - 9.0).abs() < 1e-8);
            assert!((r.face_distance - 1.5).abs() < 1e-10);
            assert_eq!(r.vertex_count, 4);
            assert_eq!(r.site, 0);
            volume += r.volume;
        }
        assert!((volume - 27.0).abs() < 1e-7);
    }

    #[test]
    fn fcc_cell_is_a_rhombic_dodecahedron() {
        let a = 3.52;
        let s = fcc_conventional(a);
        let records = VoronoiTessellator::default().neighbors(&s, 0).unwrap();
        assert_eq!(records.len(), 12);
        let nn = a / 2f64.sqrt();
        let volume: f64 = records.iter().map(|r| r.volume).sum();
        for r in &records {
            assert!((2.0 * r.face_distance - nn).abs() < 1e-10);
            assert_eq!(r.vertex_count, 4);
        }
        // One atom's share of the conventional cell.
        assert!((volume - a.powi(3) / 4.0).abs() < 1e-7);
    }

    #[test]
    fn neighbor_order_is_reproducible() {
        let s = fcc_conventional(3.52);
        let tess = VoronoiTessellator::default();
        let first = tess.neighbors(&s, 1).unwrap();
        let second = tess.neighbors(&s, 1).unwrap();
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.site, b.site);
            assert_eq!(a.image, b.image);
            assert_eq!(a.area.to_bits(), b.area.to_bits());
        }
    }

    #[test]
    fn tight_cutoff_is_reported() {
        // Tetragonal cell, long axis outside the cutoff: the cell stays
        // open along z and the bounding cube shows through.
        let lattice =
            Lattice::new([[3.0, 0.0, 0.0], [0.0, 3.0, 0.0], [0.0, 0.0, 12.0]]).unwrap();
        let s = Structure::new(lattice, vec![Site::ordered(Element::Po, [0.0, 0.0, 0.0])]);
        let err = VoronoiTessellator::new(5.0).neighbors(&s, 0).unwrap_err();
        assert!(matches!(err, GeometryError::CutoffExceeded { site: 0, .. }));
    }

    #[test]
    fn isolated_site_has_no_neighbors() {
        let s = simple_cubic(9.0);
        let err = VoronoiTessellator::new(5.0).neighbors(&s, 0).unwrap_err();
        assert!(matches!(err, GeometryError::NoNeighbors { site: 0, .. }));
    }

    #[test]
    fn out_of_bounds_site_is_rejected() {
        let s = simple_cubic(3.0);
        let err = VoronoiTessellator::default().neighbors(&s, 1).unwrap_err();
        assert!(matches!(
            err,
            GeometryError::SiteOutOfBounds { site: 1, len: 1 }
        ));
    }
}
