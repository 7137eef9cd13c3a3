//! Site equivalence from first-shell Voronoi fingerprints.
//!
//! Two sites whose own occupancy and full facet lists (neighbor occupancy,
//! face distance, facet area, vertex count) agree must produce identical
//! local-environment statistics, since every statistic is a function of the
//! first shell alone. The partition can be finer than the true space-group
//! orbit partition, which only costs redundant evaluations, never a wrong
//! answer.

use std::collections::HashMap;

use super::{EquivalenceFinder, GeometryError, Tessellation, VoronoiTessellator};
use crate::model::site::OccupancySignature;
use crate::model::structure::Structure;

/// Rounding scale for geometric fingerprint components (4 decimals).
const FINGERPRINT_SCALE: f64 = 1e4;

type Fingerprint = (OccupancySignature, Vec<(OccupancySignature, i64, i64, usize)>);

/// Groups sites by exact first-shell geometry.
#[derive(Debug, Clone, Default)]
pub struct VoronoiSiteClassifier {
    tessellator: VoronoiTessellator,
}

impl VoronoiSiteClassifier {
    pub fn new(tessellator: VoronoiTessellator) -> Self {
        VoronoiSiteClassifier { tessellator }
    }

    fn fingerprint(
        &self,
        structure: &Structure,
        site: usize,
    ) -> Result<Fingerprint, GeometryError> {
        let mut shell: Vec<(OccupancySignature, i64, i64, usize)> = self
            .tessellator
            .neighbors(structure, site)?
            .iter()
            .map(|r| {
                (
                    r.occupancy.signature(),
                    round_scaled(r.face_distance),
                    round_scaled(r.area),
                    r.vertex_count,
                )
            })
            .collect();
        shell.sort();
        Ok((structure.sites[site].occupancy.signature(), shell))
    }
}

fn round_scaled(x: f64) -> i64 {
    (x * FINGERPRINT_SCALE).round() as i64
}

impl EquivalenceFinder for VoronoiSiteClassifier {
    fn equivalent_atoms(&self, structure: &Structure) -> Result<Vec<usize>, GeometryError> {
        let mut first_seen: HashMap<Fingerprint, usize> = HashMap::new();
        let mut classes = Vec::with_capacity(structure.site_count());
        for i in 0..structure.site_count() {
            let fp = self.fingerprint(structure, i)?;
            let class = *first_seen.entry(fp).or_insert(i);
            classes.push(class);
        }
        Ok(classes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::lattice::Lattice;
    use crate::model::site::Site;
    use crate::model::types::Element;

    #[test]
    fn fcc_sites_are_one_class() {
        let frac = [
            [0.0, 0.0, 0.0],
            [0.0, 0.5, 0.5],
            [0.5, 0.0, 0.5],
            [0.5, 0.5, 0.0],
        ];
        let s = Structure::new(
            Lattice::cubic(3.52),
            frac.iter().map(|&f| Site::ordered(Element::Ni, f)).collect(),
        );
        let classes = VoronoiSiteClassifier::default()
            .equivalent_atoms(&s)
            .unwrap();
        assert_eq!(classes, vec![0, 0, 0, 0]);
    }

    #[test]
    fn rocksalt_splits_by_species() {
        let na = [
            [0.0, 0.0, 0.0],
            [0.0, 0.5, 0.5],
            [0.5, 0.0, 0.5],
            [0.5, 0.5, 0.0],
        ];
        let cl = [
            [0.5, 0.5, 0.5],
            [0.5, 0.0, 0.0],
            [0.0, 0.5, 0.0],
            [0.0, 0.0, 0.5],
        ];
        let mut sites: Vec<Site> = na
            .iter()
            .map(|&f| Site::ordered(Element::Na, f))
            .collect();
        sites.extend(cl.iter().map(|&f| Site::ordered(Element::Cl, f)));
        let s = Structure::new(Lattice::cubic(5.64), sites);
        let classes = VoronoiSiteClassifier::default()
            .equivalent_atoms(&s)
            .unwrap();
        assert_eq!(classes, vec![0, 0, 0, 0, 4, 4, 4, 4]);
    }
}
