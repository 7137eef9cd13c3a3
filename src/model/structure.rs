use super::lattice::Lattice;
use super::site::{Occupancy, Site};
use super::types::Element;

/// Immutable periodic crystal structure: a lattice plus an ordered list of
/// sites.
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    pub lattice: Lattice,
    pub sites: Vec<Site>,
}

impl Structure {
    pub fn new(lattice: Lattice, sites: Vec<Site>) -> Self {
        Self { lattice, sites }
    }

    #[inline]
    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    #[inline]
    pub fn volume(&self) -> f64 {
        self.lattice.volume()
    }

    /// Cartesian position of site `i`.
    #[inline]
    pub fn cartesian(&self, i: usize) -> [f64; 3] {
        self.lattice.cartesian(self.sites[i].frac)
    }

    /// Copy of this structure with every site replaced by a single
    /// placeholder species, keeping lattice and positions. Used to build
    /// the base structure for equivalence analysis in "pure" mode.
    pub fn with_uniform_species(&self, element: Element) -> Self {
        let sites = self
            .sites
            .iter()
            .map(|s| Site::new(Occupancy::ordered(element), s.frac))
            .collect();
        Self {
            lattice: self.lattice.clone(),
            sites,
        }
    }

    /// Diagonal supercell: replicates the cell `n = [n1, n2, n3]` times
    /// along the lattice vectors. Site order is origin-cell sites first,
    /// then image cells in lexicographic order.
    ///
    /// # Panics
    ///
    /// Panics if any replication count is zero.
    pub fn supercell(&self, n: [usize; 3]) -> Self {
        let m = self.lattice.matrix();
        let scaled = [
            [
                m[0][0] * n[0] as f64,
                m[0][1] * n[0] as f64,
                m[0][2] * n[0] as f64,
            ],
            [
                m[1][0] * n[1] as f64,
                m[1][1] * n[1] as f64,
                m[1][2] * n[1] as f64,
            ],
            [
                m[2][0] * n[2] as f64,
                m[2][1] * n[2] as f64,
                m[2][2] * n[2] as f64,
            ],
        ];
        let lattice = Lattice::new(scaled).expect("scaling keeps the lattice nonsingular");

        let mut sites = Vec::with_capacity(self.sites.len() * n[0] * n[1] * n[2]);
        for i in 0..n[0] {
            for j in 0..n[1] {
                for k in 0..n[2] {
                    for site in &self.sites {
                        let frac = [
                            (site.frac[0] + i as f64) / n[0] as f64,
                            (site.frac[1] + j as f64) / n[1] as f64,
                            (site.frac[2] + k as f64) / n[2] as f64,
                        ];
                        sites.push(Site::new(site.occupancy.clone(), frac));
                    }
                }
            }
        }
        Self { lattice, sites }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bcc(element: Element, a: f64) -> Structure {
        Structure::new(
            Lattice::cubic(a),
            vec![
                Site::ordered(element, [0.0, 0.0, 0.0]),
                Site::ordered(element, [0.5, 0.5, 0.5]),
            ],
        )
    }

    #[test]
    fn cartesian_positions() {
        let s = bcc(Element::Fe, 2.86);
        let c = s.cartesian(1);
        assert!((c[0] - 1.43).abs() < 1e-12);
        assert!((c[1] - 1.43).abs() < 1e-12);
        assert!((c[2] - 1.43).abs() < 1e-12);
    }

    #[test]
    fn uniform_species_keeps_geometry() {
        let s = bcc(Element::Fe, 2.86);
        let base = s.with_uniform_species(Element::H);
        assert_eq!(base.site_count(), 2);
        assert_eq!(base.lattice, s.lattice);
        for site in &base.sites {
            let entries: Vec<_> = site.occupancy.iter().collect();
            assert_eq!(entries, vec![(Element::H, 1.0)]);
        }
    }

    #[test]
    fn supercell_replicates_sites_and_volume() {
        let s = bcc(Element::Fe, 2.86);
        let sup = s.supercell([2, 2, 2]);
        assert_eq!(sup.site_count(), 16);
        assert!((sup.volume() - 8.0 * s.volume()).abs() < 1e-9);
        // first site of the second image cell sits half a (doubled) axis in
        let frac = sup.sites[2].frac;
        assert!((frac[2] - 0.5).abs() < 1e-12);
    }
}
