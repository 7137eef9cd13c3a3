//! Dilute-site detection and equivalence grouping.

use std::collections::BTreeMap;

use super::error::Error;
use super::local_env::FaceSignature;
use crate::model::site::OccupancySignature;
use crate::model::structure::Structure;

/// Composite grouping key: base-structure equivalence class, plus the
/// dilute facet signature for sites adjacent to the dilute site.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct GroupKey {
    pub class: usize,
    pub face: Option<FaceSignature>,
}

/// One group of mutually equivalent non-dilute sites.
#[derive(Debug, Clone)]
pub(crate) struct SiteGroup {
    /// Lowest-index member; the one whose environment is evaluated.
    pub representative: usize,
    pub multiplicity: usize,
}

/// Finds the dilute site of a structure.
///
/// Exactly one site signature (species plus occupancies) may occur once
/// while every other signature binds the remaining sites together; that
/// lone site is the dilute one. Anything else is ambiguous and is refused
/// rather than guessed at.
pub(crate) fn find_dilute(structure: &Structure) -> Result<usize, Error> {
    // Signatures in first-appearance order, so ties resolve the same way
    // every run.
    let mut order = Vec::new();
    let mut counts: BTreeMap<OccupancySignature, usize> = BTreeMap::new();
    for (i, site) in structure.sites.iter().enumerate() {
        let sig = site.occupancy.signature();
        counts
            .entry(sig.clone())
            .and_modify(|n| *n += 1)
            .or_insert_with(|| {
                order.push((sig, i));
                1
            });
    }

    let distinct = counts.len();
    let singletons: Vec<usize> = order
        .iter()
        .filter(|(sig, _)| counts[sig] == 1)
        .map(|&(_, first)| first)
        .collect();

    if !singletons.is_empty() && distinct - singletons.len() == 1 {
        Ok(singletons[0])
    } else {
        Err(Error::AmbiguousDiluteSite {
            distinct,
            singletons: singletons.len(),
        })
    }
}

/// Groups the non-dilute sites by [`GroupKey`].
///
/// `classes` holds one base-structure class id per site; `faces` maps the
/// sites adjacent to the dilute site to their facet signatures. Groups come
/// back in key order, each site in exactly one group.
pub(crate) fn group_sites(
    classes: &[usize],
    dilute: usize,
    faces: &BTreeMap<usize, FaceSignature>,
) -> Vec<SiteGroup> {
    let mut groups: BTreeMap<GroupKey, Vec<usize>> = BTreeMap::new();
    for (i, &class) in classes.iter().enumerate() {
        if i == dilute {
            continue;
        }
        let key = GroupKey {
            class,
            face: faces.get(&i).cloned(),
        };
        groups.entry(key).or_default().push(i);
    }
    groups
        .into_values()
        .map(|members| SiteGroup {
            representative: members[0],
            multiplicity: members.len(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::lattice::Lattice;
    use crate::model::site::{Occupancy, Site};
    use crate::model::types::Element;

    fn structure_of(species: &[Element]) -> Structure {
        let sites = species
            .iter()
            .enumerate()
            .map(|(i, &e)| Site::ordered(e, [i as f64 * 0.1, 0.0, 0.0]))
            .collect();
        Structure::new(Lattice::cubic(10.0), sites)
    }

    #[test]
    fn lone_species_is_the_dilute_site() {
        use Element::{Cr, Ni};
        let s = structure_of(&[Ni, Ni, Cr, Ni]);
        assert_eq!(find_dilute(&s).unwrap(), 2);
    }

    #[test]
    fn pure_structure_is_ambiguous() {
        let s = structure_of(&[Element::Ni; 4]);
        let err = find_dilute(&s).unwrap_err();
        assert!(matches!(
            err,
            Error::AmbiguousDiluteSite {
                distinct: 1,
                singletons: 0
            }
        ));
    }

    #[test]
    fn two_singletons_are_ambiguous() {
        use Element::{Cr, Mo, Ni};
        let s = structure_of(&[Ni, Cr, Ni, Mo]);
        let err = find_dilute(&s).unwrap_err();
        assert!(matches!(
            err,
            Error::AmbiguousDiluteSite {
                distinct: 3,
                singletons: 2
            }
        ));
    }

    #[test]
    fn partial_occupancy_separates_signatures() {
        use Element::{Cr, Ni};
        let mixed = Site::new(
            Occupancy::new(vec![(Ni, 0.5), (Cr, 0.5)]),
            [0.3, 0.0, 0.0],
        );
        let mut s = structure_of(&[Ni, Ni, Ni]);
        s.sites.push(mixed);
        assert_eq!(find_dilute(&s).unwrap(), 3);
    }

    #[test]
    fn grouping_partitions_non_dilute_sites() {
        let classes = vec![0, 0, 0, 3, 3, 0];
        let mut faces = BTreeMap::new();
        faces.insert(
            1usize,
            FaceSignature {
                occupancy: vec![(Element::Ni, 1.0f64.to_bits())],
                face_distance: 12_345,
                area: 67_890,
                vertex_count: 4,
            },
        );
        let groups = group_sites(&classes, 2, &faces);
        let total: usize = groups.iter().map(|g| g.multiplicity).sum();
        assert_eq!(total, classes.len() - 1);
        // Class 0 splits into faceless {0, 5} and face-bearing {1}.
        assert_eq!(groups.len(), 3);
        assert!(groups
            .iter()
            .any(|g| g.representative == 0 && g.multiplicity == 2));
        assert!(groups
            .iter()
            .any(|g| g.representative == 1 && g.multiplicity == 1));
        assert!(groups
            .iter()
            .any(|g| g.representative == 3 && g.multiplicity == 2));
    }
}
