//! Per-site local-environment statistics.
//!
//! Every quantity here is a function of one site's first Voronoi shell:
//! facet areas, face distances, slice volumes, and the occupancy-weighted
//! property vectors of the site and its neighbors.

use std::collections::BTreeMap;
use std::f64::consts::PI;

use super::error::Error;
use super::properties::{PropertyTable, NUM_PROPERTIES};
use crate::geometry::NeighborRecord;
use crate::model::site::{OccupancySignature, Site};
use crate::model::structure::Structure;

/// Number of structural statistics per site (before the 21 property
/// difference columns).
pub(crate) const NUM_STRUCTURAL: usize = 5 + NUM_PROPERTIES;

/// Fractional-coordinate tolerance when matching a neighbor position back
/// to a structure site.
const MATCH_TOL: f64 = 1e-5;

/// Rounding scale for face signature components (4 decimals).
const SIGNATURE_SCALE: f64 = 1e4;

/// One sampled local environment: 26 structural statistics and the 21
/// occupancy-weighted site properties.
#[derive(Debug, Clone)]
pub(crate) struct SiteAttributes {
    pub structural: Vec<f64>,
    pub elemental: Vec<f64>,
}

/// Identity of a dilute-site facet, rounded so that symmetry-equivalent
/// faces compare equal. Compared structurally, never through strings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct FaceSignature {
    pub occupancy: OccupancySignature,
    pub face_distance: i64,
    pub area: i64,
    pub vertex_count: usize,
}

impl FaceSignature {
    fn of(record: &NeighborRecord) -> Self {
        FaceSignature {
            occupancy: record.occupancy.signature(),
            face_distance: round_scaled(record.face_distance),
            area: round_scaled(record.area),
            vertex_count: record.vertex_count,
        }
    }
}

fn round_scaled(x: f64) -> i64 {
    (x * SIGNATURE_SCALE).round() as i64
}

/// Computes the local-environment statistics of one site from its neighbor
/// records.
pub(crate) fn site_attributes(
    neighbors: &[NeighborRecord],
    site: &Site,
    table: &PropertyTable,
    site_index: usize,
) -> Result<SiteAttributes, Error> {
    let total_area: f64 = neighbors.iter().map(|r| r.area).sum();
    if total_area <= 0.0 {
        return Err(Error::DegenerateGeometry { site: site_index });
    }
    let area_sq: f64 = neighbors.iter().map(|r| r.area * r.area).sum();
    let effective_coordination = total_area * total_area / area_sq;

    // Area-weighted bond length statistics over the facet set.
    let bond_mean: f64 = neighbors
        .iter()
        .map(|r| r.area * 2.0 * r.face_distance)
        .sum::<f64>()
        / total_area;
    let bond_variation: f64 = neighbors
        .iter()
        .map(|r| r.area * (2.0 * r.face_distance - bond_mean).abs())
        .sum::<f64>()
        / (total_area * bond_mean);

    let cell_volume: f64 = neighbors.iter().map(|r| r.volume).sum();

    let min_face_distance = neighbors
        .iter()
        .map(|r| r.face_distance)
        .fold(f64::INFINITY, f64::min);
    let sphere_volume = 4.0 / 3.0 * PI * min_face_distance.powi(3);

    let local = table.weighted(&site.occupancy)?;
    let mut diff = [0.0; NUM_PROPERTIES];
    for r in neighbors {
        let neighbor = table.weighted(&r.occupancy)?;
        for ((slot, &l), &n) in diff.iter_mut().zip(&local).zip(&neighbor) {
            *slot += (l - n).abs() * r.area;
        }
    }

    let mut structural = Vec::with_capacity(NUM_STRUCTURAL);
    structural.push(effective_coordination);
    structural.push(bond_mean);
    structural.push(bond_variation);
    structural.push(cell_volume);
    structural.push(sphere_volume);
    structural.extend(diff.iter().map(|d| d / total_area));

    Ok(SiteAttributes {
        structural,
        elemental: local.to_vec(),
    })
}

/// Matches each facet of the dilute site back to the structure site behind
/// it and records the facet's signature against that site.
///
/// Each structure site may be claimed by at most one facet: a facet first
/// claims its recorded site index, and if that is taken it claims any
/// still-unclaimed site that is a periodic image with the same occupancy.
/// A facet with no claimable site is an error, not a silent skip.
pub(crate) fn dilute_face_map(
    neighbors: &[NeighborRecord],
    structure: &Structure,
) -> Result<BTreeMap<usize, FaceSignature>, Error> {
    let mut claimed = vec![false; structure.site_count()];
    let mut map = BTreeMap::new();
    for record in neighbors {
        let signature = FaceSignature::of(record);
        let owner = if !claimed[record.site] {
            record.site
        } else {
            let frac = structure.lattice.fractional(record.position);
            let occupancy = record.occupancy.signature();
            structure
                .sites
                .iter()
                .enumerate()
                .position(|(j, s)| {
                    !claimed[j]
                        && s.occupancy.signature() == occupancy
                        && structure.lattice.is_periodic_image(s.frac, frac, MATCH_TOL)
                })
                .ok_or(Error::UnresolvedNeighbor { site: record.site })?
        };
        claimed[owner] = true;
        map.insert(owner, signature);
    }
    Ok(map)
}
