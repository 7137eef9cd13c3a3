//! Assembly of the final descriptor vector from the sampled environments.
//!
//! The layout and index arithmetic here are fixed by the trained models
//! downstream: statistics order, the normalization of the bond-length and
//! volume blocks, the exact set of dropped columns, and the insertion
//! point of the composition block all have to stay bit-compatible.

use std::collections::BTreeMap;

use super::error::Error;
use super::local_env::{SiteAttributes, NUM_STRUCTURAL};
use super::properties::{
    PropertyTable, COL_ELECTRONEGATIVITY, COL_NF_VALENCE, COL_NS_VALENCE, NUM_PROPERTIES,
};
use super::DESCRIPTOR_LENGTH;
use crate::model::structure::Structure;
use crate::model::types::Element;

/// Absolute tolerance when binning samples for the mode statistic.
const MODE_TOL: f64 = 1e-6;

/// Statistics columns removed from the structural block. Indices refer to
/// the pre-deletion layout and are applied highest-first.
const DROPPED: [usize; 12] = [4, 5, 9, 14, 15, 17, 18, 19, 21, 22, 23, 24];

/// Where the composition block is spliced in after the deletions.
const COMPOSITION_SPLICE: usize = 118;

/// Minkowski norm exponents over the composition fractions.
const NORM_EXPONENTS: [f64; 5] = [2.0, 3.0, 5.0, 7.0, 10.0];

pub(crate) fn assemble(
    samples: &[SiteAttributes],
    structure: &Structure,
    table: &PropertyTable,
) -> Result<Vec<f64>, Error> {
    let n = samples.len();
    let mut props = Vec::with_capacity(DESCRIPTOR_LENGTH);

    // Structural block: five statistics per column.
    for c in 0..NUM_STRUCTURAL {
        let col: Vec<f64> = samples.iter().map(|s| s.structural[c]).collect();
        let (lo, hi) = extrema(&col);
        let m = mean(&col);
        props.push(m);
        props.push(mad(&col, m));
        props.push(lo);
        props.push(hi);
        props.push(hi - lo);
    }

    // Elemental block: six statistics per property column.
    for c in 0..NUM_PROPERTIES {
        let col: Vec<f64> = samples.iter().map(|s| s.elemental[c]).collect();
        let (lo, hi) = extrema(&col);
        let m = mean(&col);
        props.push(m);
        props.push(hi - lo);
        props.push(mad(&col, m));
        props.push(hi);
        props.push(lo);
        props.push(mode(&col));
    }

    // Bond length statistics relative to their mean, likewise the cell
    // volume spread; the raw means drop out just below.
    props[6] /= props[5];
    props[7] /= props[5];
    props[8] /= props[5];
    props[16] /= props[15];
    for &i in DROPPED.iter().rev() {
        props.remove(i);
    }

    // Packing-efficiency proxy: mean inscribed-sphere volume per unit of
    // available volume.
    props[12] *= n as f64 / structure.volume();

    let composition = composition_fractions(structure);
    for &p in NORM_EXPONENTS.iter().rev() {
        let norm = composition
            .values()
            .map(|f| f.powf(p))
            .sum::<f64>()
            .powf(1.0 / p);
        props.insert(COMPOSITION_SPLICE, norm);
    }
    props.insert(COMPOSITION_SPLICE, composition.len() as f64);

    // Composition-averaged valence occupation, as s/p/d/f fractions.
    let mut valence = [0.0f64; 4];
    for (&element, &fraction) in &composition {
        let row = table.lookup(element)?;
        for (slot, &v) in valence
            .iter_mut()
            .zip(&row[COL_NS_VALENCE..=COL_NF_VALENCE])
        {
            *slot += fraction * v;
        }
    }
    let total: f64 = valence.iter().sum();
    for v in valence {
        props.push(if total > 0.0 { v / total } else { 0.0 });
    }

    // Pauling ionic character over all composition pairs.
    let mut max_ionic = 0.0f64;
    let mut avg_ionic = 0.0f64;
    for (&e1, &f1) in &composition {
        let chi1 = table.lookup(e1)?[COL_ELECTRONEGATIVITY];
        for (&e2, &f2) in &composition {
            let chi2 = table.lookup(e2)?[COL_ELECTRONEGATIVITY];
            let ionic = 1.0 - (-0.25 * (chi1 - chi2).powi(2)).exp();
            if ionic > max_ionic {
                max_ionic = ionic;
            }
            avg_ionic += f1 * f2 * ionic;
        }
    }
    props.push(max_ionic);
    props.push(avg_ionic);

    debug_assert_eq!(props.len(), DESCRIPTOR_LENGTH);
    Ok(props)
}

/// Overall site fractions of each element, occupancies included.
fn composition_fractions(structure: &Structure) -> BTreeMap<Element, f64> {
    let n = structure.site_count() as f64;
    let mut fractions = BTreeMap::new();
    for site in &structure.sites {
        for (element, occ) in site.occupancy.iter() {
            *fractions.entry(element).or_insert(0.0) += occ / n;
        }
    }
    fractions
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Mean absolute deviation about the mean.
fn mad(values: &[f64], mean: f64) -> f64 {
    values.iter().map(|v| (v - mean).abs()).sum::<f64>() / values.len() as f64
}

fn extrema(values: &[f64]) -> (f64, f64) {
    values.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
        (lo.min(v), hi.max(v))
    })
}

/// Most frequent value up to [`MODE_TOL`]; the earliest sample wins ties,
/// so an all-distinct column yields its first entry.
fn mode(values: &[f64]) -> f64 {
    let mut bins: Vec<(f64, usize)> = Vec::new();
    for &v in values {
        match bins.iter_mut().find(|(rep, _)| (*rep - v).abs() <= MODE_TOL) {
            Some((_, count)) => *count += 1,
            None => bins.push((v, 1)),
        }
    }
    let mut best = bins[0];
    for &bin in &bins[1..] {
        if bin.1 > best.1 {
            best = bin;
        }
    }
    best.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::lattice::Lattice;
    use crate::model::site::{Occupancy, Site};

    #[test]
    fn mode_prefers_earliest_on_ties() {
        assert_eq!(mode(&[2.0, 2.0, 1.0, 1.0, 3.0]), 2.0);
        assert_eq!(mode(&[5.0, 4.0, 3.0]), 5.0);
        assert_eq!(mode(&[1.0, 1.0 + 5e-7, 9.0]), 1.0);
    }

    #[test]
    fn mad_is_zero_for_constant_columns() {
        let col = [3.5; 8];
        assert_eq!(mad(&col, mean(&col)), 0.0);
    }

    #[test]
    fn single_element_has_zero_ionic_character() {
        let table = crate::descriptor::properties::default_table();
        let s = Structure::new(
            Lattice::cubic(2.87),
            vec![
                Site::ordered(Element::Fe, [0.0, 0.0, 0.0]),
                Site::ordered(Element::Fe, [0.5, 0.5, 0.5]),
            ],
        );
        let sample = SiteAttributes {
            structural: (1..=NUM_STRUCTURAL).map(|v| v as f64).collect(),
            elemental: table.lookup(Element::Fe).unwrap().to_vec(),
        };
        let descriptor = assemble(&[sample.clone(), sample], &s, table).unwrap();
        assert_eq!(descriptor.len(), DESCRIPTOR_LENGTH);
        // One element in the composition, all norms are 1.
        assert_eq!(descriptor[118], 1.0);
        for v in &descriptor[119..124] {
            assert!((v - 1.0).abs() < 1e-12);
        }
        let valence: f64 = descriptor[250..254].iter().sum();
        assert!((valence - 1.0).abs() < 1e-12);
        assert_eq!(descriptor[254], 0.0);
        assert_eq!(descriptor[255], 0.0);
    }

    #[test]
    fn composition_counts_occupancies() {
        use Element::{Cr, Ni};
        let sites = vec![
            Site::ordered(Ni, [0.0, 0.0, 0.0]),
            Site::new(
                Occupancy::new(vec![(Ni, 0.5), (Cr, 0.5)]),
                [0.5, 0.5, 0.5],
            ),
        ];
        let s = Structure::new(Lattice::cubic(3.0), sites);
        let fractions = composition_fractions(&s);
        assert!((fractions[&Ni] - 0.75).abs() < 1e-12);
        assert!((fractions[&Cr] - 0.25).abs() < 1e-12);
    }
}
