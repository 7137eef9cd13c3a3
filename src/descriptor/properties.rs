//! Elemental property table.
//!
//! A read-only matrix of per-element reference values (Magpie-style
//! columns), embedded in the binary and parsed once. Callers can swap in
//! their own table through [`load_properties`]; the pipeline never writes
//! to it.

use std::sync::OnceLock;

use serde::Deserialize;

use super::error::Error;
use crate::model::site::Occupancy;
use crate::model::types::Element;

/// Number of property columns per element.
pub const NUM_PROPERTIES: usize = 21;

/// Column indices into a property row. Order matches the embedded table.
pub(crate) const COL_ELECTRONEGATIVITY: usize = 7;
pub(crate) const COL_NS_VALENCE: usize = 8;
pub(crate) const COL_NF_VALENCE: usize = 11;

const DEFAULT_TABLE_TOML: &str = include_str!("../../resources/element.properties.toml");

static DEFAULT_TABLE: OnceLock<PropertyTable> = OnceLock::new();

#[derive(Debug, Deserialize)]
struct TableDoc {
    elements: Vec<ElementRow>,
}

#[derive(Debug, Deserialize)]
struct ElementRow {
    symbol: String,
    z: u8,
    values: Vec<f64>,
}

/// Per-element property rows, indexed by atomic number.
#[derive(Debug, Clone)]
pub struct PropertyTable {
    rows: Vec<[f64; NUM_PROPERTIES]>,
}

impl PropertyTable {
    /// Parses a table from TOML text.
    ///
    /// Rows must cover atomic numbers 1..=N contiguously, each with exactly
    /// [`NUM_PROPERTIES`] values. Non-finite entries (missing data in the
    /// source tables) are zeroed.
    pub fn from_toml(text: &str) -> Result<Self, Error> {
        let doc: TableDoc = toml::from_str(text)?;
        let mut rows = Vec::with_capacity(doc.elements.len());
        for (i, row) in doc.elements.iter().enumerate() {
            let expected_z = (i + 1) as u8;
            if row.z != expected_z {
                return Err(Error::PropertyTable(format!(
                    "row {} ({}) has Z = {}, expected {}",
                    i, row.symbol, row.z, expected_z
                )));
            }
            if row.values.len() != NUM_PROPERTIES {
                return Err(Error::PropertyTable(format!(
                    "element {} has {} values, expected {}",
                    row.symbol,
                    row.values.len(),
                    NUM_PROPERTIES
                )));
            }
            let mut values = [0.0; NUM_PROPERTIES];
            for (slot, &v) in values.iter_mut().zip(&row.values) {
                *slot = if v.is_finite() { v } else { 0.0 };
            }
            rows.push(values);
        }
        if rows.is_empty() {
            return Err(Error::PropertyTable("table has no elements".into()));
        }
        Ok(PropertyTable { rows })
    }

    /// Number of elements covered.
    pub fn element_count(&self) -> usize {
        self.rows.len()
    }

    /// Property row of an element.
    pub fn lookup(&self, element: Element) -> Result<&[f64; NUM_PROPERTIES], Error> {
        let z = element.atomic_number();
        self.rows
            .get(z as usize - 1)
            .ok_or(Error::UnsupportedElement { element, z })
    }

    /// Occupancy-weighted property vector of a (possibly mixed) site.
    pub fn weighted(&self, occupancy: &Occupancy) -> Result<[f64; NUM_PROPERTIES], Error> {
        let mut acc = [0.0; NUM_PROPERTIES];
        for (element, occ) in occupancy.iter() {
            let row = self.lookup(element)?;
            for (slot, &v) in acc.iter_mut().zip(row.iter()) {
                *slot += occ * v;
            }
        }
        Ok(acc)
    }
}

/// Loads the property table, either the embedded default or custom TOML
/// text supplied by the caller.
pub fn load_properties(custom: Option<&str>) -> Result<PropertyTable, Error> {
    match custom {
        Some(text) => PropertyTable::from_toml(text),
        None => Ok(default_table().clone()),
    }
}

/// The embedded default table, parsed on first use.
pub(crate) fn default_table() -> &'static PropertyTable {
    DEFAULT_TABLE.get_or_init(|| {
        PropertyTable::from_toml(DEFAULT_TABLE_TOML)
            .unwrap_or_else(|e| panic!("embedded property table is invalid: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_covers_the_periodic_table() {
        let table = default_table();
        assert!(table.element_count() >= 100);
        let ni = table.lookup(Element::Ni).unwrap();
        assert_eq!(ni[0], 28.0);
        assert!((ni[COL_ELECTRONEGATIVITY] - 1.91).abs() < 1e-9);
    }

    #[test]
    fn weighted_row_mixes_occupancies() {
        let table = default_table();
        let occ = Occupancy::new(vec![(Element::Fe, 0.5), (Element::Cr, 0.5)]);
        let row = table.weighted(&occ).unwrap();
        assert!((row[0] - (26.0 + 24.0) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn malformed_row_is_rejected() {
        let text = r#"
[[elements]]
symbol = "H"
z = 1
values = [1.0, 2.0]
"#;
        let err = PropertyTable::from_toml(text).unwrap_err();
        assert!(matches!(err, Error::PropertyTable(_)));
    }

    #[test]
    fn gap_in_atomic_numbers_is_rejected() {
        let text = r#"
[[elements]]
symbol = "He"
z = 2
values = [2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]
"#;
        let err = PropertyTable::from_toml(text).unwrap_err();
        assert!(matches!(err, Error::PropertyTable(_)));
    }
}
