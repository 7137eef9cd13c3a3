use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::Error;
use crate::model::lattice::Lattice;
use crate::model::site::{Occupancy, Site};
use crate::model::structure::Structure;

#[derive(Debug, Deserialize)]
struct StructureDoc {
    lattice: LatticeDoc,
    sites: Vec<SiteDoc>,
}

#[derive(Debug, Deserialize)]
struct LatticeDoc {
    matrix: [[f64; 3]; 3],
}

#[derive(Debug, Deserialize)]
struct SiteDoc {
    species: Vec<SpeciesDoc>,
    abc: [f64; 3],
}

#[derive(Debug, Deserialize)]
struct SpeciesDoc {
    element: String,
    occu: f64,
}

/// Parses a structure from JSON text.
pub fn parse_structure(text: &str) -> Result<Structure, Error> {
    let doc: StructureDoc = serde_json::from_str(text)?;
    let lattice = Lattice::new(doc.lattice.matrix)
        .map_err(|e| Error::BadDocument(e.to_string()))?;
    let mut sites = Vec::with_capacity(doc.sites.len());
    for site in &doc.sites {
        let mut entries = Vec::with_capacity(site.species.len());
        for sp in &site.species {
            let element = sp.element.parse().map_err(|_| Error::UnknownElement {
                symbol: sp.element.clone(),
            })?;
            if !(sp.occu > 0.0) {
                return Err(Error::BadDocument(format!(
                    "species {} has non-positive occupancy {}",
                    sp.element, sp.occu
                )));
            }
            entries.push((element, sp.occu));
        }
        if entries.is_empty() {
            return Err(Error::BadDocument("site with no species".into()));
        }
        sites.push(Site::new(Occupancy::new(entries), site.abc));
    }
    if sites.is_empty() {
        return Err(Error::BadDocument("structure has no sites".into()));
    }
    Ok(Structure::new(lattice, sites))
}

/// Reads and parses a structure file.
pub fn read_structure(path: &Path) -> Result<Structure, Error> {
    let text = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_structure(&text)
}
