use crate::geometry::GeometryError;
use crate::model::types::Element;
use thiserror::Error;

/// Errors surfaced by descriptor computation.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to parse elemental property table: {0}")]
    PropertyParse(#[from] toml::de::Error),

    #[error("invalid elemental property table: {0}")]
    PropertyTable(String),

    #[error("element {element} (Z = {z}) is not covered by the property table")]
    UnsupportedElement { element: Element, z: u8 },

    #[error("structure contains no sites")]
    EmptyStructure,

    #[error("reference base structure has {got} sites, expected {expected}")]
    BaseMismatch { expected: usize, got: usize },

    #[error(
        "no unique dilute site: {distinct} distinct site signatures with {singletons} singletons"
    )]
    AmbiguousDiluteSite { distinct: usize, singletons: usize },

    #[error("degenerate neighbor geometry at site {site}: total facet area is zero")]
    DegenerateGeometry { site: usize },

    #[error("neighbor of the dilute site could not be matched to structure site {site}")]
    UnresolvedNeighbor { site: usize },

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}
