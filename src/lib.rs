//! A pure Rust library for dilute local-chemical-environment descriptors of
//! periodic crystal structures. It combines Voronoi neighborhood analysis,
//! dilute-site equivalence grouping, and elemental reference properties to
//! produce fixed-length feature vectors for machine-learning interatomic
//! property models.
//!
//! # Features
//!
//! - **Voronoi tessellation** — Exact periodic Voronoi cells by half-space
//!   clipping, with facet areas, face distances, and slice volumes
//! - **Dilute-site analysis** — Automatic detection of the lone substituted
//!   site and grouping of host sites perturbed by it
//! - **Statistical aggregation** — Weighted mean/deviation/extrema/mode
//!   statistics over the distinct local environments, plus stoichiometric,
//!   valence, and ionicity attributes
//! - **Deterministic output** — Identical input yields a bit-for-bit
//!   identical descriptor, independent of site order
//!
//! # Quick Start
//!
//! The main entry point is [`compute_descriptor`], which takes a
//! [`Structure`] containing exactly one dilute site and a
//! [`DescriptorConfig`]:
//!
//! ```
//! use vorodesc::{compute_descriptor, DescriptorConfig, DESCRIPTOR_LENGTH};
//! use vorodesc::{Element, Lattice, Site, Structure};
//!
//! // FCC nickel, conventional cell.
//! let fcc = Structure::new(
//!     Lattice::cubic(3.52),
//!     vec![
//!         Site::ordered(Element::Ni, [0.0, 0.0, 0.0]),
//!         Site::ordered(Element::Ni, [0.0, 0.5, 0.5]),
//!         Site::ordered(Element::Ni, [0.5, 0.0, 0.5]),
//!         Site::ordered(Element::Ni, [0.5, 0.5, 0.0]),
//!     ],
//! );
//!
//! // 2x2x2 supercell with a single chromium substitution.
//! let mut alloy = fcc.supercell([2, 2, 2]);
//! alloy.sites[0] = Site::ordered(Element::Cr, alloy.sites[0].frac);
//!
//! let descriptor = compute_descriptor(&alloy, &DescriptorConfig::default())?;
//! assert_eq!(descriptor.len(), DESCRIPTOR_LENGTH);
//!
//! // Two elements in the composition block.
//! assert_eq!(descriptor[118], 2.0);
//! # Ok::<(), vorodesc::Error>(())
//! ```
//!
//! # Module Organization
//!
//! - [`model`] — Lattices, sites, occupancies, and structures
//! - [`geometry`] — Voronoi tessellation and site-equivalence collaborators
//! - [`descriptor`] — The descriptor pipeline itself
//! - [`io`] — Structure input from JSON documents

pub mod descriptor;
pub mod geometry;
pub mod io;
pub mod model;

pub use descriptor::{
    compute_descriptor, BaseStructure, DescriptorConfig, DescriptorEngine, Error,
    PropertyTable, DESCRIPTOR_LENGTH,
};
pub use geometry::{
    EquivalenceFinder, GeometryError, NeighborRecord, Tessellation, VoronoiSiteClassifier,
    VoronoiTessellator,
};
pub use model::lattice::Lattice;
pub use model::site::{Occupancy, Site};
pub use model::structure::Structure;
pub use model::types::Element;
