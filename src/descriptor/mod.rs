//! Dilute local-environment descriptor.
//!
//! One dilute site embedded in an otherwise regular host: the pipeline
//! finds that site, samples the distinct local environments it perturbs,
//! and condenses them into a fixed-length statistical feature vector.

mod aggregate;
mod config;
mod error;
mod grouping;
mod local_env;
mod properties;

pub use config::{BaseStructure, DescriptorConfig};
pub use error::Error;
pub use properties::{load_properties, PropertyTable, NUM_PROPERTIES};

use std::borrow::Cow;

use crate::geometry::{
    EquivalenceFinder, Tessellation, VoronoiSiteClassifier, VoronoiTessellator,
};
use crate::model::structure::Structure;
use crate::model::types::Element;

/// Length of the finished descriptor vector.
pub const DESCRIPTOR_LENGTH: usize = 256;

/// Species substituted onto every site when equivalence is computed over
/// the chemistry-stripped base.
const BASE_PLACEHOLDER: Element = Element::H;

/// Reusable descriptor pipeline: property table plus geometry
/// collaborators.
pub struct DescriptorEngine {
    table: PropertyTable,
    tessellator: VoronoiTessellator,
    classifier: Box<dyn EquivalenceFinder>,
}

impl DescriptorEngine {
    pub fn new(table: PropertyTable) -> Self {
        Self::with_cutoff(table, crate::geometry::DEFAULT_CUTOFF)
    }

    pub fn with_cutoff(table: PropertyTable, cutoff: f64) -> Self {
        let tessellator = VoronoiTessellator::new(cutoff);
        DescriptorEngine {
            table,
            classifier: Box::new(VoronoiSiteClassifier::new(tessellator.clone())),
            tessellator,
        }
    }

    /// Swaps in a different equivalence collaborator, e.g. one backed by a
    /// space-group analysis.
    pub fn with_classifier(mut self, classifier: Box<dyn EquivalenceFinder>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Computes the descriptor of a dilute structure.
    ///
    /// Samples the dilute site itself plus one representative per
    /// equivalence group of the remaining sites, each weighted by its
    /// group's multiplicity, then aggregates.
    pub fn compute(&self, structure: &Structure, base: &BaseStructure) -> Result<Vec<f64>, Error> {
        if structure.sites.is_empty() {
            return Err(Error::EmptyStructure);
        }
        let dilute = grouping::find_dilute(structure)?;

        let base_structure: Cow<'_, Structure> = match base {
            BaseStructure::Pure => Cow::Owned(structure.with_uniform_species(BASE_PLACEHOLDER)),
            BaseStructure::Reference(reference) => {
                if reference.site_count() != structure.site_count() {
                    return Err(Error::BaseMismatch {
                        expected: structure.site_count(),
                        got: reference.site_count(),
                    });
                }
                Cow::Borrowed(reference)
            }
        };
        let classes = self.classifier.equivalent_atoms(&base_structure)?;

        let dilute_neighbors = self.tessellator.neighbors(structure, dilute)?;
        let dilute_attrs = local_env::site_attributes(
            &dilute_neighbors,
            &structure.sites[dilute],
            &self.table,
            dilute,
        )?;
        let faces = local_env::dilute_face_map(&dilute_neighbors, structure)?;

        let mut samples = vec![dilute_attrs];
        for group in grouping::group_sites(&classes, dilute, &faces) {
            let neighbors = self.tessellator.neighbors(structure, group.representative)?;
            let attrs = local_env::site_attributes(
                &neighbors,
                &structure.sites[group.representative],
                &self.table,
                group.representative,
            )?;
            for _ in 0..group.multiplicity {
                samples.push(attrs.clone());
            }
        }

        aggregate::assemble(&samples, structure, &self.table)
    }
}

/// One-shot convenience wrapper around [`DescriptorEngine`].
pub fn compute_descriptor(
    structure: &Structure,
    config: &DescriptorConfig,
) -> Result<Vec<f64>, Error> {
    let table = load_properties(config.properties.as_deref())?;
    let engine = DescriptorEngine::with_cutoff(table, config.cutoff);
    engine.compute(structure, &config.base)
}
