use crate::geometry::DEFAULT_CUTOFF;
use crate::model::structure::Structure;

/// Base structure used for equivalence analysis.
#[derive(Debug, Clone, Default)]
pub enum BaseStructure {
    /// Strip the chemistry: every site takes the same placeholder species,
    /// so equivalence reflects geometry alone.
    #[default]
    Pure,
    /// Caller-supplied reference with the same site list, e.g. the host
    /// lattice before the dilute substitution.
    Reference(Structure),
}

/// Settings for a descriptor computation.
#[derive(Debug, Clone)]
pub struct DescriptorConfig {
    pub base: BaseStructure,
    /// Voronoi candidate search radius, Å.
    pub cutoff: f64,
    /// Custom elemental property table as TOML text; `None` uses the
    /// embedded default.
    pub properties: Option<String>,
}

impl Default for DescriptorConfig {
    fn default() -> Self {
        DescriptorConfig {
            base: BaseStructure::Pure,
            cutoff: DEFAULT_CUTOFF,
            properties: None,
        }
    }
}
