//! Fluid property errors.

use thiserror::Error;

/// Result type for fluid operations.
pub type FluidResult<T> = Result<T, FluidError>;

/// Errors that can occur while working with substances and their properties.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FluidError {
    /// A property was requested from a substance not yet bound to a species.
    #[error("Substance is not bound to a species: cannot evaluate {what}")]
    UnboundSubstance { what: &'static str },

    /// Binding or lookup by a name the registry does not know.
    #[error("Unknown species: {name}")]
    UnknownSpecies { name: String },

    /// Composition key that is not a supported chemical element.
    #[error("The key {symbol} is not a chemical element")]
    UnknownElement { symbol: String },

    /// The property oracle cannot resolve the requested state or constant.
    #[error("Property lookup failed for {species}: {what}")]
    PropertyLookup { species: &'static str, what: String },

    /// Non-physical values (negative counts, densities, etc.).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },
}

impl FluidError {
    pub(crate) fn lookup(species: crate::Species, what: impl Into<String>) -> Self {
        FluidError::PropertyLookup {
            species: species.key(),
            what: what.into(),
        }
    }
}
