//! oc-fluids: chemical species and their thermodynamic properties.
//!
//! Provides:
//! - Elements and elemental formulas (C, H, O, N)
//! - Chemical species definitions (octane, ethanol, O2, N2, CO2, H2O, air)
//! - `PropertyOracle` trait for state relations and constants
//! - Ideal-gas oracle backed by a tabulated enthalpy table
//! - `Substance`, a formula that is either unbound or bound to a species
//! - `SpeciesRegistry`, built once and handed to consumers explicitly
//!
//! # Example
//!
//! ```
//! use oc_fluids::{Species, SpeciesRegistry};
//!
//! let registry = SpeciesRegistry::standard();
//! let air = registry.substance(Species::Air).unwrap();
//! let v = air.volume(300.0, 100_000.0).unwrap();
//! assert!(v > 0.8 && v < 0.9);
//! ```

pub mod element;
pub mod enthalpy_table;
pub mod error;
pub mod ideal_gas;
pub mod oracle;
pub mod registry;
pub mod species;
pub mod substance;

// Re-exports for ergonomics
pub use element::{Element, Formula};
pub use enthalpy_table::EnthalpyTable;
pub use error::{FluidError, FluidResult};
pub use ideal_gas::IdealGasOracle;
pub use oracle::PropertyOracle;
pub use registry::SpeciesRegistry;
pub use species::Species;
pub use substance::{Binding, Substance, combine_linear};
