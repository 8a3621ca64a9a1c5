//! Property oracle trait and validation helpers.

use crate::element::Formula;
use crate::error::{FluidError, FluidResult};
use crate::species::Species;
use std::fmt;

/// Trait for thermodynamic property providers.
///
/// Implementations must be thread-safe (Send + Sync) so that one oracle can be
/// shared by every engine built from the same registry. Units are SI:
/// pressure [Pa], temperature [K], specific volume [m³/kg], specific heats
/// [J/(kg·K)], density [kg/m³], molar enthalpies [kJ/kmol].
pub trait PropertyOracle: Send + Sync + fmt::Debug {
    /// Get the oracle name (for debugging/logging).
    fn name(&self) -> &str;

    /// Check if this oracle can evaluate the given species.
    fn supports(&self, species: Species) -> bool;

    /// Temperature from pressure and specific volume.
    fn temperature(&self, species: Species, p_pa: f64, v_m3_per_kg: f64) -> FluidResult<f64>;

    /// Pressure from temperature and specific volume.
    fn pressure(&self, species: Species, t_k: f64, v_m3_per_kg: f64) -> FluidResult<f64>;

    /// Specific volume from temperature and pressure.
    fn volume(&self, species: Species, t_k: f64, p_pa: f64) -> FluidResult<f64>;

    /// Specific heat at constant pressure.
    fn cp(&self, species: Species) -> FluidResult<f64>;

    /// Specific heat at constant volume.
    fn cv(&self, species: Species) -> FluidResult<f64>;

    /// Default density of the species.
    fn density(&self, species: Species) -> FluidResult<f64>;

    /// Tabulated molar enthalpy at `t_k`, relative to the table's reference.
    fn tabulated_enthalpy(&self, species: Species, t_k: f64) -> FluidResult<f64>;

    /// Molar mass [kg/kmol].
    fn molar_mass(&self, species: Species) -> FluidResult<f64> {
        self.ensure_supported(species)?;
        Ok(species.molar_mass())
    }

    /// Elemental composition, used to back-fill substances bound by name.
    fn composition(&self, species: Species) -> FluidResult<Formula> {
        self.ensure_supported(species)?;
        Ok(species.formula())
    }

    /// Enthalpy of formation [kJ/kmol].
    fn formation_enthalpy(&self, species: Species) -> FluidResult<f64> {
        self.ensure_supported(species)?;
        species
            .formation_enthalpy()
            .ok_or_else(|| FluidError::lookup(species, "no enthalpy of formation"))
    }

    #[doc(hidden)]
    fn ensure_supported(&self, species: Species) -> FluidResult<()> {
        if self.supports(species) {
            Ok(())
        } else {
            Err(FluidError::lookup(
                species,
                format!("not supported by oracle '{}'", self.name()),
            ))
        }
    }
}

/// Validation helpers for oracle inputs and outputs.
pub(crate) mod validation {
    use super::*;

    /// Ensure a state input is positive and finite.
    pub fn positive(species: Species, what: &'static str, value: f64) -> FluidResult<f64> {
        if !value.is_finite() || value <= 0.0 {
            return Err(FluidError::lookup(
                species,
                format!("{what} must be positive and finite (got {value})"),
            ));
        }
        Ok(value)
    }
}
