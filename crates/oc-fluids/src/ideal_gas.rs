//! Ideal-gas property oracle.
//!
//! State relations follow `p·v = R·T` with the specific gas constant
//! `R = R̄ / M`. Specific heats are frozen at 298.15 K, so `cp/cv` is a
//! constant per species.

use crate::enthalpy_table::EnthalpyTable;
use crate::error::{FluidError, FluidResult};
use crate::oracle::{PropertyOracle, validation};
use crate::species::Species;
use oc_core::units::constants::{P_STANDARD_PA, R_UNIVERSAL, T_STANDARD_K};

/// Ideal-gas oracle with constant specific heats and a tabulated enthalpy table.
#[derive(Debug, Clone, Default)]
pub struct IdealGasOracle {
    enthalpy: EnthalpyTable,
}

impl IdealGasOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Specific gas constant [J/(kg·K)].
    pub fn gas_constant(species: Species) -> f64 {
        R_UNIVERSAL / species.molar_mass()
    }

    /// Specific heat at constant pressure at 298.15 K [J/(kg·K)].
    fn cp_298(species: Species) -> f64 {
        match species {
            Species::Octane => 1_653.7,
            Species::Ethanol => 1_424.0,
            Species::O2 => 918.0,
            Species::N2 => 1_039.5,
            Species::CO2 => 843.7,
            Species::H2O => 1_864.0,
            Species::Air => 1_004.6,
        }
    }
}

impl PropertyOracle for IdealGasOracle {
    fn name(&self) -> &str {
        "ideal-gas"
    }

    fn supports(&self, _species: Species) -> bool {
        true
    }

    fn temperature(&self, species: Species, p_pa: f64, v_m3_per_kg: f64) -> FluidResult<f64> {
        let p = validation::positive(species, "pressure", p_pa)?;
        let v = validation::positive(species, "specific volume", v_m3_per_kg)?;
        Ok(p * v / Self::gas_constant(species))
    }

    fn pressure(&self, species: Species, t_k: f64, v_m3_per_kg: f64) -> FluidResult<f64> {
        let t = validation::positive(species, "temperature", t_k)?;
        let v = validation::positive(species, "specific volume", v_m3_per_kg)?;
        Ok(Self::gas_constant(species) * t / v)
    }

    fn volume(&self, species: Species, t_k: f64, p_pa: f64) -> FluidResult<f64> {
        let t = validation::positive(species, "temperature", t_k)?;
        let p = validation::positive(species, "pressure", p_pa)?;
        Ok(Self::gas_constant(species) * t / p)
    }

    fn cp(&self, species: Species) -> FluidResult<f64> {
        Ok(Self::cp_298(species))
    }

    fn cv(&self, species: Species) -> FluidResult<f64> {
        let cv = Self::cp_298(species) - Self::gas_constant(species);
        if cv <= 0.0 {
            return Err(FluidError::lookup(species, "cv must be positive"));
        }
        Ok(cv)
    }

    fn density(&self, species: Species) -> FluidResult<f64> {
        let v = self.volume(species, T_STANDARD_K, P_STANDARD_PA)?;
        Ok(1.0 / v)
    }

    fn tabulated_enthalpy(&self, species: Species, t_k: f64) -> FluidResult<f64> {
        self.enthalpy.molar_enthalpy(species, t_k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oc_core::numeric::{Tolerances, nearly_equal};

    #[test]
    fn air_at_standard_conditions() {
        let oracle = IdealGasOracle::new();
        let rho = oracle.density(Species::Air).unwrap();
        assert!((rho - 1.184).abs() < 0.005, "rho = {rho}");

        let cp = oracle.cp(Species::Air).unwrap();
        let cv = oracle.cv(Species::Air).unwrap();
        assert!((cp / cv - 1.4).abs() < 0.005);
    }

    #[test]
    fn state_relations_are_consistent() {
        let oracle = IdealGasOracle::new();
        let tol = Tolerances::default();
        let v = oracle.volume(Species::N2, 300.0, 100_000.0).unwrap();
        let t = oracle.temperature(Species::N2, 100_000.0, v).unwrap();
        let p = oracle.pressure(Species::N2, 300.0, v).unwrap();
        assert!(nearly_equal(t, 300.0, tol));
        assert!(nearly_equal(p, 100_000.0, tol));
    }

    #[test]
    fn non_physical_inputs_are_lookup_errors() {
        let oracle = IdealGasOracle::new();
        assert!(matches!(
            oracle.volume(Species::Air, -10.0, 100_000.0),
            Err(FluidError::PropertyLookup { .. })
        ));
        assert!(matches!(
            oracle.temperature(Species::Air, 100_000.0, 0.0),
            Err(FluidError::PropertyLookup { .. })
        ));
    }

    #[test]
    fn default_trait_methods() {
        let oracle = IdealGasOracle::new();
        assert_eq!(oracle.molar_mass(Species::CO2).unwrap(), 44.010);
        assert_eq!(
            oracle.formation_enthalpy(Species::CO2).unwrap(),
            -393_520.0
        );
        assert!(oracle.formation_enthalpy(Species::Air).is_err());
        assert_eq!(oracle.composition(Species::H2O).unwrap(), Species::H2O.formula());
    }
}
