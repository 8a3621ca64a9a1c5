//! Species registry: the set of species an engine may bind to.
//!
//! Built once at startup around a single property oracle and passed explicitly
//! to whoever needs substances. Each registered species has one template
//! substance; callers receive clones of it.

use crate::error::{FluidError, FluidResult};
use crate::ideal_gas::IdealGasOracle;
use crate::oracle::PropertyOracle;
use crate::species::Species;
use crate::substance::Substance;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct SpeciesRegistry {
    oracle: Arc<dyn PropertyOracle>,
    templates: BTreeMap<Species, Substance>,
}

impl SpeciesRegistry {
    /// Register every species the oracle supports.
    pub fn new(oracle: Arc<dyn PropertyOracle>) -> FluidResult<Self> {
        let mut templates = BTreeMap::new();
        for species in Species::ALL {
            if !oracle.supports(species) {
                continue;
            }
            let formula = oracle.composition(species)?;
            templates.insert(
                species,
                Substance::bound(formula, species, Arc::clone(&oracle)),
            );
        }
        tracing::debug!(
            oracle = oracle.name(),
            species = templates.len(),
            "species registry built"
        );
        Ok(Self { oracle, templates })
    }

    /// Registry over the built-in ideal-gas oracle.
    pub fn standard() -> Self {
        let oracle: Arc<dyn PropertyOracle> = Arc::new(IdealGasOracle::new());
        let templates = Species::ALL
            .into_iter()
            .map(|species| {
                (
                    species,
                    Substance::bound(species.formula(), species, Arc::clone(&oracle)),
                )
            })
            .collect();
        Self { oracle, templates }
    }

    pub fn oracle(&self) -> &Arc<dyn PropertyOracle> {
        &self.oracle
    }

    pub fn is_registered(&self, species: Species) -> bool {
        self.templates.contains_key(&species)
    }

    /// Registered species, in declaration order.
    pub fn species(&self) -> impl Iterator<Item = Species> + '_ {
        self.templates.keys().copied()
    }

    /// Resolve a species name (formula, common name or `ig.` key).
    pub fn lookup(&self, name: &str) -> FluidResult<Species> {
        name.parse::<Species>()
            .ok()
            .filter(|species| self.is_registered(*species))
            .ok_or_else(|| FluidError::UnknownSpecies {
                name: name.to_string(),
            })
    }

    /// A fresh bound substance for `species`.
    pub fn substance(&self, species: Species) -> FluidResult<Substance> {
        self.templates
            .get(&species)
            .cloned()
            .ok_or_else(|| FluidError::UnknownSpecies {
                name: species.key().to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Formula;

    /// Oracle that only knows oxygen and nitrogen.
    #[derive(Debug)]
    struct DiatomicOnly(IdealGasOracle);

    impl PropertyOracle for DiatomicOnly {
        fn name(&self) -> &str {
            "diatomic-only"
        }
        fn supports(&self, species: Species) -> bool {
            matches!(species, Species::O2 | Species::N2)
        }
        fn temperature(&self, s: Species, p: f64, v: f64) -> FluidResult<f64> {
            self.0.temperature(s, p, v)
        }
        fn pressure(&self, s: Species, t: f64, v: f64) -> FluidResult<f64> {
            self.0.pressure(s, t, v)
        }
        fn volume(&self, s: Species, t: f64, p: f64) -> FluidResult<f64> {
            self.0.volume(s, t, p)
        }
        fn cp(&self, s: Species) -> FluidResult<f64> {
            self.0.cp(s)
        }
        fn cv(&self, s: Species) -> FluidResult<f64> {
            self.0.cv(s)
        }
        fn density(&self, s: Species) -> FluidResult<f64> {
            self.0.density(s)
        }
        fn tabulated_enthalpy(&self, s: Species, t: f64) -> FluidResult<f64> {
            self.0.tabulated_enthalpy(s, t)
        }
    }

    #[test]
    fn standard_registers_everything() {
        let reg = SpeciesRegistry::standard();
        assert_eq!(reg.species().count(), Species::ALL.len());
        assert_eq!(reg.lookup("ig.C2H6O").unwrap(), Species::Ethanol);
    }

    #[test]
    fn registry_follows_oracle_support() {
        let reg = SpeciesRegistry::new(Arc::new(DiatomicOnly(IdealGasOracle::new()))).unwrap();
        assert!(reg.is_registered(Species::O2));
        assert!(!reg.is_registered(Species::Octane));
        assert!(matches!(
            reg.lookup("octane"),
            Err(FluidError::UnknownSpecies { .. })
        ));
        assert!(reg.substance(Species::CO2).is_err());
    }

    #[test]
    fn templates_are_independent_copies() {
        let reg = SpeciesRegistry::standard();
        let a = reg.substance(Species::Octane).unwrap();
        let b = reg.substance(Species::Octane).unwrap();
        a.set_density(743.2).unwrap();
        assert_ne!(b.density().unwrap(), 743.2);
        assert_eq!(a.elemental_composition(), b.elemental_composition());
        assert_ne!(a.elemental_composition(), Formula::new());
    }
}
