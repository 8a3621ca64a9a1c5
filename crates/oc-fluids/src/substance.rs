//! Substances: elemental formulas optionally bound to a chemical species.
//!
//! A substance starts either from an explicit element map (unbound) or from a
//! registry template (bound). Linear combinations always produce a new unbound
//! substance; property queries are only answered once the substance has been
//! bound to a species known to the registry's oracle.

use crate::element::{Element, Formula};
use crate::error::{FluidError, FluidResult};
use crate::oracle::PropertyOracle;
use crate::registry::SpeciesRegistry;
use crate::species::Species;
use oc_core::numeric::celsius_to_kelvin;
use std::cell::OnceCell;
use std::fmt;
use std::sync::Arc;

/// Species identity of a substance.
#[derive(Clone)]
pub enum Binding {
    /// Formal composition only; no property queries are possible.
    Unbound,
    /// Resolved against a species of the given oracle.
    Bound {
        species: Species,
        oracle: Arc<dyn PropertyOracle>,
    },
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Unbound => f.write_str("Unbound"),
            Binding::Bound { species, oracle } => f
                .debug_struct("Bound")
                .field("species", species)
                .field("oracle", &oracle.name())
                .finish(),
        }
    }
}

/// A chemical substance: elemental formula plus species binding.
#[derive(Debug, Clone)]
pub struct Substance {
    formula: Formula,
    binding: Binding,
    /// First explicit or computed density wins.
    density: OnceCell<f64>,
}

impl Substance {
    /// Create an unbound substance from explicit element counts.
    pub fn from_elements(counts: impl IntoIterator<Item = (Element, f64)>) -> FluidResult<Self> {
        let counts: Vec<(Element, f64)> = counts.into_iter().collect();
        if counts.iter().any(|(_, c)| !c.is_finite() || *c < 0.0) {
            return Err(FluidError::NonPhysical {
                what: "element count must be finite and non-negative",
            });
        }
        Ok(Self::unbound(Formula::from_counts(counts)))
    }

    /// Create an unbound substance from (symbol, count) pairs such as `("C", 8.0)`.
    pub fn from_symbols<'a>(
        counts: impl IntoIterator<Item = (&'a str, f64)>,
    ) -> FluidResult<Self> {
        Ok(Self::unbound(Formula::from_symbols(counts)?))
    }

    pub(crate) fn unbound(formula: Formula) -> Self {
        Self {
            formula,
            binding: Binding::Unbound,
            density: OnceCell::new(),
        }
    }

    pub(crate) fn bound(
        formula: Formula,
        species: Species,
        oracle: Arc<dyn PropertyOracle>,
    ) -> Self {
        Self {
            formula,
            binding: Binding::Bound { species, oracle },
            density: OnceCell::new(),
        }
    }

    /// Resolve this substance's identity to the species registered under `name`.
    ///
    /// An empty formula is back-filled from the oracle. A non-empty formula is
    /// kept as is; it is not cross-checked against the species.
    pub fn bind_to_species(&mut self, name: &str, registry: &SpeciesRegistry) -> FluidResult<()> {
        let species = registry.lookup(name)?;
        let oracle = Arc::clone(registry.oracle());
        if self.formula.is_empty() {
            self.formula = oracle.composition(species)?;
        }
        tracing::trace!(species = species.key(), formula = %self.formula, "bound substance");
        self.binding = Binding::Bound { species, oracle };
        Ok(())
    }

    /// Consuming variant of [`Substance::bind_to_species`].
    pub fn bound_to(mut self, name: &str, registry: &SpeciesRegistry) -> FluidResult<Self> {
        self.bind_to_species(name, registry)?;
        Ok(self)
    }

    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    pub fn species(&self) -> Option<Species> {
        match &self.binding {
            Binding::Bound { species, .. } => Some(*species),
            Binding::Unbound => None,
        }
    }

    pub fn is_bound(&self) -> bool {
        matches!(self.binding, Binding::Bound { .. })
    }

    /// Full formula, zero counts included.
    pub fn formula(&self) -> &Formula {
        &self.formula
    }

    /// Non-zero subset of the elemental composition.
    pub fn elemental_composition(&self) -> Formula {
        self.formula.non_zero()
    }

    fn oracle(&self, what: &'static str) -> FluidResult<(Species, &dyn PropertyOracle)> {
        match &self.binding {
            Binding::Bound { species, oracle } => Ok((*species, oracle.as_ref())),
            Binding::Unbound => Err(FluidError::UnboundSubstance { what }),
        }
    }

    /// Temperature [K] from pressure [Pa] and specific volume [m³/kg].
    pub fn temperature(&self, p_pa: f64, v_m3_per_kg: f64) -> FluidResult<f64> {
        let (species, oracle) = self.oracle("temperature")?;
        oracle.temperature(species, p_pa, v_m3_per_kg)
    }

    /// Pressure [Pa] from temperature [K] and specific volume [m³/kg].
    pub fn pressure(&self, t_k: f64, v_m3_per_kg: f64) -> FluidResult<f64> {
        let (species, oracle) = self.oracle("pressure")?;
        oracle.pressure(species, t_k, v_m3_per_kg)
    }

    /// Specific volume [m³/kg] from temperature [K] and pressure [Pa].
    pub fn volume(&self, t_k: f64, p_pa: f64) -> FluidResult<f64> {
        let (species, oracle) = self.oracle("volume")?;
        oracle.volume(species, t_k, p_pa)
    }

    /// Specific heat at constant pressure [J/(kg·K)].
    pub fn specific_heat_cp(&self) -> FluidResult<f64> {
        let (species, oracle) = self.oracle("cp")?;
        oracle.cp(species)
    }

    /// Specific heat at constant volume [J/(kg·K)].
    pub fn specific_heat_cv(&self) -> FluidResult<f64> {
        let (species, oracle) = self.oracle("cv")?;
        oracle.cv(species)
    }

    /// Molar mass [kg/kmol] of the bound species.
    pub fn molar_mass(&self) -> FluidResult<f64> {
        let (species, oracle) = self.oracle("molar mass")?;
        oracle.molar_mass(species)
    }

    /// Density [kg/m³]: the override if one was set, otherwise the oracle default.
    ///
    /// Whichever value is seen first sticks for the lifetime of the substance.
    pub fn density(&self) -> FluidResult<f64> {
        if let Some(rho) = self.density.get() {
            return Ok(*rho);
        }
        let (species, oracle) = self.oracle("density")?;
        let rho = oracle.density(species)?;
        Ok(*self.density.get_or_init(|| rho))
    }

    /// Override the density. Returns `false` (and changes nothing) when a
    /// density has already been set or computed.
    pub fn set_density(&self, rho_kg_m3: f64) -> FluidResult<bool> {
        if !rho_kg_m3.is_finite() || rho_kg_m3 <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "density must be positive and finite",
            });
        }
        Ok(self.density.set(rho_kg_m3).is_ok())
    }

    /// Enthalpy of formation [kJ/kmol] of the bound species.
    pub fn formation_enthalpy(&self) -> FluidResult<f64> {
        let (species, oracle) = self.oracle("formation enthalpy")?;
        oracle.formation_enthalpy(species)
    }

    /// Absolute molar enthalpy [kJ/kmol].
    ///
    /// Products carry the tabulated enthalpy change from `reference_c` (°C) to
    /// `state_k` (K) on top of the formation enthalpy; reactants are taken at
    /// the formation enthalpy alone.
    pub fn absolute_enthalpy(
        &self,
        reference_c: f64,
        state_k: f64,
        is_product: bool,
    ) -> FluidResult<f64> {
        let (species, oracle) = self.oracle("absolute enthalpy")?;
        let h_form = oracle.formation_enthalpy(species)?;
        if !is_product {
            return Ok(h_form);
        }
        let h_ref = oracle.tabulated_enthalpy(species, celsius_to_kelvin(reference_c))?;
        let h_state = oracle.tabulated_enthalpy(species, state_k)?;
        Ok(h_form + (h_state - h_ref))
    }
}

impl fmt::Display for Substance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.species() {
            Some(species) => write!(f, "{} [{}]", species.key(), self.formula),
            None => write!(f, "[{}]", self.formula),
        }
    }
}

/// Linear combination `Σ coefficient × substance` of elemental formulas.
///
/// The result is always unbound, whatever the bindings of the operands.
/// Zero or negative resulting counts are allowed.
pub fn combine_linear(terms: &[(f64, &Substance)]) -> Substance {
    let mut formula = Formula::new();
    for (coefficient, substance) in terms {
        formula.accumulate(*coefficient, &substance.formula);
    }
    Substance::unbound(formula)
}

#[cfg(test)]
mod tests {
    use super::*;
    use oc_core::numeric::{Tolerances, nearly_equal};

    fn registry() -> SpeciesRegistry {
        SpeciesRegistry::standard()
    }

    #[test]
    fn explicit_elements_roundtrip() {
        let s = Substance::from_elements([(Element::C, 8.0), (Element::H, 18.0), (Element::N, 0.0)])
            .unwrap();
        let pairs: Vec<_> = s.elemental_composition().iter().collect();
        assert_eq!(pairs, vec![(Element::C, 8.0), (Element::H, 18.0)]);
        assert!(!s.is_bound());
    }

    #[test]
    fn unknown_symbol_is_rejected() {
        let result = Substance::from_symbols([("C", 1.0), ("Xe", 1.0)]);
        assert!(matches!(result, Err(FluidError::UnknownElement { .. })));
    }

    #[test]
    fn unbound_queries_fail() {
        let s = Substance::from_elements([(Element::O, 2.0)]).unwrap();
        assert!(matches!(
            s.specific_heat_cp(),
            Err(FluidError::UnboundSubstance { what: "cp" })
        ));
        assert!(matches!(
            s.volume(300.0, 1e5),
            Err(FluidError::UnboundSubstance { .. })
        ));
        assert!(s.formation_enthalpy().is_err());
        assert!(s.density().is_err());
    }

    #[test]
    fn unbound_density_override_is_served() {
        let s = Substance::from_elements([(Element::O, 2.0)]).unwrap();
        assert!(s.set_density(1.3).unwrap());
        assert_eq!(s.density().unwrap(), 1.3);
    }

    #[test]
    fn combination_is_unbound_linear_sum() {
        let reg = registry();
        let o2 = reg.substance(Species::O2).unwrap();
        let n2 = reg.substance(Species::N2).unwrap();
        let air = combine_linear(&[(1.0, &o2), (3.76, &n2)]);

        assert!(!air.is_bound());
        assert_eq!(air.formula().count(Element::O), 2.0);
        assert!(nearly_equal(
            air.formula().count(Element::N),
            7.52,
            Tolerances::default()
        ));

        let diff = combine_linear(&[(1.0, &o2), (-1.0, &n2)]);
        assert_eq!(diff.formula().count(Element::N), -2.0);
    }

    #[test]
    fn binding_keeps_non_empty_formula() {
        let reg = registry();
        let octane = reg.substance(Species::Octane).unwrap();
        let ethanol = reg.substance(Species::Ethanol).unwrap();
        let blend = combine_linear(&[(0.73, &octane), (0.27, &ethanol)])
            .bound_to("ig.C8H18", &reg)
            .unwrap();

        assert_eq!(blend.species(), Some(Species::Octane));
        let c = blend.formula().count(Element::C);
        assert!(nearly_equal(c, 0.73 * 8.0 + 0.27 * 2.0, Tolerances::default()));
        assert!(blend.formula().count(Element::O) > 0.0);
    }

    #[test]
    fn binding_back_fills_empty_formula() {
        let reg = registry();
        let mut s = Substance::from_elements([]).unwrap();
        s.bind_to_species("H2O", &reg).unwrap();
        assert_eq!(s.elemental_composition(), Species::H2O.formula());
    }

    #[test]
    fn unknown_species_binding_fails() {
        let reg = registry();
        let mut s = Substance::from_elements([(Element::C, 1.0)]).unwrap();
        let err = s.bind_to_species("Methane", &reg).unwrap_err();
        assert!(matches!(err, FluidError::UnknownSpecies { ref name } if name == "Methane"));
        assert!(!s.is_bound());
    }

    #[test]
    fn density_set_once_wins() {
        let reg = registry();
        let fuel = reg.substance(Species::Octane).unwrap();
        assert!(fuel.set_density(743.2).unwrap());
        assert!(!fuel.set_density(700.0).unwrap());
        assert_eq!(fuel.density().unwrap(), 743.2);

        let air = reg.substance(Species::Air).unwrap();
        let computed = air.density().unwrap();
        assert!(!air.set_density(1.2041).unwrap());
        assert_eq!(air.density().unwrap(), computed);
    }

    #[test]
    fn absolute_enthalpy_of_products_and_reactants() {
        let reg = registry();
        let co2 = reg.substance(Species::CO2).unwrap();

        let at_reference = co2.absolute_enthalpy(25.0, 298.15, true).unwrap();
        assert!(nearly_equal(at_reference, -393_520.0, Tolerances::default()));

        let hot = co2.absolute_enthalpy(25.0, 1000.0, true).unwrap();
        assert!(hot > at_reference);

        let reactant = co2.absolute_enthalpy(25.0, 1000.0, false).unwrap();
        assert_eq!(reactant, -393_520.0);
    }

    #[test]
    fn absolute_enthalpy_outside_table_fails() {
        let reg = registry();
        let water = reg.substance(Species::H2O).unwrap();
        assert!(matches!(
            water.absolute_enthalpy(25.0, 5000.0, true),
            Err(FluidError::PropertyLookup { .. })
        ));
    }
}
