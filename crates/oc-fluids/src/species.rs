//! Chemical species definitions.

use crate::element::{Element, Formula};

/// Chemical species taking part in the engine's fuel/air combustion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Species {
    /// n-Octane (C₈H₁₈), the gasoline surrogate
    Octane,
    /// Anhydrous ethanol (C₂H₆O)
    Ethanol,
    /// Oxygen (O₂)
    O2,
    /// Nitrogen (N₂)
    N2,
    /// Carbon dioxide (CO₂)
    CO2,
    /// Water vapour (H₂O)
    H2O,
    /// Air (pseudo-pure ideal gas)
    Air,
}

impl Species {
    pub const ALL: [Species; 7] = [
        Species::Octane,
        Species::Ethanol,
        Species::O2,
        Species::N2,
        Species::CO2,
        Species::H2O,
        Species::Air,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Species::Octane => "C8H18",
            Species::Ethanol => "C2H6O",
            Species::O2 => "O2",
            Species::N2 => "N2",
            Species::CO2 => "CO2",
            Species::H2O => "H2O",
            Species::Air => "Air",
        }
    }

    /// Get molar mass [kg/kmol] for this species.
    pub fn molar_mass(&self) -> f64 {
        match self {
            Species::Octane => 114.229,
            Species::Ethanol => 46.068,
            Species::O2 => 31.999,
            Species::N2 => 28.014,
            Species::CO2 => 44.010,
            Species::H2O => 18.015,
            Species::Air => 28.965,
        }
    }

    /// Atoms per molecule. Air uses the per-kmol average of its N₂/O₂ content.
    pub fn formula(&self) -> Formula {
        use Element::*;
        match self {
            Species::Octane => Formula::from_counts([(C, 8.0), (H, 18.0)]),
            Species::Ethanol => Formula::from_counts([(C, 2.0), (H, 6.0), (O, 1.0)]),
            Species::O2 => Formula::from_counts([(O, 2.0)]),
            Species::N2 => Formula::from_counts([(N, 2.0)]),
            Species::CO2 => Formula::from_counts([(C, 1.0), (O, 2.0)]),
            Species::H2O => Formula::from_counts([(H, 2.0), (O, 1.0)]),
            Species::Air => Formula::from_counts([(N, 1.562), (O, 0.420)]),
        }
    }

    /// Enthalpy of formation at 298.15 K [kJ/kmol].
    ///
    /// Returns `None` for air, which is a mixture rather than a compound.
    pub fn formation_enthalpy(&self) -> Option<f64> {
        match self {
            Species::Octane => Some(-249_920.0),
            Species::Ethanol => Some(-277_800.0),
            Species::O2 => Some(0.0),
            Species::N2 => Some(0.0),
            Species::CO2 => Some(-393_520.0),
            Species::H2O => Some(-241_820.0),
            Species::Air => None,
        }
    }
}

impl std::str::FromStr for Species {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let name = trimmed
            .strip_prefix("ig.")
            .or_else(|| trimmed.strip_prefix("IG."))
            .unwrap_or(trimmed);
        match name.to_uppercase().as_str() {
            "C8H18" | "OCTANE" | "N-OCTANE" => Ok(Species::Octane),
            "C2H6O" | "C2H5OH" | "ETHANOL" | "ANHYDROUS" | "ANHYDROUS ETHANOL" => {
                Ok(Species::Ethanol)
            }
            "O2" | "OXYGEN" => Ok(Species::O2),
            "N2" | "NITROGEN" => Ok(Species::N2),
            "CO2" | "CARBONDIOXIDE" | "CARBON DIOXIDE" => Ok(Species::CO2),
            "H2O" | "WATER" => Ok(Species::H2O),
            "AIR" => Ok(Species::Air),
            _ => Err("unknown species"),
        }
    }
}

impl std::fmt::Display for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_aliases() {
        assert_eq!("ig.C8H18".parse::<Species>().unwrap(), Species::Octane);
        assert_eq!("ethanol".parse::<Species>().unwrap(), Species::Ethanol);
        assert_eq!("ig.air".parse::<Species>().unwrap(), Species::Air);
        assert_eq!(
            "Carbon Dioxide".parse::<Species>().unwrap(),
            Species::CO2
        );
        assert!("Methane".parse::<Species>().is_err());
    }

    #[test]
    fn canonical_key_roundtrip() {
        for species in Species::ALL {
            let parsed = species
                .key()
                .parse::<Species>()
                .expect("canonical key should parse");
            assert_eq!(parsed, species);
        }
    }

    #[test]
    fn formula_molar_mass_is_consistent() {
        // Atomic masses [kg/kmol]
        let atomic = |e: Element| match e {
            Element::C => 12.011,
            Element::H => 1.008,
            Element::O => 15.999,
            Element::N => 14.007,
        };
        for species in [Species::Octane, Species::Ethanol, Species::CO2, Species::H2O] {
            let from_formula: f64 = species.formula().iter().map(|(e, n)| atomic(e) * n).sum();
            assert!(
                (from_formula - species.molar_mass()).abs() < 0.05,
                "{species}: {from_formula} vs {}",
                species.molar_mass()
            );
        }
    }

    #[test]
    fn air_has_no_formation_enthalpy() {
        assert_eq!(Species::Air.formation_enthalpy(), None);
        assert_eq!(Species::O2.formation_enthalpy(), Some(0.0));
    }
}
