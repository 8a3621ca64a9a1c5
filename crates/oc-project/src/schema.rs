//! Parameter schema definitions.

use crate::validate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

/// Every configurable engine parameter, in validation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parameter {
    EngineSpeed,
    Cylinders,
    RevolutionsPerCycle,
    CompressionRatio,
    IntakeTemperature,
    IntakePressure,
    Displacement,
    FuelHeatingValue,
    FuelDensity,
    ExternalWorkRate,
    CombustionMassFraction,
    OctaneRatio,
    AnhydrousRatio,
    NitrogenOxygenRatio,
}

impl Parameter {
    pub const ALL: [Parameter; 14] = [
        Parameter::EngineSpeed,
        Parameter::Cylinders,
        Parameter::RevolutionsPerCycle,
        Parameter::CompressionRatio,
        Parameter::IntakeTemperature,
        Parameter::IntakePressure,
        Parameter::Displacement,
        Parameter::FuelHeatingValue,
        Parameter::FuelDensity,
        Parameter::ExternalWorkRate,
        Parameter::CombustionMassFraction,
        Parameter::OctaneRatio,
        Parameter::AnhydrousRatio,
        Parameter::NitrogenOxygenRatio,
    ];

    /// Canonical (file) name.
    pub fn name(&self) -> &'static str {
        match self {
            Parameter::EngineSpeed => "engine_speed_rpm",
            Parameter::Cylinders => "cylinders",
            Parameter::RevolutionsPerCycle => "revolutions_per_cycle",
            Parameter::CompressionRatio => "compression_ratio",
            Parameter::IntakeTemperature => "intake_temperature_k",
            Parameter::IntakePressure => "intake_pressure_pa",
            Parameter::Displacement => "displacement_m3",
            Parameter::FuelHeatingValue => "fuel_heating_value_j_per_kg",
            Parameter::FuelDensity => "fuel_density_kg_per_m3",
            Parameter::ExternalWorkRate => "external_work_rate_w",
            Parameter::CombustionMassFraction => "combustion_mass_fraction",
            Parameter::OctaneRatio => "octane_ratio",
            Parameter::AnhydrousRatio => "anhydrous_ratio",
            Parameter::NitrogenOxygenRatio => "nitrogen_oxygen_ratio",
        }
    }

    /// Short name, accepted in files and used for environment variables.
    pub fn short_name(&self) -> &'static str {
        match self {
            Parameter::EngineSpeed => "n",
            Parameter::Cylinders => "z",
            Parameter::RevolutionsPerCycle => "x",
            Parameter::CompressionRatio => "rv",
            Parameter::IntakeTemperature => "T1",
            Parameter::IntakePressure => "p1",
            Parameter::Displacement => "Vd",
            Parameter::FuelHeatingValue => "fuel_pci",
            Parameter::FuelDensity => "rho_fuel",
            Parameter::ExternalWorkRate => "W_rate",
            Parameter::CombustionMassFraction => "m_comb",
            Parameter::OctaneRatio => "octane_ratio",
            Parameter::AnhydrousRatio => "anhydrous_ratio",
            Parameter::NitrogenOxygenRatio => "nitrogen_oxygen_ratio",
        }
    }
}

/// Parameters as read from a file or the environment; anything may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawParameters {
    #[serde(default, alias = "n", skip_serializing_if = "Option::is_none")]
    pub engine_speed_rpm: Option<f64>,
    #[serde(default, alias = "z", skip_serializing_if = "Option::is_none")]
    pub cylinders: Option<f64>,
    #[serde(default, alias = "x", skip_serializing_if = "Option::is_none")]
    pub revolutions_per_cycle: Option<f64>,
    #[serde(default, alias = "rv", skip_serializing_if = "Option::is_none")]
    pub compression_ratio: Option<f64>,
    #[serde(default, alias = "T1", skip_serializing_if = "Option::is_none")]
    pub intake_temperature_k: Option<f64>,
    #[serde(default, alias = "p1", skip_serializing_if = "Option::is_none")]
    pub intake_pressure_pa: Option<f64>,
    #[serde(default, alias = "Vd", skip_serializing_if = "Option::is_none")]
    pub displacement_m3: Option<f64>,
    #[serde(default, alias = "fuel_pci", skip_serializing_if = "Option::is_none")]
    pub fuel_heating_value_j_per_kg: Option<f64>,
    #[serde(default, alias = "rho_fuel", skip_serializing_if = "Option::is_none")]
    pub fuel_density_kg_per_m3: Option<f64>,
    #[serde(default, alias = "W_rate", skip_serializing_if = "Option::is_none")]
    pub external_work_rate_w: Option<f64>,
    #[serde(default, alias = "m_comb", skip_serializing_if = "Option::is_none")]
    pub combustion_mass_fraction: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub octane_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anhydrous_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nitrogen_oxygen_ratio: Option<f64>,
}

impl RawParameters {
    pub fn get(&self, parameter: Parameter) -> Option<f64> {
        *self.slot(parameter)
    }

    pub fn set(&mut self, parameter: Parameter, value: Option<f64>) {
        *self.slot_mut(parameter) = value;
    }

    /// Builder form of [`RawParameters::set`].
    pub fn with(mut self, parameter: Parameter, value: f64) -> Self {
        self.set(parameter, Some(value));
        self
    }

    /// Fill parameters from a string source keyed by short name, such as
    /// the process environment. Unparseable values are rejected.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let mut raw = Self::default();
        for parameter in Parameter::ALL {
            let Some(text) = lookup(parameter.short_name()) else {
                continue;
            };
            let value = text.trim().parse::<f64>().map_err(|_| ConfigError::Invalid {
                name: parameter.name(),
                value: text.clone(),
                reason: "not a number",
            })?;
            raw.set(parameter, Some(value));
        }
        Ok(raw)
    }

    fn slot(&self, parameter: Parameter) -> &Option<f64> {
        match parameter {
            Parameter::EngineSpeed => &self.engine_speed_rpm,
            Parameter::Cylinders => &self.cylinders,
            Parameter::RevolutionsPerCycle => &self.revolutions_per_cycle,
            Parameter::CompressionRatio => &self.compression_ratio,
            Parameter::IntakeTemperature => &self.intake_temperature_k,
            Parameter::IntakePressure => &self.intake_pressure_pa,
            Parameter::Displacement => &self.displacement_m3,
            Parameter::FuelHeatingValue => &self.fuel_heating_value_j_per_kg,
            Parameter::FuelDensity => &self.fuel_density_kg_per_m3,
            Parameter::ExternalWorkRate => &self.external_work_rate_w,
            Parameter::CombustionMassFraction => &self.combustion_mass_fraction,
            Parameter::OctaneRatio => &self.octane_ratio,
            Parameter::AnhydrousRatio => &self.anhydrous_ratio,
            Parameter::NitrogenOxygenRatio => &self.nitrogen_oxygen_ratio,
        }
    }

    fn slot_mut(&mut self, parameter: Parameter) -> &mut Option<f64> {
        match parameter {
            Parameter::EngineSpeed => &mut self.engine_speed_rpm,
            Parameter::Cylinders => &mut self.cylinders,
            Parameter::RevolutionsPerCycle => &mut self.revolutions_per_cycle,
            Parameter::CompressionRatio => &mut self.compression_ratio,
            Parameter::IntakeTemperature => &mut self.intake_temperature_k,
            Parameter::IntakePressure => &mut self.intake_pressure_pa,
            Parameter::Displacement => &mut self.displacement_m3,
            Parameter::FuelHeatingValue => &mut self.fuel_heating_value_j_per_kg,
            Parameter::FuelDensity => &mut self.fuel_density_kg_per_m3,
            Parameter::ExternalWorkRate => &mut self.external_work_rate_w,
            Parameter::CombustionMassFraction => &mut self.combustion_mass_fraction,
            Parameter::OctaneRatio => &mut self.octane_ratio,
            Parameter::AnhydrousRatio => &mut self.anhydrous_ratio,
            Parameter::NitrogenOxygenRatio => &mut self.nitrogen_oxygen_ratio,
        }
    }
}

/// Validated engine parameters (SI units).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineParameters {
    /// [rpm]
    pub engine_speed_rpm: f64,
    pub cylinders: f64,
    /// Crank revolutions per working cycle (2 for four-stroke).
    pub revolutions_per_cycle: f64,
    pub compression_ratio: f64,
    /// [K]
    pub intake_temperature_k: f64,
    /// [Pa]
    pub intake_pressure_pa: f64,
    /// Swept volume per cylinder [m³]
    pub displacement_m3: f64,
    /// Lower heating value [J/kg]
    pub fuel_heating_value_j_per_kg: f64,
    /// [kg/m³]
    pub fuel_density_kg_per_m3: f64,
    /// Effective (brake) power delivered [W]
    pub external_work_rate_w: f64,
    /// Fraction of admitted fuel mass that burns, in (0, 1].
    pub combustion_mass_fraction: f64,
    /// Moles of octane per mole of fuel blend.
    pub octane_ratio: f64,
    /// Moles of anhydrous ethanol per mole of fuel blend.
    pub anhydrous_ratio: f64,
    /// Moles of N₂ per mole of O₂ in the intake air.
    pub nitrogen_oxygen_ratio: f64,
}

impl EngineParameters {
    pub fn get(&self, parameter: Parameter) -> f64 {
        match parameter {
            Parameter::EngineSpeed => self.engine_speed_rpm,
            Parameter::Cylinders => self.cylinders,
            Parameter::RevolutionsPerCycle => self.revolutions_per_cycle,
            Parameter::CompressionRatio => self.compression_ratio,
            Parameter::IntakeTemperature => self.intake_temperature_k,
            Parameter::IntakePressure => self.intake_pressure_pa,
            Parameter::Displacement => self.displacement_m3,
            Parameter::FuelHeatingValue => self.fuel_heating_value_j_per_kg,
            Parameter::FuelDensity => self.fuel_density_kg_per_m3,
            Parameter::ExternalWorkRate => self.external_work_rate_w,
            Parameter::CombustionMassFraction => self.combustion_mass_fraction,
            Parameter::OctaneRatio => self.octane_ratio,
            Parameter::AnhydrousRatio => self.anhydrous_ratio,
            Parameter::NitrogenOxygenRatio => self.nitrogen_oxygen_ratio,
        }
    }

    pub fn to_raw(&self) -> RawParameters {
        Parameter::ALL
            .into_iter()
            .fold(RawParameters::default(), |raw, p| raw.with(p, self.get(p)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_unique() {
        let mut names: Vec<&str> = Parameter::ALL.iter().map(|p| p.name()).collect();
        let mut shorts: Vec<&str> = Parameter::ALL.iter().map(|p| p.short_name()).collect();
        names.sort_unstable();
        names.dedup();
        shorts.sort_unstable();
        shorts.dedup();
        assert_eq!(names.len(), Parameter::ALL.len());
        assert_eq!(shorts.len(), Parameter::ALL.len());
    }

    #[test]
    fn short_names_are_accepted_in_yaml() {
        let raw: RawParameters = serde_yaml::from_str("n: 3000\nT1: 300\nVd: 0.0005\n").unwrap();
        assert_eq!(raw.engine_speed_rpm, Some(3000.0));
        assert_eq!(raw.intake_temperature_k, Some(300.0));
        assert_eq!(raw.displacement_m3, Some(0.0005));
        assert_eq!(raw.compression_ratio, None);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(serde_yaml::from_str::<RawParameters>("rpm: 3000\n").is_err());
    }

    #[test]
    fn lookup_parses_short_names() {
        let raw = RawParameters::from_lookup(|name| match name {
            "rv" => Some(" 9.5 ".to_string()),
            "W_rate" => Some("15000".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(raw.get(Parameter::CompressionRatio), Some(9.5));
        assert_eq!(raw.get(Parameter::ExternalWorkRate), Some(15_000.0));
        assert_eq!(raw.get(Parameter::EngineSpeed), None);
    }

    #[test]
    fn lookup_rejects_garbage() {
        let err = RawParameters::from_lookup(|name| (name == "z").then(|| "four".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "cylinders", .. }));
    }

    #[test]
    fn serialization_uses_canonical_names() {
        let raw = RawParameters::default().with(Parameter::IntakePressure, 101_325.0);
        let yaml = serde_yaml::to_string(&raw).unwrap();
        assert_eq!(yaml.trim(), "intake_pressure_pa: 101325.0");
    }
}
