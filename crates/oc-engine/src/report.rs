//! Serializable snapshot of a fully evaluated engine model.

use oc_cycle::CycleSummary;
use oc_project::EngineParameters;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Balanced combustion, per mole of fuel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombustionReport {
    pub air: f64,
    pub carbon_dioxide: f64,
    pub water: f64,
    pub nitrogen: f64,
    pub air_fuel_molar_ratio: f64,
    pub air_fuel_mass_ratio: f64,
    /// [kg/kmol]
    pub fuel_blend_molar_mass: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineMetrics {
    pub engine_speed_rps: f64,
    pub fuel_density: f64,
    pub air_density: f64,
    pub fuel_specific_volume: f64,
    pub air_specific_volume: f64,
    pub fuel_volume_fraction: f64,
    pub air_volume_fraction: f64,
    pub fuel_volume_per_cylinder: f64,
    pub air_volume_per_cylinder: f64,
    pub fuel_mass_per_cycle: f64,
    pub mass_admission_rate: f64,
    pub fuel_heat_rate: f64,
    pub combustion_molar_rate: f64,
    pub reaction_enthalpy: f64,
    pub heat_release_rate: f64,
    pub net_indicated_work: f64,
    pub indicated_power: f64,
    pub thermal_efficiency: f64,
    pub indicated_thermal_efficiency: f64,
    pub mechanical_efficiency: f64,
    pub global_efficiency: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineReport {
    pub parameters: EngineParameters,
    pub combustion: CombustionReport,
    pub cycle: CycleSummary,
    pub metrics: EngineMetrics,
}

impl fmt::Display for EngineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.combustion;
        writeln!(f, "Combustion (per mole of fuel)")?;
        writeln!(
            f,
            "  fuel + {:.4} air = {:.4} CO2 + {:.4} H2O + {:.4} N2",
            c.air, c.carbon_dioxide, c.water, c.nitrogen
        )?;
        writeln!(f, "  air/fuel molar ratio   {:>14.4}", c.air_fuel_molar_ratio)?;
        writeln!(f, "  air/fuel mass ratio    {:>14.4}", c.air_fuel_mass_ratio)?;
        writeln!(f)?;

        writeln!(f, "Cycle")?;
        writeln!(
            f,
            "  {:>5} {:>14} {:>14} {:>10}",
            "stage", "p [Pa]", "v [m3/kg]", "T [K]"
        )?;
        for s in &self.cycle.stages {
            writeln!(
                f,
                "  {:>5} {:>14.1} {:>14.6} {:>10.2}",
                s.ordinal, s.pressure_pa, s.volume_m3_per_kg, s.temperature_k
            )?;
        }
        writeln!(f, "  k                      {:>14.4}", self.cycle.k)?;
        writeln!(f, "  w12 [J/kg]             {:>14.2}", self.cycle.w12_j_per_kg)?;
        writeln!(f, "  w34 [J/kg]             {:>14.2}", self.cycle.w34_j_per_kg)?;
        writeln!(f, "  w [J/kg]               {:>14.2}", self.cycle.net_work_j_per_kg)?;
        writeln!(f, "  q41 [J/kg]             {:>14.2}", self.cycle.q41_j_per_kg)?;
        writeln!(f)?;

        let m = &self.metrics;
        writeln!(f, "Engine")?;
        let rows = [
            ("fuel volume fraction", m.fuel_volume_fraction),
            ("fuel volume/cyl [m3]", m.fuel_volume_per_cylinder),
            ("fuel mass/cycle [kg]", m.fuel_mass_per_cycle),
            ("mass admission [kg/s]", m.mass_admission_rate),
            ("fuel heat rate [W]", m.fuel_heat_rate),
            ("combustion [kmol/s]", m.combustion_molar_rate),
            ("reaction dh [kJ/kmol]", m.reaction_enthalpy),
            ("heat release [W]", m.heat_release_rate),
            ("indicated work [J]", m.net_indicated_work),
            ("indicated power [W]", m.indicated_power),
            ("thermal efficiency", m.thermal_efficiency),
            ("indicated thermal eff.", m.indicated_thermal_efficiency),
            ("mechanical efficiency", m.mechanical_efficiency),
            ("global efficiency", m.global_efficiency),
        ];
        for (label, value) in rows {
            writeln!(f, "  {label:<22} {value:>14.6e}")?;
        }
        Ok(())
    }
}
