//! Engine model: fuel and air, combustion balance, ideal cycle and the
//! performance quantities derived from them.

use crate::error::{EngineError, EngineResult};
use crate::report::{CombustionReport, EngineMetrics, EngineReport};
use oc_core::numeric::{ensure_finite, rpm_to_rps};
use oc_core::units::{k, pa};
use oc_core::Memo;
use oc_cycle::IdealCycle;
use oc_fluids::{Species, SpeciesRegistry, Substance, combine_linear};
use oc_project::{EngineParameters, RawParameters, validate_parameters};
use oc_solver::{CombustionBalance, CombustionCoefficients};
use std::fmt;

/// Intake air density override [kg/m³] (dry air, 20 °C, 1 atm).
pub const AIR_DENSITY: f64 = 1.2041;

/// Reference temperature of the enthalpy of reaction [°C].
const REFERENCE_C: f64 = 25.0;

/// kJ → J
const KILO: f64 = 1.0e3;

/// Species the fuel blend is bound to for property lookups.
const FUEL_SURROGATE: &str = "ig.C8H18";
const AIR_SPECIES: &str = "ig.air";

pub struct EngineModel {
    params: EngineParameters,
    registry: SpeciesRegistry,

    fuel: Memo<Substance>,
    air: Memo<Substance>,
    combustion: Memo<CombustionBalance>,
    cycle: Memo<IdealCycle>,

    engine_speed_rps: Memo<f64>,
    air_fuel_molar_ratio: Memo<f64>,
    air_fuel_mass_ratio: Memo<f64>,
    fuel_blend_molar_mass: Memo<f64>,
    fuel_density: Memo<f64>,
    air_density: Memo<f64>,
    fuel_specific_volume: Memo<f64>,
    air_specific_volume: Memo<f64>,
    fuel_volume_fraction: Memo<f64>,
    fuel_volume_per_cylinder: Memo<f64>,
    air_volume_per_cylinder: Memo<f64>,
    fuel_mass_per_cycle: Memo<f64>,
    mass_admission_rate: Memo<f64>,
    fuel_heat_rate: Memo<f64>,
    combustion_molar_rate: Memo<f64>,
    reaction_enthalpy: Memo<f64>,
    heat_release_rate: Memo<f64>,
    net_indicated_work: Memo<f64>,
    indicated_power: Memo<f64>,
    thermal_efficiency: Memo<f64>,
    indicated_thermal_efficiency: Memo<f64>,
    mechanical_efficiency: Memo<f64>,
    global_efficiency: Memo<f64>,
}

impl EngineModel {
    /// Nothing is computed until a quantity is requested.
    pub fn new(params: EngineParameters, registry: SpeciesRegistry) -> Self {
        tracing::info!(
            speed_rpm = params.engine_speed_rpm,
            compression_ratio = params.compression_ratio,
            "engine model created"
        );
        Self {
            params,
            registry,
            fuel: Memo::new("fuel"),
            air: Memo::new("air"),
            combustion: Memo::new("combustion"),
            cycle: Memo::new("cycle"),
            engine_speed_rps: Memo::new("engine_speed_rps"),
            air_fuel_molar_ratio: Memo::new("air_fuel_molar_ratio"),
            air_fuel_mass_ratio: Memo::new("air_fuel_mass_ratio"),
            fuel_blend_molar_mass: Memo::new("fuel_blend_molar_mass"),
            fuel_density: Memo::new("fuel_density"),
            air_density: Memo::new("air_density"),
            fuel_specific_volume: Memo::new("fuel_specific_volume"),
            air_specific_volume: Memo::new("air_specific_volume"),
            fuel_volume_fraction: Memo::new("fuel_volume_fraction"),
            fuel_volume_per_cylinder: Memo::new("fuel_volume_per_cylinder"),
            air_volume_per_cylinder: Memo::new("air_volume_per_cylinder"),
            fuel_mass_per_cycle: Memo::new("fuel_mass_per_cycle"),
            mass_admission_rate: Memo::new("mass_admission_rate"),
            fuel_heat_rate: Memo::new("fuel_heat_rate"),
            combustion_molar_rate: Memo::new("combustion_molar_rate"),
            reaction_enthalpy: Memo::new("reaction_enthalpy"),
            heat_release_rate: Memo::new("heat_release_rate"),
            net_indicated_work: Memo::new("net_indicated_work"),
            indicated_power: Memo::new("indicated_power"),
            thermal_efficiency: Memo::new("thermal_efficiency"),
            indicated_thermal_efficiency: Memo::new("indicated_thermal_efficiency"),
            mechanical_efficiency: Memo::new("mechanical_efficiency"),
            global_efficiency: Memo::new("global_efficiency"),
        }
    }

    /// Validate `raw` first; a missing or invalid parameter is reported
    /// before anything is computed.
    pub fn from_raw(raw: &RawParameters, registry: SpeciesRegistry) -> EngineResult<Self> {
        Ok(Self::new(validate_parameters(raw)?, registry))
    }

    pub fn parameters(&self) -> &EngineParameters {
        &self.params
    }

    pub fn registry(&self) -> &SpeciesRegistry {
        &self.registry
    }

    // --- substances -------------------------------------------------------

    /// `octane_ratio·C8H18 + anhydrous_ratio·C2H6O`, bound to the octane
    /// surrogate, with the configured density.
    pub fn fuel(&self) -> EngineResult<&Substance> {
        object(&self.fuel, || {
            let octane = self.registry.substance(Species::Octane)?;
            let ethanol = self.registry.substance(Species::Ethanol)?;
            let fuel = combine_linear(&[
                (self.params.octane_ratio, &octane),
                (self.params.anhydrous_ratio, &ethanol),
            ])
            .bound_to(FUEL_SURROGATE, &self.registry)?;
            fuel.set_density(self.params.fuel_density_kg_per_m3)?;
            Ok(fuel)
        })
    }

    /// `O2 + nitrogen_oxygen_ratio·N2`, bound to air.
    pub fn air(&self) -> EngineResult<&Substance> {
        object(&self.air, || {
            let o2 = self.registry.substance(Species::O2)?;
            let n2 = self.registry.substance(Species::N2)?;
            let air = combine_linear(&[(1.0, &o2), (self.params.nitrogen_oxygen_ratio, &n2)])
                .bound_to(AIR_SPECIES, &self.registry)?;
            air.set_density(AIR_DENSITY)?;
            Ok(air)
        })
    }

    /// `fuel + a·air = b·CO2 + c·H2O + d·N2`, solved once.
    pub fn combustion(&self) -> EngineResult<&CombustionBalance> {
        object(&self.combustion, || {
            Ok(CombustionBalance::solve(self.fuel()?, self.air()?, &self.registry)?)
        })
    }

    pub fn coefficients(&self) -> EngineResult<CombustionCoefficients> {
        Ok(self.combustion()?.coefficients())
    }

    /// Air-standard cycle on the intake air with `q23` = fuel heat rate.
    pub fn cycle(&self) -> EngineResult<&IdealCycle> {
        object(&self.cycle, || {
            Ok(IdealCycle::new(
                self.air()?.clone(),
                k(self.params.intake_temperature_k),
                pa(self.params.intake_pressure_pa),
                self.fuel_heat_rate()?,
                self.params.compression_ratio,
            )?)
        })
    }

    // --- mixture ----------------------------------------------------------

    /// [rev/s]
    pub fn engine_speed_rps(&self) -> EngineResult<f64> {
        scalar(&self.engine_speed_rps, || {
            Ok(rpm_to_rps(self.params.engine_speed_rpm))
        })
    }

    /// Moles of air (O2 + N2) per mole of fuel.
    pub fn air_fuel_molar_ratio(&self) -> EngineResult<f64> {
        scalar(&self.air_fuel_molar_ratio, || {
            Ok(self.coefficients()?.air * (1.0 + self.params.nitrogen_oxygen_ratio))
        })
    }

    /// Mass of air per mass of fuel.
    pub fn air_fuel_mass_ratio(&self) -> EngineResult<f64> {
        scalar(&self.air_fuel_mass_ratio, || {
            let c = self.coefficients()?;
            let air_mass =
                c.air * Species::O2.molar_mass() + c.nitrogen * Species::N2.molar_mass();
            Ok(air_mass / self.fuel_blend_mass())
        })
    }

    /// Mass of one mole of blend as written, `Σ ratio·M` [kg/kmol].
    fn fuel_blend_mass(&self) -> f64 {
        self.params.octane_ratio * Species::Octane.molar_mass()
            + self.params.anhydrous_ratio * Species::Ethanol.molar_mass()
    }

    /// Mole-weighted molar mass of the blend [kg/kmol].
    pub fn fuel_blend_molar_mass(&self) -> EngineResult<f64> {
        scalar(&self.fuel_blend_molar_mass, || {
            Ok(self.fuel_blend_mass() / (self.params.octane_ratio + self.params.anhydrous_ratio))
        })
    }

    /// [kg/m³]
    pub fn fuel_density(&self) -> EngineResult<f64> {
        scalar(&self.fuel_density, || Ok(self.fuel()?.density()?))
    }

    /// [kg/m³]
    pub fn air_density(&self) -> EngineResult<f64> {
        scalar(&self.air_density, || Ok(self.air()?.density()?))
    }

    /// Volume of one kilogram of fuel [m³/kg].
    pub fn fuel_specific_volume(&self) -> EngineResult<f64> {
        scalar(&self.fuel_specific_volume, || Ok(1.0 / self.fuel_density()?))
    }

    /// Volume of the air that goes with one kilogram of fuel [m³/kg].
    pub fn air_specific_volume(&self) -> EngineResult<f64> {
        scalar(&self.air_specific_volume, || {
            Ok(self.air_fuel_mass_ratio()? / self.air_density()?)
        })
    }

    /// Share of the charge volume taken by fuel.
    pub fn fuel_volume_fraction(&self) -> EngineResult<f64> {
        scalar(&self.fuel_volume_fraction, || {
            let v_fuel = self.fuel_specific_volume()?;
            Ok(v_fuel / (v_fuel + self.air_specific_volume()?))
        })
    }

    pub fn air_volume_fraction(&self) -> EngineResult<f64> {
        Ok(1.0 - self.fuel_volume_fraction()?)
    }

    /// [m³]
    pub fn fuel_volume_per_cylinder(&self) -> EngineResult<f64> {
        scalar(&self.fuel_volume_per_cylinder, || {
            Ok(self.params.displacement_m3 * self.fuel_volume_fraction()?)
        })
    }

    /// [m³]
    pub fn air_volume_per_cylinder(&self) -> EngineResult<f64> {
        scalar(&self.air_volume_per_cylinder, || {
            Ok(self.params.displacement_m3 * self.air_volume_fraction()?)
        })
    }

    // --- rates --------------------------------------------------------------

    /// Fuel admitted per cylinder and cycle [kg].
    pub fn fuel_mass_per_cycle(&self) -> EngineResult<f64> {
        scalar(&self.fuel_mass_per_cycle, || {
            Ok(self.fuel_density()? * self.fuel_volume_per_cylinder()?)
        })
    }

    /// [kg/s]
    pub fn mass_admission_rate(&self) -> EngineResult<f64> {
        scalar(&self.mass_admission_rate, || {
            Ok(self.engine_speed_rps()? * self.fuel_mass_per_cycle()?)
        })
    }

    /// Chemical energy supplied [W]; also the cycle heat input.
    pub fn fuel_heat_rate(&self) -> EngineResult<f64> {
        scalar(&self.fuel_heat_rate, || {
            Ok(self.mass_admission_rate()? * self.params.fuel_heating_value_j_per_kg)
        })
    }

    /// Blend burnt, in moles of the blend as written [kmol/s].
    ///
    /// Counted in the same unit as [`Self::reaction_enthalpy`], so the heat
    /// release does not change when both blend ratios are scaled together.
    pub fn combustion_molar_rate(&self) -> EngineResult<f64> {
        scalar(&self.combustion_molar_rate, || {
            Ok(self.mass_admission_rate()? * self.params.combustion_mass_fraction
                / self.fuel_blend_mass())
        })
    }

    /// Enthalpy of reaction per kmol of blend as written, products at T3
    /// [kJ/kmol].
    pub fn reaction_enthalpy(&self) -> EngineResult<f64> {
        scalar(&self.reaction_enthalpy, || {
            let c = self.coefficients()?;
            let t3 = self.cycle()?.temperature(3)?;

            let mut products = 0.0;
            for (nu, species) in [
                (c.carbon_dioxide, Species::CO2),
                (c.water, Species::H2O),
                (c.nitrogen, Species::N2),
            ] {
                let substance = self.registry.substance(species)?;
                products += nu * substance.absolute_enthalpy(REFERENCE_C, t3, true)?;
            }

            let mut reactants = 0.0;
            for (ratio, species) in [
                (self.params.octane_ratio, Species::Octane),
                (self.params.anhydrous_ratio, Species::Ethanol),
            ] {
                reactants += ratio * self.registry.substance(species)?.formation_enthalpy()?;
            }
            for (nu, species) in [(c.air, Species::O2), (c.nitrogen, Species::N2)] {
                reactants += nu * self.registry.substance(species)?.formation_enthalpy()?;
            }
            Ok(products - reactants)
        })
    }

    /// [W]
    pub fn heat_release_rate(&self) -> EngineResult<f64> {
        scalar(&self.heat_release_rate, || {
            Ok(self.params.external_work_rate_w
                + self.combustion_molar_rate()? * self.reaction_enthalpy()? * KILO)
        })
    }

    // --- work and efficiencies --------------------------------------------

    /// Cycle work times fuel mass per cycle [J].
    pub fn net_indicated_work(&self) -> EngineResult<f64> {
        scalar(&self.net_indicated_work, || {
            Ok(self.cycle()?.net_work()? * self.fuel_mass_per_cycle()?)
        })
    }

    /// `w·N·z/x` [W]
    pub fn indicated_power(&self) -> EngineResult<f64> {
        scalar(&self.indicated_power, || {
            Ok(self.cycle()?.net_work()? * self.engine_speed_rps()? * self.params.cylinders
                / self.params.revolutions_per_cycle)
        })
    }

    /// `w / q23`; equals the Otto efficiency `1 − rv^(1−k)`.
    pub fn thermal_efficiency(&self) -> EngineResult<f64> {
        scalar(&self.thermal_efficiency, || {
            Ok(self.cycle()?.net_work()? / self.fuel_heat_rate()?)
        })
    }

    pub fn indicated_thermal_efficiency(&self) -> EngineResult<f64> {
        scalar(&self.indicated_thermal_efficiency, || {
            Ok(self.indicated_power()? / self.fuel_heat_rate()?)
        })
    }

    pub fn mechanical_efficiency(&self) -> EngineResult<f64> {
        scalar(&self.mechanical_efficiency, || {
            Ok(self.params.external_work_rate_w / self.indicated_power()?)
        })
    }

    pub fn global_efficiency(&self) -> EngineResult<f64> {
        scalar(&self.global_efficiency, || {
            Ok(self.params.external_work_rate_w / self.fuel_heat_rate()?)
        })
    }

    /// Compute everything and snapshot it.
    pub fn report(&self) -> EngineResult<EngineReport> {
        let c = self.coefficients()?;
        let combustion = CombustionReport {
            air: c.air,
            carbon_dioxide: c.carbon_dioxide,
            water: c.water,
            nitrogen: c.nitrogen,
            air_fuel_molar_ratio: self.air_fuel_molar_ratio()?,
            air_fuel_mass_ratio: self.air_fuel_mass_ratio()?,
            fuel_blend_molar_mass: self.fuel_blend_molar_mass()?,
        };
        let metrics = EngineMetrics {
            engine_speed_rps: self.engine_speed_rps()?,
            fuel_density: self.fuel_density()?,
            air_density: self.air_density()?,
            fuel_specific_volume: self.fuel_specific_volume()?,
            air_specific_volume: self.air_specific_volume()?,
            fuel_volume_fraction: self.fuel_volume_fraction()?,
            air_volume_fraction: self.air_volume_fraction()?,
            fuel_volume_per_cylinder: self.fuel_volume_per_cylinder()?,
            air_volume_per_cylinder: self.air_volume_per_cylinder()?,
            fuel_mass_per_cycle: self.fuel_mass_per_cycle()?,
            mass_admission_rate: self.mass_admission_rate()?,
            fuel_heat_rate: self.fuel_heat_rate()?,
            combustion_molar_rate: self.combustion_molar_rate()?,
            reaction_enthalpy: self.reaction_enthalpy()?,
            heat_release_rate: self.heat_release_rate()?,
            net_indicated_work: self.net_indicated_work()?,
            indicated_power: self.indicated_power()?,
            thermal_efficiency: self.thermal_efficiency()?,
            indicated_thermal_efficiency: self.indicated_thermal_efficiency()?,
            mechanical_efficiency: self.mechanical_efficiency()?,
            global_efficiency: self.global_efficiency()?,
        };
        let cycle = self
            .cycle()?
            .summary()
            .map_err(|e| EngineError::from(e).attributed("cycle"))?;

        Ok(EngineReport {
            parameters: self.params,
            combustion,
            cycle,
            metrics,
        })
    }
}

impl fmt::Debug for EngineModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineModel")
            .field("params", &self.params)
            .field("combustion_solved", &self.combustion.is_computed())
            .field("cycle_built", &self.cycle.is_computed())
            .finish_non_exhaustive()
    }
}

/// Memoized scalar: attributed on failure, rejected when non-finite.
fn scalar(memo: &Memo<f64>, f: impl FnOnce() -> EngineResult<f64>) -> EngineResult<f64> {
    let quantity = memo.name();
    memo.value(|| {
        let value = f().map_err(|e| e.attributed(quantity))?;
        ensure_finite(value, quantity).map_err(|e| EngineError::from(e).attributed(quantity))
    })
}

fn object<'a, T: fmt::Debug>(
    memo: &'a Memo<T>,
    f: impl FnOnce() -> EngineResult<T>,
) -> EngineResult<&'a T> {
    let quantity = memo.name();
    memo.get_or_try_init(|| f().map_err(|e| e.attributed(quantity)))
}
