//! Air-standard Otto cycle.
//!
//! Stage 1 (intake) is fixed by the caller; the other three stages are wired
//! so that each variable pulls what it needs on first read:
//!
//! - 1→2 isentropic compression by the compression ratio,
//! - 2→3 constant-volume heat addition of `q23`,
//! - 3→4 isentropic expansion back to the intake volume,
//! - 4→1 constant-volume heat rejection.

use crate::error::{CycleError, CycleResult};
use crate::stage::{CycleStage, StageVariable};
use oc_core::Memo;
use oc_core::units::{Pressure, Temperature};
use oc_fluids::{FluidError, Substance};
use serde::{Deserialize, Serialize};
use uom::si::pressure::pascal;
use uom::si::thermodynamic_temperature::kelvin;

pub struct IdealCycle {
    fluid: Substance,
    heat_input: f64,
    compression_ratio: f64,
    stages: [CycleStage<IdealCycle>; 4],
    k: Memo<f64>,
    cp: Memo<f64>,
    cv: Memo<f64>,
    w12: Memo<f64>,
    w34: Memo<f64>,
    net_work: Memo<f64>,
    q41: Memo<f64>,
    efficiency: Memo<f64>,
}

impl IdealCycle {
    /// Build a cycle for `fluid` (which must be bound to a species) starting
    /// at `t1`, `p1`, with `heat_input` [J/kg] added at constant volume.
    pub fn new(
        fluid: Substance,
        t1: Temperature,
        p1: Pressure,
        heat_input: f64,
        compression_ratio: f64,
    ) -> CycleResult<Self> {
        if !fluid.is_bound() {
            return Err(FluidError::UnboundSubstance {
                what: "working fluid",
            }
            .into());
        }
        let t1 = t1.get::<kelvin>();
        let p1 = p1.get::<pascal>();
        if !(t1.is_finite() && t1 > 0.0) {
            return Err(CycleError::InvalidArg {
                what: "intake temperature must be positive",
            });
        }
        if !(p1.is_finite() && p1 > 0.0) {
            return Err(CycleError::InvalidArg {
                what: "intake pressure must be positive",
            });
        }
        if !(compression_ratio.is_finite() && compression_ratio > 1.0) {
            return Err(CycleError::InvalidArg {
                what: "compression ratio must exceed 1",
            });
        }
        if !(heat_input.is_finite() && heat_input >= 0.0) {
            return Err(CycleError::InvalidArg {
                what: "heat input must be non-negative",
            });
        }

        let stages = [
            intake_stage(t1, p1)?,
            compression_stage()?,
            combustion_stage()?,
            expansion_stage()?,
        ];
        tracing::debug!(t1, p1, heat_input, compression_ratio, fluid = %fluid, "ideal cycle built");

        Ok(Self {
            fluid,
            heat_input,
            compression_ratio,
            stages,
            k: Memo::new("k"),
            cp: Memo::new("cp"),
            cv: Memo::new("cv"),
            w12: Memo::new("w12"),
            w34: Memo::new("w34"),
            net_work: Memo::new("w"),
            q41: Memo::new("q41"),
            efficiency: Memo::new("ideal_efficiency"),
        })
    }

    pub fn fluid(&self) -> &Substance {
        &self.fluid
    }

    /// Heat added per unit mass between stages 2 and 3 [J/kg].
    pub fn heat_input(&self) -> f64 {
        self.heat_input
    }

    pub fn compression_ratio(&self) -> f64 {
        self.compression_ratio
    }

    /// Stage by ordinal, 1 through 4.
    pub fn stage(&self, ordinal: u8) -> CycleResult<&CycleStage<IdealCycle>> {
        ordinal
            .checked_sub(1)
            .and_then(|i| self.stages.get(usize::from(i)))
            .ok_or(CycleError::InvalidArg {
                what: "stage ordinal must be between 1 and 4",
            })
    }

    /// Read one variable of one stage, resolving it if needed.
    pub fn value(&self, ordinal: u8, variable: StageVariable) -> CycleResult<f64> {
        self.stage(ordinal)?.get(variable, self)
    }

    pub fn pressure(&self, ordinal: u8) -> CycleResult<f64> {
        self.value(ordinal, StageVariable::Pressure)
    }

    pub fn volume(&self, ordinal: u8) -> CycleResult<f64> {
        self.value(ordinal, StageVariable::Volume)
    }

    pub fn temperature(&self, ordinal: u8) -> CycleResult<f64> {
        self.value(ordinal, StageVariable::Temperature)
    }

    /// Heat capacity ratio `cp / cv`.
    pub fn k(&self) -> CycleResult<f64> {
        self.k.value(|| Ok(self.cp()? / self.cv()?))
    }

    /// [J/(kg·K)]
    pub fn cp(&self) -> CycleResult<f64> {
        self.cp.value(|| Ok(self.fluid.specific_heat_cp()?))
    }

    /// [J/(kg·K)]
    pub fn cv(&self) -> CycleResult<f64> {
        self.cv.value(|| Ok(self.fluid.specific_heat_cv()?))
    }

    /// Compression work `cv (T1 − T2)` [J/kg]; negative (done on the gas).
    pub fn w12(&self) -> CycleResult<f64> {
        self.w12
            .value(|| Ok(self.cv()? * (self.temperature(1)? - self.temperature(2)?)))
    }

    /// Expansion work `cv (T3 − T4)` [J/kg].
    pub fn w34(&self) -> CycleResult<f64> {
        self.w34
            .value(|| Ok(self.cv()? * (self.temperature(3)? - self.temperature(4)?)))
    }

    /// Net specific work `w12 + w34` [J/kg].
    pub fn net_work(&self) -> CycleResult<f64> {
        self.net_work.value(|| Ok(self.w12()? + self.w34()?))
    }

    /// Heat exchanged from 4 back to 1, `cv (T1 − T4)` [J/kg]; negative (rejected).
    pub fn q41(&self) -> CycleResult<f64> {
        self.q41
            .value(|| Ok(self.cv()? * (self.temperature(1)? - self.temperature(4)?)))
    }

    /// `w / q23`, equal to `1 − rv^(1−k)` for this cycle.
    pub fn efficiency(&self) -> CycleResult<f64> {
        self.efficiency.value(|| {
            if self.heat_input == 0.0 {
                return Err(CycleError::InvalidArg {
                    what: "efficiency undefined without heat input",
                });
            }
            Ok(self.net_work()? / self.heat_input)
        })
    }

    /// Resolve everything and snapshot it.
    pub fn summary(&self) -> CycleResult<CycleSummary> {
        let mut stages = [StageState::default(); 4];
        for (ordinal, state) in (1u8..).zip(stages.iter_mut()) {
            *state = StageState {
                ordinal,
                pressure_pa: self.pressure(ordinal)?,
                volume_m3_per_kg: self.volume(ordinal)?,
                temperature_k: self.temperature(ordinal)?,
            };
        }
        Ok(CycleSummary {
            stages,
            k: self.k()?,
            cv_j_per_kg_k: self.cv()?,
            heat_input_j_per_kg: self.heat_input,
            w12_j_per_kg: self.w12()?,
            w34_j_per_kg: self.w34()?,
            net_work_j_per_kg: self.net_work()?,
            q41_j_per_kg: self.q41()?,
            efficiency: self.efficiency()?,
        })
    }
}

impl std::fmt::Debug for IdealCycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdealCycle")
            .field("fluid", &self.fluid.species())
            .field("heat_input", &self.heat_input)
            .field("compression_ratio", &self.compression_ratio)
            .field("stages", &self.stages)
            .finish_non_exhaustive()
    }
}

fn intake_stage(t1: f64, p1: f64) -> CycleResult<CycleStage<IdealCycle>> {
    CycleStage::new(1)
        .with_fixed(StageVariable::Temperature, t1)?
        .with_fixed(StageVariable::Pressure, p1)?
        .resolving(StageVariable::Volume, |s, c: &IdealCycle| {
            Ok(c.fluid.volume(s.temperature(c)?, s.pressure(c)?)?)
        })
}

fn compression_stage() -> CycleResult<CycleStage<IdealCycle>> {
    CycleStage::new(2)
        .resolving(StageVariable::Volume, |_, c: &IdealCycle| {
            Ok(c.volume(1)? / c.compression_ratio)
        })?
        .resolving(StageVariable::Pressure, |s, c: &IdealCycle| {
            Ok(c.pressure(1)? * (c.volume(1)? / s.volume(c)?).powf(c.k()?))
        })?
        .resolving(StageVariable::Temperature, |s, c: &IdealCycle| {
            Ok(c.fluid.temperature(s.pressure(c)?, s.volume(c)?)?)
        })
}

fn combustion_stage() -> CycleResult<CycleStage<IdealCycle>> {
    CycleStage::new(3)
        .resolving(StageVariable::Volume, |_, c: &IdealCycle| c.volume(2))?
        .resolving(StageVariable::Temperature, |_, c: &IdealCycle| {
            Ok(c.temperature(2)? + c.heat_input / c.cv()?)
        })?
        .resolving(StageVariable::Pressure, |s, c: &IdealCycle| {
            Ok(c.fluid.pressure(s.temperature(c)?, s.volume(c)?)?)
        })
}

fn expansion_stage() -> CycleResult<CycleStage<IdealCycle>> {
    CycleStage::new(4)
        .resolving(StageVariable::Volume, |_, c: &IdealCycle| c.volume(1))?
        .resolving(StageVariable::Pressure, |s, c: &IdealCycle| {
            Ok(c.pressure(3)? * (c.volume(3)? / s.volume(c)?).powf(c.k()?))
        })?
        .resolving(StageVariable::Temperature, |s, c: &IdealCycle| {
            Ok(c.fluid.temperature(s.pressure(c)?, s.volume(c)?)?)
        })
}

/// Resolved state of one stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StageState {
    pub ordinal: u8,
    pub pressure_pa: f64,
    pub volume_m3_per_kg: f64,
    pub temperature_k: f64,
}

/// Fully resolved cycle: stage states plus derived per-mass quantities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleSummary {
    pub stages: [StageState; 4],
    pub k: f64,
    pub cv_j_per_kg_k: f64,
    pub heat_input_j_per_kg: f64,
    pub w12_j_per_kg: f64,
    pub w34_j_per_kg: f64,
    pub net_work_j_per_kg: f64,
    pub q41_j_per_kg: f64,
    pub efficiency: f64,
}
